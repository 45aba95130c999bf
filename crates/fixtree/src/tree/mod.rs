//! Template-driven dumps of association trees, and loading them back.

pub mod dump;
pub mod load;
pub mod walker;

pub use dump::{DumpTreeOptions, TemplateSource};
pub use load::{GLOBAL_EXCEPTIONS, LoadTreeOptions};
pub use walker::{Parent, build_relations, parse_template};
