pub mod error;
pub mod fixtures;
pub mod table;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::FixtureError;
pub use fixtures::Fixtures;
pub use table::{FixtureOptions, TableFixtures};
pub use tree::{
    DumpTreeOptions, GLOBAL_EXCEPTIONS, LoadTreeOptions, Parent, TemplateSource,
    build_relations, parse_template,
};

pub use fixtree_config::FixtreeConfig;
pub use fixtree_core::{
    AssociationDef, AssociationKind, Conditions, ModelDef, ModelRegistry, NodeOptions, Record,
    RecordSet, Template, TemplateNode, Value,
};
pub use fixtree_db::{Database, SqliteDatabase};
pub use fixtree_query::SelectFilter;
