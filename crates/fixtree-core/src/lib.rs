pub mod error;
pub mod model;
pub mod record_set;
pub mod registry;
pub mod template;
pub mod value;

pub use error::CoreError;
pub use model::{AssociationDef, AssociationKind, ModelDef};
pub use record_set::RecordSet;
pub use registry::ModelRegistry;
pub use template::{
    ConditionValue, Conditions, LimitBy, NodeOptions, OneOrMany, Template, TemplateNode,
};
pub use value::{Record, Value};
