use std::collections::BTreeMap;

use indexmap::IndexMap;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::value::Value;

/// A single item or a list of items. Templates accept either wherever a list
/// is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

/// One node of a traversal template: a bare association name (`posts`) or a
/// single-key mapping from the association name to its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(untagged)]
pub enum TemplateNode {
    Name(String),
    Nested(BTreeMap<String, Option<NodeOptions>>),
}

impl TemplateNode {
    pub fn name(name: impl Into<String>) -> Self {
        TemplateNode::Name(name.into())
    }

    pub fn nested(name: impl Into<String>, options: NodeOptions) -> Self {
        TemplateNode::Nested(BTreeMap::from([(name.into(), Some(options))]))
    }

    /// Split the node into its association name and options, if any.
    pub fn parts(&self) -> Result<(&str, Option<&NodeOptions>), CoreError> {
        match self {
            TemplateNode::Name(name) => Ok((name.as_str(), None)),
            TemplateNode::Nested(map) => {
                if map.len() != 1 {
                    return Err(CoreError::InvalidTemplateNode(map.len()));
                }
                let (name, options) = map
                    .iter()
                    .next()
                    .ok_or(CoreError::InvalidTemplateNode(0))?;
                Ok((name.as_str(), options.as_ref()))
            }
        }
    }
}

/// Filters, sanitizers and children applied at one template node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct NodeOptions {
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(alias = "query_limit", default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_by: Option<LimitBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_limit: Option<usize>,
    /// Column -> template string rendered per row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanitize: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grab: Option<OneOrMany<TemplateNode>>,
}

impl NodeOptions {
    pub fn children(&self) -> &[TemplateNode] {
        self.grab
            .as_ref()
            .map(OneOrMany::as_slice)
            .unwrap_or_default()
    }

    pub fn with_grab(mut self, nodes: Vec<TemplateNode>) -> Self {
        self.grab = Some(OneOrMany::Many(nodes));
        self
    }

    pub fn with_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_limit_by(mut self, column: impl Into<String>, count: usize) -> Self {
        self.limit_by = Some(LimitBy(BTreeMap::from([(column.into(), count)])));
        self
    }

    pub fn with_hard_limit(mut self, hard_limit: usize) -> Self {
        self.hard_limit = Some(hard_limit);
        self
    }

    pub fn with_sanitize(mut self, column: impl Into<String>, template: impl Into<String>) -> Self {
        self.sanitize
            .get_or_insert_with(BTreeMap::new)
            .insert(column.into(), template.into());
        self
    }
}

/// `where` option: a raw SQL condition or per-column equality/IN filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(untagged)]
pub enum Conditions {
    Sql(String),
    Columns(BTreeMap<String, ConditionValue>),
}

impl Conditions {
    pub fn column(column: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        Conditions::Columns(BTreeMap::from([(column.into(), value.into())]))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(untagged)]
pub enum ConditionValue {
    Any(Vec<Value>),
    Eq(Value),
}

impl From<Value> for ConditionValue {
    fn from(value: Value) -> Self {
        ConditionValue::Eq(value)
    }
}

impl From<bool> for ConditionValue {
    fn from(value: bool) -> Self {
        ConditionValue::Eq(value.into())
    }
}

impl From<i64> for ConditionValue {
    fn from(value: i64) -> Self {
        ConditionValue::Eq(value.into())
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Eq(value.into())
    }
}

impl From<Vec<Value>> for ConditionValue {
    fn from(values: Vec<Value>) -> Self {
        ConditionValue::Any(values)
    }
}

/// Keep the first `n` rows for each distinct value of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(transparent)]
pub struct LimitBy(pub BTreeMap<String, usize>);

impl LimitBy {
    pub fn column_and_count(&self) -> Result<(&str, usize), CoreError> {
        if self.0.len() != 1 {
            return Err(CoreError::InvalidLimitBy(self.0.len()));
        }
        self.0
            .iter()
            .next()
            .map(|(column, count)| (column.as_str(), *count))
            .ok_or(CoreError::InvalidLimitBy(0))
    }
}

/// A template file: an ordered mapping from template key to root nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(transparent)]
pub struct Template(IndexMap<String, OneOrMany<TemplateNode>>);

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, nodes: Vec<TemplateNode>) -> Self {
        self.0.insert(key.into(), OneOrMany::Many(nodes));
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The explicit key when given, otherwise the first declared key.
    pub fn resolve_key<'a>(&'a self, key: Option<&'a str>) -> Result<&'a str, CoreError> {
        match key {
            Some(key) if self.0.contains_key(key) => Ok(key),
            Some(key) => Err(CoreError::TemplateKeyNotFound(key.to_string())),
            None => self
                .0
                .keys()
                .next()
                .map(String::as_str)
                .ok_or(CoreError::EmptyTemplate),
        }
    }

    pub fn nodes(&self, key: &str) -> Result<&[TemplateNode], CoreError> {
        self.0
            .get(key)
            .map(OneOrMany::as_slice)
            .ok_or_else(|| CoreError::TemplateKeyNotFound(key.to_string()))
    }
}
