#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use fixtree_naming::{classify, foreign_key, join_table_name, tableize};

use crate::value::{Record, Value};

fn default_primary_key() -> String {
    "id".to_string()
}

fn default_inheritance_column() -> String {
    "type".to_string()
}

/// A model (one table) as declared in the models directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub struct ModelDef {
    /// Class name, e.g. `UserRole`.
    pub name: String,
    /// Table name. Defaults to the tableized class name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    /// Column holding the subclass name for single-table inheritance.
    #[serde(default = "default_inheritance_column")]
    pub inheritance_column: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub associations: Vec<AssociationDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ModelDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            primary_key: default_primary_key(),
            inheritance_column: default_inheritance_column(),
            associations: Vec::new(),
            description: None,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_association(mut self, association: AssociationDef) -> Self {
        self.associations.push(association);
        self
    }

    pub fn table_name(&self) -> String {
        self.table.clone().unwrap_or_else(|| tableize(&self.name))
    }

    pub fn association(&self, name: &str) -> Option<&AssociationDef> {
        self.associations.iter().find(|a| a.name == name)
    }

    /// The subclass a row belongs to under single-table inheritance, read
    /// from the inheritance column. `None` for base-class rows.
    pub fn subtype<'r>(&self, record: &'r Record) -> Option<&'r str> {
        match record.get(&self.inheritance_column) {
            Some(Value::Text(subtype)) if !subtype.is_empty() => Some(subtype.as_str()),
            _ => None,
        }
    }

    /// Associations backed by a join table.
    pub fn habtm_associations(&self) -> impl Iterator<Item = &AssociationDef> {
        self.associations
            .iter()
            .filter(|a| a.kind == AssociationKind::HasAndBelongsToMany)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    BelongsTo,
    HasOne,
    HasMany,
    HasAndBelongsToMany,
}

impl AssociationKind {
    /// Returns true when the association yields a list of rows rather than at most one.
    pub fn is_collection(self) -> bool {
        matches!(
            self,
            AssociationKind::HasMany | AssociationKind::HasAndBelongsToMany
        )
    }
}

/// A named association from one model to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub struct AssociationDef {
    pub name: String,
    pub kind: AssociationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association_foreign_key: Option<String>,
}

impl AssociationDef {
    pub fn new(name: impl Into<String>, kind: AssociationKind) -> Self {
        Self {
            name: name.into(),
            kind,
            class_name: None,
            foreign_key: None,
            join_table: None,
            association_foreign_key: None,
        }
    }

    pub fn belongs_to(name: impl Into<String>) -> Self {
        Self::new(name, AssociationKind::BelongsTo)
    }

    pub fn has_one(name: impl Into<String>) -> Self {
        Self::new(name, AssociationKind::HasOne)
    }

    pub fn has_many(name: impl Into<String>) -> Self {
        Self::new(name, AssociationKind::HasMany)
    }

    pub fn has_and_belongs_to_many(name: impl Into<String>) -> Self {
        Self::new(name, AssociationKind::HasAndBelongsToMany)
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }

    pub fn with_join_table(mut self, join_table: impl Into<String>) -> Self {
        self.join_table = Some(join_table.into());
        self
    }

    /// Class name of the associated model.
    pub fn target_class(&self) -> String {
        self.class_name
            .clone()
            .unwrap_or_else(|| classify(&self.name))
    }

    /// Foreign key column for this association.
    ///
    /// `belongs_to` keeps the key on the owner (`author` -> `author_id`);
    /// every other kind keeps it on the target (or join table) and names it
    /// after the owner class.
    pub fn foreign_key_for(&self, owner: &ModelDef) -> String {
        if let Some(fk) = &self.foreign_key {
            return fk.clone();
        }
        match self.kind {
            AssociationKind::BelongsTo => format!("{}_id", self.name),
            _ => foreign_key(&owner.name),
        }
    }

    /// Join table column pointing at the target model (habtm only).
    pub fn association_foreign_key_for(&self) -> String {
        self.association_foreign_key
            .clone()
            .unwrap_or_else(|| foreign_key(&self.target_class()))
    }

    /// Join table name (habtm only).
    pub fn join_table_for(&self, owner: &ModelDef, target: &ModelDef) -> String {
        self.join_table
            .clone()
            .unwrap_or_else(|| join_table_name(&owner.table_name(), &target.table_name()))
    }
}
