use std::collections::HashSet;

use fixtree_naming::classify;

use crate::error::CoreError;
use crate::model::{AssociationDef, ModelDef};

/// All declared models, validated so every association resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelRegistry {
    models: Vec<ModelDef>,
}

impl ModelRegistry {
    pub fn new(models: Vec<ModelDef>) -> Result<Self, CoreError> {
        let registry = Self { models };
        registry.validate()?;
        Ok(registry)
    }

    fn validate(&self) -> Result<(), CoreError> {
        let mut names = HashSet::new();
        for model in &self.models {
            if !names.insert(model.name.as_str()) {
                return Err(CoreError::DuplicateModel(model.name.clone()));
            }
        }

        for model in &self.models {
            let mut assoc_names = HashSet::new();
            for assoc in &model.associations {
                if !assoc_names.insert(assoc.name.as_str()) {
                    return Err(CoreError::DuplicateAssociation(
                        model.name.clone(),
                        assoc.name.clone(),
                    ));
                }
                let target = assoc.target_class();
                if !names.contains(target.as_str()) {
                    return Err(CoreError::UnknownAssociationTarget(
                        model.name.clone(),
                        assoc.name.clone(),
                        target,
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn models(&self) -> &[ModelDef] {
        &self.models
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Exact lookup by class name.
    pub fn get(&self, class_name: &str) -> Option<&ModelDef> {
        self.models.iter().find(|m| m.name == class_name)
    }

    /// Resolve a model from a class name, table name, or template node name
    /// (`User`, `users`, `user`).
    pub fn resolve(&self, name: &str) -> Result<&ModelDef, CoreError> {
        if let Some(model) = self.get(name) {
            return Ok(model);
        }
        if let Some(model) = self.models.iter().find(|m| m.table_name() == name) {
            return Ok(model);
        }
        self.get(&classify(name))
            .ok_or_else(|| CoreError::ModelNotFound(name.to_string()))
    }

    /// Look up an association on `owner` and the model it points at.
    pub fn association<'a>(
        &'a self,
        owner: &'a ModelDef,
        name: &str,
    ) -> Result<(&'a AssociationDef, &'a ModelDef), CoreError> {
        let assoc = owner
            .association(name)
            .ok_or_else(|| CoreError::AssociationNotFound(owner.name.clone(), name.to_string()))?;
        let target = self.target_of(owner, assoc)?;
        Ok((assoc, target))
    }

    pub fn target_of(
        &self,
        owner: &ModelDef,
        assoc: &AssociationDef,
    ) -> Result<&ModelDef, CoreError> {
        let target = assoc.target_class();
        self.get(&target).ok_or(CoreError::UnknownAssociationTarget(
            owner.name.clone(),
            assoc.name.clone(),
            target,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AssociationDef;

    fn blog() -> Vec<ModelDef> {
        vec![
            ModelDef::new("User")
                .with_association(AssociationDef::has_many("posts"))
                .with_association(AssociationDef::has_and_belongs_to_many("roles")),
            ModelDef::new("Post")
                .with_association(AssociationDef::belongs_to("author").with_class_name("User")),
            ModelDef::new("Role"),
        ]
    }

    #[test]
    fn resolves_by_class_table_and_singular() {
        let registry = ModelRegistry::new(blog()).unwrap();
        assert_eq!(registry.resolve("User").unwrap().name, "User");
        assert_eq!(registry.resolve("users").unwrap().name, "User");
        assert_eq!(registry.resolve("user").unwrap().name, "User");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn resolve_unknown_model_fails() {
        let registry = ModelRegistry::new(blog()).unwrap();
        let err = registry.resolve("comments").unwrap_err();
        assert!(matches!(err, CoreError::ModelNotFound(name) if name == "comments"));
    }

    #[test]
    fn association_resolves_target() {
        let registry = ModelRegistry::new(blog()).unwrap();
        let post = registry.get("Post").unwrap();
        let (assoc, target) = registry.association(post, "author").unwrap();
        assert_eq!(assoc.name, "author");
        assert_eq!(target.name, "User");
    }

    #[test]
    fn missing_association_fails() {
        let registry = ModelRegistry::new(blog()).unwrap();
        let post = registry.get("Post").unwrap();
        let err = registry.association(post, "comments").unwrap_err();
        assert_eq!(err.to_string(), "association not found: Post.comments");
    }

    #[test]
    fn duplicate_models_rejected() {
        let err = ModelRegistry::new(vec![ModelDef::new("User"), ModelDef::new("User")])
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateModel(_)));
    }

    #[test]
    fn dangling_association_rejected() {
        let models =
            vec![ModelDef::new("User").with_association(AssociationDef::has_many("posts"))];
        let err = ModelRegistry::new(models).unwrap_err();
        assert_eq!(
            err.to_string(),
            "association User.posts references unknown model: Post"
        );
    }

    #[test]
    fn duplicate_association_rejected() {
        let models = vec![
            ModelDef::new("User")
                .with_association(AssociationDef::has_many("posts"))
                .with_association(AssociationDef::has_many("posts")),
            ModelDef::new("Post"),
        ];
        let err = ModelRegistry::new(models).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateAssociation(_, _)));
    }
}
