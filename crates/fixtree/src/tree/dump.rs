use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use fixtree_core::{RecordSet, Template};
use fixtree_loader::{load_template, read_yaml_file, write_record_set};
use tracing::info;

use super::walker::parse_template;
use crate::error::FixtureError;
use crate::fixtures::Fixtures;

/// Where a tree dump gets its template from.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSource {
    Inline(Template),
    /// A YAML or JSON template file, relative to the project root.
    Path(PathBuf),
}

/// Options for [`Fixtures::dump_tree`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DumpTreeOptions {
    pub template: Option<TemplateSource>,
    /// Template entry to walk. Defaults to the first one.
    pub template_key: Option<String>,
    /// Write one file per class instead of a single tree file.
    pub split: bool,
    /// Union the gathered rows with those already in the target file.
    pub merge: bool,
    /// Append to the target file. Only single-class output can be appended.
    pub append: bool,
    pub save_path: Option<PathBuf>,
    /// File name for flat dumps.
    pub save_name: Option<String>,
}

impl DumpTreeOptions {
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = Some(TemplateSource::Inline(template));
        self
    }

    pub fn with_template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template = Some(TemplateSource::Path(path.into()));
        self
    }

    pub fn with_template_key(mut self, key: impl Into<String>) -> Self {
        self.template_key = Some(key.into());
        self
    }

    pub fn with_split(mut self, split: bool) -> Self {
        self.split = split;
        self
    }

    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn with_save_path(mut self, save_path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(save_path.into());
        self
    }

    pub fn with_save_name(mut self, save_name: impl Into<String>) -> Self {
        self.save_name = Some(save_name.into());
        self
    }
}

impl Fixtures {
    /// Walk a template and save the collected rows, either as one tree file
    /// (`<treesDir>/<key>_tree.yml`) or split into one file per class
    /// (`<fixturesDir>/<key>/<class>.yml`). Returns the gathered rows.
    pub fn dump_tree(&self, options: &DumpTreeOptions) -> Result<RecordSet, FixtureError> {
        let template = match &options.template {
            None => return Err(FixtureError::MissingTemplate),
            Some(TemplateSource::Inline(template)) => template.clone(),
            Some(TemplateSource::Path(path)) => load_template(&self.resolve_path(path))?,
        };
        let key = template
            .resolve_key(options.template_key.as_deref())?
            .to_string();

        let records = self.gather_records(&template, &key)?;
        if options.split {
            self.save_split(&records, &key, options)?;
        } else {
            self.save_flat(&records, &key, options)?;
        }
        Ok(records)
    }

    /// Walk the template entry `key` from the root.
    pub fn gather_records(
        &self,
        template: &Template,
        key: &str,
    ) -> Result<RecordSet, FixtureError> {
        let mut records = RecordSet::new();
        parse_template(self, None, template.nodes(key)?, &mut records)?;
        info!(
            template_key = key,
            classes = records.len(),
            rows = records.total_records(),
            "gathered records"
        );
        Ok(records)
    }

    fn save_flat(
        &self,
        records: &RecordSet,
        key: &str,
        options: &DumpTreeOptions,
    ) -> Result<PathBuf, FixtureError> {
        let dir = options
            .save_path
            .as_deref()
            .unwrap_or(self.config().trees_dir());
        let name = options
            .save_name
            .clone()
            .unwrap_or_else(|| format!("{}_tree.yml", key.to_lowercase()));
        let path = self.resolve_path(&dir.join(name));

        let mut tree = records.clone();
        if options.merge {
            merge_with_file(&mut tree, &path)?;
        }
        write_record_set(&path, &tree, options.append)?;
        info!(path = %path.display(), merge = options.merge, append = options.append, "saved tree");
        Ok(path)
    }

    fn save_split(
        &self,
        records: &RecordSet,
        key: &str,
        options: &DumpTreeOptions,
    ) -> Result<Vec<PathBuf>, FixtureError> {
        let dir = match &options.save_path {
            Some(path) => self.resolve_path(path),
            None => self.resolve_path(&self.config().fixtures_dir().join(key.to_lowercase())),
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("create directory: {}", dir.display()))?;

        let mut written = Vec::new();
        for (class_name, rows) in records.iter() {
            let path = dir.join(format!("{}.yml", class_name.to_lowercase()));
            let mut tree = RecordSet::new();
            tree.push_all(class_name, rows.to_vec());
            if options.merge {
                merge_with_file(&mut tree, &path)?;
            }
            write_record_set(&path, &tree, options.append)?;
            info!(
                class = class_name,
                rows = rows.len(),
                path = %path.display(),
                "saved class file"
            );
            written.push(path);
        }
        Ok(written)
    }
}

/// Union `tree` with the rows already saved at `path`. Duplicate rows
/// collapse even when there is no previous file.
fn merge_with_file(tree: &mut RecordSet, path: &Path) -> Result<(), FixtureError> {
    let old = if path.exists() {
        read_yaml_file::<RecordSet>(path, false)?.unwrap_or_default()
    } else {
        RecordSet::new()
    };
    tree.merge(old);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::blog_fixtures;
    use fixtree_core::{Conditions, NodeOptions, Record, TemplateNode, Value};

    fn users_tree() -> Template {
        Template::new().with_entry(
            "Users",
            vec![TemplateNode::nested(
                "users",
                NodeOptions::default()
                    .with_conditions(Conditions::column("name", "alice"))
                    .with_grab(vec![TemplateNode::name("posts")]),
            )],
        )
    }

    fn read_tree(path: &Path) -> RecordSet {
        serde_yaml::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn missing_template_is_an_error() {
        let (_dir, fixtures) = blog_fixtures();
        let err = fixtures.dump_tree(&DumpTreeOptions::default()).unwrap_err();
        assert!(matches!(err, FixtureError::MissingTemplate));
        assert_eq!(
            err.to_string(),
            "you must pass a template object or a path to a template file"
        );
    }

    #[test]
    fn flat_dump_writes_tree_file() {
        let (dir, fixtures) = blog_fixtures();
        let options = DumpTreeOptions::default().with_template(users_tree());
        let records = fixtures.dump_tree(&options).unwrap();

        let path = dir.path().join("fixtures/trees/users_tree.yml");
        let saved = read_tree(&path);
        assert_eq!(saved, records);
        assert_eq!(saved.class_names().collect::<Vec<_>>(), vec!["User", "Post"]);
        assert_eq!(saved.get("Post").unwrap().len(), 3);
    }

    #[test]
    fn template_loaded_from_path_with_key() {
        let (dir, fixtures) = blog_fixtures();
        let template = "first:\n  - roles\nsecond:\n  - posts:\n      where:\n        user_id: 2\n";
        fs::write(dir.path().join("template.yml"), template).unwrap();

        let options = DumpTreeOptions::default()
            .with_template_path("template.yml")
            .with_template_key("second")
            .with_save_name("bob.yml");
        let records = fixtures.dump_tree(&options).unwrap();
        assert_eq!(records.get("Post").unwrap().len(), 1);
        assert!(dir.path().join("fixtures/trees/bob.yml").exists());
    }

    #[test]
    fn sanitizer_from_template_file_renders_per_row() {
        let (dir, fixtures) = blog_fixtures();
        let template = "Users:\n  - users:\n      where:\n        name: alice\n      sanitize:\n        email: \"{{ name }}@test.local\"\n";
        fs::write(dir.path().join("users.yml"), template).unwrap();

        let options = DumpTreeOptions::default().with_template_path("users.yml");
        let records = fixtures.dump_tree(&options).unwrap();
        let users = records.get("User").unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["email"], Value::from("alice@test.local"));
    }

    #[test]
    fn unknown_template_key_fails() {
        let (_dir, fixtures) = blog_fixtures();
        let options = DumpTreeOptions::default()
            .with_template(users_tree())
            .with_template_key("Nope");
        let err = fixtures.dump_tree(&options).unwrap_err();
        assert_eq!(err.to_string(), "template key not found: Nope");
    }

    #[test]
    fn split_dump_writes_one_file_per_class() {
        let (dir, fixtures) = blog_fixtures();
        let options = DumpTreeOptions::default()
            .with_template(users_tree())
            .with_split(true);
        fixtures.dump_tree(&options).unwrap();

        let base = dir.path().join("fixtures/models/users");
        let users = read_tree(&base.join("user.yml"));
        let posts = read_tree(&base.join("post.yml"));
        assert_eq!(users.class_names().collect::<Vec<_>>(), vec!["User"]);
        assert_eq!(posts.get("Post").unwrap().len(), 3);
    }

    #[test]
    fn merge_unions_with_existing_tree() {
        let (dir, fixtures) = blog_fixtures();
        let path = dir.path().join("fixtures/trees/users_tree.yml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "Tag:\n- id: 1\n  name: old\nUser:\n- id: 99\n  name: ghost\n").unwrap();

        let options = DumpTreeOptions::default()
            .with_template(users_tree())
            .with_merge(true);
        fixtures.dump_tree(&options).unwrap();
        // dumping again merges identical rows away
        fixtures.dump_tree(&options).unwrap();

        let saved = read_tree(&path);
        assert_eq!(saved.class_names().collect::<Vec<_>>(), vec!["User", "Post", "Tag"]);
        let names: Vec<&Value> = saved.get("User").unwrap().iter().map(|r| &r["name"]).collect();
        assert_eq!(names, vec![&Value::from("alice"), &Value::from("ghost")]);
        assert_eq!(saved.get("Post").unwrap().len(), 3);
    }

    #[test]
    fn split_merge_keeps_rows_from_previous_dump() {
        let (dir, fixtures) = blog_fixtures();
        let base = dir.path().join("fixtures/models/users");
        fs::create_dir_all(&base).unwrap();
        fs::write(base.join("user.yml"), "User:\n- id: 42\n  name: old\n").unwrap();

        let options = DumpTreeOptions::default()
            .with_template(users_tree())
            .with_split(true)
            .with_merge(true);
        fixtures.dump_tree(&options).unwrap();

        let users = read_tree(&base.join("user.yml"));
        assert_eq!(users.get("User").unwrap().len(), 2);
    }

    #[test]
    fn append_extends_single_class_file() {
        let (dir, fixtures) = blog_fixtures();
        let roles = |name: &str| {
            Template::new().with_entry(
                "Roles",
                vec![TemplateNode::nested(
                    "roles",
                    NodeOptions::default().with_conditions(Conditions::column("name", name)),
                )],
            )
        };

        fixtures
            .dump_tree(&DumpTreeOptions::default().with_template(roles("admin")))
            .unwrap();
        fixtures
            .dump_tree(
                &DumpTreeOptions::default()
                    .with_template(roles("editor"))
                    .with_append(true),
            )
            .unwrap();

        let saved = read_tree(&dir.path().join("fixtures/trees/roles_tree.yml"));
        let names: Vec<Value> = saved
            .get("Role")
            .unwrap()
            .iter()
            .map(|r: &Record| r["name"].clone())
            .collect();
        assert_eq!(names, vec![Value::from("admin"), Value::from("editor")]);
    }

    #[test]
    fn append_with_several_classes_is_rejected() {
        let (_dir, fixtures) = blog_fixtures();
        let options = DumpTreeOptions::default()
            .with_template(users_tree())
            .with_append(true);
        let err = fixtures.dump_tree(&options).unwrap_err();
        assert!(err.to_string().contains("use merge"), "got: {err}");
    }
}
