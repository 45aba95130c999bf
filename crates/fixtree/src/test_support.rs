use fixtree_config::FixtreeConfig;
use fixtree_core::{AssociationDef, ModelDef, ModelRegistry};
use fixtree_db::SqliteDatabase;
use tempfile::TempDir;

use crate::fixtures::Fixtures;

pub const BLOG_SCHEMA: &str = "
CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, email TEXT, type TEXT);
CREATE TABLE profiles (id INTEGER PRIMARY KEY AUTOINCREMENT, user_id INTEGER, bio TEXT);
CREATE TABLE posts (id INTEGER PRIMARY KEY AUTOINCREMENT, user_id INTEGER, title TEXT, category TEXT, created_at TEXT);
CREATE TABLE roles (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT);
CREATE TABLE roles_users (role_id INTEGER, user_id INTEGER);
";

pub const BLOG_DATA: &str = "
INSERT INTO users (name, email, type) VALUES ('alice', 'alice@example.com', 'Admin');
INSERT INTO users (name, email, type) VALUES ('bob', 'bob@example.com', NULL);
INSERT INTO users (name, email, type) VALUES ('carol', NULL, NULL);
INSERT INTO profiles (user_id, bio) VALUES (1, 'hello');
INSERT INTO posts (user_id, title, category, created_at) VALUES (1, 'first', 'news', '2024-01-01');
INSERT INTO posts (user_id, title, category, created_at) VALUES (1, 'second', 'news', '2024-02-01');
INSERT INTO posts (user_id, title, category, created_at) VALUES (1, 'third', 'blog', '2024-03-01');
INSERT INTO posts (user_id, title, category, created_at) VALUES (2, 'hi from bob', 'news', '2024-01-15');
INSERT INTO roles (name) VALUES ('admin');
INSERT INTO roles (name) VALUES ('editor');
INSERT INTO roles_users (role_id, user_id) VALUES (1, 1);
INSERT INTO roles_users (role_id, user_id) VALUES (2, 1);
INSERT INTO roles_users (role_id, user_id) VALUES (2, 2);
";

pub fn blog_models() -> ModelRegistry {
    ModelRegistry::new(vec![
        ModelDef::new("User")
            .with_association(AssociationDef::has_one("profile"))
            .with_association(AssociationDef::has_many("posts"))
            .with_association(AssociationDef::has_and_belongs_to_many("roles")),
        ModelDef::new("Profile").with_association(AssociationDef::belongs_to("user")),
        ModelDef::new("Post").with_association(AssociationDef::belongs_to("user")),
        ModelDef::new("Role").with_association(AssociationDef::has_and_belongs_to_many("users")),
    ])
    .unwrap()
}

/// Schema only, no rows.
pub fn empty_blog_fixtures() -> (TempDir, Fixtures) {
    let dir = tempfile::tempdir().unwrap();
    let db = SqliteDatabase::open_in_memory().unwrap();
    db.execute_batch(BLOG_SCHEMA).unwrap();
    let fixtures = Fixtures::new(
        dir.path(),
        FixtreeConfig::default(),
        blog_models(),
        Box::new(db),
    );
    (dir, fixtures)
}

pub fn blog_fixtures() -> (TempDir, Fixtures) {
    let dir = tempfile::tempdir().unwrap();
    let db = SqliteDatabase::open_in_memory().unwrap();
    db.execute_batch(BLOG_SCHEMA).unwrap();
    db.execute_batch(BLOG_DATA).unwrap();
    let fixtures = Fixtures::new(
        dir.path(),
        FixtreeConfig::default(),
        blog_models(),
        Box::new(db),
    );
    (dir, fixtures)
}
