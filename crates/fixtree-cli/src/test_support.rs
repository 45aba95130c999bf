use std::fs;
use std::path::{Path, PathBuf};

use fixtree_db::SqliteDatabase;
use tempfile::TempDir;

pub struct CwdGuard {
    original: PathBuf,
}

impl CwdGuard {
    pub fn new(dir: &Path) -> Self {
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        Self { original }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

const SCHEMA: &str = "
CREATE TABLE authors (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL);
CREATE TABLE books (id INTEGER PRIMARY KEY AUTOINCREMENT, author_id INTEGER, title TEXT);
CREATE TABLE tags (id INTEGER PRIMARY KEY AUTOINCREMENT, label TEXT);
CREATE TABLE books_tags (book_id INTEGER, tag_id INTEGER);
INSERT INTO authors (name) VALUES ('ursula');
INSERT INTO authors (name) VALUES ('terry');
INSERT INTO books (author_id, title) VALUES (1, 'earthsea');
INSERT INTO books (author_id, title) VALUES (1, 'lathe');
INSERT INTO books (author_id, title) VALUES (2, 'mort');
INSERT INTO tags (label) VALUES ('fantasy');
INSERT INTO books_tags (book_id, tag_id) VALUES (1, 1);
INSERT INTO books_tags (book_id, tag_id) VALUES (3, 1);
";

const AUTHOR: &str = "name: Author
associations:
  - name: books
    kind: has_many
";

const BOOK: &str = "name: Book
associations:
  - name: author
    kind: belongs_to
  - name: tags
    kind: has_and_belongs_to_many
";

const TAG: &str = "name: Tag
associations:
  - name: books
    kind: has_and_belongs_to_many
";

/// A project with fixtree.json, three models and a seeded database.
pub fn library_project() -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    fs::write(root.join("fixtree.json"), r#"{"database": "library.sqlite3"}"#).unwrap();
    fs::create_dir_all(root.join("models")).unwrap();
    fs::write(root.join("models/author.yaml"), AUTHOR).unwrap();
    fs::write(root.join("models/book.yaml"), BOOK).unwrap();
    fs::write(root.join("models/tag.yaml"), TAG).unwrap();

    let db = SqliteDatabase::open(&root.join("library.sqlite3")).unwrap();
    db.execute_batch(SCHEMA).unwrap();
    tmp
}

/// Rows currently in `table` of the project database.
pub fn row_count(root: &Path, table: &str) -> i64 {
    let db = SqliteDatabase::open(&root.join("library.sqlite3")).unwrap();
    db.connection()
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}
