use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;

use crate::utils::open_project;

pub fn cmd_load(root: Option<&Path>, table: String, path: Option<PathBuf>) -> Result<()> {
    let fixtures = open_project(root)?;
    let table = fixtures.table(&table)?;
    let count = table.load_from_file(path.as_deref())?;
    println!(
        "{} {} {} {}",
        "Loaded".bright_green(),
        count.to_string().bright_yellow(),
        "rows into".bright_white(),
        table.table_name().bright_cyan()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{library_project, row_count};
    use std::fs;

    #[test]
    fn load_replaces_table_rows() {
        let tmp = library_project();
        let dir = tmp.path().join("fixtures/models");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("authors.yml"),
            "Author-00007:\n  id: 7\n  name: le guin\n",
        )
        .unwrap();

        cmd_load(Some(tmp.path()), "Author".into(), None).unwrap();
        assert_eq!(row_count(tmp.path(), "authors"), 1);
    }

    #[test]
    fn load_from_missing_file_fails() {
        let tmp = library_project();
        let err = cmd_load(
            Some(tmp.path()),
            "tags".into(),
            Some(PathBuf::from("nowhere/tags.yml")),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("read yaml file"));
    }
}
