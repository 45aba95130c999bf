use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;

use crate::utils::open_project;

pub fn cmd_skeleton(root: Option<&Path>, table: String, dir: Option<PathBuf>) -> Result<()> {
    let fixtures = open_project(root)?;
    let path = fixtures.table(&table)?.to_skeleton(dir.as_deref())?;
    println!(
        "{} {}",
        "Wrote skeleton:".bright_green(),
        path.display().to_string().bright_white()
    );
    Ok(())
}
