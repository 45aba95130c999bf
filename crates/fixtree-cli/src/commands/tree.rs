use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use fixtree::{DumpTreeOptions, LoadTreeOptions};

use crate::utils::{open_project, parse_except_attribute};

#[derive(Args, Debug, Default)]
pub struct DumpTreeArgs {
    /// Template file (YAML or JSON), relative to the project root.
    #[arg(short, long)]
    pub template: Option<PathBuf>,
    /// Template entry to walk. Defaults to the first one.
    #[arg(short, long)]
    pub key: Option<String>,
    /// Write one file per class under <fixturesDir>/<key>/.
    #[arg(long)]
    pub split: bool,
    /// Union with rows already in the output file(s).
    #[arg(long)]
    pub merge: bool,
    /// Append to the output file (single-class output only).
    #[arg(long)]
    pub append: bool,
    /// Output directory.
    #[arg(long)]
    pub save_path: Option<PathBuf>,
    /// Output file name for a single tree file.
    #[arg(long)]
    pub save_name: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct LoadTreeArgs {
    /// Tree files or directories of them.
    pub paths: Vec<PathBuf>,
    /// Skip rows for this table or class (repeatable).
    #[arg(long = "except-model")]
    pub except_models: Vec<String>,
    /// Drop a column before inserting: `table.column`, or `column` for every
    /// table (repeatable).
    #[arg(long = "except-attribute")]
    pub except_attributes: Vec<String>,
    /// Delete each table's rows before loading into it.
    #[arg(long)]
    pub destroy_all: bool,
    /// Reset id sequences around the inserts.
    #[arg(long)]
    pub reset_sequence: bool,
}

pub fn cmd_dump_tree(root: Option<&Path>, args: DumpTreeArgs) -> Result<()> {
    let fixtures = open_project(root)?;

    let mut options = DumpTreeOptions::default()
        .with_split(args.split)
        .with_merge(args.merge)
        .with_append(args.append);
    if let Some(template) = args.template {
        options = options.with_template_path(template);
    }
    if let Some(key) = args.key {
        options = options.with_template_key(key);
    }
    if let Some(save_path) = args.save_path {
        options = options.with_save_path(save_path);
    }
    if let Some(save_name) = args.save_name {
        options = options.with_save_name(save_name);
    }

    let records = fixtures.dump_tree(&options)?;
    println!("{}", "Dumped tree:".bright_cyan().bold());
    for (class_name, rows) in records.iter() {
        println!(
            "  {} {} {}",
            "-".bright_white(),
            class_name.bright_green(),
            rows.len().to_string().bright_yellow()
        );
    }
    Ok(())
}

pub fn cmd_load_tree(root: Option<&Path>, args: LoadTreeArgs) -> Result<()> {
    let fixtures = open_project(root)?;

    let mut options = LoadTreeOptions::default()
        .with_except_models(args.except_models)
        .with_destroy_all(args.destroy_all)
        .with_reset_sequence(args.reset_sequence);
    for spec in &args.except_attributes {
        let (table, column) = parse_except_attribute(spec)?;
        options = options.with_except_attributes(table, [column]);
    }

    let loaded = fixtures.load_tree(&args.paths, &options)?;
    println!("{}", "Loaded tree:".bright_cyan().bold());
    for (class_name, count) in &loaded {
        println!(
            "  {} {} {}",
            "-".bright_white(),
            class_name.bright_green(),
            count.to_string().bright_yellow()
        );
    }
    Ok(())
}
