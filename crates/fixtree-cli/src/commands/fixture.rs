use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use fixtree::FixtureOptions;
use fixtree_core::Conditions;

use crate::utils::open_project;

#[derive(Args, Debug, Default)]
pub struct FixtureArgs {
    /// Model class or table name.
    pub table: String,
    /// Output directory. Defaults to fixturesDir.
    #[arg(long)]
    pub save_path: Option<PathBuf>,
    /// Output file name. Defaults to <table>.yml.
    #[arg(long)]
    pub save_name: Option<String>,
    /// Append to the output file instead of replacing it.
    #[arg(long)]
    pub append: bool,
    /// Column whose value names each fixture.
    #[arg(long)]
    pub key: Option<String>,
    /// SQL condition rows must match.
    #[arg(long = "where")]
    pub conditions: Option<String>,
    /// Also write the model's join tables to skeletonDir.
    #[arg(long)]
    pub habtm: bool,
}

pub fn cmd_fixture(root: Option<&Path>, args: FixtureArgs) -> Result<()> {
    let fixtures = open_project(root)?;
    let table = fixtures.table(&args.table)?;

    let mut options = FixtureOptions::default().with_append(args.append);
    if let Some(save_path) = args.save_path {
        options = options.with_save_path(save_path);
    }
    if let Some(save_name) = args.save_name {
        options = options.with_save_name(save_name);
    }
    if let Some(key) = args.key {
        options = options.with_key(key);
    }
    if let Some(sql) = args.conditions {
        options = options.with_conditions(Conditions::Sql(sql));
    }

    let path = table.to_fixture(&options)?;
    println!(
        "{} {}",
        "Wrote fixture:".bright_green(),
        path.display().to_string().bright_white()
    );

    if args.habtm {
        for path in table.habtm_to_fixture(None)? {
            println!(
                "{} {}",
                "Wrote join table:".bright_green(),
                path.display().to_string().bright_white()
            );
        }
    }
    Ok(())
}
