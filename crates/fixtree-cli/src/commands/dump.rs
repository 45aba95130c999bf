use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use fixtree::SelectFilter;
use fixtree_core::Conditions;

use crate::utils::open_project;

#[derive(Args, Debug, Default)]
pub struct DumpArgs {
    /// Model class or table name.
    pub table: String,
    /// Output file. Defaults to <dumpDir>/<table>.yml.
    #[arg(long)]
    pub path: Option<PathBuf>,
    /// Maximum number of rows.
    #[arg(long)]
    pub limit: Option<u64>,
    /// SQL condition rows must match.
    #[arg(long = "where")]
    pub conditions: Option<String>,
    /// Order clause, e.g. "created_at desc, id".
    #[arg(long)]
    pub order: Option<String>,
}

pub fn cmd_dump(root: Option<&Path>, args: DumpArgs) -> Result<()> {
    let fixtures = open_project(root)?;
    let table = fixtures.table(&args.table)?;

    let mut filter = SelectFilter::new();
    if let Some(sql) = args.conditions {
        filter = filter.with_conditions(Conditions::Sql(sql));
    }
    if let Some(order) = &args.order {
        filter = filter.with_order(order)?;
    }

    let count = table.dump_to_file(args.path.as_deref(), args.limit, filter)?;
    println!(
        "{} {} {} {}",
        "Dumped".bright_green(),
        count.to_string().bright_yellow(),
        "rows from".bright_white(),
        table.table_name().bright_cyan()
    );
    Ok(())
}
