use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fixtree_config::FileFormat;

mod commands;
mod utils;

#[cfg(test)]
mod test_support;
use commands::{
    DumpArgs, DumpTreeArgs, FixtureArgs, LoadTreeArgs, cmd_dump, cmd_dump_tree, cmd_fixture,
    cmd_init, cmd_load, cmd_load_tree, cmd_new, cmd_skeleton, cmd_status,
};
use utils::init_tracing;

/// fixtree command-line interface.
#[derive(Parser, Debug)]
#[command(name = "fixtree", author, version, about)]
struct Cli {
    /// Log progress to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Project root holding fixtree.json. Defaults to the current directory.
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize fixtree.json with defaults.
    Init,
    /// Show configuration, models and row counts.
    Status,
    /// Create a new model definition file.
    New {
        /// Model class name, e.g. `BlogPost`.
        name: String,
        /// Model file format (defaults to modelFormat in fixtree.json).
        #[arg(short = 'f', long = "format", value_enum)]
        format: Option<FileFormat>,
    },
    /// Dump a table and its join tables to YAML.
    Dump(DumpArgs),
    /// Replace a table's rows with the contents of a fixture file.
    Load {
        /// Model class or table name.
        table: String,
        /// Fixture file. Defaults to <fixturesDir>/<table>.yml.
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Write test fixtures for a table.
    Fixture(FixtureArgs),
    /// Write a skeleton fixture listing a table's columns.
    Skeleton {
        /// Model class or table name.
        table: String,
        /// Output directory. Defaults to skeletonDir.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Walk an association template and save the collected rows.
    DumpTree(DumpTreeArgs),
    /// Insert the rows of tree files (or directories of them).
    LoadTree(LoadTreeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let root = cli.root.as_deref();
    match cli.command {
        Commands::Init => cmd_init(root),
        Commands::Status => cmd_status(root),
        Commands::New { name, format } => cmd_new(root, name, format),
        Commands::Dump(args) => cmd_dump(root, args),
        Commands::Load { table, path } => cmd_load(root, table, path),
        Commands::Fixture(args) => cmd_fixture(root, args),
        Commands::Skeleton { table, dir } => cmd_skeleton(root, table, dir),
        Commands::DumpTree(args) => cmd_dump_tree(root, args),
        Commands::LoadTree(args) => cmd_load_tree(root, args),
    }
}
