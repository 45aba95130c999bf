use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use fixtree::Fixtures;
use fixtree_loader::load_models;
use fixtree_query::build_select_all;

use crate::utils::load_project;

pub fn cmd_status(root: Option<&Path>) -> Result<()> {
    let (root, config) = load_project(root)?;

    println!("{}", "Configuration:".bright_cyan().bold());
    println!(
        "  {} {}",
        "Database:".cyan(),
        config.database().display().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Models directory:".cyan(),
        config.models_dir().display().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Dump directory:".cyan(),
        config.dump_dir().display().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Fixtures directory:".cyan(),
        config.fixtures_dir().display().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Trees directory:".cyan(),
        config.trees_dir().display().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Skeleton directory:".cyan(),
        config.skeleton_dir().display().to_string().bright_white()
    );
    println!("  {} {:?}", "Model format:".cyan(), config.model_format());
    println!(
        "  {} {}",
        "Render templates:".cyan(),
        config.render_templates()
    );
    println!();

    let database = root.join(config.database());
    if !database.exists() {
        let models = load_models(&root, &config)?;
        print_models_header(models.len());
        for model in models.models() {
            println!(
                "  {} {} ({})",
                "-".bright_white(),
                model.name.bright_green(),
                model.table_name().bright_white()
            );
        }
        println!();
        println!(
            "{} {}",
            "Status:".bright_cyan().bold(),
            "Database file not found.".bright_yellow()
        );
        return Ok(());
    }

    let fixtures = Fixtures::open(root, config)?;
    print_models_header(fixtures.models().len());
    for model in fixtures.models().models() {
        let table = model.table_name();
        print!(
            "  {} {} ({}",
            "-".bright_white(),
            model.name.bright_green(),
            table.bright_white()
        );
        match fixtures.db().query(&build_select_all(&table)) {
            Ok(rows) => println!(
                ", {} {})",
                rows.len().to_string().bright_blue(),
                "rows".bright_white()
            ),
            Err(err) => println!(", {})", err.to_string().bright_red()),
        }
        if let Some(description) = &model.description {
            println!(
                "    {} {}",
                "Description:".bright_black(),
                description.bright_white()
            );
        }
    }
    println!();

    let status = if fixtures.models().is_empty() {
        "No models found.".bright_yellow()
    } else {
        "Ready.".bright_green()
    };
    println!("{} {}", "Status:".bright_cyan().bold(), status);
    Ok(())
}

fn print_models_header(count: usize) {
    println!(
        "{} {}",
        "Models:".bright_cyan().bold(),
        count.to_string().bright_yellow()
    );
}
