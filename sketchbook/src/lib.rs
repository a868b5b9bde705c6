//! Sketchbook CLI library: argument parsing and dispatch to `sketchbook-commands`.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, LaunchArgs, TagAction};
use sketchbook_core::config::SketchbookConfig;

fn load_config(args: &LaunchArgs) -> SketchbookConfig {
    SketchbookConfig::from_env().with_cli_overrides(
        args.sketch_dir.clone(),
        args.metadata.clone(),
        args.interpreter.clone(),
    )
}

/// Run the CLI: parses args and dispatches to command handlers.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    sketchbook_core::observability::init_tracing();
    let config = load_config(&cli.launch);
    tracing::debug!(?config, "configuration loaded");

    match cli.command.unwrap_or(Commands::Launch) {
        Commands::Launch => sketchbook_commands::cmd_launch(&config)?,
        Commands::List { json } => sketchbook_commands::list::cmd_list(&config, json)?,
        Commands::Tag { action } => match action {
            TagAction::Add { sketch, tags } => {
                sketchbook_commands::tag::cmd_tag_add(&config, &sketch, &tags)?;
            }
            TagAction::Remove { sketch, tags } => {
                sketchbook_commands::tag::cmd_tag_remove(&config, &sketch, &tags)?;
            }
            TagAction::List { json } => sketchbook_commands::tag::cmd_tag_list(&config, json)?,
        },
        Commands::Create {
            name,
            path,
            no_template,
        } => {
            sketchbook_commands::create::cmd_create(&name, path.as_deref(), !no_template)?;
        }
        Commands::Books { path } => sketchbook_commands::create::cmd_books(path.as_deref())?,
    }
    Ok(())
}
