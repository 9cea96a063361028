//! Notely CLI - manage notes on a Notely service from the terminal

use clap::Parser;
use notely_core::ApiClient;

mod cli;
mod commands;
mod config_profiles;
mod error;

use cli::{Cli, Commands};
use commands::add::run_add;
use commands::archive::{run_archive, run_unarchive};
use commands::categories::run_categories;
use commands::completions::run_completions;
use commands::config::run_config;
use commands::delete::run_delete;
use commands::edit::run_edit;
use commands::list::run_list;
use commands::show::run_show;
use commands::tag::{run_tag, run_untag};
use config_profiles::resolve_api_config;
use error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("notely=error".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    // Commands that never talk to the service.
    let command = match cli.command {
        Commands::Config { command } => {
            return run_config(command, cli.profile.as_deref(), cli.api_url);
        }
        Commands::Completions { shell, output } => {
            return run_completions(shell, output.as_deref());
        }
        command => command,
    };

    let (config, source) =
        resolve_api_config(cli.api_url, cli.profile.as_deref()).map_err(CliError::Config)?;
    tracing::debug!(base_url = %config.base_url, source = source.label(), "Using notes service");
    let client = ApiClient::new(&config)?;

    match command {
        Commands::List {
            view,
            category,
            json,
        } => run_list(&client, view, category.as_deref(), json).await?,
        Commands::Show { id, json } => run_show(&client, &id, json).await?,
        Commands::Add {
            title,
            content,
            categories,
        } => run_add(&client, &title, &content, &categories).await?,
        Commands::Edit { id, title, content } => run_edit(&client, &id, title, content).await?,
        Commands::Delete { id } => run_delete(&client, &id).await?,
        Commands::Archive { id } => run_archive(&client, &id).await?,
        Commands::Unarchive { id } => run_unarchive(&client, &id).await?,
        Commands::Tag { note, category } => run_tag(&client, &note, &category).await?,
        Commands::Untag { note, category } => run_untag(&client, &note, &category).await?,
        Commands::Categories { command } => run_categories(&client, command).await?,
        Commands::Config { .. } | Commands::Completions { .. } => {}
    }

    Ok(())
}
