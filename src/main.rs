mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod logging;
mod services;
mod workflow;

use std::io;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::form;
use crate::cmd::submit::{self, SubmitArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::notion::NotionClient;

#[derive(Parser)]
#[command(name = "ithelp", author, version, about = "Submit IT tickets to the Notion ticket database")]
struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill out the ticket form interactively (default).
    Form,
    /// Submit a ticket from command-line arguments.
    Submit(SubmitArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(error) = run(cli).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    match cli.command.unwrap_or(Commands::Form) {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Form => {
            let ctx = build_context()?;
            let mut input = io::stdin().lock();
            let mut output = io::stdout();
            form::run(&ctx, &mut input, &mut output).await
        }
        Commands::Submit(args) => {
            let ctx = build_context()?;
            let created = submit::run(&ctx, args).await?;
            println!("Ticket information submitted successfully.");
            if let Some(url) = &created.url {
                println!("View ticket: {url}");
            }
            Ok(())
        }
    }
}

/// Secrets are read once here; a missing one stops the process before any
/// form is shown.
fn build_context() -> AppResult<AppContext> {
    let config = AppConfig::load()?;
    debug!(
        database_id = %config.database_id,
        api_base = %config.notion_api_base,
        "configuration loaded"
    );
    let ticket_database = Arc::new(NotionClient::new(&config));
    Ok(AppContext::new(ticket_database))
}
