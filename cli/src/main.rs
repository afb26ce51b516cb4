mod client;
mod commands;
mod config;
mod logging;
#[cfg(test)]
mod stub_backend;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::{io, process};

use crate::client::HttpBackend;
use crate::commands::{FieldArgs, cmd_add, cmd_delete, cmd_edit, cmd_list, run_shell};
use crate::config::Config;
use foodsearch_core::controller::Controller;

#[derive(Parser)]
#[command(
    name = "foodsearch",
    version,
    about = "Browse and edit the healthy foods collection of a foods API",
    long_about = "Browse and edit the healthy foods collection of a foods API.\n\n\
        The API URL comes from --api-url, then $FOODSEARCH_API_URL, then the \
        `api_url` key of config.json in the foodsearch config directory, and \
        defaults to http://localhost:8080."
)]
struct Cli {
    /// Origin of the foods API (e.g. "http://localhost:8080")
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
    /// Log more (-v info, -vv debug). `RUST_LOG` overrides this.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List foods, optionally filtered by name or origin
    List {
        /// Case-insensitive text to match against food name or origin
        #[arg(short, long)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a new food
    Add {
        /// Food name (unique)
        food: String,
        #[command(flatten)]
        fields: FieldArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing food; fields not given keep their current value
    Edit {
        /// Name of the food to edit (cannot be changed)
        food: String,
        #[command(flatten)]
        fields: FieldArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a food
    Delete {
        /// Name of the food to delete
        food: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive session with search, form and list
    Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    logging::init_tracing(cli.verbose);

    let config = Config::load(cli.api_url)?;
    let backend = HttpBackend::new(&config.api_url, config.request_timeout)?;
    tracing::debug!(api_url = %backend.origin(), "using foods API");
    let mut controller = Controller::new(backend);

    match cli.command {
        Commands::List { search, json } => {
            cmd_list(&mut controller, search.as_deref(), json).await
        }
        Commands::Add { food, fields, json } => {
            cmd_add(&mut controller, &food, &fields, json).await
        }
        Commands::Edit { food, fields, json } => {
            cmd_edit(&mut controller, &food, &fields, json).await
        }
        Commands::Delete { food, yes, json } => {
            cmd_delete(&mut controller, &food, yes, json).await
        }
        Commands::Shell => {
            run_shell(&mut controller, io::stdin().lock(), &mut io::stdout()).await
        }
    }
}
