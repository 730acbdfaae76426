//! Sweet Treats CLI - Database migrations and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! sweet-cli migrate
//!
//! # Print the menu (bundled catalog, or a catalog file to validate)
//! sweet-cli catalog print
//! sweet-cli catalog print --file menu.json
//!
//! # Search product names
//! sweet-cli catalog search nutella
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sweet-cli")]
#[command(author, version, about = "Sweet Treats CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Inspect the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Print every category and product
    Print {
        /// Catalog JSON file (defaults to the bundled catalog)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Search product names (case-insensitive)
    Search {
        query: String,

        /// Catalog JSON file (defaults to the bundled catalog)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Catalog { action } => match action {
            CatalogAction::Print { file } => commands::catalog::print(file.as_deref()).await?,
            CatalogAction::Search { query, file } => {
                commands::catalog::search(&query, file.as_deref()).await?;
            }
        },
    }
    Ok(())
}
