#![allow(clippy::result_large_err)]

use bizdesk::{
    config::{
        database::{DatabaseSettings, create_tables},
        settings::{DashboardSettings, load_config_or_default},
    },
    core::{category::seed_default_categories, report::dashboard_summary},
    errors::Result,
    import::{parse_product_list, push_products, write_json},
    store::Store,
};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Business administration backend: products, partners and invoices.
#[derive(Debug, Parser)]
#[command(name = "bizdesk", version, about)]
struct Cli {
    /// Path to the settings file
    #[arg(long, env = "BIZDESK_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create missing tables and seed the built-in categories
    Init,
    /// Import a semicolon-delimited product list
    ///
    /// Category names must match stored categories; run `init` first to store the
    /// built-in ones.
    Import {
        /// Product list to read
        file: PathBuf,
        /// Write the parsed products to this JSON file instead of the database
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Print the dashboard summary as JSON
    Summary,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    let cli = Cli::parse();
    let app_config = load_config_or_default(&cli.config)
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // Parsing a file to JSON never touches the database
    if let Command::Import {
        file,
        json: Some(out),
    } = &cli.command
    {
        return import_to_json(file, out);
    }

    let store = Store::connect(&DatabaseSettings::from_env())
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;

    run(cli.command, &store, &app_config.dashboard).await
}

/// Executes a command against an open store. Only `init` and `import` create tables.
async fn run(command: Command, store: &Store, dashboard: &DashboardSettings) -> Result<()> {
    match command {
        Command::Init => {
            create_tables(store.elevated()).await?;
            let seeded = seed_default_categories(store).await?;
            info!("Database ready ({} categories seeded)", seeded);
        }
        Command::Import { file, .. } => {
            create_tables(store.elevated()).await?;
            let outcome = parse_product_list(&std::fs::read_to_string(&file)?)?;
            report_skipped(outcome.errors.len());
            let imported = push_products(store, &outcome.products).await?;
            info!("Imported {} product(s) from {}", imported, file.display());
        }
        Command::Summary => {
            let summary = dashboard_summary(store, dashboard).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

fn import_to_json(file: &Path, out: &Path) -> Result<()> {
    let outcome = parse_product_list(&std::fs::read_to_string(file)?)?;
    report_skipped(outcome.errors.len());
    write_json(out, &outcome.products)
}

fn report_skipped(count: usize) {
    if count > 0 {
        warn!("Skipped {} line(s) that could not be parsed", count);
    }
}
