//! LUXE CLI - Admin settings and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Set the admin password (needed before the first admin login)
//! luxe-cli settings set --admin-password 'correct horse'
//!
//! # Store the payment gateway keys
//! luxe-cli settings set --payment-public-key FLWPUBK-... --payment-secret-key FLWSECK-...
//!
//! # Show settings with secrets masked
//! luxe-cli settings show
//!
//! # List the catalog as shoppers see it
//! luxe-cli catalog list --category shirts --sort price-low
//! ```
//!
//! # Commands
//!
//! - `settings show` / `settings set` - Read or update the admin settings file
//! - `catalog list` - Fetch and filter the product catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use luxe_admin::services::SettingsUpdate;
use luxe_core::FilterQuery;

mod commands;

#[derive(Parser)]
#[command(name = "luxe-cli")]
#[command(author, version, about = "LUXE CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the admin settings file
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Inspect the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show the settings with secrets masked
    Show {
        /// Settings file (default: `ADMIN_SETTINGS_PATH` or luxe-admin-settings.json)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    /// Update one or more settings; omitted fields are kept
    Set {
        /// Settings file (default: `ADMIN_SETTINGS_PATH` or luxe-admin-settings.json)
        #[arg(short, long)]
        path: Option<PathBuf>,

        #[arg(long)]
        admin_password: Option<String>,

        #[arg(long)]
        payment_public_key: Option<String>,

        #[arg(long)]
        payment_secret_key: Option<String>,

        #[arg(long)]
        payment_encryption_key: Option<String>,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products after filtering and sorting
    List(CatalogListArgs),
}

#[derive(Args)]
struct CatalogListArgs {
    /// Backend base URL (default: `LUXE_API_BASE_URL`)
    #[arg(long)]
    api: Option<String>,

    /// Search text matched against name and brand
    #[arg(short, long)]
    q: Option<String>,

    /// Comma separated categories
    #[arg(long)]
    category: Option<String>,

    /// Comma separated brands
    #[arg(long)]
    brand: Option<String>,

    #[arg(long)]
    min_price: Option<String>,

    #[arg(long)]
    max_price: Option<String>,

    /// newest, price-low, price-high or brand-az
    #[arg(long)]
    sort: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl CatalogListArgs {
    fn query(&self) -> FilterQuery {
        FilterQuery {
            q: self.q.clone(),
            category: self.category.clone(),
            brand: self.brand.clone(),
            min_price: self.min_price.clone(),
            max_price: self.max_price.clone(),
            sort: self.sort.clone(),
            ..FilterQuery::default()
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "luxe_cli=info,luxe_storefront=warn,luxe_admin=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Settings { action } => match action {
            SettingsAction::Show { path } => {
                let path = commands::settings::resolve_path(path);
                let view = commands::settings::show(&path).await?;
                print_json(&view)?;
            }
            SettingsAction::Set {
                path,
                admin_password,
                payment_public_key,
                payment_secret_key,
                payment_encryption_key,
            } => {
                let path = commands::settings::resolve_path(path);
                let update = SettingsUpdate {
                    admin_password,
                    payment_public_key,
                    payment_secret_key,
                    payment_encryption_key,
                };
                let view = commands::settings::set(&path, update).await?;
                print_json(&view)?;
            }
        },
        Commands::Catalog { action } => match action {
            CatalogAction::List(args) => {
                dotenvy::dotenv().ok();
                let api = args
                    .api
                    .clone()
                    .or_else(|| std::env::var("LUXE_API_BASE_URL").ok());
                let listing = commands::catalog::list(api, &args.query()).await?;
                tracing::info!(
                    source = ?listing.source,
                    count = listing.products.len(),
                    "Catalog loaded"
                );
                if args.json {
                    print_json(&listing.products)?;
                } else {
                    print_rows(&listing.products);
                }
            }
        },
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_rows(products: &[luxe_core::Product]) {
    for product in products {
        println!("{}", commands::catalog::format_row(product));
    }
}
