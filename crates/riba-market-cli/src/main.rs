//! Riba Market CLI - manage seller catalogues offline.
//!
//! # Usage
//!
//! ```bash
//! # Create a catalogue and add a published item
//! riba-market catalogue create -n "Summer" -c fashion
//! riba-market item add -c <catalogue-id> -n "Dress" -p 5000 --publish
//!
//! # Show the public page behind a share link
//! riba-market public <catalogue-id> --sort price-asc
//!
//! # Browse the marketplace
//! riba-market products --category Food --verified --sort rating
//! ```
//!
//! Catalogues are stored as JSON documents under the data directory
//! (`--data-dir`, `RIBA_DATA_DIR` or the config file). Set `RUST_LOG=debug`
//! for verbose logging.

#![cfg_attr(not(test), forbid(unsafe_code))]

mod commands;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use riba_market_core::browse::ProductSort;
use riba_market_core::catalogue::ItemSort;
use riba_market_core::cart::PaymentMethod;
use riba_market_core::models::{CatalogueCategory, StoreType};
use riba_market_core::{Config, LocalCache};

use commands::Context;

/// Log file name prefix inside `<data_dir>/logs`
const LOG_FILE: &str = "riba-market.log";

#[derive(Parser)]
#[command(name = "riba-market")]
#[command(author, version, about = "Riba Market catalogue manager")]
struct Cli {
    /// Directory holding the local cache
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage catalogues
    Catalogue {
        #[command(subcommand)]
        action: CatalogueAction,
    },
    /// Manage the items of a catalogue
    Item {
        #[command(subcommand)]
        action: ItemAction,
    },
    /// Show the public page of a catalogue
    Public {
        id: String,

        /// Filter by name, category or description
        #[arg(short, long)]
        search: Option<String>,

        /// name-asc, name-desc, price-asc, price-desc or newest
        #[arg(long, default_value = "name-asc")]
        sort: ItemSort,
    },
    /// Browse marketplace products
    Products {
        /// Category to include (repeatable)
        #[arg(short, long)]
        category: Vec<String>,

        /// Minimum price
        #[arg(long)]
        min: Option<u64>,

        /// Maximum price
        #[arg(long)]
        max: Option<u64>,

        /// Only verified stores
        #[arg(long)]
        verified: bool,

        /// Store type to include (repeatable)
        #[arg(long)]
        store_type: Vec<StoreType>,

        /// Filter by product name
        #[arg(short, long)]
        search: Option<String>,

        /// featured, name-asc, name-desc, price-low, price-high, rating or newest
        #[arg(long, default_value = "featured")]
        sort: ProductSort,
    },
    /// Show a product with related products
    Product { id: String },
    /// Show the demo cart
    Cart {
        /// Discount code to apply
        #[arg(short, long)]
        discount: Option<String>,

        /// Group lines by store
        #[arg(long)]
        by_store: bool,
    },
    /// Place an order from the demo cart
    Checkout {
        /// Delivery address id
        #[arg(short, long)]
        address: Option<String>,

        /// card, bank or cod
        #[arg(short, long, default_value = "card")]
        payment: PaymentMethod,
    },
    /// Log in to the demo account directory
    Login {
        #[arg(short, long)]
        email: Option<String>,

        /// Prompted when not given
        #[arg(long)]
        password: Option<String>,
    },
    /// Show or update the seller profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
}

#[derive(Subcommand)]
pub enum CatalogueAction {
    /// List catalogues with item counts
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a catalogue
    Create {
        #[arg(short, long)]
        name: String,

        /// products, services, food-drinks or fashion
        #[arg(short, long)]
        category: CatalogueCategory,

        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Change name, category and description
    Edit {
        id: String,

        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        category: CatalogueCategory,

        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Change public page colours and welcome message
    Customize {
        id: String,

        #[arg(long)]
        banner: Option<String>,

        #[arg(long)]
        accent: Option<String>,

        #[arg(long)]
        welcome: Option<String>,
    },
    /// Copy a catalogue and its items
    Duplicate { id: String },
    /// Delete a catalogue and its items
    Delete { id: String },
    /// Show or hide the public page
    ToggleVisibility { id: String },
    /// Print the share link
    Share { id: String },
    /// Item counts by status
    Stats { id: Option<String> },
}

#[derive(Subcommand)]
pub enum ItemAction {
    /// List items
    List {
        /// Catalogue id; items without a catalogue when omitted
        #[arg(short, long)]
        catalogue: Option<String>,
    },
    /// Add an item
    Add {
        #[arg(short, long)]
        catalogue: Option<String>,

        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        price: u64,

        #[arg(long, default_value = "")]
        category: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        image: String,

        /// Publish immediately instead of saving a draft
        #[arg(long)]
        publish: bool,
    },
    /// Edit an item
    Edit {
        #[arg(short, long)]
        catalogue: Option<String>,

        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        price: Option<u64>,

        #[arg(long)]
        category: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        image: Option<String>,
    },
    /// Delete an item
    Delete {
        #[arg(short, long)]
        catalogue: Option<String>,

        id: String,
    },
    /// Switch an item between draft and published
    Toggle {
        #[arg(short, long)]
        catalogue: Option<String>,

        id: String,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Update profile fields
    Set {
        #[arg(long)]
        business_name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        maps_link: Option<String>,
    },
    /// Set the logo from an image file
    Logo { path: PathBuf },
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr and, when the directory can be created, to a daily file
/// under `log_dir`. The returned guard must live until exit.
fn init_tracing(log_dir: &Path) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::fs::create_dir_all(log_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();
    guard
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = Config::load()
        .context("Failed to load config")?
        .with_env_overrides();
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = Some(dir);
    }
    let data_dir = config.data_dir()?;

    let _guard = init_tracing(&data_dir.join("logs"));
    info!(data_dir = %data_dir.display(), "Riba Market starting");

    let cache = LocalCache::open_dir(data_dir.clone())
        .with_context(|| format!("Failed to open cache at {}", data_dir.display()))?;
    let ctx = Context::new(cache.clone(), config, cli.json);

    let result = run(cli.command, &ctx);
    let closed = cache.close().context("Failed to save local cache");
    result?;
    closed
}

fn run(command: Commands, ctx: &Context) -> Result<()> {
    match command {
        Commands::Catalogue { action } => commands::catalogue::run(action, ctx),
        Commands::Item { action } => commands::item::run(action, ctx),
        Commands::Public { id, search, sort } => {
            commands::catalogue::public(ctx, &id, search.unwrap_or_default(), sort)
        }
        Commands::Products {
            category,
            min,
            max,
            verified,
            store_type,
            search,
            sort,
        } => commands::market::products(
            ctx,
            commands::market::ProductArgs {
                categories: category,
                min,
                max,
                verified,
                store_types: store_type,
                search: search.unwrap_or_default(),
                sort,
            },
        ),
        Commands::Product { id } => commands::market::product(ctx, &id),
        Commands::Cart { discount, by_store } => {
            commands::market::cart(ctx, discount.as_deref(), by_store)
        }
        Commands::Checkout { address, payment } => {
            commands::market::checkout(ctx, address.as_deref(), payment)
        }
        Commands::Login { email, password } => commands::account::login(ctx, email, password),
        Commands::Profile { action } => commands::account::profile(ctx, action),
    }
}
