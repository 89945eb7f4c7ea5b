//! Threadline CLI - Browse the storefront API and generate mock data.
//!
//! # Usage
//!
//! ```bash
//! # List in-stock blue jeans under $80, cheapest first
//! threadline products --category Jeans --color Blue --max-price 80 --in-stock --sort price-asc
//!
//! # Same filters, taken from a storefront URL query string
//! threadline products --query 'category=Jeans&colors=Blue&maxPrice=80&inStock=true'
//!
//! # Fetch one order, normalized
//! threadline get orders 65ab12cd34ef56ab78cd90ef
//!
//! # Write a deterministic mock catalog
//! threadline seed --count 50 --seed 7 --out catalog.json
//! ```
//!
//! # Commands
//!
//! - `products` - Fetch and filter the product listing
//! - `get` - Fetch any resource list or record
//! - `seed` - Generate mock catalog data
//! - `policies` - Show the cache policy table
//!
//! `THREADLINE_API_URL` (and optionally `THREADLINE_API_TOKEN`) must be set
//! for commands that talk to the API; a `.env` file is honoured.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use threadline_storefront::filters::SortBy;
use threadline_storefront::query::CacheClass;
use threadline_storefront::resource::Resource;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "threadline")]
#[command(author, version, about = "Threadline storefront tools")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the product listing and apply filters
    Products(ProductArgs),
    /// Fetch a resource list, or one record by id
    Get {
        /// Resource name (products, orders, reviews, coupons, categories, users)
        resource: Resource,

        /// Record id; omit to fetch the whole list
        id: Option<String>,

        /// Cache class used for the request
        #[arg(long, default_value = "dynamic")]
        class: CacheClass,

        /// Print the payload as received, without normalizing
        #[arg(long)]
        raw: bool,
    },
    /// Generate a deterministic mock catalog
    Seed {
        /// Number of products to generate
        #[arg(short, long, default_value_t = 24)]
        count: usize,

        /// RNG seed
        #[arg(short, long, default_value_t = 1)]
        seed: u64,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Print the cache policy table
    Policies,
}

/// Product listing filters. Flags override values from `--query`.
#[derive(Args)]
struct ProductArgs {
    /// Free-text search over name, description and category
    #[arg(long)]
    search: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    min_price: Option<Decimal>,

    #[arg(long)]
    max_price: Option<Decimal>,

    /// Color to match (repeatable)
    #[arg(long = "color")]
    colors: Vec<String>,

    /// Size to match (repeatable)
    #[arg(long = "size")]
    sizes: Vec<String>,

    #[arg(long)]
    style: Option<String>,

    /// Only products with stock
    #[arg(long)]
    in_stock: bool,

    /// price-asc, price-desc, newest or most-popular
    #[arg(long)]
    sort: Option<SortBy>,

    /// Storefront URL query string to start from
    #[arg(long)]
    query: Option<String>,
}

fn init_tracing(json: bool) {
    // Defaults to info for our crates if RUST_LOG is not set
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("threadline=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Products(args) => commands::products::run(args).await?,
        Commands::Get {
            resource,
            id,
            class,
            raw,
        } => commands::get::run(resource, id.as_deref(), class, raw).await?,
        Commands::Seed { count, seed, out } => {
            commands::seed::run(count, seed, out.as_deref()).await?;
        }
        Commands::Policies => commands::policies::run()?,
    }
    Ok(())
}
