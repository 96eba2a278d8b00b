//! Bookstore Repricer
//!
//! Loads a catalogue of books, prices each one in a local currency and
//! prints the calculation results as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookstore_common::{Currency, NewBook};
use bookstore_fx::{FixedRateProvider, HttpRateProvider, RateProvider};
use bookstore_inventory::{BookStore, InMemoryBookStore};
use bookstore_pricing::{PricingConfig, PricingEngine};

/// Recalculate local selling prices for a book catalogue
#[derive(Parser, Debug)]
#[command(name = "repricer")]
#[command(about = "Recalculate local selling prices for a book catalogue")]
struct Args {
    /// JSON file holding an array of books
    #[arg(short, long)]
    books: PathBuf,

    /// Target currency code; defaults to DEFAULT_CURRENCY
    #[arg(short, long)]
    currency: Option<String>,

    /// Skip the remote rate source and price with the default rate
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the results.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = PricingConfig::from_env().context("Configuration error")?;
    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let currency = args
        .currency
        .as_deref()
        .map(Currency::parse)
        .transpose()
        .context("Invalid --currency")?;

    info!(
        margin_percentage = config.profit_margin_percentage,
        default_currency = %config.rate_source.fallback.currency(),
        default_rate = %config.rate_source.fallback.rate(),
        offline = args.offline,
        "Starting repricer"
    );

    let raw = std::fs::read_to_string(&args.books)
        .with_context(|| format!("Failed to read {}", args.books.display()))?;
    let catalogue: Vec<NewBook> =
        serde_json::from_str(&raw).context("Book file must be a JSON array of books")?;

    let store = Arc::new(InMemoryBookStore::new());
    for book in catalogue {
        store.create(book).await?;
    }

    let rates: Arc<dyn RateProvider> = if args.offline {
        Arc::new(FixedRateProvider::new(config.rate_source.fallback.clone()))
    } else {
        Arc::new(HttpRateProvider::new(config.rate_source.clone())?)
    };

    let engine = PricingEngine::new(rates, store.clone(), &config);

    let mut results = Vec::new();
    for mut book in store.list().await? {
        match engine.compute(&mut book, currency.as_ref()).await {
            Ok(result) => results.push(result),
            Err(e) => error!(book_id = %book.id, error = %e, "Skipping book"),
        }
    }

    println!("{}", serde_json::to_string_pretty(&results)?);

    let snapshot = engine.metrics().snapshot();
    info!(
        priced = snapshot.calculations_succeeded,
        failed = snapshot.calculations_failed,
        live_rates = snapshot.live_rates,
        fallback_rates = snapshot.fallback_rates,
        "Repricing complete"
    );

    Ok(())
}
