//! # Seed Data Generator
//!
//! Populates the database with suppliers, categories, purchases and
//! production runs for development.
//!
//! ## Usage
//! ```bash
//! # 10 suppliers (default), random data
//! cargo run -p mill-db --bin mill-seed
//!
//! # Reproducible run against a specific file
//! cargo run -p mill-db --bin mill-seed -- --db ./data/mill.db --seed 42
//!
//! # More suppliers, bigger opening capital
//! cargo run -p mill-db --bin mill-seed -- --suppliers 25 --opening-capital 2500000
//!
//! # Credit purchases only
//! cargo run -p mill-db --bin mill-seed -- --payment-type credit
//! ```
//!
//! ## Generated Data
//! - Opening capital, moved entirely into cash in hand
//! - Suppliers, each with 2-5 purchases (Cash or Credit, unless `--payment-type` is given)
//! - 2-5 production runs per supplier
//!
//! Every record goes through the same repositories the server uses, so a
//! Cash purchase the cash cannot cover, or a production run larger than the
//! munji in stock, is rejected and counted rather than written.

use anyhow::Context;
use clap::Parser;
use mill_core::{Money, NewProduction, NewPurchase, PaymentType};
use mill_db::{Database, DbConfig, DbError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

const CATEGORIES: &[&str] = &["Basmati", "Super Kernel", "IRRI-6", "Sella", "Brown"];

const SUPPLIER_PREFIXES: &[&str] = &[
    "Al-Noor", "Punjab", "Indus", "Green Valley", "Chenab", "Ravi", "Sialkot", "Kasur",
];

#[derive(Parser, Debug)]
#[command(name = "mill-seed")]
#[command(about = "Populate a mill ledger database with development data")]
struct Args {
    /// Database file path.
    #[arg(short, long, env = "MILL_DATABASE_PATH", default_value = "./mill_dev.db")]
    db: String,

    /// Number of suppliers to generate.
    #[arg(short, long, default_value_t = 10)]
    suppliers: usize,

    /// RNG seed for reproducible data.
    #[arg(long)]
    seed: Option<u64>,

    /// Capital injected (and moved to cash) before any purchase.
    #[arg(long, default_value = "500000.00")]
    opening_capital: Money,

    /// Use this payment type (`cash` or `credit`) for every purchase
    /// instead of picking one at random.
    #[arg(long)]
    payment_type: Option<PaymentType>,
}

#[derive(Debug, Default)]
struct Tally {
    purchases: usize,
    productions: usize,
    rejected: usize,
}

impl Tally {
    /// Counts domain rejections; any other error aborts the run.
    fn record<T>(&mut self, result: Result<T, DbError>) -> anyhow::Result<bool> {
        match result {
            Ok(_) => Ok(true),
            Err(DbError::Rejected(e)) => {
                println!("  ⚠ rejected: {}", e);
                self.rejected += 1;
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    println!("🌾 Mill Ledger Seed Data Generator");
    println!("==================================");
    println!("Database:  {}", args.db);
    println!("Suppliers: {}", args.suppliers);
    println!();

    let db = Database::new(DbConfig::new(&args.db))
        .await
        .context("failed to open database")?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.suppliers().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} suppliers", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    db.ledger().add_capital(args.opening_capital).await?;
    db.ledger().move_capital_to_cash(args.opening_capital).await?;
    println!("✓ Opening cash: {}", args.opening_capital);

    let mut categories = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        categories.push(db.categories().create(name).await?);
    }
    println!("✓ {} categories", categories.len());

    println!();
    println!("Generating records...");

    let start = std::time::Instant::now();
    let mut tally = Tally::default();

    for index in 0..args.suppliers {
        let prefix = SUPPLIER_PREFIXES[index % SUPPLIER_PREFIXES.len()];
        let supplier = db
            .suppliers()
            .create(&format!("{} Traders {}", prefix, index + 1))
            .await?;

        for _ in 0..rng.random_range(2..=5) {
            let category = &categories[rng.random_range(0..categories.len())];
            let request = NewPurchase {
                supplier_id: supplier.id.clone(),
                category_id: category.id.clone(),
                total_bags: rng.random_range(10..=100),
                quantity: amount(&mut rng, 10, 200),
                unit_price: amount(&mut rng, 50, 500),
                total_price: None,
                payment_type: payment_type(&mut rng, args.payment_type),
            };
            if tally.record(db.purchases().create(&request).await)? {
                tally.purchases += 1;
            }
        }

        for _ in 0..rng.random_range(2..=5) {
            let request = NewProduction {
                quantity_produced: amount(&mut rng, 50, 500),
                dryer_cost: amount(&mut rng, 100, 500),
                factory_cost: amount(&mut rng, 200, 1000),
                wastage: fraction(&mut rng, 1, 10),
                quality_of_rice: fraction(&mut rng, 70, 95),
                unit_price: amount(&mut rng, 50, 200),
                total_quality: None,
                total_price: None,
                naku_price: amount(&mut rng, 5, 20),
                naku_quantity: amount(&mut rng, 10, 100),
            };
            if tally.record(db.productions().create(&request).await)? {
                tally.productions += 1;
            }
        }
    }

    let elapsed = start.elapsed();
    let ledger = db.ledger().get().await?;

    println!();
    println!(
        "✓ {} purchases, {} productions in {:?} ({} rejected)",
        tally.purchases, tally.productions, elapsed, tally.rejected
    );
    println!("  Cash in hand:    {}", ledger.cash_in_hand());
    println!("  Munji inventory: {}", ledger.munji_inventory());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// A 2-place amount in `[min, max]`.
fn amount(rng: &mut StdRng, min: i64, max: i64) -> Money {
    Money::from_hundredths(rng.random_range(min * 100..=max * 100))
}

/// A 2-place fraction between `min`% and `max`%.
fn fraction(rng: &mut StdRng, min: i64, max: i64) -> Money {
    Money::from_hundredths(rng.random_range(min..=max))
}

fn payment_type(rng: &mut StdRng, fixed: Option<PaymentType>) -> PaymentType {
    fixed.unwrap_or_else(|| {
        if rng.random_bool(0.5) {
            PaymentType::Cash
        } else {
            PaymentType::Credit
        }
    })
}
