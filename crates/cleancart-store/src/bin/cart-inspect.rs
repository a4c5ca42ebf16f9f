//! # Cart Inspector
//!
//! Prints or clears the persisted storefront cart.
//!
//! ## Usage
//! ```bash
//! # Show the cart from the configured database
//! cargo run -p cleancart-store --bin cart-inspect
//!
//! # Specify database path and key
//! cargo run -p cleancart-store --bin cart-inspect -- --db ./cart.db --key smart-cleaners-cart
//!
//! # Delete the persisted cart
//! cargo run -p cleancart-store --bin cart-inspect -- --clear
//! ```

use cleancart_core::Cart;
use cleancart_store::{CartStorage, CartStoreConfig, SqliteConfig, SqliteStorage};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cleancart=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_cart(cart: &Cart) {
    let summary = cart.summary();

    for line in &summary.lines {
        let bulk = if line.is_bulk_price { " (Bulk Price)" } else { "" };
        println!(
            "  {:<28} {:>4} × {:>10}{}  = {:>11}",
            line.name, line.quantity, line.effective_price, bulk, line.line_total
        );
        if let Some(hint) = line.next_tier {
            println!(
                "  {:<28} add {} more for {} each",
                "", hint.units_needed, hint.unit_price
            );
        }
    }

    println!();
    println!("Items ({})            {:>11}", summary.total_item_count, summary.subtotal);
    if summary.bulk_savings.is_positive() {
        println!("Bulk savings          -{:>11}", summary.bulk_savings);
    }
    println!("Shipping                     Free");
    println!("Total                  {:>11}", summary.total);
    println!();
    println!(
        "Badge: {}   Panel: {}",
        cart.badge_label().unwrap_or_else(|| "-".to_string()),
        if cart.is_open() { "open" } else { "closed" }
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = CartStoreConfig::load_or_default(None);

    let args: Vec<String> = env::args().collect();
    let mut db_path: PathBuf = config.database_path();
    let mut key = config.key().to_string();
    let mut clear = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--key" | "-k" => {
                if i + 1 < args.len() {
                    key = args[i + 1].clone();
                    i += 1;
                }
            }
            "--clear" => clear = true,
            "--help" | "-h" => {
                println!("CleanCart Cart Inspector");
                println!();
                println!("Usage: cart-inspect [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: from cart.toml)");
                println!("  -k, --key <KEY>    Storage key (default: {})", config.key());
                println!("      --clear        Delete the persisted cart");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    println!("🛒 CleanCart Cart Inspector");
    println!("===========================");
    println!("Database: {}", db_path.display());
    println!("Key:      {}", key);
    println!();

    let storage = SqliteStorage::new(SqliteConfig::new(&db_path)).await?;

    if clear {
        storage.remove(&key).await?;
        println!("✓ Persisted cart removed");
        return Ok(());
    }

    let Some(blob) = storage.load(&key).await? else {
        println!("No persisted cart under this key.");
        return Ok(());
    };

    let cart: Cart = serde_json::from_str(&blob)?;
    if let Some(updated_at) = storage.updated_at(&key).await? {
        println!("Last saved: {}", updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
        println!();
    }

    if cart.is_empty() {
        println!("Cart is empty.");
    } else {
        print_cart(&cart);
    }

    storage.close().await;
    Ok(())
}
