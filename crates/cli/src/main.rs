//! Shopmint CLI - drive the storefront engine from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! shopmint shop products --limit 10
//!
//! # Build a cart and check out
//! shopmint cart add 42 --quantity 2
//! shopmint cart promo SAVE10
//! shopmint cart totals
//! shopmint cart checkout
//!
//! # Wishlist
//! shopmint wishlist add 42
//! shopmint wishlist move 42
//!
//! # Account
//! shopmint account login -e you@example.com -p <password>
//! shopmint orders list
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPMINT_API_URL` - Base URL of the commerce backend (required)
//! - `SHOPMINT_DATA_DIR` - Directory for local snapshots

#![cfg_attr(not(test), forbid(unsafe_code))]
// Command output goes to stdout by design.
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shopmint")]
#[command(author, version, about = "Shopmint storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog and active promotions
    Shop {
        #[command(subcommand)]
        action: commands::shop::ShopAction,
    },
    /// Manage the cart and check out
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: commands::wishlist::WishlistAction,
    },
    /// View and cancel orders
    Orders {
        #[command(subcommand)]
        action: commands::orders::OrdersAction,
    },
    /// Sign in, register, sign out
    Account {
        #[command(subcommand)]
        action: commands::account::AccountAction,
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
    let mut engine = shopmint_storefront::Storefront::from_env()?;

    match cli.command {
        Commands::Shop { action } => commands::shop::run(&engine, action).await?,
        Commands::Cart { action } => commands::cart::run(&mut engine, action).await?,
        Commands::Wishlist { action } => commands::wishlist::run(&mut engine, action).await?,
        Commands::Orders { action } => commands::orders::run(&engine, action).await?,
        Commands::Account { action } => commands::account::run(&mut engine, action).await?,
    }

    Ok(())
}
