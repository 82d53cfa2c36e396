//! Tindahan CLI - Database migrations, validator checks and order tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! td-cli migrate
//!
//! # Check input against the form rules
//! td-cli check mobile "956 837 0169"
//! td-cli check mobile "+63 956 837 0169" --lenient
//! td-cli check password 'Abcdef1!'
//! td-cli check address --region NCR --citymun "Quezon City" \
//!     --barangay Bagumbayan --street "12 Mabini St." --postal-code 1110
//!
//! # Move an order to a new status
//! td-cli order status 42 "Out for Delivery"
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `check` - Run a validator and print the result
//! - `order status` - Update an order status through the status tracker

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tindahan_core::{OrderId, OrderStatus};

mod commands;

#[derive(Parser)]
#[command(name = "td-cli")]
#[command(author, version, about = "Tindahan CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Run a validator against a value
    Check {
        /// Print field errors as JSON
        #[arg(long, global = true)]
        json: bool,

        #[command(subcommand)]
        target: CheckTarget,
    },
    /// Manage orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum CheckTarget {
    /// Check a mobile number (strict `956 837 0169` format by default)
    Mobile {
        value: String,

        /// Use the checkout rule (punctuation dropped, `+63` accepted)
        #[arg(long)]
        lenient: bool,
    },
    /// Check password strength
    Password { value: String },
    /// Resolve an address
    Address(commands::check::AddressArgs),
}

#[derive(Subcommand)]
enum OrderAction {
    /// Set the status of an order
    Status {
        /// Order ID
        order_id: OrderId,

        /// New status (e.g. "Processing", "Out for Delivery")
        status: OrderStatus,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
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
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Check { json, target } => {
            let outcome = match target {
                CheckTarget::Mobile { value, lenient } => {
                    commands::check::mobile(&value, lenient)
                }
                CheckTarget::Password { value } => commands::check::password(&value),
                CheckTarget::Address(args) => commands::check::address(&args),
            };
            commands::check::report(outcome, json)?;
        }
        Commands::Order { action } => match action {
            OrderAction::Status { order_id, status } => {
                commands::order::set_status(order_id, status).await?;
            }
        },
    }
    Ok(())
}
