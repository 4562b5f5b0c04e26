//! Delicious Bakers CLI - browse the menu, manage the cart and place orders.
//!
//! # Usage
//!
//! ```bash
//! # Browse the menu
//! bakers menu --category Cakes
//! bakers menu --featured
//!
//! # Manage the cart
//! bakers cart add 9b2e
//! bakers cart update 9b2e 3
//! bakers cart show
//!
//! # Check out
//! bakers checkout --name "Asha Rao" --email asha@bakery.in --phone "98765 43210" --date 2026-11-02
//!
//! # Add a product with its photo
//! bakers admin add-product --name "Fudge Brownie" --description "Dense" \
//!     --price 15 --category Brownies --image brownie.png
//! ```
//!
//! # Commands
//!
//! - `menu` / `categories` - Read the catalog
//! - `cart` - Show and change the saved cart
//! - `checkout` - Submit the cart as an order
//! - `contact` - Send a message to the bakery
//! - `admin add-product` - Add a product
//!
//! Cart commands other than `cart add` work offline.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use delicious_bakers_core::Email;
use delicious_bakers_storefront::config::{CartConfig, SupabaseConfig};
use delicious_bakers_storefront::error::Result;
use delicious_bakers_storefront::notify::RecordingNotifier;
use delicious_bakers_storefront::services::checkout::OrderForm;
use delicious_bakers_storefront::services::contact::ContactForm;
use delicious_bakers_storefront::state::AppState;

mod commands;

#[derive(Parser)]
#[command(name = "bakers")]
#[command(author, version, about = "Delicious Bakers storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Menu {
        /// Only show this category ("All" shows everything)
        #[arg(short, long)]
        category: Option<String>,

        /// Only show featured products
        #[arg(short, long)]
        featured: bool,
    },
    /// List product categories
    Categories,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Submit the cart as an order
    Checkout {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: Email,

        #[arg(long)]
        phone: String,

        /// Delivery date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Special requests
        #[arg(long)]
        notes: Option<String>,
    },
    /// Send a message to the bakery
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: Email,

        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        message: String,
    },
    /// Catalog management
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: String,
    },
    /// Remove a line
    Remove {
        /// Product id
        id: String,
    },
    /// Set a line's quantity (0 or less removes it)
    Update {
        /// Product id
        id: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every line
    Clear,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Upload a photo and add a product
    AddProduct {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        price: Decimal,

        #[arg(long)]
        category: String,

        /// Image file to upload
        #[arg(long)]
        image: PathBuf,

        /// Show on the home page
        #[arg(long)]
        featured: bool,
    },
}

impl Commands {
    /// Whether the command talks to the backend.
    const fn needs_backend(&self) -> bool {
        match self {
            Self::Cart { action } => matches!(action, CartAction::Add { .. }),
            _ => true,
        }
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "delicious_bakers_storefront=info,bakers=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let notifier = Arc::new(RecordingNotifier::new());

    let result = run(cli, Arc::clone(&notifier)).await;
    commands::print_notifications(&notifier.take());

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        commands::print_error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, notifier: Arc<RecordingNotifier>) -> Result<()> {
    let supabase = if cli.command.needs_backend() {
        Some(SupabaseConfig::from_env()?)
    } else {
        None
    };
    let state = AppState::new(&CartConfig::from_env(), supabase.as_ref(), notifier)?;

    match cli.command {
        Commands::Menu { category, featured } => {
            commands::catalog::menu(&state, category.as_deref(), featured).await?;
        }
        Commands::Categories => commands::catalog::categories(&state).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state),
            CartAction::Add { id } => commands::cart::add(&state, &id).await?,
            CartAction::Remove { id } => commands::cart::remove(&state, &id)?,
            CartAction::Update { id, quantity } => commands::cart::update(&state, &id, quantity)?,
            CartAction::Clear => commands::cart::clear(&state)?,
        },
        Commands::Checkout {
            name,
            email,
            phone,
            date,
            notes,
        } => {
            let form = OrderForm {
                name,
                email,
                phone,
                delivery_date: date,
                special_requests: notes,
            };
            commands::orders::checkout(&state, &form).await?;
        }
        Commands::Contact {
            name,
            email,
            subject,
            message,
        } => {
            let form = ContactForm {
                name,
                email,
                subject,
                message,
            };
            commands::orders::contact(&state, form).await?;
        }
        Commands::Admin { action } => match action {
            AdminAction::AddProduct {
                name,
                description,
                price,
                category,
                image,
                featured,
            } => {
                commands::admin::add_product(
                    &state,
                    commands::admin::ProductArgs {
                        name,
                        description,
                        price,
                        category,
                        image,
                        featured,
                    },
                )
                .await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_cart_commands() {
        let cli = Cli::try_parse_from(["bakers", "cart", "update", "9b2e", "-1"]).unwrap();
        assert!(!cli.command.needs_backend());

        let cli = Cli::try_parse_from(["bakers", "cart", "add", "9b2e"]).unwrap();
        assert!(cli.command.needs_backend());

        let cli = Cli::try_parse_from(["bakers", "menu", "--featured"]).unwrap();
        assert!(cli.command.needs_backend());
    }

    #[test]
    fn test_checkout_rejects_bad_email() {
        let result = Cli::try_parse_from([
            "bakers", "checkout", "--name", "Asha", "--email", "not-an-email", "--phone", "1",
            "--date", "2026-11-02",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
