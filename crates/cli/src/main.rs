//! GoMarket CLI - Inspect and edit the stored cart.
//!
//! # Usage
//!
//! ```bash
//! # Show cart lines and totals
//! gm-cli show
//!
//! # Add one unit of a product
//! gm-cli add --id 1 --title Shirt --image-url http://img/shirt.png --price 59.90
//!
//! # Change the quantity of a line
//! gm-cli increment 1
//! gm-cli decrement 1
//!
//! # Use a different storage directory
//! gm-cli --storage-dir /tmp/cart show
//! ```
//!
//! # Commands
//!
//! - `show` - Print cart lines and totals
//! - `add` - Add one unit of a product
//! - `increment` / `decrement` - Change a line's quantity by one

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use go_market_cart::CartConfig;
use go_market_core::{NewCartItem, Price, ProductId};

mod commands;

#[derive(Parser)]
#[command(name = "gm-cli")]
#[command(author, version, about = "GoMarket cart tools")]
struct Cli {
    /// Directory holding the stored cart (overrides `GOMARKET_STORAGE_DIR`)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print cart lines and totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Product title
        #[arg(long)]
        title: String,

        /// Product image URL
        #[arg(long)]
        image_url: String,

        /// Unit price (e.g. 59.90)
        #[arg(long)]
        price: Price,
    },
    /// Add one unit to an existing line
    Increment {
        /// Product ID
        id: String,
    },
    /// Remove one unit from an existing line
    Decrement {
        /// Product ID
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for the CLI if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "go_market_cli=info,go_market_cart=warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CartConfig::from_env()?;
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }

    match cli.command {
        Commands::Show => commands::cart::show(&config).await?,
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => {
            let item = NewCartItem {
                id: ProductId::new(id),
                title,
                image_url,
                price,
            };
            commands::cart::add(&config, item).await?;
        }
        Commands::Increment { id } => {
            commands::cart::increment(&config, &ProductId::new(id)).await?;
        }
        Commands::Decrement { id } => {
            commands::cart::decrement(&config, &ProductId::new(id)).await?;
        }
    }
    Ok(())
}
