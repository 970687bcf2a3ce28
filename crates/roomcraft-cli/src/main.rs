use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "roomcraft")]
#[command(about = "Roomcraft CLI - inspect the design configuration and product catalog", long_about = None)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or initialize the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Inspect the product catalog
    Catalog {
        #[command(flatten)]
        feed: FeedArgs,

        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Estimate the footprint of a piece of furniture
    Estimate {
        #[arg(long = "type")]
        product_type: String,
        #[arg(long)]
        subtype: String,
        /// Room floor area in square feet
        #[arg(long)]
        room_area: f64,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Write the built-in defaults to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
struct FeedArgs {
    /// Product feed file or URL (defaults to `product_feed_url` from the config)
    #[arg(long, global = true)]
    feed: Option<String>,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Print product, website and category counts
    Stats,
    /// List furniture types, or the subtypes of one type
    Types {
        #[arg(long = "type")]
        product_type: Option<String>,
    },
    /// List the types and subtypes sold by a theme's retailers
    Theme { name: String },
    /// Search for products the way a design session does
    Search {
        #[arg(long = "type")]
        product_type: String,
        #[arg(long)]
        subtype: String,
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        min_price: f64,
        #[arg(long)]
        max_price: f64,
        #[arg(long, default_value_t = roomcraft_core::catalog::MATCHES_PER_SELECTION)]
        limit: usize,
        /// Print the matches as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    roomcraft_infrastructure::init_tracing()?;

    let cli = Cli::parse();
    let config_service = commands::config_service(cli.config)?;

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config_service).await?,
            ConfigAction::Init { force } => commands::config::init(&config_service, force).await?,
        },
        Commands::Catalog { feed, action } => {
            let config = config_service.load().await?;
            let index = commands::catalog::load_index(feed.feed.as_deref(), &config).await?;
            match action {
                CatalogAction::Stats => commands::catalog::stats(&index),
                CatalogAction::Types { product_type } => {
                    commands::catalog::types(&index, product_type.as_deref())
                }
                CatalogAction::Theme { name } => commands::catalog::theme(&index, &config, &name)?,
                CatalogAction::Search {
                    product_type,
                    subtype,
                    theme,
                    min_price,
                    max_price,
                    limit,
                    json,
                } => commands::catalog::search(
                    index,
                    &config,
                    commands::catalog::SearchArgs {
                        product_type: &product_type,
                        subtype: &subtype,
                        theme: theme.as_deref(),
                        min_price,
                        max_price,
                        limit,
                        json,
                    },
                )?,
            }
        }
        Commands::Estimate {
            product_type,
            subtype,
            room_area,
        } => {
            let config = config_service.load().await?;
            commands::estimate::run(&config, &product_type, &subtype, room_area).await?
        }
    }

    Ok(())
}
