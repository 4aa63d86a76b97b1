//! Wardrobe CLI - profile and product screens in the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the signed-in user
//! wardrobe profile show
//!
//! # Change the name on the profile
//! wardrobe profile edit --first-name Lin --last-name Wei
//!
//! # Browse the catalogue through the local dev proxy
//! wardrobe products list --search coat --page 2 --via-proxy
//! wardrobe products show 42
//! wardrobe categories
//!
//! # Boutiques and their in-store terminals
//! wardrobe boutiques show 3
//! wardrobe terminals list --boutique 3
//!
//! # Build an image URL
//! wardrobe asset-url 3f1c... --thumbnail 200
//! ```
//!
//! Connection settings come from the environment or a `.env` file (see
//! `wardrobe_storefront::config`). Logs go to stderr; `RUST_LOG` controls
//! verbosity.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use url::Url;
use wardrobe_storefront::{StorefrontClient, StorefrontConfig, TerminalRegistration};

mod commands;

use commands::{CliError, Output};

/// Proxy address used by `--via-proxy` without a value.
const DEFAULT_PROXY_URL: &str = "http://localhost:3001";

#[derive(Parser)]
#[command(name = "wardrobe")]
#[command(author, version, about = "Wardrobe storefront CLI")]
struct Cli {
    /// Send GraphQL requests through the dev proxy
    #[arg(
        long,
        global = true,
        value_name = "URL",
        num_args = 0..=1,
        default_missing_value = DEFAULT_PROXY_URL
    )]
    via_proxy: Option<Url>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// View or edit the signed-in user's profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// List product categories
    Categories,
    /// Browse boutiques
    Boutiques {
        #[command(subcommand)]
        action: BoutiquesAction,
    },
    /// In-store terminal devices
    Terminals {
        #[command(subcommand)]
        action: TerminalsAction,
    },
    /// Print the URL of an uploaded file
    AssetUrl {
        /// File ID
        id: String,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,

        /// Image quality (1-100)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: Option<u8>,

        /// Square thumbnail of this size at quality 80; overrides the other options
        #[arg(long, value_name = "SIZE", conflicts_with_all = ["width", "height", "quality"])]
        thumbnail: Option<u32>,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show the current user
    Show,
    /// Change first and/or last name
    Edit {
        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Only products in this category
        #[arg(long, value_name = "ID")]
        category: Option<String>,

        /// Search term
        #[arg(long)]
        search: Option<String>,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Products per page
        #[arg(long, default_value_t = wardrobe_storefront::directus::DEFAULT_PAGE_SIZE)]
        page_size: u32,
    },
    /// Show one product
    Show {
        /// Product ID
        id: String,
    },
}

#[derive(Subcommand)]
enum BoutiquesAction {
    /// List all boutiques
    List,
    /// Show one boutique
    Show {
        /// Boutique ID
        id: String,
    },
}

#[derive(Subcommand)]
enum TerminalsAction {
    /// List the terminals authorized for a boutique
    List {
        #[arg(long, value_name = "ID")]
        boutique: String,
    },
    /// Look up a terminal by its Android ID
    Find { android_id: String },
    /// Create or update the record for a device
    Register {
        android_id: String,

        #[arg(long)]
        brand: Option<String>,

        #[arg(long)]
        manufacturer: Option<String>,

        #[arg(long = "model")]
        model_name: Option<String>,

        /// phone, tablet, desktop or tv
        #[arg(long)]
        device_type: Option<String>,

        #[arg(long)]
        os_name: Option<String>,

        #[arg(long)]
        os_version: Option<String>,

        #[arg(long)]
        cpu_architectures: Option<String>,

        /// Total memory in bytes
        #[arg(long)]
        total_memory: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Before the subscriber so RUST_LOG from .env applies
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wardrobe_cli=warn,wardrobe_storefront=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(proxy) = cli.via_proxy {
        config = config.via_proxy(proxy);
    }
    tracing::debug!(?config, "Loaded configuration");

    let client = StorefrontClient::new(&config)?;
    let out = Output::new(cli.json);

    match cli.command {
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(&client, &out).await,
            ProfileAction::Edit {
                first_name,
                last_name,
            } => commands::profile::edit(&client, &out, first_name, last_name).await,
        },
        Commands::Products { action } => match action {
            ProductsAction::List {
                category,
                search,
                page,
                page_size,
            } => {
                let query = commands::products::list_query(category, search, page, page_size);
                commands::products::list(&client, &out, &query).await
            }
            ProductsAction::Show { id } => commands::products::show(&client, &out, &id).await,
        },
        Commands::Categories => commands::products::categories(&client, &out).await,
        Commands::Boutiques { action } => match action {
            BoutiquesAction::List => commands::boutiques::list(&client, &out).await,
            BoutiquesAction::Show { id } => commands::boutiques::show(&client, &out, &id).await,
        },
        Commands::Terminals { action } => match action {
            TerminalsAction::List { boutique } => {
                commands::boutiques::terminals(&client, &out, &boutique).await
            }
            TerminalsAction::Find { android_id } => {
                commands::boutiques::find_terminal(&client, &out, &android_id).await
            }
            TerminalsAction::Register {
                android_id,
                brand,
                manufacturer,
                model_name,
                device_type,
                os_name,
                os_version,
                cpu_architectures,
                total_memory,
            } => {
                let registration = TerminalRegistration {
                    android_id: android_id.trim().to_string(),
                    brand,
                    manufacturer,
                    model_name,
                    device_type,
                    os_name,
                    os_version,
                    supported_cpu_architectures: cpu_architectures,
                    total_memory,
                };
                commands::boutiques::register_terminal(&client, &out, &registration).await
            }
        },
        Commands::AssetUrl {
            id,
            width,
            height,
            quality,
            thumbnail,
        } => commands::assets::asset_url(&client, &out, &id, width, height, quality, thumbnail),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_via_proxy_default() {
        let cli = Cli::try_parse_from(["wardrobe", "categories", "--via-proxy"]).unwrap();
        assert_eq!(
            cli.via_proxy.unwrap().as_str(),
            "http://localhost:3001/"
        );
    }

    #[test]
    fn test_via_proxy_explicit_url() {
        let cli =
            Cli::try_parse_from(["wardrobe", "--via-proxy=http://10.0.0.5:4000", "categories"])
                .unwrap();
        assert_eq!(cli.via_proxy.unwrap().as_str(), "http://10.0.0.5:4000/");

        let cli = Cli::try_parse_from(["wardrobe", "categories"]).unwrap();
        assert!(cli.via_proxy.is_none());
    }

    #[test]
    fn test_terminal_commands() {
        let cli =
            Cli::try_parse_from(["wardrobe", "terminals", "list", "--boutique", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Terminals {
                action: TerminalsAction::List { ref boutique }
            } if boutique == "3"
        ));

        let cli = Cli::try_parse_from([
            "wardrobe", "terminals", "register", "a-1", "--brand", "Xiaomi", "--model", "Pad 6",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Terminals {
                action: TerminalsAction::Register { ref model_name, ref os_name, .. }
            } if model_name.as_deref() == Some("Pad 6") && os_name.is_none()
        ));

        assert!(Cli::try_parse_from(["wardrobe", "terminals", "list"]).is_err());
    }

    #[test]
    fn test_page_starts_at_one() {
        assert!(Cli::try_parse_from(["wardrobe", "products", "list", "--page", "0"]).is_err());

        let cli = Cli::try_parse_from(["wardrobe", "products", "list", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Products {
                action: ProductsAction::List { page: 1, page_size: 10, .. }
            }
        ));
    }
}
