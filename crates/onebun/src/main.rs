//! OneBun - Entry Point
//!
//! Loads configuration, installs logging and bootstraps the demo
//! [`ShopModule`](onebun::demo::ShopModule), then prints how it was wired.
//!
//! | Flag | Description |
//! |------|-------------|
//! | `--config <path>` | TOML configuration file |
//! | `--log-level <level>` | Overrides `logging.level` |
//! | `--format text\|json` | Wiring report format |
//! | `--strict` | Fail on unresolved controller dependencies |
//! | `--add <product>` | Add products to the demo cart (repeatable) |

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use onebun::demo::{CartController, CatalogController, HealthController, ShopModule};
use onebun::domain::value_objects::WiringPolicy;
use onebun::infrastructure::{ConfigLoader, init_app, init_logging};

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Command line interface for the OneBun demo application
#[derive(Parser, Debug)]
#[command(name = "onebun")]
#[command(about = "OneBun - Bootstrap a module graph and report its wiring")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Wiring report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Abort when a controller dependency cannot be resolved
    #[arg(long)]
    pub strict: bool,

    /// Products to add to the demo cart
    #[arg(long = "add", value_name = "PRODUCT")]
    pub products: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let mut config = loader.load().context("loading configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.strict {
        config.wiring.policy = WiringPolicy::Strict;
    }

    init_logging(config.logging.clone()).context("initializing logging")?;

    let app = init_app::<ShopModule>(config).context("bootstrapping ShopModule")?;

    let report = app.wiring_report();
    match cli.format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if let Some(health) = app.controller::<HealthController>() {
        println!("health: {}", health.status());
    }
    if let Some(catalog) = app.controller::<CatalogController>() {
        println!("catalog: {}", catalog.list().await?.join(", "));
    }
    if let Some(cart) = app.controller::<CartController>() {
        for product in &cli.products {
            match cart.add(product).await {
                Ok(quantity) => println!("added {product} (x{quantity})"),
                Err(e) => eprintln!("cannot add {product}: {e}"),
            }
        }
        if !cli.products.is_empty() {
            println!("cart: {:?}", cart.items().await?);
        }
    }

    Ok(())
}
