#![warn(clippy::pedantic)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use formcue_domain::{self as domain, AssetValidator, CatalogRepository};
use formcue_storage as storage;
use log::{debug, info};
use tokio::io::AsyncReadExt;

mod config;
mod logger;
mod output;

/// Resolve free-form exercise names to catalog content.
#[derive(Parser, Debug)]
#[command(name = "formcue", version)]
struct Args {
    /// JSON catalog, the built-in catalog is used if omitted
    #[arg(short, long, env = "FORMCUE_CATALOG")]
    catalog: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, env = "FORMCUE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory containing the catalog assets; assets are not checked if omitted
    #[arg(short, long, env = "FORMCUE_ASSETS")]
    assets: Option<PathBuf>,

    /// Increase log verbosity (overridden by FORMCUE_LOG)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a single exercise name
    Resolve {
        name: String,
        #[command(flatten)]
        hints: Hints,
    },
    /// Resolve all exercises of a workout given as JSON array (file or stdin)
    Preload {
        workout: Option<PathBuf>,
        #[command(flatten)]
        hints: Hints,
        /// Print resolution metrics after the batch
        #[arg(long)]
        metrics: bool,
    },
    /// List the catalog entries
    Catalog {
        /// Print the catalog as JSON document
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
struct Hints {
    /// Muscle group hint, e.g. "legs"
    #[arg(long)]
    muscle_group: Option<String>,
    /// Equipment hint, e.g. "barbell"
    #[arg(long)]
    equipment: Option<String>,
}

impl From<Hints> for domain::MatchHints {
    fn from(value: Hints) -> Self {
        Self {
            muscle_group: value.muscle_group,
            equipment: value.equipment,
        }
    }
}

enum Catalog {
    Builtin(storage::BuiltinCatalog),
    Json(storage::JsonCatalog),
}

impl CatalogRepository for Catalog {
    async fn read_catalog(&self) -> Result<Vec<domain::CatalogEntry>, domain::CatalogLoadError> {
        match self {
            Catalog::Builtin(catalog) => catalog.read_catalog().await,
            Catalog::Json(catalog) => catalog.read_catalog().await,
        }
    }
}

enum Assets {
    Unchecked(storage::AcceptAllAssets),
    Local(storage::LocalAssets),
}

impl AssetValidator for Assets {
    async fn asset_exists(&self, asset: &domain::AssetRef) -> bool {
        match self {
            Assets::Unchecked(assets) => assets.asset_exists(asset).await,
            Assets::Local(assets) => assets.asset_exists(asset).await,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logger::init(logger::level(
        args.verbose,
        std::env::var("FORMCUE_LOG").ok().as_deref(),
    ))
    .context("failed to initialize logger")?;

    let config = config::load(args.config.as_deref()).await?;
    debug!("{config:?}");

    let catalog = match args.catalog {
        Some(path) => Catalog::Json(storage::JsonCatalog::new(path)),
        None => Catalog::Builtin(storage::BuiltinCatalog),
    };
    let assets = match args.assets {
        Some(root) => Assets::Local(storage::LocalAssets::new(root)),
        None => Assets::Unchecked(storage::AcceptAllAssets),
    };

    let engine = domain::Engine::new(catalog, assets, config).context("invalid configuration")?;
    let version = engine.rebuild().await;
    info!(
        "using catalog version {version} with {} entries",
        engine.catalog().len()
    );

    match args.command {
        Command::Resolve { name, hints } => {
            let result = engine.resolve_one(&name, &hints.into());
            print_json(&output::Resolution::new(&name, &result))?;
        }
        Command::Preload {
            workout,
            hints,
            metrics,
        } => {
            let exercises = output::parse_workout(&read_input(workout).await?)
                .context("invalid workout")?;
            let batch = engine.preload_workout(&exercises, &hints.into()).await;
            print_json(&output::Batch::new(&exercises, &batch))?;
            if metrics {
                print_json(&output::Metrics::from(&engine.metrics()))?;
            }
        }
        Command::Catalog { json } => {
            let catalog = engine.catalog();
            if json {
                let entries = catalog
                    .entries()
                    .map(|e| e.as_ref().clone())
                    .collect::<Vec<_>>();
                println!("{}", storage::json::to_json(&entries)?);
            } else {
                for entry in catalog.entries() {
                    println!("{}\t{}", entry.id, entry.name);
                }
            }
        }
    }

    Ok(())
}

async fn read_input(path: Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
