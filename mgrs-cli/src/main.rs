//! Point d'entrée CLI pour mgrs-cli

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

use mgrs_cli::Config;

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::Commands;

/// Convertir des coordonnées WGS84 en MGRS et inversement
#[derive(Parser)]
#[command(name = "mgrs-cli")]
#[command(author, version)]
#[command(about = "Convertir des coordonnées WGS84 (lat/lon) en MGRS et inversement")]
#[command(long_about = "Conversions WGS84 géodésique <-> UTM <-> MGRS.\n\nUtilisez 'batch' pour convertir un fichier entier en parallèle.")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Fichier de configuration JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    let config = Config::resolve(cli.config.as_deref())?;
    debug!(?config, "Configuration");

    match cli.command {
        Commands::ToMgrs {
            lat,
            lon,
            zone,
            precision,
            format,
        } => {
            cli::cmd_to_mgrs(&config, lat, lon, zone, precision, format)?;
        }
        Commands::FromMgrs { mgrs, format } => {
            cli::cmd_from_mgrs(&config, &mgrs, format)?;
        }
        Commands::Batch(args) => {
            cli::cmd_batch(&config, &args)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // stderr : stdout est réservé aux résultats
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
