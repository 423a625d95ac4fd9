//! Définition et implémentation des commandes CLI
//!
//! - `to-mgrs` : position WGS84 → MGRS
//! - `from-mgrs` : MGRS → position WGS84 (coin sud-ouest de la cellule)
//! - `batch` : fichier ou stdin, conversion parallèle avec rapport

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::{debug, info, warn};

use mgrs::GeodeticCoordinate;
use mgrs_cli::batch::{self, BatchOptions, Direction, Entry, Outcome, Record};
use mgrs_cli::export;
use mgrs_cli::{BatchReport, BatchStatus, Config, OutputFormat};

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a WGS84 position to an MGRS string
    ToMgrs {
        /// Latitude in degrees (-80 to 84)
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees (-180 to 180)
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Force a UTM zone (the computed one or a neighbour; 0 = computed)
        #[arg(long)]
        zone: Option<u8>,

        /// Digits per axis, 0 (100 km) to 5 (1 m). Default: config / MGRS_PRECISION / 5
        #[arg(long)]
        precision: Option<u8>,

        /// Output format: text, json, geojson
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Convert an MGRS string to a WGS84 position (south-west corner of the cell)
    FromMgrs {
        /// MGRS string; spaces are allowed (e.g. 18S UJ 23478 06483)
        #[arg(required = true, num_args = 1..)]
        mgrs: Vec<String>,

        /// Output format: text, json, geojson
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Convert a file (one entry per line) in parallel
    Batch(BatchArgs),
}

#[derive(Args)]
pub struct BatchArgs {
    /// Input file, or '-' for stdin
    #[arg(short, long)]
    pub input: PathBuf,

    /// Conversion direction: to-mgrs (lines "lat,lon[,zone]") or from-mgrs
    #[arg(short, long)]
    pub direction: Direction,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: text, json, geojson
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Force a UTM zone for every line without a zone column
    #[arg(long)]
    pub zone: Option<u8>,

    /// Digits per axis (0-5)
    #[arg(long)]
    pub precision: Option<u8>,

    /// Worker threads (default: config / MGRS_JOBS / available parallelism)
    #[arg(long, alias = "threads")]
    pub jobs: Option<usize>,

    /// Save the batch report as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Exécute la commande to-mgrs
pub fn cmd_to_mgrs(
    config: &Config,
    lat: f64,
    lon: f64,
    zone: Option<u8>,
    precision: Option<u8>,
    format: Option<OutputFormat>,
) -> Result<()> {
    let precision = precision.unwrap_or(config.precision);
    let zone = zone.filter(|&z| z != 0);

    let mgrs = mgrs::geodetic_to_mgrs(GeodeticCoordinate::new(lat, lon), zone, precision)
        .with_context(|| format!("Cannot convert ({}, {}) to MGRS", lat, lon))?;
    debug!(lat, lon, zone = ?zone, precision, %mgrs, "Converted");

    let record = Record {
        line: 1,
        input: format!("{},{}", lat, lon),
        outcome: Outcome::Ok {
            mgrs: mgrs.to_string(),
            latitude: lat,
            longitude: lon,
        },
    };
    export::write_output(
        None,
        &[record],
        format.unwrap_or(config.format),
        Direction::ToMgrs,
    )
}

/// Exécute la commande from-mgrs
pub fn cmd_from_mgrs(config: &Config, parts: &[String], format: Option<OutputFormat>) -> Result<()> {
    let entry = Entry {
        line: 1,
        input: parts.join(" "),
    };
    let record = batch::convert_entry(
        &entry,
        BatchOptions {
            direction: Direction::FromMgrs,
            zone: None,
            precision: config.precision,
        },
    );
    if let Outcome::Error { stage, message } = &record.outcome {
        anyhow::bail!("Cannot decode {:?}: {} failed: {}", entry.input, stage, message);
    }
    debug!(input = %entry.input, outcome = ?record.outcome, "Converted");

    export::write_output(
        None,
        &[record],
        format.unwrap_or(config.format),
        Direction::FromMgrs,
    )
}

/// Exécute la commande batch
pub fn cmd_batch(config: &Config, args: &BatchArgs) -> Result<()> {
    let started_at = Instant::now();

    let precision = args.precision.unwrap_or(config.precision);
    if precision > 5 {
        anyhow::bail!("Precision must be 0-5, got: {}", precision);
    }
    let jobs = args.jobs.unwrap_or_else(|| config.jobs());
    if jobs == 0 {
        anyhow::bail!("Jobs must be at least 1");
    }
    let format = args.format.unwrap_or(config.format);

    let entries = read_input(&args.input)?;
    info!(
        input = %args.input.display(),
        entries = entries.len(),
        direction = %args.direction,
        jobs,
        "Starting batch"
    );
    if entries.is_empty() {
        warn!("No entries found in {}", args.input.display());
    }

    let options = BatchOptions {
        direction: args.direction,
        zone: args.zone.filter(|&z| z != 0),
        precision,
    };
    let records = batch::convert_entries(&entries, options, jobs)?;

    export::write_output(args.output.as_deref(), &records, format, args.direction)?;

    let report = BatchReport::from_records(args.direction, &records, started_at.elapsed());
    report.display();
    if let Some(path) = &args.report {
        report.save_to_file(path)?;
        info!(report = %path.display(), "Report saved");
    }
    info!("{}", report.summary());

    if report.status == BatchStatus::Failed {
        anyhow::bail!("All {} entries failed", report.entries_failed);
    }

    Ok(())
}

/// Lit les entrées depuis un fichier ou stdin (`-`)
fn read_input(path: &Path) -> Result<Vec<Entry>> {
    if path == Path::new("-") {
        let stdin = std::io::stdin();
        return batch::read_entries(stdin.lock());
    }
    let file = File::open(path).context(format!("Failed to open input: {}", path.display()))?;
    batch::read_entries(BufReader::new(file))
}
