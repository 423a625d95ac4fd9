//! # mgrs-cli
//!
//! Convertisseur en ligne de commande WGS84 ⇄ MGRS.
//!
//! ## Features
//!
//! - Conversion unitaire dans les deux sens
//! - Mode batch parallèle (rayon) avec rapport d'erreurs par étape
//! - Export texte, JSON ou GeoJSON
//! - Configuration par fichier JSON, `.env` et variables `MGRS_*`
//!
//! ## Usage CLI
//!
//! ```bash
//! mgrs-cli to-mgrs --lat 38.8895 --lon -77.0353
//! mgrs-cli from-mgrs 18SUJ2347806483
//! mgrs-cli batch --input points.csv --direction to-mgrs --format geojson --output points.geojson
//! ```

pub mod batch;
pub mod config;
pub mod export;
pub mod report;

pub use batch::{BatchOptions, Direction, Record};
pub use config::{Config, OutputFormat};
pub use report::{BatchReport, BatchStatus};
