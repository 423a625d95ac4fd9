//! Conversion par lots
//!
//! Une entrée par ligne. Les lignes sont converties en parallèle (rayon), l'ordre de
//! sortie reste celui de l'entrée, et une ligne en échec devient un enregistrement
//! d'erreur sans interrompre le lot.

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use anyhow::{Context, Result};
use mgrs::{GeodeticCoordinate, MgrsCoordinate, MgrsError};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Étape attribuée aux lignes illisibles (avant toute conversion)
pub const INPUT_STAGE: &str = "input";

/// Sens de conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// `lat,lon[,zone]` → MGRS
    ToMgrs,
    /// MGRS → `lat lon`
    FromMgrs,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "to-mgrs" | "to_mgrs" => Ok(Direction::ToMgrs),
            "from-mgrs" | "from_mgrs" => Ok(Direction::FromMgrs),
            _ => Err(format!("Invalid direction: {}. Use: to-mgrs, from-mgrs", s)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::ToMgrs => "to-mgrs",
            Direction::FromMgrs => "from-mgrs",
        })
    }
}

/// Paramètres d'un lot
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub direction: Direction,
    /// Zone forcée par défaut (une zone en 3e colonne l'emporte)
    pub zone: Option<u8>,
    /// Chiffres par axe
    pub precision: u8,
}

/// Ligne d'entrée non vide
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Numéro de ligne (à partir de 1)
    pub line: usize,
    pub input: String,
}

/// Résultat d'une ligne
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub line: usize,
    pub input: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Conversion réussie ou erreur étiquetée
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Ok {
        mgrs: String,
        latitude: f64,
        longitude: f64,
    },
    Error {
        stage: String,
        message: String,
    },
}

impl Record {
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, Outcome::Ok { .. })
    }
}

/// Lit les entrées : lignes vides et commentaires `#` ignorés
pub fn read_entries<R: BufRead>(reader: R) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", index + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        entries.push(Entry {
            line: index + 1,
            input: trimmed.to_string(),
        });
    }
    Ok(entries)
}

/// Convertit toutes les entrées sur un pool de `jobs` threads
pub fn convert_entries(entries: &[Entry], options: BatchOptions, jobs: usize) -> Result<Vec<Record>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to build thread pool")?;

    debug!(entries = entries.len(), jobs, direction = %options.direction, "Batch conversion");

    Ok(pool.install(|| {
        entries
            .par_iter()
            .map(|entry| convert_entry(entry, options))
            .collect()
    }))
}

/// Convertit une entrée
pub fn convert_entry(entry: &Entry, options: BatchOptions) -> Record {
    let outcome = match options.direction {
        Direction::ToMgrs => to_mgrs_outcome(&entry.input, options),
        Direction::FromMgrs => from_mgrs_outcome(&entry.input),
    };
    Record {
        line: entry.line,
        input: entry.input.clone(),
        outcome,
    }
}

fn to_mgrs_outcome(input: &str, options: BatchOptions) -> Outcome {
    let (latitude, longitude, zone) = match parse_position(input) {
        Ok(parsed) => parsed,
        Err(message) => {
            return Outcome::Error {
                stage: INPUT_STAGE.to_string(),
                message,
            }
        }
    };
    let coord = GeodeticCoordinate::new(latitude, longitude);
    match mgrs::geodetic_to_mgrs(coord, zone.or(options.zone), options.precision) {
        Ok(mgrs) => Outcome::Ok {
            mgrs: mgrs.to_string(),
            latitude,
            longitude,
        },
        Err(e) => error_outcome(&e),
    }
}

fn from_mgrs_outcome(input: &str) -> Outcome {
    match mgrs::from_mgrs(input) {
        Ok(coord) => {
            // Forme canonique (majuscules, sans espaces, zone sur 2 chiffres)
            let mgrs = input
                .parse::<MgrsCoordinate>()
                .map(|m| m.to_string())
                .unwrap_or_else(|_| input.to_string());
            Outcome::Ok {
                mgrs,
                latitude: coord.latitude,
                longitude: coord.longitude,
            }
        }
        Err(e) => error_outcome(&e),
    }
}

fn error_outcome(error: &MgrsError) -> Outcome {
    Outcome::Error {
        stage: error.stage.as_str().to_string(),
        message: error.source.to_string(),
    }
}

/// Lit `lat,lon[,zone]` ou `lat lon [zone]`
///
/// Une zone à 0 vaut "zone par défaut".
fn parse_position(input: &str) -> std::result::Result<(f64, f64, Option<u8>), String> {
    let fields: Vec<&str> = input
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect();

    if !(2..=3).contains(&fields.len()) {
        return Err(format!(
            "Expected 'lat,lon' or 'lat,lon,zone', got {} fields",
            fields.len()
        ));
    }

    let latitude = parse_degrees(fields[0], "latitude")?;
    let longitude = parse_degrees(fields[1], "longitude")?;
    let zone = match fields.get(2) {
        Some(raw) => {
            let zone: u8 = raw
                .parse()
                .map_err(|_| format!("Invalid zone: {}", raw))?;
            (zone != 0).then_some(zone)
        }
        None => None,
    };

    Ok((latitude, longitude, zone))
}

fn parse_degrees(raw: &str, name: &str) -> std::result::Result<f64, String> {
    fast_float::parse(raw).map_err(|_| format!("Invalid {}: {}", name, raw))
}
