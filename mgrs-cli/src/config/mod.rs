//! Configuration du convertisseur
//!
//! Ordre de priorité : flags CLI > variables d'environnement > fichier JSON > défauts.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Format de sortie
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Un résultat par ligne (défaut)
    #[default]
    Text,
    /// Tableau JSON d'enregistrements
    Json,
    /// FeatureCollection de points
    Geojson,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "geojson" => Ok(OutputFormat::Geojson),
            _ => Err(format!("Invalid output format: {}. Use: text, json, geojson", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Geojson => "geojson",
        })
    }
}

/// Configuration principale
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Chiffres par axe (0 à 5)
    pub precision: u8,

    /// Format de sortie
    pub format: OutputFormat,

    /// Threads du mode batch (défaut : parallélisme disponible)
    pub jobs: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: mgrs::DEFAULT_PRECISION,
            format: OutputFormat::default(),
            jobs: None,
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Configuration complète : fichier optionnel puis variables d'environnement
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applique `MGRS_PRECISION`, `MGRS_FORMAT` et `MGRS_JOBS`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("MGRS_PRECISION") {
            self.precision = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid MGRS_PRECISION: {}", value))?;
        }
        if let Some(value) = lookup("MGRS_FORMAT") {
            self.format = value
                .trim()
                .parse()
                .map_err(|e: String| anyhow::anyhow!("Invalid MGRS_FORMAT: {}", e))?;
        }
        if let Some(value) = lookup("MGRS_JOBS") {
            let jobs = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid MGRS_JOBS: {}", value))?;
            self.jobs = Some(jobs);
        }
        Ok(())
    }

    /// Vérifie les bornes (aucune valeur n'est ramenée silencieusement dans l'intervalle)
    pub fn validate(&self) -> Result<()> {
        if self.precision > 5 {
            anyhow::bail!("Precision must be 0-5, got: {}", self.precision);
        }
        if self.jobs == Some(0) {
            anyhow::bail!("Jobs must be at least 1");
        }
        Ok(())
    }

    /// Nombre de threads effectif
    pub fn jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        })
    }
}
