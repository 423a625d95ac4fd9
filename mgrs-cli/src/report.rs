//! Rapport de conversion par lots avec graceful degradation
//!
//! Collecte les résultats d'un lot, classe les erreurs par étape et détermine le
//! statut global.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::batch::{Direction, Outcome, Record};

/// Statut global du lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BatchStatus {
    /// Toutes les lignes converties
    Success,
    /// Des lignes converties, d'autres en erreur
    PartialSuccess,
    /// Aucune ligne convertie
    Failed,
}

/// Ligne en erreur
#[derive(Debug, Clone, Serialize)]
pub struct BatchError {
    /// Numéro de ligne dans l'entrée
    pub line: usize,
    /// Contenu de la ligne
    pub input: String,
    /// Étape fautive
    pub stage: String,
    /// Message d'erreur
    pub message: String,
}

/// Rapport complet d'un lot
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Sens de conversion
    pub direction: Direction,
    /// Durée du lot
    pub duration_secs: f64,
    /// Statut global
    pub status: BatchStatus,

    /// Nombre de lignes traitées
    pub entries_processed: usize,
    /// Nombre de lignes converties
    pub entries_converted: usize,
    /// Nombre de lignes en erreur
    pub entries_failed: usize,

    /// Nombre d'erreurs par étape
    pub errors_by_stage: BTreeMap<String, usize>,

    /// Liste des erreurs
    pub errors: Vec<BatchError>,
}

impl BatchReport {
    /// Crée un rapport vide
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            duration_secs: 0.0,
            status: BatchStatus::Success,
            entries_processed: 0,
            entries_converted: 0,
            entries_failed: 0,
            errors_by_stage: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    /// Construit le rapport d'un lot terminé
    pub fn from_records(direction: Direction, records: &[Record], duration: Duration) -> Self {
        let mut report = Self::new(direction);
        for record in records {
            report.record(record);
        }
        report.set_duration(duration);
        report.finalize();
        report
    }

    /// Enregistre le résultat d'une ligne
    pub fn record(&mut self, record: &Record) {
        self.entries_processed += 1;
        match &record.outcome {
            Outcome::Ok { .. } => self.entries_converted += 1,
            Outcome::Error { stage, message } => {
                self.entries_failed += 1;
                *self.errors_by_stage.entry(stage.clone()).or_default() += 1;
                self.errors.push(BatchError {
                    line: record.line,
                    input: record.input.clone(),
                    stage: stage.clone(),
                    message: message.clone(),
                });
            }
        }
    }

    /// Définit la durée du lot
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final
    pub fn finalize(&mut self) {
        self.status = match (self.entries_converted, self.entries_failed) {
            (_, 0) => BatchStatus::Success,
            (0, _) => BatchStatus::Failed,
            _ => BatchStatus::PartialSuccess,
        };
    }

    /// Affiche le rapport sur stderr (stdout reste réservé aux résultats)
    pub fn display(&self) {
        eprintln!("\n{}", "=".repeat(60));
        eprintln!("BATCH REPORT - {}", self.direction);
        eprintln!("{}", "=".repeat(60));

        eprintln!("\nStatus: {:?}", self.status);
        eprintln!("Duration: {:.2}s", self.duration_secs);

        eprintln!("\n--- SUMMARY ---");
        eprintln!(
            "Entries: {} processed, {} converted, {} failed",
            self.entries_processed, self.entries_converted, self.entries_failed
        );

        if !self.errors_by_stage.is_empty() {
            eprintln!("\n--- BY STAGE ---");
            for (stage, count) in &self.errors_by_stage {
                eprintln!("  {}: {}", stage, count);
            }
        }

        if !self.errors.is_empty() {
            eprintln!("\n--- ERRORS ({}) ---", self.errors.len());
            for e in self.errors.iter().take(20) {
                eprintln!("  [line {}] {} {:?}: {}", e.line, e.stage, e.input, e.message);
            }
            if self.errors.len() > 20 {
                eprintln!("  ... and {} more", self.errors.len() - 20);
            }
        }

        eprintln!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} converted, {} failed in {:.2}s",
            self.direction, self.entries_converted, self.entries_failed, self.duration_secs
        )
    }
}
