//! Types d'erreurs pour le crate mgrs

use std::fmt;

use thiserror::Error;

/// Erreurs pouvant survenir lors d'une conversion
///
/// Toutes proviennent d'une entrée invalide : aucune n'est transitoire, aucune n'est
/// réessayée.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// Latitude hors de [-90, 90] (ou non finie)
    #[error("Latitude out of range: {0}° (expected -90..=90)")]
    LatitudeOutOfRange(f64),

    /// Longitude hors de [-180, 180] (ou non finie)
    #[error("Longitude out of range: {0}° (expected -180..=180)")]
    LongitudeOutOfRange(f64),

    /// Zone forcée non adjacente à la zone calculée
    #[error("Invalid UTM zone override {requested}: only {computed} or an adjacent zone is allowed")]
    InvalidZoneOverride { requested: u8, computed: u8 },

    /// Latitude dans une calotte polaire (UPS non supporté)
    #[error("Polar region unsupported: latitude {0}° is outside 80°S..84°N")]
    PolarRegionUnsupported(f64),

    /// Numéro de zone UTM hors de [1, 60]
    #[error("UTM zone out of range: {0} (expected 1..=60)")]
    ZoneOutOfRange(u8),

    /// Easting hors de la fenêtre de validité
    #[error("Easting out of range: {0} m")]
    EastingOutOfRange(f64),

    /// Northing hors de la fenêtre de validité
    #[error("Northing out of range: {0} m")]
    NorthingOutOfRange(f64),

    /// Précision MGRS hors de [0, 5] chiffres par axe
    #[error("Precision out of range: {0} digits (expected 0..=5)")]
    PrecisionOutOfRange(u8),

    /// Chaîne MGRS illisible ou incohérente
    #[error("Malformed MGRS string {input:?}: {reason}")]
    MalformedMgrsString { input: String, reason: String },
}

impl ConversionError {
    /// Crée une erreur de chaîne MGRS malformée avec contexte
    pub fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedMgrsString {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Étape de la chaîne de conversion ayant produit l'erreur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Géodésique → UTM
    Projection,
    /// UTM → MGRS
    Encoding,
    /// MGRS → UTM
    Decoding,
    /// UTM → géodésique
    Unprojection,
}

impl Stage {
    /// Nom court, stable (utilisé dans les rapports)
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Projection => "projection",
            Stage::Encoding => "encoding",
            Stage::Decoding => "decoding",
            Stage::Unprojection => "unprojection",
        }
    }

    /// Étiquette une erreur d'un composant avec cette étape
    pub(crate) fn tag(self) -> impl FnOnce(ConversionError) -> MgrsError {
        move |source| MgrsError {
            stage: self,
            source,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Erreur du service de conversion : l'erreur du composant, inchangée, et son étape
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{stage} failed: {source}")]
pub struct MgrsError {
    /// Étape d'origine
    pub stage: Stage,
    /// Erreur du composant
    pub source: ConversionError,
}

impl MgrsError {
    /// Type d'erreur sous-jacent
    pub fn kind(&self) -> &ConversionError {
        &self.source
    }
}
