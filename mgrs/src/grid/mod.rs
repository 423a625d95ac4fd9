//! Grille MGRS : bandes de latitude et identifiants de carrés de 100 km
//!
//! Tables de processus, immuables :
//! - 20 bandes de 8° (C à X sans I ni O), X étendue jusqu'à 84°N
//! - colonnes : 3 jeux de 8 lettres qui tournent avec la zone (A-H, J-R, S-Z)
//! - lignes : 20 lettres (A-V sans I ni O) sur un cycle de 2 000 km, décalées de
//!   500 km pour les zones paires

pub mod decode;
pub mod encode;

pub use decode::{decode, parse};
pub use encode::encode;

use crate::projection::{self, forward, FALSE_NORTHING_SOUTH};
use crate::types::Hemisphere;

/// Côté d'un carré de grille
pub const ONE_HUNDRED_KM: f64 = 100_000.0;

/// Période des lettres de ligne
pub(crate) const ROW_CYCLE: f64 = 2_000_000.0;

/// Nombre maximal de chiffres par axe
pub const MAX_PRECISION: u8 = 5;

/// Bande de latitude MGRS
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatitudeBand {
    pub letter: char,
    /// Limite sud (degrés)
    pub south: f64,
    /// Limite nord (degrés)
    pub north: f64,
}

impl LatitudeBand {
    const fn new(letter: char, south: f64, north: f64) -> Self {
        Self {
            letter,
            south,
            north,
        }
    }

    pub fn hemisphere(&self) -> Hemisphere {
        if self.letter < 'N' {
            Hemisphere::South
        } else {
            Hemisphere::North
        }
    }

    /// Latitude centrale, référence pour lever l'ambiguïté des lettres de ligne
    pub fn central_latitude(&self) -> f64 {
        (self.south + self.north) / 2.0
    }
}

/// Bandes du sud au nord ; C et X gardent la marge de 0.5° de GEOTRANS
pub const LATITUDE_BANDS: [LatitudeBand; 20] = [
    LatitudeBand::new('C', -80.5, -72.0),
    LatitudeBand::new('D', -72.0, -64.0),
    LatitudeBand::new('E', -64.0, -56.0),
    LatitudeBand::new('F', -56.0, -48.0),
    LatitudeBand::new('G', -48.0, -40.0),
    LatitudeBand::new('H', -40.0, -32.0),
    LatitudeBand::new('J', -32.0, -24.0),
    LatitudeBand::new('K', -24.0, -16.0),
    LatitudeBand::new('L', -16.0, -8.0),
    LatitudeBand::new('M', -8.0, 0.0),
    LatitudeBand::new('N', 0.0, 8.0),
    LatitudeBand::new('P', 8.0, 16.0),
    LatitudeBand::new('Q', 16.0, 24.0),
    LatitudeBand::new('R', 24.0, 32.0),
    LatitudeBand::new('S', 32.0, 40.0),
    LatitudeBand::new('T', 40.0, 48.0),
    LatitudeBand::new('U', 48.0, 56.0),
    LatitudeBand::new('V', 56.0, 64.0),
    LatitudeBand::new('W', 64.0, 72.0),
    LatitudeBand::new('X', 72.0, 84.5),
];

/// Lettres de colonne, indexées par (zone - 1) mod 3
const COLUMN_LETTERS: [&[u8; 8]; 3] = [b"ABCDEFGH", b"JKLMNPQR", b"STUVWXYZ"];

/// Lettres de ligne
const ROW_LETTERS: &[u8; 20] = b"ABCDEFGHJKLMNPQRSTUV";

/// Bande contenant une latitude, `None` hors de [-80.5, 84.5]
pub fn band_for_latitude(latitude: f64) -> Option<&'static LatitudeBand> {
    let first = &LATITUDE_BANDS[0];
    let last = &LATITUDE_BANDS[LATITUDE_BANDS.len() - 1];
    if !(first.south..=last.north).contains(&latitude) {
        return None;
    }

    let index = ((latitude - projection::MIN_LATITUDE) / 8.0).floor();
    let index = index.clamp(0.0, (LATITUDE_BANDS.len() - 1) as f64) as usize;
    Some(&LATITUDE_BANDS[index])
}

/// Bande désignée par sa lettre
pub fn band_by_letter(letter: char) -> Option<&'static LatitudeBand> {
    LATITUDE_BANDS.iter().find(|band| band.letter == letter)
}

/// Jeu de lettres de colonne d'une zone
pub(crate) fn column_letters(zone: u8) -> &'static [u8; 8] {
    COLUMN_LETTERS[usize::from((zone - 1) % 3)]
}

/// Lettre de colonne pour un indice 0..8
pub(crate) fn column_letter(zone: u8, index: usize) -> Option<char> {
    column_letters(zone).get(index).map(|&b| b as char)
}

/// Indice 0..8 d'une lettre de colonne dans le jeu de la zone
pub(crate) fn column_index(zone: u8, letter: char) -> Option<usize> {
    column_letters(zone).iter().position(|&b| b as char == letter)
}

/// Lettre de ligne pour un indice 0..20
pub(crate) fn row_letter(index: usize) -> Option<char> {
    ROW_LETTERS.get(index).map(|&b| b as char)
}

/// Indice 0..20 d'une lettre de ligne
pub(crate) fn row_index(letter: char) -> Option<usize> {
    ROW_LETTERS.iter().position(|&b| b as char == letter)
}

/// Décalage des lettres de ligne : 500 km pour les zones paires
pub(crate) fn row_offset(zone: u8) -> f64 {
    if zone % 2 == 0 {
        500_000.0
    } else {
        0.0
    }
}

/// Northing de la latitude centrale d'une bande sur le méridien central
pub(crate) fn band_reference_northing(band: &LatitudeBand) -> f64 {
    let (_, y) = forward::transverse_mercator(band.central_latitude(), 0.0);
    match band.hemisphere() {
        Hemisphere::North => y,
        Hemisphere::South => y + FALSE_NORTHING_SOUTH,
    }
}
