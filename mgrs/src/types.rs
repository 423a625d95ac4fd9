//! Types de coordonnées manipulés par les conversions
//!
//! Ce sont des valeurs : copiées, jamais modifiées après construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConversionError;

/// Coordonnée géodésique WGS84 en degrés
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticCoordinate {
    /// Latitude en degrés, [-90, 90]
    pub latitude: f64,
    /// Longitude en degrés, [-180, 180]
    pub longitude: f64,
}

impl GeodeticCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<GeodeticCoordinate> for geo::Point<f64> {
    fn from(coord: GeodeticCoordinate) -> Self {
        geo::Point::new(coord.longitude, coord.latitude)
    }
}

impl From<geo::Point<f64>> for GeodeticCoordinate {
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

/// Hémisphère d'une coordonnée UTM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// Hémisphère d'une latitude (l'équateur est au nord)
    pub fn from_latitude(latitude: f64) -> Self {
        if latitude < 0.0 {
            Hemisphere::South
        } else {
            Hemisphere::North
        }
    }
}

/// Coordonnée UTM
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtmCoordinate {
    /// Zone, [1, 60]
    pub zone: u8,
    pub hemisphere: Hemisphere,
    /// Easting en mètres (false easting 500 km inclus)
    pub easting: f64,
    /// Northing en mètres (false northing 10 000 km inclus au sud)
    pub northing: f64,
}

impl fmt::Display for UtmCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = match self.hemisphere {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        };
        write!(f, "{}{} {:.3} {:.3}", self.zone, h, self.easting, self.northing)
    }
}

/// Coordonnée MGRS structurée
///
/// Les deux offsets ont toujours le même nombre de chiffres (0 à 5) : seuls
/// l'encodeur et le parseur construisent cette valeur. Sérialisée sous sa forme
/// texte, désérialisée via le parseur.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MgrsCoordinate {
    zone: u8,
    band: char,
    column: char,
    row: char,
    easting: String,
    northing: String,
}

impl MgrsCoordinate {
    pub(crate) fn new(
        zone: u8,
        band: char,
        column: char,
        row: char,
        easting: String,
        northing: String,
    ) -> Self {
        debug_assert_eq!(easting.len(), northing.len());
        Self {
            zone,
            band,
            column,
            row,
            easting,
            northing,
        }
    }

    /// Numéro de zone UTM
    pub fn zone(&self) -> u8 {
        self.zone
    }

    /// Lettre de bande de latitude
    pub fn band(&self) -> char {
        self.band
    }

    /// Désignateur de zone de grille, ex: "18S"
    pub fn grid_zone_designator(&self) -> String {
        format!("{:02}{}", self.zone, self.band)
    }

    /// Identifiant du carré de 100 km, ex: "UJ"
    pub fn square_id(&self) -> String {
        [self.column, self.row].iter().collect()
    }

    pub(crate) fn column(&self) -> char {
        self.column
    }

    pub(crate) fn row(&self) -> char {
        self.row
    }

    /// Chiffres d'easting dans le carré
    pub fn easting_digits(&self) -> &str {
        &self.easting
    }

    /// Chiffres de northing dans le carré
    pub fn northing_digits(&self) -> &str {
        &self.northing
    }

    /// Nombre de chiffres par axe (0 = précision 100 km)
    pub fn precision_digits(&self) -> u8 {
        self.easting.len() as u8
    }

    /// Taille de la cellule en mètres : 10^(5 - chiffres)
    pub fn precision_meters(&self) -> f64 {
        10f64.powi(5 - i32::from(self.precision_digits()))
    }
}

impl fmt::Display for MgrsCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}{}{}{}{}{}",
            self.zone, self.band, self.column, self.row, self.easting, self.northing
        )
    }
}

impl FromStr for MgrsCoordinate {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::grid::decode::parse(s)
    }
}

impl TryFrom<String> for MgrsCoordinate {
    type Error = ConversionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MgrsCoordinate> for String {
    fn from(mgrs: MgrsCoordinate) -> Self {
        mgrs.to_string()
    }
}
