//! Encodage UTM → MGRS

use super::{
    band_for_latitude, column_letter, row_letter, row_offset, MAX_PRECISION, ONE_HUNDRED_KM,
    ROW_CYCLE,
};
use crate::projection::{self, MAX_EASTING, MAX_NORTHING, MIN_EASTING, MIN_NORTHING};
use crate::types::{MgrsCoordinate, UtmCoordinate};
use crate::ConversionError;

/// Bruit flottant toléré sous le dernier chiffre lors de la troncature
const TRUNCATION_EPSILON: f64 = 1e-6;

/// Encode une coordonnée UTM en MGRS avec `precision` chiffres par axe (0 à 5)
///
/// La bande de latitude est déduite de la latitude impliquée par les valeurs UTM.
///
/// # Errors
///
/// `PrecisionOutOfRange`, ainsi que les erreurs de validité UTM (`ZoneOutOfRange`,
/// `EastingOutOfRange`, `NorthingOutOfRange`) et `PolarRegionUnsupported`.
pub fn encode(utm: UtmCoordinate, precision: u8) -> Result<MgrsCoordinate, ConversionError> {
    check_precision(precision)?;
    let latitude = projection::unproject(utm)?.latitude;
    encode_with_latitude(utm, latitude, precision)
}

/// Encode en utilisant une latitude connue pour le choix de la bande
///
/// Évite qu'un arrondi de la projection inverse fasse basculer un point situé
/// exactement sur une limite de bande.
pub(crate) fn encode_with_latitude(
    utm: UtmCoordinate,
    latitude: f64,
    precision: u8,
) -> Result<MgrsCoordinate, ConversionError> {
    check_precision(precision)?;
    projection::check_zone(utm.zone)?;

    let band = band_for_latitude(latitude)
        .ok_or(ConversionError::PolarRegionUnsupported(latitude))?;

    let scale = cell_size(precision);
    let mut easting = truncate(utm.easting, scale, MAX_EASTING);
    let northing = truncate(utm.northing, scale, MAX_NORTHING);

    // 31V ne couvre que 0°-3°E : le méridien central appartient à 32V
    if band.letter == 'V' && utm.zone == 31 && easting == 500_000.0 {
        easting -= 1.0;
    }

    if !(MIN_EASTING..MAX_EASTING).contains(&easting) {
        return Err(ConversionError::EastingOutOfRange(utm.easting));
    }
    if !(MIN_NORTHING..MAX_NORTHING).contains(&northing) {
        return Err(ConversionError::NorthingOutOfRange(utm.northing));
    }

    let column = column_letter(utm.zone, (easting / ONE_HUNDRED_KM) as usize - 1)
        .ok_or(ConversionError::EastingOutOfRange(utm.easting))?;

    let row_northing = (northing % ROW_CYCLE + row_offset(utm.zone)) % ROW_CYCLE;
    let row = row_letter((row_northing / ONE_HUNDRED_KM) as usize)
        .ok_or(ConversionError::NorthingOutOfRange(utm.northing))?;

    Ok(MgrsCoordinate::new(
        utm.zone,
        band.letter,
        column,
        row,
        digits(easting, scale, precision),
        digits(northing, scale, precision),
    ))
}

pub(crate) fn check_precision(precision: u8) -> Result<(), ConversionError> {
    if precision > MAX_PRECISION {
        Err(ConversionError::PrecisionOutOfRange(precision))
    } else {
        Ok(())
    }
}

/// Taille de cellule en mètres pour une précision donnée
pub(crate) fn cell_size(precision: u8) -> f64 {
    10f64.powi(i32::from(MAX_PRECISION) - i32::from(precision))
}

/// Tronque (sans arrondir) au multiple de `scale` inférieur
///
/// La tolérance ne doit pas porter à `limit` une valeur qui lui est inférieure :
/// un point juste au sud de l'équateur reste en rangée V.
fn truncate(value: f64, scale: f64, limit: f64) -> f64 {
    let truncated = (value / scale + TRUNCATION_EPSILON).floor() * scale;
    if truncated >= limit && value < limit {
        limit - scale
    } else {
        truncated
    }
}

/// Offset dans le carré, sur `precision` chiffres complétés par des zéros
fn digits(value: f64, scale: f64, precision: u8) -> String {
    if precision == 0 {
        return String::new();
    }
    let offset = ((value % ONE_HUNDRED_KM) / scale) as u32;
    format!("{:0width$}", offset, width = usize::from(precision))
}
