//! Décodage MGRS → UTM
//!
//! Format : `ZZ B CR EEEEENNNNN`, concaténé, zone sur 1 ou 2 chiffres. Les espaces
//! sont ignorés et la casse indifférente.

use super::{
    band_by_letter, band_reference_northing, column_index, row_index, row_offset,
    LatitudeBand, MAX_PRECISION, ONE_HUNDRED_KM, ROW_CYCLE,
};
use crate::projection::{self, ZONE_COUNT};
use crate::types::{MgrsCoordinate, UtmCoordinate};
use crate::ConversionError;

/// Marge ajoutée à la bande lors du contrôle de cohérence (degrés)
const BAND_TOLERANCE: f64 = 0.001;

/// Décode une chaîne MGRS en coordonnée UTM
///
/// Le point retourné est le coin sud-ouest de la cellule désignée. L'écart avec la
/// position encodée atteint donc la diagonale de la cellule, √2·10^(5-p) m pour `p`
/// chiffres (1,41 m à 5 chiffres).
///
/// # Errors
///
/// `MalformedMgrsString` pour toute chaîne illisible ou incohérente (caractères
/// invalides, nombre de chiffres impair, lettres de carré inconnues pour la zone,
/// zone hors de [1, 60], carré hors de sa bande de latitude).
pub fn decode(text: &str) -> Result<UtmCoordinate, ConversionError> {
    let mgrs = parse(text)?;
    to_utm(&mgrs)
}

/// Analyse une chaîne MGRS sans reconstruire la position
pub fn parse(text: &str) -> Result<MgrsCoordinate, ConversionError> {
    let malformed = |reason: &str| ConversionError::malformed(text, reason);

    let compact: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| b.to_ascii_uppercase())
        .collect();
    if compact.is_empty() {
        return Err(malformed("empty string"));
    }
    if !compact.is_ascii() {
        return Err(malformed("non-ASCII character"));
    }

    // Zone
    let zone_len = compact.iter().take_while(|b| b.is_ascii_digit()).count();
    if zone_len == 0 {
        return Err(malformed("missing zone number"));
    }
    if zone_len > 2 {
        return Err(malformed("zone number has more than 2 digits"));
    }
    let zone = compact[..zone_len]
        .iter()
        .fold(0u8, |acc, b| acc * 10 + (b - b'0'));
    if !(1..=ZONE_COUNT).contains(&zone) {
        return Err(malformed("zone number outside 1..=60"));
    }

    // Bande + carré
    let letters = &compact[zone_len..];
    if letters.len() < 3 || !letters[..3].iter().all(u8::is_ascii_alphabetic) {
        return Err(malformed("expected a band letter and a two-letter square id"));
    }
    let band = letters[0] as char;
    let column = letters[1] as char;
    let row = letters[2] as char;

    if band_by_letter(band).is_none() {
        return Err(malformed("invalid latitude band letter"));
    }
    if column_index(zone, column).is_none() {
        return Err(malformed("invalid 100km column letter for this zone"));
    }
    if row_index(row).is_none() {
        return Err(malformed("invalid 100km row letter"));
    }

    // Chiffres
    let digits = &letters[3..];
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(malformed("unexpected character in easting/northing digits"));
    }
    if digits.len() % 2 != 0 {
        return Err(malformed("odd number of easting/northing digits"));
    }
    if digits.len() > 2 * usize::from(MAX_PRECISION) {
        return Err(malformed("more than 5 digits per axis"));
    }
    let (easting, northing) = digits.split_at(digits.len() / 2);

    Ok(MgrsCoordinate::new(
        zone,
        band,
        column,
        row,
        String::from_utf8_lossy(easting).into_owned(),
        String::from_utf8_lossy(northing).into_owned(),
    ))
}

/// Reconstruit la coordonnée UTM (coin sud-ouest de la cellule) d'une coordonnée MGRS
///
/// Les lettres de ligne se répètent tous les 2 000 km : on retient le candidat le plus
/// proche du northing de la latitude centrale de la bande, sur le méridien central.
pub fn to_utm(mgrs: &MgrsCoordinate) -> Result<UtmCoordinate, ConversionError> {
    let malformed = |reason: &str| ConversionError::malformed(mgrs.to_string(), reason);

    let zone = mgrs.zone();
    projection::check_zone(zone).map_err(|_| malformed("zone number outside 1..=60"))?;
    let band = band_by_letter(mgrs.band()).ok_or_else(|| malformed("invalid latitude band letter"))?;
    let column = column_index(zone, mgrs.column())
        .ok_or_else(|| malformed("invalid 100km column letter for this zone"))?;
    let row = row_index(mgrs.row()).ok_or_else(|| malformed("invalid 100km row letter"))?;

    let scale = mgrs.precision_meters();
    let easting_offset = digits_value(mgrs.easting_digits()) * scale;
    let northing_offset = digits_value(mgrs.northing_digits()) * scale;

    let easting = (column + 1) as f64 * ONE_HUNDRED_KM + easting_offset;

    let row_northing = (row as f64 * ONE_HUNDRED_KM - row_offset(zone)).rem_euclid(ROW_CYCLE);
    let cycles = ((band_reference_northing(band) - row_northing) / ROW_CYCLE).round();
    let northing = row_northing + cycles * ROW_CYCLE + northing_offset;

    let utm = UtmCoordinate {
        zone,
        hemisphere: band.hemisphere(),
        easting,
        northing,
    };

    let latitude = projection::unproject(utm)
        .map_err(|_| malformed("100km square lies outside the latitude band"))?
        .latitude;
    if !band_contains(band, latitude, scale) {
        return Err(malformed("100km square lies outside the latitude band"));
    }

    Ok(utm)
}

/// Vérifie qu'une latitude décodée tombe dans la bande, élargie de la taille de cellule
fn band_contains(band: &LatitudeBand, latitude: f64, cell_size: f64) -> bool {
    let tolerance = cell_size / ONE_HUNDRED_KM + BAND_TOLERANCE;
    (band.south - tolerance..=band.north + tolerance).contains(&latitude)
}

fn digits_value(digits: &str) -> f64 {
    digits
        .bytes()
        .fold(0.0, |acc, b| acc * 10.0 + f64::from(b - b'0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Hemisphere;

    fn is_malformed(text: &str) -> bool {
        matches!(decode(text), Err(ConversionError::MalformedMgrsString { .. }))
    }

    #[test]
    fn test_decode_washington() {
        let utm = decode("18SUJ2347806483").unwrap();
        assert_eq!(utm.zone, 18);
        assert_eq!(utm.hemisphere, Hemisphere::North);
        assert_eq!(utm.easting, 323478.0);
        assert_eq!(utm.northing, 4306483.0);
    }

    #[test]
    fn test_decode_reduced_precision_is_cell_corner() {
        let utm = decode("18SUJ").unwrap();
        assert_eq!((utm.easting, utm.northing), (300000.0, 4300000.0));

        let utm = decode("18SUJ20").unwrap();
        assert_eq!((utm.easting, utm.northing), (320000.0, 4300000.0));

        let utm = decode("18SUJ2306").unwrap();
        assert_eq!((utm.easting, utm.northing), (323000.0, 4306000.0));
    }

    #[test]
    fn test_decode_southern_hemisphere() {
        let utm = decode("56HLH3490052288").unwrap();
        assert_eq!(utm.zone, 56);
        assert_eq!(utm.hemisphere, Hemisphere::South);
        assert_eq!((utm.easting, utm.northing), (334900.0, 6252288.0));
    }

    #[test]
    fn test_decode_single_digit_zone_and_spacing() {
        let utm = decode("4QFJ1234567890").unwrap();
        assert_eq!(utm.zone, 4);
        assert_eq!((utm.easting, utm.northing), (612345.0, 2367890.0));

        let spaced = decode(" 04q fj 12345 67890 ").unwrap();
        assert_eq!(spaced, utm);
    }

    #[test]
    fn test_decode_polar_bands() {
        let utm = decode("01CDM4380317013").unwrap();
        assert_eq!(utm.hemisphere, Hemisphere::South);
        assert_eq!(utm.northing, 1117013.0);

        let utm = decode("33XWG0000058369").unwrap();
        assert_eq!(utm.northing, 8658369.0);
    }

    #[test]
    fn test_decode_row_ambiguity_far_from_central_meridian() {
        // Zone 56 forcée à 8° du méridien central : le northing passe sous le
        // minimum nominal de la bande D
        let utm = crate::projection::project(
            crate::types::GeodeticCoordinate::new(-71.9965, 145.1402),
            Some(56),
        )
        .unwrap();
        let mgrs = super::super::encode(utm, 5).unwrap();
        let back = decode(&mgrs.to_string()).unwrap();
        assert!((back.northing - utm.northing).abs() < 1.0, "{} vs {}", back.northing, utm.northing);
    }

    #[test]
    fn test_parse_fields() {
        let mgrs = parse("18SUJ234064").unwrap();
        assert_eq!(mgrs.zone(), 18);
        assert_eq!(mgrs.band(), 'S');
        assert_eq!(mgrs.square_id(), "UJ");
        assert_eq!(mgrs.easting_digits(), "234");
        assert_eq!(mgrs.northing_digits(), "064");
        assert_eq!(mgrs.precision_meters(), 100.0);

        let parsed: MgrsCoordinate = "18suj234064".parse().unwrap();
        assert_eq!(parsed, mgrs);
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(is_malformed(""));
        assert!(is_malformed("   "));
        assert!(is_malformed("ZZinvalid"));
        assert!(is_malformed("18SUJ233"));
        assert!(is_malformed("SUJ2347806483"));
        assert!(is_malformed("118SUJ2347806483"));
        assert!(is_malformed("0SUJ2347806483"));
        assert!(is_malformed("61SUJ2347806483"));
        assert!(is_malformed("18IUJ2347806483"));
        assert!(is_malformed("18OUJ2347806483"));
        assert!(is_malformed("18YUJ2347806483"));
        assert!(is_malformed("18SAJ2347806483"));
        assert!(is_malformed("18SUW2347806483"));
        assert!(is_malformed("18SUI2347806483"));
        assert!(is_malformed("18SU2347806483"));
        assert!(is_malformed("18SUJ23478064830"));
        assert!(is_malformed("18SUJ234780648301"));
        assert!(is_malformed("18SUJ23478O6483"));
        assert!(is_malformed("18SUJ2347806483é"));
    }

    #[test]
    fn test_square_outside_band_is_malformed() {
        // Zone 18, bande N (0°-8°) : la ligne T tombe vers 10.9°N, la ligne A sous l'équateur
        assert!(is_malformed("18NUT2347806483"));
        assert!(is_malformed("18NUA2347806483"));
        assert!(decode("18NUJ2347806483").is_ok());
    }

    #[test]
    fn test_malformed_reason_mentions_input() {
        match decode("18SUJ233") {
            Err(ConversionError::MalformedMgrsString { input, reason }) => {
                assert_eq!(input, "18SUJ233");
                assert!(reason.contains("odd"));
            }
            other => panic!("Expected MalformedMgrsString, got {:?}", other),
        }
    }
}
