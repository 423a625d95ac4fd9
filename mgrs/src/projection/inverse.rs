//! Projection inverse : UTM → géodésique WGS84

use super::{
    central_meridian, check_zone, geodetic_tan, normalize_longitude, BETA, FALSE_EASTING,
    FALSE_NORTHING_SOUTH, MAX_EASTING, MAX_NORTHING, MIN_EASTING, MIN_NORTHING,
    SCALED_RECTIFYING_RADIUS,
};
use crate::types::{GeodeticCoordinate, Hemisphere, UtmCoordinate};
use crate::ConversionError;

/// Convertit une coordonnée UTM en coordonnée géodésique WGS84
///
/// # Errors
///
/// `ZoneOutOfRange` si la zone n'est pas dans [1, 60], `EastingOutOfRange` hors de
/// [100 000, 900 000] m, `NorthingOutOfRange` hors de [0, 10 000 000] m.
pub fn unproject(utm: UtmCoordinate) -> Result<GeodeticCoordinate, ConversionError> {
    check_zone(utm.zone)?;
    if !(MIN_EASTING..=MAX_EASTING).contains(&utm.easting) {
        return Err(ConversionError::EastingOutOfRange(utm.easting));
    }
    if !(MIN_NORTHING..=MAX_NORTHING).contains(&utm.northing) {
        return Err(ConversionError::NorthingOutOfRange(utm.northing));
    }

    let y = match utm.hemisphere {
        Hemisphere::North => utm.northing,
        Hemisphere::South => utm.northing - FALSE_NORTHING_SOUTH,
    };
    let (latitude, delta_lon) = inverse_transverse_mercator(utm.easting - FALSE_EASTING, y);

    Ok(GeodeticCoordinate::new(
        latitude,
        normalize_longitude(central_meridian(utm.zone) + delta_lon),
    ))
}

/// Transverse Mercator inverse brut : (x, y) sans false easting/northing → (lat, Δlon) en degrés
pub(crate) fn inverse_transverse_mercator(x: f64, y: f64) -> (f64, f64) {
    let xi = y / SCALED_RECTIFYING_RADIUS;
    let eta = x / SCALED_RECTIFYING_RADIUS;

    let mut xi_prime = xi;
    let mut eta_prime = eta;
    for (j, beta) in BETA.iter().enumerate() {
        let k = 2.0 * (j + 1) as f64;
        xi_prime -= beta * (k * xi).sin() * (k * eta).cosh();
        eta_prime -= beta * (k * xi).cos() * (k * eta).sinh();
    }

    // Au-delà du pôle le cosinus devient négatif : on reste sur le pôle
    let sinh_eta = eta_prime.sinh();
    let cos_xi = xi_prime.cos().max(0.0);
    let r = sinh_eta.hypot(cos_xi);

    if r == 0.0 {
        return (90.0_f64.copysign(xi), 0.0);
    }

    let tau = geodetic_tan(xi_prime.sin() / r);
    (tau.atan().to_degrees(), sinh_eta.atan2(cos_xi).to_degrees())
}
