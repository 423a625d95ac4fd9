//! Projection directe : géodésique WGS84 → UTM

use super::{
    central_meridian, conformal_tan, normalize_longitude, resolve_zone, ALPHA,
    FALSE_EASTING, FALSE_NORTHING_SOUTH, MAX_LATITUDE, MIN_LATITUDE, SCALED_RECTIFYING_RADIUS,
};
use crate::types::{GeodeticCoordinate, Hemisphere, UtmCoordinate};
use crate::ConversionError;

/// Projette une coordonnée géodésique en UTM
///
/// `zone_override` force une zone, acceptée seulement si elle est la zone calculée ou
/// l'une de ses deux voisines.
///
/// # Errors
///
/// `LatitudeOutOfRange`, `LongitudeOutOfRange`, `PolarRegionUnsupported` (au-delà de
/// 84°N / 80°S) ou `InvalidZoneOverride`.
pub fn project(
    coord: GeodeticCoordinate,
    zone_override: Option<u8>,
) -> Result<UtmCoordinate, ConversionError> {
    let GeodeticCoordinate {
        latitude,
        longitude,
    } = coord;

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ConversionError::LatitudeOutOfRange(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ConversionError::LongitudeOutOfRange(longitude));
    }
    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
        return Err(ConversionError::PolarRegionUnsupported(latitude));
    }

    let zone = resolve_zone(latitude, longitude, zone_override)?;
    let delta_lon = normalize_longitude(longitude - central_meridian(zone));
    let (x, y) = transverse_mercator(latitude, delta_lon);

    let hemisphere = Hemisphere::from_latitude(latitude);
    let northing = match hemisphere {
        Hemisphere::North => y,
        Hemisphere::South => y + FALSE_NORTHING_SOUTH,
    };

    Ok(UtmCoordinate {
        zone,
        hemisphere,
        easting: x + FALSE_EASTING,
        northing,
    })
}

/// Transverse Mercator brut (sans false easting/northing), angles en degrés
///
/// `delta_lon` est l'écart au méridien central. Retourne (x, y) en mètres, échelle k0.
pub(crate) fn transverse_mercator(latitude: f64, delta_lon: f64) -> (f64, f64) {
    let tau_prime = conformal_tan(latitude.to_radians().tan());
    let (sin_lam, cos_lam) = delta_lon.to_radians().sin_cos();

    // Coordonnées sur la sphère conforme
    let xi_prime = tau_prime.atan2(cos_lam);
    let eta_prime = (sin_lam / tau_prime.hypot(cos_lam)).asinh();

    let mut xi = xi_prime;
    let mut eta = eta_prime;
    for (j, alpha) in ALPHA.iter().enumerate() {
        let k = 2.0 * (j + 1) as f64;
        xi += alpha * (k * xi_prime).sin() * (k * eta_prime).cosh();
        eta += alpha * (k * xi_prime).cos() * (k * eta_prime).sinh();
    }

    (SCALED_RECTIFYING_RADIUS * eta, SCALED_RECTIFYING_RADIUS * xi)
}
