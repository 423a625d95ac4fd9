//! Projection UTM (Universal Transverse Mercator) sur WGS84
//!
//! Séries de Krüger à l'ordre 6 en n (Karney 2011), dans les deux sens :
//! - `forward` : géodésique → UTM, avec zone forcée optionnelle
//! - `inverse` : UTM → géodésique
//!
//! Exactitude nanométrique jusqu'à plusieurs milliers de km du méridien central,
//! donc largement sous le millimètre dans une zone et ses voisines.

pub mod forward;
pub mod inverse;

pub use forward::project;
pub use inverse::unproject;

use tracing::debug;

use crate::ellipsoid::WGS84;
use crate::ConversionError;

/// Facteur d'échelle sur le méridien central
pub const K0: f64 = 0.9996;

/// False easting
pub const FALSE_EASTING: f64 = 500_000.0;

/// False northing de l'hémisphère sud
pub const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Limite nord de l'UTM (au-delà : UPS)
pub const MAX_LATITUDE: f64 = 84.0;

/// Limite sud de l'UTM (au-delà : UPS)
pub const MIN_LATITUDE: f64 = -80.0;

/// Fenêtre de validité des eastings
pub const MIN_EASTING: f64 = 100_000.0;
pub const MAX_EASTING: f64 = 900_000.0;

/// Fenêtre de validité des northings (les deux hémisphères)
pub const MIN_NORTHING: f64 = 0.0;
pub const MAX_NORTHING: f64 = 10_000_000.0;

/// Nombre de zones UTM
pub const ZONE_COUNT: u8 = 60;

const N: f64 = WGS84::N;
const N2: f64 = N * N;
const N3: f64 = N2 * N;
const N4: f64 = N3 * N;
const N5: f64 = N4 * N;
const N6: f64 = N5 * N;

/// Rayon rectifiant multiplié par k0 (A de Krüger)
const SCALED_RECTIFYING_RADIUS: f64 =
    K0 * WGS84::A / (1.0 + N) * (1.0 + N2 / 4.0 + N4 / 64.0 + N6 / 256.0);

/// Coefficients alpha (conforme → transverse Mercator)
const ALPHA: [f64; 6] = [
    N / 2.0 - 2.0 / 3.0 * N2 + 5.0 / 16.0 * N3 + 41.0 / 180.0 * N4 - 127.0 / 288.0 * N5
        + 7891.0 / 37800.0 * N6,
    13.0 / 48.0 * N2 - 3.0 / 5.0 * N3 + 557.0 / 1440.0 * N4 + 281.0 / 630.0 * N5
        - 1983433.0 / 1935360.0 * N6,
    61.0 / 240.0 * N3 - 103.0 / 140.0 * N4 + 15061.0 / 26880.0 * N5 + 167603.0 / 181440.0 * N6,
    49561.0 / 161280.0 * N4 - 179.0 / 168.0 * N5 + 6601661.0 / 7257600.0 * N6,
    34729.0 / 80640.0 * N5 - 3418889.0 / 1995840.0 * N6,
    212378941.0 / 319334400.0 * N6,
];

/// Coefficients beta (transverse Mercator → conforme)
const BETA: [f64; 6] = [
    N / 2.0 - 2.0 / 3.0 * N2 + 37.0 / 96.0 * N3 - 1.0 / 360.0 * N4 - 81.0 / 512.0 * N5
        + 96199.0 / 604800.0 * N6,
    1.0 / 48.0 * N2 + 1.0 / 15.0 * N3 - 437.0 / 1440.0 * N4 + 46.0 / 105.0 * N5
        - 1118711.0 / 3870720.0 * N6,
    17.0 / 480.0 * N3 - 37.0 / 840.0 * N4 - 209.0 / 4480.0 * N5 + 5569.0 / 90720.0 * N6,
    4397.0 / 161280.0 * N4 - 11.0 / 504.0 * N5 - 830251.0 / 7257600.0 * N6,
    4583.0 / 161280.0 * N5 - 108847.0 / 3991680.0 * N6,
    20648693.0 / 638668800.0 * N6,
];

/// Nombre maximal d'itérations de Newton pour la latitude géodésique
const MAX_ITERATIONS: usize = 8;

/// Longitude du méridien central d'une zone (degrés)
pub fn central_meridian(zone: u8) -> f64 {
    f64::from(zone) * 6.0 - 183.0
}

/// Ramène une longitude dans [-180, 180)
pub(crate) fn normalize_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Vérifie qu'un numéro de zone est dans [1, 60]
pub(crate) fn check_zone(zone: u8) -> Result<(), ConversionError> {
    if (1..=ZONE_COUNT).contains(&zone) {
        Ok(())
    } else {
        Err(ConversionError::ZoneOutOfRange(zone))
    }
}

/// Zone UTM par défaut d'une position
///
/// `floor((lon + 180) / 6) + 1` borné à [1, 60], sauf :
/// - Norvège : lat ∈ [56, 64) et lon ∈ [3, 12) → 32
/// - Svalbard : lat ≥ 72, lon ∈ [0, 9) → 31, [9, 21) → 33, [21, 33) → 35, [33, 42) → 37
pub fn default_zone(latitude: f64, longitude: f64) -> u8 {
    let zone = ((longitude + 180.0) / 6.0).floor() as i32 + 1;
    let zone = zone.clamp(1, i32::from(ZONE_COUNT)) as u8;

    let exception = if (56.0..64.0).contains(&latitude) && (3.0..12.0).contains(&longitude) {
        Some(32)
    } else if latitude >= 72.0 {
        match longitude {
            lon if (0.0..9.0).contains(&lon) => Some(31),
            lon if (9.0..21.0).contains(&lon) => Some(33),
            lon if (21.0..33.0).contains(&lon) => Some(35),
            lon if (33.0..42.0).contains(&lon) => Some(37),
            _ => None,
        }
    } else {
        None
    };

    match exception {
        Some(special) if special != zone => {
            debug!(latitude, longitude, zone, special, "UTM zone exception applied");
            special
        }
        _ => zone,
    }
}

/// Résout la zone effective : zone par défaut, ou zone forcée si elle lui est adjacente
///
/// L'adjacence est circulaire (60 et 1 sont voisines).
pub fn resolve_zone(
    latitude: f64,
    longitude: f64,
    zone_override: Option<u8>,
) -> Result<u8, ConversionError> {
    let computed = default_zone(latitude, longitude);
    let Some(requested) = zone_override else {
        return Ok(computed);
    };

    let adjacent = (1..=ZONE_COUNT).contains(&requested) && {
        let gap = (i16::from(requested) - i16::from(computed)).rem_euclid(i16::from(ZONE_COUNT));
        gap <= 1 || gap == i16::from(ZONE_COUNT) - 1
    };

    if adjacent {
        Ok(requested)
    } else {
        Err(ConversionError::InvalidZoneOverride {
            requested,
            computed,
        })
    }
}

/// tan(latitude conforme) depuis tan(latitude géodésique)
fn conformal_tan(tau: f64) -> f64 {
    let sigma = (WGS84::E * (WGS84::E * tau / tau.hypot(1.0)).atanh()).sinh();
    tau * sigma.hypot(1.0) - sigma * tau.hypot(1.0)
}

/// tan(latitude géodésique) depuis tan(latitude conforme), par Newton borné
fn geodetic_tan(tau_prime: f64) -> f64 {
    let e2m = 1.0 - WGS84::E2;
    let mut tau = tau_prime / e2m;
    let tolerance = 0.1 * f64::EPSILON.sqrt() * tau.abs().max(1.0);

    for _ in 0..MAX_ITERATIONS {
        let tau_i = conformal_tan(tau);
        let delta = (tau_prime - tau_i) / tau_i.hypot(1.0) * (1.0 + e2m * tau * tau)
            / (e2m * tau.hypot(1.0));
        tau += delta;
        if delta.abs() <= tolerance {
            break;
        }
    }
    tau
}
