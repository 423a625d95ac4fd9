//! Service de conversion géodésique ⇄ MGRS
//!
//! Compose projection et grille, et étiquette chaque erreur avec l'étape qui l'a
//! produite. Sans état : appelable depuis n'importe quel thread.

use tracing::trace;

use crate::error::{MgrsError, Stage};
use crate::grid::{decode, encode};
use crate::projection::{project, unproject};
use crate::types::{GeodeticCoordinate, MgrsCoordinate};

/// Précision par défaut : 5 chiffres par axe (1 m)
pub const DEFAULT_PRECISION: u8 = 5;

/// Convertit une position géodésique en chaîne MGRS à 5 chiffres (1 m)
///
/// `utm_zone` à 0 laisse la zone par défaut, toute autre valeur est traitée comme
/// une zone forcée.
///
/// ```
/// let mgrs = mgrs::to_mgrs(38.8895, -77.0353, 0).unwrap();
/// assert_eq!(mgrs, "18SUJ2347806483");
/// ```
pub fn to_mgrs(latitude: f64, longitude: f64, utm_zone: u8) -> Result<String, MgrsError> {
    let zone = (utm_zone != 0).then_some(utm_zone);
    let mgrs = geodetic_to_mgrs(
        GeodeticCoordinate::new(latitude, longitude),
        zone,
        DEFAULT_PRECISION,
    )?;
    Ok(mgrs.to_string())
}

/// Convertit une position géodésique en coordonnée MGRS structurée
///
/// La bande est choisie sur la latitude d'entrée, pas sur celle recalculée depuis
/// l'UTM.
///
/// # Errors
///
/// Étape `Projection` pour les erreurs de position ou de zone forcée, `Encoding` pour
/// la précision et les positions hors grille dans la zone forcée.
pub fn geodetic_to_mgrs(
    coord: GeodeticCoordinate,
    zone: Option<u8>,
    precision: u8,
) -> Result<MgrsCoordinate, MgrsError> {
    let utm = project(coord, zone).map_err(Stage::Projection.tag())?;
    let mgrs = encode::encode_with_latitude(utm, coord.latitude, precision)
        .map_err(Stage::Encoding.tag())?;
    trace!(
        latitude = coord.latitude,
        longitude = coord.longitude,
        %utm,
        %mgrs,
        "to_mgrs"
    );
    Ok(mgrs)
}

/// Convertit une chaîne MGRS en position géodésique (coin sud-ouest de la cellule)
///
/// À 5 chiffres, le point rendu peut être jusqu'à √2 m de la position encodée.
///
/// ```
/// let coord = mgrs::from_mgrs("18SUJ2347806483").unwrap();
/// assert!((coord.latitude - 38.8895).abs() < 1e-4);
/// assert!((coord.longitude + 77.0353).abs() < 1e-4);
/// ```
pub fn from_mgrs(text: &str) -> Result<GeodeticCoordinate, MgrsError> {
    let utm = decode(text).map_err(Stage::Decoding.tag())?;
    let coord = unproject(utm).map_err(Stage::Unprojection.tag())?;
    trace!(input = text, %utm, latitude = coord.latitude, longitude = coord.longitude, "from_mgrs");
    Ok(coord)
}
