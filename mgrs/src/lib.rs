//! # mgrs
//!
//! Conversions entre coordonnées géodésiques WGS84, UTM et MGRS (Military Grid
//! Reference System).
//!
//! ## Features
//!
//! - Projection UTM par séries de Krüger (ordre 6), précision sub-millimétrique
//! - Exceptions de zone Norvège / Svalbard, zone forcée sur une zone voisine
//! - Encodage MGRS de 0 à 5 chiffres par axe (100 km à 1 m), par troncature
//! - Décodage tolérant (casse, espaces) avec contrôle de cohérence de la bande
//! - Erreurs typées, étiquetées avec l'étape de conversion fautive
//! - Types `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! Les régions polaires (UPS, au-delà de 84°N et 80°S) ne sont pas supportées.
//!
//! ## Usage
//!
//! ```rust
//! use mgrs::{from_mgrs, geodetic_to_mgrs, to_mgrs, GeodeticCoordinate};
//!
//! let text = to_mgrs(38.8895, -77.0353, 0)?;
//! assert_eq!(text, "18SUJ2347806483");
//!
//! let coarse = geodetic_to_mgrs(GeodeticCoordinate::new(38.8895, -77.0353), Some(17), 2)?;
//! assert_eq!(coarse.to_string(), "17SRD4311");
//!
//! let corner = from_mgrs("18SUJ2347806483")?;
//! println!("{} {}", corner.latitude, corner.longitude);
//! # Ok::<(), mgrs::MgrsError>(())
//! ```

pub mod convert;
pub mod ellipsoid;
pub mod error;
pub mod grid;
pub mod projection;
pub mod types;

pub use convert::{from_mgrs, geodetic_to_mgrs, to_mgrs, DEFAULT_PRECISION};
pub use error::{ConversionError, MgrsError, Stage};
pub use types::{GeodeticCoordinate, Hemisphere, MgrsCoordinate, UtmCoordinate};
