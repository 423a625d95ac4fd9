//! Définition de l'ellipsoïde WGS84
//!
//! Constantes de processus : évaluées à la compilation, jamais modifiées.

/// Ellipsoïde WGS84
pub struct WGS84;

impl WGS84 {
    /// Demi-grand axe (rayon équatorial) en mètres
    pub const A: f64 = 6378137.0;

    /// Aplatissement
    pub const F: f64 = 1.0 / 298.257223563;

    /// Première excentricité au carré
    pub const E2: f64 = 2.0 * Self::F - Self::F * Self::F;

    /// Première excentricité
    pub const E: f64 = 0.0818191908426215; // sqrt(E2)

    /// Troisième aplatissement n = f / (2 - f)
    pub const N: f64 = Self::F / (2.0 - Self::F);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eccentricity_consistent() {
        assert!((WGS84::E * WGS84::E - WGS84::E2).abs() < 1e-15);
        assert!((WGS84::E2 - 0.00669437999014).abs() < 1e-13);
    }

    #[test]
    fn test_third_flattening() {
        assert!((WGS84::N - 0.0016792203863837).abs() < 1e-15);
    }
}
