//! Tests d'intégration du service de conversion

use std::f64::consts::SQRT_2;

use mgrs::{
    from_mgrs, geodetic_to_mgrs, to_mgrs, ConversionError, GeodeticCoordinate, MgrsCoordinate,
    Stage,
};
use rayon::prelude::*;

/// Points de référence (lat, lon) → MGRS 1 m, zone par défaut
const REFERENCE_POINTS: &[(f64, f64, &str)] = &[
    (38.8895, -77.0353, "18SUJ2347806483"),
    (0.0, 0.0, "31NAA6602100000"),
    (-33.8568, 151.2153, "56HLH3490052288"),
    (84.0, 0.0, "31XDP6500529005"),
    (-80.0, 0.0, "31CDM4186716915"),
    (60.0, 5.0, "32VKM7697958157"),
    (78.0, 15.0, "33XWG0000058369"),
    (0.0, 180.0, "60NZF3397800000"),
    (-34.0, 18.0, "34HBH2290833785"),
    (51.5, -0.1275, "30UXC9936909341"),
    (35.6586, 139.7454, "54SUE8643746808"),
    (72.0, 0.5, "31XDV1379690721"),
    (56.0, 3.5, "32VJH5717419738"),
    (45.0, 6.0, "32TKQ6355387329"),
    (-45.5, -70.2, "19GDK0624760803"),
    (83.5, 30.0, "35XNN3789873261"),
    (-79.5, 170.0, "59CMM7965674046"),
];

/// Échantillon régulier couvrant tout le domaine UTM
fn grid_sample() -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    let mut lat = -79.75;
    while lat <= 83.75 {
        let mut lon = -179.3;
        while lon < 180.0 {
            points.push((lat, lon));
            lon += 7.1;
        }
        lat += 3.7;
    }
    points
}

fn distance_m(a: GeodeticCoordinate, b: GeodeticCoordinate) -> f64 {
    // Approximation locale, suffisante à l'échelle du mètre
    let mean_lat = ((a.latitude + b.latitude) / 2.0).to_radians();
    let mut dlon = b.longitude - a.longitude;
    if dlon > 180.0 {
        dlon -= 360.0;
    } else if dlon < -180.0 {
        dlon += 360.0;
    }
    let dy = (b.latitude - a.latitude) * 111_320.0;
    let dx = dlon * 111_320.0 * mean_lat.cos();
    dx.hypot(dy)
}

#[test]
fn test_reference_points() {
    for &(lat, lon, expected) in REFERENCE_POINTS {
        let mgrs = to_mgrs(lat, lon, 0).unwrap();
        assert_eq!(mgrs, expected, "({lat}, {lon})");
    }
}

#[test]
fn test_decode_reference_points() {
    let cases = [
        ("18SUJ2347806483", 38.88949780951524, -77.03530066805324),
        ("56HLH3490052288", -33.8568066979483, 151.21529370353971),
        ("04QFJ1234567890", 21.4097966722, -157.9160811742),
        ("18SUJ", 38.82609253750642, -77.30392503562524),
        ("33XWG0000058369", 77.99999475, 15.0),
    ];
    for (text, lat, lon) in cases {
        let coord = from_mgrs(text).unwrap();
        assert!((coord.latitude - lat).abs() < 1e-8, "{text}: lat={}", coord.latitude);
        assert!((coord.longitude - lon).abs() < 1e-8, "{text}: lon={}", coord.longitude);
    }
}

#[test]
fn test_published_washington_reference_is_close() {
    // Référence publiée arrondie, à une centaine de mètres du point exact
    let published = from_mgrs("18SUJ2338306479").unwrap();
    let error = distance_m(GeodeticCoordinate::new(38.8895, -77.0353), published);
    assert!(error < 100.0, "{error} m");
}

#[test]
fn test_roundtrip_within_one_cell() {
    // Le décodage rend le coin sud-ouest : l'écart maximal est la diagonale de 1 m, soit √2 m
    for (lat, lon) in grid_sample() {
        let text = to_mgrs(lat, lon, 0).unwrap();
        let back = from_mgrs(&text).unwrap();
        let error = distance_m(GeodeticCoordinate::new(lat, lon), back);
        assert!(error < 1.5, "{text}: {error} m from ({lat}, {lon})");
    }
}

#[test]
fn test_roundtrip_with_adjacent_zones() {
    for (lat, lon) in grid_sample() {
        let zone = mgrs::projection::default_zone(lat, lon);
        for neighbour in [zone % 60 + 1, (zone + 58) % 60 + 1] {
            let Ok(text) = to_mgrs(lat, lon, neighbour) else {
                // Trop loin du méridien central de la zone voisine
                continue;
            };
            assert!(text.starts_with(&format!("{neighbour:02}")), "{text}");
            let back = from_mgrs(&text).unwrap();
            let error = distance_m(GeodeticCoordinate::new(lat, lon), back);
            assert!(error < 1.5, "{text}: {error} m from ({lat}, {lon})");
        }
    }
}

#[test]
fn test_reencoding_decoded_point_is_stable() {
    // À 100 km, le coin sud-ouest peut tomber dans la bande voisine : précision ≥ 1
    for (lat, lon) in grid_sample() {
        for precision in 1..=5 {
            let coord = GeodeticCoordinate::new(lat, lon);
            let first = geodetic_to_mgrs(coord, None, precision).unwrap();
            let corner = from_mgrs(&first.to_string()).unwrap();
            let second = geodetic_to_mgrs(corner, Some(first.zone()), precision).unwrap();
            assert_eq!(first, second, "({lat}, {lon}) precision {precision}");
        }
    }
}

#[test]
fn test_precision_prefixes() {
    // Réduire la précision tronque : chaque chaîne est contenue dans la suivante
    for (lat, lon) in grid_sample() {
        let coord = GeodeticCoordinate::new(lat, lon);
        let full = geodetic_to_mgrs(coord, None, 5).unwrap();
        for precision in 0..5u8 {
            let reduced = geodetic_to_mgrs(coord, None, precision).unwrap();
            let digits = usize::from(precision);
            assert_eq!(reduced.grid_zone_designator(), full.grid_zone_designator());
            assert_eq!(reduced.square_id(), full.square_id());
            assert_eq!(reduced.easting_digits(), &full.easting_digits()[..digits]);
            assert_eq!(reduced.northing_digits(), &full.northing_digits()[..digits]);
        }
    }
}

#[test]
fn test_fewer_digits_never_move_closer() {
    // Coin sud-ouest : l'écart croît quand la précision baisse, borné par la diagonale
    for (lat, lon) in grid_sample() {
        let coord = GeodeticCoordinate::new(lat, lon);
        let mut previous = 0.0;
        for precision in (0..=5u8).rev() {
            let mgrs = geodetic_to_mgrs(coord, None, precision).unwrap();
            let corner = from_mgrs(&mgrs.to_string()).unwrap();
            let error = distance_m(coord, corner);

            let bound = SQRT_2 * mgrs.precision_meters() * 1.01;
            assert!(error <= bound, "{mgrs}: {error} m > {bound} m from ({lat}, {lon})");
            assert!(
                error >= previous - 1e-6,
                "{mgrs}: {error} m closer than {previous} m with more digits"
            );
            previous = error;
        }
    }
}

#[test]
fn test_northing_monotonic_along_meridian() {
    let mut previous = f64::NEG_INFINITY;
    let mut lat = -79.9;
    while lat < 84.0 {
        let text = to_mgrs(lat, 3.0, 31).unwrap();
        let corner = from_mgrs(&text).unwrap();
        assert!(corner.latitude > previous, "{text} not north of previous cell");
        previous = corner.latitude;
        lat += 0.37;
    }
}

#[test]
fn test_zone_override_rules() {
    // 18 est la zone de Washington : 17 et 19 sont voisines, 16 ne l'est pas
    assert_eq!(to_mgrs(38.8895, -77.0353, 17).unwrap(), "17SRD4390211991");

    let err = to_mgrs(38.8895, -77.0353, 16).unwrap_err();
    assert_eq!(err.stage, Stage::Projection);
    assert!(matches!(
        err.kind(),
        ConversionError::InvalidZoneOverride {
            requested: 16,
            computed: 18
        }
    ));

    // Zone 19 acceptée, mais l'easting sort de la grille
    let err = to_mgrs(38.8895, -77.0353, 19).unwrap_err();
    assert_eq!(err.stage, Stage::Encoding);
    assert!(matches!(err.kind(), ConversionError::EastingOutOfRange(_)));

    // Les zones 1 et 60 sont voisines
    assert_eq!(to_mgrs(0.0, -179.5, 60).unwrap(), "60NZF8970600000");
    assert_eq!(to_mgrs(0.0, 179.5, 1).unwrap(), "01NAA1029300000");

    let err = to_mgrs(0.0, 0.0, 61).unwrap_err();
    assert_eq!(err.stage, Stage::Projection);
    assert!(matches!(
        err.kind(),
        ConversionError::InvalidZoneOverride { requested: 61, .. }
    ));
}

#[test]
fn test_polar_limits() {
    assert!(to_mgrs(84.0, 0.0, 0).is_ok());
    assert!(to_mgrs(-80.0, 0.0, 0).is_ok());

    for lat in [84.0001, -80.0001, 90.0, -90.0] {
        let err = to_mgrs(lat, 0.0, 0).unwrap_err();
        assert_eq!(err.stage, Stage::Projection);
        assert_eq!(err.kind(), &ConversionError::PolarRegionUnsupported(lat));
    }

    let err = to_mgrs(91.0, 0.0, 0).unwrap_err();
    assert_eq!(err.kind(), &ConversionError::LatitudeOutOfRange(91.0));
    let err = to_mgrs(0.0, 181.0, 0).unwrap_err();
    assert_eq!(err.kind(), &ConversionError::LongitudeOutOfRange(181.0));
}

#[test]
fn test_malformed_strings() {
    for text in [
        "",
        "ZZinvalid",
        "18SUJ233",
        "61SUJ2347806483",
        "18IUJ2347806483",
        "18SAJ2347806483",
        "18SUW2347806483",
        "18SUJ234780648312",
        "18NUT2347806483",
    ] {
        let err = from_mgrs(text).unwrap_err();
        assert_eq!(err.stage, Stage::Decoding, "{text:?}");
        assert!(
            matches!(err.kind(), ConversionError::MalformedMgrsString { .. }),
            "{text:?}: {err}"
        );
    }
}

#[test]
fn test_lenient_parsing() {
    let strict = from_mgrs("18SUJ2347806483").unwrap();
    assert_eq!(from_mgrs("18suj2347806483").unwrap(), strict);
    assert_eq!(from_mgrs("18S UJ 23478 06483").unwrap(), strict);
    assert_eq!(from_mgrs("  18SUJ2347806483\n").unwrap(), strict);

    let parsed: MgrsCoordinate = "18s uj 234 064".parse().unwrap();
    assert_eq!(parsed.to_string(), "18SUJ234064");
}

#[test]
fn test_concurrent_conversions() {
    let points = grid_sample();
    let sequential: Vec<String> = points
        .iter()
        .map(|&(lat, lon)| to_mgrs(lat, lon, 0).unwrap())
        .collect();
    let parallel: Vec<String> = points
        .par_iter()
        .map(|&(lat, lon)| to_mgrs(lat, lon, 0).unwrap())
        .collect();
    assert_eq!(sequential, parallel);

    let decoded: Vec<_> = parallel.par_iter().map(|text| from_mgrs(text)).collect();
    assert!(decoded.iter().all(Result::is_ok));
}
