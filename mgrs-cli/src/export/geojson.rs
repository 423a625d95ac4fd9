//! Export GeoJSON avec geozero (streaming)

use std::io::Write;

use anyhow::Result;
use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;

use crate::batch::{Outcome, Record};

/// Écrit les conversions réussies en FeatureCollection de points
///
/// Les lignes en erreur n'ont pas de position : elles sont absentes de la collection.
pub fn write_feature_collection<W: Write>(writer: &mut W, records: &[Record]) -> Result<usize> {
    write!(
        writer,
        r#"{{"type":"FeatureCollection","crs":{{"type":"name","properties":{{"name":"urn:ogc:def:crs:OGC:1.3:CRS84"}}}},"features":["#
    )?;

    let mut written = 0;
    for record in records {
        let Outcome::Ok {
            mgrs,
            latitude,
            longitude,
        } = &record.outcome
        else {
            continue;
        };
        if written > 0 {
            write!(writer, ",")?;
        }
        write_feature(writer, record.line, &record.input, mgrs, *latitude, *longitude)?;
        written += 1;
    }

    writeln!(writer, "]}}")?;
    Ok(written)
}

/// Écrit une feature ponctuelle
fn write_feature<W: Write>(
    writer: &mut W,
    line: usize,
    input: &str,
    mgrs: &str,
    latitude: f64,
    longitude: f64,
) -> Result<()> {
    write!(
        writer,
        r#"{{"type":"Feature","id":{},"#,
        serde_json::to_string(mgrs)?
    )?;

    // Géométrie via geozero
    write!(writer, r#""geometry":"#)?;
    let point = geo::Geometry::Point(geo::Point::new(longitude, latitude));
    let mut geom_buf = Vec::new();
    let mut geom_writer = GeoJsonWriter::new(&mut geom_buf);
    point.process_geom(&mut geom_writer)?;
    writer.write_all(&geom_buf)?;

    write!(
        writer,
        r#","properties":{{"line":{},"input":{},"mgrs":{}}}}}"#,
        line,
        serde_json::to_string(input)?,
        serde_json::to_string(mgrs)?
    )?;

    Ok(())
}
