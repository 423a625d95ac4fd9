//! Écriture des résultats (texte, JSON, GeoJSON)

pub mod geojson;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::batch::{Direction, Outcome, Record};
use crate::config::OutputFormat;

/// Décimales des coordonnées géodésiques en sortie texte (~1 cm)
pub const COORD_DECIMALS: usize = 7;

/// Écrit les enregistrements dans le format demandé
pub fn write_records<W: Write>(
    writer: &mut W,
    records: &[Record],
    format: OutputFormat,
    direction: Direction,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(writer, records, direction)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, records)?;
            writeln!(writer)?;
        }
        OutputFormat::Geojson => {
            geojson::write_feature_collection(writer, records)?;
        }
    }
    Ok(())
}

/// Écrit vers un fichier, ou sur stdout si `output` est absent
pub fn write_output(
    output: Option<&Path>,
    records: &[Record],
    format: OutputFormat,
    direction: Direction,
) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .context(format!("Failed to create file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_records(&mut writer, records, format, direction)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            write_records(&mut writer, records, format, direction)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Une ligne par enregistrement, dans l'ordre de l'entrée
fn write_text<W: Write>(writer: &mut W, records: &[Record], direction: Direction) -> Result<()> {
    for record in records {
        writeln!(writer, "{}", text_line(record, direction))?;
    }
    Ok(())
}

/// Représentation texte d'un enregistrement
///
/// `to-mgrs` donne la chaîne MGRS, `from-mgrs` donne `lat lon`.
pub fn text_line(record: &Record, direction: Direction) -> String {
    match &record.outcome {
        Outcome::Ok {
            mgrs,
            latitude,
            longitude,
        } => match direction {
            Direction::ToMgrs => mgrs.clone(),
            Direction::FromMgrs => format_position(*latitude, *longitude),
        },
        Outcome::Error { stage, message } => {
            format!("ERROR line {} ({}): {}", record.line, stage, message)
        }
    }
}

/// `lat lon` avec `COORD_DECIMALS` décimales
pub fn format_position(latitude: f64, longitude: f64) -> String {
    format!(
        "{:.prec$} {:.prec$}",
        latitude,
        longitude,
        prec = COORD_DECIMALS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_mgrs_record() -> Record {
        Record {
            line: 1,
            input: "38.8895,-77.0353".to_string(),
            outcome: Outcome::Ok {
                mgrs: "18SUJ2347806483".to_string(),
                latitude: 38.8895,
                longitude: -77.0353,
            },
        }
    }

    fn from_mgrs_record() -> Record {
        Record {
            line: 2,
            input: "4qfj 12345 67890".to_string(),
            outcome: Outcome::Ok {
                mgrs: "04QFJ1234567890".to_string(),
                latitude: 21.4097966722,
                longitude: -157.9160811742,
            },
        }
    }

    fn error_record() -> Record {
        Record {
            line: 3,
            input: "91,0".to_string(),
            outcome: Outcome::Error {
                stage: "projection".to_string(),
                message: "Latitude out of range".to_string(),
            },
        }
    }

    #[test]
    fn test_text_output() {
        let records = vec![to_mgrs_record(), error_record()];
        let mut buffer = Vec::new();
        write_records(&mut buffer, &records, OutputFormat::Text, Direction::ToMgrs).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["18SUJ2347806483", "ERROR line 3 (projection): Latitude out of range"]);

        let line = text_line(&from_mgrs_record(), Direction::FromMgrs);
        assert_eq!(line, "21.4097967 -157.9160812");
    }

    #[test]
    fn test_json_output() {
        let records = vec![to_mgrs_record(), error_record()];
        let mut buffer = Vec::new();
        write_records(&mut buffer, &records, OutputFormat::Json, Direction::ToMgrs).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        let array = json.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["status"], "ok");
        assert_eq!(array[0]["mgrs"], "18SUJ2347806483");
        assert_eq!(array[1]["status"], "error");
        assert_eq!(array[1]["stage"], "projection");
    }

    #[test]
    fn test_write_output_file() {
        let path = std::env::temp_dir().join("mgrs_cli_export_test.geojson");
        write_output(
            Some(&path),
            &[to_mgrs_record()],
            OutputFormat::Geojson,
            Direction::ToMgrs,
        )
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#""type":"FeatureCollection""#));
        assert!(content.contains("18SUJ2347806483"));

        std::fs::remove_file(path).ok();
    }
}
