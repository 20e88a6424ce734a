//! Terminal output for styled markers.
//!
//! Supports human-readable (with colors), JSON, and NDJSON formats.

use std::io::{self, Write};

use serde::Serialize;

use crate::models::EventRecord;
use crate::style::{DepthColor, MarkerSpec};

// ANSI color codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable terminal output (default)
    #[default]
    Human,
    /// JSON array
    Json,
    /// Newline-delimited JSON (one object per line)
    Ndjson,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "ndjson" => Ok(Self::Ndjson),
            _ => Err(format!("unknown format: {s} (expected: human, json, ndjson)")),
        }
    }
}

/// One event with the marker it is drawn as.
#[derive(Debug, Clone, Serialize)]
pub struct OutputMarker<'a> {
    pub place: &'a str,
    pub magnitude: Option<f64>,
    pub depth_km: Option<f64>,
    pub time: String,
    #[serde(flatten)]
    pub marker: &'a MarkerSpec,
}

impl<'a> OutputMarker<'a> {
    #[must_use]
    pub fn new(event: &'a EventRecord, marker: &'a MarkerSpec) -> Self {
        Self {
            place: &event.place,
            magnitude: event.magnitude,
            depth_km: event.depth_km(),
            time: event
                .time()
                .map_or_else(|| "unknown".into(), |t| t.to_rfc3339()),
            marker,
        }
    }
}

/// 24-bit ANSI foreground matching the marker fill.
fn ansi_color(color: DepthColor) -> String {
    let hex = color.hex().trim_start_matches('#');
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(255);
    format!("\x1b[38;2;{};{};{}m", channel(0), channel(2), channel(4))
}

/// Write markers in human-readable format, colored by depth.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human<W: Write>(writer: &mut W, markers: &[OutputMarker<'_>]) -> io::Result<()> {
    for m in markers {
        let mag_str = m
            .magnitude
            .map_or_else(|| "?".into(), |mag| format!("{mag:.1}"));

        let depth_str = m
            .depth_km
            .map_or_else(|| "?".into(), |depth| format!("{depth:.1}"));

        let fill = m.marker.style.fill_color;
        let color = ansi_color(fill);

        writeln!(
            writer,
            "{color}●{RESET} {BOLD}M{mag_str}{RESET} │ \
             r={radius:<5.1} │ \
             {color}{fill}{RESET} {DIM}{depth_str:>5}km{RESET} │ \
             {time} │ \
             {place}",
            time = m.time,
            radius = m.marker.style.radius,
            place = m.place,
        )?;
    }
    Ok(())
}

/// Write markers as a JSON array.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(writer: &mut W, markers: &[OutputMarker<'_>]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(markers)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}

/// Write markers as newline-delimited JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_ndjson<W: Write>(writer: &mut W, markers: &[OutputMarker<'_>]) -> io::Result<()> {
    for marker in markers {
        let json = serde_json::to_string(marker)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{json}")?;
    }
    Ok(())
}

/// Write markers in the specified format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_markers<W: Write>(
    writer: &mut W,
    markers: &[OutputMarker<'_>],
    format: Format,
) -> io::Result<()> {
    match format {
        Format::Human => write_human(writer, markers),
        Format::Json => write_json(writer, markers),
        Format::Ndjson => write_ndjson(writer, markers),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::Coordinates;
    use crate::style::style_event;

    fn sample() -> EventRecord {
        EventRecord {
            place: "5 km NE of Anza, CA".to_string(),
            magnitude: Some(4.0),
            time: 0,
            coordinates: Coordinates {
                longitude: -116.6,
                latitude: 33.6,
                depth_km: Some(95.0),
            },
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("human".parse::<Format>().unwrap(), Format::Human);
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("ndjson".parse::<Format>().unwrap(), Format::Ndjson);
        assert!("invalid".parse::<Format>().is_err());
    }

    #[test]
    fn test_ansi_color_from_hex() {
        assert_eq!(ansi_color(DepthColor::Red), "\x1b[38;2;255;0;0m");
        assert_eq!(ansi_color(DepthColor::Teal), "\x1b[38;2;32;178;170m");
    }

    #[test]
    fn test_human_output() {
        let event = sample();
        let marker = style_event(&event, &Utc);
        let mut buf = Vec::new();
        write_human(&mut buf, &[OutputMarker::new(&event, &marker)]).unwrap();

        let line = String::from_utf8(buf).unwrap();
        assert!(line.contains("M4.0"));
        assert!(line.contains("r=20.0"));
        assert!(line.contains("#ff0000"));
        assert!(line.contains(" 95.0km"));
        assert!(line.contains("1970-01-01T00:00:00+00:00"));
        assert!(line.trim_end().ends_with("5 km NE of Anza, CA"));
    }

    #[test]
    fn test_ndjson_output_one_line_per_marker() {
        let event = sample();
        let marker = style_event(&event, &Utc);
        let rows = [
            OutputMarker::new(&event, &marker),
            OutputMarker::new(&event, &marker),
        ];
        let mut buf = Vec::new();
        write_markers(&mut buf, &rows, Format::Ndjson).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["place"], "5 km NE of Anza, CA");
        assert_eq!(value["time"], "1970-01-01T00:00:00+00:00");
        assert_eq!(value["style"]["radius"], 20.0);
        assert_eq!(value["style"]["fillColor"], "#ff0000");
        assert_eq!(value["latitude"], 33.6);
    }

    #[test]
    fn test_json_output_is_array() {
        let mut buf = Vec::new();
        write_markers(&mut buf, &[], Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value, serde_json::json!([]));
    }
}
