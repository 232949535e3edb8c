//! Reading polar diagrams from the text formats they are usually shipped in.
//!
//! - `hro`: written by [`PolarDiagramTable::to_csv`], first line is the type tag
//! - `orc`: `;` separated, as published by the Offshore Racing Congress, with a
//!   row of zeros under the wind speed header
//! - `opencpn`: `,` separated, as written by the OpenCPN polar plugin
//! - `array`: whitespace separated table, wind speeds in the first row and
//!   wind angles in the first column
//!
//! Empty cells (or `nan` in the array format) are missing boat speeds.

use std::{fmt, fs, path::Path, str::FromStr};

use log::debug;
use regex::Regex;

use crate::error::{PolarDiagramError, Result};
use crate::missing_values::{zero_fill, MissingValueFiller};
use crate::polar_table::{PolarDiagramTable, TABLE_TAG};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolarFormat {
    Array,
    Hro,
    Orc,
    OpenCpn,
}

impl PolarFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolarFormat::Array => "array",
            PolarFormat::Hro => "hro",
            PolarFormat::Orc => "orc",
            PolarFormat::OpenCpn => "opencpn",
        }
    }
}

impl fmt::Display for PolarFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PolarFormat {
    type Err = PolarDiagramError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "array" => Ok(PolarFormat::Array),
            "hro" => Ok(PolarFormat::Hro),
            "orc" => Ok(PolarFormat::Orc),
            "opencpn" => Ok(PolarFormat::OpenCpn),
            other => Err(PolarDiagramError::UnknownFormat(other.into())),
        }
    }
}

/// Table as read from an external format, missing boat speeds are NaN
#[derive(Clone, Debug, PartialEq)]
pub struct RawTable {
    pub wind_speeds: Vec<f64>,
    pub wind_angles: Vec<f64>,
    pub boat_speeds: Vec<Vec<f64>>,
}

/// Reads a polar diagram file.
///
/// With `interpolate_missing` the missing boat speeds are estimated by
/// `filler`, or the default filler when none is given. Without it missing
/// boat speeds become zero and the table reports no interpolation.
pub fn from_csv(
    path: impl AsRef<Path>,
    format: PolarFormat,
    interpolate_missing: bool,
    filler: Option<&MissingValueFiller>,
) -> Result<PolarDiagramTable> {
    let data = fs::read_to_string(path)?;
    from_csv_str(&data, format, interpolate_missing, filler)
}

pub fn from_csv_str(
    data: &str,
    format: PolarFormat,
    interpolate_missing: bool,
    filler: Option<&MissingValueFiller>,
) -> Result<PolarDiagramTable> {
    let raw = match format {
        PolarFormat::Hro => return read_hro(data),
        PolarFormat::Array => read_array(data)?,
        PolarFormat::Orc => read_orc(data)?,
        PolarFormat::OpenCpn => read_opencpn(data)?,
    };

    debug!(
        "read {} wind speeds and {} wind angles from {} data",
        raw.wind_speeds.len(),
        raw.wind_angles.len(),
        format
    );

    let (boat_speeds, interpolation_performed) = if interpolate_missing {
        let default_filler;
        let filler = match filler {
            Some(filler) => filler,
            None => {
                default_filler = MissingValueFiller::default();
                &default_filler
            }
        };
        filler.fill(&raw.wind_speeds, &raw.wind_angles, &raw.boat_speeds)?
    } else {
        (zero_fill(&raw.boat_speeds), false)
    };

    PolarDiagramTable::new_with_flags(
        raw.wind_speeds,
        raw.wind_angles,
        boat_speeds,
        interpolation_performed,
        false,
    )
}

fn read_hro(data: &str) -> Result<PolarDiagramTable> {
    let (tag, body) = data.split_once('\n').unwrap_or((data, ""));
    let tag = tag.trim();
    if tag != TABLE_TAG {
        return Err(PolarDiagramError::UnknownDiagramType(tag.into()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let rows = reader
        .records()
        .map(|record| -> Result<Vec<String>> { Ok(record?.iter().map(String::from).collect()) })
        .collect::<Result<Vec<Vec<String>>>>()?;

    PolarDiagramTable::from_hro_rows(&rows)
}

pub fn read_array(data: &str) -> Result<RawTable> {
    let delimiter = if data.contains('\t') { b'\t' } else { b' ' };
    let rows = read_rows(data, delimiter)?
        .into_iter()
        .map(|row| row.into_iter().filter(|cell| !cell.is_empty()).collect::<Vec<String>>())
        .filter(|row| !row.is_empty())
        .collect::<Vec<Vec<String>>>();

    table_from_rows(rows, false)
}

pub fn read_orc(data: &str) -> Result<RawTable> {
    table_from_rows(read_rows(data, b';')?, true)
}

pub fn read_opencpn(data: &str) -> Result<RawTable> {
    table_from_rows(read_rows(data, b',')?, false)
}

fn read_rows(data: &str, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_bytes());

    reader
        .records()
        .map(|record| -> Result<Vec<String>> { Ok(record?.iter().map(String::from).collect()) })
        .collect()
}

/// Leading number of a cell, so `52°` and `52Â°` both read as 52
fn parse_number(number: &Regex, cell: &str) -> Result<f64> {
    let Some(found) = number.find(cell) else {
        return Err(PolarDiagramError::ParseFailure(format!("`{cell}` is not a number")));
    };
    found
        .as_str()
        .parse::<f64>()
        .map_err(|e| PolarDiagramError::ParseFailure(format!("`{cell}`: {e}")))
}

fn parse_boat_speed(cell: &str) -> Result<f64> {
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .map_err(|e| PolarDiagramError::ParseFailure(format!("boat speed `{cell}`: {e}")))
}

fn table_from_rows(rows: Vec<Vec<String>>, skip_zero_row: bool) -> Result<RawTable> {
    let number = Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?")
        .map_err(|e| PolarDiagramError::ParseFailure(format!("failed to create number regex: {e}")))?;

    let mut rows = rows
        .into_iter()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()));

    let Some(header) = rows.next() else {
        return Err(PolarDiagramError::ParseFailure("missing wind speed header".into()));
    };
    // only trailing empty header cells are padding, an empty cell in between
    // would shift every boat speed column against its wind speed
    let used = header.iter().rposition(|cell| !cell.is_empty()).map_or(0, |i| i + 1);
    let wind_speeds = header[..used]
        .iter()
        .skip(1)
        .map(|cell| {
            if cell.is_empty() {
                return Err(PolarDiagramError::ParseFailure(
                    "empty wind speed in header".into(),
                ));
            }
            parse_number(&number, cell)
        })
        .collect::<Result<Vec<f64>>>()?;

    let mut wind_angles = Vec::new();
    let mut boat_speeds = Vec::new();
    for (i, row) in rows.enumerate() {
        let angle = parse_number(&number, &row[0])?;
        let mut speeds = row[1..]
            .iter()
            .map(|cell| parse_boat_speed(cell))
            .collect::<Result<Vec<f64>>>()?;

        if skip_zero_row && i == 0 && angle == 0.0 && speeds.iter().all(|v| *v == 0.0) {
            continue;
        }

        let n = wind_speeds.len();
        if speeds.len() > n && row[n + 1..].iter().all(|cell| cell.is_empty()) {
            speeds.truncate(n);
        }

        // trailing empty cells are often left out entirely
        if speeds.len() < wind_speeds.len() {
            speeds.resize(wind_speeds.len(), f64::NAN);
        }

        wind_angles.push(angle);
        boat_speeds.push(speeds);
    }

    Ok(RawTable {
        wind_speeds,
        wind_angles,
        boat_speeds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("orc".parse::<PolarFormat>().unwrap(), PolarFormat::Orc);
        assert_eq!("opencpn".parse::<PolarFormat>().unwrap(), PolarFormat::OpenCpn);
        assert_eq!("array".parse::<PolarFormat>().unwrap(), PolarFormat::Array);
        assert_eq!("hro".parse::<PolarFormat>().unwrap(), PolarFormat::Hro);
        assert!(matches!(
            "xlsx".parse::<PolarFormat>(),
            Err(PolarDiagramError::UnknownFormat(f)) if f == "xlsx"
        ));
    }

    #[test]
    fn test_read_orc() {
        let raw = read_orc("twa/tws;6;8;10\n0;0;0;0\n52°;3.74;;4.96\n60;3.98;4.73\n").unwrap();

        assert_eq!(raw.wind_speeds, vec![6.0, 8.0, 10.0]);
        assert_eq!(raw.wind_angles, vec![52.0, 60.0]);
        assert_eq!(raw.boat_speeds[0][0], 3.74);
        assert!(raw.boat_speeds[0][1].is_nan());
        assert_eq!(raw.boat_speeds[0][2], 4.96);
        assert!(raw.boat_speeds[1][2].is_nan());
    }

    #[test]
    fn test_read_orc_without_zero_row() {
        let raw = read_orc("twa/tws;6;8\n52;3.74;4.48\n").unwrap();
        assert_eq!(raw.wind_angles, vec![52.0]);
    }

    #[test]
    fn test_read_opencpn() {
        let raw = read_opencpn("TWA\\TWS,6,8\n45,4.2,\n90,5.0,5.8\n\n").unwrap();

        assert_eq!(raw.wind_speeds, vec![6.0, 8.0]);
        assert_eq!(raw.wind_angles, vec![45.0, 90.0]);
        assert!(raw.boat_speeds[0][1].is_nan());
        assert_eq!(raw.boat_speeds[1], vec![5.0, 5.8]);
    }

    #[test]
    fn test_read_array() {
        let raw = read_array("TWA\\TWS\t6\t8\n45\t4.2\tnan\n90\t5.0\t5.8\n").unwrap();
        assert_eq!(raw.wind_speeds, vec![6.0, 8.0]);
        assert!(raw.boat_speeds[0][1].is_nan());

        let raw = read_array("x   6   8\n45  4.2 4.6\n").unwrap();
        assert_eq!(raw.boat_speeds, vec![vec![4.2, 4.6]]);
    }

    #[test]
    fn test_header_with_trailing_separator() {
        let raw = read_orc("twa/tws;6;8;;\n52;3.74;4.48;;\n").unwrap();
        assert_eq!(raw.wind_speeds, vec![6.0, 8.0]);
        assert_eq!(raw.boat_speeds, vec![vec![3.74, 4.48]]);
    }

    #[test]
    fn test_header_with_empty_wind_speed() {
        let result = read_orc("twa/tws;6;;8\n52;3.74;4.1;4.48\n");
        assert!(matches!(result, Err(PolarDiagramError::ParseFailure(_))));
    }

    #[test]
    fn test_bad_boat_speed() {
        let result = read_opencpn("TWA\\TWS,6\n45,fast\n");
        assert!(matches!(result, Err(PolarDiagramError::ParseFailure(_))));
    }

    #[test]
    fn test_missing_values_zero_filled_without_interpolation() {
        let table = from_csv_str("TWA\\TWS,6,8\n45,4.2,\n90,5.0,5.8\n", PolarFormat::OpenCpn, false, None).unwrap();

        assert!(!table.interpolation_performed());
        assert_eq!(table.boat_speeds()[0], vec![4.2, 0.0]);
    }

    #[test]
    fn test_unknown_hro_type() {
        let result = from_csv_str("PolarDiagramCurve\nf\n", PolarFormat::Hro, false, None);
        assert!(matches!(
            result,
            Err(PolarDiagramError::UnknownDiagramType(t)) if t == "PolarDiagramCurve"
        ));
    }
}
