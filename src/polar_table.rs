use std::{fmt, fs, path::Path};

use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{PolarDiagramError, Result};
use crate::tools::{
    interpolation::{circular_weights, lerp, linear_interpolate, linear_weights},
    normalize_angle,
    vector::{argsort_partial, first_duplicate, min_max, take},
};

/// Type tag written as the first line of the hro format
pub const TABLE_TAG: &str = "PolarDiagramTable";

/// Boat speeds over a grid of true wind speeds and true wind angles.
///
/// `boat_speeds[i][j]` is the boat speed at `wind_angles[i]` and
/// `wind_speeds[j]`. Both axes are sorted ascending, angles live in
/// [0, 360) degrees, and every boat speed is finite. Tables are immutable,
/// transforms return new tables.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "TableRecord")]
pub struct PolarDiagramTable {
    wind_speeds: Vec<f64>,
    wind_angles: Vec<f64>,
    boat_speeds: Vec<Vec<f64>>,
    interpolation_performed: bool,
    symmetrization_performed: bool,
}

#[derive(Deserialize)]
struct TableRecord {
    wind_speeds: Vec<f64>,
    wind_angles: Vec<f64>,
    boat_speeds: Vec<Vec<f64>>,
    #[serde(default)]
    interpolation_performed: bool,
    #[serde(default)]
    symmetrization_performed: bool,
}

impl TryFrom<TableRecord> for PolarDiagramTable {
    type Error = PolarDiagramError;

    fn try_from(record: TableRecord) -> Result<Self> {
        PolarDiagramTable::new_with_flags(
            record.wind_speeds,
            record.wind_angles,
            record.boat_speeds,
            record.interpolation_performed,
            record.symmetrization_performed,
        )
    }
}

fn check_axis(axis: &'static str, values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(PolarDiagramError::EmptyAxis { axis });
    }
    if let Some(value) = values.iter().find(|v| !v.is_finite()) {
        return Err(PolarDiagramError::NonFiniteAxisValue { axis, value: *value });
    }
    if let Some(value) = first_duplicate(values) {
        return Err(PolarDiagramError::DuplicateAxisValue { axis, value });
    }
    Ok(())
}

impl PolarDiagramTable {
    pub fn new(wind_speeds: Vec<f64>, wind_angles: Vec<f64>, boat_speeds: Vec<Vec<f64>>) -> Result<Self> {
        PolarDiagramTable::new_with_flags(wind_speeds, wind_angles, boat_speeds, false, false)
    }

    /// Builds a table that records how its boat speeds came about.
    ///
    /// Wind angles are normalized into [0, 360) before the duplicate check,
    /// so 0° and 360° collide. Axes are sorted and the boat speeds reordered
    /// to match.
    pub fn new_with_flags(
        wind_speeds: Vec<f64>,
        wind_angles: Vec<f64>,
        boat_speeds: Vec<Vec<f64>>,
        interpolation_performed: bool,
        symmetrization_performed: bool,
    ) -> Result<Self> {
        check_axis("wind speed", &wind_speeds)?;
        check_axis("wind angle", &wind_angles)?;

        let ragged = boat_speeds.iter().find(|r| r.len() != wind_speeds.len());
        if boat_speeds.len() != wind_angles.len() || ragged.is_some() {
            return Err(PolarDiagramError::DimensionMismatch {
                rows: boat_speeds.len(),
                columns: ragged
                    .or(boat_speeds.first())
                    .map(|r| r.len())
                    .unwrap_or(0),
                wind_angles: wind_angles.len(),
                wind_speeds: wind_speeds.len(),
            });
        }

        let wind_angles: Vec<f64> = wind_angles.iter().map(|wa| normalize_angle(*wa)).collect();
        check_axis("wind angle", &wind_angles)?;

        for (row, speeds) in boat_speeds.iter().enumerate() {
            if let Some(column) = speeds.iter().position(|v| !v.is_finite()) {
                return Err(PolarDiagramError::NonFiniteBoatSpeed { row, column });
            }
        }

        Ok(PolarDiagramTable::sorted(
            wind_speeds,
            wind_angles,
            boat_speeds,
            interpolation_performed,
            symmetrization_performed,
        ))
    }

    /// Sorts already validated parts into a table
    fn sorted(
        wind_speeds: Vec<f64>,
        wind_angles: Vec<f64>,
        boat_speeds: Vec<Vec<f64>>,
        interpolation_performed: bool,
        symmetrization_performed: bool,
    ) -> Self {
        let speed_order = argsort_partial(&wind_speeds);
        let angle_order = argsort_partial(&wind_angles);

        let boat_speeds = angle_order
            .iter()
            .map(|&i| take(&boat_speeds[i], &speed_order))
            .collect();

        PolarDiagramTable {
            wind_speeds: take(&wind_speeds, &speed_order),
            wind_angles: take(&wind_angles, &angle_order),
            boat_speeds,
            interpolation_performed,
            symmetrization_performed,
        }
    }

    pub fn wind_speeds(&self) -> &[f64] {
        &self.wind_speeds
    }

    pub fn wind_angles(&self) -> &[f64] {
        &self.wind_angles
    }

    /// Rows follow the wind angles, columns the wind speeds
    pub fn boat_speeds(&self) -> &[Vec<f64>] {
        &self.boat_speeds
    }

    /// (number of wind angles, number of wind speeds)
    pub fn shape(&self) -> (usize, usize) {
        (self.wind_angles.len(), self.wind_speeds.len())
    }

    /// True if the missing value filler estimated at least one boat speed
    pub fn interpolation_performed(&self) -> bool {
        self.interpolation_performed
    }

    /// True if the table was produced by mirroring wind angles
    pub fn symmetrization_performed(&self) -> bool {
        self.symmetrization_performed
    }

    /// Boat speed at the given wind, interpolated linearly between grid points.
    ///
    /// Wind speeds outside the axis are clamped to the nearest column, wind
    /// angles wrap around the circle.
    pub fn boat_speed(&self, wind_speed: f64, wind_angle: f64) -> f64 {
        let (c0, c1, column_frac) = linear_weights(&self.wind_speeds, wind_speed);
        let (r0, r1, row_frac) = circular_weights(&self.wind_angles, wind_angle);

        let along_row = |r: usize| lerp(self.boat_speeds[r][c0], self.boat_speeds[r][c1], column_frac);
        lerp(along_row(r0), along_row(r1), row_frac)
    }

    /// Boat speeds for pairs of wind speeds and wind angles.
    /// A single value on either side is paired with every value of the other.
    pub fn boat_speeds_at(&self, wind_speeds: &[f64], wind_angles: &[f64]) -> Result<Vec<f64>> {
        let pairs: Vec<(f64, f64)> = match (wind_speeds.len(), wind_angles.len()) {
            (1, _) => wind_angles.iter().map(|wa| (wind_speeds[0], *wa)).collect(),
            (_, 1) => wind_speeds.iter().map(|ws| (*ws, wind_angles[0])).collect(),
            (s, a) if s == a => wind_speeds.iter().copied().zip(wind_angles.iter().copied()).collect(),
            (s, a) => {
                return Err(PolarDiagramError::QueryLengthMismatch {
                    wind_speeds: s,
                    wind_angles: a,
                })
            }
        };

        Ok(pairs.into_iter().map(|(ws, wa)| self.boat_speed(ws, wa)).collect())
    }

    /// (wind angle, boat speed) pairs of the polar curve at one wind speed
    pub fn slice(&self, wind_speed: f64) -> Vec<(f64, f64)> {
        self.wind_angles
            .iter()
            .zip(self.boat_speeds.iter())
            .map(|(wa, row)| (*wa, linear_interpolate(&self.wind_speeds, row, wind_speed)))
            .collect()
    }

    pub fn max_boat_speed(&self) -> f64 {
        let flat: Vec<f64> = self.boat_speeds.iter().flatten().copied().collect();
        min_max(&flat).1
    }

    /// Mirrors every wind angle `wa` to `360 - wa`.
    ///
    /// Rows already present on the mirrored side, like 0° and 180°, are kept
    /// as they are. The interpolation flag is carried over.
    pub fn symmetrize(&self) -> PolarDiagramTable {
        let starboard = self.wind_angles.iter().any(|wa| *wa > 0.0 && *wa < 180.0);
        let port = self.wind_angles.iter().any(|wa| *wa > 180.0);
        if starboard && port {
            warn!("symmetrizing a table with wind angles on both sides of the 0-180 axis, existing rows win");
        }

        let mut wind_angles = self.wind_angles.clone();
        let mut boat_speeds = self.boat_speeds.clone();
        for (wa, row) in self.wind_angles.iter().zip(self.boat_speeds.iter()) {
            let mirrored = normalize_angle(360.0 - wa);
            if !self.wind_angles.contains(&mirrored) {
                wind_angles.push(mirrored);
                boat_speeds.push(row.clone());
            }
        }

        PolarDiagramTable::sorted(
            self.wind_speeds.clone(),
            wind_angles,
            boat_speeds,
            self.interpolation_performed,
            true,
        )
    }

    /// Serializes to the hro format, the table's lossless round trip format
    pub fn to_csv_string(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(vec![]);

        writer.write_record([TABLE_TAG])?;
        writer.write_record(["TWS"])?;
        writer.write_record(format_row(&self.wind_speeds))?;
        writer.write_record(["TWA"])?;
        writer.write_record(format_row(&self.wind_angles))?;
        writer.write_record(["BSP"])?;
        for row in &self.boat_speeds {
            writer.write_record(format_row(row))?;
        }

        let data = writer
            .into_inner()
            .map_err(|e| PolarDiagramError::Io(e.into_error()))?;
        String::from_utf8(data).map_err(|e| PolarDiagramError::ParseFailure(e.to_string()))
    }

    pub fn to_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_csv_string()?)?;
        Ok(())
    }

    /// Parses the body of the hro format, everything after the type tag
    pub(crate) fn from_hro_rows(rows: &[Vec<String>]) -> Result<Self> {
        let mut rows = rows.iter().filter(|r| !(r.len() == 1 && r[0].is_empty()));

        expect_label(&mut rows, "TWS")?;
        let wind_speeds = parse_row(next_row(&mut rows, "wind speeds")?)?;
        expect_label(&mut rows, "TWA")?;
        let wind_angles = parse_row(next_row(&mut rows, "wind angles")?)?;
        expect_label(&mut rows, "BSP")?;
        let boat_speeds = rows.map(|r| parse_row(r)).collect::<Result<Vec<Vec<f64>>>>()?;

        PolarDiagramTable::new(wind_speeds, wind_angles, boat_speeds)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

fn format_row(row: &[f64]) -> Vec<String> {
    row.iter().map(|v| v.to_string()).collect()
}

fn parse_row(row: &[String]) -> Result<Vec<f64>> {
    row.iter()
        .map(|v| {
            v.parse::<f64>()
                .map_err(|e| PolarDiagramError::ParseFailure(format!("`{v}`: {e}")))
        })
        .collect()
}

fn next_row<'a>(rows: &mut impl Iterator<Item = &'a Vec<String>>, what: &str) -> Result<&'a Vec<String>> {
    rows.next()
        .ok_or_else(|| PolarDiagramError::ParseFailure(format!("missing {what}")))
}

fn expect_label<'a>(rows: &mut impl Iterator<Item = &'a Vec<String>>, label: &str) -> Result<()> {
    match rows.next() {
        Some(row) if row.len() == 1 && row[0] == label => Ok(()),
        other => Err(PolarDiagramError::ParseFailure(format!(
            "expected `{label}`, found {other:?}"
        ))),
    }
}

/// Tables are equal when their axes and boat speeds are; flags are history, not content
impl PartialEq for PolarDiagramTable {
    fn eq(&self, other: &Self) -> bool {
        self.wind_speeds == other.wind_speeds
            && self.wind_angles == other.wind_angles
            && self.boat_speeds == other.boat_speeds
    }
}

impl fmt::Display for PolarDiagramTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{:>10} {}",
            "TWA / TWS",
            self.wind_speeds.iter().map(|ws| format!("{:>6.1}", ws)).join(" ")
        )?;
        writeln!(f, "{}", "-".repeat(10 + 7 * self.wind_speeds.len()))?;
        for (wa, row) in self.wind_angles.iter().zip(self.boat_speeds.iter()) {
            writeln!(
                f,
                "{:>10.1} {}",
                wa,
                row.iter().map(|bsp| format!("{:>6.2}", bsp)).join(" ")
            )?;
        }
        Ok(())
    }
}
