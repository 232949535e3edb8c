//! Course planning on top of a polar diagram.

use std::fmt;

use thiserror::Error;

use crate::polar_table::PolarDiagramTable;
use crate::tools::{angle_distance, normalize_angle};

const ANGLE_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum CruisingError {
    #[error("no convex direction towards {direction} degrees at wind speed {wind_speed}")]
    NoConvexDirection { wind_speed: f64, direction: f64 },
}

/// A heading relative to the wind and the share of time to sail it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Direction {
    pub angle: f64,
    pub proportion: f64,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Sail at {}° to the wind for {:.2}% of the time",
            self.angle,
            self.proportion * 100.0
        )
    }
}

#[derive(Clone, Copy, Debug)]
struct CurvePoint {
    angle: f64,
    x: f64,
    y: f64,
}

fn cross(o: &CurvePoint, a: &CurvePoint, b: &CurvePoint) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Counter clockwise hull, collinear points dropped
fn convex_hull(mut points: Vec<CurvePoint>) -> Vec<CurvePoint> {
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    if points.len() < 3 {
        return points;
    }

    let mut lower: Vec<CurvePoint> = Vec::with_capacity(points.len());
    for p in points.iter() {
        while lower.len() >= 2 && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<CurvePoint> = Vec::with_capacity(points.len());
    for p in points.iter().rev() {
        while upper.len() >= 2 && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Splits sailing towards `direction` (degrees off the true wind) into at most
/// two headings on the convex hull of the polar curve at `wind_speed`.
///
/// When `direction` is itself a hull vertex it is sailed directly. Otherwise
/// the two headings bounding the hull edge the direction crosses are returned,
/// sorted by angle, with proportions summing to one so the mean velocity
/// points along `direction`.
pub fn convex_direction(
    table: &PolarDiagramTable,
    wind_speed: f64,
    direction: f64,
) -> Result<Vec<Direction>, CruisingError> {
    let direction = normalize_angle(direction);
    let no_direction = CruisingError::NoConvexDirection { wind_speed, direction };

    let points = table
        .slice(wind_speed)
        .into_iter()
        .filter(|(_, bsp)| *bsp > 0.0)
        .map(|(angle, bsp)| {
            let rad = angle.to_radians();
            CurvePoint {
                angle,
                x: bsp * rad.sin(),
                y: bsp * rad.cos(),
            }
        })
        .collect::<Vec<_>>();

    let hull = convex_hull(points);
    if hull.is_empty() {
        return Err(no_direction);
    }

    if let Some(vertex) = hull
        .iter()
        .find(|p| angle_distance(p.angle, direction) < ANGLE_TOLERANCE)
    {
        return Ok(vec![Direction {
            angle: vertex.angle,
            proportion: 1.0,
        }]);
    }

    let rad = direction.to_radians();
    let (dx, dy) = (rad.sin(), rad.cos());
    // cross product of the target direction with a hull point
    let side = |p: &CurvePoint| dx * p.y - dy * p.x;

    let mut best: Option<(f64, [Direction; 2])> = None;
    for (i, p) in hull.iter().enumerate() {
        let q = &hull[(i + 1) % hull.len()];
        let (sp, sq) = (side(p), side(q));
        if sp == sq || sp * sq > 0.0 {
            continue;
        }

        // weights of p and q whose combination lies on the target line
        let wp = sq / (sq - sp);
        let wq = 1.0 - wp;
        let distance = dx * (wp * p.x + wq * q.x) + dy * (wp * p.y + wq * q.y);
        if distance <= 0.0 || best.as_ref().is_some_and(|(d, _)| *d >= distance) {
            continue;
        }

        let mut pair = [
            Direction { angle: p.angle, proportion: wp },
            Direction { angle: q.angle, proportion: wq },
        ];
        pair.sort_by(|a, b| a.angle.total_cmp(&b.angle));
        best = Some((distance, pair));
    }

    match best {
        Some((_, pair)) => Ok(pair.into_iter().filter(|d| d.proportion > 0.0).collect()),
        None => Err(no_direction),
    }
}
