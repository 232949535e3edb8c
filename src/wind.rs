//! Conversion between apparent and true wind, and default wind grids.
//!
//! Wind points are `[wind speed, wind angle, boat speed]` with angles in
//! degrees.

use log::warn;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum WindError {
    #[error("wind point {index} contains a non-finite value")]
    NonFinite { index: usize },
    #[error("resolution step must be positive, got {0}")]
    NonPositiveResolution(f64),
}

pub const MAX_RESOLUTION_WIND_SPEED: f64 = 40.0;
pub const MAX_RESOLUTION_WIND_ANGLE: f64 = 360.0;

pub fn apparent_wind_to_true(wind: &[[f64; 3]]) -> Result<Vec<[f64; 3]>, WindError> {
    convert_wind(wind, -1.0)
}

pub fn true_wind_to_apparent(wind: &[[f64; 3]]) -> Result<Vec<[f64; 3]>, WindError> {
    convert_wind(wind, 1.0)
}

fn convert_wind(wind: &[[f64; 3]], sign: f64) -> Result<Vec<[f64; 3]>, WindError> {
    if let Some(index) = wind.iter().position(|p| p.iter().any(|v| !v.is_finite())) {
        return Err(WindError::NonFinite { index });
    }

    let converted = wind
        .iter()
        .map(|&[ws, wa, bsp]| {
            let rad = wa.to_radians();
            let cws = (ws * ws + bsp * bsp + sign * 2.0 * ws * bsp * rad.cos()).max(0.0).sqrt();

            let cos_cwa = if cws > 0.0 {
                ((ws * rad.cos() + sign * bsp) / cws).clamp(-1.0, 1.0)
            } else {
                1.0
            };
            let cwa = cos_cwa.acos().to_degrees();

            // arccos only covers [0, 180], port side angles are mirrored back
            let cwa = if wa > 180.0 { 360.0 - cwa } else { cwa };
            [cws, cwa, bsp]
        })
        .collect();

    Ok(converted)
}

fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    (0..)
        .map(|i| start + i as f64 * step)
        .take_while(|v| *v < stop)
        .collect()
}

/// Wind speed grid, `2, 4, ..., 40` by default or `step, 2 * step, ...` below 40
pub fn wind_speed_resolution(step: Option<f64>) -> Result<Vec<f64>, WindError> {
    match step {
        None => Ok(arange(2.0, MAX_RESOLUTION_WIND_SPEED + 2.0, 2.0)),
        Some(step) => resolution(step, MAX_RESOLUTION_WIND_SPEED),
    }
}

/// Wind angle grid, `0, 5, ..., 355` by default or `step, 2 * step, ...` below 360
pub fn wind_angle_resolution(step: Option<f64>) -> Result<Vec<f64>, WindError> {
    match step {
        None => Ok(arange(0.0, MAX_RESOLUTION_WIND_ANGLE, 5.0)),
        Some(step) => resolution(step, MAX_RESOLUTION_WIND_ANGLE),
    }
}

fn resolution(step: f64, stop: f64) -> Result<Vec<f64>, WindError> {
    if !(step > 0.0) || !step.is_finite() {
        return Err(WindError::NonPositiveResolution(step));
    }
    if step >= stop {
        warn!("resolution step {step} is not below {stop}, grid is empty");
    }
    Ok(arange(step, stop, step))
}
