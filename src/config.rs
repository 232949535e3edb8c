//! Tunables of the missing value filler, loadable from JSON.
//!
//! ```json
//! {
//!     "min_points": 3,
//!     "norm": "euclidean",
//!     "neighbourhood": { "kind": "ball", "radius": 2.0 },
//!     "interpolator": { "kind": "arithmetic_mean", "alpha": 1.0, "beta": 1.0 }
//! }
//! ```
//!
//! Every field is optional. The defaults are empirical starting points, not
//! derived optima. `"alpha": 50.0` selects the sharp decay preset described
//! at [`DEFAULT_ALPHA`].

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::interpolator::{ArithmeticMeanInterpolator, Interpolator, InverseDistanceInterpolator, DEFAULT_ALPHA};
use crate::missing_values::MIN_KNOWN_POINTS;
use crate::neighbourhood::{Ball, Cuboid, Ellipsoid, KNearest, Neighbourhood, DEFAULT_RADIUS};
use crate::tools::norm::Norm;

fn one() -> f64 {
    1.0
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

fn two() -> f64 {
    2.0
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    /// Below this many known boat speeds the table is zero filled
    pub min_points: usize,
    /// Norm used by the ball neighbourhood and the interpolator distances
    pub norm: Norm,
    pub neighbourhood: NeighbourhoodConfig,
    pub interpolator: InterpolatorConfig,
}

impl Default for FillConfig {
    fn default() -> Self {
        FillConfig {
            min_points: MIN_KNOWN_POINTS,
            norm: Norm::Euclidean,
            neighbourhood: NeighbourhoodConfig::default(),
            interpolator: InterpolatorConfig::default(),
        }
    }
}

impl FillConfig {
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        FillConfig::from_json(&data)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NeighbourhoodConfig {
    Ball {
        #[serde(default = "default_radius")]
        radius: f64,
    },
    Ellipsoid {
        semi_axes: Vec<f64>,
    },
    Cuboid {
        half_lengths: Vec<f64>,
    },
    KNearest {
        k: usize,
    },
}

impl Default for NeighbourhoodConfig {
    fn default() -> Self {
        NeighbourhoodConfig::Ball {
            radius: DEFAULT_RADIUS,
        }
    }
}

impl NeighbourhoodConfig {
    /// Fails for non-positive radii, axes or lengths and for `k == 0`
    pub fn build(&self, norm: &Norm) -> Result<Box<dyn Neighbourhood>> {
        Ok(match self {
            NeighbourhoodConfig::Ball { radius } => Box::new(Ball::with_norm(*radius, norm.clone())?),
            NeighbourhoodConfig::Ellipsoid { semi_axes } => Box::new(Ellipsoid::new(semi_axes.clone())?),
            NeighbourhoodConfig::Cuboid { half_lengths } => Box::new(Cuboid::new(half_lengths.clone())?),
            NeighbourhoodConfig::KNearest { k } => Box::new(KNearest::new(*k)?),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterpolatorConfig {
    ArithmeticMean {
        #[serde(default = "default_alpha")]
        alpha: f64,
        #[serde(default = "one")]
        beta: f64,
        #[serde(default = "one")]
        scale: f64,
    },
    InverseDistance {
        #[serde(default = "two")]
        power: f64,
    },
}

impl Default for InterpolatorConfig {
    fn default() -> Self {
        InterpolatorConfig::ArithmeticMean {
            alpha: DEFAULT_ALPHA,
            beta: 1.0,
            scale: 1.0,
        }
    }
}

impl InterpolatorConfig {
    pub fn build(&self, norm: &Norm) -> Box<dyn Interpolator> {
        match self {
            InterpolatorConfig::ArithmeticMean { alpha, beta, scale } => Box::new(
                ArithmeticMeanInterpolator::new(*alpha, *beta)
                    .with_scale(*scale)
                    .with_norm(norm.clone()),
            ),
            InterpolatorConfig::InverseDistance { power } => {
                Box::new(InverseDistanceInterpolator::new(*power).with_norm(norm.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::missing_values::MissingValueFiller;

    #[test]
    fn test_empty_json_is_default() {
        let config = FillConfig::from_json("{}").unwrap();
        assert_eq!(config, FillConfig::default());
        assert_eq!(config.min_points, 3);
        assert_eq!(config.neighbourhood, NeighbourhoodConfig::Ball { radius: 2.0 });
    }

    #[test]
    fn test_partial_json() {
        let config = FillConfig::from_json(
            r#"{
                "norm": { "scaled": [0.025, 0.0027] },
                "neighbourhood": { "kind": "k_nearest", "k": 4 },
                "interpolator": { "kind": "arithmetic_mean", "alpha": 50.0 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.min_points, 3);
        assert_eq!(config.norm, Norm::Scaled(vec![0.025, 0.0027]));
        assert_eq!(config.neighbourhood, NeighbourhoodConfig::KNearest { k: 4 });
        assert_eq!(
            config.interpolator,
            InterpolatorConfig::ArithmeticMean {
                alpha: 50.0,
                beta: 1.0,
                scale: 1.0
            }
        );
    }

    #[test]
    fn test_sharp_alpha_preset() {
        let config = FillConfig::from_json(r#"{ "interpolator": { "kind": "arithmetic_mean" } }"#).unwrap();
        assert_eq!(config.interpolator, InterpolatorConfig::default());

        let config = FillConfig::from_json(r#"{ "interpolator": { "kind": "arithmetic_mean", "alpha": 50.0 } }"#).unwrap();
        let interpolator = config.interpolator.build(&config.norm);

        // one point at distance 1, one at distance 2: the nearer one dominates
        let points = crate::weighted_points::WeightedPoints::with_uniform_weight(
            vec![vec![7.0, 45.0, 4.0], vec![10.0, 45.0, 6.0]],
            1.0,
        )
        .unwrap();
        let value = interpolator.interpolate(&points, &[8.0, 45.0]).unwrap();
        assert!((value - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_round_trip_json() {
        let config = FillConfig {
            min_points: 5,
            norm: Norm::polar_scaled(),
            neighbourhood: NeighbourhoodConfig::Ellipsoid {
                semi_axes: vec![4.0, 20.0],
            },
            interpolator: InterpolatorConfig::InverseDistance { power: 3.0 },
        };

        let json = config.to_json().unwrap();
        assert_eq!(FillConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        assert!(FillConfig::from_json(r#"{ "neighbourhood": { "kind": "sphere" } }"#).is_err());
    }

    #[test]
    fn test_invalid_radius_fails_to_build() {
        let config = FillConfig::from_json(r#"{ "neighbourhood": { "kind": "ball", "radius": -2.0 } }"#).unwrap();
        assert!(MissingValueFiller::from_config(&config).is_err());
    }

    #[test]
    fn test_filler_from_config() {
        let config = FillConfig::from_json(
            r#"{ "interpolator": { "kind": "inverse_distance" }, "neighbourhood": { "kind": "cuboid", "half_lengths": [2.0, 15.0] } }"#,
        )
        .unwrap();
        let filler = MissingValueFiller::from_config(&config).unwrap();

        let bsps = vec![vec![4.0, f64::NAN, 5.0], vec![4.4, 4.9, 5.4]];
        let (filled, performed) = filler.fill(&[6.0, 8.0, 10.0], &[30.0, 45.0], &bsps).unwrap();

        assert!(performed);
        assert!(filled[0][1] > 4.0 && filled[0][1] < 5.4);
    }
}
