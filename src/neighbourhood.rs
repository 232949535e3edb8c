//! Neighbourhoods decide which known points are close enough to a query point
//! to take part in its interpolation.
//!
//! Every neighbourhood works on offsets, the candidate coordinates with the
//! query point already subtracted, and answers with a mask of the same length.

use kdtree::{distance::squared_euclidean, KdTree};
use log::warn;

use crate::error::{PolarDiagramError, Result};
use crate::tools::norm::Norm;

/// Radius of the default ball neighbourhood, in the table's own units
pub const DEFAULT_RADIUS: f64 = 2.0;

pub trait Neighbourhood: Send + Sync {
    /// Flags every offset that lies inside the neighbourhood
    fn contains(&self, offsets: &[Vec<f64>]) -> Vec<bool>;
}

fn positive(parameter: &'static str, value: f64) -> Result<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(PolarDiagramError::NonPositiveParameter { parameter, value })
    }
}

/// All offsets whose norm is at most `radius`
#[derive(Clone, Debug, PartialEq)]
pub struct Ball {
    radius: f64,
    norm: Norm,
}

impl Ball {
    pub fn new(radius: f64) -> Result<Ball> {
        Ball::with_norm(radius, Norm::Euclidean)
    }

    pub fn with_norm(radius: f64, norm: Norm) -> Result<Ball> {
        Ok(Ball {
            radius: positive("radius", radius)?,
            norm,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Default for Ball {
    fn default() -> Self {
        Ball {
            radius: DEFAULT_RADIUS,
            norm: Norm::Euclidean,
        }
    }
}

impl Neighbourhood for Ball {
    fn contains(&self, offsets: &[Vec<f64>]) -> Vec<bool> {
        offsets
            .iter()
            .map(|o| self.norm.norm(o) <= self.radius)
            .collect()
    }
}

/// Axis aligned ellipsoid centred on the query point
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipsoid {
    semi_axes: Vec<f64>,
}

impl Ellipsoid {
    pub fn new(semi_axes: Vec<f64>) -> Result<Ellipsoid> {
        if semi_axes.is_empty() {
            return Err(PolarDiagramError::NonPositiveParameter {
                parameter: "semi axis count",
                value: 0.0,
            });
        }
        for axis in &semi_axes {
            positive("semi axis", *axis)?;
        }
        Ok(Ellipsoid { semi_axes })
    }
}

impl Neighbourhood for Ellipsoid {
    fn contains(&self, offsets: &[Vec<f64>]) -> Vec<bool> {
        offsets
            .iter()
            .map(|o| {
                o.iter()
                    .zip(self.semi_axes.iter())
                    .map(|(x, a)| (x / a).powi(2))
                    .sum::<f64>()
                    <= 1.0
            })
            .collect()
    }
}

/// Axis aligned box extending `half_lengths[i]` to either side along axis `i`
#[derive(Clone, Debug, PartialEq)]
pub struct Cuboid {
    half_lengths: Vec<f64>,
}

impl Cuboid {
    pub fn new(half_lengths: Vec<f64>) -> Result<Cuboid> {
        for length in &half_lengths {
            positive("half length", *length)?;
        }
        Ok(Cuboid { half_lengths })
    }
}

impl Neighbourhood for Cuboid {
    fn contains(&self, offsets: &[Vec<f64>]) -> Vec<bool> {
        offsets
            .iter()
            .map(|o| {
                o.iter()
                    .zip(self.half_lengths.iter())
                    .all(|(x, h)| x.abs() <= *h)
            })
            .collect()
    }
}

/// The `k` offsets closest to the query point in euclidean distance.
/// Ties at the k-th distance are broken by the kd-tree.
#[derive(Clone, Debug, PartialEq)]
pub struct KNearest {
    k: usize,
}

impl KNearest {
    pub fn new(k: usize) -> Result<KNearest> {
        if k == 0 {
            return Err(PolarDiagramError::NonPositiveParameter {
                parameter: "k",
                value: 0.0,
            });
        }
        Ok(KNearest { k })
    }
}

impl Neighbourhood for KNearest {
    fn contains(&self, offsets: &[Vec<f64>]) -> Vec<bool> {
        let mut mask = vec![false; offsets.len()];
        let Some(first) = offsets.first() else {
            return mask;
        };

        let dims = first.len();
        if dims == 0 {
            mask.iter_mut().take(self.k).for_each(|m| *m = true);
            return mask;
        }

        let mut kdtree: KdTree<f64, usize, Vec<f64>> = KdTree::new(dims);
        for (i, offset) in offsets.iter().enumerate() {
            if let Err(e) = kdtree.add(offset.clone(), i) {
                warn!("skipping offset {i} in nearest neighbour search: {e:?}");
            }
        }

        let origin = vec![0.0; dims];
        match kdtree.nearest(&origin, self.k.min(offsets.len()), &squared_euclidean) {
            Ok(nearest) => nearest.iter().for_each(|(_, i)| mask[**i] = true),
            Err(e) => warn!("nearest neighbour search failed: {e:?}"),
        }

        mask
    }
}
