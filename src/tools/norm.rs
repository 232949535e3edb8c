use serde::{Deserialize, Serialize};

/// Norms used to measure offsets between wind coordinates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Norm {
    /// Plain euclidean norm in the table's own units
    Euclidean,
    /// Euclidean norm after scaling every component by the matching factor.
    /// Components without a factor are left unscaled.
    Scaled(Vec<f64>),
}

impl Default for Norm {
    fn default() -> Self {
        Norm::Euclidean
    }
}

impl Norm {
    /// Scales wind speed by 1/40 and wind angle by 1/360 so both span roughly
    /// the unit interval
    pub fn polar_scaled() -> Norm {
        Norm::Scaled(vec![1.0 / 40.0, 1.0 / 360.0])
    }

    pub fn norm(&self, vector: &[f64]) -> f64 {
        match self {
            Norm::Euclidean => vector.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Norm::Scaled(factors) => vector
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let scaled = v * factors.get(i).copied().unwrap_or(1.0);
                    scaled * scaled
                })
                .sum::<f64>()
                .sqrt(),
        }
    }

    /// Norm of the difference `a - b` over the leading components both share
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let offset: Vec<f64> = a.iter().zip(b.iter()).map(|(x, y)| x - y).collect();
        self.norm(&offset)
    }
}

#[cfg(test)]
mod tests {
    use super::Norm;

    #[test]
    fn test_euclidean_norm() {
        assert!((Norm::Euclidean.norm(&[3.0, 4.0]) - 5.0).abs() < 1e-12);
        assert_eq!(Norm::Euclidean.norm(&[]), 0.0);
    }

    #[test]
    fn test_scaled_norm() {
        let norm = Norm::polar_scaled();
        assert!((norm.norm(&[40.0, 0.0]) - 1.0).abs() < 1e-12);
        assert!((norm.norm(&[0.0, 360.0]) - 1.0).abs() < 1e-12);

        // Missing factors leave the component untouched
        let partial = Norm::Scaled(vec![0.5]);
        assert!((partial.norm(&[4.0, 3.0]) - 13f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_distance() {
        let d = Norm::Euclidean.distance(&[8.0, 45.0, 4.2], &[6.0, 45.0]);
        assert!((d - 2.0).abs() < 1e-12);
    }
}
