pub mod config;
pub mod cruising;
pub mod error;
pub mod formats;
pub mod interpolator;
pub mod missing_values;
pub mod neighbourhood;
pub mod polar_table;
pub mod tools;
pub mod weighted_points;
pub mod wind;

pub use config::FillConfig;
pub use cruising::{convex_direction, CruisingError, Direction};
pub use error::{PolarDiagramError, Result};
pub use formats::{from_csv, from_csv_str, PolarFormat};
pub use interpolator::{ArithmeticMeanInterpolator, InterpolationError, Interpolator, InverseDistanceInterpolator};
pub use missing_values::{has_missing_values, interpolate_missing_values, zero_fill, MissingValueFiller};
pub use neighbourhood::{Ball, Cuboid, Ellipsoid, KNearest, Neighbourhood};
pub use polar_table::PolarDiagramTable;
pub use weighted_points::{AllOneWeigher, Weigher, WeightedPoints};
pub use wind::{apparent_wind_to_true, true_wind_to_apparent, WindError};
