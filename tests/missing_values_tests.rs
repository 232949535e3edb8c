extern crate sailpolar;

use rand::{rngs::StdRng, Rng, SeedableRng};
use sailpolar::{
    interpolate_missing_values, Ball, InterpolationError, Interpolator, MissingValueFiller, PolarDiagramTable,
    WeightedPoints,
};

struct RandomTable {
    wind_speeds: Vec<f64>,
    wind_angles: Vec<f64>,
    boat_speeds: Vec<Vec<f64>>,
}

fn random_table(rng: &mut StdRng, missing_probability: f64) -> RandomTable {
    let n_speeds = rng.gen_range(1..8);
    let n_angles = rng.gen_range(1..12);

    let wind_speeds = (0..n_speeds).map(|i| 4.0 + 2.0 * i as f64).collect::<Vec<_>>();
    let wind_angles = (0..n_angles).map(|i| 30.0 + 15.0 * i as f64).collect::<Vec<_>>();
    let boat_speeds = (0..n_angles)
        .map(|_| {
            (0..n_speeds)
                .map(|_| {
                    if rng.gen_bool(missing_probability) {
                        f64::NAN
                    } else {
                        rng.gen_range(0.0..12.0)
                    }
                })
                .collect()
        })
        .collect();

    RandomTable {
        wind_speeds,
        wind_angles,
        boat_speeds,
    }
}

fn check_fill(table: &RandomTable, filled: &[Vec<f64>], performed: bool) {
    let had_missing = table.boat_speeds.iter().flatten().any(|v| v.is_nan());
    assert_eq!(performed, had_missing);
    assert_eq!(filled.len(), table.boat_speeds.len());

    for (raw_row, filled_row) in table.boat_speeds.iter().zip(filled.iter()) {
        assert_eq!(raw_row.len(), filled_row.len());
        for (raw, value) in raw_row.iter().zip(filled_row.iter()) {
            assert!(!value.is_nan());
            assert!(*value >= 0.0);
            if !raw.is_nan() {
                assert_eq!(raw.to_bits(), value.to_bits());
            }
        }
    }
}

#[test]
fn random_tables_fill_densely() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let probability = rng.gen_range(0.0..0.9);
        let table = random_table(&mut rng, probability);
        let (filled, performed) =
            interpolate_missing_values(&table.wind_speeds, &table.wind_angles, &table.boat_speeds).unwrap();

        check_fill(&table, &filled, performed);
    }
}

#[test]
fn random_tables_fill_densely_with_wide_ball() {
    let mut rng = StdRng::seed_from_u64(11);
    let filler = MissingValueFiller::new().with_neighbourhood(Ball::new(50.0).unwrap());

    for _ in 0..100 {
        let table = random_table(&mut rng, 0.4);
        let (filled, performed) = filler
            .fill(&table.wind_speeds, &table.wind_angles, &table.boat_speeds)
            .unwrap();

        check_fill(&table, &filled, performed);

        let table = PolarDiagramTable::new_with_flags(
            table.wind_speeds.clone(),
            table.wind_angles.clone(),
            filled,
            performed,
            false,
        )
        .unwrap();
        assert_eq!(table.interpolation_performed(), performed);
    }
}

#[test]
fn complete_tables_pass_through() {
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..50 {
        let table = random_table(&mut rng, 0.0);
        let (filled, performed) =
            interpolate_missing_values(&table.wind_speeds, &table.wind_angles, &table.boat_speeds).unwrap();

        assert!(!performed);
        assert_eq!(filled, table.boat_speeds);
    }
}

/// Always answers with the same value, only the filled cells may change
struct Constant(f64);

impl Interpolator for Constant {
    fn interpolate(&self, _points: &WeightedPoints, _query: &[f64]) -> Result<f64, InterpolationError> {
        Ok(self.0)
    }
}

#[test]
fn substituted_interpolator_only_changes_filled_values() {
    let wind_speeds = vec![6.0, 8.0, 10.0];
    let wind_angles = vec![45.0, 90.0];
    let boat_speeds = vec![vec![4.0, f64::NAN, 5.0], vec![4.5, 5.0, f64::NAN]];

    let filler = MissingValueFiller::new().with_interpolator(Constant(9.0));
    let (filled, performed) = filler.fill(&wind_speeds, &wind_angles, &boat_speeds).unwrap();

    assert!(performed);
    assert_eq!(filled, vec![vec![4.0, 9.0, 5.0], vec![4.5, 5.0, 9.0]]);
}

#[test]
fn too_few_known_points_zero_fill() {
    let wind_speeds = vec![6.0, 8.0];
    let wind_angles = vec![45.0, 90.0];
    let boat_speeds = vec![vec![4.0, f64::NAN], vec![f64::NAN, 5.0]];

    let (filled, performed) = interpolate_missing_values(&wind_speeds, &wind_angles, &boat_speeds).unwrap();

    assert!(performed);
    assert_eq!(filled, vec![vec![4.0, 0.0], vec![0.0, 5.0]]);
}
