/// Returns the sorted indices of the data vector in ascending order.
/// NaN values compare as equal to everything, callers filter them first.
pub fn argsort_partial<T: PartialOrd>(data: &[T]) -> Vec<usize> {
    let mut indices = (0..data.len()).collect::<Vec<_>>();
    indices.sort_by(|&a, &b| {
        data[a]
            .partial_cmp(&data[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indices
}

/// Reorders the data vector by the given indices into a new vector
pub fn take<T: Clone>(data: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| data[i].clone()).collect()
}

/// Returns the first value that appears more than once, comparing exactly
pub fn first_duplicate(data: &[f64]) -> Option<f64> {
    let sorted = take(data, &argsort_partial(data));
    sorted
        .windows(2)
        .find(|pair| pair[0] == pair[1])
        .map(|pair| pair[0])
}

/// Minimum and maximum of the data, ignoring NaN values
pub fn min_max(data: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    data.iter().for_each(|v| {
        if v.is_nan() {
            return;
        }

        if *v > max {
            max = *v;
        }

        if *v < min {
            min = *v;
        }
    });

    (min, max)
}

/// Replaces every NaN value with the fill value
pub fn fill_nan(data: &[f64], fill_value: f64) -> Vec<f64> {
    data.iter()
        .map(|v| if v.is_nan() { fill_value } else { *v })
        .collect()
}
