//! Small descriptive statistics over lap times in milliseconds.
//!
//! Every function here expects a non-empty slice; callers guard the
//! minimum sample size before reaching this module.

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn median(values: &[f64]) -> f64 {
    let sorted = sorted(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Mean after dropping `floor(n * fraction)` values from each end.
/// Falls back to the plain mean when trimming would leave nothing.
pub fn trimmed_mean(values: &[f64], fraction: f64) -> f64 {
    let sorted = sorted(values);
    let k = (sorted.len() as f64 * fraction).floor() as usize;
    if 2 * k >= sorted.len() {
        return mean(&sorted);
    }
    mean(&sorted[k..sorted.len() - k])
}

/// OLS slope of `values` against their 1-based position.
pub fn slope(values: &[f64]) -> f64 {
    let n = values.len();
    let x_mean = (n as f64 + 1.0) / 2.0;
    let y_mean = mean(values);

    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = (i + 1) as f64 - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });

    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Rounds the exact binary value to one decimal, so `105.05` (stored as
/// `105.04999…`) becomes `105.0`. Exact ties (`x.25`, `x.75`) go away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    let quarters = value.abs() * 4.0;
    let rounded = if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        (value * 10.0).round() / 10.0
    } else {
        format!("{:.1}", value).parse().unwrap_or(value)
    };
    // no negative zero in reports
    rounded + 0.0
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}
