use crate::analysis::stats;
use crate::domain::model::Lap;

/// Fewer valid laps than this and no degradation trend is attempted.
pub const MIN_LONG_RUN_LAPS: usize = 8;

/// Laps slower than `median + MAD_MULTIPLIER * MAD` are rejected.
pub const MAD_MULTIPLIER: f64 = 2.5;

/// One-sided slow-lap cut-off derived from a lap-time sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierFilter {
    pub median: f64,
    pub mad: f64,
    pub threshold: f64,
}

impl OutlierFilter {
    pub fn from_times(values: &[u64]) -> Self {
        let as_f64: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        let median = stats::median(&as_f64);
        let deviations: Vec<f64> = as_f64.iter().map(|v| (v - median).abs()).collect();

        let mut mad = stats::median(&deviations);
        if mad == 0.0 {
            mad = 1.0;
        }

        Self {
            median,
            mad,
            threshold: median + MAD_MULTIPLIER * mad,
        }
    }

    /// Keeps values at or below the threshold, in their original order.
    pub fn apply(&self, values: &[u64]) -> Vec<u64> {
        values
            .iter()
            .copied()
            .filter(|&v| v as f64 <= self.threshold)
            .collect()
    }
}

pub fn filter_outliers(values: &[u64]) -> Vec<u64> {
    OutlierFilter::from_times(values).apply(values)
}

/// Laps that survived the validity gate, plus their filtered times.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRunSample<'a> {
    pub valid_laps: Vec<&'a Lap>,
    pub lap_times: Vec<u64>,
}

/// Returns `None` when the driver has too few representative laps,
/// either before or after outlier rejection.
pub fn select_long_run<'a>(laps: &[&'a Lap]) -> Option<LongRunSample<'a>> {
    let valid_laps: Vec<&'a Lap> = laps.iter().copied().filter(|lap| lap.valid).collect();
    if valid_laps.len() < MIN_LONG_RUN_LAPS {
        return None;
    }

    let times: Vec<u64> = valid_laps.iter().map(|lap| lap.lap_time_ms).collect();
    let lap_times = filter_outliers(&times);
    if lap_times.len() < MIN_LONG_RUN_LAPS {
        return None;
    }

    Some(LongRunSample {
        valid_laps,
        lap_times,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laps(driver: &str, times: &[u64]) -> Vec<Lap> {
        times
            .iter()
            .enumerate()
            .map(|(i, &t)| Lap {
                driver: driver.to_string(),
                lap_number: i as u32 + 1,
                lap_time_ms: t,
                valid: true,
                compound: Some("MEDIUM".to_string()),
            })
            .collect()
    }

    #[test]
    fn test_slow_outlier_is_dropped() {
        let values = [91000, 91100, 91200, 91050, 99000, 91150, 91080, 91120];
        let filtered = filter_outliers(&values);

        assert_eq!(filtered.len(), 7);
        assert!(!filtered.contains(&99000));
    }

    #[test]
    fn test_fast_laps_are_never_dropped() {
        let values = [85000, 91100, 91200, 91050, 91000, 91150, 91080, 91120];
        let filtered = filter_outliers(&values);
        assert!(filtered.contains(&85000));
    }

    #[test]
    fn test_constant_sample_uses_unit_mad() {
        let filter = OutlierFilter::from_times(&[90000; 8]);
        assert_eq!(filter.mad, 1.0);
        assert_eq!(filter.threshold, 90002.5);
        assert_eq!(filter.apply(&[90000, 90002, 90003]), vec![90000, 90002]);
    }

    #[test]
    fn test_reapplying_same_threshold_is_idempotent() {
        let values = [91000, 91100, 97000, 91050, 99000, 91150, 91080, 91120, 91090];
        let filter = OutlierFilter::from_times(&values);
        let once = filter.apply(&values);
        let twice = filter.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_seven_valid_laps_is_not_a_long_run() {
        let owned = laps("TSU", &[92000; 7]);
        let refs: Vec<&Lap> = owned.iter().collect();
        assert!(select_long_run(&refs).is_none());
    }

    #[test]
    fn test_invalid_laps_do_not_count() {
        let mut owned = laps("GAS", &[92000; 9]);
        owned[0].valid = false;
        owned[1].valid = false;
        let refs: Vec<&Lap> = owned.iter().collect();
        assert!(select_long_run(&refs).is_none());
    }

    #[test]
    fn test_outlier_removal_can_drop_below_minimum() {
        let owned = laps(
            "OCO",
            &[92000, 92010, 92020, 92030, 92040, 92050, 92060, 98000],
        );
        let refs: Vec<&Lap> = owned.iter().collect();
        assert!(select_long_run(&refs).is_none());
    }

    #[test]
    fn test_long_run_keeps_valid_laps_for_compound_count() {
        let owned = laps("HUL", &[93000, 93050, 93100, 93150, 93200, 93250, 93300, 93350, 99999]);
        let refs: Vec<&Lap> = owned.iter().collect();
        let sample = select_long_run(&refs).unwrap();

        assert_eq!(sample.valid_laps.len(), 9);
        assert_eq!(sample.lap_times.len(), 8);
    }
}
