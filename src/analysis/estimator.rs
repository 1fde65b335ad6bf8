use crate::analysis::filter::{LongRunSample, MIN_LONG_RUN_LAPS};
use crate::analysis::stats;
use crate::domain::model::{Driver, Lap, Run, UNKNOWN_COMPOUND, UNKNOWN_TEAM};
use std::collections::HashMap;

pub const TRIM_FRACTION: f64 = 0.1;

/// Degradation the confidence heuristic treats as typical, in ms/lap.
pub const REFERENCE_DEGRADATION_MS: f64 = 200.0;

/// Unrounded statistics over a filtered lap-time sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunEstimate {
    pub pace_ms: f64,
    pub degradation_ms_per_lap: f64,
    pub std_dev_ms: f64,
    pub sample_count: usize,
}

impl RunEstimate {
    /// `lap_times` must hold at least `MIN_LONG_RUN_LAPS` values, in lap order.
    pub fn from_lap_times(lap_times: &[u64]) -> Self {
        debug_assert!(lap_times.len() >= MIN_LONG_RUN_LAPS);
        let values: Vec<f64> = lap_times.iter().map(|&t| t as f64).collect();

        Self {
            pace_ms: stats::trimmed_mean(&values, TRIM_FRACTION),
            // x-axis is position in the filtered list, not the lap number
            degradation_ms_per_lap: stats::slope(&values),
            std_dev_ms: stats::std_dev(&values),
            sample_count: values.len(),
        }
    }

    pub fn confidence(&self) -> u8 {
        confidence_score(self.sample_count, self.std_dev_ms, self.degradation_ms_per_lap)
    }
}

/// Heuristic trust indicator in `0..=100`. Not a calibrated probability.
///
/// Base 50, up to +25 for sample size (2 per lap), up to +15 for low spread
/// and up to +10 for degradation close to the reference rate.
pub fn confidence_score(sample_count: usize, std_dev_ms: f64, degradation_ms_per_lap: f64) -> u8 {
    let mut score = 50.0;
    score += (sample_count as f64 * 2.0).min(25.0);
    score += (15.0 - std_dev_ms / 20.0).max(0.0);
    score += (10.0 - (degradation_ms_per_lap - REFERENCE_DEGRADATION_MS).abs() / 40.0).max(0.0);
    score.round().clamp(0.0, 100.0) as u8
}

/// Most frequent compound tag; the first tag seen wins a tie. Empty tags count as missing.
pub fn dominant_compound(laps: &[&Lap]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    let tags = laps
        .iter()
        .filter_map(|lap| lap.compound.as_deref())
        .filter(|tag| !tag.is_empty());
    for tag in tags {
        let count = counts.entry(tag).or_insert(0);
        if *count == 0 {
            first_seen.push(tag);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for tag in first_seen {
        let count = counts[tag];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((tag, count));
        }
    }
    best.map(|(tag, _)| tag.to_string())
}

pub fn estimate_run(driver: &Driver, sample: &LongRunSample<'_>) -> Run {
    let estimate = RunEstimate::from_lap_times(&sample.lap_times);
    let compound = dominant_compound(&sample.valid_laps)
        .or_else(|| driver.declared_compound.clone().filter(|c| !c.is_empty()))
        .unwrap_or_else(|| UNKNOWN_COMPOUND.to_string());
    let team = if driver.team.is_empty() {
        UNKNOWN_TEAM.to_string()
    } else {
        driver.team.clone()
    };

    Run {
        driver: driver.code.clone(),
        team,
        compound,
        laps: estimate.sample_count,
        pace_ms: estimate.pace_ms.round() as u64,
        degradation_ms_per_lap: stats::round_to_tenth(estimate.degradation_ms_per_lap),
        consistency_std: estimate.std_dev_ms.round() as u64,
        confidence: estimate.confidence(),
    }
}
