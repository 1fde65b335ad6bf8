//! Long-run analysis core.
//!
//! A pure, synchronous pass over one [`SessionSnapshot`]:
//! group laps by driver, select and de-noise each driver's long run,
//! estimate pace/degradation/consistency/confidence, then aggregate per team.
//! Nothing is cached between calls.

pub mod estimator;
pub mod filter;
pub mod grouper;
pub mod stats;
pub mod team;

use crate::domain::model::{AnalysisResult, SessionSnapshot};
use crate::utils::error::Result;
use crate::utils::validation::Validate;

pub use estimator::{confidence_score, dominant_compound, estimate_run, RunEstimate};
pub use filter::{filter_outliers, select_long_run, OutlierFilter, MIN_LONG_RUN_LAPS};
pub use grouper::GroupedLaps;
pub use team::aggregate_teams;

/// Validates the snapshot, then runs the analysis.
pub fn analyze(session: &SessionSnapshot) -> Result<AnalysisResult> {
    session.validate()?;
    Ok(run_pipeline(session))
}

/// Analysis without the record checks. Drivers with too little data are skipped.
pub fn run_pipeline(session: &SessionSnapshot) -> AnalysisResult {
    let grouped = GroupedLaps::from_laps(&session.laps);
    tracing::debug!(
        drivers = session.drivers.len(),
        drivers_with_laps = grouped.driver_count(),
        laps = session.laps.len(),
        "Grouped session laps"
    );

    let runs: Vec<_> = session
        .drivers
        .iter()
        .filter_map(|driver| match select_long_run(grouped.laps_for(&driver.code)) {
            Some(sample) => Some(estimate_run(driver, &sample)),
            None => {
                tracing::debug!(driver = %driver.code, "Not enough representative laps, skipping");
                None
            }
        })
        .collect();

    let teams = aggregate_teams(&runs);
    tracing::info!(
        runs = runs.len(),
        teams = teams.len(),
        "Long-run analysis finished"
    );

    AnalysisResult { runs, teams }
}
