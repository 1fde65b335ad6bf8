use crate::analysis::stats;
use crate::domain::model::{Interpretation, Run, TeamAggregate};
use std::collections::HashMap;

/// Team average degradation below this reads as a stable race pace.
pub const LOW_DEGRADATION_THRESHOLD_MS: f64 = 230.0;

pub fn interpret(avg_deg_ms_per_lap: f64) -> Interpretation {
    if avg_deg_ms_per_lap < LOW_DEGRADATION_THRESHOLD_MS {
        Interpretation::LowDegradation
    } else {
        Interpretation::HighDegradation
    }
}

/// Averages runs per team, fastest team first. Ties keep first-seen order.
pub fn aggregate_teams(runs: &[Run]) -> Vec<TeamAggregate> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&Run>)> = Vec::new();

    for run in runs {
        let slot = *index.entry(run.team.as_str()).or_insert_with(|| {
            groups.push((run.team.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(run);
    }

    let mut teams: Vec<TeamAggregate> = groups
        .into_iter()
        .map(|(team, members)| {
            let paces: Vec<f64> = members.iter().map(|r| r.pace_ms as f64).collect();
            let degs: Vec<f64> = members.iter().map(|r| r.degradation_ms_per_lap).collect();
            let avg_deg = stats::mean(&degs);

            TeamAggregate {
                team: team.to_string(),
                avg_pace_ms: stats::mean(&paces).round() as u64,
                avg_deg_ms_per_lap: stats::round_to_tenth(avg_deg),
                interpretation: interpret(avg_deg),
            }
        })
        .collect();

    teams.sort_by_key(|t| t.avg_pace_ms);
    teams
}
