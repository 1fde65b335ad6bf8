use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNKNOWN_COMPOUND: &str = "UNK";
pub const UNKNOWN_TEAM: &str = "Unknown";

fn default_valid() -> bool {
    true
}

fn default_team() -> String {
    UNKNOWN_TEAM.to_string()
}

/// One timed lap as delivered by a session source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lap {
    pub driver: String,
    #[serde(alias = "lap")]
    pub lap_number: u32,
    pub lap_time_ms: u64,
    /// `false` for laps deleted by race control (track limits etc.).
    #[serde(default = "default_valid")]
    pub valid: bool,
    #[serde(default)]
    pub compound: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub code: String,
    #[serde(default = "default_team")]
    pub team: String,
    #[serde(default, alias = "compound")]
    pub declared_compound: Option<String>,
    #[serde(default)]
    pub number: u32,
}

/// The only input to the analysis core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub laps: Vec<Lap>,
}

/// Long-run summary for one driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub driver: String,
    pub team: String,
    pub compound: String,
    pub laps: usize,
    pub pace_ms: u64,
    pub degradation_ms_per_lap: f64,
    pub consistency_std: u64,
    /// Heuristic 0-100 score, not a statistical confidence level.
    pub confidence: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpretation {
    #[serde(rename = "Low degradation + stable race pace")]
    LowDegradation,
    #[serde(rename = "Higher degradation, manage tyre drop-off")]
    HighDegradation,
}

impl Interpretation {
    pub fn label(&self) -> &'static str {
        match self {
            Interpretation::LowDegradation => "Low degradation + stable race pace",
            Interpretation::HighDegradation => "Higher degradation, manage tyre drop-off",
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAggregate {
    pub team: String,
    pub avg_pace_ms: u64,
    pub avg_deg_ms_per_lap: f64,
    pub interpretation: Interpretation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub runs: Vec<Run>,
    pub teams: Vec<TeamAggregate>,
}
