use crate::analysis;
use crate::domain::model::{AnalysisResult, Run, SessionSnapshot, TeamAggregate};
use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub payload: SessionSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub runs: Vec<Run>,
    pub teams: Vec<TeamAggregate>,
}

impl From<AnalysisResult> for AnalysisResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            runs: result.runs,
            teams: result.teams,
        }
    }
}

impl From<AnalysisResponse> for AnalysisResult {
    fn from(response: AnalysisResponse) -> Self {
        Self {
            runs: response.runs,
            teams: response.teams,
        }
    }
}

/// Runs the analysis off the async executor, one request per blocking task.
#[derive(Debug, Clone)]
pub struct AnalysisWorker {
    timeout: Duration,
}

impl AnalysisWorker {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn submit(&self, request: AnalysisRequest) -> Result<AnalysisResponse> {
        let AnalysisRequest { payload } = request;
        tracing::debug!(
            drivers = payload.drivers.len(),
            laps = payload.laps.len(),
            "Dispatching analysis request"
        );

        let task = tokio::task::spawn_blocking(move || analysis::analyze(&payload));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result.map(AnalysisResponse::from),
            Ok(Err(join_error)) => Err(EtlError::WorkerError {
                message: join_error.to_string(),
            }),
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "Analysis request timed out");
                Err(EtlError::AnalysisTimeout {
                    seconds: self.timeout.as_secs(),
                })
            }
        }
    }
}

impl Default for AnalysisWorker {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}
