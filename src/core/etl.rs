use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub output_path: String,
    pub laps_extracted: usize,
    pub drivers_extracted: usize,
    pub runs_emitted: usize,
    pub teams_emitted: usize,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        Ok(self.run_with_summary().await?.output_path)
    }

    pub async fn run_with_summary(&self) -> Result<RunSummary> {
        let started = Instant::now();
        tracing::info!("Starting long-run analysis");

        // Extract
        let session = self.pipeline.extract().await?;
        let laps_extracted = session.laps.len();
        let drivers_extracted = session.drivers.len();
        tracing::info!(
            "Extracted {} laps for {} drivers",
            laps_extracted,
            drivers_extracted
        );

        // Transform
        let result = self.pipeline.transform(session).await?;
        let runs_emitted = result.runs.len();
        let teams_emitted = result.teams.len();
        tracing::info!("Analyzed {} long runs across {} teams", runs_emitted, teams_emitted);

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Report saved to: {} ({:?})", output_path, started.elapsed());

        Ok(RunSummary {
            output_path,
            laps_extracted,
            drivers_extracted,
            runs_emitted,
            teams_emitted,
        })
    }
}
