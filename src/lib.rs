pub mod adapters;
pub mod analysis;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{build_source, FixtureSource, LocalStorage, OpenF1Source};
pub use analysis::{analyze, run_pipeline};
pub use config::{toml_config::TomlConfig, CliConfig};
pub use core::{etl::EtlEngine, pipeline::LongRunPipeline, worker::AnalysisWorker};
pub use domain::model::{
    AnalysisResult, Driver, Interpretation, Lap, Run, SessionSnapshot, TeamAggregate,
};
pub use utils::error::{EtlError, Result};
