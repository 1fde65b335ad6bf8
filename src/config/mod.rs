pub mod toml_config;

use crate::adapters::fixture::SAMPLE_FIXTURE;
use crate::adapters::openf1::DEFAULT_API_BASE;
use crate::core::{ConfigProvider, SourceKind};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_output_formats, validate_path, validate_positive_number, validate_required_field,
    validate_url, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const OUTPUT_FORMATS: [&str; 2] = ["csv", "json"];
pub const DEFAULT_ARCHIVE: &str = "long_runs.zip";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SourceArg {
    Sample,
    Openf1,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Sample => SourceKind::Sample,
            SourceArg::Openf1 => SourceKind::OpenF1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "longrun-etl"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Long-run pace and tyre degradation analysis for one session")
)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, value_enum, default_value = "sample"))]
    pub source: SourceArg,

    #[cfg_attr(feature = "cli", arg(long, default_value = SAMPLE_FIXTURE))]
    pub fixture: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_API_BASE))]
    pub api_base: String,

    #[cfg_attr(feature = "cli", arg(long))]
    pub session_key: Option<u32>,

    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_path: String,

    #[cfg_attr(feature = "cli", arg(long, value_delimiter = ',', default_values = ["csv", "json"]))]
    pub formats: Vec<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Bundle report files into one ZIP archive"))]
    pub compress: bool,

    #[cfg_attr(feature = "cli", arg(long, default_value = "30"))]
    pub timeout_secs: u64,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn source_kind(&self) -> SourceKind {
        self.source.into()
    }

    fn fixture_path(&self) -> &str {
        &self.fixture
    }

    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn session_key(&self) -> Option<u32> {
        self.session_key
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn compress_output(&self) -> bool {
        self.compress
    }

    fn archive_name(&self) -> &str {
        DEFAULT_ARCHIVE
    }

    fn analysis_timeout_seconds(&self) -> u64 {
        self.timeout_secs
    }
}

/// Shared checks for any configuration source.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    match config.source_kind() {
        SourceKind::Sample => validate_path("fixture", config.fixture_path())?,
        SourceKind::OpenF1 => {
            validate_url("api_base", config.api_base())?;
            validate_required_field("session_key", &config.session_key())?;
        }
    }
    validate_path("output_path", config.output_path())?;
    validate_output_formats("formats", config.output_formats(), &OUTPUT_FORMATS)?;
    validate_positive_number("timeout_secs", config.analysis_timeout_seconds(), 1)?;
    Ok(())
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
