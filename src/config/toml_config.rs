use crate::adapters::fixture::SAMPLE_FIXTURE;
use crate::adapters::openf1::DEFAULT_API_BASE;
use crate::config::{validate_provider, DEFAULT_ARCHIVE};
use crate::core::{ConfigProvider, SourceKind};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "longrun_etl=info";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    pub analysis: Option<AnalysisConfig>,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// `sample` 或 `openf1`
    pub r#type: String,
    pub fixture_path: Option<String>,
    pub endpoint: Option<String>,
    pub session_key: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OPENF1_SESSION})，未設定的變數視為錯誤
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: e.to_string(),
        })?;

        let mut missing = Vec::new();
        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.push(var_name.to_string());
                String::new()
            })
        });

        if !missing.is_empty() {
            return Err(EtlError::ConfigValidationError {
                field: "environment".to_string(),
                message: format!("Unset environment variables: {}", missing.join(", ")),
            });
        }

        Ok(result.into_owned())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("pipeline.name", &self.pipeline.name)?;

        match self.source.r#type.as_str() {
            "sample" | "openf1" => {}
            other => {
                return Err(EtlError::InvalidConfigValueError {
                    field: "source.type".to_string(),
                    value: other.to_string(),
                    reason: "Valid types: sample, openf1".to_string(),
                })
            }
        }

        if let Some(compression) = &self.load.compression {
            if let Some(filename) = &compression.filename {
                validate_non_empty_string("load.compression.filename", filename)?;
            }
        }

        validate_provider(self)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> &str {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

impl ConfigProvider for TomlConfig {
    fn source_kind(&self) -> SourceKind {
        if self.source.r#type == "openf1" {
            SourceKind::OpenF1
        } else {
            SourceKind::Sample
        }
    }

    fn fixture_path(&self) -> &str {
        self.source.fixture_path.as_deref().unwrap_or(SAMPLE_FIXTURE)
    }

    fn api_base(&self) -> &str {
        self.source.endpoint.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    fn session_key(&self) -> Option<u32> {
        self.source.session_key
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn compress_output(&self) -> bool {
        self.load.compression.as_ref().map(|c| c.enabled).unwrap_or(false)
    }

    fn archive_name(&self) -> &str {
        self.load
            .compression
            .as_ref()
            .and_then(|c| c.filename.as_deref())
            .unwrap_or(DEFAULT_ARCHIVE)
    }

    fn analysis_timeout_seconds(&self) -> u64 {
        self.analysis
            .as_ref()
            .and_then(|a| a.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_sample_config_with_defaults() {
        let toml_content = r#"
[pipeline]
name = "bahrain-fp2"

[source]
type = "sample"

[load]
output_path = "./reports"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.source_kind(), SourceKind::Sample);
        assert_eq!(config.fixture_path(), SAMPLE_FIXTURE);
        assert_eq!(config.analysis_timeout_seconds(), 30);
        assert!(!config.compress_output());
        assert_eq!(config.archive_name(), "long_runs.zip");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_openf1_config() {
        let toml_content = r#"
[pipeline]
name = "live"
description = "OpenF1 practice session"
version = "1.0"

[source]
type = "openf1"
endpoint = "https://api.openf1.org/v1"
session_key = 9158

[analysis]
timeout_seconds = 10

[load]
output_path = "./reports"
output_formats = ["csv", "json"]

[load.compression]
enabled = true
filename = "fp2.zip"

[monitoring]
enabled = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.source_kind(), SourceKind::OpenF1);
        assert_eq!(config.session_key(), Some(9158));
        assert_eq!(config.analysis_timeout_seconds(), 10);
        assert!(config.compress_output());
        assert_eq!(config.archive_name(), "fp2.zip");
        assert!(config.monitoring_enabled());
        assert_eq!(config.log_level(), "longrun_etl=info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LONGRUN_TEST_OUTPUT", "/tmp/longrun");

        let toml_content = r#"
[pipeline]
name = "env"

[source]
type = "sample"

[load]
output_path = "${LONGRUN_TEST_OUTPUT}"
output_formats = ["json"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), "/tmp/longrun");

        std::env::remove_var("LONGRUN_TEST_OUTPUT");
    }

    #[test]
    fn test_unset_env_var_is_an_error() {
        let toml_content = r#"
[pipeline]
name = "env"

[source]
type = "openf1"
session_key = ${LONGRUN_TEST_DEFINITELY_UNSET}

[load]
output_path = "./out"
output_formats = ["json"]
"#;

        let err = TomlConfig::from_toml_str(toml_content).unwrap_err();
        assert!(err.to_string().contains("LONGRUN_TEST_DEFINITELY_UNSET"));
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[pipeline]
name = "bad"

[source]
type = "openf1"
endpoint = "invalid-url"
session_key = 1

[load]
output_path = "./output"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_source_type() {
        let toml_content = r#"
[pipeline]
name = "bad"

[source]
type = "ergast"

[load]
output_path = "./output"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(EtlError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"

[source]
type = "sample"
fixture_path = "fixtures/fp2.json"

[load]
output_path = "./output"
output_formats = ["csv"]
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
        assert_eq!(config.fixture_path(), "fixtures/fp2.json");
    }
}
