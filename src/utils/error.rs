use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    ApiStatusError { status: u16, url: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Malformed telemetry record {record}: {reason}")]
    MalformedRecord { record: String, reason: String },

    #[error("Analysis did not finish within {seconds}s")]
    AnalysisTimeout { seconds: u64 },

    #[error("Analysis worker failed: {message}")]
    WorkerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    Storage,
    Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::ApiError(_) | EtlError::ApiStatusError { .. } => ErrorCategory::Network,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::MalformedRecord { .. } => ErrorCategory::Data,
            EtlError::ZipError(_) | EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::AnalysisTimeout { .. } | EtlError::WorkerError { .. } => {
                ErrorCategory::Runtime
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::High,
            ErrorCategory::Runtime => match self {
                EtlError::AnalysisTimeout { .. } => ErrorSeverity::Medium,
                _ => ErrorSeverity::Critical,
            },
        }
    }

    /// Process exit status used by both binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Medium
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(_) => "Check network connectivity and the API base URL, then retry",
            EtlError::ApiStatusError { status, .. } if *status == 404 => {
                "Check that the session key exists upstream"
            }
            EtlError::ApiStatusError { .. } => "The upstream provider rejected the request, retry later",
            EtlError::CsvError(_) => "Check the output directory and report contents",
            EtlError::IoError(_) => "Check that the file exists and the path is readable/writable",
            EtlError::SerializationError(_) => {
                "Check that the session JSON matches the expected lap/driver schema"
            }
            EtlError::ZipError(_) => "Check free disk space or disable compression",
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => "Fix the configuration value and retry",
            EtlError::MissingConfigError { .. } => "Provide the missing configuration field",
            EtlError::MalformedRecord { .. } => {
                "Fix or drop the offending telemetry record before analysis"
            }
            EtlError::AnalysisTimeout { .. } => "Increase the analysis timeout or reduce the input",
            EtlError::WorkerError { .. } => "Re-run the analysis; report a bug if it persists",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Could not fetch session data: {}", self),
            ErrorCategory::Data => format!("Session data is invalid: {}", self),
            ErrorCategory::Storage => format!("Could not read or write files: {}", self),
            ErrorCategory::Runtime => format!("Analysis failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
