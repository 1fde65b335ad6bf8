// Adapters layer: concrete implementations for external systems (storage, session sources).

pub mod fixture;
pub mod openf1;
pub mod storage;

pub use fixture::FixtureSource;
pub use openf1::OpenF1Source;
pub use storage::LocalStorage;

use crate::core::{ConfigProvider, SessionSource, SourceKind};
use crate::utils::error::{EtlError, Result};

/// Picks the session source named by the configuration.
pub fn build_source<C: ConfigProvider + ?Sized>(config: &C) -> Result<Box<dyn SessionSource>> {
    match config.source_kind() {
        SourceKind::Sample => Ok(Box::new(FixtureSource::new(
            LocalStorage::new("."),
            config.fixture_path(),
        ))),
        SourceKind::OpenF1 => {
            let session_key = config.session_key().ok_or_else(|| EtlError::MissingConfigError {
                field: "session_key".to_string(),
            })?;
            Ok(Box::new(OpenF1Source::new(config.api_base(), session_key)?))
        }
    }
}
