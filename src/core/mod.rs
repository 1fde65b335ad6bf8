pub mod etl;
pub mod export;
pub mod pipeline;
pub mod worker;

pub use crate::domain::model::{AnalysisResult, SessionSnapshot};
pub use crate::domain::ports::{ConfigProvider, Pipeline, SessionSource, SourceKind, Storage};
pub use crate::utils::error::Result;
