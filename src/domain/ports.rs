use crate::domain::model::{AnalysisResult, SessionSnapshot};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Sample,
    OpenF1,
}

pub trait ConfigProvider: Send + Sync {
    fn source_kind(&self) -> SourceKind;
    fn fixture_path(&self) -> &str;
    fn api_base(&self) -> &str;
    fn session_key(&self) -> Option<u32>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn compress_output(&self) -> bool;
    fn archive_name(&self) -> &str;
    fn analysis_timeout_seconds(&self) -> u64;
}

/// Anything that can produce a normalized session snapshot.
#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn fetch_session(&self) -> Result<SessionSnapshot>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SessionSnapshot>;
    async fn transform(&self, session: SessionSnapshot) -> Result<AnalysisResult>;
    async fn load(&self, result: AnalysisResult) -> Result<String>;
}

#[async_trait]
impl<T: SessionSource + ?Sized> SessionSource for Box<T> {
    async fn fetch_session(&self) -> Result<SessionSnapshot> {
        (**self).fetch_session().await
    }
}
