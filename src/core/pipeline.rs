use crate::core::export::{self, ReportFile};
use crate::core::worker::{AnalysisRequest, AnalysisWorker};
use crate::core::{AnalysisResult, ConfigProvider, Pipeline, SessionSnapshot, SessionSource, Storage};
use crate::utils::error::Result;
use std::path::Path;
use std::time::Duration;

pub struct LongRunPipeline<Src: SessionSource, S: Storage, C: ConfigProvider> {
    source: Src,
    storage: S,
    config: C,
    worker: AnalysisWorker,
}

impl<Src: SessionSource, S: Storage, C: ConfigProvider> LongRunPipeline<Src, S, C> {
    pub fn new(source: Src, storage: S, config: C) -> Self {
        let worker = AnalysisWorker::new(Duration::from_secs(config.analysis_timeout_seconds()));
        Self {
            source,
            storage,
            config,
            worker,
        }
    }

    async fn write_files(&self, files: &[ReportFile]) -> Result<String> {
        if self.config.compress_output() {
            let archive = export::bundle_zip(files)?;
            tracing::debug!("Writing ZIP archive ({} bytes) with {} files", archive.len(), files.len());
            self.storage.write_file(self.config.archive_name(), &archive).await?;
            return Ok(join_output(self.config.output_path(), self.config.archive_name()));
        }

        for file in files {
            tracing::debug!("Writing {} ({} bytes)", file.name, file.contents.len());
            self.storage.write_file(&file.name, &file.contents).await?;
        }
        Ok(self.config.output_path().to_string())
    }
}

fn join_output(base: &str, name: &str) -> String {
    Path::new(base).join(name).to_string_lossy().into_owned()
}

#[async_trait::async_trait]
impl<Src: SessionSource, S: Storage, C: ConfigProvider> Pipeline for LongRunPipeline<Src, S, C> {
    async fn extract(&self) -> Result<SessionSnapshot> {
        // 來源可能是樣本檔或 OpenF1
        tracing::debug!("Fetching session from {:?} source", self.config.source_kind());
        self.source.fetch_session().await
    }

    async fn transform(&self, session: SessionSnapshot) -> Result<AnalysisResult> {
        let response = self
            .worker
            .submit(AnalysisRequest { payload: session })
            .await?;
        Ok(response.into())
    }

    async fn load(&self, result: AnalysisResult) -> Result<String> {
        let files = export::render_reports(&result, self.config.output_formats())?;
        self.write_files(&files).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SourceKind;
    use crate::domain::model::{Driver, Lap};
    use crate::utils::error::EtlError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct StaticSource(SessionSnapshot);

    #[async_trait::async_trait]
    impl SessionSource for StaticSource {
        async fn fetch_session(&self) -> Result<SessionSnapshot> {
            Ok(self.0.clone())
        }
    }

    struct TestConfig {
        formats: Vec<String>,
        compress: bool,
    }

    impl ConfigProvider for TestConfig {
        fn source_kind(&self) -> SourceKind {
            SourceKind::Sample
        }
        fn fixture_path(&self) -> &str {
            "unused.json"
        }
        fn api_base(&self) -> &str {
            "https://api.openf1.org/v1"
        }
        fn session_key(&self) -> Option<u32> {
            None
        }
        fn output_path(&self) -> &str {
            "./out"
        }
        fn output_formats(&self) -> &[String] {
            &self.formats
        }
        fn compress_output(&self) -> bool {
            self.compress
        }
        fn archive_name(&self) -> &str {
            "long_runs.zip"
        }
        fn analysis_timeout_seconds(&self) -> u64 {
            5
        }
    }

    fn snapshot() -> SessionSnapshot {
        let times = [95000, 95100, 95150, 95200, 95300, 95350, 95400, 95500, 95600, 99900];
        SessionSnapshot {
            drivers: vec![
                Driver {
                    code: "PIA".to_string(),
                    team: "McLaren".to_string(),
                    declared_compound: Some("MEDIUM".to_string()),
                    number: 81,
                },
                Driver {
                    code: "BEA".to_string(),
                    team: "Haas".to_string(),
                    declared_compound: None,
                    number: 87,
                },
            ],
            laps: times
                .iter()
                .enumerate()
                .map(|(i, &t)| Lap {
                    driver: "PIA".to_string(),
                    lap_number: i as u32 + 1,
                    lap_time_ms: t,
                    valid: true,
                    compound: Some("MEDIUM".to_string()),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_transform_skips_drivers_without_laps() {
        let pipeline = LongRunPipeline::new(
            StaticSource(snapshot()),
            MockStorage::new(),
            TestConfig {
                formats: vec!["csv".to_string()],
                compress: false,
            },
        );

        let session = pipeline.extract().await.unwrap();
        let result = pipeline.transform(session).await.unwrap();

        assert_eq!(result.runs.len(), 1);
        assert_eq!(result.runs[0].driver, "PIA");
        assert_eq!(result.runs[0].laps, 9);
        assert_eq!(result.teams.len(), 1);
    }

    #[tokio::test]
    async fn test_load_writes_individual_files() {
        let storage = MockStorage::new();
        let pipeline = LongRunPipeline::new(
            StaticSource(snapshot()),
            storage.clone(),
            TestConfig {
                formats: vec!["csv".to_string(), "json".to_string()],
                compress: false,
            },
        );

        let session = pipeline.extract().await.unwrap();
        let result = pipeline.transform(session).await.unwrap();
        let output = pipeline.load(result).await.unwrap();

        assert_eq!(output, "./out");
        let runs_csv = String::from_utf8(storage.get_file("runs.csv").await.unwrap()).unwrap();
        assert!(runs_csv.contains("PIA,McLaren,MEDIUM,9,"));
        assert!(storage.get_file("teams.csv").await.is_some());
        assert!(storage.get_file("analysis.json").await.is_some());
    }

    #[tokio::test]
    async fn test_load_bundles_archive_when_compressed() {
        let storage = MockStorage::new();
        let pipeline = LongRunPipeline::new(
            StaticSource(snapshot()),
            storage.clone(),
            TestConfig {
                formats: vec!["csv".to_string()],
                compress: true,
            },
        );

        let output = pipeline.load(AnalysisResult::default()).await.unwrap();

        assert!(output.ends_with("long_runs.zip"));
        assert!(storage.get_file("long_runs.zip").await.is_some());
        assert!(storage.get_file("runs.csv").await.is_none());
    }
}
