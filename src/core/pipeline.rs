use crate::core::download::AttachmentDownloader;
use crate::core::fetch::SchedClient;
use crate::core::render::render_markdown;
use crate::core::{Clock, ConfigProvider, Pipeline, Storage, Talk};
use crate::utils::error::Result;
use chrono::{Local, NaiveDateTime};
use reqwest::Client;

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Fetches the schedule, downloads attachments, then renders and exports
/// the README.
pub struct SchedPipeline<S: Storage, C: ConfigProvider, K: Clock = SystemClock> {
    storage: S,
    config: C,
    clock: K,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> SchedPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self::with_clock(storage, config, SystemClock)
    }
}

impl<S: Storage, C: ConfigProvider, K: Clock> SchedPipeline<S, C, K> {
    pub fn with_clock(storage: S, config: C, clock: K) -> Self {
        Self {
            storage,
            config,
            clock,
            client: Client::new(),
        }
    }

    /// The lightning talks fragment, if one can be read.
    pub async fn read_lightning_talks(&self) -> Option<String> {
        let path = self.config.fragment_path();
        match self.storage.read_file(path).await {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(content) => Some(content),
                Err(e) => {
                    tracing::warn!("Ignoring {}: not valid UTF-8 ({})", path, e);
                    None
                }
            },
            Err(e) => {
                tracing::debug!("No lightning talks fragment at {}: {}", path, e);
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, K: Clock> Pipeline for SchedPipeline<S, C, K> {
    async fn extract(&self) -> Result<Vec<Talk>> {
        SchedClient::new(&self.client, self.config.event_url(), self.config.api_key())
            .fetch_talks()
            .await
    }

    async fn transform(&self, talks: Vec<Talk>) -> Result<Vec<Talk>> {
        AttachmentDownloader::new(
            &self.client,
            self.config.output_dir(),
            self.config.concurrent_downloads(),
        )
        .download_all(talks)
        .await
    }

    async fn load(&self, talks: Vec<Talk>) -> Result<String> {
        let lightning_talks = self.read_lightning_talks().await;
        let markdown = render_markdown(
            &talks,
            lightning_talks.as_deref(),
            self.config.event_url(),
            self.clock.now(),
        );

        let readme_path = self.config.readme_path();
        tracing::debug!("Writing {} bytes to {}", markdown.len(), readme_path);
        self.storage.write_file(readme_path, markdown.as_bytes()).await?;

        Ok(readme_path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Defaults, EnvSnapshot, Flags, Settings};
    use crate::domain::model::{AttachmentDescriptor, Speaker};
    use crate::utils::error::TalksError;
    use chrono::NaiveDate;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tempfile::TempDir;
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

        async fn put_file(&self, path: &str, data: &[u8]) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
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
                TalksError::IoError(std::io::Error::new(
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

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2019, 10, 5)
                .unwrap()
                .and_hms_opt(9, 5, 0)
                .unwrap()
        }
    }

    fn settings(event_url: &str, output_dir: &str) -> Settings {
        let flags = Flags {
            output_dir: Some(output_dir.to_string()),
            api_key: Some("k3y".to_string()),
            concurrent_downloads: None,
        };
        let defaults = Defaults {
            event_url: event_url.to_string(),
            ..Defaults::default()
        };
        Settings::resolve(&flags, &EnvSnapshot::default(), &defaults)
    }

    fn keynote() -> Talk {
        Talk {
            name: "Keynote".to_string(),
            speakers: vec![Speaker {
                name: "Ana".to_string(),
            }],
            ..Talk::default()
        }
    }

    #[tokio::test]
    async fn test_extract_uses_configured_key() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/session/export")
                .query_param("api_key", "k3y");
            then.status(200).json_body(serde_json::json!([
                {"id": "1", "name": "Keynote", "speakers": [{"name": "Ana"}]}
            ]));
        });

        let storage = MockStorage::new();
        let pipeline = SchedPipeline::with_clock(storage, settings(&server.base_url(), "files"), FixedClock);

        let talks = pipeline.extract().await.unwrap();

        api_mock.assert();
        assert_eq!(talks.len(), 1);
        assert_eq!(talks[0].name, "Keynote");
    }

    #[tokio::test]
    async fn test_transform_fills_attachments() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slides.pdf");
            then.status(200).body("%PDF");
        });

        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("files");
        let storage = MockStorage::new();
        let pipeline = SchedPipeline::with_clock(
            storage,
            settings(&server.base_url(), output_dir.to_str().unwrap()),
            FixedClock,
        );

        let mut talk = keynote();
        talk.files = vec![AttachmentDescriptor {
            path: server.url("/slides.pdf"),
            name: "Slides.pdf".to_string(),
        }];

        let talks = pipeline.transform(vec![talk]).await.unwrap();

        assert_eq!(talks[0].attachments.len(), 1);
        assert!(output_dir.join("keynote").join("slides.pdf").exists());
    }

    #[tokio::test]
    async fn test_load_writes_readme_with_fragment() {
        let storage = MockStorage::new();
        storage
            .put_file("lightning_talks.md", b"## Lightning talks\n- five minutes of fame")
            .await;
        let pipeline = SchedPipeline::with_clock(
            storage.clone(),
            settings("https://pycones19.sched.com", "files"),
            FixedClock,
        );

        let path = pipeline.load(vec![keynote()]).await.unwrap();

        assert_eq!(path, "README.md");
        let readme = String::from_utf8(storage.get_file("README.md").await.unwrap()).unwrap();
        assert!(readme.contains("\n\n## Lightning talks\n- five minutes of fame\n"));
        assert!(readme.ends_with("_Automatically created with :hearts: at 2019/10/05 09:05_"));
    }

    #[tokio::test]
    async fn test_load_without_fragment_matches_plain_render() {
        let storage = MockStorage::new();
        let config = settings("https://pycones19.sched.com", "files");
        let pipeline = SchedPipeline::with_clock(storage.clone(), config, FixedClock);

        pipeline.load(vec![keynote()]).await.unwrap();

        let readme = storage.get_file("README.md").await.unwrap();
        let expected = render_markdown(&[keynote()], None, "https://pycones19.sched.com", FixedClock.now());
        assert_eq!(readme, expected.into_bytes());
    }

    #[tokio::test]
    async fn test_non_utf8_fragment_is_ignored() {
        let storage = MockStorage::new();
        storage.put_file("lightning_talks.md", &[0xff, 0xfe, 0x00]).await;
        let pipeline = SchedPipeline::with_clock(
            storage,
            settings("https://pycones19.sched.com", "files"),
            FixedClock,
        );

        assert_eq!(pipeline.read_lightning_talks().await, None);
    }
}
