//! Attachment downloads into `<output_dir>/<talk slug>/<file slug>.<ext>`.

use crate::domain::model::{Attachment, AttachmentDescriptor, Talk};
use crate::utils::error::{Result, TalksError};
use crate::utils::slug::{slugify, slugify_file_name};
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub const CHUNK_SIZE: usize = 1024;

struct DownloadJob {
    talk_index: usize,
    descriptor: AttachmentDescriptor,
    local_path: PathBuf,
}

pub struct AttachmentDownloader<'a> {
    client: &'a Client,
    output_dir: PathBuf,
    concurrency: usize,
}

impl<'a> AttachmentDownloader<'a> {
    pub fn new(client: &'a Client, output_dir: impl Into<PathBuf>, concurrency: usize) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
            concurrency: concurrency.max(1),
        }
    }

    pub fn talk_dir(&self, talk_name: &str) -> PathBuf {
        self.output_dir.join(slugify(talk_name))
    }

    pub fn local_path(talk_dir: &Path, file_name: &str) -> PathBuf {
        talk_dir.join(slugify_file_name(file_name))
    }

    /// Downloads every talk's files and moves them into `attachments`.
    ///
    /// Talks without files come back untouched. Attachment order always
    /// matches the source order, whatever the concurrency.
    pub async fn download_all(&self, mut talks: Vec<Talk>) -> Result<Vec<Talk>> {
        fs::create_dir_all(&self.output_dir).await?;

        let mut jobs = Vec::new();
        for (talk_index, talk) in talks.iter_mut().enumerate() {
            let files = std::mem::take(&mut talk.files);
            if files.is_empty() {
                continue;
            }

            let talk_dir = self.talk_dir(&talk.name);
            fs::create_dir_all(&talk_dir).await?;
            tracing::debug!("{} attachment(s) for '{}' go to {}", files.len(), talk.name, talk_dir.display());

            for descriptor in files {
                let local_path = Self::local_path(&talk_dir, &descriptor.name);
                jobs.push(DownloadJob {
                    talk_index,
                    descriptor,
                    local_path,
                });
            }
        }

        let total = jobs.len();
        let downloaded: Vec<(usize, Attachment)> = stream::iter(jobs)
            .map(|job| self.download(job))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        for (talk_index, attachment) in downloaded {
            talks[talk_index].attachments.push(attachment);
        }

        tracing::info!("Downloaded {} attachment(s) into {}", total, self.output_dir.display());
        Ok(talks)
    }

    async fn download(&self, job: DownloadJob) -> Result<(usize, Attachment)> {
        let DownloadJob {
            talk_index,
            descriptor,
            local_path,
        } = job;

        let bytes = self.fetch_to_file(&descriptor.path, &local_path).await?;
        tracing::debug!("Saved {} ({} bytes)", local_path.display(), bytes);

        Ok((
            talk_index,
            Attachment {
                file_url: descriptor.path,
                file_path: local_path.to_string_lossy().into_owned(),
                file_name: descriptor.name,
            },
        ))
    }

    async fn fetch_to_file(&self, url: &str, local_path: &Path) -> Result<usize> {
        let download_error = |source: reqwest::Error| TalksError::DownloadError {
            url: url.to_string(),
            source,
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(download_error)?;

        let mut file = fs::File::create(local_path).await?;
        let mut written = 0;
        while let Some(chunk) = response.chunk().await.map_err(download_error)? {
            for piece in chunk.chunks(CHUNK_SIZE) {
                file.write_all(piece).await?;
                written += piece.len();
            }
        }
        file.flush().await?;

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Speaker;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn talk(name: &str, files: Vec<AttachmentDescriptor>) -> Talk {
        Talk {
            name: name.to_string(),
            speakers: vec![Speaker {
                name: "Ana".to_string(),
            }],
            files,
            ..Talk::default()
        }
    }

    fn descriptor(server: &MockServer, path: &str, name: &str) -> AttachmentDescriptor {
        AttachmentDescriptor {
            path: server.url(path),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_local_path_uses_slugs() {
        let client = Client::new();
        let downloader = AttachmentDownloader::new(&client, "files", 1);

        let talk_dir = downloader.talk_dir("Intro: PyCon ES!");
        let path = AttachmentDownloader::local_path(&talk_dir, "My Slides.pdf");

        assert_eq!(path, Path::new("files").join("intro-pycon-es").join("my-slides.pdf"));
    }

    #[tokio::test]
    async fn test_talk_without_files_is_left_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("files");
        let client = Client::new();
        let downloader = AttachmentDownloader::new(&client, &output_dir, 1);

        let talks = downloader
            .download_all(vec![talk("No slides", vec![])])
            .await
            .unwrap();

        assert!(talks[0].attachments.is_empty());
        assert!(output_dir.exists());
        assert!(!output_dir.join("no-slides").exists());
    }

    #[tokio::test]
    async fn test_download_writes_body_and_records_attachment() {
        let server = MockServer::start();
        let body = vec![7u8; CHUNK_SIZE * 3 + 17];
        let file_mock = server.mock(|when, then| {
            when.method(GET).path("/files/slides.pdf");
            then.status(200).body(body.clone());
        });

        let temp_dir = TempDir::new().unwrap();
        let client = Client::new();
        let downloader = AttachmentDownloader::new(&client, temp_dir.path(), 1);

        let talks = downloader
            .download_all(vec![talk(
                "Rust & Python",
                vec![descriptor(&server, "/files/slides.pdf", "Final Slides.pdf")],
            )])
            .await
            .unwrap();

        file_mock.assert();
        let attachment = &talks[0].attachments[0];
        let expected_path = temp_dir.path().join("rust-python").join("final-slides.pdf");
        assert_eq!(attachment.file_name, "Final Slides.pdf");
        assert_eq!(attachment.file_url, server.url("/files/slides.pdf"));
        assert_eq!(Path::new(&attachment.file_path), expected_path.as_path());
        assert!(talks[0].files.is_empty());
        assert_eq!(std::fs::read(expected_path).unwrap(), body);
    }

    #[tokio::test]
    async fn test_download_twice_overwrites_in_place() {
        let server = MockServer::start();
        let file_mock = server.mock(|when, then| {
            when.method(GET).path("/notes.txt");
            then.status(200).body("notes");
        });

        let temp_dir = TempDir::new().unwrap();
        let client = Client::new();
        let downloader = AttachmentDownloader::new(&client, temp_dir.path(), 1);
        let input = vec![talk("Notes", vec![descriptor(&server, "/notes.txt", "notes.txt")])];

        let first = downloader.download_all(input.clone()).await.unwrap();
        let second = downloader.download_all(input).await.unwrap();

        file_mock.assert_hits(2);
        assert_eq!(first[0].attachments, second[0].attachments);
        assert_eq!(std::fs::read_to_string(&second[0].attachments[0].file_path).unwrap(), "notes");
    }

    #[tokio::test]
    async fn test_failed_attachment_aborts() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/gone.pdf");
            then.status(404);
        });

        let temp_dir = TempDir::new().unwrap();
        let client = Client::new();
        let downloader = AttachmentDownloader::new(&client, temp_dir.path(), 1);

        let err = downloader
            .download_all(vec![talk("Gone", vec![descriptor(&server, "/gone.pdf", "gone.pdf")])])
            .await
            .unwrap_err();

        assert!(matches!(err, TalksError::DownloadError { .. }));
        assert!(!temp_dir.path().join("gone").join("gone.pdf").exists());
    }
}
