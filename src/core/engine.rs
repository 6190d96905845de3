use crate::core::Pipeline;
use crate::utils::error::Result;

/// Runs fetch, download and export strictly in that order. Nothing is
/// exported unless the earlier phases succeeded.
pub struct TalksEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> TalksEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Fetching schedule...");
        let talks = self.pipeline.extract().await?;
        let fillers = talks.iter().filter(|t| t.is_filler()).count();
        tracing::info!(
            "Fetched {} schedule entries ({} talks, {} breaks and other fillers)",
            talks.len(),
            talks.len() - fillers,
            fillers
        );

        tracing::info!("Downloading attachments...");
        let with_files = talks.iter().filter(|t| !t.files.is_empty()).count();
        tracing::debug!("{} entries carry attachments", with_files);
        let talks = self.pipeline.transform(talks).await?;

        tracing::info!("Rendering README...");
        let output_path = self.pipeline.load(talks).await?;
        tracing::info!("README saved to: {}", output_path);

        Ok(output_path)
    }
}
