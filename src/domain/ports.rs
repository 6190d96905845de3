use crate::domain::model::Talk;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_dir(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn event_url(&self) -> &str;
    fn readme_path(&self) -> &str;
    fn fragment_path(&self) -> &str;
    fn concurrent_downloads(&self) -> usize;
}

/// Source of the generation timestamp stamped on the document.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Talk>>;
    async fn transform(&self, talks: Vec<Talk>) -> Result<Vec<Talk>>;
    async fn load(&self, talks: Vec<Talk>) -> Result<String>;
}
