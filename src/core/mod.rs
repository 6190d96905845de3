pub mod download;
pub mod engine;
pub mod fetch;
pub mod pipeline;
pub mod render;

pub use crate::domain::model::{Attachment, AttachmentDescriptor, Talk};
pub use crate::domain::ports::{Clock, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
