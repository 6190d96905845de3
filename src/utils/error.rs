use thiserror::Error;

#[derive(Error, Debug)]
pub enum TalksError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Sched API answered with status {status}: '{body}'")]
    ScheduleUnavailable { status: u16, body: String },

    #[error("Sched talks can't be correctly retrieved: '{body}'")]
    MalformedSchedule {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Attachment download failed for {url}: {source}")]
    DownloadError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl TalksError {
    /// Short hint printed next to the error when the binary gives up.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TalksError::ScheduleUnavailable { status: 401 | 403, .. } => {
                "check the API token (--token, SCHED_API_KEY or SCHED_KEY)"
            }
            TalksError::ScheduleUnavailable { .. } | TalksError::ApiError(_) => {
                "check network connectivity and the event URL"
            }
            TalksError::MalformedSchedule { .. } => {
                "the response above is not a schedule export; an invalid API token is the usual cause"
            }
            TalksError::DownloadError { .. } => "the attachment URL may be gone; re-run once it is reachable",
            TalksError::IoError(_) => "check permissions on the output directory",
            TalksError::SerializationError(_) | TalksError::ConfigError { .. } => {
                "check the command line arguments"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, TalksError>;
