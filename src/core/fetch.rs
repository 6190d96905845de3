//! Schedule export from the Sched API.

use crate::domain::model::Talk;
use crate::utils::error::{Result, TalksError};
use reqwest::Client;
use url::Url;

const EXPORT_PATH: &str = "/api/session/export";
const EXPORT_FIELDS: &str = "id,files,name,speakers,event_start,description";

pub struct SchedClient<'a> {
    client: &'a Client,
    event_url: &'a str,
    api_key: Option<&'a str>,
}

impl<'a> SchedClient<'a> {
    pub fn new(client: &'a Client, event_url: &'a str, api_key: Option<&'a str>) -> Self {
        Self {
            client,
            event_url,
            api_key,
        }
    }

    /// Full export URL, API key included. Never log it.
    pub fn export_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.event_url, EXPORT_PATH)).map_err(|e| {
            TalksError::ConfigError {
                message: format!("invalid event URL '{}': {}", self.event_url, e),
            }
        })?;

        {
            let mut query = url.query_pairs_mut();
            if let Some(api_key) = self.api_key {
                query.append_pair("api_key", api_key);
            }
            query
                .append_pair("format", "json")
                .append_pair("strip_html", "Y")
                .append_pair("fields", EXPORT_FIELDS);
        }

        Ok(url)
    }

    /// Fetches every schedule entry in one request, in the order the API lists them.
    pub async fn fetch_talks(&self) -> Result<Vec<Talk>> {
        let url = self.export_url()?;
        if self.api_key.is_none() {
            tracing::warn!("No Sched API key configured, the export will most likely be rejected");
        }

        tracing::debug!("Requesting schedule export from {}{}", self.event_url, EXPORT_PATH);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!("Schedule export status: {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(TalksError::ScheduleUnavailable {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<Vec<Talk>>(&body) {
            Ok(talks) => Ok(talks),
            Err(source) => Err(TalksError::MalformedSchedule { body, source }),
        }
    }
}
