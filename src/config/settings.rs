//! Run settings, merged once at startup from flags, environment and defaults.
//!
//! Precedence is flag > `SCHED_API_KEY` > `SCHED_KEY` > default. Empty
//! strings count as unset at every layer.

use crate::core::ConfigProvider;
use std::fmt;

pub const PRIMARY_API_KEY_VAR: &str = "SCHED_API_KEY";
pub const SECONDARY_API_KEY_VAR: &str = "SCHED_KEY";

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    pub output_dir: Option<String>,
    pub api_key: Option<String>,
    pub concurrent_downloads: Option<usize>,
}

/// The environment variables the resolver looks at, read once.
#[derive(Clone, Default)]
pub struct EnvSnapshot {
    pub primary_api_key: Option<String>,
    pub secondary_api_key: Option<String>,
}

impl EnvSnapshot {
    pub fn capture() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            primary_api_key: lookup(PRIMARY_API_KEY_VAR),
            secondary_api_key: lookup(SECONDARY_API_KEY_VAR),
        }
    }
}

impl fmt::Debug for EnvSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSnapshot")
            .field("primary_api_key", &self.primary_api_key.as_ref().map(|_| "<redacted>"))
            .field("secondary_api_key", &self.secondary_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Defaults {
    pub output_dir: String,
    pub event_url: String,
    pub readme_path: String,
    pub fragment_path: String,
    pub concurrent_downloads: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output_dir: "files".to_string(),
            event_url: "https://pycones19.sched.com".to_string(),
            readme_path: "README.md".to_string(),
            fragment_path: "lightning_talks.md".to_string(),
            concurrent_downloads: 1,
        }
    }
}

#[derive(Clone)]
pub struct Settings {
    output_dir: String,
    api_key: Option<String>,
    event_url: String,
    readme_path: String,
    fragment_path: String,
    concurrent_downloads: usize,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

impl Settings {
    pub fn resolve(flags: &Flags, env: &EnvSnapshot, defaults: &Defaults) -> Self {
        let api_key = non_empty(&flags.api_key)
            .or_else(|| non_empty(&env.primary_api_key))
            .or_else(|| non_empty(&env.secondary_api_key));

        Self {
            output_dir: non_empty(&flags.output_dir).unwrap_or_else(|| defaults.output_dir.clone()),
            api_key,
            event_url: defaults.event_url.trim_end_matches('/').to_string(),
            readme_path: defaults.readme_path.clone(),
            fragment_path: defaults.fragment_path.clone(),
            concurrent_downloads: flags
                .concurrent_downloads
                .filter(|n| *n > 0)
                .unwrap_or(defaults.concurrent_downloads)
                .max(1),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("output_dir", &self.output_dir)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("event_url", &self.event_url)
            .field("readme_path", &self.readme_path)
            .field("fragment_path", &self.fragment_path)
            .field("concurrent_downloads", &self.concurrent_downloads)
            .finish()
    }
}

impl ConfigProvider for Settings {
    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn event_url(&self) -> &str {
        &self.event_url
    }

    fn readme_path(&self) -> &str {
        &self.readme_path
    }

    fn fragment_path(&self) -> &str {
        &self.fragment_path
    }

    fn concurrent_downloads(&self) -> usize {
        self.concurrent_downloads
    }
}
