use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Sched hands out ids as strings, older exports used numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TalkId {
    Text(String),
    Number(i64),
}

impl Default for TalkId {
    fn default() -> Self {
        TalkId::Text(String::new())
    }
}

impl fmt::Display for TalkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TalkId::Text(id) => f.write_str(id),
            TalkId::Number(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    #[serde(default = "unknown_speaker", deserialize_with = "null_as_unknown")]
    pub name: String,
}

fn unknown_speaker() -> String {
    "Unknown".to_string()
}

/// Sched exports `null` for unset fields as often as it leaves them out.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown_speaker))
}

/// Raw file reference as exported by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentDescriptor {
    /// Remote URL.
    pub path: String,
    /// Original file name, extension included.
    pub name: String,
}

/// A downloaded attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_url: String,
    pub file_path: String,
    /// Original name, shown in the rendered document.
    pub file_name: String,
}

/// One schedule entry. Entries without speakers are breaks, lunches and
/// other filler slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Talk {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: TalkId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub speakers: Vec<Speaker>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_start: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Emptied once the attachments have been downloaded.
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<AttachmentDescriptor>,
    #[serde(default, skip_deserializing)]
    pub attachments: Vec<Attachment>,
}

impl Talk {
    pub fn is_filler(&self) -> bool {
        self.speakers.is_empty()
    }

    pub fn speaker_names(&self) -> Vec<&str> {
        self.speakers.iter().map(|s| s.name.as_str()).collect()
    }
}
