//! Markdown rendering of the schedule.

use crate::domain::model::Talk;
use chrono::NaiveDateTime;

pub const DOCUMENT_TITLE: &str = "PyConES 2019 Conferences and their related stuff";
const PREAMBLE: &str =
    "It contains all available talks, their attachments and other interesting information.";
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Renders one talk block, or `None` for filler entries.
pub fn render_talk(talk: &Talk, event_url: &str) -> Option<String> {
    if talk.is_filler() {
        return None;
    }

    let mut talk_md = format!("### {}\n", talk.name);
    talk_md.push_str(&format!("  - :snake: _{}_\n", talk.speaker_names().join(", ")));
    talk_md.push_str(&format!("  - :alarm_clock:  {}\n", talk.event_start));

    if let Some(description) = talk.description.as_deref().filter(|d| !d.is_empty()) {
        let description: String = description.chars().filter(|&c| c != '\n' && c != '\r').collect();
        talk_md.push_str(&format!("  - :clipboard:  {}\n", description));
    }

    if !talk.attachments.is_empty() {
        talk_md.push_str("  - :open_file_folder: Attachments\n");
        for attachment in &talk.attachments {
            talk_md.push_str(&format!(
                "    - :paperclip: [{}]({})\n",
                attachment.file_name, attachment.file_path
            ));
        }
    }

    talk_md.push_str(&format!("  - :link: [More info]({}/event/{})", event_url, talk.id));
    Some(talk_md)
}

/// Renders the whole document. Pure: the timestamp and the lightning talks
/// fragment are passed in.
pub fn render_markdown(
    talks: &[Talk],
    lightning_talks: Option<&str>,
    event_url: &str,
    generated_at: NaiveDateTime,
) -> String {
    let mut content = format!("# {}\n{}\n## Talks\n", DOCUMENT_TITLE, PREAMBLE);

    let mut rendered = 0;
    for talk_md in talks.iter().filter_map(|talk| render_talk(talk, event_url)) {
        content.push_str(&talk_md);
        content.push('\n');
        rendered += 1;
    }
    tracing::debug!("Rendered {} talk(s), skipped {} filler entries", rendered, talks.len() - rendered);

    if let Some(fragment) = lightning_talks.filter(|f| !f.is_empty()) {
        content.push('\n');
        content.push_str(fragment);
    }

    content.push_str(&format!(
        "\n_Automatically created with :hearts: at {}_",
        generated_at.format(TIMESTAMP_FORMAT)
    ));
    content
}
