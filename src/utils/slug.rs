//! Filesystem-safe names for talk directories and attachment files.

use deunicode::deunicode;
use regex::Regex;
use std::sync::LazyLock;

static SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid separator pattern"));

const EMPTY_SLUG: &str = "untitled";

/// Transliterates `text` to ASCII, lower-cases it, drops apostrophes and
/// collapses every run of non-alphanumeric characters into a single `-`.
///
/// ```
/// use sched_talks::utils::slug::slugify;
///
/// assert_eq!(slugify("Intro: PyCon ES!"), "intro-pycon-es");
/// ```
pub fn slugify(text: &str) -> String {
    let lowered = deunicode(text).to_lowercase().replace('\'', "");
    let slug = SEPARATOR_RUNS.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Splits a file name into base and extension, the extension keeping its dot.
///
/// Only the last path component is looked at. Leading dots belong to the
/// base, so `.bashrc` has no extension.
pub fn split_extension(file_name: &str) -> (&str, &str) {
    let component_start = file_name.rfind(['/', '\\']).map_or(0, |idx| idx + 1);
    let component = &file_name[component_start..];

    match component.rfind('.') {
        Some(idx) if component[..idx].chars().any(|c| c != '.') => {
            file_name.split_at(component_start + idx)
        }
        _ => (file_name, ""),
    }
}

/// Slugifies only the base of `file_name`, keeping the original extension.
pub fn slugify_file_name(file_name: &str) -> String {
    let (base, extension) = split_extension(file_name);
    format!("{}{}", slugify(base), extension)
}
