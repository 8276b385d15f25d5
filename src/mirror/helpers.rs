use chrono::{DateTime, Utc};

use crate::types::MirrorError;

/// Cartridge image formats the server accepts for upload.
pub const ACCEPTED_FORMATS: [&str; 3] = ["mdr", "mdv", "z80"];

pub const SAVE_NOTICE: &str = "SAVE coming soon";
pub const UNLOAD_TITLE: &str = "Unload cartridge?";
pub const UNLOAD_QUESTION: &str = "Unsaved changes will be lost!";

/// Accept list for a file picker, e.g. `.mdr,.MDR,.mdv,.MDV,.z80,.Z80`.
pub fn accept_list() -> String {
    ACCEPTED_FORMATS
        .iter()
        .map(|ext| format!(".{ext},.{}", ext.to_ascii_uppercase()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Declared upload format for a chosen file: the text after the last dot,
/// checked case-insensitively against [`ACCEPTED_FORMATS`].
pub fn upload_format(file_name: &str) -> Result<&str, MirrorError> {
    let ext = match file_name.rfind('.') {
        Some(dot) => &file_name[dot + 1..],
        None => "",
    };
    if ACCEPTED_FORMATS
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(ext))
    {
        Ok(ext)
    } else {
        Err(MirrorError::UnsupportedFormat(file_name.to_string()))
    }
}

pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(then);
    if duration.num_seconds() < 60 {
        "just now".to_string()
    } else if duration.num_minutes() < 60 {
        format!("{} min ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{} h ago", duration.num_hours())
    } else {
        format!("{} d ago", duration.num_days())
    }
}
