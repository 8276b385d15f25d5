use serde::Serialize;

/// Closed set of status tags a drive row or the client indicator can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusTag {
    Empty,
    Idle,
    Busy,
    Hardware,
    Unformatted,
    WriteProtected,
    Modified,
    Connected,
    Disconnected,
}

impl StatusTag {
    pub const ALL: [StatusTag; 9] = [
        StatusTag::Empty,
        StatusTag::Idle,
        StatusTag::Busy,
        StatusTag::Hardware,
        StatusTag::Unformatted,
        StatusTag::WriteProtected,
        StatusTag::Modified,
        StatusTag::Connected,
        StatusTag::Disconnected,
    ];

    /// Icon identifier (bootstrap-icons class) for this tag.
    pub fn icon(self) -> &'static str {
        match self {
            StatusTag::Empty => "bi-none",
            StatusTag::Idle => "bi-app",
            StatusTag::Busy => "bi-caret-right-square",
            StatusTag::Hardware => "bi-gear",
            StatusTag::Unformatted => "bi-hr",
            StatusTag::WriteProtected => "bi-lock",
            StatusTag::Modified => "bi-app-indicator",
            StatusTag::Connected => "bi-plug-fill",
            StatusTag::Disconnected => "bi-plug",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusTag::Empty => "empty",
            StatusTag::Idle => "idle",
            StatusTag::Busy => "busy",
            StatusTag::Hardware => "hardware",
            StatusTag::Unformatted => "unformatted",
            StatusTag::WriteProtected => "writeProtected",
            StatusTag::Modified => "modified",
            StatusTag::Connected => "connected",
            StatusTag::Disconnected => "disconnected",
        }
    }
}

pub fn icon_for(tag: StatusTag) -> &'static str {
    tag.icon()
}
