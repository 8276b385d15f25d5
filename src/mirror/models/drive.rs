use serde::{Deserialize, Serialize};

use super::status::StatusTag;

pub const HARDWARE_PLACEHOLDER: &str = "<h/w drive>";
pub const UNFORMATTED_PLACEHOLDER: &str = "<unformatted>";

/// Raw status of a drive slot as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveStatus {
    #[default]
    Empty,
    Idle,
    Busy,
    Hardware,
}

impl From<DriveStatus> for StatusTag {
    fn from(status: DriveStatus) -> Self {
        match status {
            DriveStatus::Empty => StatusTag::Empty,
            DriveStatus::Idle => StatusTag::Idle,
            DriveStatus::Busy => StatusTag::Busy,
            DriveStatus::Hardware => StatusTag::Hardware,
        }
    }
}

/// One fixed drive position. Slot numbers are 1-based and stable for a session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveSlot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: DriveStatus,
    #[serde(default)]
    pub formatted: bool,
    #[serde(default)]
    pub write_protected: bool,
    #[serde(default)]
    pub modified: bool,
}

impl DriveSlot {
    /// Status used for icon selection. Idle drives are refined by
    /// modified > write protected > unformatted.
    pub fn effective_status(&self) -> StatusTag {
        if self.status != DriveStatus::Idle {
            return self.status.into();
        }
        if self.modified {
            StatusTag::Modified
        } else if self.write_protected {
            StatusTag::WriteProtected
        } else if !self.formatted {
            StatusTag::Unformatted
        } else {
            StatusTag::Idle
        }
    }

    /// Label to render for this slot, or `None` when the previously rendered
    /// label must stay (busy drive without a name).
    pub fn display_name(&self) -> Option<&str> {
        if self.name.is_empty() && self.status == DriveStatus::Busy {
            return None;
        }
        if self.formatted {
            Some(self.name.as_str())
        } else if self.status == DriveStatus::Hardware {
            Some(HARDWARE_PLACEHOLDER)
        } else {
            Some(UNFORMATTED_PLACEHOLDER)
        }
    }

    pub fn button_enabled(&self) -> bool {
        !matches!(self.status, DriveStatus::Busy | DriveStatus::Hardware)
    }
}
