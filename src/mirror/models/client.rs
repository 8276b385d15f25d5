use serde::Deserialize;

use super::status::StatusTag;

/// Client identifier the server reports while no client is connected.
pub const UNKNOWN_CLIENT: &str = "<unknown>";
pub const DISCONNECTED_LABEL: &str = "disconn.";

/// Connection state of the client machine attached to the drive server.
///
/// An empty string on the wire means "no change this tick", not a disconnect.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<String>")]
pub enum ClientState {
    #[default]
    Unchanged,
    Connected(String),
    Disconnected,
}

impl From<Option<String>> for ClientState {
    fn from(raw: Option<String>) -> Self {
        match raw {
            Some(value) => ClientState::from_wire(&value),
            None => ClientState::Unchanged,
        }
    }
}

impl ClientState {
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "" => ClientState::Unchanged,
            UNKNOWN_CLIENT | "unknown" => ClientState::Disconnected,
            id => ClientState::Connected(id.to_string()),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, ClientState::Unchanged)
    }

    /// Icon tag and label to render, `None` for the no-op marker.
    pub fn indicator(&self) -> Option<(StatusTag, &str)> {
        match self {
            ClientState::Unchanged => None,
            ClientState::Connected(id) => Some((StatusTag::Connected, id.as_str())),
            ClientState::Disconnected => Some((StatusTag::Disconnected, DISCONNECTED_LABEL)),
        }
    }
}

/// Client type the adapter can be forced to during a resync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    If1,
    Ql,
}

impl ClientKind {
    pub fn as_query(self) -> &'static str {
        match self {
            ClientKind::If1 => "if1",
            ClientKind::Ql => "ql",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "if1" => Some(ClientKind::If1),
            "ql" => Some(ClientKind::Ql),
            _ => None,
        }
    }
}
