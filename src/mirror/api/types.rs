use serde::Deserialize;

use crate::mirror::models::{ClientState, DriveSlot};

/// One resolved `/watch` long-poll. `drives: null` means no drive change;
/// a `null` element inside the array means that slot did not change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WatchChange {
    #[serde(default)]
    pub client: ClientState,
    #[serde(default)]
    pub drives: Option<Vec<Option<DriveSlot>>>,
}

/// Reply of `/status`; only the client field is of interest here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub client: ClientState,
}
