use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::types::MirrorError;

use super::api::WatchChange;
use super::models::{ClientState, DriveSlot};
use super::view::{DriveListRenderer, Panel, SnapshotReport, ViewSurface};

/// What one applied change did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeReport {
    pub client_changed: bool,
    pub drives: Option<SnapshotReport>,
}

struct SessionState {
    client: ClientState,
    drives: Vec<DriveSlot>,
    renderer: DriveListRenderer,
    selected: Option<usize>,
    panel: Panel,
    last_change: Option<DateTime<Utc>>,
}

/// Client connection and drive array state mirrored from the server,
/// together with the renderer that shows it. Clones share the same session.
///
/// Every mutation happens under one lock, so a change is never observed
/// half-applied.
#[derive(Clone)]
pub struct SyncSession {
    inner: Arc<Mutex<SessionState>>,
}

impl SyncSession {
    pub fn new(surface: impl ViewSurface + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                client: ClientState::Unchanged,
                drives: Vec::new(),
                renderer: DriveListRenderer::new(surface),
                selected: None,
                panel: Panel::Drives,
                last_change: None,
            })),
        }
    }

    /// Build the drive list from the first full snapshot. The slot count is
    /// fixed from here on.
    pub async fn bootstrap(&self, drives: Vec<DriveSlot>) -> Result<(), MirrorError> {
        let mut state = self.inner.lock().await;
        state.renderer.bootstrap(&drives)?;
        info!(slots = drives.len(), "Drive list ready");
        state.drives = drives;
        state.last_change = Some(Utc::now());
        Ok(())
    }

    pub async fn is_bootstrapped(&self) -> bool {
        self.inner.lock().await.renderer.is_bootstrapped()
    }

    /// Apply one `/watch` reply: client first, then drives. Absent parts are
    /// left alone.
    pub async fn apply_change(&self, change: WatchChange) -> ChangeReport {
        let mut state = self.inner.lock().await;
        let client_changed = apply_client(&mut state, change.client);

        let drives = change.drives.map(|snapshot| {
            let report = state.renderer.apply_snapshot(&snapshot);
            for (ix, entry) in snapshot.into_iter().enumerate() {
                match (entry, state.drives.get_mut(ix)) {
                    (Some(drive), Some(current)) => *current = drive,
                    (_, None) => break,
                    (None, Some(_)) => {}
                }
            }
            report
        });

        if client_changed || drives.is_some() {
            state.last_change = Some(Utc::now());
        }
        debug!(client_changed, drives = ?drives, "Applied change");

        ChangeReport {
            client_changed,
            drives,
        }
    }

    pub async fn apply_client_state(&self, client: ClientState) -> bool {
        let mut state = self.inner.lock().await;
        apply_client(&mut state, client)
    }

    pub async fn slot_count(&self) -> usize {
        self.inner.lock().await.drives.len()
    }

    pub async fn validate_slot(&self, slot: usize) -> Result<(), MirrorError> {
        let state = self.inner.lock().await;
        if !state.renderer.is_bootstrapped() {
            return Err(MirrorError::NotBootstrapped);
        }
        let count = state.drives.len();
        if slot == 0 || slot > count {
            return Err(MirrorError::InvalidSlot { slot, count });
        }
        Ok(())
    }

    pub async fn drives(&self) -> Vec<DriveSlot> {
        self.inner.lock().await.drives.clone()
    }

    pub async fn drive(&self, slot: usize) -> Option<DriveSlot> {
        let state = self.inner.lock().await;
        state.drives.get(slot.checked_sub(1)?).cloned()
    }

    pub async fn client(&self) -> ClientState {
        self.inner.lock().await.client.clone()
    }

    pub async fn last_change(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().await.last_change
    }

    /// Show a drive's file listing and make it the target of save/unload.
    pub async fn select_file_list(&self, slot: usize, listing: &str) {
        let mut state = self.inner.lock().await;
        state.renderer.show_file_list(slot, listing);
        state.selected = Some(slot);
    }

    pub async fn selected(&self) -> Option<usize> {
        self.inner.lock().await.selected
    }

    pub async fn show_panel(&self, panel: Panel) {
        let mut state = self.inner.lock().await;
        state.renderer.show_panel(panel);
        state.panel = panel;
    }

    pub async fn panel(&self) -> Panel {
        self.inner.lock().await.panel
    }
}

fn apply_client(state: &mut SessionState, client: ClientState) -> bool {
    if client.is_unchanged() {
        return false;
    }
    let written = state.renderer.apply_client_state(&client);
    state.client = client;
    written
}
