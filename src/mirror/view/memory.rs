use std::sync::{Arc, Mutex, MutexGuard};

use super::{Panel, RowSpec, ViewSurface};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowNodes {
    pub slot: usize,
    pub button_label: String,
    pub accept: String,
    pub icon: &'static str,
    pub label: String,
    pub enabled: bool,
}

/// Everything currently on the page, plus a count of node writes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SurfaceState {
    pub rows: Vec<RowNodes>,
    pub client_icon: Option<&'static str>,
    pub client_label: String,
    pub panel: Panel,
    pub file_list: String,
    pub drive_actions: Option<usize>,
    pub writes: u64,
}

impl SurfaceState {
    pub fn row(&self, slot: usize) -> Option<&RowNodes> {
        self.rows.get(slot.checked_sub(1)?)
    }

    fn row_mut(&mut self, slot: usize) -> Option<&mut RowNodes> {
        self.rows.get_mut(slot.checked_sub(1)?)
    }
}

/// In-memory [`ViewSurface`]. Clones share the same page.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SurfaceState {
        self.lock().clone()
    }

    pub fn writes(&self) -> u64 {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ViewSurface for MemorySurface {
    fn add_row(&mut self, row: RowSpec) {
        let mut state = self.lock();
        state.rows.push(RowNodes {
            slot: row.slot,
            button_label: row.slot.to_string(),
            accept: row.accept,
            icon: row.icon,
            label: row.label,
            enabled: row.enabled,
        });
        state.writes += 1;
    }

    fn set_slot_icon(&mut self, slot: usize, icon: &'static str) {
        let mut state = self.lock();
        if let Some(row) = state.row_mut(slot) {
            row.icon = icon;
            state.writes += 1;
        }
    }

    fn set_slot_label(&mut self, slot: usize, label: &str) {
        let mut state = self.lock();
        if let Some(row) = state.row_mut(slot) {
            row.label = label.to_string();
            state.writes += 1;
        }
    }

    fn set_slot_enabled(&mut self, slot: usize, enabled: bool) {
        let mut state = self.lock();
        if let Some(row) = state.row_mut(slot) {
            row.enabled = enabled;
            state.writes += 1;
        }
    }

    fn set_client(&mut self, icon: &'static str, label: &str) {
        let mut state = self.lock();
        state.client_icon = Some(icon);
        state.client_label = label.to_string();
        state.writes += 1;
    }

    fn show_panel(&mut self, panel: Panel) {
        let mut state = self.lock();
        state.panel = panel;
        state.writes += 1;
    }

    fn set_file_list(&mut self, text: &str) {
        let mut state = self.lock();
        state.file_list = text.to_string();
        state.writes += 1;
    }

    fn set_drive_actions(&mut self, target: Option<usize>) {
        let mut state = self.lock();
        state.drive_actions = target;
        state.writes += 1;
    }
}
