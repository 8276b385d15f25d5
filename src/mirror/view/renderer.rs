use tracing::{debug, warn};

use crate::mirror::helpers::accept_list;
use crate::mirror::models::{ClientState, DriveSlot, StatusTag};
use crate::types::MirrorError;

use super::{Panel, RowSpec, ViewSurface};

/// Counts from applying one drive snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnapshotReport {
    /// Slots present in the snapshot and applied.
    pub updated: usize,
    /// Slots marked unchanged (`null`) in the snapshot.
    pub unchanged: usize,
    /// Snapshot entries beyond the bootstrapped slot count.
    pub ignored: usize,
    /// Bootstrapped slots the snapshot did not cover.
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RenderedRow {
    icon: StatusTag,
    label: String,
    enabled: bool,
}

/// Owns the drive list on a [`ViewSurface`]. Rows are created once by
/// [`bootstrap`](Self::bootstrap); later snapshots only rewrite the icon,
/// label and button state of existing rows, and only when they differ.
pub struct DriveListRenderer {
    surface: Box<dyn ViewSurface>,
    rows: Vec<RenderedRow>,
    bootstrapped: bool,
}

impl DriveListRenderer {
    pub fn new(surface: impl ViewSurface + 'static) -> Self {
        Self {
            surface: Box::new(surface),
            rows: Vec::new(),
            bootstrapped: false,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    pub fn bootstrap(&mut self, drives: &[DriveSlot]) -> Result<(), MirrorError> {
        if self.bootstrapped {
            return Err(MirrorError::AlreadyBootstrapped);
        }

        let accept = accept_list();
        for (ix, drive) in drives.iter().enumerate() {
            let row = RenderedRow {
                icon: drive.effective_status(),
                label: drive.display_name().unwrap_or_default().to_string(),
                enabled: drive.button_enabled(),
            };
            self.surface.add_row(RowSpec {
                slot: ix + 1,
                accept: accept.clone(),
                icon: row.icon.icon(),
                label: row.label.clone(),
                enabled: row.enabled,
            });
            self.rows.push(row);
        }

        self.surface.set_drive_actions(None);
        self.bootstrapped = true;
        debug!(slots = self.rows.len(), "Built drive list");
        Ok(())
    }

    /// Apply a drive snapshot. Entries are matched to slots by position;
    /// extra entries are ignored and uncovered slots keep their state.
    pub fn apply_snapshot(&mut self, drives: &[Option<DriveSlot>]) -> SnapshotReport {
        let mut report = SnapshotReport::default();

        for (ix, entry) in drives.iter().enumerate() {
            if ix >= self.rows.len() {
                report.ignored = drives.len() - self.rows.len();
                break;
            }
            match entry {
                Some(drive) => {
                    self.apply_slot(ix + 1, drive);
                    report.updated += 1;
                }
                None => report.unchanged += 1,
            }
        }
        report.missing = self.rows.len().saturating_sub(drives.len());

        if report.ignored > 0 || report.missing > 0 {
            warn!(
                expected = self.rows.len(),
                received = drives.len(),
                "Drive snapshot length differs from drive list"
            );
        }
        report
    }

    fn apply_slot(&mut self, slot: usize, drive: &DriveSlot) {
        let Some(row) = self.rows.get_mut(slot - 1) else {
            return;
        };

        let icon = drive.effective_status();
        if row.icon != icon {
            row.icon = icon;
            self.surface.set_slot_icon(slot, icon.icon());
        }

        if let Some(label) = drive.display_name() {
            if row.label != label {
                row.label = label.to_string();
                self.surface.set_slot_label(slot, label);
            }
        }

        let enabled = drive.button_enabled();
        if row.enabled != enabled {
            row.enabled = enabled;
            self.surface.set_slot_enabled(slot, enabled);
        }
    }

    /// Returns whether the client indicator was written.
    pub fn apply_client_state(&mut self, client: &ClientState) -> bool {
        match client.indicator() {
            Some((tag, label)) => {
                self.surface.set_client(tag.icon(), label);
                true
            }
            None => false,
        }
    }

    pub fn show_panel(&mut self, panel: Panel) {
        self.surface.show_panel(panel);
    }

    pub fn show_file_list(&mut self, slot: usize, listing: &str) {
        self.surface
            .set_file_list(&format!("drive {slot}: {}", listing.trim()));
        self.surface.set_drive_actions(Some(slot));
    }
}
