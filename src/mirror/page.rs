use serde_json::Value;
use tracing::{info, warn};

use super::confirm::ConfirmationGate;
use super::core::{ActionClient, SaveNotice};
use super::helpers::{upload_format, UNLOAD_QUESTION, UNLOAD_TITLE};
use super::session::SyncSession;
use super::view::Panel;
use crate::types::MirrorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnloadOutcome {
    Declined,
    Unloaded { slot: usize, message: String },
}

/// User-facing drive operations: what the buttons of the page do.
#[derive(Clone)]
pub struct DrivePage {
    session: SyncSession,
    actions: ActionClient,
    gate: ConfirmationGate,
}

impl DrivePage {
    pub fn new(session: SyncSession, actions: ActionClient, gate: ConfirmationGate) -> Self {
        Self {
            session,
            actions,
            gate,
        }
    }

    pub fn session(&self) -> &SyncSession {
        &self.session
    }

    pub fn actions(&self) -> &ActionClient {
        &self.actions
    }

    /// Open the file panel and fill it with a drive's listing. The drive
    /// becomes the target of save and unload once its listing arrived.
    pub async fn show_files(&self, slot: usize) -> Result<(), MirrorError> {
        self.session.validate_slot(slot).await?;
        self.session.show_panel(Panel::Files).await;

        let listing = self.actions.list_files(slot).await.map_err(|err| {
            warn!(slot, error = %err, "Failed to list drive");
            err
        })?;
        self.session.select_file_list(slot, &listing).await;
        Ok(())
    }

    /// A file was picked for a slot: upload it, declaring its extension as format.
    /// Busy and hardware drives refuse, as their button is disabled.
    pub async fn choose_file(
        &self,
        slot: usize,
        file_name: &str,
        image: Vec<u8>,
    ) -> Result<Value, MirrorError> {
        self.session.validate_slot(slot).await?;
        if let Some(drive) = self.session.drive(slot).await {
            if !drive.button_enabled() {
                warn!(slot, status = ?drive.status, "Drive does not take cartridges right now");
                return Err(MirrorError::DriveUnavailable { slot });
            }
        }

        let format = upload_format(file_name)?;
        self.actions.upload(slot, format, image).await.map_err(|err| {
            warn!(slot, file = file_name, error = %err, "Upload failed");
            err
        })
    }

    /// Unload the selected drive after the user confirmed it.
    pub async fn request_unload(&self) -> Result<UnloadOutcome, MirrorError> {
        let slot = self
            .session
            .selected()
            .await
            .ok_or(MirrorError::NoDriveSelected)?;

        if !self.gate.confirm(UNLOAD_TITLE, UNLOAD_QUESTION).await {
            info!(slot, "Unload declined");
            return Ok(UnloadOutcome::Declined);
        }

        let message = self.actions.unload(slot, true).await?;
        Ok(UnloadOutcome::Unloaded { slot, message })
    }

    pub async fn request_save(&self) -> Result<SaveNotice, MirrorError> {
        let slot = self
            .session
            .selected()
            .await
            .ok_or(MirrorError::NoDriveSelected)?;
        Ok(self.actions.save(slot))
    }

    pub async fn reset_client(&self) -> Result<String, MirrorError> {
        self.actions.reset().await.map_err(|err| {
            warn!(error = %err, "Client reset failed");
            err
        })
    }
}
