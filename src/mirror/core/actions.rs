use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::mirror::api::{
    drive_list_path, drive_path, drive_unload_path, ResyncQuery, UnloadQuery, UploadQuery,
    RESYNC_PATH,
};
use crate::mirror::helpers::SAVE_NOTICE;
use crate::mirror::models::ClientKind;
use crate::mirror::session::SyncSession;
use crate::mirror::view::Panel;
use crate::types::MirrorError;

use super::http::{ApiRequest, Transport};

pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Extra load flags. `repair` is always requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Replace a cartridge even if it has unsaved changes.
    pub force: bool,
    /// Cartridge name for snapshot formats.
    pub name: Option<String>,
}

/// Returned by [`ActionClient::save`], which never reaches the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveNotice {
    pub slot: usize,
    pub message: &'static str,
}

/// One-shot mutating requests. Nothing is retried and no drive record is
/// touched locally; the next sync tick shows whether a change took effect.
#[derive(Clone)]
pub struct ActionClient {
    transport: Arc<dyn Transport>,
    session: SyncSession,
    timeout: Duration,
}

impl ActionClient {
    pub fn new(transport: Arc<dyn Transport>, session: SyncSession) -> Self {
        Self {
            transport,
            session,
            timeout: DEFAULT_ACTION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn upload(
        &self,
        slot: usize,
        format: &str,
        image: Vec<u8>,
    ) -> Result<Value, MirrorError> {
        self.upload_with(slot, format, image, &UploadOptions::default())
            .await
    }

    /// Load an image into a drive. The reply is JSON when the server sends
    /// JSON, otherwise its text wrapped as a string.
    pub async fn upload_with(
        &self,
        slot: usize,
        format: &str,
        image: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<Value, MirrorError> {
        self.session.validate_slot(slot).await?;

        let path = drive_path(slot);
        let size = image.len();
        let request = ApiRequest::put(path.as_str())
            .query(&UploadQuery {
                format,
                repair: true,
                force: options.force,
                name: options.name.as_deref(),
            })
            .body(image)
            .timeout(self.timeout);

        let response = self.transport.send(request).await?.into_success(&path)?;
        let result = response
            .json::<Value>()
            .unwrap_or_else(|_| Value::String(response.text().trim().to_string()));
        info!(slot, format, size, result = %result, "Uploaded cartridge");
        Ok(result)
    }

    /// Unload a drive, then switch back to the drive overview once the
    /// request has completed, whether or not it succeeded.
    pub async fn unload(&self, slot: usize, force: bool) -> Result<String, MirrorError> {
        self.session.validate_slot(slot).await?;

        let path = drive_unload_path(slot);
        let request = ApiRequest::put(path.as_str())
            .query(&UnloadQuery { force })
            .timeout(self.timeout);

        let result = match self.transport.send(request).await {
            Ok(response) => response
                .into_success(&path)
                .map(|response| response.text().trim().to_string()),
            Err(err) => Err(err),
        };
        self.session.show_panel(Panel::Drives).await;

        match &result {
            Ok(message) => info!(slot, message = %message, "Unload requested"),
            Err(err) => warn!(slot, error = %err, "Unload failed"),
        }
        result
    }

    pub async fn reset(&self) -> Result<String, MirrorError> {
        self.resync(None, true).await
    }

    /// Resync with the adapter, optionally forcing a client type.
    pub async fn resync(
        &self,
        client: Option<ClientKind>,
        reset: bool,
    ) -> Result<String, MirrorError> {
        let request = ApiRequest::put(RESYNC_PATH)
            .query(&ResyncQuery {
                client: client.map(ClientKind::as_query),
                reset,
            })
            .timeout(self.timeout);

        let response = self
            .transport
            .send(request)
            .await?
            .into_success(RESYNC_PATH)?;
        let message = response.text().trim().to_string();
        info!(reset, message = %message, "Resync requested");
        Ok(message)
    }

    /// Plain text file listing of a drive's cartridge, trimmed.
    pub async fn list_files(&self, slot: usize) -> Result<String, MirrorError> {
        self.session.validate_slot(slot).await?;

        let path = drive_list_path(slot);
        let request = ApiRequest::get(path.as_str()).timeout(self.timeout);
        let response = self.transport.send(request).await?.into_success(&path)?;
        Ok(response.text().trim().to_string())
    }

    pub fn save(&self, slot: usize) -> SaveNotice {
        SaveNotice {
            slot,
            message: SAVE_NOTICE,
        }
    }
}
