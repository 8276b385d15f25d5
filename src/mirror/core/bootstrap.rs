use std::time::Duration;

use tracing::warn;

use crate::mirror::api::{StatusResponse, LIST_PATH, STATUS_PATH};
use crate::mirror::models::DriveSlot;
use crate::mirror::session::SyncSession;
use crate::types::MirrorError;

use super::http::{ApiRequest, Transport};

/// Fetch the drive list once and build the page from it, then show the
/// current client. A failing `/status` is logged and otherwise ignored; the
/// next change from the watch loop fills it in.
pub async fn bootstrap(
    transport: &dyn Transport,
    session: &SyncSession,
    timeout: Duration,
) -> Result<usize, MirrorError> {
    let request = ApiRequest::get(LIST_PATH).json().timeout(timeout);
    let drives: Vec<DriveSlot> = transport
        .send(request)
        .await?
        .into_success(LIST_PATH)?
        .json()?;
    let count = drives.len();
    session.bootstrap(drives).await?;

    match fetch_status(transport, timeout).await {
        Ok(status) => {
            session.apply_client_state(status.client).await;
        }
        Err(err) => warn!(error = %err, "Failed to fetch client status"),
    }

    Ok(count)
}

async fn fetch_status(
    transport: &dyn Transport,
    timeout: Duration,
) -> Result<StatusResponse, MirrorError> {
    let request = ApiRequest::get(STATUS_PATH).json().timeout(timeout);
    transport
        .send(request)
        .await?
        .into_success(STATUS_PATH)?
        .json()
}
