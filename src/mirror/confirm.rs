use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, info};

/// A yes/no prompt shown to the user.
#[async_trait]
pub trait ConfirmDialog: Send + Sync {
    /// Resolves to `true` on the affirmative action and `false` on cancel or
    /// dismissal. The dialog is closed when this returns.
    async fn ask(&self, title: &str, message: &str) -> bool;
}

/// Puts destructive actions behind an explicit confirmation. Only one prompt
/// is open at a time; concurrent callers wait their turn.
#[derive(Clone)]
pub struct ConfirmationGate {
    dialog: Arc<dyn ConfirmDialog>,
    open: Arc<Mutex<()>>,
}

impl ConfirmationGate {
    pub fn new(dialog: Arc<dyn ConfirmDialog>) -> Self {
        Self {
            dialog,
            open: Arc::new(Mutex::new(())),
        }
    }

    pub async fn confirm(&self, title: &str, message: &str) -> bool {
        let _open = self.open.lock().await;
        debug!(title, "Asking for confirmation");
        let confirmed = self.dialog.ask(title, message).await;
        info!(title, confirmed, "Confirmation answered");
        confirmed
    }
}

/// A prompt waiting for an answer from whoever renders dialogs.
/// Dropping it without answering counts as dismissal.
#[derive(Debug)]
pub struct DialogRequest {
    pub title: String,
    pub message: String,
    responder: oneshot::Sender<bool>,
}

impl DialogRequest {
    pub fn answer(self, confirmed: bool) {
        let _ = self.responder.send(confirmed);
    }

    pub fn accept(self) {
        self.answer(true);
    }

    pub fn decline(self) {
        self.answer(false);
    }
}

/// [`ConfirmDialog`] that hands prompts to a UI over a channel.
#[derive(Clone)]
pub struct ChannelDialog {
    requests: mpsc::Sender<DialogRequest>,
}

impl ChannelDialog {
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<DialogRequest>) {
        let (requests, rx) = mpsc::channel(buffer.max(1));
        (Self { requests }, rx)
    }
}

#[async_trait]
impl ConfirmDialog for ChannelDialog {
    async fn ask(&self, title: &str, message: &str) -> bool {
        let (responder, answer) = oneshot::channel();
        let request = DialogRequest {
            title: title.to_string(),
            message: message.to_string(),
            responder,
        };
        if self.requests.send(request).await.is_err() {
            return false;
        }
        answer.await.unwrap_or(false)
    }
}
