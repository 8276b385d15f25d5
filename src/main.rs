use std::sync::Arc;
use std::time::Duration;

use drive_mirror::config::Config;
use drive_mirror::console::{Console, ConsoleDialog, ConsoleInput};
use drive_mirror::mirror::{
    bootstrap, ActionClient, ConfirmationGate, DrivePage, HttpTransport, MemorySurface,
    SyncLoop, SyncSession, Transport,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load().await;
    let transport: Arc<dyn Transport> = match HttpTransport::from_config(&config) {
        Ok(transport) => {
            info!(server = transport.base_url(), "Using drive server");
            Arc::new(transport)
        }
        Err(err) => {
            error!(error = %err, "Failed to create HTTP client");
            std::process::exit(1);
        }
    };

    let surface = MemorySurface::new();
    let session = SyncSession::new(surface.clone());

    tokio::select! {
        _ = connect(transport.as_ref(), &session, config.action_timeout(), config.backoff()) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted before the drive list was loaded");
            return;
        }
    }

    let handle = SyncLoop::from_config(transport.clone(), session.clone(), &config).spawn();

    let input = ConsoleInput::stdin();
    let gate = ConfirmationGate::new(Arc::new(ConsoleDialog::new(input.clone())));
    let actions =
        ActionClient::new(transport, session.clone()).with_timeout(config.action_timeout());
    let console = Console::new(DrivePage::new(session, actions, gate), surface, input);

    tokio::select! {
        result = console.run() => {
            if let Err(err) = result {
                error!(error = %err, "Console failed");
            }
        }
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }

    handle.stop().await;
}

/// Retry the initial drive list fetch until the server answers.
async fn connect(
    transport: &dyn Transport,
    session: &SyncSession,
    timeout: Duration,
    backoff: Duration,
) {
    loop {
        match bootstrap(transport, session, timeout).await {
            Ok(slots) => {
                info!(slots, "Connected to drive server");
                return;
            }
            Err(err) => {
                warn!(
                    error = %err,
                    retry_ms = backoff.as_millis() as u64,
                    "Failed to load drive list"
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }
}
