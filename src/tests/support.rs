//! Scripted stand-ins for the drive server.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio::time::Instant;

use crate::mirror::{ApiRequest, ApiResponse, DriveSlot, MemorySurface, SyncSession, Transport};
use crate::types::MirrorError;

/// What the fake server does with the next request to a path.
#[derive(Debug, Clone)]
pub enum Step {
    Reply(StatusCode, String),
    Delayed(Duration, StatusCode, String),
    Refuse,
}

impl Step {
    pub fn ok(body: impl Into<String>) -> Self {
        Step::Reply(StatusCode::OK, body.into())
    }

    pub fn json(body: Value) -> Self {
        Step::Reply(StatusCode::OK, body.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: String,
    pub json: bool,
    pub body: Option<Vec<u8>>,
    pub timeout: Option<Duration>,
    pub at: Instant,
    /// Surface writes seen when the request went out.
    pub surface_writes: Option<u64>,
}

#[derive(Default)]
struct FakeState {
    scripts: HashMap<String, VecDeque<Step>>,
    requests: Vec<Recorded>,
}

/// [`Transport`] that answers from per-path scripts and records every
/// request. A request with nothing scripted never completes, like a
/// long-poll with no news.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
    surface: Option<MemorySurface>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_surface(mut self, surface: MemorySurface) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn script(&self, path: &str, step: Step) -> &Self {
        self.state
            .lock()
            .unwrap()
            .scripts
            .entry(path.to_string())
            .or_default()
            .push_back(step);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn uris(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.uri).collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.uri.split('?').next() == Some(path))
            .count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, MirrorError> {
        let step = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(Recorded {
                method: request.method.clone(),
                uri: request.uri(),
                json: request.json,
                body: request.body.clone(),
                timeout: request.timeout,
                at: Instant::now(),
                surface_writes: self.surface.as_ref().map(MemorySurface::writes),
            });
            state
                .scripts
                .get_mut(&request.path)
                .and_then(VecDeque::pop_front)
        };

        match step {
            Some(Step::Reply(status, body)) => Ok(ApiResponse::new(status, body)),
            Some(Step::Delayed(delay, status, body)) => {
                tokio::time::sleep(delay).await;
                Ok(ApiResponse::new(status, body))
            }
            Some(Step::Refuse) => Err(MirrorError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
            None => std::future::pending().await,
        }
    }
}

/// Session with a drive list built from JSON, rendering into the returned surface.
pub async fn bootstrapped_session(drives: Value) -> (MemorySurface, SyncSession) {
    let surface = MemorySurface::new();
    let session = SyncSession::new(surface.clone());
    let drives: Vec<DriveSlot> = serde_json::from_value(drives).unwrap();
    session.bootstrap(drives).await.unwrap();
    (surface, session)
}
