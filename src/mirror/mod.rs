mod api;
mod confirm;
mod core;
mod helpers;
mod models;
mod page;
mod session;
mod view;

pub use api::{StatusResponse, WatchChange};
pub use confirm::{ChannelDialog, ConfirmDialog, ConfirmationGate, DialogRequest};
pub use self::core::{
    bootstrap, ActionClient, ApiRequest, ApiResponse, HttpTransport, LoopState, SaveNotice,
    SyncHandle, SyncLoop, TickOutcome, Transport, UploadOptions, DEFAULT_ACTION_TIMEOUT,
    DEFAULT_BACKOFF,
};
pub use helpers::{accept_list, format_relative_time, upload_format, ACCEPTED_FORMATS, SAVE_NOTICE};
pub use models::{
    icon_for, ClientKind, ClientState, DriveSlot, DriveStatus, StatusTag, DISCONNECTED_LABEL,
    HARDWARE_PLACEHOLDER, UNFORMATTED_PLACEHOLDER, UNKNOWN_CLIENT,
};
pub use page::{DrivePage, UnloadOutcome};
pub use session::{ChangeReport, SyncSession};
pub use view::{
    DriveListRenderer, MemorySurface, Panel, RowNodes, RowSpec, SnapshotReport, SurfaceState,
    ViewSurface,
};
