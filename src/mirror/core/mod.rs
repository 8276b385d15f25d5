mod actions;
mod bootstrap;
mod http;
mod sync_loop;

pub use actions::{ActionClient, SaveNotice, UploadOptions, DEFAULT_ACTION_TIMEOUT};
pub use bootstrap::bootstrap;
pub use http::{ApiRequest, ApiResponse, HttpTransport, Transport};
pub use sync_loop::{LoopState, SyncHandle, SyncLoop, TickOutcome, DEFAULT_BACKOFF};
