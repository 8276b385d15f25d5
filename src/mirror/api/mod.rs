mod queries;
mod types;

pub use queries::{ResyncQuery, UnloadQuery, UploadQuery, WatchQuery};
pub use types::{StatusResponse, WatchChange};

pub const LIST_PATH: &str = "/list";
pub const STATUS_PATH: &str = "/status";
pub const WATCH_PATH: &str = "/watch";
pub const RESYNC_PATH: &str = "/resync";

pub fn drive_path(slot: usize) -> String {
    format!("/drive/{slot}")
}

pub fn drive_list_path(slot: usize) -> String {
    format!("/drive/{slot}/list")
}

pub fn drive_unload_path(slot: usize) -> String {
    format!("/drive/{slot}/unload")
}
