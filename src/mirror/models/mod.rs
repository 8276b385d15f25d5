mod client;
mod drive;
mod status;

pub use client::{ClientKind, ClientState, DISCONNECTED_LABEL, UNKNOWN_CLIENT};
pub use drive::{DriveSlot, DriveStatus, HARDWARE_PLACEHOLDER, UNFORMATTED_PLACEHOLDER};
pub use status::{icon_for, StatusTag};
