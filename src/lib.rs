//! Client that mirrors the drive slots of a microdrive emulator server.
//!
//! The drive list is built once from `/list`, then kept current by a
//! long-poll on `/watch`. Actions (load, unload, resync, list files) are
//! one-shot requests whose effects show up through the next change.

pub mod config;
pub mod console;
pub mod mirror;
pub mod types;

#[cfg(test)]
mod tests;
