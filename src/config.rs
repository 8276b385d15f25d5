mod loader;
mod paths;
mod types;

pub use types::Config;

pub const ADDRESS_ENV: &str = "DRIVE_MIRROR_ADDRESS";
pub const CONFIG_PATH_ENV: &str = "DRIVE_MIRROR_CONFIG";
pub const DEFAULT_PORT: u16 = 8888;
