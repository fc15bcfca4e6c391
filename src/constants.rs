//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Application name
pub const APP_NAME: &str = "Shiptrack";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Row-store table holding shipments
pub const DEFAULT_TABLE: &str = "shipments";

/// Directory under $HOME holding the config file
pub const CONFIG_DIR_NAME: &str = ".shiptrack";

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Log file written to the working directory
pub const LOG_FILE_NAME: &str = "shiptrack.log";

/// Transport timeout for every remote call
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variable overrides
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_TABLE: &str = "SHIPTRACK_TABLE";
