//! Config module.
//! Provides configuration types, the default config path, and XML loading.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel, Options, default_workers};
pub use xml::{load_config, load_config_from_xml_path};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "MERGE_MOVE_CONFIG";
/// Default work queue capacity.
pub const DEFAULT_BUFFER: usize = 100_000;
/// How often the progress reporter redraws.
pub const DEFAULT_PROGRESS_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);
