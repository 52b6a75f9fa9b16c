//! Parsing and validation of `netfir.toml` project configuration files.
//!
//! This crate reads the configuration file into a strongly-typed
//! [`NetfirConfig`] and merges it with command-line overrides into
//! [`ResolvedSettings`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{find_config, load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_settings, Overrides, ResolvedSettings};
pub use types::*;
