//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where configuration is read from and where trace files are
//! written. Nothing here touches the catalog service.

pub mod paths;

pub use paths::{config_dir, data_dir, default_config_file, expand_tilde, CONFIG_FILE_NAME};
