//! Filesystem locations for configuration and trace output.
//!
//! Locations follow the XDG base directory convention: `$XDG_CONFIG_HOME`
//! and `$XDG_DATA_HOME` when set, otherwise `~/.config` and `~/.local/share`.
//! Every directory carries a `storefront` suffix.

use std::ffi::OsString;
use std::path::PathBuf;

const APP_DIR: &str = "storefront";

/// Name of the configuration file inside [`config_dir`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Returns the configuration directory, or `None` when neither
/// `XDG_CONFIG_HOME` nor `HOME` is set.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    resolve_dir(std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"), ".config")
}

/// Returns the data directory used for trace files.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    resolve_dir(std::env::var_os("XDG_DATA_HOME"), std::env::var_os("HOME"), ".local/share")
}

/// Default configuration file path, `<config_dir>/config.toml`.
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Picks the XDG directory when it is set and absolute, else
/// `$HOME/<home_relative>`.
fn resolve_dir(xdg: Option<OsString>, home: Option<OsString>, home_relative: &str) -> Option<PathBuf> {
    let base = xdg
        .map(PathBuf::from)
        .filter(|path| path.is_absolute())
        .or_else(|| home.map(|home| PathBuf::from(home).join(home_relative)))?;
    Some(base.join(APP_DIR))
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, and all paths when `HOME` is unset, are
/// returned unchanged.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, std::env::var_os("HOME"))
}

fn expand_tilde_with(path: &str, home: Option<OsString>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };
    if path == "~" {
        PathBuf::from(home)
    } else if let Some(rest) = path.strip_prefix("~/") {
        PathBuf::from(home).join(rest)
    } else {
        PathBuf::from(path)
    }
}
