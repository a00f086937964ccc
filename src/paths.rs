//! Path resolution for emoji-overlay
//!
//! Follows the XDG Base Directory Specification with env var overrides.
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `EMOJI_OVERLAY_CONFIG` | Picker config | `~/.config/emoji-overlay/picker.toml` |
//! | `EMOJI_OVERLAY_CATALOG` | Emoji catalog JSON | bundled catalog |

use std::path::PathBuf;

use tracing::info;

/// Get the XDG config directory for emoji-overlay
///
/// Priority: `XDG_CONFIG_HOME` > `~/.config`
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("emoji-overlay");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config/emoji-overlay");
    }

    // Last resort: current directory
    PathBuf::from(".")
}

/// Get the picker config path
///
/// Priority: `EMOJI_OVERLAY_CONFIG` env var > `config_dir()/picker.toml`
pub fn config_path() -> PathBuf {
    std::env::var("EMOJI_OVERLAY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| config_dir().join("picker.toml"))
}

/// Get the catalog override, if any
///
/// `EMOJI_OVERLAY_CATALOG` wins over the config file's `catalog_path`.
pub fn catalog_path() -> Option<PathBuf> {
    std::env::var("EMOJI_OVERLAY_CATALOG").ok().map(PathBuf::from)
}

/// Log resolved paths for discoverability
pub fn log_paths() {
    info!("config: {}", config_path().display());
    match catalog_path() {
        Some(path) => info!("catalog: {}", path.display()),
        None => info!("catalog: from config or bundled"),
    }
}
