//! Run log location and timestamp helpers.
use std::fs;
use std::path::PathBuf;

/// The run log, `stowy/stowy.log` under the user cache directory
/// (`$XDG_CACHE_HOME`, else `~/.cache` on Linux).
pub(super) fn log_file_path() -> Option<PathBuf> {
    let dir = dirs::cache_dir()?.join("stowy");
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join("stowy.log"))
}

/// Format the current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format the current UTC time as `HH:MM:SS`.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}
