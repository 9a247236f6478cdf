mod config;
pub mod database;

pub use config::{ClockConfig, Config, HistoryConfig, TimerConfig};
pub use database::Database;

use std::path::PathBuf;

/// Returns `~/.config/deskclock[-dev]/` based on DESKCLOCK_ENV.
///
/// Set DESKCLOCK_ENV=dev to use the development data directory, or
/// DESKCLOCK_DATA_DIR to point at an explicit directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("DESKCLOCK_DATA_DIR") {
        Some(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("DESKCLOCK_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("deskclock-dev")
            } else {
                base_dir.join("deskclock")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
