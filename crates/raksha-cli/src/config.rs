//! Environment configuration for the CLI host.

use std::env;
use std::path::PathBuf;

/// Settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection URL.
    pub database_url: String,
    /// Directory evidence recordings are written to.
    pub recordings_dir: PathBuf,
    pub shake_to_sos: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let db_path = env::var("RAKSHA_DB_PATH").unwrap_or_else(|_| "./data/raksha.db".to_string());
        let recordings_dir = env::var("RAKSHA_RECORDINGS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/recordings"));
        let shake_to_sos = env::var("RAKSHA_SHAKE_TO_SOS")
            .map(|val| parse_flag(&val))
            .unwrap_or(true);

        Self {
            database_url: sqlite_url_from_path(&db_path),
            recordings_dir,
            shake_to_sos,
        }
    }
}

fn parse_flag(val: &str) -> bool {
    !matches!(val.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off")
}

fn sqlite_url_from_path(path: &str) -> String {
    if path.starts_with("sqlite:") {
        path.to_string()
    } else {
        format!("sqlite:{}?mode=rwc", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_url_from_path() {
        assert_eq!(
            sqlite_url_from_path("./data/raksha.db"),
            "sqlite:./data/raksha.db?mode=rwc"
        );
        assert_eq!(sqlite_url_from_path("sqlite::memory:"), "sqlite::memory:");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(" No "));
        assert!(!parse_flag("off"));
    }
}
