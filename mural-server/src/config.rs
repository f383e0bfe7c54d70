//! Environment-driven server configuration.

use std::path::PathBuf;

/// Default port for the mural server.
const DEFAULT_PORT: u16 = 6872; // "MURA" on a phone keypad

/// Default canvas snapshot file, relative to the working directory.
const DEFAULT_SNAPSHOT_PATH: &str = "Canvas.png";

/// Blank canvas width when no snapshot exists yet.
const DEFAULT_CANVAS_WIDTH: u32 = 800;

/// Blank canvas height when no snapshot exists yet.
const DEFAULT_CANVAS_HEIGHT: u32 = 450;

/// Runtime configuration collected from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port to bind (`MURAL_PORT`).
    pub port: u16,
    /// Canvas snapshot file (`MURAL_SNAPSHOT_PATH`).
    pub snapshot_path: PathBuf,
    /// Directory holding `Brush<N>.png` stamps (`MURAL_BRUSH_DIR`);
    /// procedural stamps are built when unset.
    pub brush_dir: Option<PathBuf>,
    /// Blank canvas width (`MURAL_CANVAS_WIDTH`).
    pub canvas_width: u32,
    /// Blank canvas height (`MURAL_CANVAS_HEIGHT`).
    pub canvas_height: u32,
    /// Extra allowed CORS origins (`CORS_ALLOWED_ORIGINS`, comma
    /// separated); localhost origins are always allowed.
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Collect configuration from the environment, falling back to
    /// defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            port: env_parsed("MURAL_PORT", DEFAULT_PORT),
            snapshot_path: std::env::var("MURAL_SNAPSHOT_PATH")
                .map_or_else(|_| PathBuf::from(DEFAULT_SNAPSHOT_PATH), PathBuf::from),
            brush_dir: std::env::var("MURAL_BRUSH_DIR").ok().map(PathBuf::from),
            canvas_width: env_parsed("MURAL_CANVAS_WIDTH", DEFAULT_CANVAS_WIDTH),
            canvas_height: env_parsed("MURAL_CANVAS_HEIGHT", DEFAULT_CANVAS_HEIGHT),
            cors_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .map(|value| parse_origins(&value))
                .unwrap_or_default(),
        }
    }
}

/// Parse an environment variable, falling back on absence or garbage.
fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// Split a comma-separated origin list, dropping empty entries.
fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_parsed_falls_back_for_unset_keys() {
        assert_eq!(env_parsed("MURAL_TEST_KEY_THAT_IS_NEVER_SET", 42u16), 42);
    }

    #[test]
    fn test_parse_origins_trims_and_drops_empties() {
        assert_eq!(
            parse_origins("https://a.example, https://b.example ,,"),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_defaults_without_environment() {
        // The MURAL_* variables are never set in the test environment.
        let config = ServerConfig::from_env();
        assert_eq!(config.port, 6872);
        assert_eq!(config.snapshot_path, PathBuf::from("Canvas.png"));
        assert_eq!(config.canvas_width, 800);
        assert_eq!(config.canvas_height, 450);
        assert!(config.brush_dir.is_none());
    }
}
