//! `~/.megadbgrc`: user preferences not tied to any one debugging session.

use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = include_str!("../doc/megadbgrc.toml");

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    source_context_lines: u64,
    history_file: Option<String>,
}

impl Default for RawConfig {
    fn default() -> Self {
        toml::de::from_str(DEFAULT_CONFIG).expect("bundled default config must parse")
    }
}

/// Resolved configuration, with `~` expanded in `history_file`.
#[derive(Debug, Clone)]
pub struct Config {
    pub source_context_lines: u64,
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            source_context_lines: raw.source_context_lines,
            history_file: raw.history_file.map(PathBuf::from),
        }
    }
}

impl Config {
    const DEFAULT_PATH: &'static str = ".megadbgrc";

    /// Load `~/.megadbgrc`, falling back to defaults if it is missing or
    /// fails to parse (a malformed config should not stop the debugger from
    /// starting).
    pub fn load() -> Self {
        let Some(home) = home::home_dir() else {
            return Self::default();
        };
        let path = home.join(Self::DEFAULT_PATH);
        let Ok(data) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match toml::de::from_str::<RawConfig>(&data) {
            Ok(raw) => raw.into(),
            Err(err) => {
                log::warn!("ignoring malformed {}: {err}", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses_and_has_no_history_file() {
        let config = Config::default();
        assert_eq!(config.source_context_lines, 2);
        assert!(config.history_file.is_none());
    }
}
