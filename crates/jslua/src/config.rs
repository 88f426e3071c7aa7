//! `jslua.toml` loading

use jslua_codegen::EmitOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "jslua.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub emit: EmitOptions,
}

impl Config {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Load `explicit` if given, else `jslua.toml` next to `input`, else
    /// defaults.
    pub fn locate(explicit: Option<&Path>, input: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let dir = if input.is_dir() {
            Some(input)
        } else {
            input.parent()
        };
        match dir.map(|d| d.join(CONFIG_FILE)) {
            Some(candidate) if candidate.is_file() => {
                log::debug!("using config {}", candidate.display());
                Self::load(&candidate)
            }
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jslua_codegen::Newline;

    #[test]
    fn test_parse_emit_table() {
        let config = Config::parse(
            "[emit]\nref_guard = true\nnewline = \"lf\"\n",
            Path::new(CONFIG_FILE),
        )
        .unwrap();
        assert!(config.emit.ref_guard);
        assert_eq!(config.emit.newline, Newline::Lf);
        assert!(config.emit.markers);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("", Path::new(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_file() {
        let err = Config::parse("[emit]\nnewline = \"cr\"\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("malformed bad.toml"));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::locate(Some(Path::new("/nonexistent/jslua.toml")), Path::new("a.js"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_locate_without_config_file() {
        let config = Config::locate(None, Path::new("/nonexistent/dir/app.js")).unwrap();
        assert_eq!(config, Config::default());
    }
}
