use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::exit::{io_error, CliError, CliResult, USAGE};
use crate::logging::LogLevel;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "klvmeta.toml";

/// Output root when neither the command line nor the config names one.
pub const DEFAULT_OUTPUT_DIR: &str = "processed";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub general: GeneralConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    /// Mission name; artifacts go to `<output_dir>/<mission>`.
    pub mission: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    /// Append random per-frame ids. Default: true.
    pub frame_ids: Option<bool>,
    /// Also write a KML file of frame centers. Default: false.
    pub kml: Option<bool>,
}

impl Config {
    pub fn from_toml_str(input: &str) -> CliResult<Self> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        toml::from_str(input)
            .map_err(|err| CliError::new(USAGE, format!("invalid config TOML: {err}")))
    }

    /// Directory artifacts are written to, honoring an explicit override.
    pub fn output_dir(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(dir) = explicit {
            return dir.to_path_buf();
        }
        let root = self
            .general
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        match self.general.mission.as_deref() {
            Some(mission) if !mission.is_empty() => root.join(mission),
            _ => root,
        }
    }

    pub fn frame_ids(&self) -> bool {
        self.general.frame_ids.unwrap_or(true)
    }

    pub fn kml(&self) -> bool {
        self.general.kml.unwrap_or(false)
    }
}

/// Load the explicit config file, or `klvmeta.toml` if it exists.
pub fn load(explicit: Option<&Path>) -> CliResult<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                return Ok(Config::default());
            }
            default
        }
    };

    let text = std::fs::read_to_string(&path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
    Config::from_toml_str(&text).map_err(|err| {
        CliError::new(err.code, format!("{}: {}", path.display(), err.message))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let config = Config::from_toml_str(
            r#"
            [general]
            mission = "AC14"
            output_dir = "/data/processed"
            log_level = "debug"
            frame_ids = false
            kml = true
            "#,
        )
        .unwrap();

        assert_eq!(config.general.log_level, Some(LogLevel::Debug));
        assert!(!config.frame_ids());
        assert!(config.kml());
        assert_eq!(
            config.output_dir(None),
            PathBuf::from("/data/processed/AC14")
        );
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml_str("   \n").unwrap();
        assert!(config.frame_ids());
        assert!(!config.kml());
        assert_eq!(config.output_dir(None), PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn explicit_output_dir_wins() {
        let config = Config::from_toml_str("[general]\nmission = \"AC14\"\n").unwrap();
        assert_eq!(
            config.output_dir(Some(Path::new("out"))),
            PathBuf::from("out")
        );
        assert_eq!(config.output_dir(None), PathBuf::from("processed/AC14"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml_str("[general]\ninterval = 1\n").unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        assert!(Config::from_toml_str("[general]\nlog_level = \"loud\"\n").is_err());
    }

    #[test]
    fn missing_explicit_file_fails() {
        let err = load(Some(Path::new("/nonexistent/klvmeta.toml"))).unwrap_err();
        assert!(err.message.contains("/nonexistent/klvmeta.toml"));
    }
}
