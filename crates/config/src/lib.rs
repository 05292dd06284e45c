//! Layered configuration for the organizer.
//!
//! Values merge in increasing priority: built-in defaults, then
//! `shoebox.toml` in the platform config directory, then `SHOEBOX_*`
//! environment variables. CLI flags are applied on top by the binary.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use shoebox_storage::TransferMode;
use std::path::PathBuf;

/// Prefix for environment variable overrides (`SHOEBOX_MODE=copy`, ...).
pub const ENV_PREFIX: &str = "SHOEBOX_";
const CONFIG_FILE: &str = "shoebox.toml";
const JOURNAL_FILE: &str = "journal.db";

/// Resolved configuration for one run.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory containing the media files to organize.
    pub source: Option<PathBuf>,
    /// Directory receiving the year/month hierarchy.
    pub target: Option<PathBuf>,
    pub mode: TransferMode,
    /// Whether to descend into subdirectories of the source.
    pub recursive: bool,
    /// Journal database path; defaults to the platform data directory.
    pub journal: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            target: None,
            mode: TransferMode::default(),
            recursive: false,
            journal: None,
        }
    }
}

impl Config {
    /// Load configuration from the standard layers.
    ///
    /// A missing config file is fine (defaults apply); a malformed one is
    /// not.
    pub fn load() -> Result<Self> {
        let file = match Self::config_file() {
            Ok(file) => Some(file),
            // No home directory: plausible in containers. Defaults and
            // environment variables still work.
            Err(e) => {
                tracing::debug!(error = %e, "No config directory available; skipping config file");
                None
            },
        };
        Self::figment(file).extract().or_raise(|| ErrorKind::Invalid)
    }

    fn figment(file: Option<PathBuf>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Location of the config file in the platform config directory.
    pub fn config_file() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join(CONFIG_FILE))
    }

    /// The journal database path: the configured one, or the platform data
    /// directory default.
    pub fn journal_path(&self) -> Result<PathBuf> {
        match &self.journal {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(JOURNAL_FILE)),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "shoebox").ok_or_raise(|| ErrorKind::NoProjectDirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config: Config = Config::figment(None).extract().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.mode, TransferMode::Move);
        assert!(!config.recursive);
    }

    #[test]
    fn test_missing_file_is_fine() {
        let config: Config = Config::figment(Some(PathBuf::from("/nonexistent/shoebox.toml"))).extract().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shoebox.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "source = \"/mnt/card\"\nmode = \"copy\"\nrecursive = true").unwrap();
        let config: Config = Config::figment(Some(path)).extract().unwrap();
        assert_eq!(config.source, Some(PathBuf::from("/mnt/card")));
        assert_eq!(config.mode, TransferMode::Copy);
        assert!(config.recursive);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shoebox.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "destination = \"/typo\"").unwrap();
        assert!(Config::figment(Some(path)).extract::<Config>().is_err());
    }

    #[test]
    fn test_environment_overrides_file() {
        figment::Jail::expect_with(|jail| {
            let path = jail.directory().join("shoebox.toml");
            jail.create_file("shoebox.toml", "mode = \"copy\"")?;
            jail.set_env("SHOEBOX_MODE", "move");
            jail.set_env("SHOEBOX_RECURSIVE", "true");
            let config: Config = Config::figment(Some(path)).extract()?;
            assert_eq!(config.mode, TransferMode::Move);
            assert!(config.recursive);
            Ok(())
        });
    }
}
