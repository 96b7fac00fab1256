// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Optional user configuration.
//!
//! Read from `--config`/`GRESINFO_CONFIG`, or `$XDG_CONFIG_HOME/gresinfo/config.json`
//! when present. Every field is optional; command-line flags win over the file.
//!
//! ```json
//! {
//!   "style": "modern",
//!   "color": "always",
//!   "source": { "command": "/opt/slurm/bin/scontrol", "timeout_secs": 5 },
//!   "styles": {
//!     "gpus": { "preset": "rounded", "columns": ["node", "gres", "usage", "state"] }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use clap::ValueEnum;
use crossterm::tty::IsTty;
use serde::Deserialize;

use crate::render::StyleDef;
use crate::slurm::source::{SCONTROL, SCONTROL_ARGS};

/// Default timeout for the external query
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Get the default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("gresinfo").join("config.json"))
}

/// When to emit ANSI colour
#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colour when stdout is a terminal (or CLICOLOR_FORCE is set), unless NO_COLOR is set
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve against the real process environment
    pub fn resolve(self) -> bool {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        let force = std::env::var("CLICOLOR_FORCE").is_ok_and(|v| !v.is_empty() && v != "0");
        self.resolve_with(std::io::stdout().is_tty(), no_color, force)
    }

    pub fn resolve_with(self, stdout_is_tty: bool, no_color: bool, force: bool) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => force || (stdout_is_tty && !no_color),
        }
    }
}

/// How the node inventory is queried
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    pub command: String,
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            command: SCONTROL.to_string(),
            args: SCONTROL_ARGS.iter().map(|s| s.to_string()).collect(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// gresinfo configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Style used when `--style` is not given
    #[serde(default)]
    pub style: Option<String>,

    /// Colour mode used when `--color` is not given
    #[serde(default)]
    pub color: Option<ColorMode>,

    #[serde(default)]
    pub source: SourceConfig,

    /// User-defined styles, by name
    #[serde(default)]
    pub styles: BTreeMap<String, StyleDef>,
}

impl Config {
    /// Load config from `path`, or from the default location.
    ///
    /// An explicitly given file must exist; a missing default file yields
    /// the default config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        ensure!(
            config.source.timeout_secs >= 1,
            "Invalid config file {}: source.timeout_secs must be at least 1",
            path.display()
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.style.is_none());
        assert!(config.color.is_none());
        assert_eq!(config.source.command, "scontrol");
        assert_eq!(config.source.args, vec!["show", "nodes", "--json"]);
        assert_eq!(config.source.timeout(), Duration::from_secs(10));
        assert!(config.styles.is_empty());
    }

    #[test]
    fn test_config_deserialize() {
        let json = r#"{
            "style": "modern",
            "color": "never",
            "source": {"command": "/opt/slurm/bin/scontrol", "timeout_secs": 3},
            "styles": {"gpus": {"preset": "rounded", "columns": ["node", "usage"]}}
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.style.as_deref(), Some("modern"));
        assert_eq!(config.color, Some(ColorMode::Never));
        assert_eq!(config.source.command, "/opt/slurm/bin/scontrol");
        // args keep their default when only the command is overridden
        assert_eq!(config.source.args, vec!["show", "nodes", "--json"]);
        assert_eq!(config.source.timeout_secs, 3);
        assert!(config.styles.contains_key("gpus"));
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.style.is_none());
        assert_eq!(config.source, SourceConfig::default());
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        assert!(serde_json::from_str::<Config>(r#"{"colour": "always"}"#).is_err());
    }

    #[test]
    fn test_config_load_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, r#"{"style": "compact"}"#).unwrap();

        let config = Config::load(Some(&config_path)).unwrap();
        assert_eq!(config.style.as_deref(), Some("compact"));
    }

    #[test]
    fn test_config_load_missing_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::load(Some(&temp_dir.path().join("nope.json"))).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }

    #[test]
    fn test_config_load_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, "{ style: ").unwrap();

        let err = Config::load(Some(&config_path)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_load_rejects_zero_timeout() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, r#"{"source": {"timeout_secs": 0}}"#).unwrap();

        let err = Config::load(Some(&config_path)).unwrap_err();
        assert!(format!("{:#}", err).contains("timeout_secs must be at least 1"));
    }

    #[test]
    fn test_color_mode_resolution() {
        assert!(ColorMode::Always.resolve_with(false, true, false));
        assert!(!ColorMode::Never.resolve_with(true, false, true));

        assert!(ColorMode::Auto.resolve_with(true, false, false));
        assert!(!ColorMode::Auto.resolve_with(false, false, false));
        assert!(!ColorMode::Auto.resolve_with(true, true, false));
        // forced-tty wrappers set CLICOLOR_FORCE even though stdout is a pipe
        assert!(ColorMode::Auto.resolve_with(false, false, true));
    }
}
