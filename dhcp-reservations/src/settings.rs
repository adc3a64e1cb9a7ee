//! Tool settings: embedded defaults, an optional TOML file, environment
//! variables and command-line overrides, applied in that order.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the dhcpd.conf to edit.
pub const ENV_CONF_PATH: &str = "DHCPD_CONF_PATH";
/// Environment variable naming the domain appended to hostnames.
pub const ENV_DOMAIN: &str = "DHCPD_DOMAIN";
/// Environment variable naming a settings file.
pub const ENV_SETTINGS: &str = "DHCP_RESERVATIONS_SETTINGS";

const DEFAULT_CONFIG_PATH: &str = "ansible/roles/dhcpd/files/dhcpd.conf";
const DEFAULT_DOMAIN: &str = "macfarm.example.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub config_path: PathBuf,
    pub domain: String,
    pub validator: ValidatorSettings,
}

/// How the dhcpd syntax checker is located and run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorSettings {
    /// Explicit binary; skips the search when set.
    pub binary: Option<PathBuf>,
    /// Well-known install locations tried before `PATH`.
    pub search_paths: Vec<PathBuf>,
    pub timeout: Duration,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub domain: Option<String>,
    pub validator: Option<PathBuf>,
}

/// Errors returned when loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    config_path: Option<PathBuf>,
    domain: Option<String>,
    #[serde(default)]
    validator: ValidatorFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ValidatorFile {
    binary: Option<PathBuf>,
    search_paths: Option<Vec<PathBuf>>,
    timeout_secs: Option<u64>,
}

impl Settings {
    fn overlay(mut self, file: SettingsFile) -> Self {
        if let Some(path) = file.config_path {
            self.config_path = path;
        }
        if let Some(domain) = file.domain {
            self.domain = domain;
        }
        if let Some(binary) = file.validator.binary {
            self.validator.binary = Some(binary);
        }
        if let Some(paths) = file.validator.search_paths {
            self.validator.search_paths = paths;
        }
        if let Some(secs) = file.validator.timeout_secs {
            self.validator.timeout = Duration::from_secs(secs.max(1));
        }
        self
    }

    /// Apply `DHCPD_CONF_PATH` and `DHCPD_DOMAIN` as returned by `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(ENV_CONF_PATH).filter(|v| !v.is_empty()) {
            self.config_path = PathBuf::from(path);
        }
        if let Some(domain) = lookup(ENV_DOMAIN).filter(|v| !v.is_empty()) {
            self.domain = domain;
        }
        self
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(path) = overrides.config_path {
            self.config_path = path;
        }
        if let Some(domain) = overrides.domain {
            self.domain = domain;
        }
        if let Some(binary) = overrides.validator {
            self.validator.binary = Some(binary);
        }
        self
    }
}

/// Built-in defaults from `defaults/settings.toml`.
pub fn default_settings() -> Settings {
    let embedded = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/defaults/settings.toml"
    ));
    match parse_settings(embedded, "embedded settings".to_string()) {
        Ok(file) => fallback_settings().overlay(file),
        Err(_) => fallback_settings(),
    }
}

/// Defaults overlaid with the TOML file at `path`.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file = parse_settings(&raw, path.display().to_string())?;
    Ok(default_settings().overlay(file))
}

/// Resolve settings for this process: settings file (flag, then
/// `DHCP_RESERVATIONS_SETTINGS`), environment, then command-line overrides.
pub fn resolve(settings_file: Option<&Path>, overrides: Overrides) -> Result<Settings, SettingsError> {
    let from_env = std::env::var_os(ENV_SETTINGS).map(PathBuf::from);
    let base = match settings_file.map(Path::to_path_buf).or(from_env) {
        Some(path) => load_settings(&path)?,
        None => default_settings(),
    };
    Ok(base
        .with_env(|key| std::env::var(key).ok())
        .with_overrides(overrides))
}

fn parse_settings(raw: &str, path: String) -> Result<SettingsFile, SettingsError> {
    toml::from_str(raw).map_err(|source| SettingsError::Parse { path, source })
}

fn fallback_settings() -> Settings {
    Settings {
        config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        domain: DEFAULT_DOMAIN.to_string(),
        validator: ValidatorSettings {
            binary: None,
            search_paths: vec![
                PathBuf::from("/usr/sbin/dhcpd"),
                PathBuf::from("/usr/local/sbin/dhcpd"),
                PathBuf::from("/opt/homebrew/sbin/dhcpd"),
            ],
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_match_fallback() {
        assert_eq!(default_settings(), fallback_settings());
    }

    #[test]
    fn file_overrides_only_the_keys_it_sets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "domain = \"lab.test\"\n[validator]\ntimeout_secs = 3\n").unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.domain, "lab.test");
        assert_eq!(settings.validator.timeout, Duration::from_secs(3));
        assert_eq!(settings.config_path, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(settings.validator.search_paths.len(), 3);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "domian = \"typo.test\"\n").unwrap();

        assert!(matches!(
            load_settings(&path),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn flags_beat_environment_beats_file() {
        let env = |key: &str| match key {
            ENV_CONF_PATH => Some("/env/dhcpd.conf".to_string()),
            ENV_DOMAIN => Some("env.test".to_string()),
            _ => None,
        };

        let settings = default_settings().with_env(env).with_overrides(Overrides {
            domain: Some("flag.test".to_string()),
            ..Overrides::default()
        });
        assert_eq!(settings.config_path, PathBuf::from("/env/dhcpd.conf"));
        assert_eq!(settings.domain, "flag.test");
    }
}
