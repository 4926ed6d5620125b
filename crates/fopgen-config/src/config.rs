//! Configuration file resolution and loading

use fopgen_codegen::{Markers, DEFAULT_RESERVED};
use fopgen_registry::Registry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::driver::DriverConfig;
use crate::errors::ConfigError;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "FOPGEN_CONFIG";
/// Config file name looked up in the working and user config directories
pub const CONFIG_FILE_NAME: &str = "fopgen.toml";

const BUILTIN_CONFIG: &str = include_str!("../data/drivers.toml");

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` on the command line
    Explicit(PathBuf),
    /// The `FOPGEN_CONFIG` environment variable
    Environment(PathBuf),
    /// `fopgen.toml` in the working directory
    WorkingDir(PathBuf),
    /// `fopgen.toml` in the user config directory
    User(PathBuf),
    /// No file found; built-in drivers only
    Builtin,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::Environment(p)
            | ConfigSource::WorkingDir(p)
            | ConfigSource::User(p) => Some(p),
            ConfigSource::Builtin => None,
        }
    }

    /// Explicitly requested files must exist; discovered ones are optional
    fn is_required(&self) -> bool {
        matches!(self, ConfigSource::Explicit(_) | ConfigSource::Environment(_))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(p) => write!(f, "{} (--config)", p.display()),
            ConfigSource::Environment(p) => write!(f, "{} ({})", p.display(), CONFIG_ENV),
            ConfigSource::WorkingDir(p) | ConfigSource::User(p) => write!(f, "{}", p.display()),
            ConfigSource::Builtin => write!(f, "(built-in)"),
        }
    }
}

/// Resolved configuration: top-level settings plus every known driver
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Registry file; relative paths are resolved against the config file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Operations never generated, whatever a driver selects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markers: Option<Markers>,
    #[serde(rename = "driver", default, skip_serializing_if = "Vec::is_empty")]
    pub drivers: Vec<DriverConfig>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Config {
    /// Pick the config file to use
    ///
    /// Order: `explicit`, then `FOPGEN_CONFIG`, then `./fopgen.toml`, then
    /// `~/.config/fopgen/fopgen.toml`.
    pub fn resolve_source(explicit: Option<&Path>) -> ConfigSource {
        let env = std::env::var(CONFIG_ENV).ok();
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        resolve_source_from(explicit, env.as_deref(), &cwd, user_config_path())
    }

    /// Load the built-in drivers merged with the resolved config file
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        let source = Self::resolve_source(explicit);
        let builtin = Self::builtin()?;

        let Some(path) = source.path() else {
            debug!("No config file found, using built-in configuration");
            return Ok((builtin, source));
        };
        if !source.is_required() && !path.exists() {
            debug!("Config file {:?} does not exist", path);
            return Ok((builtin, ConfigSource::Builtin));
        }

        let file = Self::load_from_path(path)?;
        info!("Loaded config from {}", source);
        Ok((builtin.merge(file), source))
    }

    /// Configuration embedded in the binary
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUILTIN_CONFIG)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        debug!("Reading config from {:?}", path);
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(markers) = &self.markers {
            validate_markers(markers)?;
        }

        let mut seen = HashSet::with_capacity(self.drivers.len());
        for driver in &self.drivers {
            driver.validate()?;
            if !seen.insert(driver.name.as_str()) {
                return Err(ConfigError::DuplicateDriver(driver.name.clone()));
            }
        }
        Ok(())
    }

    /// Overlay `other` on top of `self`
    ///
    /// Settings present in `other` win. A driver in `other` replaces the
    /// driver of the same name in place; new drivers are appended.
    pub fn merge(mut self, other: Config) -> Self {
        if other.registry.is_some() {
            self.registry = other.registry;
            self.base_dir = other.base_dir;
        }
        self.log_file = other.log_file.or(self.log_file);
        self.reserved = other.reserved.or(self.reserved);
        self.markers = other.markers.or(self.markers);

        for driver in other.drivers {
            match self.drivers.iter_mut().find(|d| d.name == driver.name) {
                Some(existing) => {
                    debug!("Config overrides driver '{}'", driver.name);
                    *existing = driver;
                }
                None => self.drivers.push(driver),
            }
        }
        self
    }

    pub fn driver(&self, name: &str) -> Result<&DriverConfig, ConfigError> {
        self.drivers
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| ConfigError::UnknownDriver(name.to_string()))
    }

    pub fn reserved(&self) -> Vec<String> {
        self.reserved.clone().unwrap_or_else(|| {
            DEFAULT_RESERVED
                .iter()
                .map(|name| (*name).to_string())
                .collect()
        })
    }

    pub fn markers(&self) -> Markers {
        self.markers.clone().unwrap_or_default()
    }

    /// Registry path from the config, resolved against the config file
    pub fn registry_path(&self) -> Option<PathBuf> {
        let path = self.registry.as_ref()?;
        match &self.base_dir {
            Some(base) if path.is_relative() => Some(base.join(path)),
            _ => Some(path.clone()),
        }
    }

    /// Load the registry: `override_path`, else the configured one, else
    /// the built-in table
    pub fn load_registry(&self, override_path: Option<&Path>) -> Result<Registry, ConfigError> {
        let path = override_path
            .map(Path::to_path_buf)
            .or_else(|| self.registry_path());
        let registry = match path {
            Some(path) => Registry::load_from_path(&path)?,
            None => Registry::builtin()?,
        };
        Ok(registry)
    }
}

/// A trigger must be non-empty and absent from both sentinels
fn validate_markers(markers: &Markers) -> Result<(), ConfigError> {
    let trigger = &markers.trigger;
    if trigger.trim().is_empty() {
        return Err(ConfigError::InvalidMarkers(
            "trigger cannot be empty".to_string(),
        ));
    }
    for (name, sentinel) in [
        ("begin-sentinel", &markers.begin_sentinel),
        ("end-sentinel", &markers.end_sentinel),
    ] {
        if sentinel.contains(trigger.as_str()) {
            return Err(ConfigError::InvalidMarkers(format!(
                "{} '{}' contains the trigger '{}'",
                name, sentinel, trigger
            )));
        }
    }
    Ok(())
}

fn user_config_path() -> Option<PathBuf> {
    #[cfg(not(target_os = "windows"))]
    let dir = dirs::home_dir().map(|home| home.join(".config"));

    #[cfg(target_os = "windows")]
    let dir = dirs::config_dir();

    dir.map(|dir| dir.join("fopgen").join(CONFIG_FILE_NAME))
}

fn resolve_source_from(
    explicit: Option<&Path>,
    env: Option<&str>,
    cwd: &Path,
    user: Option<PathBuf>,
) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    if let Some(env_path) = env {
        let trimmed = env_path.trim();
        if !trimmed.is_empty() {
            return ConfigSource::Environment(PathBuf::from(trimmed));
        }
    }

    let local = cwd.join(CONFIG_FILE_NAME);
    if local.exists() {
        return ConfigSource::WorkingDir(local);
    }

    match user {
        Some(path) if path.exists() => ConfigSource::User(path),
        _ => ConfigSource::Builtin,
    }
}
