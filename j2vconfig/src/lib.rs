//! # jpeg2video Configuration Module
//!
//! This module provides configuration management for the jpeg2video client:
//! - Loading configuration from an optional `config.yaml` file
//! - Merging with the embedded default configuration
//! - Environment variable overrides (`J2V_CONFIG__SECTION__KEY=value`)
//! - Typed getters and setters for the shared settings
//! - Thread-safe singleton access pattern
//!
//! The configuration lives in memory only. Setters change the running
//! configuration and are never written back to disk.
//!
//! ## Usage
//!
//! ```no_run
//! use j2vconfig::get_config;
//!
//! let config = get_config();
//! let level = config.get_log_min_level()?;
//! config.set_log_min_level("DEBUG".to_string())?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! Domain crates extend [`Config`] through `*ConfigExt` traits built on
//! [`Config::get_value`] and [`Config::set_value`].

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::{info, warn};

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("j2v.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> = Arc::new(Config::load_or_default(""));
}

const ENV_CONFIG_DIR: &str = "J2V_CONFIG";
const ENV_PREFIX: &str = "J2V_CONFIG__";
const CONFIG_DIR_NAME: &str = ".jpeg2video";
const CONFIG_FILE_NAME: &str = "config.yaml";

// Default values for configuration
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;

/// Macro to generate getter/setter for u64 values with default
#[macro_export]
macro_rules! impl_u64_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        fn $getter(&self) -> ::anyhow::Result<u64> {
            match self.get_value($path) {
                Ok(::serde_yaml::Value::Number(n)) => Ok(n.as_u64().unwrap_or($default)),
                Ok(::serde_yaml::Value::String(s)) => Ok(s.trim().parse().unwrap_or($default)),
                _ => Ok($default),
            }
        }

        fn $setter(&self, value: u64) -> ::anyhow::Result<()> {
            self.set_value($path, ::serde_yaml::Value::Number(value.into()))
        }
    };
}

/// Macro to generate getter/setter for string values with default
#[macro_export]
macro_rules! impl_string_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        fn $getter(&self) -> ::anyhow::Result<String> {
            match self.get_value($path) {
                Ok(::serde_yaml::Value::String(s)) if !s.trim().is_empty() => {
                    Ok(s.trim().to_string())
                }
                _ => Ok($default.to_string()),
            }
        }

        fn $setter(&self, value: String) -> ::anyhow::Result<()> {
            self.set_value($path, ::serde_yaml::Value::String(value))
        }
    };
}

/// Macro to generate getter/setter for bool values with default
macro_rules! impl_bool_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<bool> {
            match self.get_value($path) {
                Ok(Value::Bool(b)) => Ok(b),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, value: bool) -> Result<()> {
            self.set_value($path, Value::Bool(value))
        }
    };
}

/// Configuration manager for the jpeg2video client
///
/// # Examples
///
/// ```
/// use j2vconfig::Config;
///
/// let config = Config::from_yaml("host:\n  logger:\n    min_level: debug\n").unwrap();
/// assert_eq!(config.get_log_min_level().unwrap(), "debug");
/// ```
#[derive(Debug)]
pub struct Config {
    config_dir: Option<PathBuf>,
    data: Mutex<Value>,
}

impl Clone for Config {
    fn clone(&self) -> Self {
        Self {
            config_dir: self.config_dir.clone(),
            data: Mutex::new(self.lock().clone()),
        }
    }
}

impl Config {
    /// Finds a config directory by trying different locations in order
    ///
    /// 1. The provided `directory` if not empty
    /// 2. The `J2V_CONFIG` environment variable
    /// 3. `.jpeg2video` in the current directory
    /// 4. `.jpeg2video` in the user's home directory
    ///
    /// Returns `None` when no candidate exists; the embedded defaults are
    /// then used as is.
    pub fn find_config_dir(directory: &str) -> Option<PathBuf> {
        if !directory.is_empty() {
            return Some(PathBuf::from(directory));
        }

        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var = ENV_CONFIG_DIR, path = %env_path, "Trying to load config from env");
            return Some(PathBuf::from(env_path));
        }

        let local = Path::new(CONFIG_DIR_NAME);
        if local.is_dir() {
            return Some(local.to_path_buf());
        }

        home_dir()
            .map(|home| home.join(CONFIG_DIR_NAME))
            .filter(|path| path.is_dir())
    }

    /// Loads the configuration using the process environment for overrides
    ///
    /// This method:
    /// 1. Determines the configuration directory
    /// 2. Loads the default embedded configuration
    /// 3. Merges it with `config.yaml` from that directory, if present
    /// 4. Applies `J2V_CONFIG__*` environment variable overrides
    pub fn load_config(directory: &str) -> Result<Self> {
        Self::load_from(directory, env::vars())
    }

    /// Same as [`Config::load_config`] with an explicit set of variables
    pub fn load_from<I>(directory: &str, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config_dir = Self::find_config_dir(directory);

        let external = match &config_dir {
            Some(dir) => {
                let file = dir.join(CONFIG_FILE_NAME);
                match fs::read_to_string(&file) {
                    Ok(data) => {
                        info!(config_file = %file.display(), "Loaded config file");
                        Some(data)
                    }
                    Err(_) => {
                        info!(config_file = %file.display(), "Config file not found, using default embedded config");
                        None
                    }
                }
            }
            None => None,
        };

        let mut value = Self::merged_value(external.as_deref())?;
        Self::apply_env_overrides(&mut value, vars);

        Ok(Config {
            config_dir,
            data: Mutex::new(value),
        })
    }

    /// Builds a configuration from a YAML document merged over the defaults
    ///
    /// No file or environment variable is consulted.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(Config {
            config_dir: None,
            data: Mutex::new(Self::merged_value(Some(yaml))?),
        })
    }

    /// Builds a configuration holding only the embedded defaults
    pub fn defaults() -> Self {
        // The embedded document is part of the crate and always parses.
        Self::from_yaml("{}").unwrap_or_else(|_| Config {
            config_dir: None,
            data: Mutex::new(Value::Mapping(Mapping::new())),
        })
    }

    fn load_or_default(directory: &str) -> Self {
        match Self::load_config(directory) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "Failed to load configuration, using embedded defaults");
                Self::defaults()
            }
        }
    }

    fn merged_value(external: Option<&str>) -> Result<Value> {
        let mut default_value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;
        if let Some(yaml) = external {
            let external_value: Value = serde_yaml::from_str(yaml)?;
            merge_yaml(&mut default_value, &Self::lower_keys_value(external_value));
        }
        Ok(Self::lower_keys_value(default_value))
    }

    /// Directory the configuration was read from, if any
    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, Value> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets a configuration value at the specified path
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["feed", "base_path"]`)
    /// * `value` - The YAML value to set
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        let mut data = self.lock();
        Self::set_value_internal(&mut data, path, value)
    }

    fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
        if path.is_empty() {
            *data = value;
            return Ok(());
        }
        if let Value::Mapping(map) = data {
            let key_value = Value::String(path[0].to_lowercase());
            if path.len() == 1 {
                map.insert(key_value, value);
            } else {
                let entry = map
                    .entry(key_value)
                    .or_insert(Value::Mapping(Mapping::new()));
                Self::set_value_internal(entry, &path[1..], value)?;
            }
            Ok(())
        } else {
            Err(anyhow!("Current node is not a map"))
        }
    }

    /// Gets a configuration value at the specified path
    ///
    /// Returns an error if the path doesn't exist.
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.lock();
        Self::get_value_internal(&data, path)
    }

    fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
        let mut current = data;
        for (i, key) in path.iter().enumerate() {
            if let Value::Mapping(map) = current {
                match map.get(&Value::String(key.to_lowercase())) {
                    Some(next) => current = next,
                    None => return Err(anyhow!("Path {} does not exist", path[..=i].join("."))),
                }
            } else {
                return Err(anyhow!("Path {} is not a Config", path[..i].join(".")));
            }
        }
        Ok(current.clone())
    }

    fn apply_env_overrides<I>(config: &mut Value, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                let key_path = stripped.split("__").collect::<Vec<_>>();
                let yaml_value = Self::convert_env_value(&value);
                if let Err(err) = Self::set_value_internal(config, &key_path, yaml_value) {
                    warn!(env_var = %key, error = %err, "Ignoring configuration override");
                }
            }
        }
    }

    fn convert_env_value(value: &str) -> Value {
        if let Ok(parsed) = serde_yaml::from_str::<Value>(value) {
            return parsed;
        }
        Value::String(value.to_string())
    }

    fn lower_keys_value(value: Value) -> Value {
        match value {
            Value::Mapping(map) => {
                let mut new_map = Mapping::new();
                for (k, v) in map {
                    let key = match k {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    new_map.insert(key, Self::lower_keys_value(v));
                }
                Value::Mapping(new_map)
            }
            Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Self::lower_keys_value).collect())
            }
            _ => value,
        }
    }

    impl_bool_config!(
        get_log_enable_console,
        set_log_enable_console,
        &["host", "logger", "enable_console"],
        DEFAULT_LOG_ENABLE_CONSOLE
    );

    /// Récupère le niveau de log minimum depuis la configuration
    pub fn get_log_min_level(&self) -> Result<String> {
        match self.get_value(&["host", "logger", "min_level"]) {
            Ok(Value::String(s)) => Ok(s),
            _ => Ok(DEFAULT_LOG_MIN_LEVEL.to_string()),
        }
    }

    /// Définit le niveau de log minimum dans la configuration
    pub fn set_log_min_level(&self, level: String) -> Result<()> {
        self.set_value(&["host", "logger", "min_level"], Value::String(level))
    }
}

/// Returns the global configuration instance
///
/// The configuration is lazily loaded on first access. A configuration
/// file that fails to parse is reported and replaced by the defaults.
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

/// Merges external YAML configuration into default configuration
///
/// Mappings are merged key by key; scalars and sequences from `external`
/// replace the default value.
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(), // pour les scalaires ou séquences, on remplace
    }
}
