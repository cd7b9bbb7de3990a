use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::{PathsError, Result};

/// Conventional config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "dj_local_conf.json";

/// Typed view of the pipeline's local JSON configuration.
///
/// The on-disk file keeps the flat dotted keys of the original deployment
/// (`database.host`, `custom.volume_root_data_dir`, ...). Callers receive
/// this struct by value; nothing here is process-global.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "database.host")]
    pub database_host: Option<String>,

    #[serde(rename = "database.user")]
    pub database_user: Option<String>,

    #[serde(rename = "database.password")]
    pub database_password: Option<String>,

    pub custom: CustomConfig,
}

/// The `custom` section: deployment-specific settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomConfig {
    #[serde(rename = "database.prefix")]
    pub database_prefix: Option<String>,

    /// Candidate roots for raw volumetric data. The JSON value may be a
    /// single path or a list of paths; both deserialize to a list so that
    /// multi-root resolution always sees a uniform ordered sequence.
    #[serde(deserialize_with = "one_or_many_paths")]
    pub volume_root_data_dir: Option<Vec<PathBuf>>,
}

impl Config {
    /// Parse the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| PathsError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| PathsError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if it exists (defaults otherwise), then overlay
    /// environment variables on top.
    pub fn load_with_env(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            log::debug!("config file {} not found, using defaults", path.display());
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Overlay `DJ_HOST`, `DJ_USER`, `DJ_PASS`, `DATABASE_PREFIX` and
    /// `VOLUME_ROOT_DATA_DIR` (comma-separated) onto the loaded values.
    pub fn apply_env_overrides(&mut self) {
        if let Some(host) = non_empty_env("DJ_HOST") {
            self.database_host = Some(host);
        }
        if let Some(user) = non_empty_env("DJ_USER") {
            self.database_user = Some(user);
        }
        if let Some(password) = non_empty_env("DJ_PASS") {
            self.database_password = Some(password);
        }
        if let Some(prefix) = non_empty_env("DATABASE_PREFIX") {
            self.custom.database_prefix = Some(prefix);
        }
        if let Some(roots) = non_empty_env("VOLUME_ROOT_DATA_DIR") {
            let dirs: Vec<PathBuf> = roots
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(PathBuf::from)
                .collect();
            self.custom.volume_root_data_dir = if dirs.is_empty() { None } else { Some(dirs) };
        }
    }

    /// Ordered candidate roots for volumetric data, `None` when unset or
    /// configured empty.
    pub fn volume_root_data_dirs(&self) -> Option<&[PathBuf]> {
        match self.custom.volume_root_data_dir.as_deref() {
            None | Some([]) => None,
            Some(dirs) => Some(dirs),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    let value = env::var(key).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn one_or_many_paths<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<PathBuf>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(PathBuf),
        Many(Vec<PathBuf>),
    }

    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(value.map(|roots| match roots {
        OneOrMany::One(dir) => vec![dir],
        OneOrMany::Many(dirs) => dirs,
    }))
}
