use std::{fs, path::PathBuf};

use common::prelude::StoreConfig;
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "ls3";
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable overriding `s3.bucket`
pub const BUCKET_ENV: &str = "BUCKET_NAME";

/// Which storage the commands operate on.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// The host filesystem
    #[default]
    Local,
    /// A bucket of an S3-compatible object store
    S3,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend used when `--backend` is not given
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub local: LocalConfig,
    #[serde(default)]
    pub s3: S3Config,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Host directory the local backend is confined to
    #[serde(default = "default_local_root")]
    pub root: PathBuf,
    /// Starting directory below `root` (defaults to the current directory,
    /// taken relative to `root`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<String>,
}

fn default_local_root() -> PathBuf {
    PathBuf::from("/")
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            root: default_local_root(),
            base_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Config {
    /// Bucket to browse
    #[serde(default)]
    pub bucket: String,
    /// Starting prefix inside the bucket
    #[serde(default)]
    pub prefix: String,
    /// Per-request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Where the bucket lives
    #[serde(default = "default_store")]
    pub store: StoreConfig,
}

// credentials and region come from the AWS environment unless configured
fn default_store() -> StoreConfig {
    StoreConfig::S3 {
        endpoint: None,
        region: None,
        access_key: None,
        secret_key: None,
    }
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            prefix: String::new(),
            timeout_secs: None,
            store: default_store(),
        }
    }
}

impl AppConfig {
    /// Replace the configured bucket with a non-empty override.
    pub fn apply_bucket_override(&mut self, bucket: Option<String>) {
        if let Some(bucket) = bucket.filter(|b| !b.is_empty()) {
            self.s3.bucket = bucket;
        }
    }
}

/// Load variables such as `BUCKET_NAME` from a `.env` file in the current
/// directory or one of its ancestors. Variables already set are kept.
///
/// Returns the file that was loaded, or `None` when there is none.
pub fn load_dotenv() -> Result<Option<PathBuf>, StateError> {
    dotenv_outcome(dotenvy::dotenv())
}

fn dotenv_outcome(result: Result<PathBuf, dotenvy::Error>) -> Result<Option<PathBuf>, StateError> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(StateError::Dotenv(err)),
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the ls3 directory (~/.ls3)
    pub config_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the ls3 directory path (custom or default ~/.ls3)
    pub fn config_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Write a config file, failing if one already exists
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let config_dir = Self::config_dir(custom_path)?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            return Err(StateError::AlreadyInitialized(config_path));
        }

        fs::create_dir_all(&config_dir)?;

        let config = config.unwrap_or_default();
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            config_dir,
            config_path,
            config,
        })
    }

    /// Load state from the ls3 directory.
    ///
    /// A missing config file yields the defaults. `BUCKET_NAME` is applied on top.
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let mut state = Self::load_file(custom_path)?;
        state
            .config
            .apply_bucket_override(std::env::var(BUCKET_ENV).ok());
        Ok(state)
    }

    fn load_file(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let config_dir = Self::config_dir(custom_path)?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let config = if config_path.exists() {
            let config_toml = fs::read_to_string(&config_path)?;
            toml::from_str(&config_toml)?
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            AppConfig::default()
        };

        Ok(Self {
            config_dir,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("config already exists at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("failed to load .env file: {0}")]
    Dotenv(#[source] dotenvy::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.local.root, PathBuf::from("/"));
        assert_eq!(config.local.base_dir, None);
        assert!(config.s3.bucket.is_empty());
        assert!(matches!(config.s3.store, StoreConfig::S3 { .. }));
    }

    #[test]
    fn test_init_then_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("ls3");

        let mut config = AppConfig::default();
        config.backend = Backend::S3;
        config.s3.bucket = "photos".to_string();
        config.s3.timeout_secs = Some(5);

        let state = AppState::init(Some(dir.clone()), Some(config.clone())).unwrap();
        assert_eq!(state.config_path, dir.join(CONFIG_FILE_NAME));
        assert!(state.config_path.exists());

        let loaded = AppState::load_file(Some(dir)).unwrap();
        assert_eq!(loaded.config, config);
    }

    #[test]
    fn test_init_twice_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().to_path_buf();

        AppState::init(Some(dir.clone()), None).unwrap();
        let err = AppState::init(Some(dir), None).unwrap_err();
        assert!(matches!(err, StateError::AlreadyInitialized(_)));
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state = AppState::load_file(Some(temp_dir.path().join("absent"))).unwrap();
        assert_eq!(state.config, AppConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config: AppConfig = toml::from_str(
            r#"
            backend = "s3"

            [s3]
            bucket = "archive"

            [s3.store]
            type = "local"
            path = "/var/lib/ls3"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend, Backend::S3);
        assert_eq!(config.local, LocalConfig::default());
        assert_eq!(config.s3.bucket, "archive");
        assert_eq!(config.s3.prefix, "");
        assert_eq!(
            config.s3.store,
            StoreConfig::Local {
                path: PathBuf::from("/var/lib/ls3")
            }
        );
    }

    #[test]
    fn test_malformed_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "backend = 3").unwrap();

        let err = AppState::load_file(Some(temp_dir.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, StateError::TomlDe(_)));
    }

    #[test]
    fn test_bucket_override() {
        let mut config = AppConfig::default();
        config.s3.bucket = "configured".to_string();

        config.apply_bucket_override(None);
        assert_eq!(config.s3.bucket, "configured");

        config.apply_bucket_override(Some(String::new()));
        assert_eq!(config.s3.bucket, "configured");

        config.apply_bucket_override(Some("from-env".to_string()));
        assert_eq!(config.s3.bucket, "from-env");
    }

    fn load_dotenv_from(path: &std::path::Path) -> Result<Option<PathBuf>, StateError> {
        dotenv_outcome(dotenvy::from_path(path).map(|()| path.to_path_buf()))
    }

    #[test]
    fn test_dotenv_file() {
        let temp_dir = tempfile::tempdir().unwrap();

        let missing = temp_dir.path().join("absent.env");
        assert!(load_dotenv_from(&missing).unwrap().is_none());

        let path = temp_dir.path().join(".env");
        fs::write(&path, "LS3_DOTENV_TEST_BUCKET=from-file\n").unwrap();
        assert_eq!(load_dotenv_from(&path).unwrap(), Some(path.clone()));
        assert_eq!(
            std::env::var("LS3_DOTENV_TEST_BUCKET").unwrap(),
            "from-file"
        );

        let broken = temp_dir.path().join("broken.env");
        fs::write(&broken, "LS3_DOTENV_TEST_BROKEN='unterminated\n").unwrap();
        let err = load_dotenv_from(&broken).unwrap_err();
        assert!(matches!(err, StateError::Dotenv(_)));
    }
}
