//! Run configuration: the JSON config file merged with command-line
//! overrides into [`Settings`].

use std::path::{Path, PathBuf};

use leetsync_ingest_models::{Layout, Settings};
use leetsync_judge::leetcode::DEFAULT_ENDPOINT;
use serde::Deserialize;

/// Where the config file is looked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "./config/config.json";

/// Where the pending queue lives when neither the file nor the CLI names it.
pub const DEFAULT_PENDING_FILE: &str = "temp_problemset.txt";

/// Errors loading or validating configuration. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid JSON of the expected shape.
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A required setting is empty after merging.
    #[error("no {0} configured, set it in the config file or on the command line")]
    Missing(&'static str),
}

/// The on-disk config file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub cookie: String,
    pub output_dir: String,
    /// Retention window in days.
    pub day: u32,
    pub push_dir: String,
    pub pending_file: Option<PathBuf>,
    pub layout: Option<Layout>,
    pub endpoint: Option<String>,
}

impl ConfigFile {
    /// Reads and decodes `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Read`] if the file exists but cannot be read
    /// * [`ConfigError::Parse`] if its contents do not decode
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!(
                    "Config file {} not found, using command-line values only",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given on the command line. Empty or absent values defer to the
/// config file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliOverrides {
    pub cookie: Option<String>,
    pub output_dir: Option<PathBuf>,
    /// `0` defers to the config file.
    pub day: u32,
    pub overwrite: bool,
    pub pending_file: Option<PathBuf>,
    pub layout: Option<Layout>,
}

/// Merges `file` and `cli` (CLI wins) and validates the result.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] if no cookie or output directory is set.
pub fn resolve(file: ConfigFile, cli: CliOverrides) -> Result<Settings, ConfigError> {
    let cookie = cli
        .cookie
        .filter(|c| !c.is_empty())
        .unwrap_or(file.cookie);
    if cookie.trim().is_empty() {
        return Err(ConfigError::Missing("cookie"));
    }

    let output_dir = cli
        .output_dir
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(file.output_dir));
    if output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Missing("output directory"));
    }

    let push_dir = if file.push_dir.is_empty() {
        output_dir.clone()
    } else {
        PathBuf::from(file.push_dir)
    };

    let retention_days = if cli.day == 0 { file.day } else { cli.day };
    if retention_days == 0 {
        log::warn!("Retention window is 0 days, no submission will be harvested");
    }

    Ok(Settings {
        cookie,
        output_dir,
        retention_days,
        push_dir,
        overwrite: cli.overwrite,
        pending_file: cli
            .pending_file
            .or(file.pending_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PENDING_FILE)),
        layout: cli.layout.or(file.layout).unwrap_or_default(),
        endpoint: file
            .endpoint
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> ConfigFile {
        ConfigFile {
            cookie: "from-file".to_owned(),
            output_dir: "/srv/solutions".to_owned(),
            day: 2,
            ..ConfigFile::default()
        }
    }

    #[test]
    fn decodes_original_keys() {
        let json = r#"{"cookie":"abc","output_dir":"/out","day":3,"push_dir":"/repo"}"#;
        let parsed: ConfigFile = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.cookie, "abc");
        assert_eq!(parsed.output_dir, "/out");
        assert_eq!(parsed.day, 3);
        assert_eq!(parsed.push_dir, "/repo");
        assert_eq!(parsed.layout, None);
    }

    #[test]
    fn decodes_optional_keys() {
        let json = r#"{"layout":"per-problem","pending_file":"q.txt","endpoint":"http://x/"}"#;
        let parsed: ConfigFile = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.layout, Some(Layout::PerProblem));
        assert_eq!(parsed.pending_file, Some(PathBuf::from("q.txt")));
        assert_eq!(parsed.endpoint.as_deref(), Some("http://x/"));
    }

    #[test]
    fn file_values_apply_without_overrides() {
        let settings = resolve(file(), CliOverrides::default()).unwrap();

        assert_eq!(settings.cookie, "from-file");
        assert_eq!(settings.output_dir, PathBuf::from("/srv/solutions"));
        assert_eq!(settings.retention_days, 2);
        assert_eq!(settings.push_dir, settings.output_dir);
        assert_eq!(settings.pending_file, PathBuf::from(DEFAULT_PENDING_FILE));
        assert_eq!(settings.layout, Layout::Flat);
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
        assert!(!settings.overwrite);
    }

    #[test]
    fn cli_values_win() {
        let cli = CliOverrides {
            cookie: Some("from-cli".to_owned()),
            output_dir: Some(PathBuf::from("/tmp/out")),
            day: 7,
            overwrite: true,
            pending_file: Some(PathBuf::from("/tmp/q.txt")),
            layout: Some(Layout::PerProblem),
        };

        let settings = resolve(file(), cli).unwrap();

        assert_eq!(settings.cookie, "from-cli");
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(settings.retention_days, 7);
        assert!(settings.overwrite);
        assert_eq!(settings.pending_file, PathBuf::from("/tmp/q.txt"));
        assert_eq!(settings.layout, Layout::PerProblem);
    }

    #[test]
    fn empty_cli_strings_defer_to_file() {
        let cli = CliOverrides {
            cookie: Some(String::new()),
            output_dir: Some(PathBuf::new()),
            ..CliOverrides::default()
        };

        let settings = resolve(file(), cli).unwrap();

        assert_eq!(settings.cookie, "from-file");
        assert_eq!(settings.output_dir, PathBuf::from("/srv/solutions"));
    }

    #[test]
    fn explicit_push_dir_is_kept() {
        let config = ConfigFile {
            push_dir: "/srv/repo".to_owned(),
            ..file()
        };

        let settings = resolve(config, CliOverrides::default()).unwrap();

        assert_eq!(settings.push_dir, PathBuf::from("/srv/repo"));
    }

    #[test]
    fn missing_cookie_is_rejected() {
        let config = ConfigFile {
            cookie: String::new(),
            ..file()
        };

        let err = resolve(config, CliOverrides::default()).unwrap_err();

        assert!(matches!(err, ConfigError::Missing("cookie")));
    }

    #[test]
    fn missing_output_dir_is_rejected() {
        let config = ConfigFile {
            output_dir: String::new(),
            ..file()
        };

        let err = resolve(config, CliOverrides::default()).unwrap_err();

        assert!(matches!(err, ConfigError::Missing("output directory")));
    }

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("leetsync_config_missing/config.json");

        let loaded = ConfigFile::load(&path).await.unwrap();

        assert_eq!(loaded, ConfigFile::default());
    }

    #[tokio::test]
    async fn invalid_file_is_an_error() {
        let dir = std::env::temp_dir().join("leetsync_config_invalid");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = ConfigFile::load(&path).await.unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
