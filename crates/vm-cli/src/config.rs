use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default launch config location, matching where cluster deployments mount
/// the ConfigMap. Overridable via `VMCTL_CONFIG_PATH`.
const DEFAULT_CONFIG_PATH: &str = "config/config.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Launch parameters, read once before any remote call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LaunchConfig {
    #[serde(rename = "instance-type")]
    pub instance_type: String,
    #[serde(rename = "image-id")]
    pub image_id: String,
}

impl LaunchConfig {
    /// Load from `VMCTL_CONFIG_PATH`, falling back to `config/config.json`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("VMCTL_CONFIG_PATH")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(file).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_renamed_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"{"instance-type": "t2.micro", "image-id": "ami-0d0ca2066b861631c"}"#,
        );

        let config = LaunchConfig::load_from(&path).unwrap();
        assert_eq!(config.instance_type, "t2.micro");
        assert_eq!(config.image_id, "ami-0d0ca2066b861631c");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LaunchConfig::load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "{not json");
        let err = LaunchConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
