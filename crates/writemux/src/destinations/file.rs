//! FileDestination - mirrors writes into a local file

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use contracts::{ContractError, Destination};
use tracing::{debug, instrument};

/// Configuration for FileDestination
#[derive(Debug, Clone)]
pub struct FileDestinationConfig {
    /// Output file path
    pub path: PathBuf,
    /// Append to an existing file instead of truncating it
    pub append: bool,
}

impl FileDestinationConfig {
    /// Create config from params map
    pub fn from_params(
        name: &str,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let path = params
            .get("path")
            .map(PathBuf::from)
            .ok_or_else(|| ContractError::destination_param(name, "path", "missing"))?;

        let append = match params.get("append").map(String::as_str) {
            Some("true") | Some("1") | Some("yes") => true,
            Some("false") | Some("0") | Some("no") | None => false,
            Some(other) => {
                return Err(ContractError::destination_param(
                    name,
                    "append",
                    format!("expected a boolean, got '{other}'"),
                ))
            }
        };

        Ok(Self { path, append })
    }
}

/// Destination that writes to a file on disk
pub struct FileDestination {
    name: String,
    config: FileDestinationConfig,
    file: Option<File>,
}

impl FileDestination {
    /// Open (creating parent directories as needed) the configured file
    pub fn new(name: impl Into<String>, config: FileDestinationConfig) -> io::Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut options = OpenOptions::new();
        options.create(true);
        if config.append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        let file = options.open(&config.path)?;

        Ok(Self {
            name: name.into(),
            config,
            file: Some(file),
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        let config = FileDestinationConfig::from_params(&name, params)?;
        Ok(Self::new(name, config)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &std::path::Path {
        &self.config.path
    }
}

impl Destination for FileDestination {
    #[instrument(
        name = "file_destination_write",
        level = "trace",
        skip(self, buf),
        fields(destination = %self.name, bytes = buf.len())
    )]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let file = self.file.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "file destination is closed")
        })?;
        file.write_all(buf)?;
        Ok(buf.len())
    }

    #[instrument(name = "file_destination_close", skip(self), fields(destination = %self.name))]
    fn close(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            file.sync_all()?;
            debug!(path = %self.config.path.display(), "FileDestination closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_destination_write() {
        let dir = tempdir().unwrap();
        let config = FileDestinationConfig {
            path: dir.path().join("nested").join("out.log"),
            append: false,
        };

        let mut dest = FileDestination::new("test_file", config).unwrap();
        dest.write(b"line one\n").unwrap();
        dest.write(b"line two\n").unwrap();
        dest.close().unwrap();

        let contents = fs::read_to_string(dir.path().join("nested/out.log")).unwrap();
        assert_eq!(contents, "line one\nline two\n");
    }

    #[test]
    fn test_file_destination_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.log");
        fs::write(&path, "existing\n").unwrap();

        let params = HashMap::from([
            ("path".to_string(), path.display().to_string()),
            ("append".to_string(), "true".to_string()),
        ]);
        let mut dest = FileDestination::from_params("appender", &params).unwrap();
        dest.write(b"added\n").unwrap();
        dest.close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "existing\nadded\n");
    }

    #[test]
    fn test_write_after_close_fails() {
        let dir = tempdir().unwrap();
        let config = FileDestinationConfig {
            path: dir.path().join("out.log"),
            append: false,
        };
        let mut dest = FileDestination::new("closed", config).unwrap();
        dest.close().unwrap();
        dest.close().unwrap();

        let err = dest.write(b"late").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
    }

    #[test]
    fn test_missing_path_param() {
        let err = FileDestinationConfig::from_params("f", &HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("'path'"));
    }

    #[test]
    fn test_bad_append_param() {
        let params = HashMap::from([
            ("path".to_string(), "x.log".to_string()),
            ("append".to_string(), "sometimes".to_string()),
        ]);
        assert!(FileDestinationConfig::from_params("f", &params).is_err());
    }
}
