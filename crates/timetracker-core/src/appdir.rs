//! Application data directory.
//!
//! Everything the tracker reads or persists lives in one per-user directory:
//!
//! - Windows: `%USERPROFILE%\AppData\Local\gcalTimeTracker\`
//! - everything else: `~/.gcalTimeTracker/`
//!
//! The directory holds the operator-supplied `credentials.json`, the
//! program-owned `token.json`, and an optional `config.toml`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Name of the application data directory.
pub const APP_DATA_DIR_NAME: &str = "gcalTimeTracker";

/// OAuth client secret downloaded from the Google Cloud Console.
pub const CREDENTIALS_FILE_NAME: &str = "credentials.json";

/// Cached OAuth token written after the first authorization.
pub const TOKEN_FILE_NAME: &str = "token.json";

/// Optional settings file.
pub const SETTINGS_FILE_NAME: &str = "config.toml";

/// Operating system family that decides the directory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// `%USERPROFILE%\AppData\Local\gcalTimeTracker`
    Windows,
    /// `~/.gcalTimeTracker`
    Other,
}

impl Platform {
    /// Returns the platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Other
        }
    }
}

/// Errors raised while locating or preparing the application directory.
#[derive(Debug, Error)]
pub enum AppDirError {
    /// The user's home directory could not be determined.
    #[error("unable to resolve the user home directory")]
    HomeDirUnavailable,

    /// The directory exists check failed for a reason other than "not found".
    #[error("error checking directory {}: {source}", .path.display())]
    CheckDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The directory was missing and could not be created.
    #[error("error creating directory {}: {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The credentials file exists check failed for a reason other than "not found".
    #[error("error checking credentials file {}: {source}", .path.display())]
    CheckCredentials {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The credentials file exists but could not be read.
    #[error("error opening file {}: {source}", .path.display())]
    ReadCredentials {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AppDirError {
    /// Returns true if the process cannot continue in any meaningful way.
    ///
    /// Only a missing home directory is fatal; every other variant is
    /// reported to the operator and the run stops cleanly.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::HomeDirUnavailable)
    }
}

/// Result of checking the application directory at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bootstrap {
    /// The directory did not exist and has just been created.
    Created,
    /// The directory exists but holds no credentials file.
    MissingCredentials,
    /// The directory exists and the credentials file was read.
    Ready {
        /// Raw contents of `credentials.json`.
        credentials: String,
    },
}

/// The per-user application data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDir {
    root: PathBuf,
}

impl AppDir {
    /// Uses `root` as the application directory as-is.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Computes the directory for a given home directory and platform.
    pub fn for_home(home: &Path, platform: Platform) -> Self {
        let root = match platform {
            Platform::Windows => home.join("AppData").join("Local").join(APP_DATA_DIR_NAME),
            Platform::Other => home.join(format!(".{}", APP_DATA_DIR_NAME)),
        };
        Self::new(root)
    }

    /// Computes the directory under the current user's home directory.
    pub fn from_home_dir() -> Result<Self, AppDirError> {
        let home = dirs::home_dir().ok_or(AppDirError::HomeDirUnavailable)?;
        Ok(Self::for_home(&home, Platform::current()))
    }

    /// Returns the directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of `credentials.json`.
    pub fn credentials_path(&self) -> PathBuf {
        self.root.join(CREDENTIALS_FILE_NAME)
    }

    /// Returns the path of `token.json`.
    pub fn token_path(&self) -> PathBuf {
        self.root.join(TOKEN_FILE_NAME)
    }

    /// Returns the path of `config.toml`.
    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE_NAME)
    }

    /// Checks the directory, creating it when absent, and reads the
    /// credentials file when present.
    ///
    /// Never deletes anything and never touches the token file.
    pub fn bootstrap(&self) -> Result<Bootstrap, AppDirError> {
        match fs::metadata(&self.root) {
            Ok(_) => {
                debug!(path = %self.root.display(), "application directory exists");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.create().map_err(|source| AppDirError::CreateDirectory {
                    path: self.root.clone(),
                    source,
                })?;
                info!(path = %self.root.display(), "created application directory");
                return Ok(Bootstrap::Created);
            }
            Err(source) => {
                return Err(AppDirError::CheckDirectory {
                    path: self.root.clone(),
                    source,
                });
            }
        }

        let path = self.credentials_path();
        match fs::metadata(&path) {
            Ok(_) => {
                let credentials = fs::read_to_string(&path)
                    .map_err(|source| AppDirError::ReadCredentials {
                        path: path.clone(),
                        source,
                    })?;
                debug!(path = %path.display(), "read credentials file");
                Ok(Bootstrap::Ready { credentials })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no credentials file");
                Ok(Bootstrap::MissingCredentials)
            }
            Err(source) => Err(AppDirError::CheckCredentials { path, source }),
        }
    }

    fn create(&self) -> io::Result<()> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }

        builder.create(&self.root)
    }
}
