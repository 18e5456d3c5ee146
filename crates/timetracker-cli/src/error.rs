//! Client error types.

use std::fmt;

use timetracker_core::AppDirError;
use timetracker_google::GoogleError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// How the top-level handler treats an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Printed to stderr; the process exits with a failure status.
    Fatal,
    /// Printed to stdout; the run stops but the process exits successfully.
    Reported,
}

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Application directory error.
    AppDir(AppDirError),
    /// Settings file error.
    Config(String),
    /// Credentials, token or API error.
    Google(GoogleError),
    /// Failed to render output.
    Render(serde_json::Error),
    /// IO error.
    Io(std::io::Error),
}

impl ClientError {
    /// Returns how the top-level handler should treat this error.
    ///
    /// Directory and credentials-file lookups are reported; everything else,
    /// including a missing home directory, is fatal.
    pub fn severity(&self) -> Severity {
        match self {
            Self::AppDir(err) if !err.is_fatal() => Severity::Reported,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AppDir(err) => write!(f, "{}", err),
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Google(err) => write!(f, "{}", err),
            Self::Render(err) => write!(f, "failed to render output: {}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AppDir(err) => Some(err),
            Self::Google(err) => Some(err),
            Self::Render(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<AppDirError> for ClientError {
    fn from(err: AppDirError) -> Self {
        Self::AppDir(err)
    }
}

impl From<GoogleError> for ClientError {
    fn from(err: GoogleError) -> Self {
        Self::Google(err)
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
