//! Application data directory layout and tracing setup

pub mod appdir;
pub mod tracing;

pub use crate::appdir::{
    APP_DATA_DIR_NAME, AppDir, AppDirError, Bootstrap, CREDENTIALS_FILE_NAME, Platform,
    SETTINGS_FILE_NAME, TOKEN_FILE_NAME,
};
pub use crate::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
