//! Configuration types shared by the workspace binaries.

pub mod logging;

pub use logging::{LoggingConfig, LoggingFileConfig};
