//! Utilities for our logging (tracing) infrastructure.

use std::{ffi::OsStr, fmt::Debug, path::Path};
use tracing::{warn, Level, Span};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::Targets, prelude::*};

use crate::{config::LoggingConfig, BookingLedgerError};

/// For the current active span, record `field_value` for the field
/// `field_name`. This fields must already be defined in the current span.
///
/// All events that happen inside this span will have these fields attached as
/// additional data.
///
/// For example:
/// ```text
///   2024-03-05T19:47:03.090605Z  INFO booking_ledger_peer::operations::endorse: Starting endorsement.
///     at booking-ledger-peer/src/operations/endorse.rs:31
///     in booking_ledger_peer::operations::endorse::operation
///     in booking_ledger_peer::server::operation::handle_request with request_id: "9cb5e6fe-aa86-43e9-b7c9-413c005cbb50", tx_id: "1f0c..."
/// ```
///
/// If running on development mode, this function will check if the field has
/// NOT been defined and log a warning.
pub fn record_field(field_name: &str, field_value: &dyn Debug) {
    if cfg!(debug_assertions) && !Span::current().has_field(field_name) {
        warn!("Field {} not defined in current span!", field_name);
    }

    // Ignore the resulting span.
    let _ = Span::current().record(field_name, &format!("{field_value:?}"));
}

/// Object representing our logging. Should be kept around as our logging
/// writers return guards that should live for the lifetime of the program. Do
/// not do anything with the guards. Just make sure they are not dropped!
#[derive(Default)]
pub struct LoggingGuards {
    _all_layer_guard: Option<WorkerGuard>,
    _workspace_layer_guard: Option<WorkerGuard>,
}

/// Initialize our logging with different logging layers:
/// 1) Log all messages at `stdout_log_level` (or higher) from the given
/// `targets` to standard out.
/// 2) (OPTIONAL) Log all messages (TRACE or higher) from the given `targets`
/// to the path specified by `booking_ledger_logs_file_name`.
/// 3) (OPTIONAL) Log all messages (TRACE or higher) from any crate to the path
/// specified by `all_logs_file_name`.
///
/// Returns an object which should be kept around for the lifetime of the
/// program.
pub fn init_logging(
    config: &LoggingConfig,
    targets: &[&str],
) -> Result<LoggingGuards, BookingLedgerError> {
    let stdout_layer = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(targets_filter(targets, config.stdout_log_level));

    let logging_guards = match &config.log_files {
        Some(file_config) => {
            let (all_logs_dir, all_logs_file) = get_paths(&file_config.all_logs_file_name)?;
            let (workspace_logs_dir, workspace_logs_file) =
                get_paths(&file_config.booking_ledger_logs_file_name)?;

            // This layers logs all events into a file.
            let all_appender = tracing_appender::rolling::hourly(all_logs_dir, all_logs_file);
            let (non_blocking, all_layer_guard) = tracing_appender::non_blocking(all_appender);
            let all_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking);

            let workspace_appender =
                tracing_appender::rolling::hourly(workspace_logs_dir, workspace_logs_file);
            let (non_blocking, workspace_layer_guard) =
                tracing_appender::non_blocking(workspace_appender);
            let workspace_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(targets_filter(targets, Level::TRACE));

            tracing_subscriber::registry()
                .with(stdout_layer)
                .with(workspace_layer)
                .with(all_layer)
                .init();

            LoggingGuards {
                _all_layer_guard: Some(all_layer_guard),
                _workspace_layer_guard: Some(workspace_layer_guard),
            }
        }
        None => {
            tracing_subscriber::registry().with(stdout_layer).init();

            LoggingGuards::default()
        }
    };

    Ok(logging_guards)
}

/// Return the path directory and the file name. Needed for passing to
/// tracing_appender.
fn get_paths(path: &Path) -> Result<(&Path, &OsStr), BookingLedgerError> {
    let dir = path
        .parent()
        .ok_or_else(|| BookingLedgerError::InvalidLogFilePath(path.into()))?;

    let file_name = path
        .file_name()
        .ok_or_else(|| BookingLedgerError::InvalidLogFilePath(path.into()))?;
    Ok((dir, file_name))
}

fn targets_filter(targets: &[&str], level: Level) -> Targets {
    targets
        .iter()
        .fold(Targets::new(), |filter, target| filter.with_target(*target, level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_splits_into_dir_and_file() -> anyhow::Result<()> {
        let (dir, file) = get_paths(Path::new("./dev/logs/peer.log"))?;
        assert_eq!(dir, Path::new("./dev/logs"));
        assert_eq!(file, OsStr::new("peer.log"));
        Ok(())
    }

    #[test]
    fn root_is_not_a_log_file() {
        let result = get_paths(Path::new("/"));
        assert!(matches!(
            result,
            Err(BookingLedgerError::InvalidLogFilePath(_))
        ));
    }
}
