use crate::Result;
use flexi_logger::{opt_format, Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};
use std::path::Path;

/// Installs the global logger.
///
/// The level comes from `RUST_LOG` when set, otherwise from `spec`. With a
/// `directory`, output goes to rotating files there (10 MB each, numbered);
/// without one, to stderr. Keep the returned handle alive for as long as
/// logging is needed.
pub fn setup_logging(spec: &str, directory: Option<&Path>) -> Result<LoggerHandle> {
    let mut logger = Logger::try_with_env_or_str(spec)?.format(opt_format);
    if let Some(directory) = directory {
        logger = logger
            .log_to_file(
                FileSpec::default()
                    .directory(directory)
                    .basename("mcts_player"),
            )
            .rotate(
                Criterion::Size(10 * 1024 * 1024),
                Naming::Numbers,
                Cleanup::KeepLogFiles(7),
            );
    }
    Ok(logger.start()?)
}
