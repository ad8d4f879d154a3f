//! Stderr logging for the CLI.
//!
//! The engine only emits through the `log` facade; this is the one place a
//! backend is installed. `RUST_LOG` takes precedence over the level chosen
//! from `--verbose`.

use flexi_logger::{Logger, LoggerHandle};

const DEFAULT_LEVEL: &str = "warn";
const VERBOSE_LEVEL: &str = "debug";

/// Start the stderr logger. The returned handle must stay alive for the
/// duration of the process.
pub fn init_logging(verbose: bool) -> Result<LoggerHandle, String> {
    let level = if verbose { VERBOSE_LEVEL } else { DEFAULT_LEVEL };
    Logger::try_with_env_or_str(level)
        .map_err(|err| format!("invalid log specification `{level}`: {err}"))?
        .log_to_stderr()
        .format_for_stderr(flexi_logger::colored_default_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))
}
