//! Console logging for the `nbody` binary

use anyhow::Result;
use flexi_logger::{DeferredNow, Logger, LoggerHandle, Record};

/// Install a `RUST_LOG`-driven logger, `info` when unset.
/// Keep the returned handle alive for the lifetime of the program.
pub fn setup() -> Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str("info")?
        .format(line_format)
        .start()?;

    log::debug!("logging ready; adjust the level with RUST_LOG");

    Ok(handle)
}

/// `LEVEL [time] [file:line] message`
pub fn line_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> std::io::Result<()> {
    write!(
        w,
        "{} [{}] [{}:{}] {}",
        record.level(),
        now.now().format("%H:%M:%S%.6f"),
        record.file().unwrap_or("<unnamed>"),
        record.line().unwrap_or(0),
        record.args()
    )
}
