// 📜 Logging setup (tracing + tracing-subscriber)

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput<'a> {
    Stderr,
    File(&'a Path),
    /// Drop everything; the TUI owns the terminal
    Off,
}

/// Install the global subscriber. Call once, before any work starts.
pub fn init_logging(filter: &str, output: LogOutput<'_>) -> Result<()> {
    let env_filter = EnvFilter::try_new(filter)
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    match output {
        LogOutput::Stderr => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?,
        LogOutput::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?
        }
        LogOutput::Off => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_is_rejected() {
        assert!(init_logging("hospital_payments=loud", LogOutput::Off).is_err());
    }

    #[test]
    fn test_off_installs_nothing() {
        assert!(init_logging("info", LogOutput::Off).is_ok());
        assert!(init_logging("debug", LogOutput::Off).is_ok());
    }
}
