// brix/src/logging.rs
//
// Tracing setup. Logging is off unless a level is requested; flags win
// over BRIX_LOG / BRIX_LOG_PATH / BRIX_LOG_JSON (clap resolves both).

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::cli::{LogArgs, LogLevel};

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

pub fn init(args: &LogArgs) -> anyhow::Result<()> {
    let level = LevelFilter::from(args.log_level.unwrap_or_default());
    if level == LevelFilter::OFF {
        return Ok(());
    }
    let filter = EnvFilter::new(level.to_string());

    let (writer, ansi) = match &args.log_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false);

    let result = if args.log_json {
        builder.json().try_init()
    } else {
        builder.with_ansi(ansi).try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::WARN);
        assert_eq!(LevelFilter::from(LogLevel::default()), LevelFilter::OFF);
    }

    #[test]
    fn test_off_installs_nothing() -> anyhow::Result<()> {
        let args = LogArgs {
            log_level: Some(LogLevel::Off),
            log_path: None,
            log_json: false,
        };
        init(&args)?;
        init(&args)?;
        Ok(())
    }
}
