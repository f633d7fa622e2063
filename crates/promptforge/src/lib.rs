//! Shared library for the promptforge binaries: `optimize-prompt` and
//! `generate-schematic`.

pub mod config;
pub mod optimize;
pub mod schematic;

use clap::ValueEnum;
use promptforge_logging::LogFormat;

/// Log format flag shared by both binaries.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}
