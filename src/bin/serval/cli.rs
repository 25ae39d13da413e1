use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// A small tree-walking Scheme interpreter.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Script to run non-interactively. Without this, serval starts a REPL.
    pub script: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = LogLevel::Error)]
    pub verbosity: LogLevel,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    #[value(alias("1"))]
    #[default]
    Error,
    #[value(alias("2"))]
    Warn,
    #[value(alias("3"))]
    Info,
    #[value(alias("4"))]
    Debug,
    #[value(alias("5"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}
