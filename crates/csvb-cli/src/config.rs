//! Command-line configuration.
//!
//! Options come from CLI arguments, with environment fallbacks for the
//! delimiter (`CSVB_DELIMITER`) and log level (`CSVB_LOG_LEVEL`).

use crate::error::ConfigError;
use clap::{ArgAction, Parser, ValueEnum};
use csvb_format::TokenizerConfig;
use std::path::PathBuf;
use tracing::Level;

/// Where records are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Standard input
    Stdin,
    /// A file on disk
    File(PathBuf),
}

/// Where JSON is written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Standard output
    Stdout,
    /// A file on disk, created or truncated
    File(PathBuf),
}

/// Logging verbosity
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Everything, including one event per record
    Trace,
    /// Schema, block and defaults events
    Debug,
    /// Summary events
    Info,
    /// Warnings only
    Warn,
    /// Errors only
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

/// csvb command-line configuration
#[derive(Debug, Clone, Parser)]
#[command(
    name = "csvb",
    about = "Print CSV blocks files as tables and convert them to JSON",
    version,
    disable_version_flag = true
)]
pub struct CliConfig {
    /// Input file, or `-` to read standard input
    pub input: String,

    /// Write records as JSON to this file, or `-` for standard output
    pub output: Option<String>,

    /// Don't print the records table
    #[arg(long = "no-print", action = ArgAction::SetFalse)]
    pub print: bool,

    /// Cell delimiter; a single ASCII character or `\t`
    #[arg(long, env = "CSVB_DELIMITER", default_value = ",")]
    pub delimiter: String,

    /// Log level for messages written to stderr (overridden by `RUST_LOG`)
    #[arg(long, value_enum, env = "CSVB_LOG_LEVEL", default_value = "warn")]
    pub log_level: LogLevel,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

impl CliConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tokenizer_config().map(|_| ())
    }

    /// Source selected by the `input` argument
    #[must_use]
    pub fn input(&self) -> Input {
        match self.input.as_str() {
            "-" => Input::Stdin,
            path => Input::File(PathBuf::from(path)),
        }
    }

    /// Destination selected by the `output` argument, if any
    #[must_use]
    pub fn output(&self) -> Option<Output> {
        self.output.as_deref().map(|output| match output {
            "-" => Output::Stdout,
            path => Output::File(PathBuf::from(path)),
        })
    }

    /// Tokenizer settings derived from the options
    pub fn tokenizer_config(&self) -> Result<TokenizerConfig, ConfigError> {
        let delimiter = match self.delimiter.as_str() {
            "\\t" => b'\t',
            d if d.len() == 1 && d.is_ascii() => d.as_bytes()[0],
            d => return Err(ConfigError::InvalidDelimiter(d.to_string())),
        };

        let config = TokenizerConfig::default();
        if delimiter == config.quote
            || Some(delimiter) == config.comment
            || delimiter == b'\n'
            || delimiter == b'\r'
        {
            return Err(ConfigError::ReservedDelimiter(char::from(delimiter)));
        }

        Ok(config.with_delimiter(delimiter))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(std::iter::once("csvb").chain(args.iter().copied()))
            .expect("Arguments should parse")
    }

    #[test]
    fn test_defaults() {
        let config = config(&["people.csvb"]);

        assert_eq!(config.input(), Input::File(PathBuf::from("people.csvb")));
        assert_eq!(config.output(), None);
        assert!(config.print);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(
            config.tokenizer_config().expect("Default delimiter is valid"),
            TokenizerConfig::default()
        );
    }

    #[test]
    fn test_stdin_stdout_and_no_print() {
        let config = config(&["-", "-", "--no-print"]);

        assert_eq!(config.input(), Input::Stdin);
        assert_eq!(config.output(), Some(Output::Stdout));
        assert!(!config.print);
    }

    #[test]
    fn test_delimiter_validation() {
        let tab = config(&["in", "--delimiter", "\\t"]);
        assert_eq!(
            tab.tokenizer_config().expect("Tab is valid").delimiter,
            b'\t'
        );

        let long = config(&["in", "--delimiter", "ab"]);
        assert_eq!(
            long.validate(),
            Err(ConfigError::InvalidDelimiter("ab".to_string()))
        );

        let quote = config(&["in", "--delimiter", "\""]);
        assert_eq!(quote.validate(), Err(ConfigError::ReservedDelimiter('"')));
    }

    #[test]
    fn test_input_is_required() {
        assert!(CliConfig::try_parse_from(["csvb"]).is_err());
    }
}
