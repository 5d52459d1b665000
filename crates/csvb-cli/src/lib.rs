//! Command-line front end for CSV blocks files.
//!
//! Reads a whole CSV blocks document from a file or standard input, prints
//! the records as a table and optionally writes them as JSON.
//!
//! ```text
//! csvb people.csvb              # print a table
//! csvb people.csvb out.json     # print a table and write JSON to out.json
//! cat people.csvb | csvb - - --no-print > out.json
//! ```
//!
//! Parsing is all-or-nothing: nothing is printed or written unless the whole
//! input parses.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config;
pub mod error;
pub mod output;

pub use config::{CliConfig, Input, LogLevel, Output};
pub use error::{ConfigError, InputError};

use anyhow::Result;
use csvb_format::{CsvbError, Record, TokenizerConfig, stream::record_stream_with_config};
use futures::TryStreamExt;
use std::io::IsTerminal;
use std::path::Path;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{debug, info};

/// Run the tool with validated configuration
pub async fn run(config: &CliConfig) -> Result<()> {
    let tokenizer = config.tokenizer_config()?;
    let records = read_records(&config.input(), tokenizer).await?;
    info!(records = records.len(), "Parsed input");

    if config.print {
        let table = output::records_table(&records, output::OutputStyle::default());
        println!("{table}");
    }

    match config.output() {
        Some(Output::Stdout) => output::write_json_stdout(&records)?,
        Some(Output::File(path)) => {
            output::write_json_file(&records, &path)?;
            debug!(path = %path.display(), "Wrote JSON");
        }
        None => {}
    }

    Ok(())
}

/// Read every record from the input, failing on the first error
pub async fn read_records(input: &Input, config: TokenizerConfig) -> Result<Vec<Record>> {
    match input {
        Input::Stdin => {
            if std::io::stdin().is_terminal() {
                return Err(InputError::NoStdin.into());
            }
            debug!("Reading standard input");
            Ok(collect(BufReader::new(tokio::io::stdin()), config).await?)
        }
        Input::File(path) => {
            let file = open_file(path).await?;
            debug!(path = %path.display(), "Reading file");
            Ok(collect(BufReader::new(file), config).await?)
        }
    }
}

async fn open_file(path: &Path) -> Result<tokio::fs::File, InputError> {
    let open_error = |source| InputError::Open {
        path: path.display().to_string(),
        source,
    };

    let metadata = tokio::fs::metadata(path).await.map_err(open_error)?;
    if !metadata.is_file() {
        return Err(InputError::NotAFile(path.display().to_string()));
    }
    tokio::fs::File::open(path).await.map_err(open_error)
}

async fn collect<R>(reader: R, config: TokenizerConfig) -> Result<Vec<Record>, CsvbError>
where
    R: AsyncBufRead + Unpin,
{
    record_stream_with_config(reader, config).try_collect().await
}
