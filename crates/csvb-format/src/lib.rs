//! Streaming parser for CSV blocks
//!
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::doc_markdown)] // Format terms don't need backticks
#![allow(clippy::float_cmp)] // Exact number values in tests
#![allow(clippy::return_self_not_must_use)] // Builder patterns
#![allow(clippy::missing_errors_doc)] // Every fallible operation returns CsvbError
#![allow(clippy::future_not_send)] // Streams inherit Send from their source
//! CSV blocks is CSV with a typed header and optional per-block defaults:
//!
//! ```text
//! name,age:n,member:b,joined:d
//! # records before the first separator have no defaults
//! ann,41,yes,2019-04-01
//!
//! ,,no,2021
//! bob,,,
//! cy,7,1,
//! ```
//!
//! - The first row is the header. Each cell is `name` or `name:type`, with
//!   type `b` (boolean), `d` (date), `n` (number) or `s` (string, the default).
//! - A blank line (a row made of one empty cell) starts a new block.
//! - The first row of a block holds defaults: any empty cell in the block's
//!   data rows takes the default of its column.
//! - Every other row is a data row and becomes one [`Record`].
//!
//! # Reading
//!
//! ```
//! use csvb_format::{parse, Value};
//!
//! let records = parse("name,age:n\n\n,30\nada,\nbea,12\n")?;
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].get("age"), Some(&Value::Number(30.0)));
//! assert_eq!(records[1].get("age"), Some(&Value::Number(12.0)));
//! # Ok::<(), csvb_format::CsvbError>(())
//! ```
//!
//! [`CsvbReader`] pulls one line at a time from any `BufRead`, and with the
//! `async` feature [`stream::record_stream`] does the same over a tokio
//! `AsyncBufRead`. With the `serde` feature records serialize to maps that
//! omit absent values.
//!
//! The first error stops parsing. Errors raised for a row carry its location
//! (block, row and column) in both the message and [`CsvbError::context`].

#![warn(missing_docs)]

mod defaults;
mod error;
mod reader;
mod record;
mod schema;
#[cfg(feature = "serde")]
mod serde_impl;
/// Async row and record streams over tokio readers
#[cfg(feature = "async")]
pub mod stream;
mod tokenizer;
mod transform;
mod types;

pub use defaults::Defaults;
pub use error::{Context, CsvbError, ErrorKind, Result, RowPosition, ValueError};
pub use reader::{CsvbReader, RowReader, parse, parse_reader, parse_schema};
pub use record::Record;
pub use schema::{ColumnSpec, Schema};
pub use tokenizer::{Tokenizer, TokenizerConfig};
pub use transform::{BlockTransformer, Records, State, is_block_separator};
pub use types::{ColumnType, Value, format_date};
