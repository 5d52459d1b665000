//! Pull-based streams mirroring [`RowReader`](crate::RowReader) and
//! [`CsvbReader`](crate::CsvbReader) for tokio readers.
//!
//! Each stream polls its source only when polled itself, and ends after
//! yielding the first error.
//!
//! ```
//! use csvb_format::{Value, stream::record_stream};
//! use futures::TryStreamExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), csvb_format::CsvbError> {
//! let input: &[u8] = b"id:n,tag\n\n,none\n1,\n2,x\n";
//! let records: Vec<_> = record_stream(input).try_collect().await?;
//!
//! assert_eq!(records[0].get("tag"), Some(&Value::String("none".to_string())));
//! assert_eq!(records[1].get("tag"), Some(&Value::String("x".to_string())));
//! # Ok(())
//! # }
//! ```

use crate::error::CsvbError;
use crate::record::Record;
use crate::tokenizer::{Tokenizer, TokenizerConfig};
use crate::transform::BlockTransformer;
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// Stream of tokenized rows with the default tokenizer settings
pub fn row_stream<R>(reader: R) -> impl Stream<Item = Result<Vec<String>, CsvbError>>
where
    R: AsyncBufRead + Unpin,
{
    row_stream_with_config(reader, TokenizerConfig::default())
}

/// Stream of tokenized rows
///
/// Comment lines are skipped and blank lines come out as separator rows,
/// exactly like [`RowReader`](crate::RowReader).
pub fn row_stream_with_config<R>(
    reader: R,
    config: TokenizerConfig,
) -> impl Stream<Item = Result<Vec<String>, CsvbError>>
where
    R: AsyncBufRead + Unpin,
{
    let state = (reader.lines(), Tokenizer::new(config));
    stream::try_unfold(state, |(mut lines, mut tokenizer)| async move {
        let row = next_row(&mut lines, &mut tokenizer).await;
        row.map(|row| row.map(|row| (row, (lines, tokenizer))))
    })
}

/// Turn a stream of rows into a stream of records
pub fn transform_stream<St, S>(rows: St) -> impl Stream<Item = Result<Record, CsvbError>>
where
    St: Stream<Item = Result<Vec<S>, CsvbError>>,
    S: AsRef<str>,
{
    let state = (Box::pin(rows), BlockTransformer::new());
    stream::try_unfold(state, |(mut rows, mut transformer)| async move {
        let record = next_record(&mut rows, &mut transformer).await;
        record.map(|record| record.map(|record| (record, (rows, transformer))))
    })
}

/// Stream of records read from a tokio reader
pub fn record_stream<R>(reader: R) -> impl Stream<Item = Result<Record, CsvbError>>
where
    R: AsyncBufRead + Unpin,
{
    transform_stream(row_stream(reader))
}

/// Stream of records read from a tokio reader with explicit tokenizer settings
pub fn record_stream_with_config<R>(
    reader: R,
    config: TokenizerConfig,
) -> impl Stream<Item = Result<Record, CsvbError>>
where
    R: AsyncBufRead + Unpin,
{
    transform_stream(row_stream_with_config(reader, config))
}

async fn next_row<R>(
    lines: &mut Lines<R>,
    tokenizer: &mut Tokenizer,
) -> Result<Option<Vec<String>>, CsvbError>
where
    R: AsyncBufRead + Unpin,
{
    while let Some(line) = lines.next_line().await? {
        if let Some(row) = tokenizer.tokenize(&line)? {
            return Ok(Some(row));
        }
    }
    Ok(None)
}

async fn next_record<St, S>(
    rows: &mut Pin<Box<St>>,
    transformer: &mut BlockTransformer,
) -> Result<Option<Record>, CsvbError>
where
    St: Stream<Item = Result<Vec<S>, CsvbError>>,
    S: AsRef<str>,
{
    while let Some(row) = rows.next().await {
        if let Some(record) = transformer.push_row(&row?)? {
            return Ok(Some(record));
        }
    }
    Ok(None)
}
