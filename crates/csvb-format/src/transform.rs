//! Block/row state machine turning tokenized rows into typed records

use crate::defaults::Defaults;
use crate::error::{Context, CsvbError, ErrorKind, RowPosition};
use crate::record::Record;
use crate::schema::Schema;
use crate::types::Value;
use std::sync::Arc;
use tracing::{debug, trace};

/// Dispatcher state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Waiting for the header row
    Header,
    /// Reading data rows; holds the 1-based number of the next row in the block
    Counting(usize),
    /// A separator was seen; the next row is the block's defaults row
    BlockBoundary,
}

/// Streaming transformer from rows of string cells to [`Record`]s
///
/// Rows are fed one at a time with [`push_row`](Self::push_row). The first
/// row is the header. A row made of a single empty cell starts a new block,
/// and the row after it holds that block's defaults. Every other row is data
/// and yields one record.
///
/// # Examples
///
/// ```
/// use csvb_format::{BlockTransformer, Value};
///
/// let mut transformer = BlockTransformer::new();
/// assert!(transformer.push_row(&["a:n", "b"])?.is_none());
/// assert!(transformer.push_row(&[""])?.is_none());
/// assert!(transformer.push_row(&["5", ""])?.is_none());
///
/// let record = transformer.push_row(&["", "hello"])?.expect("data row");
/// assert_eq!(record.get("a"), Some(&Value::Number(5.0)));
/// assert_eq!(record.get("b"), Some(&Value::String("hello".to_string())));
/// # Ok::<(), csvb_format::CsvbError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BlockTransformer {
    state: State,
    block: Option<u32>,
    schema: Option<Arc<Schema>>,
    defaults: Defaults,
    records_emitted: u64,
}

impl Default for BlockTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockTransformer {
    /// Create a transformer waiting for the header row
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Header,
            block: None,
            schema: None,
            defaults: Defaults::empty(),
            records_emitted: 0,
        }
    }

    /// Feed the next row
    ///
    /// Returns the record for data rows and `None` for header, separator and
    /// defaults rows. An error leaves the transformer unusable for the rest of
    /// the input; callers stop at the first one.
    pub fn push_row<S: AsRef<str>>(&mut self, row: &[S]) -> Result<Option<Record>, CsvbError> {
        match (self.state, self.schema.clone()) {
            (State::Header, _) | (_, None) => {
                let schema = Schema::from_header(row)?;
                debug!(columns = schema.len(), header = %schema.to_header(), "Parsed schema");
                self.schema = Some(Arc::new(schema));
                self.state = State::Counting(1);
                Ok(None)
            }
            _ if is_block_separator(row) => {
                let block = self.block.map_or(1, |b| b + 1);
                debug!(block, "Block separator");
                self.block = Some(block);
                self.state = State::BlockBoundary;
                Ok(None)
            }
            (State::BlockBoundary, Some(schema)) => {
                let context = self.context();
                check_width(row, &schema, &context)?;
                self.defaults = Defaults::parse(row, &schema, &context)?;
                debug!(block = ?self.block, defaults = ?self.defaults.values(), "Parsed block defaults");
                self.state = State::Counting(1);
                Ok(None)
            }
            (State::Counting(row_number), Some(schema)) => {
                let record = self.build_record(row, schema)?;
                trace!(block = ?self.block, row = row_number, "Emitting record");
                self.state = State::Counting(row_number + 1);
                self.records_emitted += 1;
                Ok(Some(record))
            }
        }
    }

    /// Adapt an iterator of rows into an iterator of records
    pub fn transform<I, S>(self, rows: I) -> Records<I::IntoIter>
    where
        I: IntoIterator<Item = Result<Vec<S>, CsvbError>>,
        S: AsRef<str>,
    {
        Records {
            rows: rows.into_iter(),
            transformer: self,
            finished: false,
        }
    }

    /// Current dispatcher state
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Current block number, `None` before the first separator
    #[must_use]
    pub fn block(&self) -> Option<u32> {
        self.block
    }

    /// Parsed schema, once the header row has been seen
    #[must_use]
    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.schema.as_ref()
    }

    /// Defaults of the current block
    #[must_use]
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Number of records produced so far
    #[must_use]
    pub fn records_emitted(&self) -> u64 {
        self.records_emitted
    }

    fn context(&self) -> Context {
        let row = match self.state {
            State::Header => RowPosition::Header,
            State::BlockBoundary => RowPosition::Defaults,
            State::Counting(n) => RowPosition::Row(n),
        };
        Context::new(self.block, row)
    }

    fn build_record<S: AsRef<str>>(
        &self,
        row: &[S],
        schema: Arc<Schema>,
    ) -> Result<Record, CsvbError> {
        let context = self.context();
        check_width(row, &schema, &context)?;

        let values = schema
            .columns()
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let raw = row.get(i).map(AsRef::as_ref);
                Value::coerce(raw, column.column_type, self.defaults.get(i)).map_err(|e| {
                    context
                        .clone()
                        .with_column(column.name.as_str())
                        .error(e)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Record::new(schema, values))
    }
}

/// A row made of exactly one empty cell
pub fn is_block_separator<S: AsRef<str>>(row: &[S]) -> bool {
    matches!(row, [only] if only.as_ref().is_empty())
}

fn check_width<S: AsRef<str>>(
    row: &[S],
    schema: &Schema,
    context: &Context,
) -> Result<(), CsvbError> {
    if row.len() > schema.len() {
        return Err(context.clone().error(ErrorKind::TooManyCells {
            expected: schema.len(),
            found: row.len(),
        }));
    }
    Ok(())
}

/// Iterator of records over an iterator of rows
///
/// Pulls one row at a time from the source, so nothing is buffered ahead of
/// the consumer. Fused after the first error or the end of the rows.
#[derive(Debug)]
pub struct Records<I> {
    rows: I,
    transformer: BlockTransformer,
    finished: bool,
}

impl<I> Records<I> {
    /// The transformer driving this iterator
    #[must_use]
    pub fn transformer(&self) -> &BlockTransformer {
        &self.transformer
    }

    /// Parsed schema, once the header row has been read
    #[must_use]
    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.transformer.schema()
    }

    /// The underlying row source
    pub fn get_ref(&self) -> &I {
        &self.rows
    }
}

impl<I, S> Iterator for Records<I>
where
    I: Iterator<Item = Result<Vec<S>, CsvbError>>,
    S: AsRef<str>,
{
    type Item = Result<Record, CsvbError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        for row in self.rows.by_ref() {
            match row.and_then(|row| self.transformer.push_row(&row)) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }

        self.finished = true;
        None
    }
}

impl<I, S> std::iter::FusedIterator for Records<I>
where
    I: Iterator<Item = Result<Vec<S>, CsvbError>>,
    S: AsRef<str>,
{
}
