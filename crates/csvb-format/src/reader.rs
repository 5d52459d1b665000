use crate::error::CsvbError;
use crate::record::Record;
use crate::schema::Schema;
use crate::tokenizer::{Tokenizer, TokenizerConfig};
use crate::transform::{BlockTransformer, Records};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Iterator of tokenized rows read line by line from a `BufRead` source
///
/// Comment lines are skipped; blank lines come out as block separator rows.
#[derive(Debug)]
pub struct RowReader<R> {
    reader: R,
    tokenizer: Tokenizer,
    line: String,
    line_number: u64,
}

impl<R: BufRead> RowReader<R> {
    /// Create a row reader with the default tokenizer settings
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, TokenizerConfig::default())
    }

    /// Create a row reader with explicit tokenizer settings
    pub fn with_config(reader: R, config: TokenizerConfig) -> Self {
        Self {
            reader,
            tokenizer: Tokenizer::new(config),
            line: String::new(),
            line_number: 0,
        }
    }

    /// Number of physical lines consumed so far
    #[must_use]
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Consume the row reader and return the underlying source
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> Iterator for RowReader<R> {
    type Item = Result<Vec<String>, CsvbError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => self.line_number += 1,
                Err(e) => return Some(Err(e.into())),
            }

            match self.tokenizer.tokenize(&self.line) {
                Ok(Some(row)) => return Some(Ok(row)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Reader producing typed records from CSV blocks text
pub type CsvbReader<R> = Records<RowReader<R>>;

impl<R: BufRead> Records<RowReader<R>> {
    /// Create a record reader from any `BufRead` source
    ///
    /// # Examples
    ///
    /// ```
    /// use csvb_format::{CsvbReader, Value};
    ///
    /// let input = "name,age:n\n\n,30\nada,\n";
    /// let records = CsvbReader::new(input.as_bytes()).collect::<Result<Vec<_>, _>>()?;
    ///
    /// assert_eq!(records.len(), 1);
    /// assert_eq!(records[0].get("name"), Some(&Value::String("ada".to_string())));
    /// assert_eq!(records[0].get("age"), Some(&Value::Number(30.0)));
    /// # Ok::<(), csvb_format::CsvbError>(())
    /// ```
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, TokenizerConfig::default())
    }

    /// Create a record reader with explicit tokenizer settings
    pub fn with_config(reader: R, config: TokenizerConfig) -> Self {
        BlockTransformer::new().transform(RowReader::with_config(reader, config))
    }

    /// Read the next record, `None` at end of input
    pub fn read_record(&mut self) -> Result<Option<Record>, CsvbError> {
        self.next().transpose()
    }
}

impl<'a> Records<RowReader<&'a [u8]>> {
    /// Create a reader from a byte slice
    #[must_use]
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl Records<RowReader<BufReader<File>>> {
    /// Create a reader from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

/// Parse a complete CSV blocks document from a string
pub fn parse(content: &str) -> Result<Vec<Record>, CsvbError> {
    CsvbReader::from_bytes(content.as_bytes()).collect()
}

/// Parse a complete CSV blocks document from any `BufRead` source
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Vec<Record>, CsvbError> {
    CsvbReader::new(reader).collect()
}

/// Parse only the schema from the first row of a document
///
/// Returns `None` for a document with no rows.
pub fn parse_schema(content: &str) -> Result<Option<Schema>, CsvbError> {
    RowReader::new(content.as_bytes())
        .next()
        .transpose()?
        .map(|header| Schema::from_header(&header))
        .transpose()
}
