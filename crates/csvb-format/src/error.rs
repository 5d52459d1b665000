//! Error types and location context for CSV blocks parsing
//!
//! Every failure the transformer detects is reported once, as
//! [`CsvbError::Located`], carrying the block, row and column where it
//! happened. The rendered message follows the pattern
//! `<base message>. At [block N, ]<row N | header | defaults>[, column 'name'].`

use std::fmt;
use thiserror::Error;

/// Result type for CSV blocks operations
pub type Result<T> = std::result::Result<T, CsvbError>;

/// Malformed literal for a typed column
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Not one of the recognised boolean spellings
    #[error("Unexpected bool value '{0}'")]
    InvalidBool(String),

    /// Not a recognised date or date-time
    #[error("Not a date: '{0}'")]
    InvalidDate(String),

    /// Not a numeric literal
    #[error("Not a number: '{0}'")]
    InvalidNumber(String),
}

/// What went wrong, without the location
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A header cell is empty
    #[error("Unexpected empty header cell")]
    EmptyHeaderCell,

    /// A header cell has a type suffix but no name (`:n`)
    #[error("Unexpected empty column name")]
    EmptyColumnName,

    /// A header cell has more than one `:` separated suffix
    #[error("Expected max of 2 parts in header cell. Found {0}")]
    TooManyHeaderParts(usize),

    /// Type suffix is not a known column type
    #[error("Unexpected type '{0}'")]
    UnknownType(String),

    /// Two header cells share a name
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// A defaults or data row is wider than the header
    #[error("Expected at most {expected} cells in row. Found {found}")]
    TooManyCells {
        /// Number of schema columns
        expected: usize,
        /// Number of cells in the offending row
        found: usize,
    },

    /// A cell could not be coerced to its column type
    #[error(transparent)]
    Value(#[from] ValueError),
}

impl ErrorKind {
    /// Whether this is a structural error (schema or row shape) rather than a
    /// bad value
    #[must_use]
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::Value(_))
    }
}

/// Row position component of a [`Context`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPosition {
    /// Parsing the header row
    Header,
    /// Parsing the defaults row of a block
    Defaults,
    /// Parsing a data row; 1-based within the current block
    Row(usize),
}

impl fmt::Display for RowPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => f.write_str("header"),
            Self::Defaults => f.write_str("defaults"),
            Self::Row(n) => write!(f, "row {n}"),
        }
    }
}

/// Location attached to an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Current block number, `None` until the first block separator
    pub block: Option<u32>,
    /// Row number or parsing phase
    pub row: RowPosition,
    /// Column being processed, if any
    pub column: Option<String>,
}

impl Context {
    /// Context for the header row
    #[must_use]
    pub fn header() -> Self {
        Self {
            block: None,
            row: RowPosition::Header,
            column: None,
        }
    }

    /// Create a context for a position inside the body of the file
    #[must_use]
    pub fn new(block: Option<u32>, row: RowPosition) -> Self {
        Self {
            block,
            row,
            column: None,
        }
    }

    /// Narrow the context to a column
    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Attach this location to an error kind
    #[must_use]
    pub fn error(self, kind: impl Into<ErrorKind>) -> CsvbError {
        CsvbError::Located {
            kind: kind.into(),
            context: self,
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(block) = self.block {
            write!(f, "block {block}, ")?;
        }
        write!(f, "{}", self.row)?;
        if let Some(column) = &self.column {
            write!(f, ", column '{column}'")?;
        }
        Ok(())
    }
}

/// Errors produced while reading CSV blocks
#[derive(Debug, Error)]
pub enum CsvbError {
    /// Schema, row shape or value error with its location
    #[error("{kind}. At {context}.")]
    Located {
        /// What went wrong
        kind: ErrorKind,
        /// Where it went wrong
        context: Context,
    },

    /// Reading the input failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The row tokenizer rejected a line
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl CsvbError {
    /// The error kind, for located errors
    #[must_use]
    pub fn kind(&self) -> Option<&ErrorKind> {
        match self {
            Self::Located { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// The error location, for located errors
    #[must_use]
    pub fn context(&self) -> Option<&Context> {
        match self {
            Self::Located { context, .. } => Some(context),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_header_context_message() {
        let err = Context::header()
            .with_column("age")
            .error(ErrorKind::UnknownType("q".to_string()));
        assert_eq!(err.to_string(), "Unexpected type 'q'. At header, column 'age'.");
    }

    #[test]
    fn test_block_is_omitted_before_first_separator() {
        let err = Context::new(None, RowPosition::Row(3))
            .with_column("n")
            .error(ValueError::InvalidNumber("x".to_string()));
        assert_eq!(err.to_string(), "Not a number: 'x'. At row 3, column 'n'.");
    }

    #[test]
    fn test_block_and_defaults_phase() {
        let err = Context::new(Some(2), RowPosition::Defaults)
            .with_column("flag")
            .error(ValueError::InvalidBool("maybe".to_string()));
        assert_eq!(
            err.to_string(),
            "Unexpected bool value 'maybe'. At block 2, defaults, column 'flag'."
        );
    }

    #[test]
    fn test_context_without_column() {
        let err = Context::new(Some(1), RowPosition::Row(4)).error(ErrorKind::TooManyCells {
            expected: 2,
            found: 3,
        });
        assert_eq!(
            err.to_string(),
            "Expected at most 2 cells in row. Found 3. At block 1, row 4."
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(ErrorKind::EmptyHeaderCell.is_structural());
        assert!(ErrorKind::TooManyHeaderParts(3).is_structural());
        assert!(!ErrorKind::Value(ValueError::InvalidDate("x".to_string())).is_structural());
    }

    #[test]
    fn test_accessors() {
        let err = Context::header().error(ErrorKind::EmptyHeaderCell);
        assert_eq!(err.kind(), Some(&ErrorKind::EmptyHeaderCell));
        assert_eq!(err.context().map(|c| c.row), Some(RowPosition::Header));

        let io = CsvbError::from(std::io::Error::other("boom"));
        assert!(io.kind().is_none());
        assert!(io.context().is_none());
    }
}
