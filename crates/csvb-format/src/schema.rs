use crate::error::{Context, CsvbError, ErrorKind};
use crate::types::ColumnType;
use std::collections::HashMap;

/// A named, typed column from the header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,
    /// Declared column type
    pub column_type: ColumnType,
}

impl ColumnSpec {
    /// Create a new column
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    /// Parse a header cell like `age:n` or `name`
    ///
    /// Each part is trimmed. Errors carry the header context and, once known,
    /// the column name.
    pub fn parse(cell: &str) -> Result<Self, CsvbError> {
        let cell = cell.trim();
        if cell.is_empty() {
            return Err(Context::header().error(ErrorKind::EmptyHeaderCell));
        }

        let parts: Vec<&str> = cell.split(':').map(str::trim).collect();
        let name = parts[0];
        let located = || Context::header().with_column(name);

        if parts.len() > 2 {
            return Err(located().error(ErrorKind::TooManyHeaderParts(parts.len())));
        }
        if name.is_empty() {
            return Err(Context::header().error(ErrorKind::EmptyColumnName));
        }

        let column_type =
            ColumnType::from_token(parts.get(1).copied()).map_err(|kind| located().error(kind))?;

        Ok(Self::new(name, column_type))
    }

    /// Format the column back into header cell form
    #[must_use]
    pub fn to_spec(&self) -> String {
        match self.column_type {
            ColumnType::String => self.name.clone(),
            other => format!("{}:{}", self.name, other.token()),
        }
    }
}

/// Ordered column definitions parsed from the header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of columns
    columns: Vec<ColumnSpec>,
    /// Column name to index mapping for fast lookup
    column_map: HashMap<String, usize>,
}

impl Schema {
    /// Create a schema from columns
    ///
    /// Fails if two columns share a name.
    pub fn new(columns: Vec<ColumnSpec>) -> Result<Self, CsvbError> {
        let mut column_map = HashMap::with_capacity(columns.len());
        for (index, column) in columns.iter().enumerate() {
            if column_map.insert(column.name.clone(), index).is_some() {
                return Err(Context::header()
                    .with_column(column.name.as_str())
                    .error(ErrorKind::DuplicateColumn(column.name.clone())));
            }
        }

        Ok(Self {
            columns,
            column_map,
        })
    }

    /// Parse the schema from the cells of the header row
    ///
    /// # Examples
    ///
    /// ```
    /// use csvb_format::{ColumnType, Schema};
    ///
    /// let schema = Schema::from_header(&["name", "age:n", "member:bool"])?;
    /// assert_eq!(schema.len(), 3);
    /// assert_eq!(schema.get_by_name("age").map(|c| c.column_type), Some(ColumnType::Number));
    /// # Ok::<(), csvb_format::CsvbError>(())
    /// ```
    pub fn from_header<S: AsRef<str>>(cells: &[S]) -> Result<Self, CsvbError> {
        let columns = cells
            .iter()
            .map(|cell| ColumnSpec::parse(cell.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(columns)
    }

    /// Get the number of columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the schema has no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get column by index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ColumnSpec> {
        self.columns.get(index)
    }

    /// Get column by name
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&ColumnSpec> {
        self.column_map
            .get(name)
            .and_then(|&index| self.columns.get(index))
    }

    /// Get column index by name
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.column_map.get(name).copied()
    }

    /// Get all columns
    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Get column names in order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Format schema as a header line
    #[must_use]
    pub fn to_header(&self) -> String {
        self.columns
            .iter()
            .map(ColumnSpec::to_spec)
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::RowPosition;

    fn kind_of(err: &CsvbError) -> &ErrorKind {
        err.kind().expect("Located error expected")
    }

    #[test]
    fn test_parse_typed_and_bare_cells() {
        let column = ColumnSpec::parse("age:n").expect("Test operation should succeed");
        assert_eq!(column, ColumnSpec::new("age", ColumnType::Number));

        let column = ColumnSpec::parse("name").expect("Test operation should succeed");
        assert_eq!(column, ColumnSpec::new("name", ColumnType::String));

        let column = ColumnSpec::parse(" born : date ").expect("Test operation should succeed");
        assert_eq!(column, ColumnSpec::new("born", ColumnType::Date));
    }

    #[test]
    fn test_empty_header_cell() {
        let err = Schema::from_header(&["a", "", "c"]).expect_err("Empty cell must fail");
        assert_eq!(kind_of(&err), &ErrorKind::EmptyHeaderCell);
        assert_eq!(err.context().map(|c| c.row), Some(RowPosition::Header));
        assert_eq!(err.to_string(), "Unexpected empty header cell. At header.");
    }

    #[test]
    fn test_empty_column_name() {
        let err = ColumnSpec::parse(":n").expect_err("Nameless column must fail");
        assert_eq!(kind_of(&err), &ErrorKind::EmptyColumnName);
    }

    #[test]
    fn test_too_many_parts() {
        let err = ColumnSpec::parse("a:n:x").expect_err("Three parts must fail");
        assert_eq!(kind_of(&err), &ErrorKind::TooManyHeaderParts(3));
        assert_eq!(
            err.to_string(),
            "Expected max of 2 parts in header cell. Found 3. At header, column 'a'."
        );
    }

    #[test]
    fn test_unknown_type() {
        let err = ColumnSpec::parse("a:integer").expect_err("Unknown type must fail");
        assert_eq!(kind_of(&err), &ErrorKind::UnknownType("integer".to_string()));
        assert_eq!(err.to_string(), "Unexpected type 'integer'. At header, column 'a'.");

        let err = ColumnSpec::parse("a:").expect_err("Empty type must fail");
        assert_eq!(kind_of(&err), &ErrorKind::UnknownType(String::new()));
    }

    #[test]
    fn test_duplicate_column() {
        let err = Schema::from_header(&["a", "b:n", "a:s"]).expect_err("Duplicate must fail");
        assert_eq!(kind_of(&err), &ErrorKind::DuplicateColumn("a".to_string()));
    }

    #[test]
    fn test_schema_lookup() {
        let schema =
            Schema::from_header(&["name", "age:n", "ok:b"]).expect("Test operation should succeed");

        assert_eq!(schema.len(), 3);
        assert!(!schema.is_empty());
        assert_eq!(schema.index_of("age"), Some(1));
        assert_eq!(schema.index_of("missing"), None);
        assert_eq!(schema.get(2).map(|c| c.column_type), Some(ColumnType::Boolean));
        assert_eq!(schema.get(3), None);
        assert_eq!(schema.names(), vec!["name", "age", "ok"]);
    }

    #[test]
    fn test_schema_to_header() {
        let schema = Schema::from_header(&["name:str", "age:int", "born:d", "ok:bool"])
            .expect("Test operation should succeed");
        assert_eq!(schema.to_header(), "name,age:number,born:date,ok:boolean");
    }
}
