use crate::schema::Schema;
use crate::types::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One typed data row, keyed by the schema's column names
///
/// Holds exactly one value per schema column, in schema order. Columns with
/// neither a cell value nor a block default hold [`Value::Absent`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Shared schema of the file the record came from
    schema: Arc<Schema>,
    /// Values in schema order
    values: Vec<Value>,
}

impl Record {
    /// Create a record from values in schema order
    ///
    /// `values` holds exactly one value per column; cells missing from a
    /// row are already [`Value::Absent`] by the time a record is built.
    #[must_use]
    pub fn new(schema: Arc<Schema>, values: Vec<Value>) -> Self {
        debug_assert_eq!(values.len(), schema.len(), "one value per column");
        Self { schema, values }
    }

    /// Get value by column name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema
            .index_of(name)
            .and_then(|index| self.values.get(index))
    }

    /// Get value by column index
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Schema the record conforms to
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// All values in schema order
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Iterate `(column name, value)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .columns()
            .iter()
            .map(|column| column.name.as_str())
            .zip(&self.values)
    }

    /// Convert record to a map keyed by column name
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    /// Get the number of columns in this record
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the record has no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
