use crate::error::{Context, CsvbError};
use crate::schema::Schema;
use crate::types::Value;

/// Per-block fallback values, index-aligned with the schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defaults {
    values: Vec<Value>,
}

impl Defaults {
    /// Defaults in effect before the first block: every column absent
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the defaults row that opens a block
    ///
    /// Empty or missing cells leave that column's default absent. `context`
    /// is the location of the defaults row; the failing column is added to it.
    pub fn parse<S: AsRef<str>>(
        row: &[S],
        schema: &Schema,
        context: &Context,
    ) -> Result<Self, CsvbError> {
        let values = schema
            .columns()
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let raw = row.get(i).map(AsRef::as_ref);
                Value::coerce(raw, column.column_type, &Value::Absent).map_err(|e| {
                    context
                        .clone()
                        .with_column(column.name.as_str())
                        .error(e)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { values })
    }

    /// Default for column `index`; absent when unset or out of range
    #[must_use]
    pub fn get(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&Value::Absent)
    }

    /// All defaults in schema order; empty before the first block
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}
