//! JSON-friendly serialization of values and records
//!
//! Records serialize as maps in schema order. Absent values are left out of
//! the map entirely, dates become ISO 8601 strings and integral numbers are
//! written without a fractional part.

use crate::record::Record;
use crate::types::{Value, format_date};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Largest magnitude at which every integer is exactly representable in `f64`
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Date(d) => serializer.serialize_str(&format_date(d)),
            Self::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
            Self::Absent => serializer.serialize_none(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present = self.iter().filter(|(_, value)| !value.is_absent());
        let mut map = serializer.serialize_map(None)?;
        for (name, value) in present {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
