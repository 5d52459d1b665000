use crate::error::{ErrorKind, ValueError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use std::fmt;
use std::str::FromStr;

/// Column type declared by a header cell suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnType {
    /// `boolean`, `bool` or `b`
    Boolean,
    /// `date` or `d`
    Date,
    /// `number`, `num`, `int` or `n`
    Number,
    /// `string`, `str`, `s` or no suffix at all
    #[default]
    String,
}

impl ColumnType {
    /// Map a type token to a column type
    ///
    /// Tokens are case-sensitive. `None` (no suffix) is a string column.
    pub fn from_token(token: Option<&str>) -> Result<Self, ErrorKind> {
        match token {
            Some("boolean" | "bool" | "b") => Ok(Self::Boolean),
            Some("date" | "d") => Ok(Self::Date),
            Some("number" | "num" | "int" | "n") => Ok(Self::Number),
            None | Some("string" | "str" | "s") => Ok(Self::String),
            Some(other) => Err(ErrorKind::UnknownType(other.to_string())),
        }
    }

    /// Canonical type token
    #[must_use]
    pub fn token(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

impl FromStr for ColumnType {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(Some(s))
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A typed cell value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Boolean value
    Boolean(bool),
    /// Point in time, normalised to UTC
    Date(DateTime<Utc>),
    /// Numeric value
    Number(f64),
    /// Text value
    String(String),
    /// No value and no default
    #[default]
    Absent,
}

impl Value {
    /// Coerce a raw cell to `column_type`
    ///
    /// An empty or missing cell yields `fallback` unchanged, which may itself
    /// be [`Value::Absent`].
    ///
    /// # Examples
    ///
    /// ```
    /// use csvb_format::{ColumnType, Value};
    ///
    /// let v = Value::coerce(Some("Yes"), ColumnType::Boolean, &Value::Absent)?;
    /// assert_eq!(v, Value::Boolean(true));
    ///
    /// let v = Value::coerce(Some(""), ColumnType::Number, &Value::Number(5.0))?;
    /// assert_eq!(v, Value::Number(5.0));
    /// # Ok::<(), csvb_format::ValueError>(())
    /// ```
    pub fn coerce(
        raw: Option<&str>,
        column_type: ColumnType,
        fallback: &Self,
    ) -> Result<Self, ValueError> {
        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(fallback.clone()),
        };

        match column_type {
            ColumnType::Boolean => parse_bool(raw).map(Self::Boolean),
            ColumnType::Date => parse_date(raw).map(Self::Date),
            ColumnType::Number => parse_number(raw).map(Self::Number),
            ColumnType::String => Ok(Self::String(raw.to_string())),
        }
    }

    /// Check if this value is absent
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Get the boolean if this is a boolean
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the date if this is a date
    #[must_use]
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Get the number if this is a number
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the text if this is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Column type this value belongs to, `None` for absent values
    #[must_use]
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Self::Boolean(_) => Some(ColumnType::Boolean),
            Self::Date(_) => Some(ColumnType::Date),
            Self::Number(_) => Some(ColumnType::Number),
            Self::String(_) => Some(ColumnType::String),
            Self::Absent => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Date(d) => f.write_str(&format_date(d)),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Absent => Ok(()),
        }
    }
}

/// ISO 8601 form used for display and JSON: millisecond precision, `Z` suffix
#[must_use]
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_bool(raw: &str) -> Result<bool, ValueError> {
    match raw.to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Ok(true),
        "false" | "f" | "no" | "n" | "0" => Ok(false),
        _ => Err(ValueError::InvalidBool(raw.to_string())),
    }
}

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// `%B` also accepts abbreviated month names when parsing
const NAIVE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%d %B %Y",
];

fn parse_date(raw: &str) -> Result<DateTime<Utc>, ValueError> {
    if let Ok(d) = DateTime::parse_from_rfc3339(raw) {
        return Ok(d.with_timezone(&Utc));
    }
    if let Ok(d) = DateTime::parse_from_rfc2822(raw) {
        return Ok(d.with_timezone(&Utc));
    }
    // Offset given but with a space instead of `T`
    if let Ok(d) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(d.with_timezone(&Utc));
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(d) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(d.and_utc());
        }
    }
    for format in NAIVE_DATE_FORMATS {
        if let Some(d) = NaiveDate::parse_from_str(raw, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(d.and_utc());
        }
    }
    parse_partial_date(raw).ok_or_else(|| ValueError::InvalidDate(raw.to_string()))
}

/// `YYYY` and `YYYY-MM`, which resolve to the first day of the period
fn parse_partial_date(raw: &str) -> Option<DateTime<Utc>> {
    let (year, month) = match raw.split_once('-') {
        Some((year, month)) if month.len() == 2 => (year, month.parse::<u32>().ok()?),
        Some(_) => return None,
        None => (raw, 1),
    };
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

fn parse_number(raw: &str) -> Result<f64, ValueError> {
    let invalid = || ValueError::InvalidNumber(raw.to_string());

    let radix = match raw.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&raw[2..], radix)
            .map(|n| n as f64)
            .map_err(|_| invalid());
    }

    match raw.strip_prefix(['+', '-']).unwrap_or(raw) {
        "Infinity" => {
            return Ok(if raw.starts_with('-') {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            });
        }
        // f64::from_str accepts "inf", "infinity" and "nan" in any case
        digits if digits.starts_with(|c: char| c.is_ascii_alphabetic()) => return Err(invalid()),
        _ => {}
    }

    raw.parse::<f64>().map_err(|_| invalid())
}
