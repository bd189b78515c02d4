//! Layout model for fixwidth
//!
//! A layout describes how to cut one line of a fixed-width file into fields:
//! each field has a name, a character offset, a length and a data type. Layouts
//! are validated when they are built, whether from code or from a layout file,
//! so an import never sees an empty field list, a duplicate column name, a
//! zero-length field or an unknown encoding.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FixwidthError, FixwidthResult};
use crate::source::resolve_encoding;
use crate::table::Value;

/// Encoding used when a layout does not name one
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Data type of a field, selecting the coercion applied to its slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Text, kept verbatim including padding
    #[default]
    #[serde(alias = "string")]
    Str,
    /// 64-bit signed integer
    #[serde(alias = "integer", alias = "int64")]
    Int,
    /// 64-bit floating point number
    #[serde(alias = "float64", alias = "double")]
    Float,
    /// Boolean flag
    #[serde(alias = "boolean")]
    Bool,
}

impl DataType {
    /// Convert a raw slice to a value of this type
    ///
    /// Numeric and boolean parsing ignore surrounding whitespace, and a slice
    /// that is blank after trimming is a missing value. `None` means the slice
    /// holds something that is not a value of this type.
    pub fn coerce(self, raw: &str) -> Option<Value> {
        let trimmed = raw.trim();
        if self != DataType::Str && trimmed.is_empty() {
            return Some(Value::Null);
        }

        match self {
            DataType::Str => Some(Value::String(raw.to_string())),
            DataType::Int => trimmed.parse::<i64>().ok().map(Value::Integer),
            DataType::Float => trimmed.parse::<f64>().ok().map(Value::Float),
            DataType::Bool => match trimmed.to_lowercase().as_str() {
                "true" | "t" | "yes" | "y" | "1" => Some(Value::Boolean(true)),
                "false" | "f" | "no" | "n" | "0" => Some(Value::Boolean(false)),
                _ => None,
            },
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            DataType::Str => "str",
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Bool => "bool",
        };
        f.write_str(tag)
    }
}

/// One field of a layout: the half-open character range `[start, start + length)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawField")]
pub struct FieldDefinition {
    name: String,
    start: usize,
    length: usize,
    dtype: DataType,
}

#[derive(Deserialize)]
struct RawField {
    name: String,
    start: usize,
    length: usize,
    #[serde(default)]
    dtype: DataType,
}

impl TryFrom<RawField> for FieldDefinition {
    type Error = FixwidthError;

    fn try_from(raw: RawField) -> FixwidthResult<Self> {
        FieldDefinition::new(&raw.name, raw.start, raw.length, raw.dtype)
    }
}

impl FieldDefinition {
    /// Create a field definition
    ///
    /// # Arguments
    /// * `name` - Column name for this field, unique within its layout
    /// * `start` - 0-based character offset of the first character
    /// * `length` - Number of characters, at least one
    /// * `dtype` - Type the slice is coerced to
    ///
    /// # Returns
    /// * `Err(InvalidLayout)` for an empty name, a zero length, or a range
    ///   whose end does not fit in `usize`
    pub fn new(name: &str, start: usize, length: usize, dtype: DataType) -> FixwidthResult<Self> {
        if name.is_empty() {
            return Err(FixwidthError::InvalidLayout(
                "field name must not be empty".to_string(),
            ));
        }
        if length == 0 {
            return Err(FixwidthError::InvalidLayout(format!(
                "field '{}' must have a positive length",
                name
            )));
        }
        if start.checked_add(length).is_none() {
            return Err(FixwidthError::InvalidLayout(format!(
                "field '{}' ends past the largest addressable offset",
                name
            )));
        }

        Ok(FieldDefinition {
            name: name.to_string(),
            start,
            length,
            dtype,
        })
    }

    /// Shorthand for a text field
    pub fn text(name: &str, start: usize, length: usize) -> FixwidthResult<Self> {
        Self::new(name, start, length, DataType::Str)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Exclusive end offset
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    /// Cut this field out of a line
    ///
    /// Offsets count characters, not bytes. The range is clamped to the line,
    /// so a short line yields a shorter or empty slice instead of an error.
    pub fn slice<'a>(&self, line: &'a str) -> &'a str {
        let begin = char_offset(line, self.start);
        let rest = &line[begin..];
        &rest[..char_offset(rest, self.length)]
    }
}

/// Byte offset of the `n`th character, or the string length if there are fewer
fn char_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}

/// A complete fixed-width layout
///
/// Field order is column order. Slices may overlap or leave gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLayout")]
pub struct LayoutDefinition {
    fields: Vec<FieldDefinition>,
    encoding: String,
    skip_rows: usize,
}

#[derive(Deserialize)]
struct RawLayout {
    fields: Vec<FieldDefinition>,
    #[serde(default = "default_encoding")]
    encoding: String,
    #[serde(default)]
    skip_rows: usize,
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

impl TryFrom<RawLayout> for LayoutDefinition {
    type Error = FixwidthError;

    fn try_from(raw: RawLayout) -> FixwidthResult<Self> {
        LayoutDefinition::with_options(raw.fields, &raw.encoding, raw.skip_rows)
    }
}

impl LayoutDefinition {
    /// Create a UTF-8 layout with no header lines
    pub fn new(fields: Vec<FieldDefinition>) -> FixwidthResult<Self> {
        Self::with_options(fields, DEFAULT_ENCODING, 0)
    }

    /// Create a layout with an explicit encoding and header-skip count
    ///
    /// # Returns
    /// * `Err(InvalidLayout)` for an empty field list or duplicate field names
    /// * `Err(UnknownEncoding)` when `encoding` is not a recognized label
    pub fn with_options(
        fields: Vec<FieldDefinition>,
        encoding: &str,
        skip_rows: usize,
    ) -> FixwidthResult<Self> {
        if fields.is_empty() {
            return Err(FixwidthError::InvalidLayout(
                "layout must define at least one field".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(FixwidthError::InvalidLayout(format!(
                    "duplicate field name '{}'",
                    field.name()
                )));
            }
        }

        resolve_encoding(encoding)?;

        Ok(LayoutDefinition {
            fields,
            encoding: encoding.to_string(),
            skip_rows,
        })
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Encoding label as declared
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn skip_rows(&self) -> usize {
        self.skip_rows
    }

    /// Field names in column order
    pub fn column_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name().to_string()).collect()
    }

    /// Width of the widest record this layout reads
    pub fn record_width(&self) -> usize {
        self.fields.iter().map(FieldDefinition::end).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_clamps_to_line() {
        let field = FieldDefinition::text("tail", 4, 10).unwrap();
        assert_eq!(field.slice("abcdefg"), "efg");
        assert_eq!(field.slice("abc"), "");
        assert_eq!(field.slice(""), "");
    }

    #[test]
    fn test_slice_counts_characters() {
        let field = FieldDefinition::text("city", 2, 4).unwrap();
        assert_eq!(field.slice("01São Paulo"), "São ");
    }

    #[test]
    fn test_coerce_numeric_ignores_padding() {
        assert_eq!(DataType::Int.coerce("00042"), Some(Value::Integer(42)));
        assert_eq!(DataType::Int.coerce("  -7 "), Some(Value::Integer(-7)));
        assert_eq!(DataType::Float.coerce(" 123.45"), Some(Value::Float(123.45)));
        assert_eq!(DataType::Int.coerce("   "), Some(Value::Null));
        assert_eq!(DataType::Int.coerce("12a"), None);
        assert_eq!(DataType::Int.coerce("1.5"), None);
    }

    #[test]
    fn test_coerce_str_keeps_padding() {
        assert_eq!(
            DataType::Str.coerce("John      "),
            Some(Value::String("John      ".to_string()))
        );
        assert_eq!(DataType::Str.coerce(""), Some(Value::String(String::new())));
    }

    #[test]
    fn test_coerce_bool() {
        assert_eq!(DataType::Bool.coerce(" Y"), Some(Value::Boolean(true)));
        assert_eq!(DataType::Bool.coerce("false"), Some(Value::Boolean(false)));
        assert_eq!(DataType::Bool.coerce("maybe"), None);
    }

    #[test]
    fn test_field_validation() {
        assert!(FieldDefinition::text("", 0, 1).is_err());
        assert!(FieldDefinition::text("x", 0, 0).is_err());
        assert!(FieldDefinition::text("x", usize::MAX, 1).is_err());
        assert_eq!(FieldDefinition::text("x", 3, 4).unwrap().end(), 7);
    }

    #[test]
    fn test_layout_validation() {
        assert!(matches!(
            LayoutDefinition::new(vec![]),
            Err(FixwidthError::InvalidLayout(_))
        ));

        let dup = vec![
            FieldDefinition::text("a", 0, 2).unwrap(),
            FieldDefinition::text("a", 2, 2).unwrap(),
        ];
        assert!(matches!(
            LayoutDefinition::new(dup),
            Err(FixwidthError::InvalidLayout(_))
        ));

        let fields = vec![FieldDefinition::text("a", 0, 2).unwrap()];
        assert!(matches!(
            LayoutDefinition::with_options(fields, "klingon", 0),
            Err(FixwidthError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_deserialize_applies_defaults_and_validation() {
        let layout: LayoutDefinition = serde_json::from_str(
            r#"{"fields": [{"name": "id", "start": 0, "length": 5, "dtype": "int"},
                           {"name": "name", "start": 5, "length": 10}]}"#,
        )
        .unwrap();
        assert_eq!(layout.encoding(), "utf-8");
        assert_eq!(layout.skip_rows(), 0);
        assert_eq!(layout.fields()[1].dtype(), DataType::Str);
        assert_eq!(layout.record_width(), 15);

        let bad_dtype = serde_json::from_str::<LayoutDefinition>(
            r#"{"fields": [{"name": "id", "start": 0, "length": 5, "dtype": "decimal"}]}"#,
        );
        assert!(bad_dtype.is_err());

        let zero_length = serde_json::from_str::<LayoutDefinition>(
            r#"{"fields": [{"name": "id", "start": 0, "length": 0}]}"#,
        );
        assert!(zero_length.is_err());
    }
}
