//! UDF values and declared types
//!
//! A UDF element declares its type in the `type` attribute; the text is
//! decoded and encoded according to that declaration.

use crate::error::{BindError, Result};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Declared type of a UDF field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UdfType {
    String,
    Text,
    Numeric,
    Boolean,
    Date,
    Uri,
}

impl UdfType {
    /// Canonical spelling written to the `type` attribute
    pub const fn as_str(self) -> &'static str {
        match self {
            UdfType::String => "String",
            UdfType::Text => "Text",
            UdfType::Numeric => "Numeric",
            UdfType::Boolean => "Boolean",
            UdfType::Date => "Date",
            UdfType::Uri => "URI",
        }
    }
}

impl FromStr for UdfType {
    type Err = BindError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "string" | "str" => Ok(UdfType::String),
            "text" => Ok(UdfType::Text),
            "numeric" => Ok(UdfType::Numeric),
            "boolean" => Ok(UdfType::Boolean),
            "date" => Ok(UdfType::Date),
            "uri" => Ok(UdfType::Uri),
            _ => Err(BindError::UnsupportedType(s.to_string())),
        }
    }
}

impl fmt::Display for UdfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a UDF field
#[derive(Debug, Clone, PartialEq)]
pub enum UdfValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    /// Empty element text
    Null,
}

impl UdfValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            UdfValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            UdfValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value, integers widened
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            UdfValue::Int(i) => Some(*i as f64),
            UdfValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            UdfValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            UdfValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, UdfValue::Null)
    }

    /// Name of the value's variant, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            UdfValue::Text(_) => "text",
            UdfValue::Int(_) => "integer",
            UdfValue::Float(_) => "float",
            UdfValue::Bool(_) => "boolean",
            UdfValue::Date(_) => "date",
            UdfValue::Null => "null",
        }
    }

    /// Type given to a new field holding this value
    pub fn infer_type(&self) -> Result<UdfType> {
        match self {
            UdfValue::Text(s) if s.contains('\n') => Ok(UdfType::Text),
            UdfValue::Text(_) => Ok(UdfType::String),
            UdfValue::Bool(_) => Ok(UdfType::Boolean),
            UdfValue::Int(_) | UdfValue::Float(_) => Ok(UdfType::Numeric),
            UdfValue::Date(_) => Ok(UdfType::Date),
            UdfValue::Null => Err(BindError::UnencodableValue(
                "cannot infer a UDF type from null".to_string(),
            )),
        }
    }

    /// Decode element text declared as `ty`; empty text is `Null`
    pub fn decode(ty: UdfType, text: Option<&str>) -> Result<UdfValue> {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return Ok(UdfValue::Null);
        };
        match ty {
            UdfType::String | UdfType::Text | UdfType::Uri => Ok(UdfValue::Text(text.to_string())),
            UdfType::Numeric => text
                .trim()
                .parse::<i64>()
                .map(UdfValue::Int)
                .or_else(|_| text.trim().parse::<f64>().map(UdfValue::Float))
                .map_err(|_| BindError::ValueConversion {
                    text: text.to_string(),
                    target: "number",
                }),
            UdfType::Boolean => Ok(UdfValue::Bool(text == "true")),
            UdfType::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
                .map(UdfValue::Date)
                .map_err(|_| BindError::ValueConversion {
                    text: text.to_string(),
                    target: "date",
                }),
        }
    }

    /// Encode for a field declared as `ty`. `Null` encodes to no text.
    pub fn encode(&self, ty: UdfType, field: &str) -> Result<Option<String>> {
        let text = match (ty, self) {
            (_, UdfValue::Null) => return Ok(None),
            (UdfType::String | UdfType::Text | UdfType::Uri, UdfValue::Text(s)) => s.clone(),
            (UdfType::Numeric, UdfValue::Int(i)) => i.to_string(),
            (UdfType::Numeric, UdfValue::Float(f)) => format_float(*f),
            (UdfType::Boolean, UdfValue::Bool(b)) => b.to_string(),
            (UdfType::Date, UdfValue::Date(d)) => d.format(DATE_FORMAT).to_string(),
            (ty, value) => return Err(BindError::mismatch(field, ty.as_str(), value.type_name())),
        };
        Ok(Some(text))
    }
}

/// Floats keep a fractional part so they decode as floats again
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

impl From<&str> for UdfValue {
    fn from(s: &str) -> Self {
        UdfValue::Text(s.to_string())
    }
}

impl From<String> for UdfValue {
    fn from(s: String) -> Self {
        UdfValue::Text(s)
    }
}

impl From<i64> for UdfValue {
    fn from(i: i64) -> Self {
        UdfValue::Int(i)
    }
}

impl From<i32> for UdfValue {
    fn from(i: i32) -> Self {
        UdfValue::Int(i64::from(i))
    }
}

impl From<f64> for UdfValue {
    fn from(f: f64) -> Self {
        UdfValue::Float(f)
    }
}

impl From<bool> for UdfValue {
    fn from(b: bool) -> Self {
        UdfValue::Bool(b)
    }
}

impl From<NaiveDate> for UdfValue {
    fn from(d: NaiveDate) -> Self {
        UdfValue::Date(d)
    }
}

impl<T: Into<UdfValue>> From<Option<T>> for UdfValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(UdfValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_parsing() {
        assert_eq!("numeric".parse::<UdfType>().unwrap(), UdfType::Numeric);
        assert_eq!("Str".parse::<UdfType>().unwrap(), UdfType::String);
        assert_eq!("URI".parse::<UdfType>().unwrap(), UdfType::Uri);
        assert!(matches!("Blob".parse::<UdfType>(), Err(BindError::UnsupportedType(t)) if t == "Blob"));
    }

    #[test]
    fn test_inference() {
        assert_eq!(UdfValue::from("hello\nworld").infer_type().unwrap(), UdfType::Text);
        assert_eq!(UdfValue::from("hello").infer_type().unwrap(), UdfType::String);
        assert_eq!(UdfValue::from(42i64).infer_type().unwrap(), UdfType::Numeric);
        assert_eq!(UdfValue::from(0.5).infer_type().unwrap(), UdfType::Numeric);
        assert_eq!(UdfValue::from(true).infer_type().unwrap(), UdfType::Boolean);
        assert!(matches!(UdfValue::Null.infer_type(), Err(BindError::UnencodableValue(_))));
    }

    #[test]
    fn test_numeric_decoding() {
        assert_eq!(UdfValue::decode(UdfType::Numeric, Some("150")).unwrap(), UdfValue::Int(150));
        assert_eq!(UdfValue::decode(UdfType::Numeric, Some("1.5")).unwrap(), UdfValue::Float(1.5));
        assert!(matches!(
            UdfValue::decode(UdfType::Numeric, Some("n/a")),
            Err(BindError::ValueConversion { .. })
        ));
        assert_eq!(UdfValue::decode(UdfType::Numeric, Some("")).unwrap(), UdfValue::Null);
    }

    #[test]
    fn test_numeric_surrounding_whitespace() {
        assert_eq!(UdfValue::decode(UdfType::Numeric, Some(" 5 ")).unwrap(), UdfValue::Int(5));
        assert_eq!(UdfValue::decode(UdfType::Numeric, Some("\n2.5\t")).unwrap(), UdfValue::Float(2.5));
    }

    #[test]
    fn test_boolean_is_case_sensitive() {
        assert_eq!(UdfValue::decode(UdfType::Boolean, Some("true")).unwrap(), UdfValue::Bool(true));
        assert_eq!(UdfValue::decode(UdfType::Boolean, Some("True")).unwrap(), UdfValue::Bool(false));
    }

    #[test]
    fn test_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let text = UdfValue::Date(date).encode(UdfType::Date, "Received").unwrap();
        assert_eq!(text.as_deref(), Some("2024-03-09"));
        assert_eq!(UdfValue::decode(UdfType::Date, text.as_deref()).unwrap(), UdfValue::Date(date));
        assert!(UdfValue::decode(UdfType::Date, Some("09/03/2024")).is_err());
    }

    #[test]
    fn test_whole_float_keeps_fraction() {
        let text = UdfValue::Float(150.0).encode(UdfType::Numeric, "Conc").unwrap();
        assert_eq!(text.as_deref(), Some("150.0"));
        assert_eq!(UdfValue::decode(UdfType::Numeric, text.as_deref()).unwrap(), UdfValue::Float(150.0));
    }

    #[test]
    fn test_encode_mismatch() {
        let err = UdfValue::from("high").encode(UdfType::Numeric, "Conc").unwrap_err();
        assert!(matches!(err, BindError::TypeMismatch { field, .. } if field == "Conc"));
        assert_eq!(UdfValue::Null.encode(UdfType::Numeric, "Conc").unwrap(), None);
    }
}
