//! Error types for reading and writing entity documents.

use crate::core::tokenizer::ParseError;
use thiserror::Error;

/// Errors raised by descriptors, proxies and entity stores
#[derive(Debug, Error)]
pub enum BindError {
    /// A required attribute is absent.
    #[error("<{element}> has no '{attribute}' attribute")]
    MissingAttribute { element: String, attribute: String },

    /// A fixed inner element of a structured value is absent.
    #[error("<{parent}> has no <{tag}> child")]
    MissingElement { parent: String, tag: String },

    /// Element text could not be parsed as the declared scalar type.
    #[error("cannot convert '{text}' to {target}")]
    ValueConversion { text: String, target: &'static str },

    /// The assigned value does not fit the field's declared encoding.
    #[error("field '{field}' expects {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// Unrecognized declared type string.
    #[error("unsupported UDF type '{0}'")]
    UnsupportedType(String),

    /// The value has no serialization rule.
    #[error("cannot encode value: {0}")]
    UnencodableValue(String),

    /// A mutation needs structure that does not exist yet.
    #[error("structural error: {0}")]
    Structural(String),

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The entity has no document after refresh.
    #[error("entity {0} is not loaded")]
    NotLoaded(String),

    #[error("XML parse error: {0}")]
    Parse(#[from] ParseError),

    /// Entity store failure.
    #[error("store error: {0}")]
    Store(String),
}

/// Result type for binding operations.
pub type Result<T> = std::result::Result<T, BindError>;

impl BindError {
    pub(crate) fn mismatch(field: &str, expected: impl Into<String>, found: impl Into<String>) -> Self {
        BindError::TypeMismatch {
            field: field.to_string(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn missing_attribute(element: &str, attribute: &str) -> Self {
        BindError::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }
}
