//! Core XML parsing primitives
//!
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Tokenizer: State machine for XML token extraction
//! - Entities: entity decoding (Cow, zero-copy when possible) and output escaping
//! - Attributes: attribute parsing for start tags

pub mod attributes;
pub mod entities;
pub mod scanner;
pub mod tokenizer;
