//! XML Reader Module
//!
//! - SliceReader: pull reader over a byte slice
//! - Events: XML event types consumed by the DOM builder

pub mod events;
pub mod slice;
