//! Value mapping between MySQL and the JSON row representation
//! This crate provides the conversions used across the querykit ecosystem

pub mod bind;
pub mod decode;
pub mod sql;
pub mod types;

pub use bind::bind_value;
pub use decode::decode_row;
pub use sql::{escape_literal, literal_text, quoted_literal};
pub use types::{Row, is_scalar, value_kind};
