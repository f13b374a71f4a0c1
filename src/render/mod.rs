//! Serialization of processing results.

mod json;

pub use json::{to_json, write_json, JsonFormat};
