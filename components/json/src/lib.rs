//! JSON values read and written with the as2js lexer
//!
//! # Overview
//!
//! - [`JsonValue`] - Shared handle to a JSON value with its position
//! - [`JsonReader`] - Reads JSON text, reporting errors to a message sink
//! - [`JsonError`] - Misuse of a value (wrong type, bad index, cycle)
//!
//! # Examples
//!
//! ```
//! use core_types::{Int64, MessageCollector};
//! use json::JsonReader;
//!
//! let mut sink = MessageCollector::new();
//! let config = JsonReader::new()
//!     .parse(r#"{"retries": 3, "hosts": ["a", "b"]}"#, &mut sink)
//!     .unwrap();
//!
//! config.set_member("retries", json::JsonValue::int64(config.get_position(), Int64::new(5))).unwrap();
//! assert_eq!(config.to_string().unwrap(), r#"{"hosts":["a","b"],"retries":5}"#);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod reader;
mod value;

pub use error::JsonError;
pub use reader::JsonReader;
pub use value::{JsonObject, JsonType, JsonValue};
