//! Foundation types shared by the as2js components.
//!
//! This crate provides the small value types every other component
//! depends on: source positions, boxed numbers, the diagnostic channel and
//! the compiler options.
//!
//! # Overview
//!
//! - [`Position`] - Source location attached to every token and node
//! - [`Int64`] / [`Float64`] - Numbers with an "uninitialized" state
//! - [`CompareResult`] - Outcome of a comparison, including unordered
//! - [`Message`] / [`Messenger`] / [`MessageSink`] - Diagnostics
//! - [`Options`] - Compiler options
//!
//! # Examples
//!
//! ```
//! use core_types::{number_to_string, Float64, Position};
//!
//! let pos = Position::new("main.js");
//! assert_eq!(pos.to_string(), "main.js:1:");
//!
//! let f = Float64::new(0.1 + 0.2);
//! assert_eq!(number_to_string(f.get()), "0.30000000000000004");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod message;
mod numeric;
mod options;
mod position;

pub use message::{ErrCode, Message, MessageCollector, MessageLevel, MessageSink, Messenger};
pub use numeric::{
    nearly_equal, number_to_string, string_prefix_to_int64, string_to_number, CompareResult,
    Float64, Int64,
};
pub use options::{Options, OptionsError};
pub use position::Position;
