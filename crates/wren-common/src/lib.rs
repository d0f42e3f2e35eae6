//! Shared foundation for the wren widget framework.
//!
//! This crate provides the pieces every other wren crate depends on:
//! - **Property values** - the value space of logical widget properties
//! - **Boolean coercion** - the lenient and strict conversion policies
//! - **Property paths** - colon-delimited logical property identifiers
//! - **Logging** - warning/error reporting helpers built on `tracing`

pub mod boolean;
pub mod logging;
pub mod path;
pub mod value;

pub use boolean::{field_value_to_boolean, field_value_to_tristate, to_boolean};
pub use path::{PropPath, normalize_trigger_name};
pub use value::{DeltaValue, FormatError, ValRepItem, Value};
