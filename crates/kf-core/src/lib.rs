//! kf-core: stable foundation for kineflow.
//!
//! Contains:
//! - numeric (finiteness, exact integrality, output grids)
//! - value (typed parsing of string-encoded settings)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod value;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use value::{Value, ValueType, parse_value, validate_str_value};
