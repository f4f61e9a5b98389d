//! Utility types and functions for the editor core.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Math re-exports from glam plus comparison and hashing helpers

mod error;
mod math;

pub use error::*;
pub use math::*;
