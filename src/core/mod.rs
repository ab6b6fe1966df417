/// Core Module for emptrack
///
/// Shared infrastructure: the database gateway and query library, the
/// record types they return, and the crate error type.

pub mod db;
pub mod error;
pub mod model;

// Re-export commonly used types for convenience
pub use error::{EmptrackError, Result};
