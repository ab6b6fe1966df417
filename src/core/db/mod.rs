/// Database Module
///
/// This module provides the storage layer for emptrack, organized into
/// focused submodules.
///
/// ## Architecture
///
/// - **Connection Management** (`connection.rs`): the `Gateway` that owns the
///   single SQLite connection and its open/close lifecycle
/// - **Schema** (`schema.rs`): table definitions applied on open, and the
///   optional sample organization
/// - **Query Library** (`query.rs`): every read and write the action flows
///   issue, all parameterized
///
/// ## Error Handling
///
/// All database operations use the standardized `EmptrackError` type.
pub mod connection;
pub mod query;
pub mod schema;

pub use connection::*;
pub use query::*;
pub use schema::*;
