//! Table-specific database operations, one module per table.

pub mod notes;
