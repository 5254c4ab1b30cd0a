//! Shared helpers for step definitions

pub mod table_conversion;
