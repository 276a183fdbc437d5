//! Components - Reusable View Models
//!
//! Renderer-agnostic building blocks that don't depend on services or do I/O.

pub mod data_table;
