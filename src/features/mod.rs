//! Features - Vertical Feature Slices
//!
//! Each area turns reference data and loaded feeds into the rows its pages show.

pub mod business;
pub mod engineering;
pub mod filters;
pub mod forms;
pub mod operations;

pub use filters::PageFilters;
