//! DataTable Component
//!
//! A reusable, renderer-agnostic table: typed columns, stable sort, search, and
//! pagination.

pub mod column;
pub mod data_provider;
pub mod pagination;
pub mod table;

pub use column::{CellValue, Column, ColumnWidth};
pub use data_provider::{DataProvider, VecDataProvider};
pub use pagination::Pagination;
pub use table::{DataTable, SortDirection, SortState, TableView};
