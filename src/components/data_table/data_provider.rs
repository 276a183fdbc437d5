//! DataProvider Trait
//!
//! Abstraction over row storage so the table can read from owned vectors or
//! from shared snapshots handed out by the workspace.

use std::sync::Arc;

/// Trait for providing data to the DataTable
pub trait DataProvider {
    type Row: Clone;

    /// Get the total number of rows
    fn len(&self) -> usize;

    /// Check if empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a row by index
    fn row(&self, index: usize) -> Option<Self::Row>;

    /// Get multiple rows in a range
    fn rows(&self, range: std::ops::Range<usize>) -> Vec<Self::Row> {
        range.filter_map(|i| self.row(i)).collect()
    }
}

/// Simple in-memory data provider
#[derive(Debug, Clone)]
pub struct VecDataProvider<R> {
    rows: Arc<Vec<R>>,
}

impl<R: Clone> VecDataProvider<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows: Arc::new(rows),
        }
    }

    /// Create from a shared reference
    pub fn from_arc(rows: Arc<Vec<R>>) -> Self {
        Self { rows }
    }

    pub fn all(&self) -> &[R] {
        &self.rows
    }
}

impl<R: Clone> DataProvider for VecDataProvider<R> {
    type Row = R;

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, index: usize) -> Option<Self::Row> {
        self.rows.get(index).cloned()
    }
}

impl<R: Clone> DataProvider for [R] {
    type Row = R;

    fn len(&self) -> usize {
        <[R]>::len(self)
    }

    fn row(&self, index: usize) -> Option<Self::Row> {
        self.get(index).cloned()
    }
}
