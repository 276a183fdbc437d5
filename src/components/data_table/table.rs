//! DataTable
//!
//! Headless table state: column set, sort, search query, and page. `view` turns a
//! row provider into the rows a renderer should draw, in order.

use super::column::Column;
use super::data_provider::DataProvider;
use super::pagination::Pagination;
use crate::constants::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: &'static str,
    pub direction: SortDirection,
}

type FilterFn<R> = Box<dyn Fn(&R, &str) -> bool + Send + Sync>;

/// Rows to draw for the current table state
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<R> {
    pub rows: Vec<R>,
    /// Rows left after filtering, before paging
    pub matched: usize,
    pub pagination: Pagination,
}

pub struct DataTable<R> {
    columns: Vec<Column<R>>,
    sort: Option<SortState>,
    query: String,
    filter: Option<FilterFn<R>>,
    page: usize,
    page_size: usize,
    empty_message: &'static str,
}

impl<R: Clone> DataTable<R> {
    pub fn new(columns: Vec<Column<R>>) -> Self {
        Self {
            columns,
            sort: None,
            query: String::new(),
            filter: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            empty_message: "No results yet.",
        }
    }

    /// Replace the default "any column contains" search with a custom matcher.
    /// The matcher receives the lowercased query.
    pub fn with_filter(
        mut self,
        filter: impl Fn(&R, &str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_empty_message(mut self, message: &'static str) -> Self {
        self.empty_message = message;
        self
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn empty_message(&self) -> &'static str {
        self.empty_message
    }

    /// Cycle a column through ascending, descending, unsorted.
    /// Returns false for unknown or unsortable columns.
    pub fn toggle_sort(&mut self, column: &str) -> bool {
        let Some(col) = self.columns.iter().find(|c| c.id == column && c.sortable) else {
            return false;
        };
        self.sort = match self.sort {
            Some(SortState {
                column: current,
                direction: SortDirection::Ascending,
            }) if current == col.id => Some(SortState {
                column: col.id,
                direction: SortDirection::Descending,
            }),
            Some(SortState {
                column: current,
                direction: SortDirection::Descending,
            }) if current == col.id => None,
            _ => Some(SortState {
                column: col.id,
                direction: SortDirection::Ascending,
            }),
        };
        true
    }

    /// New query; jumps back to the first page
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    fn matches(&self, row: &R, needle: &str) -> bool {
        match &self.filter {
            Some(filter) => filter(row, needle),
            None => self
                .columns
                .iter()
                .any(|c| c.render_cell(row).to_lowercase().contains(needle)),
        }
    }

    pub fn view<P: DataProvider<Row = R> + ?Sized>(&self, provider: &P) -> TableView<R> {
        let mut rows = provider.rows(0..provider.len());

        let needle = self.query.trim().to_lowercase();
        if !needle.is_empty() {
            rows.retain(|row| self.matches(row, &needle));
        }

        if let Some(sort) = self.sort
            && let Some(col) = self.columns.iter().find(|c| c.id == sort.column)
        {
            // sort_by is stable: equal keys keep provider order
            rows.sort_by(|a, b| {
                let ord = col.value(a).compare(&col.value(b));
                match sort.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        let matched = rows.len();
        let pagination = Pagination::new(self.page, self.page_size, matched);
        let page_rows = rows.drain(pagination.range()).collect();
        TableView {
            rows: page_rows,
            matched,
            pagination,
        }
    }
}

impl<R> std::fmt::Debug for DataTable<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("columns", &self.columns)
            .field("sort", &self.sort)
            .field("query", &self.query)
            .field("page", &self.page)
            .finish()
    }
}
