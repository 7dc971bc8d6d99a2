use std::cmp::Ordering;
use std::collections::HashSet;

use log::debug;
use ustr::Ustr;

use super::{CellValue, ColumnDescriptor, TableConfig, TableRow, format};
use crate::locale::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    Descending,
    #[default]
    None,
}

/// Active sort. The direction is `None` exactly when no column is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    column: Option<Ustr>,
    direction: SortDirection,
}

impl SortState {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn ascending(column: Ustr) -> Self {
        Self {
            column: Some(column),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: Ustr) -> Self {
        Self {
            column: Some(column),
            direction: SortDirection::Descending,
        }
    }

    pub fn column(&self) -> Option<Ustr> {
        self.column
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// asc -> desc -> none on the same column; any other column restarts at asc.
    fn cycle(self, key: Ustr) -> Self {
        match (self.column, self.direction) {
            (Some(current), SortDirection::Ascending) if current == key => Self::descending(key),
            (Some(current), SortDirection::Descending) if current == key => Self::unsorted(),
            _ => Self::ascending(key),
        }
    }
}

/// Where inside a row a click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRegion {
    Cell,
    Actions,
    Checkbox,
}

/// Notifications the table hands back to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent<R> {
    RowClick(R),
    Sort(SortState),
    /// Every selected row, in row order.
    SelectionChange(Vec<R>),
    PageChange(usize),
}

/// Search, sort, pagination and selection over a caller-supplied row list.
///
/// The visible view is derived from (rows, search term, sort, page, page size) and is
/// recomputed on every input change. Operations never fail; requests that make no
/// sense (unknown column, page out of range) are ignored and return `None`.
#[derive(Debug, Clone)]
pub struct DataTable<R> {
    columns: Vec<ColumnDescriptor>,
    rows: Vec<R>,
    config: TableConfig,
    loading: bool,
    search_term: String,
    sort: SortState,
    current_page: usize,
    selection: HashSet<Ustr>,
    /// Indices into `rows` after filtering and sorting.
    filtered: Vec<usize>,
}

impl<R: TableRow + Clone> DataTable<R> {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self::with_config(columns, TableConfig::default())
    }

    pub fn with_config(columns: Vec<ColumnDescriptor>, config: TableConfig) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            config,
            loading: false,
            search_term: String::new(),
            sort: SortState::unsorted(),
            current_page: 1,
            selection: HashSet::new(),
            filtered: Vec::new(),
        }
    }

    // ==================== Inputs ====================

    /// Replaces every row. Only the current page is re-clamped; search, sort and
    /// selection are kept.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.recompute();
    }

    pub fn set_config(&mut self, config: TableConfig) {
        self.config = config;
        self.recompute();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    // ==================== Operations ====================

    /// Filters rows whose stringified fields contain `term`, ignoring case.
    ///
    /// Resets to page 1. Does nothing when the table is not searchable.
    pub fn search(&mut self, term: &str) {
        if !self.config.searchable {
            return;
        }
        self.search_term = term.to_owned();
        self.current_page = 1;
        self.recompute();
    }

    pub fn clear_search(&mut self) {
        self.search("");
    }

    pub fn sort_by_column(&mut self, key: &str) -> Option<TableEvent<R>> {
        let column = self.columns.iter().find(|c| c.key.as_str() == key)?;
        if !column.sortable {
            return None;
        }
        self.sort = self.sort.cycle(column.key);
        debug!("table sort changed to {:?}", self.sort);
        self.recompute();
        Some(TableEvent::Sort(self.sort))
    }

    /// Moves to page `page` (1-based). Out-of-range requests are ignored.
    pub fn go_to_page(&mut self, page: usize) -> Option<TableEvent<R>> {
        if page < 1 || page > self.total_pages() {
            return None;
        }
        self.current_page = page;
        Some(TableEvent::PageChange(page))
    }

    pub fn next_page(&mut self) -> Option<TableEvent<R>> {
        self.go_to_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> Option<TableEvent<R>> {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    pub fn toggle_row_selection(&mut self, row: &R) -> TableEvent<R> {
        let id = row.row_id();
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
        TableEvent::SelectionChange(self.selected_rows())
    }

    /// Selects every row on the current page, or deselects them when all already are.
    /// Rows on other pages are left alone.
    pub fn toggle_all_on_page(&mut self) -> TableEvent<R> {
        let page_ids: Vec<Ustr> = self.page_rows().iter().map(|r| r.row_id()).collect();
        if self.all_selected() {
            for id in &page_ids {
                self.selection.remove(id);
            }
        } else {
            self.selection.extend(page_ids);
        }
        TableEvent::SelectionChange(self.selected_rows())
    }

    pub fn clear_selection(&mut self) -> TableEvent<R> {
        self.selection.clear();
        TableEvent::SelectionChange(Vec::new())
    }

    /// A click on the `index`-th visible row. Clicks on the actions or checkbox
    /// cells are swallowed.
    pub fn click_row(&self, index: usize, region: ClickRegion) -> Option<TableEvent<R>> {
        if region != ClickRegion::Cell {
            return None;
        }
        self.page_rows()
            .get(index)
            .map(|row| TableEvent::RowClick((*row).clone()))
    }

    // ==================== Views ====================

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.config.effective_page_size()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    /// Page count of the filtered rows. An unpaginated table has a single page.
    pub fn total_pages(&self) -> usize {
        if !self.config.paginated {
            return usize::from(!self.filtered.is_empty());
        }
        self.filtered.len().div_ceil(self.page_size())
    }

    /// Filtered and sorted rows, across all pages.
    pub fn filtered_rows(&self) -> Vec<&R> {
        self.filtered.iter().map(|&i| &self.rows[i]).collect()
    }

    /// The rows currently visible.
    pub fn page_rows(&self) -> Vec<&R> {
        let (start, end) = self.page_bounds();
        self.filtered[start..end]
            .iter()
            .map(|&i| &self.rows[i])
            .collect()
    }

    /// 1-based inclusive range of the visible rows within the filtered set, for
    /// "showing x-y of z" captions. `None` when nothing is visible.
    pub fn visible_range(&self) -> Option<(usize, usize)> {
        let (start, end) = self.page_bounds();
        (start < end).then_some((start + 1, end))
    }

    pub fn is_selected(&self, row: &R) -> bool {
        self.selection.contains(&row.row_id())
    }

    /// True when the visible page has rows and every one of them is selected.
    pub fn all_selected(&self) -> bool {
        let page = self.page_rows();
        !page.is_empty() && page.iter().all(|r| self.selection.contains(&r.row_id()))
    }

    pub fn selected_rows(&self) -> Vec<R> {
        self.rows
            .iter()
            .filter(|r| self.selection.contains(&r.row_id()))
            .cloned()
            .collect()
    }

    pub fn format_cell(&self, row: &R, column: &ColumnDescriptor, locale: &Locale) -> String {
        format::format_cell(column, &row.field(column.key.as_str()), locale)
    }

    // ==================== Derivation ====================

    fn page_bounds(&self) -> (usize, usize) {
        let len = self.filtered.len();
        if !self.config.paginated {
            return (0, len);
        }
        let size = self.page_size();
        let start = ((self.current_page - 1) * size).min(len);
        let end = (start + size).min(len);
        (start, end)
    }

    fn recompute(&mut self) {
        let term = self.search_term.to_lowercase();
        let apply_search = self.config.searchable && !term.is_empty();

        let mut filtered: Vec<usize> = (0..self.rows.len())
            .filter(|&i| !apply_search || self.matches(&self.rows[i], &term))
            .collect();

        if let Some(key) = self.sort.column() {
            let direction = self.sort.direction();
            let mut keyed: Vec<(usize, CellValue)> = filtered
                .iter()
                .map(|&i| (i, self.rows[i].field(key.as_str())))
                .collect();
            keyed.sort_by(|(_, a), (_, b)| compare(a, b, direction));
            filtered = keyed.into_iter().map(|(i, _)| i).collect();
        }

        self.filtered = filtered;
        self.clamp_page();
    }

    fn matches(&self, row: &R, lowercase_term: &str) -> bool {
        self.columns.iter().any(|column| {
            row.field(column.key.as_str())
                .to_string()
                .to_lowercase()
                .contains(lowercase_term)
        })
    }

    fn clamp_page(&mut self) {
        let total = self.total_pages();
        self.current_page = if total == 0 {
            1
        } else {
            self.current_page.clamp(1, total)
        };
    }
}

/// Stable comparison with empty cells kept last in both directions.
fn compare(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match direction {
            SortDirection::Ascending => a.cmp(b),
            SortDirection::Descending => b.cmp(a),
            SortDirection::None => Ordering::Equal,
        },
    }
}
