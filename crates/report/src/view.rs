use crate::filter::{filter_records, SearchTerm, StatusFilter};
use crate::model::DiffRecord;
use crate::paginate::{clamp_page, page_count, page_items, page_range, PageItem, PageSize};
use crate::sort::{sort_records, SortKey, SortSpec};
use crate::status::StatusTally;

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// UI state of the differences table. Owned by the view, never persisted;
/// reset wholesale when a new record list is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// 1-based.
    pub page: usize,
    pub page_size: PageSize,
    pub sort: SortSpec,
    pub status_filter: StatusFilter,
    pub search: SearchTerm,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: PageSize::default(),
            sort: SortSpec::default(),
            status_filter: StatusFilter::default(),
            search: SearchTerm::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Differences table
// ---------------------------------------------------------------------------

/// The differences table: a record list plus view state. Every projection
/// (filtered set, page slice, tallies, page count) is derived fresh on each
/// call; nothing is cached, so nothing can go stale.
#[derive(Debug, Clone)]
pub struct DiffTable {
    records: Vec<DiffRecord>,
    state: ViewState,
}

impl DiffTable {
    pub fn new(records: Vec<DiffRecord>) -> Self {
        Self {
            records,
            state: ViewState::default(),
        }
    }

    /// Replace the record list; all view state resets to defaults.
    pub fn load(&mut self, records: Vec<DiffRecord>) {
        self.records = records;
        self.state = ViewState::default();
    }

    pub fn records(&self) -> &[DiffRecord] {
        &self.records
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    // -- mutations ----------------------------------------------------------

    /// Search edits land on page 1: the filtered set changed shape.
    pub fn set_search(&mut self, raw: &str) {
        self.state.search = SearchTerm::new(raw);
        self.state.page = 1;
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.state.status_filter = filter;
        self.state.page = 1;
    }

    pub fn cycle_status_filter(&mut self) {
        self.set_status_filter(self.state.status_filter.cycle());
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.state.page_size = size;
        self.state.page = 1;
    }

    pub fn cycle_page_size(&mut self) {
        self.set_page_size(self.state.page_size.cycle());
    }

    /// Toggle semantics: same key flips direction, new key starts descending.
    /// The current page survives a re-sort.
    pub fn sort_by(&mut self, key: SortKey) {
        self.state.sort = self.state.sort.toggled(key);
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.state.sort = sort;
    }

    /// Out-of-range requests clamp, never error.
    pub fn go_to_page(&mut self, page: usize) {
        self.state.page = clamp_page(page, self.page_count());
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.current_page() + 1);
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.current_page().saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.go_to_page(1);
    }

    pub fn last_page(&mut self) {
        self.go_to_page(self.page_count());
    }

    // -- derivations --------------------------------------------------------

    /// Filtered projection in report order.
    pub fn filtered(&self) -> Vec<&DiffRecord> {
        filter_records(&self.records, self.state.status_filter, &self.state.search)
    }

    /// Filtered projection in the active sort order. This is also the export
    /// view: everything visible, ignoring only the page cut.
    pub fn sorted(&self) -> Vec<&DiffRecord> {
        let mut rows = self.filtered();
        sort_records(&mut rows, self.state.sort);
        rows
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered().len(), self.state.page_size)
    }

    /// The page actually shown, clamped against the live page count.
    pub fn current_page(&self) -> usize {
        clamp_page(self.state.page, self.page_count())
    }

    /// Rows of the current page, in sort order.
    pub fn page_rows(&self) -> Vec<&DiffRecord> {
        let rows = self.sorted();
        let range = page_range(rows.len(), self.current_page(), self.state.page_size);
        rows[range].to_vec()
    }

    /// Pagination control strip for rendering.
    pub fn page_items(&self) -> Vec<PageItem> {
        page_items(self.page_count(), self.current_page())
    }

    /// Tally over the UNFILTERED list, for filter labels and badges.
    pub fn tally(&self) -> StatusTally {
        StatusTally::of(&self.records)
    }

    /// 1-based inclusive row span currently visible, None when the filtered
    /// set is empty ("showing X-Y of N").
    pub fn shown_range(&self) -> Option<(usize, usize)> {
        let total = self.filtered().len();
        if total == 0 {
            return None;
        }
        let range = page_range(total, self.current_page(), self.state.page_size);
        Some((range.start + 1, range.end))
    }
}
