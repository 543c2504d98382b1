use std::ops::Range;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Page size
// ---------------------------------------------------------------------------

/// Rows per page, restricted to the sizes the table offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageSize(usize);

impl PageSize {
    pub const CHOICES: [usize; 4] = [10, 20, 50, 100];

    /// Accepts only an enumerated size.
    pub fn new(size: usize) -> Option<Self> {
        Self::CHOICES.contains(&size).then_some(Self(size))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Next enumerated size, wrapping.
    pub fn cycle(self) -> Self {
        let at = Self::CHOICES.iter().position(|&s| s == self.0).unwrap_or(0);
        Self(Self::CHOICES[(at + 1) % Self::CHOICES.len()])
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(20)
    }
}

// ---------------------------------------------------------------------------
// Page math
// ---------------------------------------------------------------------------

/// Total pages for a filtered row count; zero when there are no rows.
pub fn page_count(filtered_len: usize, page_size: PageSize) -> usize {
    filtered_len.div_ceil(page_size.get())
}

/// Clamp a 1-based page request into range. An empty table clamps to 1 so
/// displays always have a current page.
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    if total_pages == 0 {
        1
    } else {
        requested.clamp(1, total_pages)
    }
}

/// Row index range of one page over the filtered list. `page` is 1-based and
/// already clamped.
pub fn page_range(filtered_len: usize, page: usize, page_size: PageSize) -> Range<usize> {
    let size = page_size.get();
    let start = page.saturating_sub(1) * size;
    if start >= filtered_len {
        return filtered_len..filtered_len;
    }
    start..(start + size).min(filtered_len)
}

// ---------------------------------------------------------------------------
// Control strip
// ---------------------------------------------------------------------------

/// One element of the pagination control strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// First and last pages always show, plus a window of one around the current
/// page; a page exactly two away from current collapses to an ellipsis.
pub fn page_items(total_pages: usize, current: usize) -> Vec<PageItem> {
    let mut items = Vec::new();
    for page in 1..=total_pages {
        let in_window = page + 1 >= current && page <= current + 1;
        if page == 1 || page == total_pages || in_window {
            items.push(PageItem::Page(page));
        } else if page + 2 == current || page == current + 2 {
            items.push(PageItem::Ellipsis);
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> PageSize {
        PageSize::new(n).unwrap()
    }

    #[test]
    fn page_size_choices_only() {
        assert!(PageSize::new(10).is_some());
        assert!(PageSize::new(100).is_some());
        assert!(PageSize::new(25).is_none());
        assert!(PageSize::new(0).is_none());
        assert_eq!(PageSize::default().get(), 20);
    }

    #[test]
    fn page_size_cycles_through_choices() {
        let mut s = PageSize::default();
        let mut seen = vec![s.get()];
        for _ in 0..3 {
            s = s.cycle();
            seen.push(s.get());
        }
        assert_eq!(seen, [20, 50, 100, 10]);
    }

    #[test]
    fn page_count_is_ceiling() {
        assert_eq!(page_count(45, size(20)), 3);
        assert_eq!(page_count(40, size(20)), 2);
        assert_eq!(page_count(1, size(20)), 1);
        assert_eq!(page_count(0, size(20)), 0);
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(4, 3), 3);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(7, 0), 1);
    }

    #[test]
    fn ranges_partition_the_list() {
        // 45 rows at size 20: 0..20, 20..40, 40..45
        assert_eq!(page_range(45, 1, size(20)), 0..20);
        assert_eq!(page_range(45, 2, size(20)), 20..40);
        assert_eq!(page_range(45, 3, size(20)), 40..45);
    }

    #[test]
    fn range_beyond_end_is_empty() {
        assert_eq!(page_range(5, 2, size(20)), 5..5);
        assert_eq!(page_range(0, 1, size(10)), 0..0);
    }

    #[test]
    fn few_pages_show_every_number() {
        let items = page_items(3, 2);
        assert_eq!(
            items,
            [PageItem::Page(1), PageItem::Page(2), PageItem::Page(3)]
        );
    }

    #[test]
    fn long_strips_collapse_with_ellipses() {
        // current=5 of 9: 1 … 4 5 6 … 9
        let items = page_items(9, 5);
        assert_eq!(
            items,
            [
                PageItem::Page(1),
                PageItem::Ellipsis,
                PageItem::Page(4),
                PageItem::Page(5),
                PageItem::Page(6),
                PageItem::Ellipsis,
                PageItem::Page(9),
            ]
        );
    }

    #[test]
    fn window_touching_the_edges_has_no_ellipsis() {
        // current=3 of 9: page 1 is inside current-2, so no left ellipsis
        let items = page_items(9, 3);
        assert_eq!(
            items,
            [
                PageItem::Page(1),
                PageItem::Page(2),
                PageItem::Page(3),
                PageItem::Page(4),
                PageItem::Ellipsis,
                PageItem::Page(9),
            ]
        );
    }

    #[test]
    fn first_and_last_always_present() {
        let items = page_items(50, 25);
        assert_eq!(items.first(), Some(&PageItem::Page(1)));
        assert_eq!(items.last(), Some(&PageItem::Page(50)));
    }

    #[test]
    fn empty_table_has_no_items() {
        assert!(page_items(0, 1).is_empty());
    }
}
