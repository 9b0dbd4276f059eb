//! Page slicing and page-list generation.

use tabula_model::{PageSize, TableConfig};

/// One page of a row-index sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSlice {
    pub rows: Vec<usize>,
    /// Zero when there is nothing to show.
    pub page_count: usize,
    /// 1-based; zero only when `page_count` is zero.
    pub current_page: usize,
    /// Offset of the first row of the page within the full sequence.
    pub start: usize,
}

impl PageSlice {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Number of pages needed for `rows` rows.
pub fn page_count(rows: usize, size: PageSize) -> usize {
    match size {
        _ if rows == 0 => 0,
        PageSize::All => 1,
        PageSize::Rows(per_page) => rows.div_ceil(per_page.get()),
    }
}

/// Cuts page `current` out of `rows`, clamping `current` into range.
pub fn paginate(rows: &[usize], size: PageSize, current: usize) -> PageSlice {
    let page_count = page_count(rows.len(), size);
    if page_count == 0 {
        return PageSlice::default();
    }
    let current_page = current.clamp(1, page_count);
    let (start, end) = match size {
        PageSize::All => (0, rows.len()),
        PageSize::Rows(per_page) => {
            let start = (current_page - 1) * per_page.get();
            (start, (start + per_page.get()).min(rows.len()))
        }
    };
    PageSlice {
        rows: rows[start..end].to_vec(),
        page_count,
        current_page,
        start,
    }
}

/// Entry of a page-number list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

/// Page numbers with gaps collapsed.
///
/// The first and last pages are always listed, along with a window of
/// `delta` pages on each side of `current`. Near either end the window is
/// extended so the list keeps the same length. A gap of exactly one page is
/// filled with that page; longer gaps become a single ellipsis.
pub fn truncate_pages(current: usize, page_count: usize, delta: usize) -> Vec<PageMarker> {
    if page_count == 0 {
        return Vec::new();
    }
    let n = page_count as i64;
    let c = current.clamp(1, page_count) as i64;
    let d = delta as i64;
    let (mut left, mut right) = (c - d, c + d);
    if c < 4 + d {
        right = 3 + 2 * d;
    } else if c > n - (3 + d) {
        left = n - (2 + 2 * d);
    }

    let mut markers = Vec::new();
    let mut previous: Option<i64> = None;
    for page in 1..=n {
        if page != 1 && page != n && (page < left || page > right) {
            continue;
        }
        if let Some(previous) = previous {
            match page - previous {
                2 => markers.push(PageMarker::Page((previous + 1) as usize)),
                gap if gap > 2 => markers.push(PageMarker::Ellipsis),
                _ => {}
            }
        }
        markers.push(PageMarker::Page(page as usize));
        previous = Some(page);
    }
    markers
}

/// Every page number, or the truncated list when `truncate` is set.
pub fn page_markers(
    current: usize,
    page_count: usize,
    delta: usize,
    truncate: bool,
) -> Vec<PageMarker> {
    if truncate {
        truncate_pages(current, page_count, delta)
    } else {
        (1..=page_count).map(PageMarker::Page).collect()
    }
}

/// Pager layout options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerOptions {
    pub delta: usize,
    pub truncate: bool,
    pub first_last: bool,
    pub next_prev: bool,
}

impl PagerOptions {
    pub fn from_config(config: &TableConfig) -> Self {
        Self {
            delta: config.pager_delta,
            truncate: config.truncate_pager,
            first_last: config.first_last,
            next_prev: config.next_prev,
        }
    }
}

/// Control in a pager. Navigation items carry the page they lead to and
/// whether they are inert on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerItem {
    First { target: usize, disabled: bool },
    Prev { target: usize, disabled: bool },
    Page { number: usize, active: bool },
    Ellipsis,
    Next { target: usize, disabled: bool },
    Last { target: usize, disabled: bool },
}

/// Full pager for `current` of `page_count` pages. A single page (or none)
/// needs no pager and yields an empty list.
pub fn pager_items(current: usize, page_count: usize, options: PagerOptions) -> Vec<PagerItem> {
    if page_count <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, page_count);
    let on_first = current == 1;
    let on_last = current == page_count;
    let mut items = Vec::new();
    if options.first_last {
        items.push(PagerItem::First {
            target: 1,
            disabled: on_first,
        });
    }
    if options.next_prev {
        items.push(PagerItem::Prev {
            target: current.saturating_sub(1).max(1),
            disabled: on_first,
        });
    }
    items.extend(
        page_markers(current, page_count, options.delta, options.truncate)
            .into_iter()
            .map(|marker| match marker {
                PageMarker::Page(number) => PagerItem::Page {
                    number,
                    active: number == current,
                },
                PageMarker::Ellipsis => PagerItem::Ellipsis,
            }),
    );
    if options.next_prev {
        items.push(PagerItem::Next {
            target: (current + 1).min(page_count),
            disabled: on_last,
        });
    }
    if options.first_last {
        items.push(PagerItem::Last {
            target: page_count,
            disabled: on_last,
        });
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(markers: &[PageMarker]) -> String {
        markers
            .iter()
            .map(|marker| match marker {
                PageMarker::Page(number) => number.to_string(),
                PageMarker::Ellipsis => "…".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn twenty_three_rows_in_pages_of_ten() {
        let rows: Vec<usize> = (0..23).collect();
        let size = PageSize::rows(10).unwrap();
        let last = paginate(&rows, size, 3);
        assert_eq!(last.page_count, 3);
        assert_eq!(last.rows, vec![20, 21, 22]);
        assert_eq!(paginate(&rows, size, 5).current_page, 3);
        assert_eq!(paginate(&rows, size, 0).current_page, 1);
    }

    #[test]
    fn all_and_empty() {
        let rows: Vec<usize> = (0..7).collect();
        let all = paginate(&rows, PageSize::All, 4);
        assert_eq!((all.page_count, all.current_page, all.rows.len()), (1, 1, 7));
        let empty = paginate(&[], PageSize::default(), 2);
        assert_eq!((empty.page_count, empty.current_page), (0, 0));
        assert!(empty.is_empty());
    }

    #[test]
    fn truncated_window_in_the_middle() {
        insta::assert_snapshot!(pages(&truncate_pages(10, 20, 2)), @"1 … 8 9 10 11 12 … 20");
    }

    #[test]
    fn truncated_window_near_the_ends() {
        insta::assert_snapshot!(pages(&truncate_pages(1, 20, 2)), @"1 2 3 4 5 6 7 … 20");
        insta::assert_snapshot!(pages(&truncate_pages(20, 20, 2)), @"1 … 14 15 16 17 18 19 20");
        insta::assert_snapshot!(pages(&truncate_pages(5, 20, 2)), @"1 2 3 4 5 6 7 … 20");
        insta::assert_snapshot!(pages(&truncate_pages(6, 20, 2)), @"1 … 4 5 6 7 8 … 20");
    }

    #[test]
    fn single_page_gaps_are_filled() {
        assert_eq!(pages(&truncate_pages(4, 9, 1)), "1 2 3 4 5 … 9");
        assert_eq!(pages(&truncate_pages(3, 5, 2)), "1 2 3 4 5");
        assert_eq!(pages(&truncate_pages(1, 1, 2)), "1");
    }

    #[test]
    fn controls_wrap_the_page_list() {
        let options = PagerOptions {
            delta: 2,
            truncate: true,
            first_last: true,
            next_prev: true,
        };
        let items = pager_items(1, 3, options);
        assert_eq!(
            items.first(),
            Some(&PagerItem::First {
                target: 1,
                disabled: true
            })
        );
        assert_eq!(
            items[items.len() - 2],
            PagerItem::Next {
                target: 2,
                disabled: false
            }
        );
        assert!(items.contains(&PagerItem::Page {
            number: 1,
            active: true
        }));
        assert!(pager_items(1, 1, options).is_empty());
    }
}
