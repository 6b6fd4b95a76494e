//! Paginated search index.
//!
//! [`Paginator`] owns a dataset, the currently filtered view of it, and a page cursor.
//! Every mutation lands back on page 1 and every successful navigation reports the
//! visible page and a count summary to a [`PageObserver`]. Invalid input never panics
//! or errors: navigation just returns `false` and leaves state untouched.

pub mod controls;

use std::fmt;
use std::ops::Range;

use serde::Serialize;
use tracing::debug;

use crate::config::{DEFAULT_PAGE_SIZE, PagerConfig};
use crate::model::Searchable;
use crate::search::{CacheStats, NormalizedQuery, SearchCache};

pub use controls::{MAX_VISIBLE_PAGES, PageControl, page_controls, render_controls};

/// 1-based inclusive bounds of the visible page within the filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountSummary {
    pub start: usize,
    pub end: usize,
    pub total: usize,
    pub total_original: usize,
}

impl fmt::Display for CountSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {}-{} of {} ({} total)",
            self.start, self.end, self.total, self.total_original
        )
    }
}

/// Receives page changes. Both methods fire, in order, on every successful navigation.
pub trait PageObserver<R> {
    fn on_page_render(&mut self, _items: &[&R]) {}
    fn on_count_update(&mut self, _summary: CountSummary) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl<R> PageObserver<R> for NoopObserver {}

/// Adapts a pair of closures into a [`PageObserver`].
pub struct FnObserver<P, C> {
    on_page: P,
    on_count: C,
}

impl<P, C> FnObserver<P, C> {
    pub fn new(on_page: P, on_count: C) -> Self {
        Self { on_page, on_count }
    }
}

impl<R, P, C> PageObserver<R> for FnObserver<P, C>
where
    P: FnMut(&[&R]),
    C: FnMut(CountSummary),
{
    fn on_page_render(&mut self, items: &[&R]) {
        (self.on_page)(items);
    }

    fn on_count_update(&mut self, summary: CountSummary) {
        (self.on_count)(summary);
    }
}

/// Parse the leading integer of a form value: optional whitespace, optional sign,
/// then digits. Trailing text is ignored (`"3rd"` is 3); no digits means `None`.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    let value: i64 = digits[..len].parse().ok()?;
    Some(if negative { -value } else { value })
}

pub struct Paginator<R, O = NoopObserver> {
    data: Vec<R>,
    /// Positions into `data`, in dataset order.
    view: Vec<usize>,
    current_page: usize,
    page_size: usize,
    total_pages: usize,
    cache: SearchCache,
    last_query: String,
    scans: u64,
    observer: O,
}

impl<R> Default for Paginator<R> {
    fn default() -> Self {
        Self::new(&PagerConfig::default(), NoopObserver)
    }
}

impl<R, O: PageObserver<R>> Paginator<R, O> {
    pub fn new(config: &PagerConfig, observer: O) -> Self {
        let page_size = if config.page_size > 0 {
            config.page_size
        } else {
            DEFAULT_PAGE_SIZE
        };
        Self {
            data: Vec::new(),
            view: Vec::new(),
            current_page: 1,
            page_size,
            total_pages: 0,
            cache: SearchCache::new(config.search_cache_capacity),
            last_query: String::new(),
            scans: 0,
            observer,
        }
    }

    /// Replace the whole dataset and show page 1 of it.
    ///
    /// Cached searches refer to the old dataset, so the cache is emptied too.
    pub fn replace_dataset<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = R>,
    {
        self.data = items.into_iter().collect();
        self.view = (0..self.data.len()).collect();
        self.cache.clear();
        self.last_query.clear();
        debug!(records = self.data.len(), "dataset replaced");
        self.reset_to_first_page()
    }

    /// Keep only records satisfying `predicate`; `None` shows the whole dataset again.
    pub fn apply_filter<F>(&mut self, predicate: Option<F>) -> bool
    where
        F: FnMut(&R) -> bool,
    {
        match predicate {
            Some(mut keep) => {
                let data = &self.data;
                self.view = (0..data.len()).filter(|&i| keep(&data[i])).collect();
            }
            None => self.view = (0..self.data.len()).collect(),
        }
        // The view no longer derives from the last search, so it cannot be narrowed.
        self.last_query.clear();
        debug!(
            matched = self.view.len(),
            records = self.data.len(),
            "filter applied"
        );
        self.reset_to_first_page()
    }

    /// Drop any filter or search and show the whole dataset.
    pub fn clear_filter(&mut self) -> bool {
        self.apply_filter(None::<fn(&R) -> bool>)
    }

    pub fn goto_page(&mut self, page: i64) -> bool {
        let Ok(page) = usize::try_from(page) else {
            return false;
        };
        if page < 1 || page > self.total_pages {
            return false;
        }
        self.current_page = page;

        let summary = self.page_summary();
        let range = self.page_range();
        let data = &self.data;
        let items: Vec<&R> = self.view[range].iter().map(|&i| &data[i]).collect();
        self.observer.on_page_render(&items);
        self.observer.on_count_update(summary);
        true
    }

    /// Navigate using raw text such as a page-number input field.
    pub fn goto_page_input(&mut self, input: &str) -> bool {
        parse_leading_int(input).is_some_and(|page| self.goto_page(page))
    }

    pub fn next_page(&mut self) -> bool {
        self.goto_page(self.current_page as i64 + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.goto_page(self.current_page as i64 - 1)
    }

    /// Non-positive sizes fall back to [`DEFAULT_PAGE_SIZE`].
    pub fn set_page_size(&mut self, size: i64) -> bool {
        self.page_size = usize::try_from(size)
            .ok()
            .filter(|&s| s > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        self.reset_to_first_page()
    }

    /// Like [`set_page_size`](Self::set_page_size) for raw text; unparseable text
    /// means the default size.
    pub fn set_page_size_input(&mut self, input: &str) -> bool {
        self.set_page_size(parse_leading_int(input).unwrap_or(0))
    }

    /// Navigate as if the user clicked `control`.
    pub fn activate(&mut self, control: &PageControl) -> bool {
        match *control {
            PageControl::Previous { disabled: false } => self.prev_page(),
            PageControl::Next { disabled: false } => self.next_page(),
            PageControl::Page { number, .. } => {
                i64::try_from(number).is_ok_and(|page| self.goto_page(page))
            }
            PageControl::Previous { disabled: true }
            | PageControl::Next { disabled: true }
            | PageControl::Ellipsis => false,
        }
    }

    fn reset_to_first_page(&mut self) -> bool {
        self.total_pages = self.view.len().div_ceil(self.page_size);
        if self.goto_page(1) {
            return true;
        }
        // Empty view: nothing to show, but keep the cursor in range.
        self.current_page = 1;
        false
    }
}

impl<R: Searchable, O: PageObserver<R>> Paginator<R, O> {
    /// Case-insensitive multi-term search over `fields`.
    ///
    /// An empty query clears the cache and shows the whole dataset. Otherwise
    /// a cached result is reused when present; a query that extends the previous one
    /// only rescans the previous matches.
    pub fn search<S: AsRef<str>>(&mut self, query: &str, fields: &[S]) -> bool {
        let query = NormalizedQuery::parse(query);
        if query.is_empty() {
            self.cache.clear();
            return self.clear_filter();
        }

        let positions = match self.cache.get(query.key()) {
            Some(positions) => positions,
            None => {
                let positions = self.scan(&query, fields);
                self.cache.put(query.key().to_string(), positions.clone());
                positions
            }
        };

        self.view = positions;
        self.last_query = query.key().to_string();
        self.reset_to_first_page()
    }

    fn scan<S: AsRef<str>>(&mut self, query: &NormalizedQuery, fields: &[S]) -> Vec<usize> {
        let narrowed = query.extends(&self.last_query) && self.view.len() < self.data.len();
        let data = &self.data;
        let positions: Vec<usize> = if narrowed {
            self.view
                .iter()
                .copied()
                .filter(|&i| query.matches(&data[i], fields))
                .collect()
        } else {
            (0..data.len())
                .filter(|&i| query.matches(&data[i], fields))
                .collect()
        };
        self.scans += 1;
        debug!(
            query = query.key(),
            narrowed,
            scanned = if narrowed { self.view.len() } else { data.len() },
            matched = positions.len(),
            "search scan"
        );
        positions
    }
}

impl<R, O> Paginator<R, O> {
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn dataset(&self) -> &[R] {
        &self.data
    }

    pub fn dataset_len(&self) -> usize {
        self.data.len()
    }

    pub fn filtered_len(&self) -> usize {
        self.view.len()
    }

    /// Records in the filtered view, in dataset order.
    pub fn filtered(&self) -> impl Iterator<Item = &R> + '_ {
        self.view.iter().map(|&i| &self.data[i])
    }

    /// Records on the current page, without notifying the observer.
    pub fn current_page_items(&self) -> Vec<&R> {
        self.view[self.page_range()]
            .iter()
            .map(|&i| &self.data[i])
            .collect()
    }

    /// Summary of the current page, or `None` when there are no pages.
    pub fn summary(&self) -> Option<CountSummary> {
        (self.total_pages > 0).then(|| self.page_summary())
    }

    /// Normalized text of the search the current view came from, if any.
    pub fn last_query(&self) -> Option<&str> {
        (!self.last_query.is_empty()).then_some(self.last_query.as_str())
    }

    pub fn render_page_controls(&self) -> Vec<PageControl> {
        page_controls(self.current_page, self.total_pages)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn is_cached(&self, query: &str) -> bool {
        self.cache.contains(NormalizedQuery::parse(query).key())
    }

    /// Number of record scans performed by searches (cache hits do not scan).
    pub fn scan_count(&self) -> u64 {
        self.scans
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    fn page_range(&self) -> Range<usize> {
        let len = self.view.len();
        let start = (self.current_page.saturating_sub(1) * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        start..end
    }

    fn page_summary(&self) -> CountSummary {
        let total = self.view.len();
        CountSummary {
            start: (self.current_page - 1) * self.page_size + 1,
            end: (self.current_page * self.page_size).min(total),
            total,
            total_original: self.data.len(),
        }
    }
}

impl<R, O> fmt::Debug for Paginator<R, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("records", &self.data.len())
            .field("filtered", &self.view.len())
            .field("current_page", &self.current_page)
            .field("total_pages", &self.total_pages)
            .field("page_size", &self.page_size)
            .field("last_query", &self.last_query)
            .field("cache", &self.cache)
            .finish()
    }
}
