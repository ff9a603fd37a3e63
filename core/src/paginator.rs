//! Page windowing for the console's case lists.
//!
//! # Design
//! The view owns both the fetched lists and a `ViewState`; the paginator is a
//! small `Copy` value holding the page size and the navigation window size.
//! `change_page` validates the request before writing anything, so a rejected
//! page leaves the view exactly as it was. Page counts always use the ceiling
//! of `len / page_size`: a partially filled last page is reachable and an
//! exact multiple exposes no empty trailing page.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::ops::Range;

/// Items per page used by the console unless a view overrides it.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(n) => n,
    None => panic!("page size must be non-zero"),
};

/// Page numbers shown at once in the navigation control.
pub const DEFAULT_NAVIGATION_WINDOW: NonZeroUsize = match NonZeroUsize::new(9) {
    Some(n) => n,
    None => panic!("navigation window must be non-zero"),
};

/// Fetched lists keyed by list id (`"dul"`, `"access"`, ...).
pub type Lists<T> = HashMap<String, Vec<T>>;

/// Per-list rendering state written by `Paginator::change_page`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState<T> {
    pub active_page: HashMap<String, usize>,
    pub current_pages: HashMap<String, Vec<usize>>,
    pub elections_list: HashMap<String, Vec<T>>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            active_page: HashMap::new(),
            current_pages: HashMap::new(),
            elections_list: HashMap::new(),
        }
    }
}

impl<T> ViewState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_page(&self, list_id: &str) -> Option<usize> {
        self.active_page.get(list_id).copied()
    }

    /// Page numbers to render for `list_id`; empty before the first valid
    /// `change_page`.
    pub fn current_pages(&self, list_id: &str) -> &[usize] {
        self.current_pages.get(list_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Items visible on the active page of `list_id`.
    pub fn visible(&self, list_id: &str) -> &[T] {
        self.elections_list.get(list_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drop all state for one list.
    pub fn forget(&mut self, list_id: &str) {
        self.active_page.remove(list_id);
        self.current_pages.remove(list_id);
        self.elections_list.remove(list_id);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: NonZeroUsize,
    navigation_window: NonZeroUsize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            page_size,
            navigation_window: DEFAULT_NAVIGATION_WINDOW,
        }
    }

    pub fn with_navigation_window(mut self, window: NonZeroUsize) -> Self {
        self.navigation_window = window;
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    pub fn navigation_window_size(&self) -> usize {
        self.navigation_window.get()
    }

    pub fn number_of_pages(&self, len: usize) -> usize {
        number_of_pages(len, self.page_size())
    }

    /// `page` as an index if it addresses a non-empty page of a list of
    /// `len` items.
    pub fn valid_page(&self, len: usize, page: i64) -> Option<usize> {
        usize::try_from(page)
            .ok()
            .filter(|&p| p < self.number_of_pages(len))
    }

    pub fn is_valid_page(&self, len: usize, page: i64) -> bool {
        self.valid_page(len, page).is_some()
    }

    /// Select `page` of `list_id` and recompute its navigation and display
    /// windows.
    ///
    /// Returns `false` without touching `state` when the list is unknown or
    /// the page is out of range.
    pub fn change_page<T: Clone>(
        &self,
        lists: &Lists<T>,
        state: &mut ViewState<T>,
        list_id: &str,
        page: i64,
    ) -> bool {
        let Some(items) = lists.get(list_id) else {
            return false;
        };
        let Some(page) = self.valid_page(items.len(), page) else {
            return false;
        };

        let pages = self.number_of_pages(items.len());
        let nav = navigation_window(page, pages, self.navigation_window_size());
        let shown = display_range(items.len(), page, self.page_size());

        state.active_page.insert(list_id.to_string(), page);
        state.current_pages.insert(list_id.to_string(), nav.collect());
        state
            .elections_list
            .insert(list_id.to_string(), items[shown].to_vec());
        true
    }

    /// Step back one page; a no-op on the first page or before any page
    /// was selected.
    pub fn previous_page<T: Clone>(
        &self,
        lists: &Lists<T>,
        state: &mut ViewState<T>,
        list_id: &str,
    ) -> bool {
        self.step(lists, state, list_id, -1)
    }

    /// Step forward one page; a no-op on the last page.
    pub fn next_page<T: Clone>(
        &self,
        lists: &Lists<T>,
        state: &mut ViewState<T>,
        list_id: &str,
    ) -> bool {
        self.step(lists, state, list_id, 1)
    }

    fn step<T: Clone>(
        &self,
        lists: &Lists<T>,
        state: &mut ViewState<T>,
        list_id: &str,
        offset: i64,
    ) -> bool {
        let Some(current) = state.active_page(list_id) else {
            return false;
        };
        let Ok(current) = i64::try_from(current) else {
            return false;
        };
        self.change_page(lists, state, list_id, current.saturating_add(offset))
    }
}

pub fn number_of_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size)
}

/// Page numbers to show around `page`: `min(window, number_of_pages)`
/// consecutive pages, centred on `page` unless that would cross an edge.
pub fn navigation_window(page: usize, number_of_pages: usize, window: usize) -> Range<usize> {
    let delta = window / 2;
    let floor = page.saturating_sub(delta);
    if floor + window < number_of_pages {
        return floor..floor + window;
    }
    let overflow = floor + window - number_of_pages;
    floor.saturating_sub(overflow)..number_of_pages
}

/// Index range of the items on `page`, clipped to `len`.
pub fn display_range(len: usize, page: usize, page_size: usize) -> Range<usize> {
    let start = page.saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}
