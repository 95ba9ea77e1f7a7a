use crate::product::Product;
use crate::store::{ProductState, Store, StoreEvent, select_error, select_loading, select_products};
use crate::ui::card;
use std::sync::mpsc::Receiver;

/// Products shown per page.
pub const PAGE_SIZE: usize = 10;

/// Rows around the card area: header, banners, search, pager, status and card borders.
pub const CARD_AREA_OVERHEAD: u16 = 14;

/// Input mode for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Keystrokes edit the search term.
    Searching,
    /// Keystrokes edit a page number to jump to.
    PageJump { buffer: String },
}

/// Products whose title or description contains `term`, ignoring case, in catalog order.
pub fn filter_products<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let needle = term.to_lowercase();
    products.iter().filter(|p| p.matches(&needle)).collect()
}

/// Number of pages needed for `len` items. Zero items means zero pages.
pub fn page_count(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// Clamp a 1-based page into `1..=max(1, page_count)`.
pub fn clamp_page(page: usize, page_count: usize) -> usize {
    page.clamp(1, page_count.max(1))
}

/// The 1-based `page` of `items`. Pages past the end are empty.
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE).min(items.len());
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// Everything the renderer needs, derived fresh from store state and view state.
#[derive(Debug)]
pub struct DashboardView<'a> {
    pub loading: bool,
    pub error: Option<&'a str>,
    pub total: usize,
    pub filtered: Vec<&'a Product>,
    pub page_count: usize,
    pub current_page: usize,
}

impl<'a> DashboardView<'a> {
    pub fn derive(state: &'a ProductState, search_term: &str, current_page: usize) -> Self {
        let products = select_products(state);
        let filtered = filter_products(products, search_term);
        let pages = page_count(filtered.len());
        Self {
            loading: select_loading(state),
            error: select_error(state),
            total: products.len(),
            current_page: clamp_page(current_page, pages),
            page_count: pages,
            filtered,
        }
    }

    pub fn page_items(&self) -> &[&'a Product] {
        page_slice(&self.filtered, self.current_page)
    }

    pub fn show_no_results(&self) -> bool {
        self.filtered.is_empty() && !self.loading
    }

    pub fn can_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_next(&self) -> bool {
        self.current_page < self.page_count
    }
}

/// Dashboard container: owns the search term and page, reads everything else from the store.
pub struct Dashboard<S: Store> {
    store: S,
    events: Option<Receiver<StoreEvent>>,
    state: ProductState,

    pub should_quit: bool,
    pub show_help: bool,
    pub input_mode: InputMode,

    pub search_term: String,
    pub current_page: usize,
    pub card_scroll: u16,
    pub card_area_width: u16,
    pub card_area_height: u16,

    pub status_msg: String,
}

impl<S: Store> Dashboard<S> {
    pub fn new(store: S) -> Self {
        let state = store.state();
        Self {
            store,
            events: None,
            state,
            should_quit: false,
            show_help: false,
            input_mode: InputMode::Normal,
            search_term: String::new(),
            current_page: 1,
            card_scroll: 0,
            // Updated on first resize
            card_area_width: 78,
            card_area_height: 20,
            status_msg: String::new(),
        }
    }

    /// Subscribe to the store and request products. Only the first call does anything.
    pub fn mount(&mut self) {
        if self.events.is_some() {
            return;
        }
        self.events = Some(self.store.subscribe());
        self.store.fetch_products();
        tracing::debug!("dashboard mounted, fetch dispatched");
    }

    /// Drain pending store notifications. Returns true if the state changed.
    pub fn sync_store(&mut self) -> bool {
        let mut latest = None;
        if let Some(rx) = &self.events {
            while let Ok(StoreEvent::StateChanged(state)) = rx.try_recv() {
                latest = Some(state);
            }
        }

        let Some(state) = latest else {
            return false;
        };
        let was_loading = self.state.loading;
        self.state = state;
        self.clamp_current_page();
        self.card_scroll = self.card_scroll.min(self.max_card_scroll());

        if was_loading && !self.state.loading {
            self.status_msg = match &self.state.error {
                Some(_) => "Fetch failed".to_string(),
                None => format!("{} products loaded", self.state.products.len()),
            };
        }
        true
    }

    pub fn state(&self) -> &ProductState {
        &self.state
    }

    pub fn view(&self) -> DashboardView<'_> {
        DashboardView::derive(&self.state, &self.search_term, self.current_page)
    }

    fn page_count(&self) -> usize {
        let needle = self.search_term.to_lowercase();
        let matching = select_products(&self.state)
            .iter()
            .filter(|p| p.matches(&needle))
            .count();
        page_count(matching)
    }

    fn clamp_current_page(&mut self) {
        let clamped = clamp_page(self.current_page, self.page_count());
        if clamped != self.current_page {
            self.current_page = clamped;
            self.card_scroll = 0;
        }
    }

    // ── Search ──

    /// Replace the search term verbatim.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.card_scroll = 0;
        self.clamp_current_page();
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut term = std::mem::take(&mut self.search_term);
        term.push(c);
        self.set_search_term(term);
    }

    pub fn pop_search_char(&mut self) {
        let mut term = std::mem::take(&mut self.search_term);
        term.pop();
        self.set_search_term(term);
    }

    pub fn clear_search(&mut self) {
        self.set_search_term(String::new());
    }

    // ── Pagination ──

    /// Select a numbered page. Pages without a control (outside `1..=page_count`) are refused.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let pages = self.page_count();
        if page == 0 || page > pages {
            return false;
        }
        if page != self.current_page {
            self.current_page = page;
            self.card_scroll = 0;
        }
        true
    }

    pub fn next_page(&mut self) -> bool {
        if self.view().can_next() {
            self.current_page += 1;
            self.card_scroll = 0;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.view().can_prev() {
            self.current_page -= 1;
            self.card_scroll = 0;
            true
        } else {
            false
        }
    }

    pub fn first_page(&mut self) -> bool {
        self.go_to_page(1)
    }

    pub fn last_page(&mut self) -> bool {
        let pages = self.page_count();
        self.go_to_page(pages)
    }

    pub fn begin_page_jump(&mut self) {
        self.input_mode = InputMode::PageJump {
            buffer: String::new(),
        };
        self.status_msg = format!("Go to page (1-{}):", self.page_count());
    }

    pub fn push_page_digit(&mut self, c: char) {
        if let InputMode::PageJump { buffer } = &mut self.input_mode {
            if c.is_ascii_digit() && buffer.len() < 6 {
                buffer.push(c);
            }
        }
    }

    pub fn pop_page_digit(&mut self) {
        if let InputMode::PageJump { buffer } = &mut self.input_mode {
            buffer.pop();
        }
    }

    /// Apply the typed page number and leave page-jump mode.
    pub fn confirm_page_jump(&mut self) {
        let InputMode::PageJump { buffer } =
            std::mem::replace(&mut self.input_mode, InputMode::Normal)
        else {
            return;
        };

        let pages = self.page_count();
        match buffer.parse::<usize>() {
            Ok(page) if self.go_to_page(page) => {
                self.status_msg = format!("Page {} of {}", page, pages);
            }
            _ => {
                self.status_msg = if pages == 0 {
                    "No pages to jump to".to_string()
                } else {
                    format!("Invalid page '{}' (1-{})", buffer, pages)
                };
            }
        }
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.status_msg.clear();
    }

    // ── Card scrolling ──

    /// Record the terminal size; cards render inside borders below the fixed rows.
    pub fn update_card_area(&mut self, terminal_width: u16, terminal_height: u16) {
        self.card_area_width = terminal_width.saturating_sub(2).max(1);
        self.card_area_height = terminal_height.saturating_sub(CARD_AREA_OVERHEAD).max(1);
        self.card_scroll = self.card_scroll.min(self.max_card_scroll());
    }

    /// Furthest scroll that still leaves the last card line at the bottom of the panel.
    pub fn max_card_scroll(&self) -> u16 {
        let view = self.view();
        let lines = card::render_cards(view.page_items(), self.card_area_width).len();
        let lines = u16::try_from(lines).unwrap_or(u16::MAX);
        lines.saturating_sub(self.card_area_height)
    }

    fn scroll_to(&mut self, offset: u16) {
        self.card_scroll = offset.min(self.max_card_scroll());
    }

    pub fn scroll_down(&mut self) {
        self.scroll_to(self.card_scroll.saturating_add(1));
    }

    pub fn scroll_up(&mut self) {
        self.card_scroll = self.card_scroll.saturating_sub(1);
    }

    pub fn scroll_page_down(&mut self) {
        self.scroll_to(self.card_scroll.saturating_add(self.card_area_height));
    }

    pub fn scroll_page_up(&mut self) {
        self.card_scroll = self.card_scroll.saturating_sub(self.card_area_height);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{RecordingStore, loaded};
    use super::*;
    use crate::product::fixtures;
    use crate::store::FetchAction;
    use proptest::prelude::*;
    use std::rc::Rc;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(10), 1);
        assert_eq!(page_count(11), 2);
        assert_eq!(page_count(25), 3);
    }

    #[test]
    fn test_page_slice_past_end_is_empty() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(page_slice(&items, 3), &[20, 21, 22, 23, 24]);
        assert!(page_slice(&items, 4).is_empty());
        assert!(page_slice(&items, usize::MAX).is_empty());
    }

    #[test]
    fn test_mount_fetches_exactly_once() {
        let store = Rc::new(RecordingStore::default());
        let mut dashboard = Dashboard::new(Rc::clone(&store));
        assert_eq!(store.fetches.get(), 0);

        dashboard.mount();
        dashboard.mount();
        dashboard.sync_store();
        dashboard.mount();

        assert_eq!(store.fetches.get(), 1);
    }

    #[test]
    fn test_sync_store_tracks_loading_and_error() {
        let store = Rc::new(RecordingStore::default());
        let mut dashboard = Dashboard::new(Rc::clone(&store));
        dashboard.mount();

        assert!(dashboard.sync_store());
        assert!(dashboard.view().loading);
        assert!(!dashboard.view().show_no_results());

        store.apply(FetchAction::Rejected("Network failure".to_string()));
        assert!(dashboard.sync_store());
        let view = dashboard.view();
        assert!(!view.loading);
        assert_eq!(view.error, Some("Network failure"));
        assert!(view.show_no_results());
        assert_eq!(dashboard.status_msg, "Fetch failed");

        assert!(!dashboard.sync_store());
    }

    #[test]
    fn test_twenty_five_products_make_three_pages() {
        let (mut dashboard, _store) = loaded(fixtures::catalog(25));
        let view = dashboard.view();
        assert_eq!(view.page_count, 3);
        assert_eq!(view.page_items().len(), 10);

        assert!(dashboard.go_to_page(3));
        let view = dashboard.view();
        assert_eq!(view.page_items().len(), 5);
        assert_eq!(view.page_items()[0].id, 21);
        assert!(!view.can_next());
        assert!(view.can_prev());
    }

    #[test]
    fn test_next_and_prev_step_by_one_within_bounds() {
        let (mut dashboard, _store) = loaded(fixtures::catalog(25));

        assert!(!dashboard.prev_page());
        assert_eq!(dashboard.current_page, 1);

        assert!(dashboard.next_page());
        assert_eq!(dashboard.current_page, 2);
        assert!(dashboard.next_page());
        assert_eq!(dashboard.current_page, 3);
        assert!(!dashboard.next_page());
        assert_eq!(dashboard.current_page, 3);

        assert!(dashboard.prev_page());
        assert_eq!(dashboard.current_page, 2);
    }

    #[test]
    fn test_go_to_page_rejects_pages_without_control() {
        let (mut dashboard, _store) = loaded(fixtures::catalog(25));
        assert!(!dashboard.go_to_page(0));
        assert!(!dashboard.go_to_page(4));
        assert_eq!(dashboard.current_page, 1);
        assert!(dashboard.last_page());
        assert_eq!(dashboard.current_page, 3);
        assert!(dashboard.first_page());
        assert_eq!(dashboard.current_page, 1);
    }

    #[test]
    fn test_zero_matches_has_no_pages_and_no_next() {
        let (mut dashboard, _store) = loaded(fixtures::catalog(25));
        dashboard.set_search_term("zzz-not-there");

        let view = dashboard.view();
        assert!(view.filtered.is_empty());
        assert_eq!(view.page_count, 0);
        assert!(view.page_items().is_empty());
        assert!(view.show_no_results());
        assert!(!view.can_next());
        assert!(!view.can_prev());
        assert!(!dashboard.next_page());
        assert_eq!(dashboard.current_page, 1);
    }

    #[test]
    fn test_search_is_verbatim() {
        let (mut dashboard, _store) = loaded(fixtures::catalog(3));
        for c in "DUCT 2".chars() {
            dashboard.push_search_char(c);
        }
        assert_eq!(dashboard.search_term, "DUCT 2");
        assert_eq!(dashboard.view().filtered.len(), 1);

        // Trailing whitespace is not trimmed.
        dashboard.push_search_char(' ');
        assert_eq!(dashboard.search_term, "DUCT 2 ");
        assert!(dashboard.view().filtered.is_empty());

        dashboard.pop_search_char();
        dashboard.pop_search_char();
        assert_eq!(dashboard.search_term, "DUCT ");
        assert_eq!(dashboard.view().filtered.len(), 3);

        dashboard.clear_search();
        assert_eq!(dashboard.search_term, "");
    }

    #[test]
    fn test_page_is_clamped_when_search_shrinks_results() {
        let mut products = fixtures::catalog(25);
        products[0].title = "Special lamp".to_string();
        let (mut dashboard, _store) = loaded(products);

        assert!(dashboard.go_to_page(3));
        dashboard.set_search_term("lamp");
        assert_eq!(dashboard.current_page, 1);
        assert_eq!(dashboard.view().page_items().len(), 1);

        dashboard.set_search_term("nothing matches");
        assert_eq!(dashboard.current_page, 1);
    }

    #[test]
    fn test_page_is_clamped_when_store_shrinks_list() {
        let (mut dashboard, store) = loaded(fixtures::catalog(25));
        assert!(dashboard.go_to_page(3));

        store.apply(FetchAction::Fulfilled(fixtures::catalog(12)));
        dashboard.sync_store();
        assert_eq!(dashboard.current_page, 2);
        assert_eq!(dashboard.view().page_items().len(), 2);
    }

    #[test]
    fn test_page_change_resets_scroll() {
        let (mut dashboard, _store) = loaded(fixtures::catalog(25));
        dashboard.scroll_down();
        dashboard.scroll_down();
        assert_eq!(dashboard.card_scroll, 2);
        dashboard.next_page();
        assert_eq!(dashboard.card_scroll, 0);
    }

    #[test]
    fn test_scroll_stops_at_last_card_line() {
        let (mut dashboard, _store) = loaded(fixtures::catalog(25));
        dashboard.update_card_area(100, 40);
        assert!(dashboard.go_to_page(3));

        let lines = card::render_cards(dashboard.view().page_items(), 98).len() as u16;
        let max = lines - dashboard.card_area_height;
        assert_eq!(dashboard.max_card_scroll(), max);

        for _ in 0..10 {
            dashboard.scroll_page_down();
        }
        assert_eq!(dashboard.card_scroll, max);
        dashboard.scroll_down();
        assert_eq!(dashboard.card_scroll, max);

        dashboard.scroll_up();
        assert_eq!(dashboard.card_scroll, max - 1);
    }

    #[test]
    fn test_short_page_does_not_scroll() {
        let (mut dashboard, _store) = loaded(fixtures::catalog(1));
        dashboard.update_card_area(100, 80);
        assert_eq!(dashboard.max_card_scroll(), 0);
        dashboard.scroll_page_down();
        dashboard.scroll_down();
        assert_eq!(dashboard.card_scroll, 0);
    }

    #[test]
    fn test_next_and_prev_follow_view_bounds() {
        let (mut dashboard, _store) = loaded(fixtures::catalog(25));
        assert!(!dashboard.view().can_prev());
        assert!(!dashboard.prev_page());

        assert!(dashboard.last_page());
        assert!(!dashboard.view().can_next());
        assert!(!dashboard.next_page());

        dashboard.set_search_term("nothing like this");
        let view = dashboard.view();
        assert!(!view.can_prev() && !view.can_next());
    }

    #[test]
    fn test_page_jump() {
        let (mut dashboard, _store) = loaded(fixtures::catalog(25));

        dashboard.begin_page_jump();
        dashboard.push_page_digit('3');
        dashboard.push_page_digit('x');
        dashboard.confirm_page_jump();
        assert_eq!(dashboard.input_mode, InputMode::Normal);
        assert_eq!(dashboard.current_page, 3);

        dashboard.begin_page_jump();
        dashboard.push_page_digit('9');
        dashboard.confirm_page_jump();
        assert_eq!(dashboard.current_page, 3);
        assert!(dashboard.status_msg.starts_with("Invalid page '9'"));

        dashboard.begin_page_jump();
        dashboard.push_page_digit('1');
        dashboard.pop_page_digit();
        dashboard.confirm_page_jump();
        assert_eq!(dashboard.current_page, 3);
    }

    fn arb_products() -> impl Strategy<Value = Vec<Product>> {
        prop::collection::vec(("[a-cA-C ]{0,6}", "[a-cA-C ]{0,6}"), 0..60).prop_map(|pairs| {
            pairs
                .into_iter()
                .enumerate()
                .map(|(i, (title, description))| fixtures::product(i as i64, &title, &description))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_filter_is_exact_ordered_subsequence(products in arb_products(), term in "[a-cA-C]{0,3}") {
            let filtered = filter_products(&products, &term);
            let needle = term.to_lowercase();

            let expected: Vec<i64> = products
                .iter()
                .filter(|p| p.title.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle))
                .map(|p| p.id)
                .collect();
            let got: Vec<i64> = filtered.iter().map(|p| p.id).collect();
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn prop_pages_partition_filtered_list(products in arb_products(), term in "[a-c]{0,2}") {
            let filtered = filter_products(&products, &term);
            let pages = page_count(filtered.len());
            prop_assert_eq!(pages, (filtered.len() + PAGE_SIZE - 1) / PAGE_SIZE);

            let mut joined = Vec::new();
            for page in 1..=pages {
                let slice = page_slice(&filtered, page);
                prop_assert!(slice.len() <= PAGE_SIZE);
                prop_assert!(!slice.is_empty());
                joined.extend_from_slice(slice);
            }
            let joined: Vec<i64> = joined.iter().map(|p| p.id).collect();
            let all: Vec<i64> = filtered.iter().map(|p| p.id).collect();
            prop_assert_eq!(joined, all);
        }

        #[test]
        fn prop_current_page_stays_in_range(products in arb_products(), steps in prop::collection::vec(0u8..4, 0..30)) {
            let (mut dashboard, _store) = loaded(products);
            for step in steps {
                match step {
                    0 => { dashboard.next_page(); }
                    1 => { dashboard.prev_page(); }
                    2 => dashboard.push_search_char('a'),
                    _ => dashboard.pop_search_char(),
                }
                let view = dashboard.view();
                prop_assert!(dashboard.current_page >= 1);
                prop_assert!(dashboard.current_page <= view.page_count.max(1));
                prop_assert_eq!(view.current_page, dashboard.current_page);
            }
        }
    }
}
