use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::catalog::selector::{CatalogSelector, LoadStatus, LoadTicket};
use crate::catalog::source::{CatalogError, CatalogSource};
use crate::config::Config;
use crate::engine::filter::{self, StatusFilter};
use crate::engine::pagination::{self, Pager};
use crate::event::{self, AppEvent};
use crate::store::kv::KeyValueStore;
use crate::store::progress::ProgressStore;
use crate::store::schema::{LanguagePair, Mark, Verb, VerbStats, VerbStatus};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Deck,
    PairMenu,
}

/// What the deck area should show instead of cards, if anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeckState {
    Loading,
    NoVerbs,
    NoMatches,
    Cards,
}

pub struct App {
    pub screen: AppScreen,
    pub theme: &'static Theme,
    pub config: Config,
    pub progress: ProgressStore,
    pub selector: CatalogSelector,
    pub pairs: Vec<LanguagePair>,
    pub filter: StatusFilter,
    pub pager: Pager,
    /// Index of the highlighted card within the current page.
    pub selected: usize,
    pub expanded: HashSet<u32>,
    pub pair_menu_selected: usize,
    pub should_quit: bool,
    source: Arc<dyn CatalogSource>,
    events: Sender<AppEvent>,
}

impl App {
    pub fn new(
        config: Config,
        theme: &'static Theme,
        kv: Arc<dyn KeyValueStore>,
        source: Arc<dyn CatalogSource>,
        events: Sender<AppEvent>,
    ) -> Self {
        let mut progress = ProgressStore::new(kv.clone());
        progress.initialize();

        let mut selector = CatalogSelector::new(kv);
        let ticket = selector.initialize();

        let pairs = source.pairs();
        let pager = Pager::new(config.page_size);

        let app = Self {
            screen: AppScreen::Deck,
            theme,
            config,
            progress,
            selector,
            pairs,
            filter: StatusFilter::All,
            pager,
            selected: 0,
            expanded: HashSet::new(),
            pair_menu_selected: 0,
            should_quit: false,
            source,
            events,
        };
        app.start_load(ticket);
        app
    }

    fn start_load(&self, ticket: LoadTicket) {
        event::spawn_catalog_load(self.source.clone(), ticket, self.events.clone());
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        if let AppEvent::CatalogLoaded { ticket, result } = event {
            self.on_catalog_loaded(&ticket, result);
        }
    }

    pub fn on_catalog_loaded(&mut self, ticket: &LoadTicket, result: Result<Vec<Verb>, CatalogError>) {
        if self.selector.complete_load(ticket, result) {
            self.reset_view();
        }
    }

    fn reset_view(&mut self) {
        self.pager.reset();
        self.selected = 0;
        self.expanded.clear();
    }

    // ── Derived view ────────────────────────────────────────────────────

    pub fn code(&self) -> &str {
        self.selector.active_code()
    }

    pub fn catalog(&self) -> &[Verb] {
        self.selector.catalog()
    }

    pub fn is_loading(&self) -> bool {
        !self.progress.is_hydrated() || self.selector.load_status() == LoadStatus::Loading
    }

    pub fn stats(&self) -> VerbStats {
        self.progress.get_stats(self.code(), self.catalog().len())
    }

    pub fn filtered(&self) -> Vec<&Verb> {
        filter::filter(self.catalog(), self.progress.progress(), self.code(), self.filter)
    }

    pub fn total_pages(&self) -> usize {
        pagination::total_pages(self.filtered().len(), self.pager.page_size)
    }

    pub fn page_verbs(&self) -> Vec<&Verb> {
        self.pager.slice(&self.filtered()).to_vec()
    }

    pub fn selected_verb(&self) -> Option<&Verb> {
        self.page_verbs().get(self.selected).copied()
    }

    pub fn status_of(&self, verb: &Verb) -> VerbStatus {
        self.progress.get_status(self.code(), verb.id)
    }

    pub fn deck_state(&self) -> DeckState {
        if self.is_loading() {
            DeckState::Loading
        } else if self.catalog().is_empty() {
            DeckState::NoVerbs
        } else if self.filtered().is_empty() {
            DeckState::NoMatches
        } else {
            DeckState::Cards
        }
    }

    // ── Deck actions ────────────────────────────────────────────────────

    pub fn mark_selected(&mut self, mark: Mark) {
        let Some(verb_id) = self.selected_verb().map(|v| v.id) else {
            return;
        };
        let code = self.code().to_string();
        if self.progress.set_status(&code, verb_id, mark) {
            log::debug!("Marked {code}/{verb_id} as {mark:?}");
        }
        // The verb may have left the current filter.
        self.clamp_cursor();
    }

    pub fn toggle_translation(&mut self) {
        if let Some(id) = self.selected_verb().map(|v| v.id) {
            if !self.expanded.remove(&id) {
                self.expanded.insert(id);
            }
        }
    }

    pub fn is_expanded(&self, verb: &Verb) -> bool {
        self.expanded.contains(&verb.id)
    }

    pub fn select_next(&mut self) {
        let len = self.page_verbs().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        self.pager.reset();
        self.selected = 0;
    }

    pub fn next_page(&mut self) {
        let total = self.total_pages();
        let before = self.pager.page;
        self.pager.next(total);
        if self.pager.page != before {
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        let before = self.pager.page;
        self.pager.prev();
        if self.pager.page != before {
            self.selected = 0;
        }
    }

    pub fn first_page(&mut self) {
        self.pager.reset();
        self.selected = 0;
    }

    pub fn last_page(&mut self) {
        let total = self.total_pages();
        self.pager.jump(total, total);
        self.selected = 0;
    }

    fn clamp_cursor(&mut self) {
        let total = self.total_pages();
        self.pager.clamp(total);
        let len = self.page_verbs().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    // ── Language pair menu ──────────────────────────────────────────────

    pub fn open_pair_menu(&mut self) {
        let code = self.code().to_string();
        self.pair_menu_selected = self
            .pairs
            .iter()
            .position(|p| p.code == code)
            .unwrap_or(0);
        self.screen = AppScreen::PairMenu;
    }

    pub fn close_pair_menu(&mut self) {
        self.screen = AppScreen::Deck;
    }

    pub fn pair_menu_next(&mut self) {
        if !self.pairs.is_empty() {
            self.pair_menu_selected = (self.pair_menu_selected + 1) % self.pairs.len();
        }
    }

    pub fn pair_menu_prev(&mut self) {
        if !self.pairs.is_empty() {
            self.pair_menu_selected = if self.pair_menu_selected == 0 {
                self.pairs.len() - 1
            } else {
                self.pair_menu_selected - 1
            };
        }
    }

    pub fn confirm_pair_menu(&mut self) {
        if let Some(pair) = self.pairs.get(self.pair_menu_selected).cloned() {
            self.select_pair(pair);
        }
        self.screen = AppScreen::Deck;
    }

    pub fn select_pair(&mut self, pair: LanguagePair) {
        let ticket = self.selector.select_pair(pair);
        self.reset_view();
        self.start_load(ticket);
    }

    /// Select a pair by code, for the `--pair` flag. Returns false if no
    /// available pair has that code.
    pub fn select_pair_by_code(&mut self, code: &str) -> bool {
        match self.pairs.iter().find(|p| p.code == code).cloned() {
            Some(pair) => {
                self.select_pair(pair);
                true
            }
            None => false,
        }
    }

    pub fn reload_catalog(&mut self) {
        if let Some(ticket) = self.selector.reload() {
            self.reset_view();
            self.start_load(ticket);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::catalog::source::StaticCatalog;
    use crate::event::EventHandler;
    use crate::store::kv::MemoryStore;

    fn pair(id: u32, code: &str) -> LanguagePair {
        LanguagePair {
            id,
            main_language: format!("Main{id}"),
            goal_language: format!("Goal{id}"),
            code: code.to_string(),
        }
    }

    fn verbs(n: u32) -> Vec<Verb> {
        (1..=n)
            .map(|id| Verb {
                id,
                word: format!("verb{id}"),
                example: format!("example {id}"),
                word_translation: format!("to verb{id}"),
                example_translation: format!("translated {id}"),
                tips: None,
            })
            .collect()
    }

    fn make_app(kv: Arc<dyn KeyValueStore>) -> (EventHandler, App) {
        let source = StaticCatalog::new()
            .with_catalog(LanguagePair::default(), verbs(14))
            .with_catalog(pair(2, "en-es"), verbs(3));
        let events = EventHandler::detached();
        let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
        let app = App::new(
            Config::default(),
            theme,
            kv,
            Arc::new(source),
            events.sender(),
        );
        (events, app)
    }

    fn pump(events: &EventHandler, app: &mut App) {
        while app.is_loading() {
            let event = events
                .next_timeout(Duration::from_secs(5))
                .expect("catalog load never arrived");
            app.handle_event(event);
        }
    }

    #[test]
    fn starts_on_default_pair_and_loads() {
        let (events, mut app) = make_app(Arc::new(MemoryStore::new()));
        assert_eq!(app.deck_state(), DeckState::Loading);
        pump(&events, &mut app);
        assert_eq!(app.code(), "tr-en");
        assert_eq!(app.deck_state(), DeckState::Cards);
        assert_eq!(app.total_pages(), 3);
        assert_eq!(app.page_verbs().len(), 6);
        assert_eq!(app.stats().pending, 14);
    }

    #[test]
    fn marking_under_a_filter_keeps_cursor_valid() {
        let (events, mut app) = make_app(Arc::new(MemoryStore::new()));
        pump(&events, &mut app);

        app.set_filter(StatusFilter::Pending);
        app.last_page();
        assert_eq!(app.pager.page, 3);
        app.select_next();
        assert_eq!(app.selected, 1);

        // Page 3 holds verbs 13 and 14; marking both empties it.
        app.mark_selected(Mark::Learned);
        app.mark_selected(Mark::Learned);
        assert_eq!(app.total_pages(), 2);
        assert_eq!(app.pager.page, 2);
        assert!(app.selected < app.page_verbs().len());
        assert_eq!(app.stats().learned, 2);
    }

    #[test]
    fn changing_filter_resets_to_first_page() {
        let (events, mut app) = make_app(Arc::new(MemoryStore::new()));
        pump(&events, &mut app);
        app.next_page();
        app.next_page();
        assert_eq!(app.pager.page, 3);
        app.set_filter(StatusFilter::Learned);
        assert_eq!(app.pager.page, 1);
        assert_eq!(app.deck_state(), DeckState::NoMatches);
        assert_eq!(app.total_pages(), 0);
    }

    #[test]
    fn switching_pairs_uses_the_newest_catalog() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let (events, mut app) = make_app(kv.clone());
        pump(&events, &mut app);

        app.mark_selected(Mark::NotLearned);
        assert!(app.select_pair_by_code("en-es"));
        assert!(app.catalog().is_empty());
        pump(&events, &mut app);
        assert_eq!(app.catalog().len(), 3);
        assert_eq!(app.stats().not_learned, 0);

        // Progress and selection come back after a restart.
        let (events, mut restarted) = make_app(kv);
        pump(&events, &mut restarted);
        assert_eq!(restarted.code(), "en-es");
        assert!(restarted.select_pair_by_code("tr-en"));
        pump(&events, &mut restarted);
        assert_eq!(restarted.stats().not_learned, 1);
    }

    #[test]
    fn unknown_pair_shows_no_verbs() {
        let (events, mut app) = make_app(Arc::new(MemoryStore::new()));
        app.select_pair(pair(9, "xx-yy"));
        pump(&events, &mut app);
        assert_eq!(app.deck_state(), DeckState::NoVerbs);
        assert_eq!(app.total_pages(), 0);
        app.mark_selected(Mark::Learned);
        assert!(app.progress.progress().is_empty());
    }

    #[test]
    fn translation_toggles_per_verb() {
        let (events, mut app) = make_app(Arc::new(MemoryStore::new()));
        pump(&events, &mut app);
        app.toggle_translation();
        let first = app.selected_verb().cloned().unwrap();
        assert!(app.is_expanded(&first));
        app.toggle_translation();
        assert!(!app.is_expanded(&first));
    }

    #[test]
    fn pair_menu_wraps_and_selects() {
        let (events, mut app) = make_app(Arc::new(MemoryStore::new()));
        pump(&events, &mut app);
        app.open_pair_menu();
        assert_eq!(app.screen, AppScreen::PairMenu);
        assert_eq!(app.pair_menu_selected, 0);
        app.pair_menu_prev();
        assert_eq!(app.pair_menu_selected, 1);
        app.confirm_pair_menu();
        assert_eq!(app.screen, AppScreen::Deck);
        assert_eq!(app.code(), "en-es");
    }
}
