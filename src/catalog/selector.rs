use std::sync::Arc;

use crate::catalog::source::{CatalogError, CatalogSource};
use crate::store::kv::KeyValueStore;
use crate::store::schema::{LanguagePair, SELECTED_PAIR_KEY, Verb};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Identifies one catalog load. Only the ticket from the most recent
/// selection is accepted by `CatalogSelector::complete_load`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    code: String,
}

impl LoadTicket {
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// Owns the active language pair and the verb catalog loaded for it.
pub struct CatalogSelector {
    kv: Arc<dyn KeyValueStore>,
    active_pair: Option<LanguagePair>,
    catalog: Vec<Verb>,
    load_status: LoadStatus,
    generation: u64,
}

impl CatalogSelector {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            active_pair: None,
            catalog: Vec::new(),
            load_status: LoadStatus::Idle,
            generation: 0,
        }
    }

    /// Adopt the persisted pair, or the default pair when none is stored or
    /// the stored record does not parse. Returns the ticket for its load.
    pub fn initialize(&mut self) -> LoadTicket {
        let pair = match self.kv.get(SELECTED_PAIR_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<LanguagePair>(&json) {
                Ok(pair) if pair.is_well_formed() => pair,
                Ok(_) => {
                    log::warn!("Stored language pair has no code, using default");
                    LanguagePair::default()
                }
                Err(e) => {
                    log::warn!("Ignoring malformed {SELECTED_PAIR_KEY}: {e}");
                    LanguagePair::default()
                }
            },
            Ok(None) => LanguagePair::default(),
            Err(e) => {
                log::warn!("Failed to read {SELECTED_PAIR_KEY}: {e}");
                LanguagePair::default()
            }
        };
        log::info!("Active language pair: {}", pair.code);
        self.activate(pair)
    }

    /// Switch to `pair`, persisting the choice. The previous catalog is
    /// dropped right away so nothing from the old pair lingers.
    pub fn select_pair(&mut self, pair: LanguagePair) -> LoadTicket {
        match serde_json::to_string(&pair) {
            Ok(json) => {
                if let Err(e) = self.kv.set(SELECTED_PAIR_KEY, &json) {
                    log::warn!("Failed to persist language pair {}: {e}", pair.code);
                }
            }
            Err(e) => log::error!("Failed to encode language pair {}: {e}", pair.code),
        }
        log::info!("Selected language pair: {}", pair.code);
        self.activate(pair)
    }

    fn activate(&mut self, pair: LanguagePair) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket {
            generation: self.generation,
            code: pair.code.clone(),
        };
        self.active_pair = Some(pair);
        self.catalog.clear();
        self.load_status = LoadStatus::Loading;
        ticket
    }

    /// Ticket for reloading the active pair, or None if nothing is selected.
    pub fn reload(&mut self) -> Option<LoadTicket> {
        let pair = self.active_pair.clone()?;
        Some(self.activate(pair))
    }

    /// Apply the outcome of a fetch. Returns false and leaves state untouched
    /// when the ticket was superseded by a later selection.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Vec<Verb>, CatalogError>,
    ) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "Discarding stale catalog load for {} (generation {} < {})",
                ticket.code,
                ticket.generation,
                self.generation
            );
            return false;
        }

        match result {
            Ok(verbs) => {
                log::info!("Loaded {} verbs for {}", verbs.len(), ticket.code);
                self.catalog = verbs;
                self.load_status = LoadStatus::Ready;
            }
            Err(e) => {
                log::warn!("Catalog load failed for {}: {e}", ticket.code);
                self.catalog.clear();
                self.load_status = LoadStatus::Failed;
            }
        }
        true
    }

    /// Fetch the active pair's catalog on the calling thread.
    pub fn load_catalog(&mut self, source: &dyn CatalogSource) {
        let Some(pair) = self.active_pair.clone() else {
            return;
        };
        let ticket = if self.load_status == LoadStatus::Loading {
            LoadTicket {
                generation: self.generation,
                code: pair.code.clone(),
            }
        } else {
            self.activate(pair)
        };
        let result = source.fetch(ticket.code());
        self.complete_load(&ticket, result);
    }

    pub fn active_pair(&self) -> Option<&LanguagePair> {
        self.active_pair.as_ref()
    }

    pub fn active_code(&self) -> &str {
        self.active_pair.as_ref().map_or("", |p| p.code.as_str())
    }

    pub fn catalog(&self) -> &[Verb] {
        &self.catalog
    }

    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::source::StaticCatalog;
    use crate::store::kv::MemoryStore;

    fn verb(id: u32, word: &str) -> Verb {
        Verb {
            id,
            word: word.to_string(),
            example: format!("{word}!"),
            word_translation: format!("to {word}"),
            example_translation: format!("{word}!"),
            tips: None,
        }
    }

    fn pair(id: u32, code: &str) -> LanguagePair {
        LanguagePair {
            id,
            main_language: "Main".to_string(),
            goal_language: "Goal".to_string(),
            code: code.to_string(),
        }
    }

    #[test]
    fn missing_selection_adopts_default_pair() {
        let mut selector = CatalogSelector::new(Arc::new(MemoryStore::new()));
        let ticket = selector.initialize();
        assert_eq!(selector.active_pair(), Some(&LanguagePair::default()));
        assert_eq!(ticket.code(), "tr-en");
        assert_eq!(selector.load_status(), LoadStatus::Loading);
    }

    #[test]
    fn invalid_json_adopts_default_pair() {
        let kv = MemoryStore::with_entries([(SELECTED_PAIR_KEY, "{\"id\": 3, oops")]);
        let mut selector = CatalogSelector::new(Arc::new(kv));
        selector.initialize();
        assert_eq!(selector.active_pair(), Some(&LanguagePair::default()));
    }

    #[test]
    fn wrong_shape_adopts_default_pair() {
        let kv = MemoryStore::with_entries([(SELECTED_PAIR_KEY, r#"{"code": 5}"#)]);
        let mut selector = CatalogSelector::new(Arc::new(kv));
        selector.initialize();
        assert_eq!(selector.active_code(), "tr-en");
    }

    #[test]
    fn persisted_pair_is_restored() {
        let kv = MemoryStore::with_entries([(
            SELECTED_PAIR_KEY,
            r#"{"id":2,"mainLanguage":"English","goalLanguage":"Spanish","code":"en-es"}"#,
        )]);
        let mut selector = CatalogSelector::new(Arc::new(kv));
        selector.initialize();
        assert_eq!(selector.active_code(), "en-es");
    }

    #[test]
    fn select_pair_persists_and_clears_catalog() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let source = StaticCatalog::new()
            .with_catalog(pair(1, "tr-en"), vec![verb(1, "gitmek")])
            .with_catalog(pair(2, "en-es"), vec![verb(1, "ir")]);
        let mut selector = CatalogSelector::new(kv.clone());
        selector.initialize();
        selector.load_catalog(&source);
        assert_eq!(selector.catalog().len(), 1);

        selector.select_pair(pair(2, "en-es"));
        assert!(selector.catalog().is_empty());
        assert_eq!(selector.load_status(), LoadStatus::Loading);

        let stored: LanguagePair =
            serde_json::from_str(&kv.get(SELECTED_PAIR_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.code, "en-es");

        selector.load_catalog(&source);
        assert_eq!(selector.catalog()[0].word, "ir");
        assert_eq!(selector.load_status(), LoadStatus::Ready);
    }

    #[test]
    fn unknown_code_fails_with_empty_catalog() {
        let mut selector = CatalogSelector::new(Arc::new(MemoryStore::new()));
        selector.select_pair(pair(9, "xx-yy"));
        selector.load_catalog(&StaticCatalog::new());
        assert_eq!(selector.load_status(), LoadStatus::Failed);
        assert!(selector.catalog().is_empty());
    }

    #[test]
    fn stale_load_is_discarded() {
        let mut selector = CatalogSelector::new(Arc::new(MemoryStore::new()));
        let ticket_a = selector.select_pair(pair(1, "aa-bb"));
        let ticket_b = selector.select_pair(pair(2, "cc-dd"));

        assert!(selector.complete_load(&ticket_b, Ok(vec![verb(1, "b")])));
        assert!(!selector.complete_load(&ticket_a, Ok(vec![verb(1, "a"), verb(2, "a2")])));

        assert_eq!(selector.active_code(), "cc-dd");
        assert_eq!(selector.catalog().len(), 1);
        assert_eq!(selector.catalog()[0].word, "b");
        assert_eq!(selector.load_status(), LoadStatus::Ready);
    }

    #[test]
    fn stale_failure_does_not_clobber_pending_load() {
        let mut selector = CatalogSelector::new(Arc::new(MemoryStore::new()));
        let ticket_a = selector.select_pair(pair(1, "aa-bb"));
        let _ticket_b = selector.select_pair(pair(2, "cc-dd"));
        assert!(!selector.complete_load(
            &ticket_a,
            Err(CatalogError::NotFound("aa-bb".to_string()))
        ));
        assert_eq!(selector.load_status(), LoadStatus::Loading);
    }
}
