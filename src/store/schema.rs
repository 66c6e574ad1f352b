use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key under which the selected language pair is persisted.
pub const SELECTED_PAIR_KEY: &str = "selectedLanguagePair";
/// Key under which the whole progress map is persisted.
pub const PROGRESS_KEY: &str = "verbProgress";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagePair {
    pub id: u32,
    pub main_language: String,
    pub goal_language: String,
    pub code: String,
}

impl LanguagePair {
    pub fn label(&self) -> String {
        format!("{} → {}", self.main_language, self.goal_language)
    }

    pub fn is_well_formed(&self) -> bool {
        !self.code.trim().is_empty()
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self {
            id: 1,
            main_language: "Turkish".to_string(),
            goal_language: "English".to_string(),
            code: "tr-en".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verb {
    pub id: u32,
    pub word: String,
    pub example: String,
    pub word_translation: String,
    pub example_translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
}

impl Verb {
    /// Tips with surrounding whitespace removed, if any remain.
    pub fn tips(&self) -> Option<&str> {
        self.tips
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerbStatus {
    Learned,
    NotLearned,
    Pending,
}

/// An explicit status the user can record. `Pending` is deliberately absent:
/// it is only ever synthesized from a missing entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mark {
    Learned,
    NotLearned,
}

impl From<Mark> for VerbStatus {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Learned => VerbStatus::Learned,
            Mark::NotLearned => VerbStatus::NotLearned,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerbStats {
    pub learned: usize,
    pub not_learned: usize,
    pub pending: usize,
}

impl VerbStats {
    pub fn total(&self) -> usize {
        self.learned + self.not_learned + self.pending
    }

    pub fn learned_ratio(&self) -> f64 {
        ratio(self.learned, self.total())
    }

    pub fn not_learned_ratio(&self) -> f64 {
        ratio(self.not_learned, self.total())
    }
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Per-pair, per-verb recorded marks. A pair code or verb id with no entry
/// reads as `VerbStatus::Pending`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressMap {
    pairs: BTreeMap<String, BTreeMap<u32, Mark>>,
}

impl ProgressMap {
    pub fn status(&self, code: &str, verb_id: u32) -> VerbStatus {
        self.pairs
            .get(code)
            .and_then(|entries| entries.get(&verb_id))
            .map(|&mark| mark.into())
            .unwrap_or(VerbStatus::Pending)
    }

    pub fn record(&mut self, code: &str, verb_id: u32, mark: Mark) {
        self.pairs
            .entry(code.to_string())
            .or_default()
            .insert(verb_id, mark);
    }

    /// Counts recorded marks under `code`. Pending is whatever is left of
    /// `total`, floored at zero when the catalog is smaller than the record.
    pub fn stats(&self, code: &str, total: usize) -> VerbStats {
        let (learned, not_learned) = match self.pairs.get(code) {
            Some(entries) => entries.values().fold((0, 0), |(l, n), mark| match mark {
                Mark::Learned => (l + 1, n),
                Mark::NotLearned => (l, n + 1),
            }),
            None => (0, 0),
        };
        VerbStats {
            learned,
            not_learned,
            pending: total.saturating_sub(learned + not_learned),
        }
    }

    /// Number of recorded entries for `code`.
    pub fn recorded(&self, code: &str) -> usize {
        self.pairs.get(code).map_or(0, BTreeMap::len)
    }

    pub fn pair_codes(&self) -> impl Iterator<Item = &str> {
        self.pairs.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.values().all(BTreeMap::is_empty)
    }

    /// Best-effort decode of a persisted map. Only a top level that is not a
    /// JSON object yields `None`. Inside it, entries with a non-numeric id or
    /// an unknown status are dropped one by one, as are stray `"pending"`
    /// values, so absence stays the only encoding of pending.
    pub fn decode(json: &str) -> Option<Self> {
        let raw: BTreeMap<String, Value> = serde_json::from_str(json).ok()?;
        let mut pairs = BTreeMap::new();
        for (code, entries) in raw {
            let Value::Object(entries) = entries else {
                log::warn!("Dropping progress for {code}: not an object");
                continue;
            };
            let mut marks = BTreeMap::new();
            for (key, value) in entries {
                let Ok(id) = key.parse::<u32>() else {
                    log::warn!("Dropping progress entry {code}/{key}: invalid verb id");
                    continue;
                };
                match serde_json::from_value::<VerbStatus>(value) {
                    Ok(VerbStatus::Learned) => {
                        marks.insert(id, Mark::Learned);
                    }
                    Ok(VerbStatus::NotLearned) => {
                        marks.insert(id, Mark::NotLearned);
                    }
                    Ok(VerbStatus::Pending) => {}
                    Err(_) => log::warn!("Dropping progress entry {code}/{id}: unknown status"),
                }
            }
            pairs.insert(code, marks);
        }
        Some(Self { pairs })
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entries_read_as_pending() {
        let map = ProgressMap::default();
        assert_eq!(map.status("tr-en", 1), VerbStatus::Pending);
        assert_eq!(map.status("", 0), VerbStatus::Pending);
    }

    #[test]
    fn record_overwrites_previous_mark() {
        let mut map = ProgressMap::default();
        map.record("tr-en", 4, Mark::NotLearned);
        map.record("tr-en", 4, Mark::Learned);
        assert_eq!(map.status("tr-en", 4), VerbStatus::Learned);
        assert_eq!(map.recorded("tr-en"), 1);
    }

    #[test]
    fn same_id_under_different_pairs_is_independent() {
        let mut map = ProgressMap::default();
        map.record("tr-en", 1, Mark::Learned);
        assert_eq!(map.status("en-es", 1), VerbStatus::Pending);
    }

    #[test]
    fn decode_scenario_counts() {
        let map = ProgressMap::decode(r#"{"tr-en": {"3": "learned", "7": "not-learned"}}"#)
            .unwrap();
        assert_eq!(
            map.stats("tr-en", 10),
            VerbStats {
                learned: 1,
                not_learned: 1,
                pending: 8
            }
        );
    }

    #[test]
    fn decode_drops_pending_values() {
        let map = ProgressMap::decode(r#"{"tr-en": {"1": "pending", "2": "learned"}}"#).unwrap();
        assert_eq!(map.recorded("tr-en"), 1);
        assert_eq!(map.status("tr-en", 1), VerbStatus::Pending);
    }

    #[test]
    fn decode_rejects_non_object_top_level() {
        assert!(ProgressMap::decode("not json").is_none());
        assert!(ProgressMap::decode("[1, 2, 3]").is_none());
        assert!(ProgressMap::decode("\"tr-en\"").is_none());
    }

    #[test]
    fn decode_drops_only_invalid_entries() {
        let map = ProgressMap::decode(
            r#"{"tr-en": {"1": "learned", "2": "learned", "x": "learned"},
                "en-es": {"9": "mastered", "4": "not-learned"},
                "en-tr": 5}"#,
        )
        .unwrap();
        assert_eq!(map.recorded("tr-en"), 2);
        assert_eq!(map.status("tr-en", 2), VerbStatus::Learned);
        assert_eq!(map.recorded("en-es"), 1);
        assert_eq!(map.status("en-es", 9), VerbStatus::Pending);
        assert_eq!(map.status("en-es", 4), VerbStatus::NotLearned);
        assert_eq!(map.recorded("en-tr"), 0);
    }

    #[test]
    fn encode_uses_wire_names() {
        let mut map = ProgressMap::default();
        map.record("tr-en", 3, Mark::Learned);
        map.record("tr-en", 7, Mark::NotLearned);
        assert_eq!(
            map.encode().unwrap(),
            r#"{"tr-en":{"3":"learned","7":"not-learned"}}"#
        );
    }

    #[test]
    fn stats_clamp_pending_when_catalog_shrinks() {
        let mut map = ProgressMap::default();
        for id in 1..=5 {
            map.record("tr-en", id, Mark::Learned);
        }
        let stats = map.stats("tr-en", 3);
        assert_eq!(stats.learned, 5);
        assert_eq!(stats.pending, 0);
    }

    #[test]
    fn language_pair_uses_camel_case_fields() {
        let json = r#"{"id":2,"mainLanguage":"English","goalLanguage":"Spanish","code":"en-es"}"#;
        let pair: LanguagePair = serde_json::from_str(json).unwrap();
        assert_eq!(pair.goal_language, "Spanish");
        assert_eq!(pair.label(), "English → Spanish");
        assert_eq!(serde_json::to_string(&pair).unwrap(), json);
    }

    #[test]
    fn verb_tips_ignore_blank_text() {
        let verb: Verb = serde_json::from_str(
            r#"{"id":1,"word":"gitmek","example":"Eve gidiyorum.","wordTranslation":"to go","exampleTranslation":"I am going home.","tips":"  "}"#,
        )
        .unwrap();
        assert_eq!(verb.tips(), None);
    }
}
