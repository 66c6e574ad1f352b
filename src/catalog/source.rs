use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use thiserror::Error;

use crate::store::schema::{LanguagePair, Verb};

pub const PAIRS_FILE: &str = "language-pairs.json";

#[derive(Embed)]
#[folder = "assets/catalogs/"]
struct CatalogAssets;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("No catalog for language pair {0:?}")]
    NotFound(String),

    #[error("Malformed catalog for {code:?}: {reason}")]
    Malformed { code: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Read-only supplier of language pairs and their verb lists.
pub trait CatalogSource: Send + Sync {
    fn pairs(&self) -> Vec<LanguagePair>;
    fn fetch(&self, code: &str) -> Result<Vec<Verb>, CatalogError>;
}

/// Parse a verb list, rejecting duplicate ids within the catalog.
pub fn parse_verbs(code: &str, json: &str) -> Result<Vec<Verb>, CatalogError> {
    let verbs: Vec<Verb> = serde_json::from_str(json).map_err(|e| CatalogError::Malformed {
        code: code.to_string(),
        reason: e.to_string(),
    })?;

    let mut seen = HashSet::with_capacity(verbs.len());
    if let Some(dup) = verbs.iter().find(|v| !seen.insert(v.id)) {
        return Err(CatalogError::Malformed {
            code: code.to_string(),
            reason: format!("duplicate verb id {}", dup.id),
        });
    }
    Ok(verbs)
}

fn parse_pairs(json: &str) -> Vec<LanguagePair> {
    match serde_json::from_str::<Vec<LanguagePair>>(json) {
        Ok(pairs) => pairs.into_iter().filter(|p| p.is_well_formed()).collect(),
        Err(e) => {
            log::warn!("Ignoring malformed {PAIRS_FILE}: {e}");
            Vec::new()
        }
    }
}

/// Catalogs bundled into the binary.
pub struct EmbeddedCatalog {
    pairs: Vec<LanguagePair>,
    files: HashMap<String, String>,
}

impl EmbeddedCatalog {
    pub fn new() -> Self {
        let pairs = CatalogAssets::get(PAIRS_FILE)
            .and_then(|f| String::from_utf8(f.data.into_owned()).ok())
            .map(|json| parse_pairs(&json))
            .unwrap_or_default();

        let files = CatalogAssets::iter()
            .filter(|name| *name != PAIRS_FILE)
            .filter_map(|name| {
                name.strip_suffix(".json")
                    .map(|code| (code.to_string(), name.to_string()))
            })
            .collect();

        Self { pairs, files }
    }

}

impl Default for EmbeddedCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogSource for EmbeddedCatalog {
    fn pairs(&self) -> Vec<LanguagePair> {
        self.pairs.clone()
    }

    fn fetch(&self, code: &str) -> Result<Vec<Verb>, CatalogError> {
        let name = self
            .files
            .get(code)
            .ok_or_else(|| CatalogError::NotFound(code.to_string()))?;
        let file =
            CatalogAssets::get(name).ok_or_else(|| CatalogError::NotFound(code.to_string()))?;
        let json = std::str::from_utf8(file.data.as_ref()).map_err(|e| CatalogError::Malformed {
            code: code.to_string(),
            reason: e.to_string(),
        })?;
        parse_verbs(code, json)
    }
}

/// Catalogs read from a user directory laid out like the bundled assets.
pub struct DirCatalog {
    pairs: Vec<LanguagePair>,
    files: HashMap<String, PathBuf>,
}

impl DirCatalog {
    pub fn new(dir: &Path) -> Result<Self, CatalogError> {
        let pairs = match fs::read_to_string(dir.join(PAIRS_FILE)) {
            Ok(json) => parse_pairs(&json),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let mut files = HashMap::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_json = path.extension().and_then(|x| x.to_str()) == Some("json");
            let is_pairs = path.file_name().and_then(|n| n.to_str()) == Some(PAIRS_FILE);
            if !is_json || is_pairs {
                continue;
            }
            if let Some(code) = path.file_stem().and_then(|s| s.to_str()) {
                files.insert(code.to_string(), path.clone());
            }
        }
        log::info!("Indexed {} catalog(s) in {}", files.len(), dir.display());

        Ok(Self { pairs, files })
    }
}

impl CatalogSource for DirCatalog {
    fn pairs(&self) -> Vec<LanguagePair> {
        self.pairs.clone()
    }

    fn fetch(&self, code: &str) -> Result<Vec<Verb>, CatalogError> {
        let path = self
            .files
            .get(code)
            .ok_or_else(|| CatalogError::NotFound(code.to_string()))?;
        let json = fs::read_to_string(path)?;
        parse_verbs(code, &json)
    }
}

/// In-memory catalog table.
#[derive(Clone, Default)]
pub struct StaticCatalog {
    pairs: Vec<LanguagePair>,
    verbs: HashMap<String, Vec<Verb>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, pair: LanguagePair, verbs: Vec<Verb>) -> Self {
        self.verbs.insert(pair.code.clone(), verbs);
        self.pairs.push(pair);
        self
    }
}

impl CatalogSource for StaticCatalog {
    fn pairs(&self) -> Vec<LanguagePair> {
        self.pairs.clone()
    }

    fn fetch(&self, code: &str) -> Result<Vec<Verb>, CatalogError> {
        self.verbs
            .get(code)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(code.to_string()))
    }
}
