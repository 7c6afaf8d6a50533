//! Keyed lookups over the launcher data directory.
//!
//! ```text
//! <dir>/modpacks.json              array of modpack records
//! <dir>/translations/<lang>.json   one document per language
//! ```
//!
//! Files are read on first use and cached until `clear()`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use dashmap::DashMap;
use thiserror::Error;

use crate::data::models::{AvailableLanguages, Feature, Modpack, Translations};

/// Languages reported when the translations directory cannot be listed.
const FALLBACK_LANGUAGES: [&str; 2] = ["en", "es"];

#[derive(Debug, Error)]
pub enum DataError {
    #[error("data file not found: {0}")]
    NotFound(PathBuf),

    #[error("language '{0}' is not supported")]
    UnsupportedLanguage(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Language codes double as file names, so only plain codes are accepted.
fn is_language_code(lang: &str) -> bool {
    !lang.is_empty()
        && lang.len() <= 16
        && lang
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DataError::NotFound(path.to_path_buf())
        } else {
            DataError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&content).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Cached view of the data directory.
pub struct DataStore {
    dir: PathBuf,
    default_language: String,
    modpacks: ArcSwapOption<Vec<Modpack>>,
    translations: DashMap<String, Arc<Translations>>,
}

impl DataStore {
    pub fn new(dir: impl Into<PathBuf>, default_language: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            default_language: default_language.into(),
            modpacks: ArcSwapOption::empty(),
            translations: DashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn translations_dir(&self) -> PathBuf {
        self.dir.join("translations")
    }

    /// All modpack records.
    pub fn modpacks(&self) -> Result<Arc<Vec<Modpack>>, DataError> {
        if let Some(cached) = self.modpacks.load_full() {
            return Ok(cached);
        }

        let modpacks: Arc<Vec<Modpack>> = Arc::new(read_json(&self.dir.join("modpacks.json"))?);
        self.modpacks.store(Some(modpacks.clone()));
        tracing::info!(count = modpacks.len(), "Loaded modpack data");
        Ok(modpacks)
    }

    /// A single modpack by id.
    pub fn modpack(&self, id: &str) -> Result<Option<Modpack>, DataError> {
        Ok(self.modpacks()?.iter().find(|mp| mp.id == id).cloned())
    }

    /// Translation document for `lang`.
    pub fn translations(&self, lang: &str) -> Result<Arc<Translations>, DataError> {
        if !is_language_code(lang) {
            return Err(DataError::UnsupportedLanguage(lang.to_string()));
        }
        if let Some(cached) = self.translations.get(lang) {
            return Ok(cached.clone());
        }

        let path = self.translations_dir().join(format!("{lang}.json"));
        let translations: Arc<Translations> = match read_json(&path) {
            Ok(doc) => Arc::new(doc),
            Err(DataError::NotFound(_)) => {
                return Err(DataError::UnsupportedLanguage(lang.to_string()))
            }
            Err(e) => return Err(e),
        };
        self.translations
            .insert(lang.to_string(), translations.clone());
        tracing::info!(language = lang, "Loaded translations");
        Ok(translations)
    }

    /// Features of one modpack in one language.
    pub fn features(&self, modpack_id: &str, lang: &str) -> Result<Vec<Feature>, DataError> {
        Ok(self.translations(lang)?.features_for(modpack_id))
    }

    /// Languages with a translation file, sorted.
    pub fn available_languages(&self) -> AvailableLanguages {
        let listed = fs::read_dir(self.translations_dir()).map(|entries| {
            let mut languages: Vec<String> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                .filter(|lang| is_language_code(lang))
                .collect();
            languages.sort();
            languages
        });

        let available_languages = match listed {
            Ok(languages) => languages,
            Err(e) => {
                tracing::warn!(error = %e, dir = %self.translations_dir().display(), "Cannot list translations");
                FALLBACK_LANGUAGES.iter().map(|s| s.to_string()).collect()
            }
        };

        AvailableLanguages {
            available_languages,
            default_language: self.default_language.clone(),
        }
    }

    /// Drop every cached document; the next lookup re-reads from disk.
    pub fn clear(&self) {
        self.modpacks.store(None);
        self.translations.clear();
        tracing::info!("Data caches cleared");
    }
}
