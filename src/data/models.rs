//! Launcher data records as stored in `modpacks.json` and `translations/*.json`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One modpack record. Fields the gateway does not interpret are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modpack {
    pub id: String,
    pub name: String,
    pub version: String,
    pub minecraft_version: String,
    pub modloader: String,
    pub modloader_version: String,
    #[serde(default)]
    pub gamemode: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub background_image: String,
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_coming_soon: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_modpack_zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Modpack card for list views, with its translated short description.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModpackSummary {
    pub id: String,
    pub name: String,
    pub short_description: String,
    pub version: String,
    pub minecraft_version: String,
    pub modloader: String,
    pub modloader_version: String,
    pub gamemode: String,
    pub logo: String,
    pub background_image: String,
    pub primary_color: String,
    pub is_new: bool,
    pub is_active: bool,
    pub is_coming_soon: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_modpack_zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl ModpackSummary {
    pub fn new(modpack: &Modpack, short_description: String) -> Self {
        Self {
            id: modpack.id.clone(),
            name: modpack.name.clone(),
            short_description,
            version: modpack.version.clone(),
            minecraft_version: modpack.minecraft_version.clone(),
            modloader: modpack.modloader.clone(),
            modloader_version: modpack.modloader_version.clone(),
            gamemode: modpack.gamemode.clone(),
            logo: modpack.logo.clone(),
            background_image: modpack.background_image.clone(),
            primary_color: modpack.primary_color.clone(),
            is_new: modpack.is_new,
            is_active: modpack.is_active,
            is_coming_soon: modpack.is_coming_soon,
            url_modpack_zip: modpack.url_modpack_zip.clone(),
            ip: modpack.ip.clone(),
        }
    }
}

/// Minimal modpack entry for dropdowns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModpackListItem {
    pub id: String,
    pub name: String,
    pub version: String,
    pub minecraft_version: String,
    pub modloader: String,
    pub modloader_version: String,
}

impl From<&Modpack> for ModpackListItem {
    fn from(modpack: &Modpack) -> Self {
        Self {
            id: modpack.id.clone(),
            name: modpack.name.clone(),
            version: modpack.version.clone(),
            minecraft_version: modpack.minecraft_version.clone(),
            modloader: modpack.modloader.clone(),
            modloader_version: modpack.modloader_version.clone(),
        }
    }
}

/// Full modpack record merged with its translated text.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModpackDetail {
    #[serde(flatten)]
    pub modpack: Modpack,
    pub description: String,
    pub short_description: String,
    pub features: Vec<Feature>,
}

impl ModpackDetail {
    pub fn new(mut modpack: Modpack, translations: &Translations) -> Self {
        // Translated fields replace whatever the raw record carried.
        for key in ["description", "shortDescription", "features"] {
            modpack.extra.remove(key);
        }
        let text = translations.modpacks.get(&modpack.id);
        Self {
            description: text.map(|t| t.description.clone()).unwrap_or_default(),
            short_description: text.map(|t| t.short_description.clone()).unwrap_or_default(),
            features: translations.features_for(&modpack.id),
            modpack,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModpackTranslation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
}

/// UI strings needed to render modpack cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiTranslations {
    #[serde(default)]
    pub status: BTreeMap<String, String>,
    #[serde(default)]
    pub modloader: BTreeMap<String, String>,
    #[serde(default)]
    pub gamemode: BTreeMap<String, String>,
}

/// One language's translation document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Translations {
    #[serde(default)]
    pub modpacks: BTreeMap<String, ModpackTranslation>,
    #[serde(default)]
    pub features: BTreeMap<String, Vec<Feature>>,
    #[serde(default)]
    pub ui: UiTranslations,
}

impl Translations {
    pub fn short_description(&self, modpack_id: &str) -> String {
        self.modpacks
            .get(modpack_id)
            .map(|t| t.short_description.clone())
            .unwrap_or_default()
    }

    pub fn features_for(&self, modpack_id: &str) -> Vec<Feature> {
        self.features.get(modpack_id).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableLanguages {
    pub available_languages: Vec<String>,
    pub default_language: String,
}
