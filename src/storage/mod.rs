//! Persistence codec over a localStorage-shaped backend

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::document::{AppLang, CvDocument};
use crate::style::StyleSettings;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage write failed for key `{key}`: {reason}")]
    Write { key: String, reason: String },
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key/value storage, shaped like the browser's localStorage.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str);
}

/// In-memory backend for native hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: FxHashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Well-known storage keys.
pub mod keys {
    pub const CV_DATA: &str = "cv_data";
    pub const SELECTED_TEMPLATE: &str = "selected_template";
    pub const PRIMARY_COLOR: &str = "primary_color";
    pub const PAPER_COLOR: &str = "paper_color";
    pub const FONT_FAMILY: &str = "font_family";
    pub const FONT_SIZE: &str = "font_size";
    pub const APP_LANG: &str = "app_lang";
}

/// Load the stored document, tolerating anything: missing key, malformed
/// JSON, or partial fields all degrade to defaults, never to a failure.
pub fn load_document(backend: &dyn StorageBackend, lang: AppLang) -> CvDocument {
    match backend.get(keys::CV_DATA) {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => CvDocument::from_json_value(value, lang),
            Err(err) => {
                log::warn!("stored document is not valid JSON, starting fresh: {err}");
                CvDocument::new(lang)
            }
        },
        None => CvDocument::new(lang),
    }
}

pub fn save_document(
    backend: &mut dyn StorageBackend,
    doc: &CvDocument,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(doc)?;
    backend.set(keys::CV_DATA, &json)
}

/// Load style settings, coercing each stored value independently; an
/// invalid entry keeps that setting's default without affecting the rest.
pub fn load_style(backend: &dyn StorageBackend) -> StyleSettings {
    let mut settings = StyleSettings::default();
    if let Some(id) = backend.get(keys::SELECTED_TEMPLATE) {
        if !settings.set_template(&id) {
            log::debug!("ignoring unknown stored template `{id}`");
        }
    }
    if let Some(color) = backend.get(keys::PRIMARY_COLOR) {
        settings.set_primary_color(&color);
    }
    if let Some(color) = backend.get(keys::PAPER_COLOR) {
        settings.set_paper_color(&color);
    }
    if let Some(family) = backend.get(keys::FONT_FAMILY) {
        settings.set_font_family(&family);
    }
    if let Some(size) = backend.get(keys::FONT_SIZE) {
        settings.set_font_size_raw(&size);
    }
    settings
}

pub fn save_style(
    backend: &mut dyn StorageBackend,
    settings: &StyleSettings,
) -> Result<(), StorageError> {
    backend.set(keys::SELECTED_TEMPLATE, settings.template_id())?;
    backend.set(keys::PRIMARY_COLOR, settings.primary_color())?;
    backend.set(keys::PAPER_COLOR, settings.paper_color())?;
    backend.set(keys::FONT_FAMILY, settings.font_family())?;
    backend.set(keys::FONT_SIZE, settings.font_size().as_str())
}

pub fn load_lang(backend: &dyn StorageBackend) -> AppLang {
    backend
        .get(keys::APP_LANG)
        .map(|raw| AppLang::parse(&raw))
        .unwrap_or_default()
}

pub fn save_lang(backend: &mut dyn StorageBackend, lang: AppLang) -> Result<(), StorageError> {
    backend.set(keys::APP_LANG, lang.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::WorkExperience;
    use crate::style::FontSizeKey;

    #[test]
    fn test_document_round_trip() {
        let mut backend = MemoryStorage::new();
        let mut doc = CvDocument::new(AppLang::En);
        doc.update_personal_info(|info| info.first_name = "Ada".into());
        doc.add_work_experience(WorkExperience {
            company: "Acme".into(),
            ..Default::default()
        });
        save_document(&mut backend, &doc).unwrap();

        let restored = load_document(&backend, AppLang::En);
        assert_eq!(restored.personal_info.first_name, "Ada");
        assert_eq!(restored.work_experience, doc.work_experience);
    }

    #[test]
    fn test_missing_document_is_default() {
        let backend = MemoryStorage::new();
        let doc = load_document(&backend, AppLang::Es);
        assert!(!doc.has_data());
        assert_eq!(doc.labels.section_education, "Educación");
    }

    #[test]
    fn test_malformed_document_is_default() {
        let mut backend = MemoryStorage::new();
        backend.set(keys::CV_DATA, "{not json").unwrap();
        let doc = load_document(&backend, AppLang::En);
        assert!(!doc.has_data());
    }

    #[test]
    fn test_partial_document_fields_survive() {
        let mut backend = MemoryStorage::new();
        backend
            .set(
                keys::CV_DATA,
                r#"{"skills":[{"id":"s1","name":"Rust"}],"languages":42}"#,
            )
            .unwrap();
        let doc = load_document(&backend, AppLang::En);
        assert_eq!(doc.skills.len(), 1);
        assert!(doc.languages.is_empty());
    }

    #[test]
    fn test_style_round_trip_with_coercion() {
        let mut backend = MemoryStorage::new();
        backend.set(keys::SELECTED_TEMPLATE, "template-3").unwrap();
        backend.set(keys::PRIMARY_COLOR, "abc").unwrap();
        backend.set(keys::PAPER_COLOR, "chartreuse").unwrap();
        backend.set(keys::FONT_SIZE, "17px").unwrap();

        let settings = load_style(&backend);
        assert_eq!(settings.template_id(), "template-3");
        assert_eq!(settings.primary_color(), "#AABBCC");
        // Invalid paper color keeps the default.
        assert_eq!(settings.paper_color(), "#FFFFFF");
        assert_eq!(settings.font_size(), FontSizeKey::L);

        save_style(&mut backend, &settings).unwrap();
        assert_eq!(backend.get(keys::FONT_SIZE).as_deref(), Some("l"));
    }

    #[test]
    fn test_unknown_template_keeps_default() {
        let mut backend = MemoryStorage::new();
        backend.set(keys::SELECTED_TEMPLATE, "template-99").unwrap();
        let settings = load_style(&backend);
        assert_eq!(settings.template_id(), "template-1");
    }

    #[test]
    fn test_lang_round_trip() {
        let mut backend = MemoryStorage::new();
        assert_eq!(load_lang(&backend), AppLang::Es);
        save_lang(&mut backend, AppLang::En).unwrap();
        assert_eq!(load_lang(&backend), AppLang::En);
    }
}
