//! Wire types for the content API
//!
//! These mirror the backend's JSON as loosely as needed to accept every
//! shape it is known to send. Nothing outside `api` sees them: they are
//! converted to the `quran` model at the boundary.

use serde::{Deserialize, Serialize};

/// Entry of `GET /api/surahs/`
#[derive(Debug, Clone, Deserialize)]
pub struct RawChapterSummary {
    pub number: u16,
    #[serde(default)]
    pub name_arabic: Option<String>,
    #[serde(default, alias = "name_en")]
    pub name_english: Option<String>,
    #[serde(default)]
    pub name_translation_bn: Option<String>,
    #[serde(default)]
    pub revelation_type: Option<String>,
    #[serde(default)]
    pub total_verses: Option<u16>,
}

/// Accepted shapes of the chapter catalogue
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CatalogPayload {
    List(Vec<RawChapterSummary>),
    Envelope { results: Vec<RawChapterSummary> },
}

impl CatalogPayload {
    /// The entries, whatever the shape
    pub fn into_entries(self) -> Vec<RawChapterSummary> {
        match self {
            Self::List(entries) | Self::Envelope { results: entries } => entries,
        }
    }
}

/// Chapter fields embedded in the detailed chapter shape
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChapter {
    #[serde(default)]
    pub number: Option<u16>,
    #[serde(default)]
    pub name_arabic: Option<String>,
    #[serde(default, alias = "name_en")]
    pub name_english: Option<String>,
}

/// A verse as sent by the backend
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVerse {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub surah: Option<u16>,
    #[serde(default)]
    pub surah_name: Option<String>,
    #[serde(default)]
    pub surah_name_arabic: Option<String>,
    pub number_in_surah: u16,
    #[serde(default)]
    pub text_uthmani_cleaned: Option<String>,
    #[serde(default)]
    pub text_uthmani: Option<String>,
    #[serde(default)]
    pub text_indopak: Option<String>,
    #[serde(default)]
    pub text_imlaei: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub translation_en: Option<String>,
    #[serde(default)]
    pub translation_bn: Option<String>,
    #[serde(default)]
    pub words: Vec<RawWord>,
    #[serde(default)]
    pub page_number: Option<u32>,
    #[serde(default)]
    pub juz_number: Option<u32>,
}

/// A word entry nested in a verse
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWord {
    #[serde(default)]
    pub word_index: Option<u16>,
    #[serde(default, alias = "arabic")]
    pub arabic_word: Option<String>,
    #[serde(default)]
    pub transliteration: Option<String>,
    #[serde(default, alias = "meaning")]
    pub meaning_en: Option<String>,
    #[serde(default, alias = "root")]
    pub root_word: Option<String>,
}

/// The three accepted shapes of `GET /api/surahs/{number}/`
///
/// Variant order matters: serde tries them top to bottom.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChapterPayload {
    /// A bare array of verses
    Verses(Vec<RawVerse>),
    /// A paginated `results` envelope
    Envelope { results: Vec<RawVerse> },
    /// Verses plus chapter fields
    Detailed {
        #[serde(alias = "verses")]
        units: Vec<RawVerse>,
        #[serde(default, alias = "surah")]
        chapter: Option<RawChapter>,
    },
}

/// Body of `GET /api/verse/{id}/word/{offset}/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WordDetailResponse {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub arabic: Option<String>,
    #[serde(default)]
    pub transliteration: Option<String>,
    #[serde(default)]
    pub meaning: Option<String>,
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub pronunciation_audio: Option<String>,
}

impl WordDetailResponse {
    /// The embedded error marker, if the backend set one
    pub fn error_marker(&self) -> Option<String> {
        match &self.error {
            None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => None,
            Some(serde_json::Value::String(s)) if s.is_empty() => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Body of `GET /api/bismillah/`
#[derive(Debug, Clone, Deserialize)]
pub struct InvocationResponse {
    pub text_uthmani: String,
    #[serde(default)]
    pub translation_en: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub words: Vec<RawInvocationWord>,
}

/// One word of the invocation
#[derive(Debug, Clone, Deserialize)]
pub struct RawInvocationWord {
    pub index: u16,
    pub arabic: String,
    #[serde(default)]
    pub audio: Option<String>,
}

/// Kind of bookmark the backend stores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkKind {
    #[default]
    Default,
}

/// Body of `POST /api/bookmarks/`
#[derive(Debug, Clone, Serialize)]
pub struct BookmarkRequest {
    pub ayah: u64,
    pub bookmark_type: BookmarkKind,
}
