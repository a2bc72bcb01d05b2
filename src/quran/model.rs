//! Content model for the Quran text
//!
//! These are the canonical shapes everything downstream of the API boundary
//! works with. A `Chapter` is loaded wholesale and never partially updated.

use serde::{Deserialize, Serialize};

use crate::addressing;

/// Entry of the chapter catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSummary {
    /// Surah number (1-114)
    pub number: u16,
    /// Name in Arabic script
    pub name_arabic: String,
    /// Transliterated English name
    pub name_english: String,
    /// Bangla translation of the name
    pub name_translation: Option<String>,
    /// "meccan" or "medinan"
    pub revelation_type: Option<String>,
    /// Number of verses
    pub total_verses: Option<u16>,
}

impl ChapterSummary {
    /// Label for pickers, e.g. `2. Al-Baqarah (আল-বাকারা)`
    pub fn label(&self) -> String {
        match &self.name_translation {
            Some(translation) => {
                format!("{}. {} ({})", self.number, self.name_english, translation)
            }
            None => format!("{}. {}", self.number, self.name_english),
        }
    }
}

/// A fully loaded chapter with its verses in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Surah number
    pub number: u16,
    /// Name in Arabic script
    pub name_arabic: String,
    /// Transliterated English name
    pub name_english: String,
    /// Verses ordered by number, starting at 1
    pub verses: Vec<Verse>,
}

impl Chapter {
    /// Number of verses
    pub fn verse_count(&self) -> usize {
        self.verses.len()
    }

    /// Verse at a global (zero-based) index
    pub fn verse(&self, index: usize) -> Option<&Verse> {
        self.verses.get(index)
    }

    /// Global index of the verse with the given number
    pub fn position_of(&self, ayah: u16) -> Option<usize> {
        self.verses.iter().position(|v| v.number == ayah)
    }

    /// Header title, e.g. `2. Al-Baqarah`
    pub fn title(&self) -> String {
        format!("{}. {}", self.number, self.name_english)
    }

    /// Name used when a chapter carries no names of its own
    pub fn fallback_english_name(number: u16) -> String {
        format!("Surah {}", number)
    }

    /// Arabic-script name used when a chapter carries no names of its own
    pub fn fallback_arabic_name(number: u16) -> String {
        format!("سورة {}", number)
    }
}

/// Language of a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Bangla,
}

impl Language {
    /// Label shown before the translation text
    pub fn label(&self) -> &'static str {
        match self {
            Self::English => "Translation",
            Self::Bangla => "Bangla",
        }
    }
}

/// A translation of one verse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub language: Language,
    pub text: String,
}

/// A single verse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// Backend identifier, used for word lookups and bookmarks
    pub id: u64,
    /// Surah this verse belongs to
    pub surah: u16,
    /// Number within the surah (1-based)
    pub number: u16,
    /// Arabic text in the preferred script
    pub text: String,
    /// Words in reading order
    pub words: Vec<Word>,
    /// Available translations
    pub translations: Vec<Translation>,
    /// Mushaf page, when known
    pub page_number: Option<u32>,
    /// Juz, when known
    pub juz_number: Option<u32>,
}

impl Verse {
    /// Translation in the given language
    pub fn translation(&self, language: Language) -> Option<&str> {
        self.translations.iter().find(|t| t.language == language).map(|t| t.text.as_str())
    }

    /// English translation or the placeholder shown in its place
    pub fn english_or_placeholder(&self) -> &str {
        self.translation(Language::English).unwrap_or("Translation not available")
    }

    /// Word by 1-based index
    pub fn word(&self, index: u16) -> Option<&Word> {
        index.checked_sub(1).and_then(|i| self.words.get(i as usize))
    }

    /// The text as rendered word by word
    pub fn rendered_text(&self) -> String {
        self.words.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ")
    }

    /// Audio URL of a word of this verse
    pub fn word_audio_url(&self, index: u16) -> String {
        addressing::word_audio_url(self.surah, self.number, index)
    }

    /// Header line, e.g. `Surah Al-Fatiha, Ayah 3 | Page 1 | Juz 1`
    pub fn info_line(&self, chapter_name: &str) -> String {
        let page = self.page_number.map(|p| p.to_string()).unwrap_or_else(|| "N/A".to_string());
        let juz = self.juz_number.map(|j| j.to_string()).unwrap_or_else(|| "N/A".to_string());
        format!("Surah {}, Ayah {} | Page {} | Juz {}", chapter_name, self.number, page, juz)
    }
}

/// A single word of a verse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// 1-based position within the verse
    pub index: u16,
    /// Arabic text
    pub text: String,
    pub transliteration: Option<String>,
    pub meaning: Option<String>,
    pub root: Option<String>,
}

impl Word {
    /// Create a bare word with no linguistic data
    pub fn plain(index: u16, text: impl Into<String>) -> Self {
        Self { index, text: text.into(), transliteration: None, meaning: None, root: None }
    }
}

/// Derive words from verse text by splitting on whitespace
pub fn split_words(text: &str) -> Vec<Word> {
    text.split_whitespace()
        .enumerate()
        .map(|(i, w)| Word::plain((i + 1) as u16, w))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse() -> Verse {
        Verse {
            id: 8,
            surah: 2,
            number: 1,
            text: "الم".to_string(),
            words: split_words("الم"),
            translations: vec![Translation {
                language: Language::English,
                text: "Alif, Lam, Meem.".to_string(),
            }],
            page_number: Some(2),
            juz_number: None,
        }
    }

    #[test]
    fn split_words_is_one_based() {
        let words = split_words("بِسْمِ  اللَّهِ\tالرَّحْمَٰنِ");
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].index, 1);
        assert_eq!(words[2].index, 3);
        assert_eq!(words[1].text, "اللَّهِ");
    }

    #[test]
    fn split_words_of_empty_text() {
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn word_lookup_is_one_based() {
        let v = verse();
        assert_eq!(v.word(1).map(|w| w.text.as_str()), Some("الم"));
        assert!(v.word(0).is_none());
        assert!(v.word(2).is_none());
    }

    #[test]
    fn translation_placeholder() {
        let mut v = verse();
        assert_eq!(v.english_or_placeholder(), "Alif, Lam, Meem.");
        v.translations.clear();
        assert_eq!(v.english_or_placeholder(), "Translation not available");
    }

    #[test]
    fn info_line_marks_missing_fields() {
        assert_eq!(verse().info_line("Al-Baqarah"), "Surah Al-Baqarah, Ayah 1 | Page 2 | Juz N/A");
    }

    #[test]
    fn summary_label() {
        let mut summary = ChapterSummary {
            number: 1,
            name_arabic: "الفاتحة".to_string(),
            name_english: "Al-Fatiha".to_string(),
            name_translation: None,
            revelation_type: None,
            total_verses: Some(7),
        };
        assert_eq!(summary.label(), "1. Al-Fatiha");
        summary.name_translation = Some("সূচনা".to_string());
        assert_eq!(summary.label(), "1. Al-Fatiha (সূচনা)");
    }

    #[test]
    fn chapter_position_of() {
        let chapter = Chapter {
            number: 2,
            name_arabic: "البقرة".to_string(),
            name_english: "Al-Baqarah".to_string(),
            verses: vec![verse()],
        };
        assert_eq!(chapter.position_of(1), Some(0));
        assert_eq!(chapter.position_of(2), None);
        assert_eq!(chapter.title(), "2. Al-Baqarah");
    }
}
