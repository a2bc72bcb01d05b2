//! Conversion from wire types to the content model
//!
//! `normalize_chapter` is the only place that knows about the three chapter
//! response shapes.

use tracing::warn;

use super::error::ApiError;
use super::models::{ChapterPayload, RawChapter, RawChapterSummary, RawVerse, RawWord};
use crate::quran::{Chapter, ChapterSummary, Language, Translation, Verse, Word, split_words};

/// Parse and normalize a chapter response body
pub fn parse_chapter(body: &str, requested: u16) -> Result<Chapter, ApiError> {
    let payload: ChapterPayload = serde_json::from_str(body)
        .map_err(|e| ApiError::UnexpectedShape(e.to_string()))?;
    normalize_chapter(payload, requested)
}

/// Convert any accepted chapter shape into a `Chapter`
pub fn normalize_chapter(payload: ChapterPayload, requested: u16) -> Result<Chapter, ApiError> {
    let (raw_verses, raw_chapter) = match payload {
        ChapterPayload::Verses(verses) => (verses, None),
        ChapterPayload::Envelope { results } => (results, None),
        ChapterPayload::Detailed { units, chapter } => (units, chapter),
    };

    if raw_verses.is_empty() {
        return Err(ApiError::EmptyChapter(requested));
    }

    let (number, name_english, name_arabic) = match raw_chapter {
        Some(chapter) => chapter_names(chapter, requested),
        None => names_from_first_verse(&raw_verses[0], requested),
    };

    let mut verses: Vec<Verse> =
        raw_verses.into_iter().map(|raw| normalize_verse(raw, number)).collect();
    verses.sort_by_key(|v| v.number);

    if !verses.iter().enumerate().all(|(i, v)| v.number as usize == i + 1) {
        warn!(surah = number, count = verses.len(), "Verse numbers are not contiguous from 1");
    }

    Ok(Chapter { number, name_arabic, name_english, verses })
}

/// Convert a catalogue entry
pub fn normalize_summary(raw: RawChapterSummary) -> ChapterSummary {
    ChapterSummary {
        number: raw.number,
        name_english: non_empty(raw.name_english)
            .unwrap_or_else(|| Chapter::fallback_english_name(raw.number)),
        name_arabic: non_empty(raw.name_arabic)
            .unwrap_or_else(|| Chapter::fallback_arabic_name(raw.number)),
        name_translation: non_empty(raw.name_translation_bn),
        revelation_type: non_empty(raw.revelation_type),
        total_verses: raw.total_verses,
    }
}

fn chapter_names(chapter: RawChapter, requested: u16) -> (u16, String, String) {
    let number = chapter.number.unwrap_or(requested);
    (
        number,
        non_empty(chapter.name_english).unwrap_or_else(|| Chapter::fallback_english_name(number)),
        non_empty(chapter.name_arabic).unwrap_or_else(|| Chapter::fallback_arabic_name(number)),
    )
}

fn names_from_first_verse(first: &RawVerse, requested: u16) -> (u16, String, String) {
    let number = first.surah.unwrap_or(requested);
    (
        number,
        non_empty(first.surah_name.clone())
            .unwrap_or_else(|| Chapter::fallback_english_name(number)),
        non_empty(first.surah_name_arabic.clone())
            .unwrap_or_else(|| Chapter::fallback_arabic_name(number)),
    )
}

fn normalize_verse(raw: RawVerse, chapter: u16) -> Verse {
    let text = [
        raw.text_uthmani_cleaned,
        raw.text_uthmani,
        raw.text_indopak,
        raw.text_imlaei,
        raw.text,
    ]
    .into_iter()
    .find_map(non_empty)
    .unwrap_or_default();

    let words = if raw.words.is_empty() { split_words(&text) } else { normalize_words(raw.words) };

    let mut translations = Vec::new();
    if let Some(en) = non_empty(raw.translation_en) {
        translations.push(Translation { language: Language::English, text: en });
    }
    if let Some(bn) = non_empty(raw.translation_bn) {
        translations.push(Translation { language: Language::Bangla, text: bn });
    }

    Verse {
        id: raw.id,
        surah: raw.surah.unwrap_or(chapter),
        number: raw.number_in_surah,
        text,
        words,
        translations,
        page_number: raw.page_number,
        juz_number: raw.juz_number,
    }
}

fn normalize_words(raw: Vec<RawWord>) -> Vec<Word> {
    raw.into_iter()
        .enumerate()
        .map(|(i, w)| Word {
            index: (i + 1) as u16,
            text: w.arabic_word.unwrap_or_default(),
            transliteration: non_empty(w.transliteration),
            meaning: non_empty(w.meaning_en),
            root: non_empty(w.root_word),
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
