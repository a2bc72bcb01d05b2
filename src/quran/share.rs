//! Plain-text renderings of a verse for the clipboard

use super::model::{Chapter, Language, Verse};

/// Text placed on the clipboard by the copy action
pub fn copy_text(chapter: &Chapter, verse: &Verse) -> String {
    let mut text = format!(
        "Surah {} ({}:{})\n\nArabic: {}\n\nTranslation: {}\n\n",
        chapter.name_english,
        chapter.number,
        verse.number,
        verse.text,
        verse.english_or_placeholder()
    );
    if let Some(bangla) = verse.translation(Language::Bangla) {
        text.push_str(&format!("Bangla: {}\n\n", bangla));
    }
    text
}

/// Text placed on the clipboard by the share action
pub fn share_text(chapter: &Chapter, verse: &Verse) -> String {
    format!(
        "Surah {} {}: {}\n\n{}\n\nShared via Quran App",
        chapter.name_english,
        verse.number,
        verse.text,
        verse.translation(Language::English).unwrap_or("")
    )
}
