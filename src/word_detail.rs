//! Word detail lookup with a local fallback
//!
//! Remote metadata is best-effort. Any failure degrades to a record built
//! from the verse text on screen; only an out-of-range word yields nothing.

use tracing::{debug, warn};

use crate::addressing;
use crate::api::{ApiError, QuranApi, WordDetailResponse};

const NOT_AVAILABLE: &str = "N/A";

/// A word the user asked about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRef {
    /// Backend id of the owning verse
    pub verse_id: u64,
    pub surah: u16,
    pub ayah: u16,
    /// 1-based position within the verse
    pub word: u16,
    /// Audio already known for this word
    pub audio_url: Option<String>,
}

impl WordRef {
    /// Zero-based offset used by the word endpoint
    pub fn offset(&self) -> Option<u16> {
        self.word.checked_sub(1)
    }

    /// The given audio, or the word provider's address
    pub fn resolved_audio_url(&self) -> String {
        self.audio_url
            .clone()
            .unwrap_or_else(|| addressing::word_audio_url(self.surah, self.ayah, self.word))
    }
}

/// Where a detail record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSource {
    Remote,
    Local,
}

/// Everything the word view shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordDetail {
    pub arabic: String,
    pub transliteration: String,
    pub meaning: String,
    pub root: String,
    pub audio_url: String,
    pub source: DetailSource,
}

/// Build the detail record from a lookup result and the verse text
pub fn resolve(
    remote: Result<WordDetailResponse, ApiError>,
    word: &WordRef,
    local_text: &str,
) -> Option<WordDetail> {
    let audio_url = word.resolved_audio_url();

    match remote {
        Ok(response) if response.error_marker().is_none() => {
            let field = |value: Option<String>, placeholder: &str| {
                value.filter(|s| !s.trim().is_empty()).unwrap_or_else(|| placeholder.to_string())
            };
            Some(WordDetail {
                arabic: field(response.arabic, NOT_AVAILABLE),
                transliteration: field(response.transliteration, NOT_AVAILABLE),
                meaning: field(response.meaning, "Meaning not available"),
                root: field(response.root, NOT_AVAILABLE),
                audio_url,
                source: DetailSource::Remote,
            })
        }
        remote => {
            match remote {
                Ok(response) => warn!(
                    verse_id = word.verse_id,
                    word = word.word,
                    marker = ?response.error_marker(),
                    "Word lookup returned an error marker, using verse text"
                ),
                Err(e) => warn!(
                    verse_id = word.verse_id,
                    word = word.word,
                    error = %e,
                    "Word lookup failed, using verse text"
                ),
            }
            local_detail(word, local_text, audio_url)
        }
    }
}

fn local_detail(word: &WordRef, local_text: &str, audio_url: String) -> Option<WordDetail> {
    let offset = usize::from(word.offset()?);
    let Some(arabic) = local_text.split_whitespace().nth(offset) else {
        debug!(word = word.word, "Word index out of range for verse text");
        return None;
    };
    Some(WordDetail {
        arabic: arabic.to_string(),
        transliteration: format!("Word {}", word.word),
        meaning: "Detailed meaning not available".to_string(),
        root: NOT_AVAILABLE.to_string(),
        audio_url,
        source: DetailSource::Local,
    })
}

/// Query the backend and resolve the word
pub async fn resolve_word<A: QuranApi>(
    api: &A,
    word: &WordRef,
    local_text: &str,
) -> Option<WordDetail> {
    let offset = word.offset()?;
    let remote = api.word_detail(word.verse_id, offset).await;
    resolve(remote, word, local_text)
}
