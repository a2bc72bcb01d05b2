//! Audio addressing for verses and words
//!
//! Maps (surah, ayah, word) triples to zero-padded identifiers and to the
//! recitation URLs of the three audio providers. Everything here is pure and
//! total: out-of-range numbers still produce a well-formed (if meaningless)
//! URL, bounds are the caller's business.

/// Width of every padded identifier in an audio path
pub const ID_WIDTH: usize = 3;

/// Default base for the primary verse recitation provider
pub const DEFAULT_VERSE_AUDIO_BASE: &str = "https://everyayah.com/data";

/// Path segment of the primary verse recitation under its base URL
const PRIMARY_RECITATION_DIR: &str = "Alafasy_128kbps";

/// Fixed prefix of the fallback verse recitation provider
const FALLBACK_VERSE_AUDIO_BASE: &str = "https://cdn.islamic.network/quran/audio/128/ar.alafasy";

/// Fixed prefix of the word-by-word provider
const WORD_AUDIO_BASE: &str = "https://words.audios.quranwbw.com";

/// Which provider a verse recording comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerseAudioProvider {
    /// everyayah-style host, configurable base URL
    Primary,
    /// islamic.network CDN, fixed URL
    Fallback,
}

/// Render a number as fixed-width zero-padded decimal
///
/// Numbers wider than [`ID_WIDTH`] are rendered in full.
pub fn pad(number: u32) -> String {
    format!("{:0width$}", number, width = ID_WIDTH)
}

/// URL of a whole-verse recording from the primary provider
pub fn verse_audio_url(base: &str, surah: u16, ayah: u16) -> String {
    format!(
        "{}/{}/{}{}.mp3",
        base.trim_end_matches('/'),
        PRIMARY_RECITATION_DIR,
        pad(surah.into()),
        pad(ayah.into())
    )
}

/// URL of a whole-verse recording from the fallback provider
pub fn fallback_verse_audio_url(surah: u16, ayah: u16) -> String {
    format!("{}/{}{}.mp3", FALLBACK_VERSE_AUDIO_BASE, pad(surah.into()), pad(ayah.into()))
}

/// URL of a whole-verse recording for the given provider
pub fn verse_audio_url_for(
    provider: VerseAudioProvider,
    base: &str,
    surah: u16,
    ayah: u16,
) -> String {
    match provider {
        VerseAudioProvider::Primary => verse_audio_url(base, surah, ayah),
        VerseAudioProvider::Fallback => fallback_verse_audio_url(surah, ayah),
    }
}

/// URL of a single word recording
///
/// `word` is the 1-based index local to the verse. Words of a verse that
/// follows the opening invocation are not shifted by the invocation's own
/// four words.
pub fn word_audio_url(surah: u16, ayah: u16, word: u16) -> String {
    format!(
        "{}/{}/{}_{}_{}.mp3",
        WORD_AUDIO_BASE,
        surah,
        pad(surah.into()),
        pad(ayah.into()),
        pad(word.into())
    )
}
