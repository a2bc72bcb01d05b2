//! Verse playlist and playback state machine
//!
//! The player owns a single media source. Starting a verse replaces whatever
//! was playing and hands back a [`PlayRequest`]; the caller fetches it and
//! returns the clip through [`Player::finish_play`]. Only the latest request
//! is applied. Every failure is reported through the notifier rather than
//! left to the caller to surface.

pub mod fetch;
pub mod media;
pub mod rodio_backend;

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::addressing::{self, VerseAudioProvider};
use crate::notice::Notifier;
use crate::quran::Chapter;
pub use fetch::{AudioClip, AudioFetcher, HttpAudioFetcher, fetch_first};
pub use media::{MediaBackend, MediaError};
pub use rodio_backend::RodioBackend;

/// Playback speeds, cycled in order
pub const SPEEDS: [f32; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// Index of 1.0x in [`SPEEDS`]
const NORMAL_SPEED: usize = 2;

/// Characters of verse text shown in the player bar
const EXCERPT_CHARS: usize = 30;

const PLAYBACK_FAILED: &str = "Cannot play audio. Please try again.";

/// Errors surfaced by the player
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Both the primary and the fallback source failed
    #[error("Playback failed for {surah}:{ayah}: {source}")]
    PlaybackFailed {
        surah: u16,
        ayah: u16,
        #[source]
        source: MediaError,
    },

    /// Resuming the loaded source failed
    #[error("Cannot resume playback: {0}")]
    ResumeFailed(#[source] MediaError),
}

/// Player-facing projection of a verse
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistEntry {
    /// Global index within the chapter
    pub index: usize,
    pub surah: u16,
    pub chapter_name: String,
    pub verse_number: u16,
    /// Arabic text
    pub text: String,
    /// Filled in once the media reports it
    pub duration: Option<Duration>,
}

impl PlaylistEntry {
    /// e.g. `Al-Fatiha - Ayah 3`
    pub fn header(&self) -> String {
        format!("{} - Ayah {}", self.chapter_name, self.verse_number)
    }

    /// The first characters of the text, with `...` when cut
    pub fn excerpt(&self) -> String {
        excerpt(&self.text, EXCERPT_CHARS)
    }
}

/// Shorten `text` to `max` characters, appending `...` when cut
pub fn excerpt(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Render seconds as `m:ss`
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Coarse state of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    /// No playlist
    Idle,
    /// Playlist built, nothing current
    Loaded,
    Playing,
    Paused,
}

/// Identity of an in-flight verse fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayTicket {
    pub index: usize,
    pub generation: u64,
}

/// Verse audio to fetch, in order of preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRequest {
    pub ticket: PlayTicket,
    pub urls: Vec<String>,
}

/// Outcome of a player transition: a fetch to start, if any
pub type Transition = Result<Option<PlayRequest>, PlayerError>;

/// Playback state visible to the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    /// Global index of the current verse
    pub current_index: Option<usize>,
    pub is_playing: bool,
    pub repeat: bool,
    pub muted: bool,
    /// Index into [`SPEEDS`]
    pub speed_index: usize,
    pub minimized: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_index: None,
            is_playing: false,
            repeat: false,
            muted: false,
            speed_index: NORMAL_SPEED,
            minimized: false,
        }
    }
}

impl PlaybackState {
    pub fn speed(&self) -> f32 {
        SPEEDS[self.speed_index % SPEEDS.len()]
    }
}

/// Playlist plus the state machine driving the media backend
pub struct Player<M> {
    media: M,
    playlist: Vec<PlaylistEntry>,
    state: PlaybackState,
    generation: u64,
    pending: Option<PlayTicket>,
    /// Base URL of the primary verse recitation provider
    audio_base: String,
    notifier: Notifier,
}

impl<M: MediaBackend> Player<M> {
    pub fn new(media: M, audio_base: impl Into<String>, notifier: Notifier) -> Self {
        Self {
            media,
            playlist: Vec::new(),
            state: PlaybackState::default(),
            generation: 0,
            pending: None,
            audio_base: audio_base.into(),
            notifier,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn playlist(&self) -> &[PlaylistEntry] {
        &self.playlist
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    /// The current playlist entry
    pub fn current(&self) -> Option<&PlaylistEntry> {
        self.state.current_index.and_then(|i| self.playlist.get(i))
    }

    /// Whether the current verse is still being fetched
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn phase(&self) -> PlayerPhase {
        match (self.playlist.is_empty(), self.state.current_index) {
            (true, _) => PlayerPhase::Idle,
            (false, None) => PlayerPhase::Loaded,
            (false, Some(_)) if self.state.is_playing => PlayerPhase::Playing,
            (false, Some(_)) => PlayerPhase::Paused,
        }
    }

    /// Replace the playlist with the chapter's verses
    ///
    /// Stops the current source; repeat, mute and speed are kept.
    pub fn build_playlist(&mut self, chapter: &Chapter) {
        self.media.stop();
        self.pending = None;
        self.playlist = chapter
            .verses
            .iter()
            .enumerate()
            .map(|(index, verse)| PlaylistEntry {
                index,
                surah: verse.surah,
                chapter_name: chapter.name_english.clone(),
                verse_number: verse.number,
                text: verse.text.clone(),
                duration: None,
            })
            .collect();
        self.state.current_index = None;
        self.state.is_playing = false;
        debug!(surah = chapter.number, entries = self.playlist.len(), "Playlist built");
    }

    /// Start the verse at `index`
    ///
    /// Out-of-range indices are ignored. The request lists the primary
    /// source then the fallback provider.
    pub fn play(&mut self, index: usize) -> Option<PlayRequest> {
        let Some(entry) = self.playlist.get(index) else {
            debug!(index, len = self.playlist.len(), "Ignoring play of invalid index");
            return None;
        };
        let (surah, ayah) = (entry.surah, entry.verse_number);

        self.media.stop();
        self.state.current_index = Some(index);
        self.state.is_playing = false;
        self.generation += 1;
        let ticket = PlayTicket { index, generation: self.generation };
        self.pending = Some(ticket);

        let urls = [VerseAudioProvider::Primary, VerseAudioProvider::Fallback]
            .into_iter()
            .map(|provider| addressing::verse_audio_url_for(provider, &self.audio_base, surah, ayah))
            .collect();
        debug!(surah, ayah, generation = ticket.generation, "Verse audio requested");
        Some(PlayRequest { ticket, urls })
    }

    /// Start a fetched verse, if its request is still the latest
    pub fn finish_play(
        &mut self,
        ticket: PlayTicket,
        result: Result<AudioClip, MediaError>,
    ) -> Result<(), PlayerError> {
        if self.pending != Some(ticket) {
            debug!(index = ticket.index, generation = ticket.generation, "Ignoring stale verse audio");
            return Ok(());
        }
        self.pending = None;
        let Some((surah, ayah)) =
            self.playlist.get(ticket.index).map(|e| (e.surah, e.verse_number))
        else {
            return Ok(());
        };

        if let Err(e) = result.and_then(|clip| self.media.play(clip)) {
            self.notifier.error(PLAYBACK_FAILED);
            return Err(PlayerError::PlaybackFailed { surah, ayah, source: e });
        }

        self.apply_preferences();
        self.state.is_playing = true;
        self.state.minimized = false;
        self.fill_duration();
        info!(surah, ayah, "Playing verse");
        Ok(())
    }

    /// Pause or resume; starts the current or first verse when nothing is loaded
    pub fn toggle_play(&mut self) -> Transition {
        if !self.media.has_source() {
            if self.playlist.is_empty() || self.pending.is_some() {
                return Ok(None);
            }
            return Ok(self.play(self.state.current_index.unwrap_or(0)));
        }

        if self.state.is_playing {
            self.media.pause();
            self.state.is_playing = false;
            debug!("Paused");
            return Ok(None);
        }

        match self.media.resume() {
            Ok(()) => {
                self.state.is_playing = true;
                debug!("Resumed");
                Ok(None)
            }
            Err(e) => {
                self.notifier.error(PLAYBACK_FAILED);
                Err(PlayerError::ResumeFailed(e))
            }
        }
    }

    /// Advance to the next verse, wrapping only when repeat is on
    pub fn next(&mut self) -> Option<PlayRequest> {
        let next = self.state.current_index.map_or(0, |i| i + 1);
        if next < self.playlist.len() {
            self.play(next)
        } else if self.state.repeat && !self.playlist.is_empty() {
            self.play(0)
        } else {
            self.notifier.info("This is the last verse");
            None
        }
    }

    /// Step back one verse
    pub fn previous(&mut self) -> Option<PlayRequest> {
        match self.state.current_index {
            Some(i) if i > 0 => self.play(i - 1),
            _ => {
                self.notifier.info("This is the first verse");
                None
            }
        }
    }

    /// React to the end of the current source
    pub fn on_track_end(&mut self) -> Transition {
        if self.state.current_index.is_none() {
            return Ok(None);
        }
        if self.state.repeat {
            debug!("Repeating verse");
            if let Err(e) = self.media.restart() {
                self.state.is_playing = false;
                self.notifier.error(PLAYBACK_FAILED);
                return Err(PlayerError::ResumeFailed(e));
            }
            self.state.is_playing = true;
            return Ok(None);
        }

        self.state.is_playing = false;
        Ok(self.next())
    }

    /// Check the media for end-of-track and duration updates
    pub fn poll(&mut self) -> Transition {
        self.fill_duration();
        if self.media.take_finished() {
            return self.on_track_end();
        }
        Ok(None)
    }

    pub fn toggle_repeat(&mut self) {
        self.state.repeat = !self.state.repeat;
        self.notifier.info(if self.state.repeat { "Repeat: On" } else { "Repeat: Off" });
    }

    pub fn toggle_mute(&mut self) {
        self.state.muted = !self.state.muted;
        self.media.set_muted(self.state.muted);
    }

    pub fn cycle_speed(&mut self) {
        self.state.speed_index = (self.state.speed_index + 1) % SPEEDS.len();
        let speed = self.state.speed();
        self.media.set_speed(speed);
        self.notifier.info(format!("Speed: {:.1}x", speed));
    }

    pub fn toggle_minimize(&mut self) {
        self.state.minimized = !self.state.minimized;
    }

    /// Seek to a fraction of the current source
    ///
    /// Ignored while the duration is unknown.
    pub fn seek(&mut self, fraction: f64) {
        let Some(duration) = self.media.duration().filter(|d| !d.is_zero()) else {
            debug!(fraction, "Ignoring seek without a known duration");
            return;
        };
        let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
        if let Err(e) = self.media.seek(duration.mul_f64(fraction)) {
            warn!(error = %e, "Seek failed");
        }
    }

    /// Current position and duration of the source, in seconds
    pub fn progress(&self) -> (f64, Option<f64>) {
        (
            self.media.position().as_secs_f64(),
            self.media.duration().map(|d| d.as_secs_f64()),
        )
    }

    /// Stop playback, keeping the playlist
    pub fn stop(&mut self) {
        self.media.stop();
        self.pending = None;
        self.state.is_playing = false;
    }

    fn apply_preferences(&mut self) {
        self.media.set_muted(self.state.muted);
        self.media.set_speed(self.state.speed());
    }

    fn fill_duration(&mut self) {
        let Some(duration) = self.media.duration() else {
            return;
        };
        if let Some(entry) = self.state.current_index.and_then(|i| self.playlist.get_mut(i)) {
            entry.duration.get_or_insert(duration);
        }
    }
}
