//! Media backend seam
//!
//! The player drives exactly one audio source at a time through this trait.
//! Playing a new clip replaces whatever was playing. Clips are fetched
//! elsewhere, so nothing here waits on the network.

use std::time::Duration;

use thiserror::Error;

use super::fetch::AudioClip;

/// Errors from fetching, decoding or playing audio
#[derive(Debug, Error)]
pub enum MediaError {
    /// Fetching the audio body failed
    #[error("Audio request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Audio host answered with a non-success status
    #[error("Audio host returned {status} for {url}")]
    Status { status: u16, url: String },

    /// Body could not be decoded
    #[error("Cannot decode audio: {0}")]
    Decode(String),

    /// No output device could be opened
    #[error("Audio output unavailable: {0}")]
    Output(String),

    /// Seeking is not supported for this source
    #[error("Cannot seek: {0}")]
    Seek(String),

    /// Operation needs a loaded source
    #[error("No audio source loaded")]
    NoSource,
}

/// A single-source audio output
pub trait MediaBackend {
    /// Make `clip` the only source and start playing it from zero
    fn play(&mut self, clip: AudioClip) -> Result<(), MediaError>;

    /// Whether a source is loaded
    fn has_source(&self) -> bool;

    /// Whether the loaded source is paused
    fn is_paused(&self) -> bool;

    /// Resume the loaded source
    fn resume(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    /// Play the loaded source again from zero
    fn restart(&mut self) -> Result<(), MediaError>;

    /// Drop the loaded source
    fn stop(&mut self);

    fn set_muted(&mut self, muted: bool);

    fn set_speed(&mut self, speed: f32);

    /// Length of the loaded source, when known
    fn duration(&self) -> Option<Duration>;

    /// Playback position of the loaded source
    fn position(&self) -> Duration;

    /// Move to an absolute position
    fn seek(&mut self, position: Duration) -> Result<(), MediaError>;

    /// Report end-of-track once; returns true a single time per finished source
    fn take_finished(&mut self) -> bool;
}
