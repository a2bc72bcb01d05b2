//! `rodio` implementation of the media backend
//!
//! Clips are decoded from memory. The output stream is opened on first use
//! and lives on the thread that created it.

use std::io::Cursor;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, info, warn};

use super::fetch::AudioClip;
use super::media::{MediaBackend, MediaError};

/// Output device plus the sink currently attached to it
struct Output {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

/// Wall clock for the playback position, scaled by speed
#[derive(Debug, Clone, Copy)]
struct Clock {
    /// Position when the clock last (re)started
    base: Duration,
    /// Set while playing
    since: Option<Instant>,
    speed: f32,
}

impl Clock {
    fn new(speed: f32) -> Self {
        Self { base: Duration::ZERO, since: None, speed }
    }

    fn position(&self) -> Duration {
        match self.since {
            Some(since) => self.base + since.elapsed().mul_f32(self.speed),
            None => self.base,
        }
    }

    fn start_at(&mut self, position: Duration) {
        self.base = position;
        self.since = Some(Instant::now());
    }

    fn pause(&mut self) {
        self.base = self.position();
        self.since = None;
    }

    fn set_speed(&mut self, speed: f32) {
        let playing = self.since.is_some();
        self.base = self.position();
        self.speed = speed;
        self.since = playing.then(Instant::now);
    }
}

/// A loaded source
struct Track {
    url: String,
    bytes: Arc<[u8]>,
    sink: Sink,
    duration: Option<Duration>,
    clock: Clock,
    finished_reported: bool,
}

/// Plays one mp3 clip at a time through the default output device
pub struct RodioBackend {
    output: Option<Output>,
    track: Option<Track>,
    muted: bool,
    speed: f32,
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RodioBackend {
    pub fn new() -> Self {
        Self { output: None, track: None, muted: false, speed: 1.0 }
    }

    fn handle(&mut self) -> Result<&OutputStreamHandle, MediaError> {
        if self.output.is_none() {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| MediaError::Output(e.to_string()))?;
            info!("Opened audio output");
            self.output = Some(Output { _stream: stream, handle });
        }
        match &self.output {
            Some(output) => Ok(&output.handle),
            None => Err(MediaError::Output("no output stream".to_string())),
        }
    }

    fn decode(bytes: &Arc<[u8]>) -> Result<Decoder<Cursor<Arc<[u8]>>>, MediaError> {
        Decoder::new(Cursor::new(Arc::clone(bytes))).map_err(|e| MediaError::Decode(e.to_string()))
    }

    /// Build a sink playing `bytes` from `start`
    fn sink_for(&mut self, bytes: &Arc<[u8]>, start: Duration) -> Result<Sink, MediaError> {
        let mut source = Self::decode(bytes)?;
        if !start.is_zero() {
            source.try_seek(start).map_err(|e| MediaError::Seek(e.to_string()))?;
        }

        let volume = if self.muted { 0.0 } else { 1.0 };
        let speed = self.speed;
        let handle = self.handle()?;
        let sink = Sink::try_new(handle).map_err(|e| MediaError::Output(e.to_string()))?;
        sink.set_volume(volume);
        sink.set_speed(speed);
        sink.append(source);
        Ok(sink)
    }
}

impl MediaBackend for RodioBackend {
    fn play(&mut self, clip: AudioClip) -> Result<(), MediaError> {
        self.stop();

        let AudioClip { url, bytes, duration } = clip;
        let sink = self.sink_for(&bytes, Duration::ZERO)?;
        sink.play();
        let duration = duration.or_else(|| Self::decode(&bytes).ok()?.total_duration());

        let mut clock = Clock::new(self.speed);
        clock.start_at(Duration::ZERO);
        info!(url, ?duration, "Playing audio");
        self.track = Some(Track {
            url,
            bytes,
            sink,
            duration,
            clock,
            finished_reported: false,
        });
        Ok(())
    }

    fn has_source(&self) -> bool {
        self.track.is_some()
    }

    fn is_paused(&self) -> bool {
        self.track.as_ref().is_none_or(|t| t.sink.is_paused())
    }

    fn resume(&mut self) -> Result<(), MediaError> {
        let track = self.track.as_mut().ok_or(MediaError::NoSource)?;
        if track.sink.empty() {
            return self.restart();
        }
        track.sink.play();
        track.clock.start_at(track.clock.position());
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(track) = self.track.as_mut() {
            track.sink.pause();
            track.clock.pause();
        }
    }

    fn restart(&mut self) -> Result<(), MediaError> {
        self.seek(Duration::ZERO)?;
        if let Some(track) = self.track.as_mut() {
            track.sink.play();
            track.clock.start_at(Duration::ZERO);
            track.finished_reported = false;
        }
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(track) = self.track.take() {
            debug!(url = %track.url, "Stopping audio");
            track.sink.stop();
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(track) = &self.track {
            track.sink.set_volume(if muted { 0.0 } else { 1.0 });
        }
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        if let Some(track) = self.track.as_mut() {
            track.sink.set_speed(speed);
            track.clock.set_speed(speed);
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.track.as_ref().and_then(|t| t.duration)
    }

    fn position(&self) -> Duration {
        match &self.track {
            Some(track) => {
                let position = track.clock.position();
                track.duration.map_or(position, |d| position.min(d))
            }
            None => Duration::ZERO,
        }
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        let Some(track) = self.track.take() else {
            return Err(MediaError::NoSource);
        };
        let paused = track.sink.is_paused();
        let target = track.duration.map_or(position, |d| position.min(d));
        track.sink.stop();

        match self.sink_for(&track.bytes, target) {
            Ok(sink) => {
                let mut clock = track.clock;
                if paused {
                    sink.pause();
                    clock.base = target;
                    clock.since = None;
                } else {
                    sink.play();
                    clock.start_at(target);
                }
                self.track = Some(Track { sink, clock, finished_reported: false, ..track });
                Ok(())
            }
            Err(e) => {
                warn!(url = %track.url, error = %e, "Seek failed");
                Err(e)
            }
        }
    }

    fn take_finished(&mut self) -> bool {
        match self.track.as_mut() {
            Some(track) if !track.finished_reported && track.sink.empty() => {
                track.finished_reported = true;
                track.clock.pause();
                true
            }
            _ => false,
        }
    }
}
