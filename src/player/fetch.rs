//! Downloading audio off the UI loop
//!
//! Fetching runs in spawned tasks and hands back an [`AudioClip`], which the
//! media backend turns into sound on the thread that owns the output device.
//! The clip's length is measured while still in the task, because the mp3
//! decoder used for playback does not report one.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use symphonia::core::{
    formats::FormatOptions, io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};
use tracing::{debug, warn};

use super::media::MediaError;

/// Downloaded audio, ready to decode
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub url: String,
    pub bytes: Arc<[u8]>,
    /// Measured length, when the container allows it
    pub duration: Option<Duration>,
}

/// Source of audio bodies
#[allow(async_fn_in_trait)]
pub trait AudioFetcher {
    async fn fetch(&self, url: &str) -> Result<AudioClip, MediaError>;
}

/// Fetches audio over HTTP with the shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpAudioFetcher {
    client: Client,
}

impl HttpAudioFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl AudioFetcher for HttpAudioFetcher {
    async fn fetch(&self, url: &str) -> Result<AudioClip, MediaError> {
        debug!(url, "Fetching audio");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Status { status: status.as_u16(), url: url.to_string() });
        }
        let bytes: Arc<[u8]> = Arc::from(response.bytes().await?.as_ref());
        let duration = measure_duration(&bytes, url)?;
        Ok(AudioClip { url: url.to_string(), bytes, duration })
    }
}

/// Fetch the first of `urls` that downloads and decodes cleanly
pub async fn fetch_first<F: AudioFetcher>(
    fetcher: &F,
    urls: &[String],
) -> Result<AudioClip, MediaError> {
    let mut last = MediaError::NoSource;
    for (attempt, url) in urls.iter().enumerate() {
        match fetcher.fetch(url).await {
            Ok(clip) => return Ok(clip),
            Err(e) => {
                if attempt + 1 < urls.len() {
                    warn!(url, error = %e, "Audio source failed, trying next");
                }
                last = e;
            }
        }
    }
    Err(last)
}

/// Read the length of an encoded body
///
/// Fails when the body is not a recognizable audio container. Returns
/// `Ok(None)` when the container is valid but carries no timing.
pub fn measure_duration(bytes: &Arc<[u8]>, url: &str) -> Result<Option<Duration>, MediaError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(Arc::clone(bytes))), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = url.rsplit('.').next().filter(|ext| ext.len() <= 4) {
        hint.with_extension(ext);
    }

    let opened = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| MediaError::Decode(e.to_string()))?;
    let mut reader = opened.format;
    let Some(track) = reader.default_track() else {
        return Err(MediaError::Decode("no audio track".to_string()));
    };
    let (track_id, n_frames) = (track.id, track.codec_params.n_frames);
    let Some(time_base) = track.codec_params.time_base else {
        return Ok(None);
    };

    // Headerless CBR streams carry no frame count; walk the packets instead
    let frames = match n_frames {
        Some(frames) => frames,
        None => {
            let mut frames = 0;
            while let Ok(packet) = reader.next_packet() {
                if packet.track_id() == track_id {
                    frames += packet.dur;
                }
            }
            frames
        }
    };
    if frames == 0 {
        return Ok(None);
    }

    let time = time_base.calc_time(frames);
    Ok(Some(Duration::from_secs_f64(time.seconds as f64 + time.frac)))
}
