//! Fakes shared by the unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::ReaderContext;
use crate::api::{ApiError, BookmarkKind, InvocationResponse, QuranApi, WordDetailResponse};
use crate::notice::Notice;
use crate::player::{
    AudioClip, AudioFetcher, MediaBackend, MediaError, PlayRequest, PlayerError, fetch_first,
};
use crate::quran::{Chapter, ChapterSummary, Language, Translation, Verse, split_words};

/// A chapter with `verses` two-word verses and synthesized names
pub fn chapter_with(surah: u16, verses: u16) -> Chapter {
    Chapter {
        number: surah,
        name_arabic: Chapter::fallback_arabic_name(surah),
        name_english: Chapter::fallback_english_name(surah),
        verses: (1..=verses)
            .map(|n| {
                let text = format!("كلمة{} ثانية", n);
                Verse {
                    id: u64::from(surah) * 1000 + u64::from(n),
                    surah,
                    number: n,
                    words: split_words(&text),
                    text,
                    translations: vec![Translation {
                        language: Language::English,
                        text: format!("Verse {}", n),
                    }],
                    page_number: None,
                    juz_number: None,
                }
            })
            .collect(),
    }
}

/// Messages of every pending notice
pub fn drain(rx: &mut UnboundedReceiver<Notice>) -> Vec<String> {
    let mut messages = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        messages.push(notice.message);
    }
    messages
}

/// Fetch and apply a verse request the way the app loop does
pub async fn settle_verse<A: QuranApi>(
    ctx: &mut ReaderContext<A, FakeMedia>,
    fetcher: &FakeFetcher,
    request: Option<PlayRequest>,
) -> Result<(), PlayerError> {
    match request {
        Some(request) => {
            let clip = fetch_first(fetcher, &request.urls).await;
            ctx.finish_verse_audio(request.ticket, clip)
        }
        None => Ok(()),
    }
}

/// In-memory content backend
#[derive(Debug, Default)]
pub struct FakeApi {
    /// Catalogue; `None` fails the request
    pub catalogue: Mutex<Option<Vec<ChapterSummary>>>,
    pub chapters: Mutex<HashMap<u16, Chapter>>,
    /// Keyed by verse id and zero-based offset
    pub words: Mutex<HashMap<(u64, u16), WordDetailResponse>>,
    pub invocation: Mutex<Option<InvocationResponse>>,
    /// Status to fail bookmarks with
    pub bookmark_status: Mutex<Option<u16>>,
    pub bookmarks: Mutex<Vec<u64>>,
}

impl FakeApi {
    pub fn with_chapter(self, chapter: Chapter) -> Self {
        self.chapters.lock().unwrap().insert(chapter.number, chapter);
        self
    }
}

fn not_found() -> ApiError {
    ApiError::ApiError { status: 404, message: "Not found".to_string() }
}

impl QuranApi for FakeApi {
    async fn chapters(&self) -> Result<Vec<ChapterSummary>, ApiError> {
        self.catalogue.lock().unwrap().clone().ok_or_else(not_found)
    }

    async fn chapter(&self, number: u16) -> Result<Chapter, ApiError> {
        self.chapters.lock().unwrap().get(&number).cloned().ok_or_else(not_found)
    }

    async fn word_detail(&self, verse_id: u64, offset: u16) -> Result<WordDetailResponse, ApiError> {
        self.words.lock().unwrap().get(&(verse_id, offset)).cloned().ok_or_else(not_found)
    }

    async fn invocation(&self) -> Result<InvocationResponse, ApiError> {
        self.invocation.lock().unwrap().clone().ok_or_else(not_found)
    }

    async fn bookmark(&self, verse_id: u64, _kind: BookmarkKind) -> Result<(), ApiError> {
        match *self.bookmark_status.lock().unwrap() {
            Some(401) => Err(ApiError::Unauthorized),
            Some(status) => Err(ApiError::ApiError { status, message: String::new() }),
            None => {
                self.bookmarks.lock().unwrap().push(verse_id);
                Ok(())
            }
        }
    }
}

/// Audio source serving empty clips, failing on request
#[derive(Debug, Default)]
pub struct FakeFetcher {
    pub fail_urls: Mutex<Vec<String>>,
    pub fail_all: Mutex<bool>,
    /// Duration reported for every clip
    pub duration: Mutex<Option<Duration>>,
    requested: Mutex<Vec<String>>,
}

impl FakeFetcher {
    /// Every URL asked for, including failed ones
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl AudioFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<AudioClip, MediaError> {
        self.requested.lock().unwrap().push(url.to_string());
        if *self.fail_all.lock().unwrap() || self.fail_urls.lock().unwrap().iter().any(|u| u == url)
        {
            return Err(MediaError::Status { status: 404, url: url.to_string() });
        }
        Ok(AudioClip {
            url: url.to_string(),
            bytes: Arc::from(&[][..]),
            duration: *self.duration.lock().unwrap(),
        })
    }
}

/// Media backend that records what it was asked to do
#[derive(Debug, Default)]
pub struct FakeMedia {
    /// URL of every clip started
    pub played: Vec<String>,
    pub fail_resume: bool,
    pub source: Option<String>,
    pub paused: bool,
    pub muted: bool,
    pub speed: f32,
    pub duration: Option<Duration>,
    pub seeks: Vec<Duration>,
    pub restarts: usize,
    pub stops: usize,
    finished: bool,
}

impl FakeMedia {
    /// Make the current source report end-of-track
    pub fn finish(&mut self) {
        self.finished = true;
    }
}

impl MediaBackend for FakeMedia {
    fn play(&mut self, clip: AudioClip) -> Result<(), MediaError> {
        self.played.push(clip.url.clone());
        self.source = Some(clip.url);
        self.duration = clip.duration;
        self.paused = false;
        self.finished = false;
        Ok(())
    }
    fn has_source(&self) -> bool {
        self.source.is_some()
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn resume(&mut self) -> Result<(), MediaError> {
        if self.fail_resume {
            return Err(MediaError::Output("device lost".to_string()));
        }
        self.source.as_ref().ok_or(MediaError::NoSource)?;
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn restart(&mut self) -> Result<(), MediaError> {
        self.source.as_ref().ok_or(MediaError::NoSource)?;
        self.restarts += 1;
        self.finished = false;
        self.paused = false;
        Ok(())
    }

    fn stop(&mut self) {
        self.source = None;
        self.stops += 1;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn duration(&self) -> Option<Duration> {
        self.source.as_ref().and(self.duration)
    }

    fn position(&self) -> Duration {
        Duration::ZERO
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        self.seeks.push(position);
        Ok(())
    }

    fn take_finished(&mut self) -> bool {
        std::mem::take(&mut self.finished)
    }
}
