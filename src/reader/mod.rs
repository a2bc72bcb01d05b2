//! Paged view over the loaded chapter
//!
//! The reader owns the chapter catalogue, the currently loaded chapter and
//! its pagination. Chapter loads are ticketed: a completion is applied only
//! when its ticket still matches the latest request.

pub mod pagination;

use std::ops::Range;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::quran::{Chapter, ChapterSummary, Verse};
pub use pagination::Pagination;

/// How long a jumped-to verse stays highlighted
pub const PULSE_DURATION: Duration = Duration::from_millis(1500);

/// State of the chapter view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting for a chapter
    Loading { surah: u16 },
    /// A chapter is shown
    Ready,
    /// The last load failed; holds the user-facing message
    Failed(String),
}

/// Identity of a chapter request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub surah: u16,
}

/// What happened to a completed chapter load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The chapter replaced the previous one
    Applied,
    /// A newer request superseded this one
    Stale,
    /// The request failed; the view shows the error placeholder
    Failed,
}

/// Result of jumping to a verse number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Verse numbers start at 1
    InvalidNumber,
    /// No verse with that number in the current chapter
    NotFound,
    /// The verse is now on screen and pulsing
    Found { index: usize, page: usize, page_changed: bool },
}

/// Temporary highlight on a verse
#[derive(Debug, Clone, Copy)]
struct Pulse {
    index: usize,
    started: Instant,
}

/// Chapter catalogue, loaded chapter and pagination
#[derive(Debug, Clone)]
pub struct Reader {
    /// Chapter catalogue
    pub chapters: Vec<ChapterSummary>,
    /// The chapter being read
    chapter: Option<Chapter>,
    /// Pagination over the chapter's verses
    pub pagination: Pagination,
    /// Load state of the chapter view
    pub status: LoadStatus,
    /// Incremented on every chapter request
    generation: u64,
    pulse: Option<Pulse>,
}

impl Reader {
    pub fn new(page_size: usize) -> Self {
        Self {
            chapters: Vec::new(),
            chapter: None,
            pagination: Pagination::new(page_size),
            status: LoadStatus::Idle,
            generation: 0,
            pulse: None,
        }
    }

    pub fn chapter(&self) -> Option<&Chapter> {
        self.chapter.as_ref()
    }

    /// Start a chapter request; the current chapter is discarded
    pub fn begin_load(&mut self, surah: u16) -> LoadTicket {
        self.generation += 1;
        self.chapter = None;
        self.pulse = None;
        self.pagination.reset(0);
        self.status = LoadStatus::Loading { surah };
        debug!(surah, generation = self.generation, "Chapter load started");
        LoadTicket { generation: self.generation, surah }
    }

    /// Whether a ticket belongs to the latest request
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation
            && matches!(self.status, LoadStatus::Loading { surah } if surah == ticket.surah)
    }

    /// Apply a completed chapter request
    ///
    /// `error_message` is what the view shows when the request failed.
    pub fn finish_load<E: std::fmt::Display>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Chapter, E>,
        error_message: &str,
    ) -> LoadOutcome {
        if !self.is_current(ticket) {
            debug!(
                surah = ticket.surah,
                generation = ticket.generation,
                latest = self.generation,
                "Ignoring stale chapter load"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(chapter) => {
                info!(surah = chapter.number, verses = chapter.verse_count(), "Chapter ready");
                self.pagination.reset(chapter.verse_count());
                self.chapter = Some(chapter);
                self.status = LoadStatus::Ready;
                LoadOutcome::Applied
            }
            Err(e) => {
                debug!(surah = ticket.surah, error = %e, "Chapter load failed");
                self.status = LoadStatus::Failed(error_message.to_string());
                LoadOutcome::Failed
            }
        }
    }

    /// Change the page size, returning to the first page
    pub fn set_page_size(&mut self, page_size: usize) {
        self.pagination.set_page_size(page_size);
        self.pulse = None;
    }

    /// Verses on the current page with their global indices
    pub fn page_verses(&self) -> impl Iterator<Item = (usize, &Verse)> {
        let range = self.page_range();
        let start = range.start;
        self.chapter
            .iter()
            .flat_map(move |c| c.verses.get(range.clone()).unwrap_or_default().iter().enumerate())
            .map(move |(offset, verse)| (start + offset, verse))
    }

    /// Global index range of the current page
    pub fn page_range(&self) -> Range<usize> {
        self.pagination.bounds()
    }

    pub fn next_page(&mut self) -> bool {
        self.pagination.next_page()
    }

    pub fn prev_page(&mut self) -> bool {
        self.pagination.prev_page()
    }

    /// Show the page holding `index`
    pub fn reveal(&mut self, index: usize) -> bool {
        let changed = self.pagination.reveal(index);
        if changed {
            debug!(index, page = self.pagination.current_page, "Page follows current verse");
        }
        changed
    }

    /// Jump to a verse by its number
    pub fn jump_to_verse(&mut self, ayah: u16) -> JumpOutcome {
        if ayah == 0 {
            return JumpOutcome::InvalidNumber;
        }
        let Some(index) = self.chapter.as_ref().and_then(|c| c.position_of(ayah)) else {
            return JumpOutcome::NotFound;
        };

        let page = pagination::page_of(index, self.pagination.page_size);
        let page_changed = self.pagination.go_to(page);
        self.pulse = Some(Pulse { index, started: Instant::now() });
        JumpOutcome::Found { index, page, page_changed }
    }

    /// Whether a verse is highlighted by a recent jump
    pub fn is_pulsing(&self, index: usize) -> bool {
        self.pulse.is_some_and(|p| p.index == index && p.started.elapsed() < PULSE_DURATION)
    }

    /// Summary of a catalogue entry
    pub fn summary(&self, number: u16) -> Option<&ChapterSummary> {
        self.chapters.iter().find(|c| c.number == number)
    }
}
