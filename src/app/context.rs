//! Coordinator between the reader, the player and the collaborators
//!
//! `ReaderContext` owns every component and is the only place where one
//! component's outcome is turned into another's input. Requests that go to
//! the network are split into a `begin_*` half that hands out a ticket and a
//! `finish_*` half that applies the result only while the ticket is current.
//! Audio works the same way: playback methods return what to fetch and the
//! fetched clip comes back through `finish_verse_audio` or `finish_clip`.

use tracing::{debug, info, warn};

use crate::api::{ApiError, BookmarkKind, InvocationResponse, QuranApi};
use crate::clipboard::ClipboardWriter;
use crate::config::Config;
use crate::invocation::{Invocation, InvocationHandler, Reciter, SequenceEvent, SequenceStart};
use crate::notice::Notifier;
use crate::player::{
    AudioClip, MediaBackend, MediaError, PlayRequest, PlayTicket, Player, PlayerError, Transition,
};
use crate::quran::share::{copy_text, share_text};
use crate::quran::{Chapter, ChapterSummary, Verse};
use crate::reader::{JumpOutcome, LoadOutcome, LoadTicket, Reader};
use crate::word_detail::{DetailSource, WordDetail, WordRef, resolve_word};

const LOAD_FAILED: &str = "Error loading verses. Please try again later.";
const NO_VERSES: &str = "No verses found.";

/// Identity of a word detail request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordTicket {
    pub generation: u64,
    pub verse_id: u64,
    pub word: u16,
}

/// Everything needed to resolve a word away from the context
#[derive(Debug, Clone)]
pub struct WordRequest {
    pub ticket: WordTicket,
    pub word: WordRef,
    /// Verse text the local fallback splits
    pub local_text: String,
}

/// Outcome of applying a resolved word
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordOutcome {
    /// Superseded by a newer request or a close
    Stale,
    /// Nothing to show for the word
    Missing,
    /// The view opened, with its audio to fetch when auto-play applies
    Opened(Option<ClipRequest>),
}

/// What a word-audio clip is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipKind {
    /// The open word detail
    Word,
    /// The whole invocation
    Invocation,
    /// One invocation word picked by index
    InvocationWord(u16),
    /// A step of the word-by-word run
    Sequence,
}

/// Word or invocation audio to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRequest {
    pub generation: u64,
    pub kind: ClipKind,
    pub url: String,
}

/// An open word view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenWord {
    pub word: WordRef,
    pub detail: WordDetail,
}

/// State of the word detail overlay
#[derive(Debug, Clone, Default)]
pub struct WordPanel {
    generation: u64,
    pending: Option<WordTicket>,
    open: Option<OpenWord>,
}

impl WordPanel {
    pub fn open(&self) -> Option<&OpenWord> {
        self.open.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Owns every reader component and routes events between them
pub struct ReaderContext<A, M> {
    api: A,
    pub reader: Reader,
    pub player: Player<M>,
    pub invocation: InvocationHandler,
    pub word_panel: WordPanel,
    /// Output for word and invocation audio, separate from verse playback
    word_audio: M,
    clip_generation: u64,
    pending_clip: Option<u64>,
    clipboard: Box<dyn ClipboardWriter>,
    notifier: Notifier,
    /// Play word audio as soon as the detail opens
    pub auto_play_word_audio: bool,
}

impl<A, M> ReaderContext<A, M> {
    /// Whether a word or invocation clip is being fetched
    pub fn is_clip_pending(&self) -> bool {
        self.pending_clip.is_some()
    }
}

impl<A: QuranApi, M: MediaBackend> ReaderContext<A, M> {
    pub fn new(
        api: A,
        verse_audio: M,
        word_audio: M,
        clipboard: Box<dyn ClipboardWriter>,
        config: &Config,
        notifier: Notifier,
    ) -> Self {
        Self {
            api,
            reader: Reader::new(config.page_size()),
            player: Player::new(verse_audio, config.verse_audio_base_url.clone(), notifier.clone()),
            invocation: InvocationHandler::new(config.reciter),
            word_panel: WordPanel::default(),
            word_audio,
            clip_generation: 0,
            pending_clip: None,
            clipboard,
            notifier,
            auto_play_word_audio: config.auto_play_word_audio,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn chapter(&self) -> Option<&Chapter> {
        self.reader.chapter()
    }

    fn verse(&self, index: usize) -> Option<&Verse> {
        self.reader.chapter().and_then(|c| c.verse(index))
    }

    // Catalogue and invocation

    pub async fn load_chapters(&mut self) {
        let result = self.api.chapters().await;
        self.apply_chapters(result);
    }

    pub fn apply_chapters(&mut self, result: Result<Vec<ChapterSummary>, ApiError>) {
        match result {
            Ok(chapters) => self.reader.chapters = chapters,
            Err(e) => {
                debug!(error = %e, "Chapter catalogue request failed");
                self.reader.chapters.clear();
                self.notifier.error("Cannot load surahs. Please try again later.");
            }
        }
    }

    pub async fn load_invocation(&mut self) {
        let result = self.api.invocation().await;
        self.apply_invocation(result);
    }

    /// Use the backend's invocation record, or the built-in one on failure
    pub fn apply_invocation(&mut self, result: Result<InvocationResponse, ApiError>) {
        match result {
            Ok(response) => self.invocation.set_record(Invocation::from_response(response)),
            Err(e) => {
                warn!(error = %e, "Invocation request failed, using built-in record");
                self.invocation.set_record(Invocation::builtin(self.invocation.reciter()));
            }
        }
    }

    pub fn set_reciter(&mut self, reciter: Reciter) {
        self.invocation.set_reciter(reciter);
        self.notifier.info(format!("Reciter: {}", reciter));
    }

    // Chapter loading

    /// Start loading a chapter; in-flight word work is abandoned
    pub fn begin_chapter_load(&mut self, surah: u16) -> LoadTicket {
        self.close_word_view();
        self.invocation.hide();
        self.reader.begin_load(surah)
    }

    /// Apply a completed chapter request
    pub fn finish_chapter_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Chapter, ApiError>,
    ) -> LoadOutcome {
        let message = match &result {
            Err(ApiError::EmptyChapter(_)) => NO_VERSES,
            _ => LOAD_FAILED,
        };
        let failure = result.as_ref().err().map(|e| e.to_string());

        let outcome = self.reader.finish_load(ticket, result, message);
        match outcome {
            LoadOutcome::Applied => {
                if let Some(chapter) = self.reader.chapter() {
                    self.player.build_playlist(chapter);
                    self.invocation.show_for(chapter.number);
                }
            }
            LoadOutcome::Failed => {
                self.notifier.error(format!(
                    "Cannot load surah {}: {}",
                    ticket.surah,
                    failure.unwrap_or_default()
                ));
            }
            LoadOutcome::Stale => {}
        }
        outcome
    }

    pub async fn load_chapter(&mut self, surah: u16) -> LoadOutcome {
        let ticket = self.begin_chapter_load(surah);
        let result = self.api.chapter(surah).await;
        self.finish_chapter_load(ticket, result)
    }

    // Pagination

    pub fn next_page(&mut self) -> bool {
        self.reader.next_page()
    }

    pub fn prev_page(&mut self) -> bool {
        self.reader.prev_page()
    }

    /// Change verses per page for this session
    pub fn set_page_size(&mut self, page_size: usize) {
        self.reader.set_page_size(page_size);
        info!(page_size = self.reader.pagination.page_size, "Page size changed");
    }

    /// Jump to a verse by number, warning when it does not exist
    pub fn jump_to_verse(&mut self, ayah: u16) -> JumpOutcome {
        let outcome = self.reader.jump_to_verse(ayah);
        match outcome {
            JumpOutcome::InvalidNumber => {
                self.notifier.warning("Please enter a valid ayah number");
            }
            JumpOutcome::NotFound => {
                self.notifier.warning(format!("Ayah {} not found in this surah", ayah));
            }
            JumpOutcome::Found { index, page, page_changed } => {
                debug!(index, page, page_changed, "Jumped to verse");
            }
        }
        outcome
    }

    // Verse playback

    fn follow_player(&mut self) {
        if let Some(index) = self.player.state().current_index {
            self.reader.reveal(index);
        }
    }

    pub fn play_verse(&mut self, index: usize) -> Option<PlayRequest> {
        let request = self.player.play(index);
        self.follow_player();
        request
    }

    pub fn toggle_play(&mut self) -> Transition {
        let transition = self.player.toggle_play();
        self.follow_player();
        transition
    }

    pub fn next_verse(&mut self) -> Option<PlayRequest> {
        let request = self.player.next();
        self.follow_player();
        request
    }

    pub fn previous_verse(&mut self) -> Option<PlayRequest> {
        let request = self.player.previous();
        self.follow_player();
        request
    }

    /// Hand a fetched verse to the player
    pub fn finish_verse_audio(
        &mut self,
        ticket: PlayTicket,
        result: Result<AudioClip, MediaError>,
    ) -> Result<(), PlayerError> {
        let result = self.player.finish_play(ticket, result);
        self.follow_player();
        result
    }

    /// Drive end-of-track handling for both audio outputs
    pub fn poll(&mut self) -> Transition {
        if self.word_audio.take_finished() {
            self.invocation.clear_highlight();
        }
        let transition = self.player.poll();
        self.follow_player();
        transition
    }

    // Word and invocation audio

    fn begin_clip(&mut self, kind: ClipKind, url: String) -> ClipRequest {
        self.word_audio.stop();
        self.clip_generation += 1;
        self.pending_clip = Some(self.clip_generation);
        debug!(?kind, url, "Clip requested");
        ClipRequest { generation: self.clip_generation, kind, url }
    }

    /// Start a fetched clip if nothing replaced or cancelled it
    pub fn finish_clip(
        &mut self,
        request: &ClipRequest,
        result: Result<AudioClip, MediaError>,
    ) -> bool {
        if self.pending_clip != Some(request.generation) {
            debug!(kind = ?request.kind, "Ignoring stale clip");
            return false;
        }
        self.pending_clip = None;

        let Err(e) = result.and_then(|clip| self.word_audio.play(clip)) else {
            return true;
        };
        match request.kind {
            ClipKind::Word => warn!(url = %request.url, error = %e, "Word audio failed"),
            ClipKind::Invocation => {
                debug!(url = %request.url, error = %e, "Invocation audio failed");
                self.notifier.error("Cannot play Bismillah audio");
            }
            ClipKind::InvocationWord(_) => {
                warn!(url = %request.url, error = %e, "Invocation word audio failed");
                self.invocation.clear_highlight();
            }
            ClipKind::Sequence => {
                warn!(url = %request.url, error = %e, "Invocation word audio failed");
            }
        }
        false
    }

    // Word detail

    /// Start resolving a word of the verse at `index`
    pub fn begin_word_detail(&mut self, index: usize, word: u16) -> Option<WordRequest> {
        let verse = self.verse(index)?;
        if word == 0 {
            return None;
        }
        let word_ref = WordRef {
            verse_id: verse.id,
            surah: verse.surah,
            ayah: verse.number,
            word,
            audio_url: Some(verse.word_audio_url(word)),
        };
        let local_text = verse.rendered_text();
        let verse_id = verse.id;

        self.word_panel.generation += 1;
        let ticket = WordTicket { generation: self.word_panel.generation, verse_id, word };
        self.word_panel.pending = Some(ticket);
        debug!(verse_id = ticket.verse_id, word, "Word detail requested");
        Some(WordRequest { ticket, word: word_ref, local_text })
    }

    /// Open the word view with a resolved detail, if the request is current
    ///
    /// Auto-play only applies to details the backend resolved.
    pub fn finish_word_detail(
        &mut self,
        ticket: WordTicket,
        word: WordRef,
        detail: Option<WordDetail>,
    ) -> WordOutcome {
        if self.word_panel.pending != Some(ticket) {
            debug!(verse_id = ticket.verse_id, word = ticket.word, "Ignoring stale word detail");
            return WordOutcome::Stale;
        }
        self.word_panel.pending = None;

        let Some(detail) = detail else {
            return WordOutcome::Missing;
        };
        let autoplay = self.auto_play_word_audio && detail.source == DetailSource::Remote;
        self.word_panel.open = Some(OpenWord { word, detail });
        WordOutcome::Opened(if autoplay { self.play_word_audio() } else { None })
    }

    pub async fn open_word_detail(&mut self, index: usize, word: u16) -> WordOutcome {
        let Some(request) = self.begin_word_detail(index, word) else {
            return WordOutcome::Missing;
        };
        let detail = resolve_word(&self.api, &request.word, &request.local_text).await;
        self.finish_word_detail(request.ticket, request.word, detail)
    }

    /// Fetch the open word's audio
    pub fn play_word_audio(&mut self) -> Option<ClipRequest> {
        let url = self.word_panel.open.as_ref().map(|o| o.detail.audio_url.clone())?;
        Some(self.begin_clip(ClipKind::Word, url))
    }

    /// Close the word view, stopping its audio and any invocation run
    pub fn close_word_view(&mut self) {
        self.word_panel.generation += 1;
        self.word_panel.pending = None;
        self.word_panel.open = None;
        self.clip_generation += 1;
        self.pending_clip = None;
        self.word_audio.stop();
        self.invocation.cancel();
    }

    // Verse actions

    pub async fn bookmark(&mut self, index: usize) {
        let Some(verse_id) = self.verse(index).map(|v| v.id) else {
            return;
        };
        let result = self.api.bookmark(verse_id, BookmarkKind::Default).await;
        self.report_bookmark(result);
    }

    pub fn report_bookmark(&self, result: Result<(), ApiError>) {
        match result {
            Ok(()) => self.notifier.success("Verse bookmarked!"),
            Err(e) if e.requires_login() => {
                self.notifier.warning("Please login to bookmark verses")
            }
            Err(e) => {
                debug!(error = %e, "Bookmark failed");
                self.notifier.error("Could not bookmark verse");
            }
        }
    }

    pub fn copy_verse(&mut self, index: usize) {
        let Some(text) = self.chapter().zip(self.verse(index)).map(|(c, v)| copy_text(c, v))
        else {
            return;
        };
        match self.clipboard.write_text(&text) {
            Ok(()) => self.notifier.success("Verse copied to clipboard!"),
            Err(e) => {
                debug!(error = %e, "Clipboard write failed");
                self.notifier.error("Failed to copy. Please try again.");
            }
        }
    }

    pub fn share_verse(&mut self, index: usize) {
        let Some(text) = self.chapter().zip(self.verse(index)).map(|(c, v)| share_text(c, v))
        else {
            return;
        };
        match self.clipboard.write_text(&text) {
            Ok(()) => self.notifier.success("Verse link copied to clipboard!"),
            Err(e) => {
                debug!(error = %e, "Clipboard write failed");
                self.notifier.warning("Sharing not supported on this device");
            }
        }
    }

    // Invocation

    pub fn play_invocation(&mut self) -> Option<ClipRequest> {
        if !self.invocation.is_visible() {
            return None;
        }
        let url = self.invocation.record().audio_url.clone()?;
        Some(self.begin_clip(ClipKind::Invocation, url))
    }

    /// Highlight one invocation word and fetch its audio
    pub fn play_invocation_word(&mut self, index: u16) -> Option<ClipRequest> {
        let url = self.invocation.highlight_word(index)?;
        Some(self.begin_clip(ClipKind::InvocationWord(index), url))
    }

    /// Expand or collapse the breakdown; returns a run for the caller to spawn
    pub fn toggle_invocation_breakdown(&mut self) -> Option<SequenceStart> {
        self.invocation.toggle_breakdown()
    }

    /// Apply a step of the word-by-word run
    pub fn apply_sequence_event(&mut self, event: SequenceEvent) -> Option<ClipRequest> {
        let url = self.invocation.apply(event)?;
        Some(self.begin_clip(ClipKind::Sequence, url))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;
    use crate::api::WordDetailResponse;
    use crate::invocation::SequenceStep;
    use crate::notice::Notice;
    use crate::player::fetch_first;
    use crate::reader::LoadStatus;
    use crate::testing::{FakeApi, FakeFetcher, FakeMedia, chapter_with, drain, settle_verse};

    #[derive(Default, Clone)]
    struct MemoryClipboard {
        fail: bool,
        written: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
    }

    impl ClipboardWriter for MemoryClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), String> {
            if self.fail {
                return Err("no display".to_string());
            }
            self.written.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    type Ctx = ReaderContext<FakeApi, FakeMedia>;

    fn context(api: FakeApi) -> (Ctx, UnboundedReceiver<Notice>, MemoryClipboard) {
        let (notifier, rx) = Notifier::channel();
        let clipboard = MemoryClipboard::default();
        let ctx = ReaderContext::new(
            api,
            FakeMedia::default(),
            FakeMedia::default(),
            Box::new(clipboard.clone()),
            &Config::default(),
            notifier,
        );
        (ctx, rx, clipboard)
    }

    fn api() -> FakeApi {
        FakeApi::default().with_chapter(chapter_with(2, 23)).with_chapter(chapter_with(1, 7))
    }

    #[tokio::test]
    async fn loading_builds_playlist_and_invocation() {
        let (mut ctx, _rx, _) = context(api());
        assert_eq!(ctx.load_chapter(2).await, LoadOutcome::Applied);
        assert_eq!(ctx.player.playlist().len(), 23);
        assert!(ctx.invocation.is_visible());
        assert_eq!(ctx.reader.pagination.total_pages(), 3);

        ctx.load_chapter(1).await;
        assert!(!ctx.invocation.is_visible());
        assert_eq!(ctx.player.playlist().len(), 7);
    }

    #[tokio::test]
    async fn stale_chapter_does_not_clobber_newer_one() {
        let (mut ctx, _rx, _) = context(api());
        let slow = ctx.begin_chapter_load(2);
        let fast = ctx.begin_chapter_load(1);

        ctx.finish_chapter_load(fast, Ok(chapter_with(1, 7)));
        let outcome = ctx.finish_chapter_load(slow, Ok(chapter_with(2, 23)));

        assert_eq!(outcome, LoadOutcome::Stale);
        assert_eq!(ctx.chapter().map(|c| c.number), Some(1));
        assert_eq!(ctx.player.playlist().len(), 7);
    }

    #[tokio::test]
    async fn failed_load_reports_and_shows_placeholder() {
        let (mut ctx, mut rx, _) = context(api());
        assert_eq!(ctx.load_chapter(50).await, LoadOutcome::Failed);
        assert_eq!(ctx.reader.status, LoadStatus::Failed(LOAD_FAILED.to_string()));
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[tokio::test]
    async fn empty_chapter_shows_no_verses() {
        let (mut ctx, _rx, _) = context(api());
        let ticket = ctx.begin_chapter_load(3);
        ctx.finish_chapter_load(ticket, Err(ApiError::EmptyChapter(3)));
        assert_eq!(ctx.reader.status, LoadStatus::Failed(NO_VERSES.to_string()));
    }

    #[tokio::test]
    async fn catalogue_failure_is_reported() {
        let (mut ctx, mut rx, _) = context(api());
        ctx.load_chapters().await;
        assert!(ctx.reader.chapters.is_empty());
        assert_eq!(drain(&mut rx), vec!["Cannot load surahs. Please try again later.".to_string()]);
    }

    #[tokio::test]
    async fn invocation_falls_back_to_builtin() {
        let (mut ctx, _rx, _) = context(api());
        ctx.load_invocation().await;
        assert_eq!(ctx.invocation.record(), &Invocation::builtin(Reciter::Alafasy));
    }

    #[tokio::test]
    async fn page_follows_the_playing_verse() {
        let (mut ctx, _rx, _) = context(api());
        let fetcher = FakeFetcher::default();
        ctx.load_chapter(2).await;
        let request = ctx.play_verse(9);
        settle_verse(&mut ctx, &fetcher, request).await.unwrap();
        assert_eq!(ctx.reader.pagination.current_page, 1);

        let request = ctx.next_verse();
        assert_eq!(ctx.player.state().current_index, Some(10));
        assert_eq!(ctx.reader.pagination.current_page, 2);
        settle_verse(&mut ctx, &fetcher, request).await.unwrap();
        assert!(ctx.player.state().is_playing);
    }

    #[tokio::test]
    async fn verse_audio_after_chapter_change_is_dropped() {
        let (mut ctx, _rx, _) = context(api());
        ctx.load_chapter(2).await;
        let request = ctx.play_verse(3);

        ctx.load_chapter(1).await;
        settle_verse(&mut ctx, &FakeFetcher::default(), request).await.unwrap();
        assert!(ctx.player.media().played.is_empty());
        assert_eq!(ctx.player.state().current_index, None);
    }

    #[tokio::test]
    async fn jump_reports_missing_verse() {
        let (mut ctx, mut rx, _) = context(api());
        ctx.load_chapter(2).await;
        assert_eq!(ctx.jump_to_verse(40), JumpOutcome::NotFound);
        assert_eq!(drain(&mut rx), vec!["Ayah 40 not found in this surah".to_string()]);
        assert_eq!(
            ctx.jump_to_verse(15),
            JumpOutcome::Found { index: 14, page: 2, page_changed: true }
        );
    }

    #[tokio::test]
    async fn word_detail_falls_back_to_verse_text() {
        let (mut ctx, _rx, _) = context(api());
        ctx.load_chapter(2).await;

        assert_eq!(ctx.open_word_detail(0, 2).await, WordOutcome::Opened(None));
        let open = ctx.word_panel.open().unwrap();
        assert_eq!(open.detail.arabic, "ثانية");
        assert_eq!(open.detail.transliteration, "Word 2");
        assert_eq!(open.detail.audio_url, "https://words.audios.quranwbw.com/2/002_001_002.mp3");
    }

    #[tokio::test]
    async fn out_of_range_word_opens_nothing() {
        let (mut ctx, _rx, _) = context(api());
        ctx.load_chapter(2).await;
        assert_eq!(ctx.open_word_detail(0, 3).await, WordOutcome::Missing);
        assert!(ctx.word_panel.open().is_none());
    }

    #[tokio::test]
    async fn stale_word_detail_is_discarded() {
        let (mut ctx, _rx, _) = context(api());
        ctx.load_chapter(2).await;

        let first = ctx.begin_word_detail(0, 1).unwrap();
        let second = ctx.begin_word_detail(1, 2).unwrap();
        assert!(ctx.word_panel.is_pending());
        let detail = resolve_word(ctx.api(), &first.word, &first.local_text).await;
        assert_eq!(ctx.finish_word_detail(first.ticket, first.word, detail), WordOutcome::Stale);

        let detail = resolve_word(ctx.api(), &second.word, &second.local_text).await;
        let outcome = ctx.finish_word_detail(second.ticket, second.word.clone(), detail);
        assert_eq!(outcome, WordOutcome::Opened(None));
        assert_eq!(ctx.word_panel.open().map(|o| o.word.ayah), Some(2));
        assert!(!ctx.word_panel.is_pending());
    }

    #[tokio::test]
    async fn closing_the_view_discards_in_flight_detail() {
        let (mut ctx, _rx, _) = context(api());
        ctx.load_chapter(2).await;

        let request = ctx.begin_word_detail(0, 1).unwrap();
        ctx.close_word_view();
        let detail = resolve_word(ctx.api(), &request.word, &request.local_text).await;
        assert_eq!(
            ctx.finish_word_detail(request.ticket, request.word, detail),
            WordOutcome::Stale
        );
        assert!(ctx.word_panel.open().is_none());
    }

    fn remote_word() -> WordDetailResponse {
        serde_json::from_str(r#"{"arabic": "كلمة5", "transliteration": "kalima", "meaning": "word"}"#)
            .unwrap()
    }

    #[tokio::test]
    async fn autoplay_plays_resolved_word_audio() {
        let api = api();
        api.words.lock().unwrap().insert((2005, 0), remote_word());
        let (mut ctx, _rx, _) = context(api);
        let fetcher = FakeFetcher::default();
        ctx.auto_play_word_audio = true;
        ctx.load_chapter(2).await;

        let WordOutcome::Opened(Some(clip)) = ctx.open_word_detail(4, 1).await else {
            panic!("word view did not open with audio");
        };
        assert_eq!(clip.kind, ClipKind::Word);
        assert!(ctx.is_clip_pending());
        let fetched = fetch_first(&fetcher, std::slice::from_ref(&clip.url)).await;
        assert!(ctx.finish_clip(&clip, fetched));
        assert_eq!(
            ctx.word_audio.played,
            vec!["https://words.audios.quranwbw.com/2/002_005_001.mp3".to_string()]
        );

        ctx.close_word_view();
        assert!(!ctx.word_audio.has_source());
    }

    #[tokio::test]
    async fn autoplay_skips_local_fallback() {
        let (mut ctx, _rx, _) = context(api());
        ctx.auto_play_word_audio = true;
        ctx.load_chapter(2).await;

        assert_eq!(ctx.open_word_detail(4, 1).await, WordOutcome::Opened(None));
        assert_eq!(
            ctx.word_panel.open().map(|o| o.detail.source),
            Some(DetailSource::Local)
        );
        assert!(!ctx.is_clip_pending());
        assert!(ctx.word_audio.played.is_empty());

        // Explicit playback still works
        assert!(ctx.play_word_audio().is_some());
    }

    #[tokio::test]
    async fn closing_the_view_drops_in_flight_clip() {
        let (mut ctx, _rx, _) = context(api());
        ctx.load_chapter(2).await;
        ctx.open_word_detail(0, 1).await;
        let clip = ctx.play_word_audio().unwrap();

        ctx.close_word_view();
        let fetched = fetch_first(&FakeFetcher::default(), std::slice::from_ref(&clip.url)).await;
        assert!(!ctx.finish_clip(&clip, fetched));
        assert!(ctx.word_audio.played.is_empty());
    }

    #[tokio::test]
    async fn closing_word_view_cancels_invocation_run() {
        let (mut ctx, _rx, _) = context(api());
        ctx.load_chapter(2).await;
        let start = ctx.toggle_invocation_breakdown().unwrap();
        ctx.close_word_view();
        assert!(start.token.is_cancelled());
        assert!(!ctx.invocation.is_running());
    }

    #[tokio::test]
    async fn sequence_steps_fetch_word_audio() {
        let (mut ctx, _rx, _) = context(api());
        ctx.load_chapter(2).await;
        let start = ctx.toggle_invocation_breakdown().unwrap();
        let clip = ctx
            .apply_sequence_event(SequenceEvent {
                sequence: start.sequence,
                step: SequenceStep::Highlight(1),
            })
            .unwrap();
        assert_eq!(clip.kind, ClipKind::Sequence);
        assert_eq!(clip.url, "https://words.audios.quranwbw.com/001/001_001_001.mp3");
        assert_eq!(ctx.invocation.highlighted(), Some(1));
    }

    #[tokio::test]
    async fn single_invocation_word_failure_clears_highlight() {
        let (mut ctx, _rx, _) = context(api());
        ctx.load_chapter(2).await;
        let clip = ctx.play_invocation_word(3).unwrap();
        assert_eq!(ctx.invocation.highlighted(), Some(3));

        let fetcher = FakeFetcher::default();
        *fetcher.fail_all.lock().unwrap() = true;
        let fetched = fetch_first(&fetcher, std::slice::from_ref(&clip.url)).await;
        assert!(!ctx.finish_clip(&clip, fetched));
        assert_eq!(ctx.invocation.highlighted(), None);
    }

    #[tokio::test]
    async fn invocation_audio_failure_is_reported() {
        let (mut ctx, mut rx, _) = context(api());
        ctx.load_chapter(2).await;
        let clip = ctx.play_invocation().unwrap();

        let fetcher = FakeFetcher::default();
        *fetcher.fail_all.lock().unwrap() = true;
        let fetched = fetch_first(&fetcher, std::slice::from_ref(&clip.url)).await;
        assert!(!ctx.finish_clip(&clip, fetched));
        assert_eq!(drain(&mut rx), vec!["Cannot play Bismillah audio".to_string()]);
    }

    #[tokio::test]
    async fn invocation_audio_is_hidden_on_the_opening_chapter() {
        let (mut ctx, _rx, _) = context(api());
        ctx.load_chapter(1).await;
        assert_eq!(ctx.play_invocation(), None);
    }

    #[tokio::test]
    async fn bookmark_messages() {
        let (mut ctx, mut rx, _) = context(api());
        ctx.load_chapter(2).await;

        ctx.bookmark(0).await;
        *ctx.api().bookmark_status.lock().unwrap() = Some(401);
        ctx.bookmark(0).await;
        *ctx.api().bookmark_status.lock().unwrap() = Some(500);
        ctx.bookmark(0).await;

        assert_eq!(
            drain(&mut rx),
            vec![
                "Verse bookmarked!".to_string(),
                "Please login to bookmark verses".to_string(),
                "Could not bookmark verse".to_string(),
            ]
        );
        assert_eq!(*ctx.api().bookmarks.lock().unwrap(), vec![2001]);
    }

    #[tokio::test]
    async fn copy_and_share() {
        let (mut ctx, mut rx, clipboard) = context(api());
        ctx.load_chapter(2).await;

        ctx.copy_verse(0);
        ctx.share_verse(0);
        let written = clipboard.written.borrow();
        assert!(written[0].starts_with("Surah Surah 2 (2:1)"));
        assert!(written[1].ends_with("Shared via Quran App"));
        assert_eq!(
            drain(&mut rx),
            vec!["Verse copied to clipboard!".to_string(), "Verse link copied to clipboard!".to_string()]
        );
    }

    #[tokio::test]
    async fn clipboard_failure_messages() {
        let (notifier, mut rx) = Notifier::channel();
        let clipboard = MemoryClipboard { fail: true, ..Default::default() };
        let mut ctx: Ctx = ReaderContext::new(
            api(),
            FakeMedia::default(),
            FakeMedia::default(),
            Box::new(clipboard),
            &Config::default(),
            notifier,
        );
        ctx.load_chapter(2).await;
        ctx.copy_verse(0);
        ctx.share_verse(0);
        assert_eq!(
            drain(&mut rx),
            vec![
                "Failed to copy. Please try again.".to_string(),
                "Sharing not supported on this device".to_string()
            ]
        );
    }
}
