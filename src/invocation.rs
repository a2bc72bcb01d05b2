//! The opening invocation shown before most chapters
//!
//! The invocation is its own playable item: it is not a verse of the
//! chapter, is not counted by pagination, and has its own word-by-word
//! breakdown. The breakdown plays as a cancellable sequence of steps sent
//! back to the UI loop, which owns the audio output.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::InvocationResponse;

/// Chapters that open with the invocation
pub fn should_show(surah: u16) -> bool {
    surah != 1 && surah != 9
}

/// Reciter of the full invocation audio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reciter {
    Husary,
    Basfar,
    #[default]
    Alafasy,
}

impl Reciter {
    pub const ALL: [Reciter; 3] = [Reciter::Husary, Reciter::Basfar, Reciter::Alafasy];

    /// Recording of the full invocation by this reciter
    pub fn audio_url(&self) -> &'static str {
        match self {
            Self::Husary => "https://everyayah.com/data/Husary_128kbps/001001.mp3",
            Self::Basfar => "https://everyayah.com/data/Abdullah_Basfar_192kbps/001001.mp3",
            Self::Alafasy => "https://everyayah.com/data/Alafasy_128kbps/001001.mp3",
        }
    }
}

impl fmt::Display for Reciter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Husary => "Husary",
            Self::Basfar => "Basfar",
            Self::Alafasy => "Alafasy",
        };
        f.write_str(name)
    }
}

impl FromStr for Reciter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown reciter: {} (Husary, Basfar, Alafasy)", s.trim()))
    }
}

/// One word of the invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationWord {
    /// 1-based position
    pub index: u16,
    pub arabic: String,
    pub audio: Option<String>,
}

/// Text, translation and audio of the invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub text: String,
    pub translation: String,
    pub audio_url: Option<String>,
    pub words: Vec<InvocationWord>,
}

static BUILTIN_WORDS: Lazy<Vec<InvocationWord>> = Lazy::new(|| {
    ["بِسْمِ", "اللَّهِ", "الرَّحْمَٰنِ", "الرَّحِيمِ"]
        .into_iter()
        .enumerate()
        .map(|(i, arabic)| InvocationWord {
            index: i as u16 + 1,
            arabic: arabic.to_string(),
            audio: Some(format!(
                "https://words.audios.quranwbw.com/001/001_001_{:03}.mp3",
                i + 1
            )),
        })
        .collect()
});

impl Invocation {
    /// Record used when the backend cannot provide one
    pub fn builtin(reciter: Reciter) -> Self {
        Self {
            text: "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ".to_string(),
            translation: "In the name of Allah, the Entirely Merciful, the Especially Merciful."
                .to_string(),
            audio_url: Some(reciter.audio_url().to_string()),
            words: BUILTIN_WORDS.clone(),
        }
    }

    /// Record from the backend response
    pub fn from_response(response: InvocationResponse) -> Self {
        Self {
            text: response.text_uthmani,
            translation: response.translation_en.unwrap_or_default(),
            audio_url: response.audio_url.filter(|u| !u.is_empty()),
            words: response
                .words
                .into_iter()
                .map(|w| InvocationWord { index: w.index, arabic: w.arabic, audio: w.audio })
                .collect(),
        }
    }

    pub fn word(&self, index: u16) -> Option<&InvocationWord> {
        self.words.iter().find(|w| w.index == index)
    }
}

/// Delays of the word-by-word sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceTiming {
    /// How long each word stays highlighted
    pub settle: Duration,
    /// Pause after each word
    pub gap: Duration,
}

impl Default for SequenceTiming {
    fn default() -> Self {
        Self { settle: Duration::from_millis(1000), gap: Duration::from_millis(500) }
    }
}

/// Step of a running word sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStep {
    /// Highlight the word and play its audio
    Highlight(u16),
    Unhighlight(u16),
    /// All words played
    Finished,
}

/// A step tagged with the run it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceEvent {
    pub sequence: u64,
    pub step: SequenceStep,
}

/// Everything a spawned sequence task needs
#[derive(Debug, Clone)]
pub struct SequenceStart {
    pub sequence: u64,
    pub words: Vec<u16>,
    pub token: CancellationToken,
}

/// Play the given words one after another
///
/// Stops between steps once `token` is cancelled. Send failures mean the
/// receiver is gone and end the run.
pub async fn run_word_sequence(
    start: SequenceStart,
    timing: SequenceTiming,
    tx: UnboundedSender<SequenceEvent>,
) {
    let SequenceStart { sequence, words, token } = start;
    let send = |step| tx.send(SequenceEvent { sequence, step }).is_ok();

    for index in words {
        if token.is_cancelled() || !send(SequenceStep::Highlight(index)) {
            return;
        }
        let settled = wait(timing.settle, &token).await;
        if !send(SequenceStep::Unhighlight(index)) || !settled {
            return;
        }
        if !wait(timing.gap, &token).await {
            return;
        }
    }
    send(SequenceStep::Finished);
}

/// Sleep unless cancelled first; returns false on cancellation
async fn wait(duration: Duration, token: &CancellationToken) -> bool {
    tokio::select! {
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

#[derive(Debug)]
struct RunningSequence {
    id: u64,
    token: CancellationToken,
}

/// Display and playback state of the invocation
#[derive(Debug)]
pub struct InvocationHandler {
    record: Invocation,
    reciter: Reciter,
    /// Chapter the invocation is shown for
    shown_for: Option<u16>,
    /// Word breakdown visible
    expanded: bool,
    highlighted: Option<u16>,
    running: Option<RunningSequence>,
    last_sequence: u64,
}

impl InvocationHandler {
    pub fn new(reciter: Reciter) -> Self {
        Self {
            record: Invocation::builtin(reciter),
            reciter,
            shown_for: None,
            expanded: false,
            highlighted: None,
            running: None,
            last_sequence: 0,
        }
    }

    pub fn record(&self) -> &Invocation {
        &self.record
    }

    /// Replace the record, keeping the reciter's audio when none is given
    pub fn set_record(&mut self, mut record: Invocation) {
        if record.audio_url.is_none() {
            record.audio_url = Some(self.reciter.audio_url().to_string());
        }
        self.record = record;
    }

    pub fn reciter(&self) -> Reciter {
        self.reciter
    }

    /// Switch reciter and re-point the full invocation audio
    pub fn set_reciter(&mut self, reciter: Reciter) {
        self.reciter = reciter;
        self.record.audio_url = Some(reciter.audio_url().to_string());
    }

    /// Update visibility for a newly loaded chapter
    pub fn show_for(&mut self, surah: u16) -> bool {
        self.cancel();
        self.expanded = false;
        self.shown_for = should_show(surah).then_some(surah);
        self.shown_for.is_some()
    }

    /// Hide the invocation while no chapter is shown
    pub fn hide(&mut self) {
        self.cancel();
        self.expanded = false;
        self.shown_for = None;
    }

    pub fn is_visible(&self) -> bool {
        self.shown_for.is_some()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn highlighted(&self) -> Option<u16> {
        self.highlighted
    }

    /// Expand and start the sequence, or collapse and cancel it
    pub fn toggle_breakdown(&mut self) -> Option<SequenceStart> {
        if !self.is_visible() {
            return None;
        }
        if self.expanded {
            self.expanded = false;
            self.cancel();
            return None;
        }
        self.expanded = true;
        self.start_sequence()
    }

    /// Start a word-by-word run unless one is already in progress
    pub fn start_sequence(&mut self) -> Option<SequenceStart> {
        if self.running.is_some() || !self.is_visible() || self.record.words.is_empty() {
            return None;
        }
        self.last_sequence += 1;
        let token = CancellationToken::new();
        self.running = Some(RunningSequence { id: self.last_sequence, token: token.clone() });
        self.expanded = true;
        debug!(sequence = self.last_sequence, "Invocation sequence started");
        Some(SequenceStart {
            sequence: self.last_sequence,
            words: self.record.words.iter().map(|w| w.index).collect(),
            token,
        })
    }

    /// Cancel the running sequence, if any
    pub fn cancel(&mut self) {
        if let Some(running) = self.running.take() {
            debug!(sequence = running.id, "Invocation sequence cancelled");
            running.token.cancel();
        }
        self.highlighted = None;
    }

    /// Apply a step from the sequence task
    ///
    /// Returns the audio to play for a highlighted word. Steps of cancelled
    /// or finished runs are ignored.
    pub fn apply(&mut self, event: SequenceEvent) -> Option<String> {
        if self.running.as_ref().is_none_or(|r| r.id != event.sequence) {
            debug!(sequence = event.sequence, "Ignoring stale invocation step");
            return None;
        }
        match event.step {
            SequenceStep::Highlight(index) => {
                self.highlighted = Some(index);
                self.record.word(index).and_then(|w| w.audio.clone())
            }
            SequenceStep::Unhighlight(index) => {
                if self.highlighted == Some(index) {
                    self.highlighted = None;
                }
                None
            }
            SequenceStep::Finished => {
                self.running = None;
                self.highlighted = None;
                self.expanded = false;
                debug!(sequence = event.sequence, "Invocation sequence finished");
                None
            }
        }
    }

    /// Highlight a single word; returns its audio
    pub fn highlight_word(&mut self, index: u16) -> Option<String> {
        let audio = self.record.word(index)?.audio.clone()?;
        self.highlighted = Some(index);
        Some(audio)
    }

    /// Clear a single-word highlight once its audio ends
    pub fn clear_highlight(&mut self) {
        if self.running.is_none() {
            self.highlighted = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use tokio::sync::mpsc;

    use super::*;

    fn fast() -> SequenceTiming {
        SequenceTiming { settle: Duration::from_millis(1), gap: Duration::from_millis(1) }
    }

    fn visible_handler() -> InvocationHandler {
        let mut handler = InvocationHandler::new(Reciter::Alafasy);
        assert!(handler.show_for(2));
        handler
    }

    #[test]
    fn opening_and_ninth_chapters_have_no_invocation() {
        assert!(!should_show(1));
        assert!(!should_show(9));
        assert!(should_show(2));
        assert!(should_show(114));
    }

    proptest! {
        #[test]
        fn every_other_chapter_has_an_invocation(surah in 1u16..=114) {
            prop_assert_eq!(should_show(surah), surah != 1 && surah != 9);
        }
    }

    #[test]
    fn builtin_record_is_complete() {
        let record = Invocation::builtin(Reciter::Husary);
        assert_eq!(record.words.len(), 4);
        assert_eq!(
            record.words[3].audio.as_deref(),
            Some("https://words.audios.quranwbw.com/001/001_001_004.mp3")
        );
        assert_eq!(
            record.audio_url.as_deref(),
            Some("https://everyayah.com/data/Husary_128kbps/001001.mp3")
        );
    }

    #[test]
    fn reciter_parsing() {
        assert_eq!("basfar".parse::<Reciter>(), Ok(Reciter::Basfar));
        assert!("sudais".parse::<Reciter>().is_err());
    }

    #[test]
    fn changing_reciter_repoints_audio() {
        let mut handler = InvocationHandler::new(Reciter::Alafasy);
        handler.set_reciter(Reciter::Basfar);
        assert_eq!(
            handler.record().audio_url.as_deref(),
            Some("https://everyayah.com/data/Abdullah_Basfar_192kbps/001001.mp3")
        );
    }

    #[test]
    fn hidden_for_first_chapter() {
        let mut handler = InvocationHandler::new(Reciter::Alafasy);
        assert!(!handler.show_for(1));
        assert!(handler.toggle_breakdown().is_none());
        assert!(!handler.is_expanded());
    }

    #[test]
    fn runs_do_not_overlap() {
        let mut handler = visible_handler();
        let first = handler.toggle_breakdown().unwrap();
        assert_eq!(first.words, vec![1, 2, 3, 4]);
        assert!(handler.start_sequence().is_none());
    }

    #[test]
    fn collapsing_cancels_the_run() {
        let mut handler = visible_handler();
        let start = handler.toggle_breakdown().unwrap();
        assert!(handler.toggle_breakdown().is_none());
        assert!(start.token.is_cancelled());
        assert!(!handler.is_running());
    }

    #[test]
    fn chapter_change_cancels_the_run() {
        let mut handler = visible_handler();
        let start = handler.toggle_breakdown().unwrap();
        handler.show_for(3);
        assert!(start.token.is_cancelled());
        assert!(!handler.is_expanded());
    }

    #[test]
    fn steps_drive_highlight_and_collapse() {
        let mut handler = visible_handler();
        let start = handler.toggle_breakdown().unwrap();
        let event = |step| SequenceEvent { sequence: start.sequence, step };

        let audio = handler.apply(event(SequenceStep::Highlight(2)));
        assert_eq!(audio.as_deref(), Some("https://words.audios.quranwbw.com/001/001_001_002.mp3"));
        assert_eq!(handler.highlighted(), Some(2));

        handler.apply(event(SequenceStep::Unhighlight(2)));
        assert_eq!(handler.highlighted(), None);

        handler.apply(event(SequenceStep::Finished));
        assert!(!handler.is_running());
        assert!(!handler.is_expanded());
    }

    #[test]
    fn steps_of_cancelled_runs_are_ignored() {
        let mut handler = visible_handler();
        let old = handler.toggle_breakdown().unwrap();
        handler.toggle_breakdown();
        let new = handler.toggle_breakdown().unwrap();

        let stale = SequenceEvent { sequence: old.sequence, step: SequenceStep::Highlight(1) };
        assert!(handler.apply(stale).is_none());
        assert_eq!(handler.highlighted(), None);
        assert!(new.sequence > old.sequence);
    }

    #[tokio::test]
    async fn sequence_visits_every_word_in_order() {
        let mut handler = visible_handler();
        let start = handler.toggle_breakdown().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        run_word_sequence(start, fast(), tx).await;

        let mut steps = Vec::new();
        while let Ok(event) = rx.try_recv() {
            steps.push(event.step);
        }
        assert_eq!(
            steps,
            vec![
                SequenceStep::Highlight(1),
                SequenceStep::Unhighlight(1),
                SequenceStep::Highlight(2),
                SequenceStep::Unhighlight(2),
                SequenceStep::Highlight(3),
                SequenceStep::Unhighlight(3),
                SequenceStep::Highlight(4),
                SequenceStep::Unhighlight(4),
                SequenceStep::Finished,
            ]
        );
    }

    #[tokio::test]
    async fn cancelled_sequence_stops_between_steps() {
        let mut handler = visible_handler();
        let start = handler.toggle_breakdown().unwrap();
        let token = start.token.clone();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timing =
            SequenceTiming { settle: Duration::from_secs(30), gap: Duration::from_secs(30) };

        let task = tokio::spawn(run_word_sequence(start, timing, tx));
        let first = rx.recv().await.unwrap();
        assert_eq!(first.step, SequenceStep::Highlight(1));

        token.cancel();
        task.await.unwrap();

        let mut rest = Vec::new();
        while let Ok(event) = rx.try_recv() {
            rest.push(event.step);
        }
        assert!(rest.iter().all(|s| *s == SequenceStep::Unhighlight(1)));
    }

    #[tokio::test]
    async fn pre_cancelled_sequence_emits_nothing() {
        let start = SequenceStart {
            sequence: 1,
            words: vec![1, 2],
            token: CancellationToken::new(),
        };
        start.token.cancel();
        let (tx, mut rx) = mpsc::unbounded_channel();
        run_word_sequence(start, fast(), tx).await;
        assert!(rx.try_recv().is_err());
    }
}
