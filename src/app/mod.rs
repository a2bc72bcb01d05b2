//! Application state and event handling

pub mod command;
pub mod context;
pub mod input;
pub mod state;

pub use context::ReaderContext;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::api::{ApiClient, ApiError, BookmarkKind, InvocationResponse, QuranApi};
use crate::clipboard::SystemClipboard;
use crate::config::Config;
use crate::invocation::{SequenceEvent, SequenceStart, SequenceTiming, run_word_sequence};
use crate::notice::{Notice, Notifier};
use crate::player::{
    AudioClip, AudioFetcher, HttpAudioFetcher, MediaError, PlayRequest, PlayTicket, PlayerError,
    RodioBackend, Transition, fetch_first,
};
use crate::quran::{Chapter, ChapterSummary};
use crate::reader::{JumpOutcome, LoadOutcome, LoadTicket};
use crate::theme::Theme;
use crate::ui;
use crate::word_detail::{WordDetail, resolve_word};
use command::{Command, ParseResult, parse_command};
use context::{ClipRequest, WordOutcome, WordRequest};
use input::{Action, key_with_modifier_to_action};
use state::{AppState, Screen};

/// How long to wait for a key before servicing background work
const TICK: Duration = Duration::from_millis(50);

/// Completions of work spawned off the UI loop
enum AppEvent {
    Chapters(Result<Vec<ChapterSummary>, ApiError>),
    Chapter(LoadTicket, Result<Chapter, ApiError>),
    Word(WordRequest, Option<WordDetail>),
    VerseAudio(PlayTicket, Result<AudioClip, MediaError>),
    Clip(ClipRequest, Result<AudioClip, MediaError>),
    Invocation(Result<InvocationResponse, ApiError>),
    Bookmark(Result<(), ApiError>),
}

/// The main application
pub struct App {
    /// Application configuration
    config: Config,

    /// Current application state
    state: AppState,

    /// Reader, player and their collaborators
    ctx: ReaderContext<ApiClient, RodioBackend>,

    /// Downloads verse and word audio off the loop
    audio: HttpAudioFetcher,

    theme: Theme,

    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    sequence_tx: UnboundedSender<SequenceEvent>,
    sequence_rx: UnboundedReceiver<SequenceEvent>,
    notices: UnboundedReceiver<Notice>,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        let api = ApiClient::new(&config).context("Failed to create API client")?;
        let audio = HttpAudioFetcher::new(api.http().clone());
        let (notifier, notices) = Notifier::channel();
        let ctx = ReaderContext::new(
            api,
            RodioBackend::new(),
            RodioBackend::new(),
            Box::new(SystemClipboard::default()),
            &config,
            notifier,
        );
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (sequence_tx, sequence_rx) = mpsc::unbounded_channel();
        let theme = config.active_theme();
        let terminal = Self::setup_terminal()?;

        Ok(Self {
            config,
            state: AppState::default(),
            ctx,
            audio,
            theme,
            events_tx,
            events_rx,
            sequence_tx,
            sequence_rx,
            notices,
            terminal,
        })
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Run the application main loop, starting at `surah`
    pub async fn run(&mut self, surah: u16) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        self.spawn_startup();
        self.open_chapter(surah);

        loop {
            // Draw UI
            self.terminal.draw(|frame| {
                ui::draw(frame, &mut self.state, &self.ctx, &self.theme);
            })?;

            // Handle events
            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match self.handle_key(key) {
                            Ok(true) => break, // Exit requested
                            Ok(false) => {}    // Continue
                            Err(e) => {
                                error!("Error handling key: {}", e);
                            }
                        }
                    }
                }
            }

            self.drain_background();
            let transition = self.ctx.poll();
            self.spawn_transition(transition);
            self.sync_selection();

            let now = Instant::now();
            while let Ok(notice) = self.notices.try_recv() {
                self.state.command_line.show_notice(notice, now);
            }
            self.state.command_line.expire_message(now);
        }

        self.ctx.player.stop();
        self.ctx.close_word_view();
        self.restore_terminal()?;
        Ok(())
    }

    /// Fetch the catalogue and the invocation record
    fn spawn_startup(&self) {
        let api = self.ctx.api().clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppEvent::Chapters(api.chapters().await));
            let _ = tx.send(AppEvent::Invocation(api.invocation().await));
        });
    }

    fn open_chapter(&mut self, surah: u16) {
        let ticket = self.ctx.begin_chapter_load(surah);
        info!(surah, "Loading chapter");
        let api = self.ctx.api().clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.chapter(surah).await;
            let _ = tx.send(AppEvent::Chapter(ticket, result));
        });
    }

    fn open_word(&mut self) {
        let selection = self.state.selection;
        let Some(request) = self.ctx.begin_word_detail(selection.verse, selection.word) else {
            return;
        };
        let api = self.ctx.api().clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let detail = resolve_word(&api, &request.word, &request.local_text).await;
            let _ = tx.send(AppEvent::Word(request, detail));
        });
    }

    fn bookmark_selected(&self) {
        let Some(verse_id) =
            self.ctx.chapter().and_then(|c| c.verse(self.state.selection.verse)).map(|v| v.id)
        else {
            return;
        };
        let api = self.ctx.api().clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.bookmark(verse_id, BookmarkKind::Default).await;
            let _ = tx.send(AppEvent::Bookmark(result));
        });
    }

    fn spawn_sequence(&self, start: Option<SequenceStart>) {
        if let Some(start) = start {
            debug!(sequence = start.sequence, "Starting invocation word sequence");
            let tx = self.sequence_tx.clone();
            tokio::spawn(run_word_sequence(start, SequenceTiming::default(), tx));
        }
    }

    /// Fetch verse audio for a player transition
    fn spawn_verse_audio(&self, request: Option<PlayRequest>) {
        let Some(request) = request else {
            return;
        };
        let audio = self.audio.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = fetch_first(&audio, &request.urls).await;
            let _ = tx.send(AppEvent::VerseAudio(request.ticket, result));
        });
    }

    fn spawn_transition(&self, transition: Transition) {
        match transition {
            Ok(request) => self.spawn_verse_audio(request),
            Err(e) => report(Err(e)),
        }
    }

    /// Fetch word or invocation audio
    fn spawn_clip(&self, request: Option<ClipRequest>) {
        let Some(request) = request else {
            return;
        };
        let audio = self.audio.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = audio.fetch(&request.url).await;
            let _ = tx.send(AppEvent::Clip(request, result));
        });
    }

    /// Apply everything that finished since the last tick
    fn drain_background(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppEvent::Chapters(result) => self.ctx.apply_chapters(result),
                AppEvent::Chapter(ticket, result) => {
                    let outcome = self.ctx.finish_chapter_load(ticket, result);
                    debug!(surah = ticket.surah, ?outcome, "Chapter request finished");
                    if outcome == LoadOutcome::Applied {
                        self.state.selection = Default::default();
                    }
                }
                AppEvent::Word(request, detail) => {
                    let outcome = self.ctx.finish_word_detail(request.ticket, request.word, detail);
                    if let WordOutcome::Opened(clip) = outcome {
                        self.spawn_clip(clip);
                    }
                }
                AppEvent::VerseAudio(ticket, result) => {
                    report(self.ctx.finish_verse_audio(ticket, result));
                }
                AppEvent::Clip(request, result) => {
                    self.ctx.finish_clip(&request, result);
                }
                AppEvent::Invocation(result) => self.ctx.apply_invocation(result),
                AppEvent::Bookmark(result) => self.ctx.report_bookmark(result),
            }
        }
        while let Ok(event) = self.sequence_rx.try_recv() {
            let clip = self.ctx.apply_sequence_event(event);
            self.spawn_clip(clip);
        }
    }

    /// Keep the cursor on the visible page
    fn sync_selection(&mut self) {
        let range = self.ctx.reader.page_range();
        self.state.selection.clamp_to(range);
    }

    /// Handle a key press, returns true if should exit
    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.state.command_line.is_input_mode() {
            return self.handle_command_key(key.code);
        }

        match self.state.screen {
            Screen::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter) {
                    self.state.screen = Screen::Reader;
                }
                Ok(false)
            }
            Screen::Chapters => {
                self.handle_picker_key(key.code);
                Ok(false)
            }
            Screen::Reader => match key_with_modifier_to_action(key.code, key.modifiers) {
                Some(action) => self.handle_action(action),
                None => Ok(false),
            },
        }
    }

    fn handle_picker_key(&mut self, key: KeyCode) {
        let len = self.ctx.reader.chapters.len();
        let picker = &mut self.state.picker;
        match key {
            KeyCode::Char('j') | KeyCode::Down => picker.step(1, len),
            KeyCode::Char('k') | KeyCode::Up => picker.step(-1, len),
            KeyCode::PageDown => picker.step(10, len),
            KeyCode::PageUp => picker.step(-10, len),
            KeyCode::Esc | KeyCode::Char('c') => self.state.screen = Screen::Reader,
            KeyCode::Enter => {
                let number = self.ctx.reader.chapters.get(picker.selected_index).map(|c| c.number);
                self.state.screen = Screen::Reader;
                if let Some(number) = number {
                    self.open_chapter(number);
                }
            }
            _ => {}
        }
    }

    fn handle_action(&mut self, action: Action) -> Result<bool> {
        let selected = self.state.selection.verse;
        match action {
            Action::TogglePlay => {
                let transition = self.ctx.toggle_play();
                self.spawn_transition(transition);
            }
            Action::PreviousVerse => {
                let request = self.ctx.previous_verse();
                self.spawn_verse_audio(request);
            }
            Action::NextVerse => {
                let request = self.ctx.next_verse();
                self.spawn_verse_audio(request);
            }
            Action::ToggleMute => self.ctx.player.toggle_mute(),
            Action::ToggleRepeat => self.ctx.player.toggle_repeat(),
            Action::CycleSpeed => self.ctx.player.cycle_speed(),
            Action::ToggleMinimize => self.ctx.player.toggle_minimize(),
            Action::Seek(tenths) => self.ctx.player.seek(f64::from(tenths) / 10.0),

            Action::Down | Action::Up => {
                let count = self.ctx.chapter().map_or(0, |c| c.verse_count());
                if count > 0 {
                    let next = if action == Action::Down {
                        (selected + 1).min(count - 1)
                    } else {
                        selected.saturating_sub(1)
                    };
                    self.ctx.reader.reveal(next);
                    self.state.selection.select_verse(next);
                }
            }
            Action::Left | Action::Right => {
                let words =
                    self.ctx.chapter().and_then(|c| c.verse(selected)).map_or(0, |v| v.words.len());
                self.state.selection.step_word(action == Action::Right, words);
            }
            Action::PrevPage => {
                self.ctx.prev_page();
            }
            Action::NextPage => {
                self.ctx.next_page();
            }
            Action::Select => {
                let request = self.ctx.play_verse(selected);
                self.spawn_verse_audio(request);
            }
            Action::Back => self.ctx.close_word_view(),

            Action::WordDetail => self.open_word(),
            Action::PlayWord => {
                let clip = if self.ctx.word_panel.open().is_none() && self.ctx.invocation.is_expanded()
                {
                    self.ctx.play_invocation_word(self.state.selection.word)
                } else {
                    self.ctx.play_word_audio()
                };
                self.spawn_clip(clip);
            }
            Action::Copy => self.ctx.copy_verse(selected),
            Action::Share => self.ctx.share_verse(selected),
            Action::Bookmark => self.bookmark_selected(),

            Action::ToggleBreakdown => {
                let start = self.ctx.toggle_invocation_breakdown();
                self.spawn_sequence(start);
            }
            Action::PlayInvocation => {
                let clip = self.ctx.play_invocation();
                self.spawn_clip(clip);
            }

            Action::ChapterPicker => {
                if let Some(number) = self.ctx.chapter().map(|c| c.number) {
                    let index = self.ctx.reader.chapters.iter().position(|c| c.number == number);
                    self.state.picker.selected_index = index.unwrap_or(0);
                    self.state.picker.ensure_selection_visible();
                }
                self.state.screen = Screen::Chapters;
            }
            Action::Command => self.state.command_line.enter_command_mode(),
            Action::Help => self.state.screen = Screen::Help,
            Action::Quit => return Ok(true),
        }
        Ok(false)
    }

    fn handle_command_key(&mut self, key: KeyCode) -> Result<bool> {
        let line = &mut self.state.command_line;
        match key {
            KeyCode::Esc => line.exit_input_mode(),
            KeyCode::Enter => {
                let input = line.input.clone();
                line.add_to_history(input.clone());
                line.exit_input_mode();
                return self.execute_command(&input);
            }
            KeyCode::Backspace => {
                if line.input.is_empty() {
                    line.exit_input_mode();
                } else {
                    line.delete_char();
                }
            }
            KeyCode::Left => line.move_left(),
            KeyCode::Right => line.move_right(),
            KeyCode::Up => line.history_up(),
            KeyCode::Down => line.history_down(),
            KeyCode::Char(c) => line.insert_char(c),
            _ => {}
        }
        Ok(false)
    }

    fn execute_command(&mut self, input: &str) -> Result<bool> {
        let command = match parse_command(input) {
            ParseResult::Ok(command) => command,
            ParseResult::UnknownCommand(cmd) => {
                self.state.command_line.set_error(format!("Unknown command: {}", cmd));
                return Ok(false);
            }
            ParseResult::MissingArgument(cmd) => {
                self.state.command_line.set_error(format!("Missing argument for :{}", cmd));
                return Ok(false);
            }
            ParseResult::InvalidArgument(detail) => {
                self.state.command_line.set_error(format!("Invalid argument: {}", detail));
                return Ok(false);
            }
        };

        match command {
            Command::Surah(number) => self.open_chapter(number),
            Command::Goto(ayah) => {
                if let JumpOutcome::Found { index, .. } = self.ctx.jump_to_verse(ayah) {
                    self.state.selection.select_verse(index);
                }
            }
            Command::PageSize(size) => {
                self.ctx.set_page_size(size);
                self.config.verses_per_page = size;
                self.state.command_line.set_message(format!("{} verses per page", size));
            }
            Command::Autoplay(value) => {
                let enabled = value.unwrap_or(!self.ctx.auto_play_word_audio);
                self.ctx.auto_play_word_audio = enabled;
                self.config.auto_play_word_audio = enabled;
                self.persist_config();
                let label = if enabled { "on" } else { "off" };
                self.state.command_line.set_message(format!("Word audio autoplay: {}", label));
            }
            Command::Reciter(reciter) => {
                self.ctx.set_reciter(reciter);
                self.config.reciter = reciter;
                self.persist_config();
            }
            Command::Quit => return Ok(true),
            Command::Help => self.state.screen = Screen::Help,
            Command::Nop => self.state.command_line.clear_message(),
        }
        Ok(false)
    }

    /// Save preferences; the page size stays session-only
    fn persist_config(&mut self) {
        let mut saved = self.config.clone();
        if let Ok(on_disk) = Config::load() {
            saved.verses_per_page = on_disk.verses_per_page;
        }
        if let Err(e) = saved.save() {
            error!(error = %e, "Failed to save config");
            self.state.command_line.set_error("Could not save preferences");
        }
    }
}

/// Log player failures; the player already told the user
fn report(result: Result<(), PlayerError>) {
    if let Err(e) = result {
        debug!(error = %e, "Player action failed");
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}
