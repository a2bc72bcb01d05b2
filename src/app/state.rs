//! Application state definitions

use std::ops::Range;
use std::time::{Duration, Instant};

use crate::notice::{Notice, NoticeLevel};

/// How long a notice stays on the status line
pub const NOTICE_DURATION: Duration = Duration::from_secs(2);

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Reader,
    Chapters,
    Help,
}

/// Verse and word under the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Global verse index
    pub verse: usize,
    /// 1-based word index
    pub word: u16,
}

impl Default for Selection {
    fn default() -> Self {
        Self { verse: 0, word: 1 }
    }
}

impl Selection {
    /// Keep the selection on the visible page
    pub fn clamp_to(&mut self, page: Range<usize>) {
        if page.is_empty() {
            *self = Self::default();
        } else if !page.contains(&self.verse) {
            self.verse = page.start;
            self.word = 1;
        }
    }

    /// Move to another verse, resetting the word
    pub fn select_verse(&mut self, verse: usize) {
        if verse != self.verse {
            self.verse = verse;
            self.word = 1;
        }
    }

    /// Move the word cursor within `1..=word_count`
    pub fn step_word(&mut self, forward: bool, word_count: usize) {
        let max = word_count.max(1) as u16;
        self.word = if forward { (self.word + 1).min(max) } else { self.word.saturating_sub(1).max(1) };
    }
}

/// State for the chapter picker
#[derive(Debug, Clone, Default)]
pub struct PickerState {
    /// Currently selected entry
    pub selected_index: usize,
    /// Scroll offset for the list
    pub scroll_offset: usize,
    /// Visible height in items (updated on render)
    pub visible_height: usize,
}

impl PickerState {
    /// Ensure the selected item is visible by adjusting scroll offset
    pub fn ensure_selection_visible(&mut self) {
        // Don't scroll past the selection (top)
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        }
        // Don't let selection go below visible area (bottom)
        let visible = self.visible_height.saturating_sub(2);
        if visible > 0 && self.selected_index >= self.scroll_offset + visible {
            self.scroll_offset = self.selected_index.saturating_sub(visible) + 1;
        }
    }

    /// Move the selection by `delta` within `len` entries
    pub fn step(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected_index = 0;
            return;
        }
        let next = self.selected_index.saturating_add_signed(delta);
        self.selected_index = next.min(len - 1);
        self.ensure_selection_visible();
    }
}

/// Command line mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommandMode {
    /// Normal mode - command line hidden or showing status
    #[default]
    Normal,
    /// Command mode - accepting : commands
    Command,
}

/// State for the command line input
#[derive(Debug, Clone, Default)]
pub struct CommandLineState {
    /// Current mode
    pub mode: CommandMode,
    /// Input buffer
    pub input: String,
    /// Cursor position in input
    pub cursor: usize,
    /// Status/error message to display (when not in input mode)
    pub message: Option<String>,
    /// Severity the message is drawn with
    pub level: NoticeLevel,
    /// When the message disappears
    pub message_expires: Option<Instant>,
    /// Command history
    pub history: Vec<String>,
    /// Current history index when navigating
    pub history_index: Option<usize>,
}

impl CommandLineState {
    /// Start command mode
    pub fn enter_command_mode(&mut self) {
        self.mode = CommandMode::Command;
        self.input.clear();
        self.cursor = 0;
        self.message = None;
        self.history_index = None;
    }

    /// Exit input mode
    pub fn exit_input_mode(&mut self) {
        self.mode = CommandMode::Normal;
        self.input.clear();
        self.cursor = 0;
    }

    /// Set a status message
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.level = NoticeLevel::Info;
        self.message_expires = None;
    }

    /// Set an error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.level = NoticeLevel::Error;
        self.message_expires = None;
    }

    /// Show a notice for [`NOTICE_DURATION`]
    pub fn show_notice(&mut self, notice: Notice, now: Instant) {
        self.message = Some(notice.message);
        self.level = notice.level;
        self.message_expires = Some(now + NOTICE_DURATION);
    }

    /// Drop a notice whose time is up
    pub fn expire_message(&mut self, now: Instant) {
        if self.message_expires.is_some_and(|at| now >= at) {
            self.clear_message();
        }
    }

    /// Clear the message
    pub fn clear_message(&mut self) {
        self.message = None;
        self.message_expires = None;
    }

    /// Convert character index to byte index
    fn char_to_byte_index(&self, char_idx: usize) -> usize {
        self.input.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(self.input.len())
    }

    /// Get the number of characters in input
    fn char_count(&self) -> usize {
        self.input.chars().count()
    }

    /// Insert a character at cursor (cursor is character index)
    pub fn insert_char(&mut self, c: char) {
        let byte_idx = self.char_to_byte_index(self.cursor);
        self.input.insert(byte_idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_idx = self.char_to_byte_index(self.cursor);
            self.input.remove(byte_idx);
        }
    }

    /// Move cursor left
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right
    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Check if we're in input mode
    pub fn is_input_mode(&self) -> bool {
        self.mode == CommandMode::Command
    }

    /// Maximum number of history entries to keep
    const MAX_HISTORY: usize = 100;

    /// Add to history
    pub fn add_to_history(&mut self, cmd: String) {
        if !cmd.is_empty() && self.history.last() != Some(&cmd) {
            if self.history.len() >= Self::MAX_HISTORY {
                self.history.remove(0);
            }
            self.history.push(cmd);
        }
    }

    /// Navigate history up
    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        match self.history_index {
            None => self.history_index = Some(self.history.len() - 1),
            Some(i) if i > 0 => self.history_index = Some(i - 1),
            _ => {}
        }
        if let Some(i) = self.history_index {
            self.input = self.history[i].clone();
            self.cursor = self.char_count();
        }
    }

    /// Navigate history down
    pub fn history_down(&mut self) {
        if let Some(i) = self.history_index {
            if i + 1 < self.history.len() {
                self.history_index = Some(i + 1);
                self.input = self.history[i + 1].clone();
                self.cursor = self.char_count();
            } else {
                self.history_index = None;
                self.input.clear();
                self.cursor = 0;
            }
        }
    }
}

/// Full application state
#[derive(Debug, Default)]
pub struct AppState {
    /// Current screen
    pub screen: Screen,

    /// Verse and word under the cursor
    pub selection: Selection,

    /// Chapter picker state
    pub picker: PickerState,

    /// Command line state
    pub command_line: CommandLineState,
}
