//! Event handling utilities

use crossterm::event::{KeyCode, KeyModifiers};

/// Key mapping for the reader screen (without modifiers)
pub fn reader_key_to_action(key: KeyCode) -> Option<Action> {
    match key {
        // Playback
        KeyCode::Char(' ') => Some(Action::TogglePlay),
        KeyCode::Char(',') => Some(Action::PreviousVerse),
        KeyCode::Char('.') => Some(Action::NextVerse),
        KeyCode::Char('m') => Some(Action::ToggleMute),
        KeyCode::Char('r') => Some(Action::ToggleRepeat),
        KeyCode::Char('s') => Some(Action::CycleSpeed),
        KeyCode::Char('z') => Some(Action::ToggleMinimize),
        KeyCode::Char(c @ '0'..='9') => c.to_digit(10).map(|d| Action::Seek(d as u8)),
        // Navigation
        KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
        KeyCode::Char('h') | KeyCode::Left => Some(Action::Left),
        KeyCode::Char('l') | KeyCode::Right => Some(Action::Right),
        KeyCode::Char('[') | KeyCode::PageUp => Some(Action::PrevPage),
        KeyCode::Char(']') | KeyCode::PageDown => Some(Action::NextPage),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Esc => Some(Action::Back),
        // Verse and word actions
        KeyCode::Char('w') => Some(Action::WordDetail),
        KeyCode::Char('p') => Some(Action::PlayWord),
        KeyCode::Char('y') => Some(Action::Copy),
        KeyCode::Char('Y') => Some(Action::Share),
        KeyCode::Char('b') => Some(Action::Bookmark),
        // Invocation
        KeyCode::Char('i') => Some(Action::ToggleBreakdown),
        KeyCode::Char('I') => Some(Action::PlayInvocation),
        // Screens
        KeyCode::Char('c') => Some(Action::ChapterPicker),
        KeyCode::Char(':') => Some(Action::Command),
        KeyCode::Char('?') => Some(Action::Help),
        // Note: 'q' intentionally not mapped - use :q command to quit
        _ => None,
    }
}

/// Key mapping with modifiers (for Ctrl combinations)
pub fn key_with_modifier_to_action(key: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match key {
            KeyCode::Left => Some(Action::PreviousVerse),
            KeyCode::Right => Some(Action::NextVerse),
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        }
    } else {
        reader_key_to_action(key)
    }
}

/// Actions that can be taken in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Playback
    TogglePlay,
    PreviousVerse,
    NextVerse,
    ToggleMute,
    ToggleRepeat,
    CycleSpeed,
    ToggleMinimize,
    /// Seek to n tenths of the track
    Seek(u8),

    // Navigation
    Up,
    Down,
    Left,
    Right,
    PrevPage,
    NextPage,

    // Selection
    Select,
    Back,

    // Verse and word actions
    WordDetail,
    PlayWord,
    Copy,
    Share,
    Bookmark,

    // Invocation
    ToggleBreakdown,
    PlayInvocation,

    // Modes
    ChapterPicker,
    Command,
    Help,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_toggles_play() {
        assert_eq!(reader_key_to_action(KeyCode::Char(' ')), Some(Action::TogglePlay));
    }

    #[test]
    fn digits_seek_in_tenths() {
        assert_eq!(reader_key_to_action(KeyCode::Char('0')), Some(Action::Seek(0)));
        assert_eq!(reader_key_to_action(KeyCode::Char('7')), Some(Action::Seek(7)));
    }

    #[test]
    fn brackets_and_page_keys_change_page() {
        assert_eq!(reader_key_to_action(KeyCode::Char('[')), Some(Action::PrevPage));
        assert_eq!(reader_key_to_action(KeyCode::PageDown), Some(Action::NextPage));
    }

    #[test]
    fn shifted_keys_are_distinct() {
        assert_eq!(reader_key_to_action(KeyCode::Char('y')), Some(Action::Copy));
        assert_eq!(reader_key_to_action(KeyCode::Char('Y')), Some(Action::Share));
        assert_eq!(reader_key_to_action(KeyCode::Char('i')), Some(Action::ToggleBreakdown));
        assert_eq!(reader_key_to_action(KeyCode::Char('I')), Some(Action::PlayInvocation));
    }

    #[test]
    fn unknown_key_returns_none() {
        assert_eq!(reader_key_to_action(KeyCode::Char('x')), None);
        assert_eq!(reader_key_to_action(KeyCode::Char('q')), None);
    }

    #[test]
    fn ctrl_arrows_step_verses() {
        assert_eq!(
            key_with_modifier_to_action(KeyCode::Left, KeyModifiers::CONTROL),
            Some(Action::PreviousVerse)
        );
        assert_eq!(
            key_with_modifier_to_action(KeyCode::Right, KeyModifiers::CONTROL),
            Some(Action::NextVerse)
        );
    }

    #[test]
    fn plain_arrows_move_selection() {
        assert_eq!(
            key_with_modifier_to_action(KeyCode::Left, KeyModifiers::NONE),
            Some(Action::Left)
        );
        assert_eq!(
            key_with_modifier_to_action(KeyCode::Char('j'), KeyModifiers::SHIFT),
            Some(Action::Down)
        );
    }
}
