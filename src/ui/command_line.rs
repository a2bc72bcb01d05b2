//! Status and command input line
//!
//! In normal mode the line shows the latest notice in its level's color,
//! then any background work in flight, then a key hint. In command mode it
//! is the `:` prompt.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::state::{CommandLineState, CommandMode};
use crate::notice::NoticeLevel;
use crate::theme::Theme;

const IDLE_HINT: &str = "Press : for commands, ? for help";

/// Background work the reader is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    WordLookup,
    VerseAudio,
    WordAudio,
}

impl Activity {
    fn label(self) -> &'static str {
        match self {
            Activity::WordLookup => "Looking up word…",
            Activity::VerseAudio => "Loading recitation…",
            Activity::WordAudio => "Loading word audio…",
        }
    }
}

pub fn draw(
    frame: &mut Frame,
    area: Rect,
    state: &CommandLineState,
    activity: Option<Activity>,
    theme: &Theme,
) {
    let line = match state.mode {
        CommandMode::Command => prompt_line(&state.input, state.cursor, theme),
        CommandMode::Normal => status_line(state, activity, theme),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn level_style(level: NoticeLevel, theme: &Theme) -> (&'static str, Color) {
    match level {
        NoticeLevel::Info => ("", theme.fg_secondary),
        NoticeLevel::Success => ("✓ ", theme.success),
        NoticeLevel::Warning => ("! ", theme.warning),
        NoticeLevel::Error => ("✗ ", theme.error),
    }
}

fn status_line(
    state: &CommandLineState,
    activity: Option<Activity>,
    theme: &Theme,
) -> Line<'static> {
    if let Some(message) = &state.message {
        let (mark, color) = level_style(state.level, theme);
        return Line::from(vec![
            Span::styled(mark, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(message.clone(), Style::default().fg(color)),
        ]);
    }
    match activity {
        Some(activity) => {
            Line::from(Span::styled(activity.label(), Style::default().fg(theme.info)))
        }
        None => Line::from(Span::styled(IDLE_HINT, Style::default().fg(theme.fg_muted))),
    }
}

/// `:` prompt with a block cursor on character `cursor` of `input`
fn prompt_line(input: &str, cursor: usize, theme: &Theme) -> Line<'static> {
    let text = Style::default().fg(theme.accent_primary);
    let block = Style::default().fg(theme.bg_primary).bg(theme.cursor);

    let chars: Vec<char> = input.chars().collect();
    let cursor = cursor.min(chars.len());
    let before: String = chars[..cursor].iter().collect();
    let under = chars.get(cursor).map_or_else(|| " ".to_string(), char::to_string);
    let after: String = chars.iter().skip(cursor + 1).collect();

    let mut spans = vec![Span::styled(format!(":{}", before), text), Span::styled(under, block)];
    if !after.is_empty() {
        spans.push(Span::styled(after, text));
    }
    Line::from(spans)
}
