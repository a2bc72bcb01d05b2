//! Verse page with the chapter header and invocation block

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::layout::{draw_placeholder, wrap_text};
use crate::app::ReaderContext;
use crate::app::state::Selection;
use crate::invocation::InvocationHandler;
use crate::player::MediaBackend;
use crate::quran::{Language, Verse};
use crate::reader::{LoadStatus, Pagination, Reader};
use crate::theme::Theme;

const IDLE_HINT: &str = "Press c to pick a surah, or :surah <n>";

/// `[ ‹ Page N of M › ]`, each arrow lit only when that page move is possible
fn page_nav(pagination: &Pagination, theme: &Theme) -> Vec<Span<'static>> {
    let arrow = |glyph: &'static str, enabled: bool| {
        let style = if enabled {
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.bg_tertiary)
        };
        Span::styled(glyph, style)
    };
    vec![
        arrow("[ ‹ ", pagination.can_prev()),
        Span::styled(pagination.summary(), Style::default().fg(theme.fg_secondary)),
        arrow(" › ]", pagination.can_next()),
    ]
}

/// Chapter title plus page information
pub fn draw_header<A, M: MediaBackend>(
    frame: &mut Frame,
    area: Rect,
    ctx: &ReaderContext<A, M>,
    theme: &Theme,
) {
    let reader = &ctx.reader;
    let muted = Style::default().fg(theme.fg_muted);
    let (title, detail) = match (&reader.status, reader.chapter()) {
        (LoadStatus::Loading { surah }, _) => {
            (format!("Surah {}", surah), vec![Span::styled("Loading...", muted)])
        }
        (_, Some(chapter)) => {
            let mut facts = Vec::new();
            if let Some(kind) =
                reader.summary(chapter.number).and_then(|s| s.revelation_type.as_deref())
            {
                facts.push(kind.to_string());
            }
            facts.push(format!("{} verses", chapter.verse_count()));

            let mut detail = vec![Span::styled(format!("{} · ", facts.join(" · ")), muted)];
            detail.extend(page_nav(&reader.pagination, theme));
            (format!("{}  {}", chapter.title(), chapter.name_arabic), detail)
        }
        _ => ("mushaf".to_string(), Vec::new()),
    };

    let lines = vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(detail),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

/// Draw the current page, or the placeholder for the load status
pub fn draw<A, M: MediaBackend>(
    frame: &mut Frame,
    area: Rect,
    selection: Selection,
    ctx: &ReaderContext<A, M>,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &ctx.reader.status {
        LoadStatus::Idle => {
            draw_placeholder(frame, inner, IDLE_HINT, Style::default().fg(theme.fg_muted));
            return;
        }
        LoadStatus::Loading { .. } => {
            draw_placeholder(frame, inner, "Loading verses...", Style::default().fg(theme.info));
            return;
        }
        LoadStatus::Failed(message) => {
            draw_placeholder(frame, inner, message, Style::default().fg(theme.error));
            return;
        }
        LoadStatus::Ready => {}
    }

    let width = inner.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = Vec::new();
    if ctx.invocation.is_visible() {
        invocation_lines(&mut lines, &ctx.invocation, theme, width);
    }

    let playing = ctx.player.state().current_index;
    let mut selected_span = (0, 0);
    for (index, verse) in ctx.reader.page_verses() {
        let start = lines.len();
        let marks = VerseMarks {
            selected_word: (index == selection.verse).then_some(selection.word),
            playing: playing == Some(index),
            pulsing: ctx.reader.is_pulsing(index),
        };
        verse_lines(&mut lines, &ctx.reader, verse, marks, theme, width);
        if marks.selected_word.is_some() {
            selected_span = (start, lines.len());
        }
    }

    let scroll = scroll_for(selected_span, inner.height as usize);
    let page = Paragraph::new(lines).scroll((scroll as u16, 0));
    frame.render_widget(page, inner);
}

/// Scroll so the selected verse is on screen, preferring its first line
fn scroll_for((start, end): (usize, usize), visible: usize) -> usize {
    end.saturating_sub(visible).min(start)
}

#[derive(Debug, Clone, Copy)]
struct VerseMarks {
    selected_word: Option<u16>,
    playing: bool,
    pulsing: bool,
}

fn invocation_lines(
    lines: &mut Vec<Line<'static>>,
    invocation: &InvocationHandler,
    theme: &Theme,
    width: usize,
) {
    let record = invocation.record();
    lines.push(
        Line::from(Span::styled(
            record.text.clone(),
            Style::default().fg(theme.arabic).add_modifier(Modifier::BOLD),
        ))
        .centered(),
    );
    for part in wrap_text(&record.translation, width) {
        lines.push(Line::from(Span::styled(part, Style::default().fg(theme.fg_muted))).centered());
    }

    if invocation.is_expanded() {
        let highlighted = invocation.highlighted();
        let mut spans = Vec::new();
        for word in &record.words {
            let style = if highlighted == Some(word.index) {
                Style::default().fg(theme.bg_primary).bg(theme.playing).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.arabic)
            };
            spans.push(Span::styled(format!(" {} ", word.arabic), style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans).centered());
    }
    let hint = if invocation.is_expanded() { "[i] hide words  [I] play" } else { "[i] words  [I] play" };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(theme.bg_tertiary))).centered());
    lines.push(Line::from(""));
}

fn verse_lines(
    lines: &mut Vec<Line<'static>>,
    reader: &Reader,
    verse: &Verse,
    marks: VerseMarks,
    theme: &Theme,
    width: usize,
) {
    let chapter_name = reader.chapter().map(|c| c.name_english.as_str()).unwrap_or_default();

    let gutter = match (marks.playing, marks.selected_word.is_some()) {
        (true, _) => "▶ ",
        (false, true) => "› ",
        _ => "  ",
    };
    let header_style = if marks.pulsing {
        Style::default().fg(theme.bg_primary).bg(theme.pulse).add_modifier(Modifier::BOLD)
    } else if marks.playing {
        Style::default().fg(theme.playing).add_modifier(Modifier::BOLD)
    } else if marks.selected_word.is_some() {
        Style::default().fg(theme.accent_primary)
    } else {
        Style::default().fg(theme.fg_muted)
    };
    lines.push(Line::from(vec![
        Span::styled(gutter, Style::default().fg(theme.playing)),
        Span::styled(format!("{:>3}  ", verse.number), header_style),
        Span::styled(verse.info_line(chapter_name), header_style),
    ]));

    let mut words = vec![Span::raw("  ")];
    for word in &verse.words {
        let style = if marks.selected_word == Some(word.index) {
            Style::default().fg(theme.bg_primary).bg(theme.accent_secondary)
        } else {
            Style::default().fg(theme.arabic)
        };
        words.push(Span::styled(word.text.clone(), style));
        words.push(Span::raw(" "));
    }
    lines.push(Line::from(words).right_aligned());

    for part in wrap_text(verse.english_or_placeholder(), width) {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(part, Style::default().fg(theme.fg_primary)),
        ]));
    }
    if let Some(bangla) = verse.translation(Language::Bangla) {
        for part in wrap_text(bangla, width) {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(part, Style::default().fg(theme.fg_secondary)),
            ]));
        }
    }
    lines.push(Line::from(""));
}
