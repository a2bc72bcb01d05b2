//! UI rendering components

pub mod chapters;
pub mod command_line;
pub mod help;
pub mod layout;
pub mod player_bar;
pub mod reader;
pub mod word_modal;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
};

use crate::app::ReaderContext;
use crate::app::state::{AppState, Screen};
use crate::player::MediaBackend;
use crate::theme::Theme;
use command_line::Activity;

/// The most relevant background work in flight
fn activity<A, M: MediaBackend>(ctx: &ReaderContext<A, M>) -> Option<Activity> {
    if ctx.word_panel.is_pending() {
        Some(Activity::WordLookup)
    } else if ctx.player.is_loading() {
        Some(Activity::VerseAudio)
    } else if ctx.is_clip_pending() {
        Some(Activity::WordAudio)
    } else {
        None
    }
}

/// Main draw function
pub fn draw<A, M: MediaBackend>(
    frame: &mut Frame,
    state: &mut AppState,
    ctx: &ReaderContext<A, M>,
    theme: &Theme,
) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), area);

    let bar_height = player_bar::height(&ctx.player);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(bar_height),
            Constraint::Length(1),
        ])
        .split(area);

    reader::draw_header(frame, chunks[0], ctx, theme);
    match state.screen {
        Screen::Chapters => chapters::draw(frame, chunks[1], state, &ctx.reader, theme),
        Screen::Reader | Screen::Help => {
            reader::draw(frame, chunks[1], state.selection, ctx, theme);
        }
    }
    player_bar::draw(frame, chunks[2], &ctx.player, theme);
    command_line::draw(frame, chunks[3], &state.command_line, activity(ctx), theme);

    if let Some(open) = ctx.word_panel.open() {
        word_modal::draw(frame, area, open, theme);
    }
    if state.screen == Screen::Help {
        help::draw(frame, area, theme);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::clipboard::ClipboardWriter;
    use crate::config::Config;
    use crate::notice::Notifier;
    use crate::testing::{FakeApi, FakeFetcher, FakeMedia, chapter_with, settle_verse};

    struct NoClipboard;

    impl ClipboardWriter for NoClipboard {
        fn write_text(&mut self, _text: &str) -> Result<(), String> {
            Err("none".to_string())
        }
    }

    fn render<A, M: MediaBackend>(
        state: &mut AppState,
        ctx: &ReaderContext<A, M>,
    ) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 60)).unwrap();
        let theme = Theme::default();
        terminal.draw(|frame| draw(frame, state, ctx, &theme)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn loaded(surah: u16) -> ReaderContext<FakeApi, FakeMedia> {
        let (notifier, _rx) = Notifier::channel();
        let api = FakeApi::default().with_chapter(chapter_with(surah, 12));
        let mut ctx = ReaderContext::new(
            api,
            FakeMedia::default(),
            FakeMedia::default(),
            Box::new(NoClipboard),
            &Config::default(),
            notifier,
        );
        ctx.load_chapter(surah).await;
        ctx
    }

    #[tokio::test]
    async fn reader_shows_page_and_invocation() {
        let ctx = loaded(2).await;
        let screen = render(&mut AppState::default(), &ctx);
        assert!(screen.contains("Page 1 of 2"));
        assert!(screen.contains("In the name of Allah"));
        assert!(screen.contains("Verse 10"));
        assert!(!screen.contains("Verse 11"));
    }

    #[tokio::test]
    async fn invocation_stays_on_later_pages() {
        let mut ctx = loaded(2).await;
        assert!(ctx.next_page());
        assert_eq!(ctx.reader.pagination.total, 12);

        let screen = render(&mut AppState::default(), &ctx);
        assert!(screen.contains("Page 2 of 2"));
        assert!(screen.contains("In the name of Allah"));
        assert!(screen.contains("Verse 12"));
        assert!(!screen.contains("Verse 10 "));
    }

    #[tokio::test]
    async fn fatiha_has_no_invocation_block() {
        let ctx = loaded(1).await;
        let screen = render(&mut AppState::default(), &ctx);
        assert!(!screen.contains("In the name of Allah"));
    }

    #[tokio::test]
    async fn failed_load_shows_placeholder() {
        let mut ctx = loaded(2).await;
        ctx.load_chapter(7).await;
        let screen = render(&mut AppState::default(), &ctx);
        assert!(screen.contains("Error loading verses. Please try again later."));
    }

    #[tokio::test]
    async fn player_bar_appears_once_playing() {
        let mut ctx = loaded(2).await;
        assert!(!render(&mut AppState::default(), &ctx).contains("Surah 2 - Ayah 3"));
        let request = ctx.play_verse(2);
        settle_verse(&mut ctx, &FakeFetcher::default(), request).await.unwrap();
        assert!(render(&mut AppState::default(), &ctx).contains("Surah 2 - Ayah 3"));
    }

    #[tokio::test]
    async fn status_line_shows_pending_work() {
        let mut ctx = loaded(2).await;
        ctx.begin_word_detail(0, 1);
        assert!(render(&mut AppState::default(), &ctx).contains("Looking up word…"));

        ctx.close_word_view();
        ctx.play_verse(0);
        assert!(render(&mut AppState::default(), &ctx).contains("Loading recitation…"));
    }

    #[tokio::test]
    async fn word_overlay_lists_details() {
        let mut ctx = loaded(2).await;
        ctx.open_word_detail(0, 1).await;
        let screen = render(&mut AppState::default(), &ctx);
        assert!(screen.contains("Transliteration"));
        assert!(screen.contains("Word 1"));
    }

    #[tokio::test]
    async fn help_overlay_lists_keys() {
        let ctx = loaded(2).await;
        let mut state = AppState { screen: Screen::Help, ..Default::default() };
        assert!(render(&mut state, &ctx).contains("Toggle play"));
    }
}
