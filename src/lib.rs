//! mushaf - A terminal Quran reader
//!
//! mushaf pages through a chapter's verses, plays verse recitations as a
//! playlist, and breaks verses and the opening Bismillah down word by word
//! with per-word audio and details.

pub mod addressing;
pub mod api;
pub mod app;
pub mod clipboard;
pub mod config;
pub mod invocation;
pub mod notice;
pub mod player;
pub mod quran;
pub mod reader;
pub mod theme;
pub mod ui;
pub mod word_detail;

#[cfg(test)]
mod testing;

pub use app::App;
pub use config::Config;
pub use theme::Theme;
