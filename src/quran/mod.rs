//! Quran content model

pub mod model;
pub mod share;

pub use model::{Chapter, ChapterSummary, Language, Translation, Verse, Word, split_words};
