//! Content backend integration
//!
//! Provides the HTTP client, wire types and the normalization boundary
//! between backend JSON and the `quran` model.

pub mod client;
pub mod error;
pub mod models;
pub mod normalize;

pub use client::ApiClient;
pub use error::ApiError;
pub use models::{BookmarkKind, InvocationResponse, RawInvocationWord, WordDetailResponse};

use crate::quran::{Chapter, ChapterSummary};

/// Operations the reader needs from the content backend
#[allow(async_fn_in_trait)]
pub trait QuranApi {
    /// Chapter catalogue
    async fn chapters(&self) -> Result<Vec<ChapterSummary>, ApiError>;

    /// One chapter with all its verses, normalized
    async fn chapter(&self, number: u16) -> Result<Chapter, ApiError>;

    /// Word metadata; an embedded error marker is returned as `ApiError::ErrorMarker`
    async fn word_detail(&self, verse_id: u64, offset: u16) -> Result<WordDetailResponse, ApiError>;

    /// The opening invocation record
    async fn invocation(&self) -> Result<InvocationResponse, ApiError>;

    /// Store a bookmark for a verse
    async fn bookmark(&self, verse_id: u64, kind: BookmarkKind) -> Result<(), ApiError>;
}
