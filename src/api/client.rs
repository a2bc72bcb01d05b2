//! HTTP client for the content backend

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, info};

use super::QuranApi;
use super::error::ApiError;
use super::models::{
    BookmarkKind, BookmarkRequest, CatalogPayload, InvocationResponse, WordDetailResponse,
};
use super::normalize::{normalize_summary, parse_chapter};
use crate::config::{ApiEndpoints, Config};
use crate::quran::{Chapter, ChapterSummary};

/// Content backend client
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// HTTP client
    client: Client,
    /// Backend root, without trailing slash
    base_url: String,
    /// Endpoint path templates
    endpoints: ApiEndpoints,
}

impl ApiClient {
    /// Create a client from the configuration
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            endpoints: config.endpoints.clone(),
        })
    }

    /// The shared HTTP client, also used to fetch audio bodies
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// Absolute URL of an endpoint path
    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// URL of the chapter endpoint for a surah
    pub fn chapter_url(&self, number: u16) -> String {
        self.url(&self.endpoints.chapter.replace("{number}", &number.to_string()))
    }

    /// URL of the word endpoint for a verse id and zero-based word offset
    pub fn word_url(&self, verse_id: u64, offset: u16) -> String {
        self.url(
            &self
                .endpoints
                .word
                .replace("{id}", &verse_id.to_string())
                .replace("{offset}", &offset.to_string()),
        )
    }

    /// POST carrying a bookmark for a verse
    fn bookmark_request(&self, verse_id: u64, kind: BookmarkKind) -> RequestBuilder {
        let request = BookmarkRequest { ayah: verse_id, bookmark_type: kind };
        self.client.post(self.url(&self.endpoints.bookmarks)).json(&request)
    }

    async fn get_text(&self, url: &str) -> Result<String, ApiError> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.text().await?)
    }

    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::ApiError { status: status.as_u16(), message });
        }

        Ok(response)
    }
}

impl QuranApi for ApiClient {
    async fn chapters(&self) -> Result<Vec<ChapterSummary>, ApiError> {
        let body = self.get_text(&self.url(&self.endpoints.chapters)).await?;
        let payload: CatalogPayload = serde_json::from_str(&body)?;
        let chapters: Vec<ChapterSummary> =
            payload.into_entries().into_iter().map(normalize_summary).collect();
        info!(count = chapters.len(), "Loaded chapter catalogue");
        Ok(chapters)
    }

    async fn chapter(&self, number: u16) -> Result<Chapter, ApiError> {
        let body = self.get_text(&self.chapter_url(number)).await?;
        let chapter = parse_chapter(&body, number)?;
        info!(surah = chapter.number, verses = chapter.verse_count(), "Loaded chapter");
        Ok(chapter)
    }

    async fn word_detail(&self, verse_id: u64, offset: u16) -> Result<WordDetailResponse, ApiError> {
        let body = self.get_text(&self.word_url(verse_id, offset)).await?;
        let detail: WordDetailResponse = serde_json::from_str(&body)?;
        match detail.error_marker() {
            Some(marker) => Err(ApiError::ErrorMarker(marker)),
            None => Ok(detail),
        }
    }

    async fn invocation(&self) -> Result<InvocationResponse, ApiError> {
        let body = self.get_text(&self.url(&self.endpoints.invocation)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn bookmark(&self, verse_id: u64, kind: BookmarkKind) -> Result<(), ApiError> {
        let response = self.bookmark_request(verse_id, kind).send().await?;
        Self::check_status(response).await?;
        info!(verse_id, "Bookmarked verse");
        Ok(())
    }
}
