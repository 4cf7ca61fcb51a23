//! Source traits describing the listing backend.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::entities::Category;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    #[error("backend returned status {status}: {body}")]
    Server { status: u16, body: String },
    #[error("failed to decode response body: {0}")]
    Decode(String),
}

impl SourceError {
    pub fn unreachable(err: impl std::fmt::Display) -> Self {
        Self::Unreachable(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Backend collection a listing is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingFeed {
    /// Adoption posts with nested pets.
    #[default]
    Posts,
    /// Bare pets, for staff tables.
    Pets,
}

/// Which feed to read, plus optional server-side paging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub feed: ListingFeed,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListingQuery {
    pub fn feed(feed: ListingFeed) -> Self {
        Self {
            feed,
            ..Self::default()
        }
    }

    pub fn page(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: Some(page_number),
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    pub fn with_page(self, page_number: u32, page_size: Option<u32>) -> Self {
        Self {
            page_number: Some(page_number),
            page_size,
            ..self
        }
    }

    pub fn is_unpaged(&self) -> bool {
        self.page_number.is_none() && self.page_size.is_none()
    }
}

/// Fetches raw listing bodies and categories.
///
/// Listing bodies are returned undecoded; envelope resolution is the normalizer's job.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_listing(&self, query: &ListingQuery) -> Result<Value, SourceError>;

    async fn fetch_categories(&self) -> Result<Vec<Category>, SourceError>;
}
