//! Client for the remote posts API.
//!
//! The API exposes a single `careers` collection with list, create, update
//! and delete operations. [`PostsApi`] is the seam the feed view-model talks
//! to; [`PostsClient`] implements it over HTTP.

mod client;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::PostsClient;

/// A single feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub username: String,
    pub title: String,
    pub content: String,
    pub created_datetime: DateTime<Utc>,
    /// Client-only like state. Never sent to the API.
    #[serde(default, skip_serializing)]
    pub liked: bool,
}

/// Body of a create request.
#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    pub username: String,
    pub title: String,
    pub content: String,
}

/// Body of an update request.
#[derive(Debug, Clone, Serialize)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
}

/// List response envelope. Only `results` is used.
#[derive(Debug, Deserialize)]
pub(crate) struct PostPage {
    pub results: Vec<Post>,
}

/// Error body the API returns on rejected requests.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API rejected request with status {status}")]
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("failed to decode API response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// Server-provided message for a rejected request, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Operations the feed needs from the posts backend.
#[async_trait]
pub trait PostsApi: Send + Sync {
    /// Fetch every post. Succeeds only on `200`.
    async fn list(&self) -> Result<Vec<Post>, ApiError>;

    /// Create a post and return it as stored. Succeeds only on `200`.
    async fn create(&self, post: &NewPost) -> Result<Post, ApiError>;

    /// Replace title and content of a post. Succeeds only on `200`.
    async fn update(&self, id: i64, changes: &PostChanges) -> Result<(), ApiError>;

    /// Delete a post. Succeeds only on `204`.
    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}
