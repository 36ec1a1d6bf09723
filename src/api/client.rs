use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{ApiError, ErrorBody, NewPost, Post, PostChanges, PostPage, PostsApi};
use crate::config::Config;
use crate::constants::{POSTS_PATH, USER_AGENT};

/// HTTP implementation of [`PostsApi`].
#[derive(Clone)]
pub struct PostsClient {
    http: reqwest::Client,
    base_url: String,
}

impl PostsClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self::with_client(http, &config.api_base_url))
    }

    /// Create a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}{POSTS_PATH}", self.base_url)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}{POSTS_PATH}{id}/", self.base_url)
    }
}

#[async_trait]
impl PostsApi for PostsClient {
    async fn list(&self) -> Result<Vec<Post>, ApiError> {
        let url = self.collection_url();
        debug!(url = %url, "Fetching posts");

        let response = self.http.get(&url).send().await?;
        let response = expect_status(response, StatusCode::OK).await?;
        let page: PostPage = decode(response).await?;

        debug!(count = page.results.len(), "Fetched posts");
        Ok(page.results)
    }

    async fn create(&self, post: &NewPost) -> Result<Post, ApiError> {
        let url = self.collection_url();
        debug!(url = %url, username = %post.username, "Creating post");

        let response = self.http.post(&url).json(post).send().await?;
        let response = expect_status(response, StatusCode::OK).await?;
        decode(response).await
    }

    async fn update(&self, id: i64, changes: &PostChanges) -> Result<(), ApiError> {
        let url = self.item_url(id);
        debug!(url = %url, post_id = id, "Updating post");

        let response = self.http.patch(&url).json(changes).send().await?;
        expect_status(response, StatusCode::OK).await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let url = self.item_url(id);
        debug!(url = %url, post_id = id, "Deleting post");

        let response = self.http.delete(&url).send().await?;
        expect_status(response, StatusCode::NO_CONTENT).await?;
        Ok(())
    }
}

/// Pass the response through if it carries exactly `expected`, otherwise
/// turn it into a rejection with whatever `detail` the body holds.
async fn expect_status(response: Response, expected: StatusCode) -> Result<Response, ApiError> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|d| !d.trim().is_empty());

    warn!(status = %status, expected = %expected, detail = ?detail, "Posts API rejected request");

    Err(ApiError::Rejected { status, detail })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(ApiError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_normalize_trailing_slash() {
        let client = PostsClient::with_client(reqwest::Client::new(), "https://api.example.com/");
        assert_eq!(client.collection_url(), "https://api.example.com/careers/");
        assert_eq!(client.item_url(42), "https://api.example.com/careers/42/");
    }
}
