use async_trait::async_trait;
use serde::Deserialize;

use super::OrderStore;
use crate::board::{Board, OrderRequest};
use crate::errors::SyncError;

const BOARD_PATH: &str = "/api/board";
const BOARD_SEGMENTS: [&str; 2] = ["api", "board"];

/// Error body returned by the authority (`{"error": "..."}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// `OrderStore` backed by the authority's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpOrderStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOrderStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Append `segments` to the base URL, percent-encoding each one.
    fn url(&self, endpoint: &str, segments: &[&str]) -> Result<reqwest::Url, SyncError> {
        let invalid = |message: String| SyncError::Transport {
            endpoint: endpoint.to_string(),
            message,
        };
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Turn a non-success response into `SyncError::Status`, preferring the
/// authority's own message when it sent one.
async fn status_error(endpoint: &str, resp: reqwest::Response) -> SyncError {
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);
    SyncError::Status {
        endpoint: endpoint.to_string(),
        status,
        message,
    }
}

fn transport(endpoint: &str, err: reqwest::Error) -> SyncError {
    SyncError::Transport {
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    }
}

#[async_trait]
impl OrderStore for HttpOrderStore {
    async fn replace_order(&self, request: &OrderRequest) -> Result<(), SyncError> {
        let endpoint = request.scope.path();
        let url = self.url(&endpoint, &request.scope.segments())?;
        let resp = self
            .client
            .put(url)
            .json(&request.body())
            .send()
            .await
            .map_err(|e| transport(&endpoint, e))?;
        if !resp.status().is_success() {
            return Err(status_error(&endpoint, resp).await);
        }
        Ok(())
    }

    async fn load_board(&self) -> Result<Board, SyncError> {
        let url = self.url(BOARD_PATH, &BOARD_SEGMENTS)?;
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport(BOARD_PATH, e))?;
        if !resp.status().is_success() {
            return Err(status_error(BOARD_PATH, resp).await);
        }
        resp.json::<Board>().await.map_err(|e| SyncError::Decode {
            endpoint: BOARD_PATH.to_string(),
            message: e.to_string(),
        })
    }
}
