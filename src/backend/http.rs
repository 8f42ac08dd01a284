//! HTTP implementation of the puzzle backend using reqwest.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Serialize;

use crate::config::Config;
use crate::error::{BrowserError, Result};
use crate::filter::FilterSelection;
use crate::types::{Image, PuzzleId};

use super::{Backend, Endpoints, FilterRequest, ImagesFuture, Strategy, WireImage, normalize_images};

/// Backend reached over HTTP with JSON bodies
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoints: Endpoints,
}

#[derive(Serialize)]
struct FilterBody<'a> {
    filters: &'a FilterSelection,
    puzzle_ids: &'a [PuzzleId],
    game_state_filter_endpoint: String,
}

#[derive(Serialize)]
struct RecommendationBody<'a> {
    puzzle_ids: &'a [PuzzleId],
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpBackend {
    /// Create a backend with explicit timeouts.
    pub fn new(endpoints: Endpoints, timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client, endpoints })
    }

    /// Create a backend from configuration.
    ///
    /// The base URL honours the `PUZZLE_BROWSER_BACKEND_URL` override.
    pub fn from_config(config: &Config) -> Result<Self> {
        let endpoints = Endpoints::new(&config.backend_url())?;
        Self::new(endpoints, config.timeout(), config.connect_timeout())
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

/// Pull a readable message out of an error response body.
fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response".to_string()
    } else {
        trimmed.to_string()
    }
}

async fn fetch_images(request: RequestBuilder) -> Result<Vec<Image>> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BrowserError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    let wire: Vec<WireImage> = response.json().await?;
    Ok(normalize_images(wire))
}

impl Backend for HttpBackend {
    fn initial(&self) -> ImagesFuture {
        let request = self.endpoints.initial().map(|url| {
            tracing::debug!("GET {url}");
            self.client.get(url)
        });
        Box::pin(async move { fetch_images(request?).await })
    }

    fn search(&self, query: &str) -> ImagesFuture {
        let request = self.endpoints.search().map(|url| {
            tracing::debug!("GET {url}?query={query}");
            self.client.get(url).query(&[("query", query)])
        });
        Box::pin(async move { fetch_images(request?).await })
    }

    fn filter(&self, request: FilterRequest) -> ImagesFuture {
        let request = self
            .endpoints
            .filter()
            .and_then(|url| Ok((url, self.endpoints.game_state_filter(request.game_state)?)))
            .map(|(url, game_state_url)| {
                tracing::debug!(
                    "POST {url} ({} candidates, game state via {game_state_url})",
                    request.puzzle_ids.len()
                );
                self.client.post(url).json(&FilterBody {
                    filters: &request.filters,
                    puzzle_ids: &request.puzzle_ids,
                    game_state_filter_endpoint: game_state_url.to_string(),
                })
            });
        Box::pin(async move { fetch_images(request?).await })
    }

    fn recommendations(&self, strategy: Strategy, puzzle_ids: Vec<PuzzleId>) -> ImagesFuture {
        let request = self.endpoints.recommendations(strategy).map(|url| {
            tracing::debug!("POST {url} ({} visible ids)", puzzle_ids.len());
            self.client.post(url).json(&RecommendationBody {
                puzzle_ids: &puzzle_ids,
            })
        });
        Box::pin(async move { fetch_images(request?).await })
    }
}
