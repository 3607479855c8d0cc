use std::time::Duration;

use async_trait::async_trait;
use ratings_core::{PlayerStats, RawGame};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::GamePlatform;
use crate::config::Config;
use crate::error::ClientError;

pub struct ChessComClient {
    client: Client,
    base_url: String,
    request_delay: Duration,
    /// Earliest moment the next request may go out. Shared by every task
    /// using this client, so concurrent players queue behind one another.
    next_request: Mutex<Instant>,
}

impl ChessComClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent("ClubRatings/1.0")
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.chess_com_api_base.clone(),
            request_delay: Duration::from_millis(config.request_delay_ms),
            next_request: Mutex::new(Instant::now()),
        })
    }

    fn player_url(&self, handle: &str, path: &str) -> String {
        format!("{}/player/{}/{}", self.base_url, handle.to_lowercase(), path)
    }

    /// Wait for this request's turn; requests leave at least
    /// `request_delay` apart across all callers.
    async fn pace(&self) {
        if self.request_delay.is_zero() {
            return;
        }
        let mut next = self.next_request.lock().await;
        tokio::time::sleep_until(*next).await;
        *next = Instant::now() + self.request_delay;
    }

    /// GET `url` and parse the body as JSON. `Ok(None)` on 404.
    async fn get_json(&self, url: &str) -> Result<Option<Value>, ClientError> {
        self.pace().await;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ClientError::Request {
                url: url.to_string(),
                source,
            })?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !resp.status().is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|source| ClientError::Request {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| ClientError::Shape {
                url: url.to_string(),
                detail: format!("JSON parse error: {e}"),
            })
    }

    /// Like `get_json` but a 404 is an error too.
    async fn get_json_required(&self, url: &str) -> Result<Value, ClientError> {
        self.get_json(url).await?.ok_or_else(|| ClientError::Status {
            url: url.to_string(),
            status: StatusCode::NOT_FOUND.as_u16(),
        })
    }
}

#[async_trait]
impl GamePlatform for ChessComClient {
    async fn fetch_stats(&self, handle: &str) -> Result<PlayerStats, ClientError> {
        let url = self.player_url(handle, "stats");
        let data = self.get_json_required(&url).await?;

        serde_json::from_value(data).map_err(|e| ClientError::Shape {
            url,
            detail: e.to_string(),
        })
    }

    async fn fetch_archive_list(&self, handle: &str) -> Result<Vec<String>, ClientError> {
        let url = self.player_url(handle, "games/archives");
        let data = self.get_json_required(&url).await?;

        let archives = data["archives"]
            .as_array()
            .ok_or_else(|| ClientError::Shape {
                url: url.clone(),
                detail: "missing 'archives' array".to_string(),
            })?;

        Ok(archives
            .iter()
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect())
    }

    async fn fetch_archive_games(&self, archive_url: &str) -> Result<Vec<RawGame>, ClientError> {
        let Some(data) = self.get_json(archive_url).await? else {
            return Ok(vec![]);
        };

        let games = data["games"].as_array().ok_or_else(|| ClientError::Shape {
            url: archive_url.to_string(),
            detail: "missing 'games' array".to_string(),
        })?;

        let mut results = Vec::with_capacity(games.len());
        let mut malformed = 0usize;
        for game in games {
            match serde_json::from_value::<RawGame>(game.clone()) {
                Ok(raw) => results.push(raw),
                Err(_) => malformed += 1,
            }
        }

        if malformed > 0 {
            tracing::debug!(archive = %archive_url, malformed, "Dropped undecodable games");
        }

        Ok(results)
    }
}
