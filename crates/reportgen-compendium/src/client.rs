use std::time::Duration;

use tracing::{debug, info};

use reportgen_core::models::monster::{Monster, MonstersResponse};

use crate::error::SourceError;

pub const DEFAULT_BASE_URL: &str = "https://botw-compendium.herokuapp.com/api/v3/compendium";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Game edition the monster listing is scoped to.
const GAME: &str = "totk";

#[derive(Debug, Clone)]
pub struct CompendiumClient {
    http: reqwest::Client,
    base_url: String,
}

impl CompendiumClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;
        Ok(Self::with_http_client(http, base_url))
    }

    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full monster listing. The API returns everything in one page.
    pub async fn get_monsters(&self) -> Result<Vec<Monster>, SourceError> {
        let url = format!("{}/category/monsters", self.base_url);
        debug!(url, game = GAME, "fetching monsters");

        let resp = self
            .http
            .get(&url)
            .query(&[("game", GAME)])
            .send()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;
        let parsed: MonstersResponse =
            serde_json::from_slice(&body).map_err(|e| SourceError::Decode(e.to_string()))?;

        info!(count = parsed.data.len(), "fetched monsters");
        Ok(parsed.data)
    }
}
