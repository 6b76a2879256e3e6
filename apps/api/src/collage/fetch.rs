//! Card image fetching.
//!
//! Every card image is fetched on its own task with its own timeout. A card whose
//! fetch fails yields `None` and is drawn as a placeholder tile; one bad image
//! never fails the whole collage.

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image host returned status {0}")]
    Status(u16),

    #[error("timed out after {0}ms")]
    Timeout(u128),
}

#[derive(Clone)]
pub struct ImageFetcher {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ImageFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn image_url(&self, card_id: &str) -> String {
        format!("{}/{}.png", self.base_url, card_id)
    }

    /// Fetches the images for `card_ids` concurrently.
    ///
    /// The result has one slot per id, in the same order; failed fetches are `None`.
    pub async fn fetch_all(&self, card_ids: &[String]) -> Vec<Option<Bytes>> {
        let mut slots: Vec<Option<Bytes>> = vec![None; card_ids.len()];
        let mut tasks = JoinSet::new();

        for (index, card_id) in card_ids.iter().enumerate() {
            let client = self.client.clone();
            let url = self.image_url(card_id);
            let timeout = self.timeout;
            tasks.spawn(async move {
                let result = fetch_one(&client, &url, timeout).await;
                (index, url, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, _, Ok(bytes))) => slots[index] = Some(bytes),
                Ok((_, url, Err(e))) => warn!(url = %url, error = %e, "card image fetch failed"),
                Err(e) => warn!(error = %e, "card image task aborted"),
            }
        }

        debug!(
            requested = card_ids.len(),
            loaded = slots.iter().filter(|s| s.is_some()).count(),
            "card images fetched"
        );
        slots
    }
}

async fn fetch_one(client: &Client, url: &str, timeout: Duration) -> Result<Bytes, FetchError> {
    let request = async {
        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.bytes().await?)
    };

    tokio::time::timeout(timeout, request)
        .await
        .map_err(|_| FetchError::Timeout(timeout.as_millis()))?
}
