//! Premiumize API client
//!
//! Searches the user's cloud storage and fetches per-item playback details.
//! Premiumize links are already direct (the stream link is preferred over
//! the plain download link), so there is no unrestrict operation.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::models::{Candidate, DebridItem, DebridProvider, ItemKind, Video};
use crate::parse;

/// Premiumize API client
pub struct PremiumizeClient {
    base_url: String,
    client: reqwest::Client,
}

impl PremiumizeClient {
    pub fn new() -> Self {
        Self::with_base_url("https://www.premiumize.me/api")
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Search cloud files matching the query
    pub async fn search_files(
        &self,
        api_key: &str,
        query: &str,
        threshold: f64,
    ) -> Result<Vec<Candidate>> {
        let url = format!(
            "{}/folder/search?apikey={}&q={}",
            self.base_url,
            api_key,
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to search Premiumize files")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Premiumize returned HTTP {}", status);
        }

        let body: FolderSearchRaw = response
            .json()
            .await
            .context("Failed to parse Premiumize search response")?;

        if body.status != "success" {
            anyhow::bail!("Premiumize search failed with status {}", body.status);
        }

        Ok(body
            .content
            .into_iter()
            .filter(|f| f.kind == "file" && parse::is_video(&f.name))
            .filter(|f| parse::matches_query(&f.name, query, threshold))
            .map(|f| f.into_candidate())
            .collect())
    }

    /// Fetch playback details for one item
    pub async fn torrent_details(&self, api_key: &str, id: &str) -> Result<DebridItem> {
        let url = format!("{}/item/details?apikey={}&id={}", self.base_url, api_key, id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch Premiumize item details")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Premiumize returned HTTP {}", status);
        }

        let item: ItemDetailsRaw = response
            .json()
            .await
            .context("Failed to parse Premiumize item details")?;

        Ok(item.into_item())
    }
}

impl Default for PremiumizeClient {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct FolderSearchRaw {
    status: String,
    #[serde(default)]
    content: Vec<FolderEntryRaw>,
}

#[derive(Debug, Deserialize)]
struct FolderEntryRaw {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    size: Option<u64>,
}

impl FolderEntryRaw {
    fn into_candidate(self) -> Candidate {
        let info = parse::video_info(&self.name);
        Candidate {
            id: self.id,
            name: self.name,
            kind: ItemKind::Torrent,
            url: None,
            size: self.size,
            info,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ItemDetailsRaw {
    id: String,
    name: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    stream_link: Option<String>,
}

impl ItemDetailsRaw {
    fn into_item(self) -> DebridItem {
        let info = parse::video_info(&self.name);
        let url = self.stream_link.or(self.link);

        let videos = url
            .map(|url| {
                vec![Video {
                    url,
                    name: self.name.clone(),
                    size: self.size,
                    info: info.clone(),
                }]
            })
            .unwrap_or_default();

        DebridItem {
            source: DebridProvider::Premiumize,
            id: self.id,
            name: self.name,
            kind: ItemKind::Torrent,
            videos,
            size: self.size,
            info,
        }
    }
}
