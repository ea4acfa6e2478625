//! DebridLink API client
//!
//! Lists the user's seedbox torrents and their files. DebridLink file URLs
//! are already direct, so there is no unrestrict operation; detail lookups
//! accept a comma-joined id list and come back in one round trip.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::models::{Candidate, DebridItem, DebridProvider, ItemKind, Video};
use crate::parse;

/// DebridLink API client
pub struct DebridLinkClient {
    base_url: String,
    client: reqwest::Client,
}

impl DebridLinkClient {
    pub fn new() -> Self {
        Self::with_base_url("https://debrid-link.com/api/v2")
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

    /// List finished seedbox torrents whose names match the query
    pub async fn search_torrents(
        &self,
        api_key: &str,
        query: &str,
        threshold: f64,
    ) -> Result<Vec<Candidate>> {
        let torrents = self.seedbox_list(api_key, None).await?;

        Ok(torrents
            .into_iter()
            .filter(|t| t.download_percent >= 100.0)
            .filter(|t| parse::matches_query(&t.name, query, threshold))
            .map(|t| t.into_candidate())
            .collect())
    }

    /// Batch detail fetch for a comma-joined id list
    pub async fn torrent_details(&self, api_key: &str, ids: &str) -> Result<Vec<DebridItem>> {
        let torrents = self.seedbox_list(api_key, Some(ids)).await?;
        Ok(torrents.into_iter().map(|t| t.into_item()).collect())
    }

    async fn seedbox_list(&self, api_key: &str, ids: Option<&str>) -> Result<Vec<SeedboxTorrentRaw>> {
        let url = match ids {
            Some(ids) => format!("{}/seedbox/list?ids={}", self.base_url, ids),
            None => format!("{}/seedbox/list", self.base_url),
        };

        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .context("Failed to fetch DebridLink seedbox list")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("DebridLink returned HTTP {}", status);
        }

        let body: SeedboxListRaw = response
            .json()
            .await
            .context("Failed to parse DebridLink seedbox list")?;

        Ok(body.value)
    }
}

impl Default for DebridLinkClient {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct SeedboxListRaw {
    #[serde(default)]
    value: Vec<SeedboxTorrentRaw>,
}

#[derive(Debug, Deserialize)]
struct SeedboxTorrentRaw {
    id: String,
    name: String,
    #[serde(rename = "downloadPercent", default)]
    download_percent: f64,
    #[serde(rename = "totalSize", default)]
    total_size: Option<u64>,
    #[serde(default)]
    files: Vec<SeedboxFileRaw>,
}

#[derive(Debug, Deserialize)]
struct SeedboxFileRaw {
    name: String,
    #[serde(rename = "downloadUrl")]
    download_url: String,
    #[serde(default)]
    size: Option<u64>,
}

impl SeedboxTorrentRaw {
    fn into_candidate(self) -> Candidate {
        let info = parse::video_info(&self.name);
        Candidate {
            id: self.id,
            name: self.name,
            kind: ItemKind::Torrent,
            url: None,
            size: self.total_size,
            info,
        }
    }

    fn into_item(self) -> DebridItem {
        let videos = self
            .files
            .into_iter()
            .filter(|f| parse::is_video(&f.name))
            .map(|f| {
                let info = parse::video_info(&f.name);
                Video {
                    url: f.download_url,
                    name: f.name,
                    size: f.size,
                    info,
                }
            })
            .collect();

        let info = parse::video_info(&self.name);
        DebridItem {
            source: DebridProvider::DebridLink,
            id: self.id,
            name: self.name,
            kind: ItemKind::Torrent,
            videos,
            size: self.total_size,
            info,
        }
    }
}
