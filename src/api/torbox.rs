//! TorBox API client
//!
//! Lists the user's torrents with their full file breakdown in one call, so
//! the dispatcher needs no per-item detail fetch. TorBox download URLs are
//! minted on demand by `requestdl`; until then each file is addressed by a
//! synthetic host URL carrying the torrent and file ids.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::models::{DebridItem, DebridProvider, ItemKind, Video};
use crate::parse;

/// TorBox API client
pub struct TorBoxClient {
    base_url: String,
    client: reqwest::Client,
}

impl TorBoxClient {
    pub fn new() -> Self {
        Self::with_base_url("https://api.torbox.app")
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

    /// List finished torrents matching the query, fully detailed
    pub async fn search_torrents(
        &self,
        api_key: &str,
        query: &str,
        threshold: f64,
    ) -> Result<Vec<DebridItem>> {
        let url = format!("{}/v1/api/torrents/mylist?bypass_cache=true", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .context("Failed to fetch TorBox torrent list")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("TorBox returned HTTP {}", status);
        }

        let body: MyListRaw = response
            .json()
            .await
            .context("Failed to parse TorBox torrent list")?;

        if !body.success {
            anyhow::bail!("TorBox list request was not successful");
        }

        let base_url = self.base_url.clone();
        Ok(body
            .data
            .into_iter()
            .filter(|t| t.download_finished)
            .filter(|t| parse::matches_query(&t.name, query, threshold))
            .map(|t| t.into_item(&base_url))
            .collect())
    }

    /// Mint a fresh download URL for a file addressed by its host URL.
    ///
    /// The host URL is the synthetic `/v1/api/torrents/{torrent}/files/{file}`
    /// path built by `search_torrents`; the trailing segment recovers the
    /// file id for `requestdl`.
    pub async fn unrestrict_url(
        &self,
        api_key: &str,
        item_id: &str,
        host_url: &str,
        client_ip: Option<&str>,
    ) -> Result<String> {
        let file_id = host_url
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("TorBox host URL has no file id: {}", host_url))?;

        let mut url = format!(
            "{}/v1/api/torrents/requestdl?token={}&torrent_id={}&file_id={}",
            self.base_url, api_key, item_id, file_id
        );
        if let Some(ip) = client_ip {
            url.push_str("&user_ip=");
            url.push_str(&urlencoding::encode(ip));
        }

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to request TorBox download link")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("TorBox returned HTTP {}", status);
        }

        let body: RequestDlRaw = response
            .json()
            .await
            .context("Failed to parse TorBox download link response")?;

        if !body.success {
            anyhow::bail!("TorBox download link request was not successful");
        }

        Ok(body.data)
    }
}

impl Default for TorBoxClient {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct MyListRaw {
    success: bool,
    #[serde(default)]
    data: Vec<TorrentRaw>,
}

#[derive(Debug, Deserialize)]
struct TorrentRaw {
    id: u64,
    name: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    download_finished: bool,
    #[serde(default)]
    files: Vec<FileRaw>,
}

#[derive(Debug, Deserialize)]
struct FileRaw {
    id: u64,
    name: String,
    #[serde(default)]
    size: Option<u64>,
}

impl TorrentRaw {
    fn into_item(self, base_url: &str) -> DebridItem {
        let torrent_id = self.id;
        let videos = self
            .files
            .into_iter()
            .filter(|f| parse::is_video(&f.name))
            .map(|f| {
                let info = parse::video_info(&f.name);
                Video {
                    url: format!(
                        "{}/v1/api/torrents/{}/files/{}",
                        base_url, torrent_id, f.id
                    ),
                    name: f.name,
                    size: f.size,
                    info,
                }
            })
            .collect();

        let info = parse::video_info(&self.name);
        DebridItem {
            source: DebridProvider::TorBox,
            id: torrent_id.to_string(),
            name: self.name,
            kind: ItemKind::Torrent,
            videos,
            size: self.size,
            info,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RequestDlRaw {
    success: bool,
    data: String,
}
