//! Real-Debrid API client
//!
//! Searches the user's torrent library and download history, and resolves
//! restricted host links. API docs: https://api.real-debrid.com
//!
//! Torrent detail responses pair a `files` list with a parallel `links`
//! list; only selected files have links, and the two line up in order.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::models::{Candidate, DebridItem, DebridProvider, ItemKind, Video};
use crate::parse;

/// Real-Debrid API client
pub struct RealDebridClient {
    base_url: String,
    client: reqwest::Client,
}

impl RealDebridClient {
    pub fn new() -> Self {
        Self::with_base_url("https://api.real-debrid.com/rest/1.0")
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

    /// List finished torrents whose names match the query
    pub async fn search_torrents(
        &self,
        api_key: &str,
        query: &str,
        threshold: f64,
    ) -> Result<Vec<Candidate>> {
        let url = format!("{}/torrents?limit=100", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .context("Failed to fetch Real-Debrid torrent list")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Real-Debrid returned HTTP {}", status);
        }

        let torrents: Vec<TorrentListRaw> = response
            .json()
            .await
            .context("Failed to parse Real-Debrid torrent list")?;

        Ok(torrents
            .into_iter()
            .filter(|t| t.status == "downloaded")
            .filter(|t| parse::matches_query(&t.filename, query, threshold))
            .map(|t| t.into_candidate())
            .collect())
    }

    /// Fetch the file/link breakdown for one torrent
    pub async fn torrent_details(&self, api_key: &str, id: &str) -> Result<DebridItem> {
        let url = format!("{}/torrents/info/{}", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .context("Failed to fetch Real-Debrid torrent info")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Real-Debrid returned HTTP {}", status);
        }

        let info: TorrentInfoRaw = response
            .json()
            .await
            .context("Failed to parse Real-Debrid torrent info")?;

        Ok(info.into_item())
    }

    /// List past downloads whose names match the query
    pub async fn search_downloads(
        &self,
        api_key: &str,
        query: &str,
        threshold: f64,
    ) -> Result<Vec<DebridItem>> {
        let url = format!("{}/downloads?limit=100", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .context("Failed to fetch Real-Debrid downloads")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Real-Debrid returned HTTP {}", status);
        }

        let downloads: Vec<DownloadRaw> = response
            .json()
            .await
            .context("Failed to parse Real-Debrid downloads")?;

        Ok(downloads
            .into_iter()
            .filter(|d| parse::matches_query(&d.filename, query, threshold))
            .map(|d| d.into_item())
            .collect())
    }

    /// Convert a restricted host link into a direct download URL
    pub async fn unrestrict_url(
        &self,
        api_key: &str,
        link: &str,
        client_ip: Option<&str>,
    ) -> Result<String> {
        let url = format!("{}/unrestrict/link", self.base_url);

        let mut form = vec![("link", link.to_string())];
        if let Some(ip) = client_ip {
            form.push(("ip", ip.to_string()));
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .form(&form)
            .send()
            .await
            .context("Failed to unrestrict Real-Debrid link")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Real-Debrid returned HTTP {}", status);
        }

        let unrestricted: UnrestrictRaw = response
            .json()
            .await
            .context("Failed to parse Real-Debrid unrestrict response")?;

        Ok(unrestricted.download)
    }
}

impl Default for RealDebridClient {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct TorrentListRaw {
    id: String,
    filename: String,
    #[serde(default)]
    bytes: Option<u64>,
    status: String,
}

impl TorrentListRaw {
    fn into_candidate(self) -> Candidate {
        let info = parse::video_info(&self.filename);
        Candidate {
            id: self.id,
            name: self.filename,
            kind: ItemKind::Torrent,
            url: None,
            size: self.bytes,
            info,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TorrentInfoRaw {
    id: String,
    filename: String,
    #[serde(default)]
    bytes: Option<u64>,
    #[serde(default)]
    files: Vec<TorrentFileRaw>,
    #[serde(default)]
    links: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TorrentFileRaw {
    path: String,
    bytes: u64,
    selected: u8,
}

impl TorrentInfoRaw {
    fn into_item(self) -> DebridItem {
        let videos = self
            .files
            .into_iter()
            .filter(|f| f.selected == 1)
            .zip(self.links)
            .filter(|(f, _)| parse::is_video(&f.path))
            .map(|(f, link)| {
                let name = f.path.trim_start_matches('/').to_string();
                let info = parse::video_info(&name);
                Video {
                    url: link,
                    name,
                    size: Some(f.bytes),
                    info,
                }
            })
            .collect();

        let info = parse::video_info(&self.filename);
        DebridItem {
            source: DebridProvider::RealDebrid,
            id: self.id,
            name: self.filename,
            kind: ItemKind::Torrent,
            videos,
            size: self.bytes,
            info,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DownloadRaw {
    id: String,
    filename: String,
    download: String,
    #[serde(default)]
    filesize: Option<u64>,
}

impl DownloadRaw {
    fn into_item(self) -> DebridItem {
        let info = parse::video_info(&self.filename);
        DebridItem {
            source: DebridProvider::RealDebrid,
            id: self.id,
            name: self.filename.clone(),
            kind: ItemKind::Download,
            videos: vec![Video {
                url: self.download,
                name: self.filename,
                size: self.filesize,
                info: info.clone(),
            }],
            size: self.filesize,
            info,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UnrestrictRaw {
    download: String,
}
