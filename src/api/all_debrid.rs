//! AllDebrid API client
//!
//! Searches ready magnets and saved host links, and unlocks restricted
//! links. AllDebrid authenticates with query-string parameters and wraps
//! every payload in a `status`/`data` envelope.
//!
//! Saved links surface as "direct" candidates: they carry a host URL that is
//! only unlocked at playback time.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::models::{Candidate, DebridItem, DebridProvider, ItemKind, Video};
use crate::parse;

/// Agent name AllDebrid requires on every call
const AGENT: &str = "debrid-search";

/// Magnet statusCode for "ready"
const MAGNET_READY: u32 = 4;

/// AllDebrid API client
pub struct AllDebridClient {
    base_url: String,
    client: reqwest::Client,
}

impl AllDebridClient {
    pub fn new() -> Self {
        Self::with_base_url("https://api.alldebrid.com/v4")
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

    /// List ready magnets and saved direct links matching the query.
    ///
    /// Both classes come back merged in one candidate list; direct items are
    /// distinguished by their kind and carry the host URL.
    pub async fn search_torrents(
        &self,
        api_key: &str,
        query: &str,
        threshold: f64,
    ) -> Result<Vec<Candidate>> {
        let url = format!(
            "{}/magnet/status?agent={}&apikey={}",
            self.base_url, AGENT, api_key
        );
        let data: MagnetStatusData = self.fetch(&url, "magnet status").await?;

        let mut candidates: Vec<Candidate> = data
            .magnets
            .into_vec()
            .into_iter()
            .filter(|m| m.status_code == MAGNET_READY)
            .filter(|m| parse::matches_query(&m.filename, query, threshold))
            .map(|m| m.into_candidate())
            .collect();

        let url = format!(
            "{}/user/links?agent={}&apikey={}",
            self.base_url, AGENT, api_key
        );
        let data: SavedLinksData = self.fetch(&url, "saved links").await?;

        candidates.extend(
            data.links
                .into_iter()
                .filter(|l| parse::matches_query(&l.filename, query, threshold))
                .map(|l| l.into_candidate()),
        );

        Ok(candidates)
    }

    /// Fetch one magnet's file list; `None` when the magnet is gone
    pub async fn torrent_details(&self, api_key: &str, id: &str) -> Result<Option<DebridItem>> {
        let url = format!(
            "{}/magnet/status?agent={}&apikey={}&id={}",
            self.base_url, AGENT, api_key, id
        );
        let data: MagnetStatusData = self.fetch(&url, "magnet status").await?;

        Ok(data
            .magnets
            .into_vec()
            .into_iter()
            .next()
            .map(|m| m.into_item()))
    }

    /// Unlock a restricted host link into a direct URL
    pub async fn unrestrict_url(&self, api_key: &str, link: &str) -> Result<String> {
        let url = format!(
            "{}/link/unlock?agent={}&apikey={}&link={}",
            self.base_url,
            AGENT,
            api_key,
            urlencoding::encode(link)
        );
        let data: UnlockData = self.fetch(&url, "link unlock").await?;
        Ok(data.link)
    }

    /// GET an AllDebrid endpoint and unwrap its status envelope
    async fn fetch<T: for<'de> Deserialize<'de>>(&self, url: &str, what: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch AllDebrid {}", what))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("AllDebrid returned HTTP {}", status);
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse AllDebrid {} response", what))?;

        if envelope.status != "success" {
            let message = envelope
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| "unknown error".to_string());
            anyhow::bail!("AllDebrid {} failed: {}", what, message);
        }

        envelope
            .data
            .ok_or_else(|| anyhow::anyhow!("AllDebrid {} response missing data", what))
    }
}

impl Default for AllDebridClient {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    status: String,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<ErrorRaw>,
}

#[derive(Debug, Deserialize)]
struct ErrorRaw {
    message: String,
}

#[derive(Debug, Deserialize)]
struct MagnetStatusData {
    magnets: OneOrMany<MagnetRaw>,
}

/// Single-id magnet lookups return one object where list lookups return an
/// array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MagnetRaw {
    id: u64,
    filename: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(rename = "statusCode", default)]
    status_code: u32,
    #[serde(default)]
    links: Vec<MagnetLinkRaw>,
}

#[derive(Debug, Deserialize)]
struct MagnetLinkRaw {
    link: String,
    filename: String,
    #[serde(default)]
    size: Option<u64>,
}

impl MagnetRaw {
    fn into_candidate(self) -> Candidate {
        let info = parse::video_info(&self.filename);
        Candidate {
            id: self.id.to_string(),
            name: self.filename,
            kind: ItemKind::Torrent,
            url: None,
            size: self.size,
            info,
        }
    }

    fn into_item(self) -> DebridItem {
        let videos = self
            .links
            .into_iter()
            .filter(|l| parse::is_video(&l.filename))
            .map(|l| {
                let info = parse::video_info(&l.filename);
                Video {
                    url: l.link,
                    name: l.filename,
                    size: l.size,
                    info,
                }
            })
            .collect();

        let info = parse::video_info(&self.filename);
        DebridItem {
            source: DebridProvider::AllDebrid,
            id: self.id.to_string(),
            name: self.filename,
            kind: ItemKind::Torrent,
            videos,
            size: self.size,
            info,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SavedLinksData {
    #[serde(default)]
    links: Vec<SavedLinkRaw>,
}

#[derive(Debug, Deserialize)]
struct SavedLinkRaw {
    link: String,
    filename: String,
    #[serde(default)]
    size: Option<u64>,
}

impl SavedLinkRaw {
    fn into_candidate(self) -> Candidate {
        let info = parse::video_info(&self.filename);
        Candidate {
            id: self.link.clone(),
            name: self.filename,
            kind: ItemKind::Direct,
            url: Some(self.link),
            size: self.size,
            info,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UnlockData {
    link: String,
}
