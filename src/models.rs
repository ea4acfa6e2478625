//! Data structures and types for debrid-search
//!
//! Contains the shared models used across the crate organized by domain:
//! - **Providers**: the closed set of supported debrid services
//! - **Metadata**: canonical title/year details from Cinemeta
//! - **Items**: search candidates and normalized debrid items with videos
//! - **Streams**: the descriptors handed back to the addon framework

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Provider Models
// =============================================================================

/// The debrid services a request can be dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebridProvider {
    DebridLink,
    RealDebrid,
    AllDebrid,
    Premiumize,
    TorBox,
}

impl DebridProvider {
    /// Parse a provider from its addon-config / URL-path spelling.
    ///
    /// Returns `None` for anything outside the closed set; callers surface
    /// that as a bad request.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "DebridLink" => Some(DebridProvider::DebridLink),
            "RealDebrid" => Some(DebridProvider::RealDebrid),
            "AllDebrid" => Some(DebridProvider::AllDebrid),
            "Premiumize" => Some(DebridProvider::Premiumize),
            "TorBox" => Some(DebridProvider::TorBox),
            _ => None,
        }
    }

    /// Lowercase source tag used in binge-group keys
    pub fn tag(&self) -> &'static str {
        match self {
            DebridProvider::DebridLink => "debridlink",
            DebridProvider::RealDebrid => "realdebrid",
            DebridProvider::AllDebrid => "alldebrid",
            DebridProvider::Premiumize => "premiumize",
            DebridProvider::TorBox => "torbox",
        }
    }

    /// Display tag shown as the first line of a stream's name
    pub fn display_name(&self) -> &'static str {
        match self {
            DebridProvider::DebridLink => "[DL+] DebridSearch",
            DebridProvider::RealDebrid => "[RD+] DebridSearch",
            DebridProvider::AllDebrid => "[AD+] DebridSearch",
            DebridProvider::Premiumize => "[PM+] DebridSearch",
            DebridProvider::TorBox => "[TB+] DebridSearch",
        }
    }
}

impl fmt::Display for DebridProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebridProvider::DebridLink => write!(f, "DebridLink"),
            DebridProvider::RealDebrid => write!(f, "RealDebrid"),
            DebridProvider::AllDebrid => write!(f, "AllDebrid"),
            DebridProvider::Premiumize => write!(f, "Premiumize"),
            DebridProvider::TorBox => write!(f, "TorBox"),
        }
    }
}

/// Content type discriminator, matching the addon protocol's path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Series => write!(f, "series"),
        }
    }
}

// =============================================================================
// Metadata Models (Cinemeta)
// =============================================================================

/// Canonical title details for a content id, fetched fresh per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaDetails {
    pub name: String,
    pub year: Option<u16>,
}

impl fmt::Display for MetaDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{} ({})", self.name, year),
            None => write!(f, "{}", self.name),
        }
    }
}

// =============================================================================
// Item Models (provider results)
// =============================================================================

/// What a filename tells us about the content it holds.
///
/// Season/episode numbers are normalized to integers at ingestion so the
/// filter predicates never compare mixed string/number values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub season: Option<u32>,
    pub episode: Option<u32>,
    /// Seasons covered by a multi-season pack
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seasons: Vec<u32>,
    pub year: Option<u16>,
    pub resolution: Option<String>,
}

/// How an item reached the provider's cloud, which decides how it is
/// normalized into a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Torrent/magnet with a list of contained video files
    Torrent,
    /// Finished cloud download, one flat file
    Download,
    /// Saved host link resolved lazily at playback time
    Direct,
}

/// Provider search result, cheap enough to filter before the per-item
/// detail fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    /// Host URL, present on direct items only
    pub url: Option<String>,
    pub size: Option<u64>,
    pub info: VideoInfo,
}

/// A single playable file inside a debrid item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub url: String,
    pub name: String,
    pub size: Option<u64>,
    pub info: VideoInfo,
}

/// Fully-detailed provider result, normalized at the client boundary so the
/// filters and the stream normalizer see one shape for every provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebridItem {
    pub source: DebridProvider,
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    /// Order is not significant on input; the normalizer picks by size
    pub videos: Vec<Video>,
    pub size: Option<u64>,
    pub info: VideoInfo,
}

// =============================================================================
// Stream Models (addon output)
// =============================================================================

/// Stream descriptor in the shape the addon framework serializes to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    /// Provider display tag + resolution
    pub name: String,
    /// Content name, optional episode file name, size line
    pub title: String,
    pub url: String,
    #[serde(rename = "behaviorHints")]
    pub behavior_hints: BehaviorHints,
}

/// Client-side hints attached to every stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorHints {
    /// `source|id`, stable per item so "next episode" continuity groups
    /// streams from the same torrent/download
    #[serde(rename = "bingeGroup")]
    pub binge_group: String,
}
