//! debrid-search - stream aggregation across debrid services
//!
//! Given a movie or episode id and a user's provider configuration, this
//! crate fetches canonical metadata, searches the configured debrid service
//! (DebridLink, Real-Debrid, AllDebrid, Premiumize, or TorBox), filters the
//! results by year/season/episode, and normalizes everything into the stream
//! descriptors a Stremio-style addon serves.
//!
//! # Modules
//!
//! - `models` - Shared data model (providers, items, videos, streams)
//! - `config` - Per-request addon configuration
//! - `parse` - Release-name parsing and query matching
//! - `api` - HTTP clients (Cinemeta + the five debrid providers)
//! - `stream` - Filters, normalization, and the provider dispatcher

pub mod api;
pub mod config;
pub mod models;
pub mod parse;
pub mod stream;

// Re-export commonly used types
pub use config::Config;
pub use models::{
    BehaviorHints, Candidate, DebridItem, DebridProvider, ItemKind, MediaType, MetaDetails,
    Stream, Video, VideoInfo,
};
pub use stream::{ProviderError, StreamProvider};
