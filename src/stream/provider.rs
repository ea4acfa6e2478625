//! Provider dispatcher
//!
//! The entry points of the crate: given a request config and a content id,
//! fetch canonical metadata, search the configured debrid provider, filter,
//! and normalize into stream descriptors. Per-candidate detail fetches are
//! issued concurrently; a failed fetch is logged and contributes nothing,
//! it never fails the request or its siblings.

use anyhow::Result;
use futures::future::join_all;
use thiserror::Error;

use crate::api::{
    AllDebridClient, CinemetaClient, DebridLinkClient, PremiumizeClient, RealDebridClient,
    TorBoxClient,
};
use crate::config::Config;
use crate::models::{
    Candidate, DebridItem, DebridProvider, ItemKind, MediaType, Stream, Video,
};
use crate::stream::filters::{
    filter_download_episode, filter_episode, filter_season, filter_year,
};
use crate::stream::normalize::{to_stream, to_stream_opt};

/// Name-similarity threshold handed to every provider search
const SEARCH_THRESHOLD: f64 = 0.1;

/// Fallback when `ADDON_URL` is not set
const DEFAULT_ADDON_URL: &str = "http://localhost:7000";

/// Request-level dispatch failures
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("No usable debrid provider configured")]
    BadRequest,

    #[error("Invalid content id: {0}")]
    InvalidId(String),
}

/// Aggregates streams across the configured debrid provider.
///
/// Fields are public so callers (and tests) can swap in clients pointing at
/// custom base URLs.
pub struct StreamProvider {
    pub cinemeta: CinemetaClient,
    pub debrid_link: DebridLinkClient,
    pub real_debrid: RealDebridClient,
    pub all_debrid: AllDebridClient,
    pub premiumize: PremiumizeClient,
    pub torbox: TorBoxClient,
    /// Public base URL of this addon, used for deferred-resolution links
    pub addon_url: String,
}

impl StreamProvider {
    /// Create a provider against the live service endpoints; the addon URL
    /// comes from the `ADDON_URL` environment variable when set
    pub fn new() -> Self {
        Self {
            cinemeta: CinemetaClient::new(),
            debrid_link: DebridLinkClient::new(),
            real_debrid: RealDebridClient::new(),
            all_debrid: AllDebridClient::new(),
            premiumize: PremiumizeClient::new(),
            torbox: TorBoxClient::new(),
            addon_url: std::env::var("ADDON_URL")
                .unwrap_or_else(|_| DEFAULT_ADDON_URL.to_string()),
        }
    }

    /// Streams for a movie id
    pub async fn movie_streams(&self, config: &Config, id: &str) -> Result<Vec<Stream>> {
        let provider = config.route().ok_or(ProviderError::BadRequest)?;
        let api_key = config.credential().ok_or(ProviderError::BadRequest)?;

        let meta = self.cinemeta.get_meta(MediaType::Movie, id).await?;
        let search_key = meta.name.clone();
        let media = MediaType::Movie;

        match provider {
            DebridProvider::DebridLink => {
                let torrents = self
                    .debrid_link
                    .search_torrents(api_key, &search_key, SEARCH_THRESHOLD)
                    .await?;
                let ids: Vec<String> = torrents
                    .into_iter()
                    .filter(|t| filter_year(&t.info, &meta))
                    .map(|t| t.id)
                    .collect();
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                let details = self
                    .debrid_link
                    .torrent_details(api_key, &ids.join(","))
                    .await?;
                Ok(details
                    .iter()
                    .filter_map(|item| to_stream(item, media))
                    .collect())
            }
            DebridProvider::RealDebrid => {
                let torrents = self
                    .real_debrid
                    .search_torrents(api_key, &search_key, SEARCH_THRESHOLD)
                    .await?;
                let fetches = torrents
                    .into_iter()
                    .filter(|t| filter_year(&t.info, &meta))
                    .map(|torrent| async move {
                        match self.real_debrid.torrent_details(api_key, &torrent.id).await {
                            Ok(item) => to_stream(&item, media),
                            Err(err) => {
                                log::warn!(
                                    "Real-Debrid torrent {} lookup failed: {:#}",
                                    torrent.id,
                                    err
                                );
                                None
                            }
                        }
                    });
                let mut streams: Vec<Stream> =
                    join_all(fetches).await.into_iter().flatten().collect();

                let downloads = self
                    .real_debrid
                    .search_downloads(api_key, &search_key, SEARCH_THRESHOLD)
                    .await?;
                streams.extend(
                    downloads
                        .into_iter()
                        .filter(|d| filter_year(&d.info, &meta))
                        .filter_map(|d| to_stream(&d, media)),
                );
                Ok(streams)
            }
            DebridProvider::AllDebrid => {
                let items = self
                    .all_debrid
                    .search_torrents(api_key, &search_key, SEARCH_THRESHOLD)
                    .await?;
                let fetches = items
                    .into_iter()
                    .filter(|i| filter_year(&i.info, &meta))
                    .map(|candidate| async move {
                        match candidate.kind {
                            ItemKind::Direct => {
                                to_stream(&self.direct_item(api_key, &candidate), media)
                            }
                            _ => match self
                                .all_debrid
                                .torrent_details(api_key, &candidate.id)
                                .await
                            {
                                Ok(item) => to_stream_opt(item.as_ref(), media),
                                Err(err) => {
                                    log::warn!(
                                        "AllDebrid magnet {} lookup failed: {:#}",
                                        candidate.id,
                                        err
                                    );
                                    None
                                }
                            },
                        }
                    });
                Ok(join_all(fetches).await.into_iter().flatten().collect())
            }
            DebridProvider::Premiumize => {
                let files = self
                    .premiumize
                    .search_files(api_key, &search_key, SEARCH_THRESHOLD)
                    .await?;
                let fetches = files
                    .into_iter()
                    .filter(|f| filter_year(&f.info, &meta))
                    .map(|file| async move {
                        match self.premiumize.torrent_details(api_key, &file.id).await {
                            Ok(item) => to_stream(&item, media),
                            Err(err) => {
                                log::warn!(
                                    "Premiumize item {} lookup failed: {:#}",
                                    file.id,
                                    err
                                );
                                None
                            }
                        }
                    });
                Ok(join_all(fetches).await.into_iter().flatten().collect())
            }
            DebridProvider::TorBox => {
                let torrents = self
                    .torbox
                    .search_torrents(api_key, &search_key, SEARCH_THRESHOLD)
                    .await?;
                Ok(torrents
                    .into_iter()
                    .filter(|t| filter_year(&t.info, &meta))
                    .filter_map(|t| to_stream(&t, media))
                    .collect())
            }
        }
    }

    /// Streams for a series id of the form `imdbId:season:episode`
    pub async fn series_streams(&self, config: &Config, id: &str) -> Result<Vec<Stream>> {
        let provider = config.route().ok_or(ProviderError::BadRequest)?;
        let api_key = config.credential().ok_or(ProviderError::BadRequest)?;
        let (imdb_id, season, episode) = split_series_id(id)?;

        let meta = self.cinemeta.get_meta(MediaType::Series, &imdb_id).await?;
        let search_key = meta.name.clone();
        let media = MediaType::Series;

        match provider {
            DebridProvider::DebridLink => {
                let torrents = self
                    .debrid_link
                    .search_torrents(api_key, &search_key, SEARCH_THRESHOLD)
                    .await?;
                let ids: Vec<String> = torrents
                    .into_iter()
                    .filter(|t| filter_season(&t.info, season))
                    .map(|t| t.id)
                    .collect();
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                let details = self
                    .debrid_link
                    .torrent_details(api_key, &ids.join(","))
                    .await?;
                Ok(details
                    .into_iter()
                    .filter_map(|item| filter_episode(item, season, episode))
                    .filter_map(|item| to_stream(&item, media))
                    .collect())
            }
            DebridProvider::RealDebrid => {
                let torrents = self
                    .real_debrid
                    .search_torrents(api_key, &search_key, SEARCH_THRESHOLD)
                    .await?;
                let fetches = torrents
                    .into_iter()
                    .filter(|t| filter_season(&t.info, season))
                    .map(|torrent| async move {
                        match self.real_debrid.torrent_details(api_key, &torrent.id).await {
                            Ok(item) => filter_episode(item, season, episode)
                                .and_then(|item| to_stream(&item, media)),
                            Err(err) => {
                                log::warn!(
                                    "Real-Debrid torrent {} lookup failed: {:#}",
                                    torrent.id,
                                    err
                                );
                                None
                            }
                        }
                    });
                let mut streams: Vec<Stream> =
                    join_all(fetches).await.into_iter().flatten().collect();

                let downloads = self
                    .real_debrid
                    .search_downloads(api_key, &search_key, SEARCH_THRESHOLD)
                    .await?;
                streams.extend(
                    downloads
                        .into_iter()
                        .filter(|d| filter_download_episode(&d.info, season, episode))
                        .filter_map(|d| to_stream(&d, media)),
                );
                Ok(streams)
            }
            DebridProvider::AllDebrid => {
                let items = self
                    .all_debrid
                    .search_torrents(api_key, &search_key, SEARCH_THRESHOLD)
                    .await?;
                let fetches = items
                    .into_iter()
                    .filter(|i| filter_season(&i.info, season))
                    .map(|candidate| async move {
                        match candidate.kind {
                            ItemKind::Direct => {
                                if filter_download_episode(&candidate.info, season, episode) {
                                    to_stream(&self.direct_item(api_key, &candidate), media)
                                } else {
                                    None
                                }
                            }
                            _ => match self
                                .all_debrid
                                .torrent_details(api_key, &candidate.id)
                                .await
                            {
                                Ok(Some(item)) => filter_episode(item, season, episode)
                                    .and_then(|item| to_stream(&item, media)),
                                Ok(None) => to_stream_opt(None, media),
                                Err(err) => {
                                    log::warn!(
                                        "AllDebrid magnet {} lookup failed: {:#}",
                                        candidate.id,
                                        err
                                    );
                                    None
                                }
                            },
                        }
                    });
                Ok(join_all(fetches).await.into_iter().flatten().collect())
            }
            DebridProvider::Premiumize => {
                let files = self
                    .premiumize
                    .search_files(api_key, &search_key, SEARCH_THRESHOLD)
                    .await?;
                let fetches = files
                    .into_iter()
                    .filter(|f| filter_season(&f.info, season))
                    .map(|file| async move {
                        match self.premiumize.torrent_details(api_key, &file.id).await {
                            Ok(item) => filter_episode(item, season, episode)
                                .and_then(|item| to_stream(&item, media)),
                            Err(err) => {
                                log::warn!(
                                    "Premiumize item {} lookup failed: {:#}",
                                    file.id,
                                    err
                                );
                                None
                            }
                        }
                    });
                Ok(join_all(fetches).await.into_iter().flatten().collect())
            }
            DebridProvider::TorBox => {
                let torrents = self
                    .torbox
                    .search_torrents(api_key, &search_key, SEARCH_THRESHOLD)
                    .await?;
                Ok(torrents
                    .into_iter()
                    .filter_map(|item| filter_episode(item, season, episode))
                    .filter_map(|item| to_stream(&item, media))
                    .collect())
            }
        }
    }

    /// Resolve a host URL into a playable direct URL at playback time.
    ///
    /// `provider` arrives as the URL path segment, so it is parsed here;
    /// anything outside the closed set is a bad request.
    pub async fn resolve_url(
        &self,
        provider: &str,
        api_key: &str,
        item_id: &str,
        host_url: &str,
        client_ip: Option<&str>,
    ) -> Result<String> {
        let provider = DebridProvider::from_name(provider).ok_or(ProviderError::BadRequest)?;
        match provider {
            // Links from these providers are already final
            DebridProvider::DebridLink | DebridProvider::Premiumize => Ok(host_url.to_string()),
            DebridProvider::RealDebrid => {
                self.real_debrid
                    .unrestrict_url(api_key, host_url, client_ip)
                    .await
            }
            DebridProvider::AllDebrid => self.all_debrid.unrestrict_url(api_key, host_url).await,
            DebridProvider::TorBox => {
                self.torbox
                    .unrestrict_url(api_key, item_id, host_url, client_ip)
                    .await
            }
        }
    }

    /// Wrap an AllDebrid saved link into a single-video item whose URL goes
    /// through this addon's resolve endpoint, deferring the unlock to
    /// playback time
    fn direct_item(&self, api_key: &str, candidate: &Candidate) -> DebridItem {
        let host_url = candidate.url.clone().unwrap_or_default();
        let play_url = format!(
            "{}/resolve/AllDebrid/{}/{}/{}",
            self.addon_url,
            api_key,
            urlencoding::encode(&candidate.id),
            urlencoding::encode(&host_url)
        );

        DebridItem {
            source: DebridProvider::AllDebrid,
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            kind: ItemKind::Direct,
            videos: vec![Video {
                url: play_url,
                name: candidate.name.clone(),
                size: candidate.size,
                info: candidate.info.clone(),
            }],
            size: candidate.size,
            info: candidate.info.clone(),
        }
    }
}

impl Default for StreamProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `imdbId:season:episode` into its parts
fn split_series_id(id: &str) -> Result<(String, u32, u32), ProviderError> {
    let mut parts = id.split(':');
    let imdb_id = parts.next().filter(|s| !s.is_empty());
    let season = parts.next().and_then(|s| s.parse().ok());
    let episode = parts.next().and_then(|s| s.parse().ok());

    match (imdb_id, season, episode) {
        (Some(imdb_id), Some(season), Some(episode)) => {
            Ok((imdb_id.to_string(), season, episode))
        }
        _ => Err(ProviderError::InvalidId(id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_series_id() {
        assert_eq!(
            split_series_id("tt000:2:5").unwrap(),
            ("tt000".to_string(), 2, 5)
        );
        assert_eq!(
            split_series_id("tt0903747:1:13").unwrap(),
            ("tt0903747".to_string(), 1, 13)
        );
    }

    #[test]
    fn test_split_series_id_rejects_malformed() {
        assert!(split_series_id("tt000").is_err());
        assert!(split_series_id("tt000:2").is_err());
        assert!(split_series_id("tt000:two:five").is_err());
        assert!(split_series_id(":2:5").is_err());
        assert!(split_series_id("").is_err());
    }
}
