//! Cinemeta metadata client
//!
//! Fetches canonical title/year details for an IMDB id from the public
//! Cinemeta addon. The dispatcher uses the returned name as the provider
//! search key, so a failure here fails the whole request.

use anyhow::Result;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{MediaType, MetaDetails};

/// Cinemeta API error types
#[derive(Error, Debug)]
pub enum CinemetaError {
    #[error("No metadata for this id (404)")]
    NotFound,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// Cinemeta addon client
pub struct CinemetaClient {
    base_url: String,
    client: reqwest::Client,
}

impl CinemetaClient {
    /// Create a new client against the public Cinemeta instance
    pub fn new() -> Self {
        Self::with_base_url("https://v3-cinemeta.strem.io")
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

    /// Get canonical name/year for a content id
    pub async fn get_meta(&self, media: MediaType, id: &str) -> Result<MetaDetails> {
        let url = format!("{}/meta/{}/{}.json", self.base_url, media, id);

        let response = self.client.get(&url).send().await.map_err(CinemetaError::from)?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await.map_err(CinemetaError::from)?;
                let parsed: MetaResponse = serde_json::from_str(&body).map_err(|e| {
                    CinemetaError::InvalidResponse(format!("JSON parse error: {}", e))
                })?;
                Ok(parsed.meta.into_details())
            }
            StatusCode::NOT_FOUND => Err(CinemetaError::NotFound.into()),
            status => Err(CinemetaError::ServerError(status.as_u16()).into()),
        }
    }
}

impl Default for CinemetaClient {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct MetaResponse {
    meta: MetaRaw,
}

#[derive(Debug, Deserialize)]
struct MetaRaw {
    name: String,
    // Cinemeta emits the year as a number, a plain string, or a range like
    // "2008-2013" for series
    year: Option<YearField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum YearField {
    Number(u16),
    Text(String),
}

impl MetaRaw {
    fn into_details(self) -> MetaDetails {
        let year = self.year.and_then(|y| match y {
            YearField::Number(n) => Some(n),
            YearField::Text(s) => extract_year(&s),
        });
        MetaDetails {
            name: self.name,
            year,
        }
    }
}

/// Extract the leading year from a string like "2008" or "2008-2013"
fn extract_year(s: &str) -> Option<u16> {
    if s.len() >= 4 {
        s[..4].parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("2008"), Some(2008));
        assert_eq!(extract_year("2008-2013"), Some(2008));
        assert_eq!(extract_year(""), None);
        assert_eq!(extract_year("n/a"), None);
    }

    #[test]
    fn test_year_field_variants() {
        let numeric: MetaResponse =
            serde_json::from_str(r#"{"meta": {"name": "The Batman", "year": 2022}}"#).unwrap();
        assert_eq!(numeric.meta.into_details().year, Some(2022));

        let range: MetaResponse =
            serde_json::from_str(r#"{"meta": {"name": "Breaking Bad", "year": "2008-2013"}}"#)
                .unwrap();
        assert_eq!(range.meta.into_details().year, Some(2008));

        let missing: MetaResponse =
            serde_json::from_str(r#"{"meta": {"name": "Obscure Short"}}"#).unwrap();
        assert_eq!(missing.meta.into_details().year, None);
    }
}
