//! Release-name parsing and query matching
//!
//! Debrid providers return bare filenames; everything this crate knows about
//! seasons, episodes, resolutions and years is scraped out of those names
//! here, once, at ingestion. Search endpoints also need a tolerant way to
//! match stored names against a canonical title, provided by a bigram
//! similarity score.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::models::VideoInfo;

static SEASON_EPISODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bs(\d{1,2})[ ._-]?e(\d{1,3})\b").expect("valid regex"));

static ALT_EPISODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})x(\d{2,3})\b").expect("valid regex"));

static SEASON_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bs(\d{1,2})\s*-\s*s?(\d{1,2})\b").expect("valid regex"));

static SEASON_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:s|season[ ._-]?)(\d{1,2})\b").expect("valid regex"));

static RESOLUTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(2160p|1080p|720p|480p|4k)\b").expect("valid regex"));

static YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").expect("valid regex"));

/// Extensions accepted as playable video files
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "mov", "wmv", "ts", "webm", "flv", "mpg", "mpeg",
];

/// Extract season/episode/resolution/year details from a release name.
///
/// Multi-season packs ("S01-S03") populate `seasons`; a single-season pack
/// populates both `season` and `seasons` so season filtering works either
/// way. Numbers always land as integers.
pub fn video_info(name: &str) -> VideoInfo {
    let mut info = VideoInfo::default();

    if let Some(caps) = SEASON_EPISODE
        .captures(name)
        .or_else(|| ALT_EPISODE.captures(name))
    {
        info.season = caps.get(1).and_then(|m| m.as_str().parse().ok());
        info.episode = caps.get(2).and_then(|m| m.as_str().parse().ok());
    } else if let Some(caps) = SEASON_RANGE.captures(name) {
        let start: Option<u32> = caps.get(1).and_then(|m| m.as_str().parse().ok());
        let end: Option<u32> = caps.get(2).and_then(|m| m.as_str().parse().ok());
        if let (Some(start), Some(end)) = (start, end) {
            if start <= end {
                info.seasons = (start..=end).collect();
            }
        }
    } else if let Some(caps) = SEASON_ONLY.captures(name) {
        if let Some(season) = caps.get(1).and_then(|m| m.as_str().parse().ok()) {
            info.season = Some(season);
            info.seasons = vec![season];
        }
    }

    info.resolution = RESOLUTION.find(name).map(|m| {
        let res = m.as_str().to_lowercase();
        if res == "4k" {
            "2160p".to_string()
        } else {
            res
        }
    });

    info.year = YEAR
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok());

    info
}

/// True when the filename's extension is a known video format
pub fn is_video(name: &str) -> bool {
    name.rsplit('.')
        .next()
        .map(|ext| {
            let ext = ext.to_lowercase();
            VIDEO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// True when `name` scores at or above `threshold` against `query`
pub fn matches_query(name: &str, query: &str, threshold: f64) -> bool {
    dice_coefficient(&normalize(name), &normalize(query)) >= threshold
}

/// Sørensen–Dice bigram coefficient in `[0, 1]`
pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    let a: String = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: String = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 1.0;
    }
    if a.chars().count() < 2 || b.chars().count() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in pairs(&a) {
        *bigrams.entry(pair).or_insert(0) += 1;
    }

    let mut matches = 0usize;
    for pair in pairs(&b) {
        if let Some(count) = bigrams.get_mut(&pair) {
            if *count > 0 {
                *count -= 1;
                matches += 1;
            }
        }
    }

    let total = a.chars().count() + b.chars().count() - 2;
    (2.0 * matches as f64) / total as f64
}

fn pairs(s: &str) -> impl Iterator<Item = (char, char)> + '_ {
    let chars: Vec<char> = s.chars().collect();
    (0..chars.len().saturating_sub(1))
        .map(move |i| (chars[i], chars[i + 1]))
        .collect::<Vec<_>>()
        .into_iter()
}

/// Lowercase and fold release-name separators into spaces
fn normalize(s: &str) -> String {
    let folded: String = s
        .to_lowercase()
        .chars()
        .map(|c| if matches!(c, '.' | '_' | '-' | '[' | ']') { ' ' } else { c })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
