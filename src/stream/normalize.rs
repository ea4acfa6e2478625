//! Stream normalization
//!
//! Converts a detailed debrid item into the uniform stream descriptor the
//! addon framework expects. Normalization fails soft: items without a
//! playable video produce no stream instead of an error.

use crate::models::{BehaviorHints, DebridItem, ItemKind, MediaType, Stream, Video};

const DOWNLOAD_ICON: &str = "⬇️";
const TORRENT_ICON: &str = "💾";

/// Units for human-readable sizes; the index is the 1024-exponent
const SIZE_UNITS: &[&str] = &["B", "kB", "MB", "GB", "TB"];

/// Build a stream descriptor from a detailed item.
///
/// Torrent items use their largest video (ties keep the original order);
/// direct/download items are a single flat file. Returns `None` when there
/// is nothing playable.
pub fn to_stream(item: &DebridItem, media: MediaType) -> Option<Stream> {
    let (icon, video) = match item.kind {
        ItemKind::Direct | ItemKind::Download => (DOWNLOAD_ICON, item.videos.first()?),
        ItemKind::Torrent => (TORRENT_ICON, largest_video(&item.videos)?),
    };

    let mut title = item.name.clone();
    if media == MediaType::Series {
        title.push('\n');
        title.push_str(if video.name.is_empty() {
            "Unknown"
        } else {
            &video.name
        });
    }
    title.push('\n');
    title.push_str(icon);
    title.push(' ');
    title.push_str(&format_size(video.size.unwrap_or(0)));

    let resolution = video
        .info
        .resolution
        .as_deref()
        .or(item.info.resolution.as_deref())
        .unwrap_or("Unknown");
    let name = format!("{}\n{}", item.source.display_name(), resolution);

    Some(Stream {
        name,
        title,
        url: video.url.clone(),
        behavior_hints: BehaviorHints {
            binge_group: format!("{}|{}", item.source.tag(), item.id),
        },
    })
}

/// Soft-fail wrapper for lookups that may come back empty.
///
/// A missing item is logged and skipped, never an error.
pub fn to_stream_opt(item: Option<&DebridItem>, media: MediaType) -> Option<Stream> {
    match item {
        Some(item) => to_stream(item, media),
        None => {
            log::debug!("skipping result with no usable data");
            None
        }
    }
}

/// Largest video by size; ties keep the earliest entry
fn largest_video(videos: &[Video]) -> Option<&Video> {
    let mut best: Option<&Video> = None;
    for video in videos {
        match best {
            Some(current) if video.size.unwrap_or(0) <= current.size.unwrap_or(0) => {}
            _ => best = Some(video),
        }
    }
    best
}

/// Render a byte count as "<value> <unit>" with up to two decimals
pub fn format_size(size: u64) -> String {
    if size == 0 {
        return "Unknown".to_string();
    }
    let exponent = ((size as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(SIZE_UNITS.len() - 1);
    let value = (size as f64 / 1024f64.powi(exponent as i32) * 100.0).round() / 100.0;
    format!("{} {}", value, SIZE_UNITS[exponent])
}
