//! Filter predicates for provider results
//!
//! All predicates are default-permissive: missing data never excludes a
//! result, only a positive mismatch does.

use crate::models::{DebridItem, MetaDetails, VideoInfo};

/// True unless both sides carry a year and the years differ
pub fn filter_year(info: &VideoInfo, meta: &MetaDetails) -> bool {
    match (info.year, meta.year) {
        (Some(candidate), Some(canonical)) => candidate == canonical,
        _ => true,
    }
}

/// True when the item covers the requested season, either as a single-season
/// release or as part of a multi-season pack
pub fn filter_season(info: &VideoInfo, season: u32) -> bool {
    info.season == Some(season) || info.seasons.contains(&season)
}

/// Keep only the videos matching the requested episode.
///
/// Returns the item with its video list pruned, or `None` when no video
/// survives (an item without matching videos yields no stream).
pub fn filter_episode(mut item: DebridItem, season: u32, episode: u32) -> Option<DebridItem> {
    item.videos
        .retain(|v| v.info.season == Some(season) && v.info.episode == Some(episode));
    if item.videos.is_empty() {
        None
    } else {
        Some(item)
    }
}

/// Episode match for a flat download record (no video list to prune)
pub fn filter_download_episode(info: &VideoInfo, season: u32, episode: u32) -> bool {
    info.season == Some(season) && info.episode == Some(episode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DebridProvider, ItemKind, Video};

    fn meta(year: Option<u16>) -> MetaDetails {
        MetaDetails {
            name: "Some Title".to_string(),
            year,
        }
    }

    fn info(year: Option<u16>) -> VideoInfo {
        VideoInfo {
            year,
            ..VideoInfo::default()
        }
    }

    fn episode_video(season: u32, episode: u32) -> Video {
        Video {
            url: "https://example.com/file".to_string(),
            name: format!("show.s{:02}e{:02}.mkv", season, episode),
            size: Some(1_000),
            info: VideoInfo {
                season: Some(season),
                episode: Some(episode),
                ..VideoInfo::default()
            },
        }
    }

    fn item_with_videos(videos: Vec<Video>) -> DebridItem {
        DebridItem {
            source: DebridProvider::RealDebrid,
            id: "abc".to_string(),
            name: "show".to_string(),
            kind: ItemKind::Torrent,
            videos,
            size: None,
            info: VideoInfo::default(),
        }
    }

    #[test]
    fn test_filter_year_permissive_on_missing_data() {
        assert!(filter_year(&info(None), &meta(Some(2022))));
        assert!(filter_year(&info(Some(2022)), &meta(None)));
        assert!(filter_year(&info(None), &meta(None)));
    }

    #[test]
    fn test_filter_year_strict_when_both_present() {
        assert!(filter_year(&info(Some(2022)), &meta(Some(2022))));
        assert!(!filter_year(&info(Some(2021)), &meta(Some(2022))));
    }

    #[test]
    fn test_filter_season_single_and_pack() {
        let single = VideoInfo {
            season: Some(2),
            ..VideoInfo::default()
        };
        assert!(filter_season(&single, 2));
        assert!(!filter_season(&single, 3));

        let pack = VideoInfo {
            seasons: vec![1, 2, 3],
            ..VideoInfo::default()
        };
        assert!(filter_season(&pack, 2));
        assert!(!filter_season(&pack, 4));

        assert!(!filter_season(&VideoInfo::default(), 1));
    }

    #[test]
    fn test_filter_episode_prunes_videos() {
        let item = item_with_videos(vec![
            episode_video(2, 4),
            episode_video(2, 5),
            episode_video(3, 5),
        ]);

        let filtered = filter_episode(item, 2, 5).expect("episode present");
        assert_eq!(filtered.videos.len(), 1);
        assert_eq!(filtered.videos[0].info.episode, Some(5));
        assert_eq!(filtered.videos[0].info.season, Some(2));
    }

    #[test]
    fn test_filter_episode_empty_when_no_match() {
        let item = item_with_videos(vec![episode_video(1, 1)]);
        assert!(filter_episode(item, 2, 5).is_none());

        let empty = item_with_videos(Vec::new());
        assert!(filter_episode(empty, 1, 1).is_none());
    }

    #[test]
    fn test_filter_download_episode_exact_match_only() {
        let info = VideoInfo {
            season: Some(2),
            episode: Some(5),
            ..VideoInfo::default()
        };
        assert!(filter_download_episode(&info, 2, 5));
        assert!(!filter_download_episode(&info, 2, 6));
        assert!(!filter_download_episode(&VideoInfo::default(), 2, 5));
    }
}
