//! TorBox Client Tests
//!
//! Tests the single-round-trip search and the deferred download-link
//! request.

use debrid_search::api::torbox::TorBoxClient;
use mockito::{Matcher, Server};

/// Test: Search returns fully-detailed items with synthetic file URLs
#[tokio::test]
async fn test_search_returns_detailed_items() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/v1/api/torrents/mylist")
        .match_query(Matcher::UrlEncoded("bypass_cache".into(), "true".into()))
        .match_header("authorization", "Bearer tb-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
            "success": true,
            "data": [
                {
                    "id": 7,
                    "name": "Severance.S02.2160p.WEB-DL",
                    "size": 40000000000,
                    "download_finished": true,
                    "files": [
                        {"id": 1, "name": "Severance.S02E01.2160p.mkv", "size": 4000000000},
                        {"id": 2, "name": "Severance.S02E02.2160p.mkv", "size": 4100000000},
                        {"id": 3, "name": "readme.txt", "size": 500}
                    ]
                },
                {
                    "id": 8,
                    "name": "Severance.S01.1080p.WEB-DL",
                    "size": 20000000000,
                    "download_finished": false,
                    "files": []
                }
            ]
        }"#,
        )
        .create_async()
        .await;

    let client = TorBoxClient::with_base_url(server.url());
    let items = client
        .search_torrents("tb-key", "Severance", 0.2)
        .await
        .unwrap();

    mock.assert_async().await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "7");
    assert_eq!(items[0].videos.len(), 2);
    assert!(items[0].videos[0]
        .url
        .ends_with("/v1/api/torrents/7/files/1"));
    assert_eq!(items[0].videos[1].info.episode, Some(2));
}

/// Test: Unrestrict recovers the file id from the host URL and requests a
/// download link
#[tokio::test]
async fn test_unrestrict_url() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/v1/api/torrents/requestdl")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("token".into(), "tb-key".into()),
            Matcher::UrlEncoded("torrent_id".into(), "7".into()),
            Matcher::UrlEncoded("file_id".into(), "2".into()),
            Matcher::UrlEncoded("user_ip".into(), "203.0.113.9".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true, "data": "https://store.torbox.app/direct/2.mkv"}"#)
        .create_async()
        .await;

    let client = TorBoxClient::with_base_url(server.url());
    let host_url = format!("{}/v1/api/torrents/7/files/2", server.url());
    let url = client
        .unrestrict_url("tb-key", "7", &host_url, Some("203.0.113.9"))
        .await
        .unwrap();

    mock.assert_async().await;

    assert_eq!(url, "https://store.torbox.app/direct/2.mkv");
}

/// Test: An unsuccessful body is an error even on HTTP 200
#[tokio::test]
async fn test_unsuccessful_list() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/v1/api/torrents/mylist")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": false, "data": []}"#)
        .create_async()
        .await;

    let client = TorBoxClient::with_base_url(server.url());
    let result = client.search_torrents("tb-key", "Anything", 0.1).await;

    mock.assert_async().await;

    assert!(result.is_err());
}
