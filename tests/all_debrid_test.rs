//! AllDebrid Client Tests
//!
//! Tests the merged magnet/saved-link search, single-magnet details, and
//! link unlocking.

use debrid_search::api::all_debrid::AllDebridClient;
use debrid_search::models::ItemKind;
use mockito::{Matcher, Server};

const MAGNETS_BODY: &str = r#"{
    "status": "success",
    "data": {
        "magnets": [
            {
                "id": 101,
                "filename": "Dune.Part.Two.2024.2160p.WEB-DL",
                "size": 12000000000,
                "statusCode": 4,
                "links": [
                    {"link": "https://alldebrid.com/f/AAA", "filename": "Dune.Part.Two.2024.2160p.mkv", "size": 11900000000}
                ]
            },
            {
                "id": 102,
                "filename": "Dune.Part.Two.2024.1080p.WEB-DL",
                "size": 6000000000,
                "statusCode": 1,
                "links": []
            }
        ]
    }
}"#;

const LINKS_BODY: &str = r#"{
    "status": "success",
    "data": {
        "links": [
            {"link": "https://uptobox.com/xyz", "filename": "Dune.Part.Two.2024.720p.mkv", "size": 3000000000}
        ]
    }
}"#;

/// Test: Search merges ready magnets with saved links as direct candidates
#[tokio::test]
async fn test_search_merges_magnets_and_saved_links() {
    let mut server = Server::new_async().await;

    let magnets = server
        .mock("GET", "/magnet/status")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("agent".into(), "debrid-search".into()),
            Matcher::UrlEncoded("apikey".into(), "ad-key".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(MAGNETS_BODY)
        .create_async()
        .await;

    let links = server
        .mock("GET", "/user/links")
        .match_query(Matcher::UrlEncoded("apikey".into(), "ad-key".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(LINKS_BODY)
        .create_async()
        .await;

    let client = AllDebridClient::with_base_url(server.url());
    let candidates = client.search_torrents("ad-key", "Dune Part Two", 0.2).await.unwrap();

    magnets.assert_async().await;
    links.assert_async().await;

    // Magnet 102 is not ready
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].id, "101");
    assert_eq!(candidates[0].kind, ItemKind::Torrent);
    assert_eq!(candidates[1].kind, ItemKind::Direct);
    assert_eq!(candidates[1].url.as_deref(), Some("https://uptobox.com/xyz"));
}

/// Test: Single-magnet details handle the object (not array) response shape
#[tokio::test]
async fn test_single_magnet_details() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/magnet/status")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apikey".into(), "ad-key".into()),
            Matcher::UrlEncoded("id".into(), "101".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
            "status": "success",
            "data": {
                "magnets": {
                    "id": 101,
                    "filename": "Dune.Part.Two.2024.2160p.WEB-DL",
                    "size": 12000000000,
                    "statusCode": 4,
                    "links": [
                        {"link": "https://alldebrid.com/f/AAA", "filename": "Dune.Part.Two.2024.2160p.mkv", "size": 11900000000}
                    ]
                }
            }
        }"#,
        )
        .create_async()
        .await;

    let client = AllDebridClient::with_base_url(server.url());
    let item = client.torrent_details("ad-key", "101").await.unwrap().unwrap();

    mock.assert_async().await;

    assert_eq!(item.id, "101");
    assert_eq!(item.videos.len(), 1);
    assert_eq!(item.videos[0].url, "https://alldebrid.com/f/AAA");
    assert_eq!(item.videos[0].info.resolution.as_deref(), Some("2160p"));
}

/// Test: Unlock returns the direct link from the envelope
#[tokio::test]
async fn test_unrestrict_url() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/link/unlock")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apikey".into(), "ad-key".into()),
            Matcher::UrlEncoded("link".into(), "https://uptobox.com/xyz".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "success", "data": {"link": "https://direct.alldebrid.com/xyz.mkv"}}"#)
        .create_async()
        .await;

    let client = AllDebridClient::with_base_url(server.url());
    let url = client
        .unrestrict_url("ad-key", "https://uptobox.com/xyz")
        .await
        .unwrap();

    mock.assert_async().await;

    assert_eq!(url, "https://direct.alldebrid.com/xyz.mkv");
}

/// Test: An error envelope becomes an error even on HTTP 200
#[tokio::test]
async fn test_error_envelope() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/magnet/status")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "error", "error": {"code": "AUTH_BAD_APIKEY", "message": "The auth apikey is invalid"}}"#)
        .create_async()
        .await;

    let client = AllDebridClient::with_base_url(server.url());
    let result = client.search_torrents("bad-key", "Anything", 0.1).await;

    mock.assert_async().await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("magnet status"));
}
