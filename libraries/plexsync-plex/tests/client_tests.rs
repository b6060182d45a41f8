//! Tests for the Plex client and catalog.
//!
//! These tests use mock servers to verify client behavior without
//! requiring a real Plex server.

use plexsync_core::{CatalogReader, CatalogWriter, PlaylistKind, StarRating, TrackId};
use plexsync_plex::{PlexAuthClient, PlexCatalog, PlexClient, PlexClientError, PlexConfig};
use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MACHINE_ID: &str = "abc123";

fn config(server: &MockServer) -> PlexConfig {
    PlexConfig::new(server.uri())
        .with_token("test-token")
        .with_client_identifier("test-client")
}

fn sections_json() -> serde_json::Value {
    json!({
        "MediaContainer": {
            "size": 3,
            "Directory": [
                { "key": "1", "title": "Movies", "type": "movie" },
                { "key": "3", "title": "Music", "type": "artist" },
                { "key": "7", "title": "Audiobooks", "type": "artist" }
            ]
        }
    })
}

fn tracks_json() -> serde_json::Value {
    json!({
        "MediaContainer": {
            "size": 2,
            "Metadata": [
                {
                    "ratingKey": "1001",
                    "title": "Let It Be",
                    "grandparentTitle": "The Beatles",
                    "parentTitle": "Let It Be",
                    "index": 6,
                    "duration": 243000,
                    "userRating": 8.0
                },
                {
                    "ratingKey": "1002",
                    "title": "Hey Jude",
                    "grandparentTitle": "The Beatles",
                    "duration": 431000
                }
            ]
        }
    })
}

async fn mount_library(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/identity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MediaContainer": { "machineIdentifier": MACHINE_ID, "version": "1.40.0" }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/library/sections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sections_json()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/library/sections/3/all"))
        .and(query_param("type", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tracks_json()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MediaContainer": {
                "Metadata": [
                    { "ratingKey": "500", "title": "Favourites", "smart": false, "playlistType": "audio" },
                    { "ratingKey": "501", "title": "Recently Played", "smart": true, "playlistType": "audio" }
                ]
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/playlists/500/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MediaContainer": {
                "Metadata": [
                    { "ratingKey": "1001", "title": "Let It Be", "playlistItemID": 9001 },
                    { "ratingKey": "1002", "title": "Hey Jude", "playlistItemID": 9002 }
                ]
            }
        })))
        .mount(server)
        .await;
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_valid_http_url() {
        assert!(PlexClient::new(PlexConfig::new("http://localhost:32400")).is_ok());
    }

    #[test]
    fn test_empty_url_rejected() {
        match PlexClient::new(PlexConfig::new("")).unwrap_err() {
            PlexClientError::InvalidUrl(msg) => assert!(msg.contains("empty")),
            other => panic!("Expected InvalidUrl error, got {other:?}"),
        }
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        assert!(matches!(
            PlexClient::new(PlexConfig::new("plex.local:32400")),
            Err(PlexClientError::InvalidUrl(_))
        ));
    }
}

// =============================================================================
// Library Tests
// =============================================================================

mod library {
    use super::*;

    #[tokio::test]
    async fn test_identity_sends_plex_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/identity"))
            .and(header("X-Plex-Token", "test-token"))
            .and(header("X-Plex-Client-Identifier", "test-client"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MediaContainer": { "machineIdentifier": MACHINE_ID, "version": "1.40.0" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PlexClient::new(config(&server)).unwrap();
        let identity = client.identity().await.unwrap();

        assert_eq!(identity.machine_identifier, MACHINE_ID);
        assert_eq!(identity.version.as_deref(), Some("1.40.0"));
    }

    #[tokio::test]
    async fn test_music_section_by_title_or_key() {
        let server = MockServer::start().await;
        mount_library(&server).await;
        let client = PlexClient::new(config(&server)).unwrap();

        let by_title = client.music_section(Some("Audiobooks")).await.unwrap();
        assert_eq!(by_title.key, "7");

        let by_key = client.music_section(Some("3")).await.unwrap();
        assert_eq!(by_key.title, "Music");
    }

    #[tokio::test]
    async fn test_music_section_rejects_non_music_and_missing() {
        let server = MockServer::start().await;
        mount_library(&server).await;
        let client = PlexClient::new(config(&server)).unwrap();

        assert!(matches!(
            client.music_section(Some("Movies")).await,
            Err(PlexClientError::SectionNotFound(name)) if name == "Movies"
        ));
    }

    #[tokio::test]
    async fn test_music_section_ambiguous_without_selector() {
        let server = MockServer::start().await;
        mount_library(&server).await;
        let client = PlexClient::new(config(&server)).unwrap();

        match client.music_section(None).await.unwrap_err() {
            PlexClientError::AmbiguousSection(titles) => {
                assert_eq!(titles, vec!["Music".to_string(), "Audiobooks".to_string()]);
            }
            other => panic!("Expected AmbiguousSection error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_music_section() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/library/sections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MediaContainer": { "Directory": [ { "key": "1", "title": "Movies", "type": "movie" } ] }
            })))
            .mount(&server)
            .await;

        let client = PlexClient::new(config(&server)).unwrap();
        assert!(matches!(
            client.music_section(None).await,
            Err(PlexClientError::NoMusicSection)
        ));
    }

    #[tokio::test]
    async fn test_tracks() {
        let server = MockServer::start().await;
        mount_library(&server).await;
        let client = PlexClient::new(config(&server)).unwrap();

        let tracks = client.tracks("3").await.unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].title, "Let It Be");
        assert_eq!(tracks[0].user_rating, Some(8.0));
        assert!(tracks[1].user_rating.is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_required() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/library/sections"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = PlexClient::new(PlexConfig::new(server.uri())).unwrap();
        assert!(matches!(
            client.sections().await,
            Err(PlexClientError::AuthRequired)
        ));
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/library/sections/3/all"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = PlexClient::new(config(&server)).unwrap();
        match client.tracks("3").await.unwrap_err() {
            PlexClientError::ServerError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("Expected ServerError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/library/sections"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = PlexClient::new(config(&server)).unwrap();
        assert!(matches!(
            client.sections().await,
            Err(PlexClientError::ParseError(_))
        ));
    }
}

// =============================================================================
// Write Tests
// =============================================================================

mod writes {
    use super::*;

    #[tokio::test]
    async fn test_rate() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/:/rate"))
            .and(query_param("key", "1001"))
            .and(query_param("identifier", "com.plexapp.plugins.library"))
            .and(query_param("rating", "9"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = PlexClient::new(config(&server)).unwrap();
        client.rate("1001", 9.0).await.unwrap();
    }

    #[tokio::test]
    async fn test_add_and_remove_playlist_items() {
        let server = MockServer::start().await;
        let uri = PlexClient::library_uri(MACHINE_ID, "1002");

        Mock::given(method("PUT"))
            .and(path("/playlists/500/items"))
            .and(query_param("uri", uri.as_str()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/playlists/500/items/9002"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = PlexClient::new(config(&server)).unwrap();
        client.add_to_playlist("500", &uri).await.unwrap();
        client.remove_from_playlist("500", 9002).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_playlist() {
        let server = MockServer::start().await;
        let uri = PlexClient::library_uri(MACHINE_ID, "1001");

        Mock::given(method("POST"))
            .and(path("/playlists"))
            .and(query_param("type", "audio"))
            .and(query_param("title", "Road Trip"))
            .and(query_param("smart", "0"))
            .and(query_param("uri", uri.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "MediaContainer": {
                    "Metadata": [ { "ratingKey": "600", "title": "Road Trip", "smart": "0" } ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PlexClient::new(config(&server)).unwrap();
        let playlist = client.create_playlist("Road Trip", &uri).await.unwrap();

        assert_eq!(playlist.rating_key, "600");
        assert!(!playlist.smart);
    }
}

// =============================================================================
// Sign-in Tests
// =============================================================================

mod sign_in {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/users/sign_in.json"))
            .and(header_exists("authorization"))
            .and(header("X-Plex-Client-Identifier", "test-client"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "user": { "username": "alice", "authToken": "token-xyz" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let auth = PlexAuthClient::with_base_url(&server.uri(), "test-client").unwrap();
        let user = auth.sign_in("alice", "secret").await.unwrap();

        assert_eq!(user.auth_token, "token-xyz");
        assert_eq!(user.username.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_sign_in_invalid_credentials() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/users/sign_in.json"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "Invalid email, username, or password."
            })))
            .mount(&server)
            .await;

        let auth = PlexAuthClient::with_base_url(&server.uri(), "test-client").unwrap();
        assert!(matches!(
            auth.sign_in("alice", "wrong").await,
            Err(PlexClientError::AuthFailed(_))
        ));
    }
}

// =============================================================================
// Catalog Tests
// =============================================================================

mod catalog {
    use super::*;
    use tokio::runtime::Runtime;

    /// The catalog blocks on its own runtime, so the mock server runs on a separate one.
    fn start_library(rt: &Runtime) -> MockServer {
        rt.block_on(async {
            let server = MockServer::start().await;
            mount_library(&server).await;
            server
        })
    }

    fn requests(rt: &Runtime, server: &MockServer, verb: &str) -> Vec<String> {
        rt.block_on(server.received_requests())
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.method.to_string() == verb)
            .map(|request| request.url.to_string())
            .collect()
    }

    #[test]
    fn test_connect_and_list() {
        let rt = Runtime::new().unwrap();
        let server = start_library(&rt);

        let catalog = PlexCatalog::connect(config(&server).with_section("Music")).unwrap();
        assert_eq!(catalog.section().key, "3");
        assert!(catalog.name().contains("Music"));

        let tracks = catalog.list_tracks().unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].rating, StarRating::from_stars(4.0).ok());
        assert_eq!(tracks[1].rating, None);
        assert_eq!(tracks[1].duration_ms, Some(431_000));

        let playlists = catalog.list_playlists().unwrap();
        assert_eq!(playlists.len(), 2);
        assert_eq!(playlists[0].name, "Favourites");
        assert_eq!(playlists[0].track_ids, vec![TrackId::new("1001"), TrackId::new("1002")]);
        assert_eq!(playlists[1].kind, PlaylistKind::Auto);
        assert!(playlists[1].track_ids.is_empty());
    }

    #[test]
    fn test_connect_requires_unambiguous_section() {
        let rt = Runtime::new().unwrap();
        let server = start_library(&rt);

        assert!(matches!(
            PlexCatalog::connect(config(&server)),
            Err(PlexClientError::AmbiguousSection(_))
        ));
    }

    #[test]
    fn test_write_rating_uses_ten_point_scale() {
        let rt = Runtime::new().unwrap();
        let server = start_library(&rt);
        rt.block_on(
            Mock::given(method("PUT"))
                .and(path("/:/rate"))
                .respond_with(ResponseTemplate::new(200))
                .mount(&server),
        );

        let mut catalog = PlexCatalog::connect(config(&server).with_section("Music")).unwrap();
        catalog
            .write_rating(&TrackId::new("1002"), StarRating::from_stars(3.5).unwrap())
            .unwrap();

        let puts = requests(&rt, &server, "PUT");
        assert_eq!(puts.len(), 1);
        assert!(puts[0].contains("key=1002"));
        assert!(puts[0].contains("rating=7"));
    }

    #[test]
    fn test_add_creates_missing_playlist_once() {
        let rt = Runtime::new().unwrap();
        let server = start_library(&rt);
        rt.block_on(async {
            Mock::given(method("POST"))
                .and(path("/playlists"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "MediaContainer": { "Metadata": [ { "ratingKey": "600", "title": "Road Trip" } ] }
                })))
                .mount(&server)
                .await;
            Mock::given(method("PUT"))
                .and(path("/playlists/600/items"))
                .respond_with(ResponseTemplate::new(200))
                .mount(&server)
                .await;
        });

        let mut catalog = PlexCatalog::connect(config(&server).with_section("Music")).unwrap();
        catalog.add_to_playlist("Road Trip", &TrackId::new("1001")).unwrap();
        catalog.add_to_playlist("Road Trip", &TrackId::new("1002")).unwrap();

        assert_eq!(requests(&rt, &server, "POST").len(), 1);
        let puts = requests(&rt, &server, "PUT");
        assert_eq!(puts.len(), 1);
        assert!(puts[0].contains("/playlists/600/items"));
    }

    #[test]
    fn test_remove_uses_playlist_item_id() {
        let rt = Runtime::new().unwrap();
        let server = start_library(&rt);
        rt.block_on(
            Mock::given(method("DELETE"))
                .and(path("/playlists/500/items/9002"))
                .respond_with(ResponseTemplate::new(200))
                .mount(&server),
        );

        let mut catalog = PlexCatalog::connect(config(&server).with_section("Music")).unwrap();
        catalog.remove_from_playlist("Favourites", &TrackId::new("1002")).unwrap();
        // Not a member, and not a playlist: both no-ops
        catalog.remove_from_playlist("Favourites", &TrackId::new("4242")).unwrap();
        catalog.remove_from_playlist("Nowhere", &TrackId::new("1001")).unwrap();

        let deletes = requests(&rt, &server, "DELETE");
        assert_eq!(deletes.len(), 1);
        assert!(deletes[0].ends_with("/playlists/500/items/9002"));
    }

    #[test]
    fn test_server_errors_become_catalog_errors() {
        let rt = Runtime::new().unwrap();
        let server = start_library(&rt);
        rt.block_on(
            Mock::given(method("PUT"))
                .and(path("/:/rate"))
                .respond_with(ResponseTemplate::new(404).set_body_string("no such item"))
                .mount(&server),
        );

        let mut catalog = PlexCatalog::connect(config(&server).with_section("Music")).unwrap();
        let err = catalog
            .write_rating(&TrackId::new("9999"), StarRating::from_stars(1.0).unwrap())
            .unwrap_err();

        assert!(matches!(err, plexsync_core::CatalogError::NotFound { .. }));
    }
}
