use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use tv_guide::{
    config::Config,
    db::JsonStore,
    error::{AppError, AppResult},
    models::{
        AliasTable, CatalogMatch, Episode, ProviderOffer, Series, ServiceCatalog, WatchProviders,
    },
    routes::{create_router, AppState},
    services::{
        hub::{AutomationHub, EntityState},
        providers::MetadataProvider,
        LibrarySource,
    },
};

struct FakeLibrary;

#[async_trait::async_trait]
impl LibrarySource for FakeLibrary {
    async fn list_series(&self) -> AppResult<Vec<Series>> {
        Ok(serde_json::from_value(json!([
            {"id": 2, "title": "Severance", "tvdbId": 371980},
            {"id": 1, "title": "Andor", "tvdbId": 393189}
        ]))
        .unwrap())
    }

    async fn list_episodes(&self, series_id: i64) -> AppResult<Vec<Episode>> {
        if series_id != 1 {
            return Err(AppError::Upstream("Sonarr returned status 404".to_string()));
        }
        Ok(serde_json::from_value(json!([
            {"id": 102, "seasonNumber": 1, "episodeNumber": 2},
            {"id": 101, "seasonNumber": 1, "episodeNumber": 1}
        ]))
        .unwrap())
    }

    fn cover_url(&self, series_id: i64, kind: &str) -> String {
        format!("http://sonarr/{}/{}.jpg", series_id, kind)
    }
}

/// Serves watch providers keyed by external id; ids starting with "fail" error out
#[derive(Default)]
struct FakeProvider {
    listings: HashMap<String, WatchProviders>,
}

impl FakeProvider {
    fn with(mut self, external_id: &str, flatrate: &[&str], free: &[&str]) -> Self {
        self.listings.insert(
            external_id.to_string(),
            WatchProviders {
                flatrate: flatrate.iter().map(|n| ProviderOffer::named(n)).collect(),
                free: free.iter().map(|n| ProviderOffer::named(n)).collect(),
                ads: vec![],
            },
        );
        self
    }
}

#[async_trait::async_trait]
impl MetadataProvider for FakeProvider {
    async fn find_by_external_id(&self, external_id: &str) -> AppResult<Vec<CatalogMatch>> {
        if external_id.starts_with("fail") {
            return Err(AppError::Upstream("TMDB find error".to_string()));
        }
        if !self.listings.contains_key(external_id) {
            return Ok(vec![]);
        }
        // Catalog ids mirror external ids so watch_providers can find the listing
        Ok(vec![CatalogMatch {
            id: external_id.parse().unwrap(),
            title: None,
        }])
    }

    async fn watch_providers(&self, catalog_id: u64, _region: &str) -> AppResult<WatchProviders> {
        Ok(self
            .listings
            .get(&catalog_id.to_string())
            .cloned()
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

#[derive(Default)]
struct FakeHub {
    calls: Mutex<Vec<(String, Value)>>,
}

impl FakeHub {
    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AutomationHub for FakeHub {
    async fn invoke(&self, domain: &str, action: &str, payload: Value) -> AppResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((format!("{}.{}", domain, action), payload));
        Ok(())
    }

    async fn entity_state(&self, entity_id: &str) -> AppResult<EntityState> {
        let state = if entity_id.starts_with("switch.") {
            json!({"state": "on", "attributes": {}})
        } else {
            json!({"state": "idle", "attributes": {"volume_level": 0.2, "is_volume_muted": false}})
        };
        Ok(serde_json::from_value(state).unwrap())
    }
}

struct Harness {
    server: TestServer,
    hub: Arc<FakeHub>,
    _dir: tempfile::TempDir,
}

async fn create_harness(provider: FakeProvider) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>tv guide</html>").unwrap();

    let config = Config {
        static_dir: dir.path().to_path_buf(),
        data_file: dir.path().join("tvguide.json"),
        tmdb_key: "key".to_string(),
        ..Default::default()
    };
    let store = JsonStore::open(config.data_file.clone()).await;
    let hub = Arc::new(FakeHub::default());

    let state = AppState::assemble(
        config,
        ServiceCatalog::builtin(),
        AliasTable::builtin(),
        store,
        Arc::new(FakeLibrary),
        Arc::new(provider),
        hub.clone(),
    );

    Harness {
        server: TestServer::new(create_router(state)).unwrap(),
        hub,
        _dir: dir,
    }
}

#[tokio::test]
async fn test_health_check() {
    let harness = create_harness(FakeProvider::default()).await;
    let response = harness.server.get("/health").await;
    response.assert_status_ok();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_index_served_for_ingress() {
    let harness = create_harness(FakeProvider::default()).await;
    let response = harness.server.get("/ingress").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "<html>tv guide</html>");
}

#[tokio::test]
async fn test_status_reports_catalog() {
    let harness = create_harness(FakeProvider::default()).await;
    let status: Value = harness.server.get("/api/status").await.json();

    assert_eq!(status["tmdb"], true);
    assert_eq!(status["sonarr"], false);
    assert_eq!(status["services"]["disney"], "Disney+");
    assert_eq!(status["profiles"]["peacock"][2], "Kids Profile");
    assert!(status["profiles"].get("hulu").is_none());
}

#[tokio::test]
async fn test_shows_joined_with_assignments() {
    let harness = create_harness(FakeProvider::default()).await;

    harness
        .server
        .post("/api/shows/2/service")
        .json(&json!({ "service": "apple" }))
        .await
        .assert_status_ok();

    let shows: Vec<Value> = harness.server.get("/api/shows").await.json();
    assert_eq!(shows.len(), 2);
    assert_eq!(shows[0]["title"], "Andor");
    assert_eq!(shows[0]["service"], Value::Null);
    assert_eq!(shows[1]["service"], "apple");
    assert_eq!(shows[1]["poster"], "http://sonarr/2/poster.jpg");
    assert_eq!(shows[1]["tvdbId"], 371980);
}

#[tokio::test]
async fn test_unknown_service_override_rejected() {
    let harness = create_harness(FakeProvider::default()).await;
    let response = harness
        .server
        .post("/api/shows/2/service")
        .json(&json!({ "service": "vudu" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_watched_toggle_flows_into_episodes() {
    let harness = create_harness(FakeProvider::default()).await;

    harness
        .server
        .post("/api/shows/1/watched/102")
        .await
        .assert_status_ok();

    let episodes: Vec<Value> = harness.server.get("/api/shows/1/episodes").await.json();
    assert_eq!(episodes[0]["id"], 101);
    assert_eq!(episodes[0]["watched"], false);
    assert_eq!(episodes[1]["watched"], true);

    harness
        .server
        .delete("/api/shows/1/watched/102")
        .await
        .assert_status_ok();

    let episodes: Vec<Value> = harness.server.get("/api/shows/1/episodes").await.json();
    assert_eq!(episodes[1]["watched"], false);
}

#[tokio::test]
async fn test_library_upstream_failure_is_bad_gateway() {
    let harness = create_harness(FakeProvider::default()).await;
    let response = harness.server.get("/api/shows/9/episodes").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_data_post_is_shallow_merge() {
    let harness = create_harness(FakeProvider::default()).await;

    harness
        .server
        .post("/api/shows/1/progress")
        .json(&json!({ "season": 1, "episode": 4 }))
        .await
        .assert_status_ok();

    harness
        .server
        .post("/api/data")
        .json(&json!({ "watched": { "1": [101] } }))
        .await
        .assert_status_ok();

    let data: Value = harness.server.get("/api/data").await.json();
    assert_eq!(data["watched"]["1"], json!([101]));
    assert_eq!(data["progress"]["1"], json!({ "season": 1, "episode": 4 }));
}

#[tokio::test]
async fn test_scan_service_persists_match() {
    let provider = FakeProvider::default().with("393189", &[], &["Tubi TV"]);
    let harness = create_harness(provider).await;

    let response = harness
        .server
        .get("/api/shows/1/scan-service")
        .add_query_param("tvdb_id", "393189")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({ "service": "tubi", "provider": "Tubi TV" }));

    let data: Value = harness.server.get("/api/data").await.json();
    assert_eq!(data["services"]["1"], "tubi");
}

#[tokio::test]
async fn test_scan_service_soft_miss() {
    let harness = create_harness(FakeProvider::default()).await;
    let body: Value = harness
        .server
        .get("/api/shows/1/scan-service")
        .add_query_param("tvdb_id", "555")
        .await
        .json();
    assert_eq!(body, json!({ "service": null }));
}

#[tokio::test]
async fn test_scan_service_upstream_failure() {
    let harness = create_harness(FakeProvider::default()).await;
    let response = harness
        .server
        .get("/api/shows/1/scan-service")
        .add_query_param("tvdb_id", "fail-1")
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_scan_all_partial_results() {
    let provider = FakeProvider::default()
        .with("100", &["Netflix"], &[])
        .with("200", &["Vudu"], &[]);
    let harness = create_harness(provider).await;

    let response = harness
        .server
        .post("/api/scan-all")
        .json(&json!({
            "shows": [
                {"id": 1, "tvdbId": 100},
                {"id": 2, "tvdbId": null},
                {"id": 3, "tvdbId": "fail-3"},
                {"id": 4, "tvdbId": 200}
            ]
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["results"], json!({ "1": "netflix" }));
    assert_eq!(body["scanned"], 4);
    assert_eq!(body["found"], 1);

    let data: Value = harness.server.get("/api/data").await.json();
    assert_eq!(data["services"], json!({ "1": "netflix" }));
}

#[tokio::test(start_paused = true)]
async fn test_launch_runs_choreography() {
    let harness = create_harness(FakeProvider::default()).await;

    let response = harness
        .server
        .post("/api/firetv/launch")
        .json(&json!({ "service": "peacock", "profileIndex": 1 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "ok": true,
            "service": "peacock",
            "package": "com.peacock.peacockfiretv",
            "profile": "Tony"
        })
    );

    let commands: Vec<String> = harness
        .hub
        .calls()
        .into_iter()
        .map(|(call, payload)| match payload["command"].as_str() {
            Some(command) => command.to_string(),
            None => call,
        })
        .collect();
    assert_eq!(
        commands,
        vec![
            "media_player.turn_on",
            "input keyevent KEYCODE_HOME",
            "am start -n com.peacock.peacockfiretv/com.peacock.peacocktv.AmazonMainActivity",
            "input keyevent KEYCODE_DPAD_RIGHT",
            "input keyevent KEYCODE_DPAD_CENTER",
        ]
    );
}

#[tokio::test]
async fn test_launch_unknown_service() {
    let harness = create_harness(FakeProvider::default()).await;
    let response = harness
        .server
        .post("/api/firetv/launch")
        .json(&json!({ "service": "vudu" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(harness.hub.calls().is_empty());
}

#[tokio::test]
async fn test_remote_command_mapping() {
    let harness = create_harness(FakeProvider::default()).await;

    harness
        .server
        .post("/api/firetv/command")
        .json(&json!({ "command": "back" }))
        .await
        .assert_status_ok();

    harness
        .server
        .post("/api/firetv/command")
        .json(&json!({}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let calls = harness.hub.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "androidtv.adb_command");
    assert_eq!(calls[0].1["command"], "input keyevent KEYCODE_BACK");
}

#[tokio::test]
async fn test_sonos_state_and_volume() {
    let harness = create_harness(FakeProvider::default()).await;

    let state: Value = harness.server.get("/api/sonos/state").await.json();
    assert_eq!(state["state"], "idle");
    assert_eq!(state["volume"], 0.2);
    assert_eq!(state["speech_enhancement"], true);

    harness
        .server
        .post("/api/sonos/command")
        .json(&json!({ "command": "volume_up", "current": 0.2 }))
        .await
        .assert_status_ok();

    let calls = harness.hub.calls();
    assert_eq!(calls[0].0, "media_player.volume_set");
    assert_eq!(calls[0].1["volume_level"], 0.25);
}
