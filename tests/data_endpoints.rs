//! Launcher data routes served from a temporary data directory.

use launcher_gateway::config::DataConfig;
use reqwest::StatusCode;
use serde_json::Value;

mod common;

use common::{data_fixture, test_config, MockProfileServer, TestGateway, LAUNCHER_TOKEN};

async fn get_json(gateway: &TestGateway, path: &str) -> (StatusCode, Value) {
    let res = gateway
        .get(path)
        .header("x-lk-token", LAUNCHER_TOKEN)
        .send()
        .await
        .unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn test_modpacks_are_translated() {
    let profile = MockProfileServer::start().await;
    let data = data_fixture();
    let gateway = TestGateway::spawn(test_config(&profile.url(), data.path())).await;

    let (status, body) = get_json(&gateway, "/v1/modpacks?lang=en").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["modpacks"][0]["shortDescription"], "Short text");
    assert_eq!(body["ui"]["modloader"]["forge"], "Forge");

    let (_, body) = get_json(&gateway, "/v1/modpacks?lang=es").await;
    assert_eq!(body["modpacks"][0]["shortDescription"], "Texto corto");
}

#[tokio::test]
async fn test_missing_lang_query_serves_english_with_stock_data_config() {
    let profile = MockProfileServer::start().await;
    let data = data_fixture();
    let mut config = test_config(&profile.url(), data.path());
    config.data = DataConfig {
        dir: data.path().display().to_string(),
        ..DataConfig::default()
    };
    let gateway = TestGateway::spawn(config).await;

    let (status, body) = get_json(&gateway, "/v1/modpacks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modpacks"][0]["shortDescription"], "Short text");

    let (status, body) = get_json(&gateway, "/v1/modpacks/pack-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Long text");

    // The listing still reports the configured default.
    let res = gateway.get("/v1/translations").send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["defaultLanguage"], "es");
}

#[tokio::test]
async fn test_unknown_language_is_not_found() {
    let profile = MockProfileServer::start().await;
    let data = data_fixture();
    let gateway = TestGateway::spawn(test_config(&profile.url(), data.path())).await;

    let (status, body) = get_json(&gateway, "/v1/modpacks?lang=fr").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Language 'fr' not supported");
}

#[tokio::test]
async fn test_minimal_list() {
    let profile = MockProfileServer::start().await;
    let data = data_fixture();
    let gateway = TestGateway::spawn(test_config(&profile.url(), data.path())).await;

    let (status, body) = get_json(&gateway, "/v1/modpacks/list").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    let item = &body["modpacks"][0];
    assert_eq!(item["id"], "pack-1");
    assert_eq!(item["modloaderVersion"], "47.2.0");
    assert!(item.get("logo").is_none());
}

#[tokio::test]
async fn test_modpack_detail_and_features() {
    let profile = MockProfileServer::start().await;
    let data = data_fixture();
    let gateway = TestGateway::spawn(test_config(&profile.url(), data.path())).await;

    let (status, body) = get_json(&gateway, "/v1/modpacks/pack-1?lang=en").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Long text");
    assert_eq!(body["features"][0]["title"], "Quests");
    assert_eq!(body["urlModpackZip"], "https://example.com/pack-1.zip");

    let (status, body) = get_json(&gateway, "/v1/modpacks/pack-1/features/en").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modpackId"], "pack-1");
    assert_eq!(body["language"], "en");
    assert_eq!(body["features"].as_array().unwrap().len(), 1);

    let (status, _) = get_json(&gateway, "/v1/modpacks/missing?lang=en").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_translation_documents() {
    let profile = MockProfileServer::start().await;
    let data = data_fixture();
    let gateway = TestGateway::spawn(test_config(&profile.url(), data.path())).await;

    let res = gateway.get("/v1/translations").send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["availableLanguages"], serde_json::json!(["en", "es"]));
    assert_eq!(body["defaultLanguage"], "es");

    let (status, body) = get_json(&gateway, "/v1/translations/es").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modpacks"]["pack-1"]["shortDescription"], "Texto corto");

    let (status, body) = get_json(&gateway, "/v1/translations/fr").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("en, es"));
}

#[tokio::test]
async fn test_translation_document_requires_credentials() {
    let profile = MockProfileServer::start().await;
    let data = data_fixture();
    let gateway = TestGateway::spawn(test_config(&profile.url(), data.path())).await;

    let res = gateway.get("/v1/translations/en").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cleared_store_rereads_disk() {
    let profile = MockProfileServer::start().await;
    let data = data_fixture();
    let gateway = TestGateway::spawn(test_config(&profile.url(), data.path())).await;

    let (_, body) = get_json(&gateway, "/v1/modpacks/list").await;
    assert_eq!(body["count"], 1);

    std::fs::write(data.path().join("modpacks.json"), "[]").unwrap();
    gateway.state.data.clear();

    let (_, body) = get_json(&gateway, "/v1/modpacks/list").await;
    assert_eq!(body["count"], 0);
}
