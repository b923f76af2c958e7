mod helpers;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use dosewise::api;
use dosewise::catalog::store::SqliteCatalog;
use dosewise::catalog::Catalog;
use dosewise::{client, risk, server};
use serde_json::Value;
use tower::ServiceExt;

fn seeded_store() -> SqliteCatalog {
    let mut conn = helpers::test_db();
    helpers::seed(&mut conn);
    SqliteCatalog::from_connection(conn)
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn drugs_endpoint_decodes_side_effects() {
    let app = api::router(Arc::new(seeded_store()));

    let (status, json) = get_json(app, "/drugs").await;
    assert_eq!(status, StatusCode::OK);

    let drugs = json.as_array().unwrap();
    assert_eq!(drugs.len(), 3);
    assert_eq!(drugs[0]["id"], "d1");
    assert_eq!(drugs[0]["name"], "阿司匹林");
    assert_eq!(drugs[0]["instruction"], "每日一次");
    assert_eq!(drugs[0]["side_effects"], serde_json::json!(["胃部不适"]));
    assert_eq!(drugs[2]["side_effects"], serde_json::json!([]));
}

#[tokio::test]
async fn interactions_endpoint_skips_rules_without_drugs() {
    let app = api::router(Arc::new(seeded_store()));

    let (status, json) = get_json(app, "/interactions").await;
    assert_eq!(status, StatusCode::OK);

    let rules = json.as_array().unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0]["id"], 1);
    assert_eq!(rules[0]["risk_level"], "red");
    assert_eq!(rules[0]["drug_ids"], serde_json::json!(["d1", "d2"]));
    assert_eq!(rules[1]["id"], 2);
    assert_eq!(rules[1]["risk_level"], "yellow");
    assert!(rules.iter().all(|r| r["description"] != "无药物"));
}

#[tokio::test]
async fn api_prefix_serves_the_same_bodies() {
    let app = api::router(Arc::new(seeded_store()));

    for path in ["/drugs", "/interactions"] {
        let (_, plain) = get_json(app.clone(), path).await;
        let (status, prefixed) = get_json(app.clone(), &format!("/api{path}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(plain, prefixed);
    }
}

#[tokio::test]
async fn empty_store_returns_empty_arrays() {
    let store = SqliteCatalog::from_connection(helpers::test_db());
    let app = api::router(Arc::new(store));

    let (_, drugs) = get_json(app.clone(), "/drugs").await;
    let (_, rules) = get_json(app, "/interactions").await;
    assert_eq!(drugs, serde_json::json!([]));
    assert_eq!(rules, serde_json::json!([]));
}

#[tokio::test]
async fn shell_client_loads_catalog_from_running_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let handle = tokio::spawn(server::serve_with(
        listener,
        Arc::new(seeded_store()),
        async move {
            let _ = stop_rx.await;
        },
    ));

    let catalog: Catalog = client::fetch_catalog(&format!("http://{addr}/")).await.unwrap();
    assert_eq!(catalog.drugs.len(), 3);
    assert_eq!(catalog.interactions.len(), 2);

    let finding = risk::evaluate(["d1", "d2", "d3"], &catalog.interactions).unwrap();
    assert_eq!(finding.description, "出血风险增加");

    stop_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}
