mod common;

use axum::http::StatusCode;
use common::{TestApp, app, app_with_registry, read_json};
use http_helpers::{empty_request, json_request};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(app: &TestApp, request: axum::http::Request<axum::body::Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return (status, Value::Null);
    }
    (status, read_json(response).await)
}

async fn post(app: &TestApp, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, json_request("POST", uri, body)).await
}

async fn get(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    send(app, empty_request("GET", uri)).await
}

async fn created_id(app: &TestApp, uri: &str, body: Value) -> String {
    let (status, body) = post(app, uri, body).await;
    assert_eq!(status, StatusCode::CREATED, "create at {uri}: {body}");
    body["id"].as_str().expect("id").to_string()
}

fn ids(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .expect("items")
        .iter()
        .map(|item| item.as_str().expect("id").to_string())
        .collect()
}

#[tokio::test]
async fn stream_definitions_dedupe_and_conflict() {
    let app = app();
    let schema = json!({"temp": {"units": "C"}});
    let first = created_id(
        &app,
        "/v1/stream-definitions",
        json!({"name": "ctd", "schema": schema, "stream_type": "sample"}),
    )
    .await;
    let again = created_id(
        &app,
        "/v1/stream-definitions",
        json!({"name": "ctd", "schema": schema}),
    )
    .await;
    assert_eq!(first, again);

    let (status, body) = post(
        &app,
        "/v1/stream-definitions",
        json!({"name": "ctd", "schema": {"temp": {"units": "F"}}}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");

    let other = created_id(
        &app,
        "/v1/stream-definitions",
        json!({"name": "ctd_copy", "schema": schema}),
    )
    .await;
    let (status, body) = get(
        &app,
        &format!("/v1/stream-definitions/{first}/compare/{other}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["equivalent"], true);

    let (status, body) = get(&app, &format!("/v1/stream-definitions/{first}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "ctd");
    assert_eq!(body["stream_type"], "sample");
}

#[tokio::test]
async fn stream_create_route_and_persistence() {
    let app = app();
    let definition = created_id(
        &app,
        "/v1/stream-definitions",
        json!({"name": "ctd", "schema": {}}),
    )
    .await;
    let ocean = created_id(
        &app,
        "/v1/topics",
        json!({"name": "Ocean", "exchange_point": "science"}),
    )
    .await;

    let (status, body) = post(
        &app,
        "/v1/streams",
        json!({
            "name": "CTD Data",
            "exchange_point": "science",
            "topic_ids": [ocean],
            "stream_definition_id": definition
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let stream = body["id"].as_str().expect("id").to_string();
    assert_eq!(body["route"]["routing_key"], "ctddata.ocean.stream");

    let (_, route) = get(&app, &format!("/v1/streams/{stream}/route")).await;
    assert_eq!(route["exchange_point"], "science");
    assert_eq!(route["routing_key"], "ctddata.ocean.stream");

    let (_, streams) = get(&app, &format!("/v1/stream-definitions/{definition}/streams")).await;
    assert_eq!(ids(&streams), vec![stream.clone()]);
    let (_, streams) = get(&app, &format!("/v1/topics/{ocean}/streams")).await;
    assert_eq!(ids(&streams), vec![stream.clone()]);

    let persisted = format!("/v1/streams/{stream}/persisted");
    let (_, body) = get(&app, &persisted).await;
    assert_eq!(body["persisted"], false);
    let (status, body) = send(&app, empty_request("PUT", &persisted)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["persisted"], true);
    let (status, body) = send(&app, empty_request("PUT", &persisted)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
    let (status, body) = send(&app, empty_request("DELETE", &persisted)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["persisted"], false);

    let (status, _) = post(&app, "/v1/streams", json!({"name": "no_xp"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = post(
        &app,
        "/v1/streams",
        json!({"name": "CTD Data", "exchange_point": "science"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn topic_tree_queries_and_delete_rules() {
    let app = app();
    let root = created_id(
        &app,
        "/v1/topics",
        json!({"name": "root", "exchange_point": "X"}),
    )
    .await;
    let leaf = created_id(
        &app,
        "/v1/topics",
        json!({"name": "leaf", "exchange_point": "X", "parent_topic_id": root}),
    )
    .await;

    let (status, body) = post(
        &app,
        "/v1/topics",
        json!({"name": "stray", "exchange_point": "Y", "parent_topic_id": root}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (_, children) = get(&app, &format!("/v1/topics/{root}/topics")).await;
    assert_eq!(ids(&children), vec![leaf.clone()]);
    let (_, found) = get(&app, "/v1/topics?name=leaf").await;
    assert_eq!(ids(&found), vec![leaf.clone()]);
    let (status, _) = get(&app, "/v1/topics").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, empty_request("DELETE", &format!("/v1/topics/{root}"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, empty_request("DELETE", &format!("/v1/topics/{leaf}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, empty_request("DELETE", &format!("/v1/topics/{root}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = get(&app, &format!("/v1/topics/{root}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn subscription_activation_binds_topic_subtree() {
    let (app, registry) = app_with_registry();
    let root = created_id(
        &app,
        "/v1/topics",
        json!({"name": "root", "exchange_point": "X"}),
    )
    .await;
    let leaf = created_id(
        &app,
        "/v1/topics",
        json!({"name": "leaf", "exchange_point": "X", "parent_topic_id": root}),
    )
    .await;
    let (_, body) = post(
        &app,
        "/v1/streams",
        json!({"name": "probe", "exchange_point": "X", "topic_ids": [leaf]}),
    )
    .await;
    let routing_key = body["route"]["routing_key"].as_str().expect("key").to_string();
    let stream = body["id"].as_str().expect("id").to_string();

    let sub = created_id(
        &app,
        "/v1/subscriptions",
        json!({"name": "watcher", "topic_ids": [root]}),
    )
    .await;
    let active = format!("/v1/subscriptions/{sub}/active");
    let (_, body) = get(&app, &active).await;
    assert_eq!(body["active"], false);
    assert_eq!(body["state"], "inactive");
    assert!(registry.route("X", &routing_key).is_empty());

    let (status, body) = send(&app, empty_request("PUT", &active)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "active");
    assert_eq!(registry.route("X", &routing_key), vec!["watcher".to_string()]);

    let (status, _) = send(&app, empty_request("PUT", &active)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, empty_request("DELETE", &format!("/v1/subscriptions/{sub}"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, empty_request("DELETE", &active)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);
    assert!(registry.route("X", &routing_key).is_empty());

    let (_, subscription) = get(&app, &format!("/v1/subscriptions/{sub}")).await;
    assert_eq!(subscription["exchange_name"], "watcher");
    let (status, _) = send(&app, empty_request("DELETE", &format!("/v1/subscriptions/{sub}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, empty_request("DELETE", &format!("/v1/streams/{stream}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn stream_aggregated_by_subscription_cannot_be_deleted() {
    let app = app();
    let (_, body) = post(
        &app,
        "/v1/streams",
        json!({"name": "ctd", "exchange_point": "X"}),
    )
    .await;
    let stream = body["id"].as_str().expect("id").to_string();
    created_id(
        &app,
        "/v1/subscriptions",
        json!({"name": "sub", "stream_ids": [stream]}),
    )
    .await;
    let (status, body) = send(&app, empty_request("DELETE", &format!("/v1/streams/{stream}"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn changes_feed_records_mutations() {
    let app = app();
    let (_, snapshot) = get(&app, "/v1/resources/snapshot").await;
    assert!(snapshot["items"].as_array().expect("items").is_empty());
    let since = snapshot["next_seq"].as_u64().expect("next_seq");

    let topic = created_id(
        &app,
        "/v1/topics",
        json!({"name": "root", "exchange_point": "X"}),
    )
    .await;
    let (status, _) = send(&app, empty_request("DELETE", &format!("/v1/topics/{topic}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, changes) = get(&app, &format!("/v1/resources/changes?since={since}")).await;
    assert_eq!(status, StatusCode::OK);
    let items = changes["items"].as_array().expect("items");
    let ops: Vec<&str> = items
        .iter()
        .map(|item| item["op"].as_str().expect("op"))
        .collect();
    assert_eq!(ops, vec!["created", "deleted"]);
    assert_eq!(items[0]["kind"], "topic");
    assert_eq!(items[0]["resource"]["name"], "root");
    assert_eq!(items[0]["id"], topic.as_str());
    assert!(changes["next_seq"].as_u64().expect("next_seq") > since);
}

#[tokio::test]
async fn malformed_and_unknown_ids() {
    let app = app();
    let (status, body) = get(&app, "/v1/streams/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let missing = uuid::Uuid::new_v4();
    let (status, body) = get(&app, &format!("/v1/subscriptions/{missing}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let topic = created_id(
        &app,
        "/v1/topics",
        json!({"name": "root", "exchange_point": "X"}),
    )
    .await;
    let (status, _) = get(&app, &format!("/v1/streams/{topic}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
