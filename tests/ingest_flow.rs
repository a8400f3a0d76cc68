//! End-to-end ingestion tests: routing, authentication, validation,
//! and fresh-file output.

use ingest_sink::config::{RouteConfig, RouteMap};
use ingest_sink::record::Envelope;

mod common;

fn fresh_route(dir: &std::path::Path, secret: &str) -> RouteConfig {
    RouteConfig {
        secret: secret.to_string(),
        out_template: format!("{}/obj-%T.cbor", dir.display()),
        ..RouteConfig::default()
    }
}

fn only_file(dir: &std::path::Path) -> std::path::PathBuf {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1, "expected exactly one output file");
    entries.pop().unwrap()
}

#[tokio::test]
async fn post_lands_in_envelope_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut routes = RouteMap::new();
    routes.insert("up".into(), fresh_route(dir.path(), ""));
    let (addr, shutdown) = common::spawn_sink(routes).await;

    let res = common::client()
        .post(format!("http://{addr}/up"))
        .header("Content-Type", "text/plain")
        .body("payload bytes")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "text/plain"
    );

    let written = std::fs::read(only_file(dir.path())).unwrap();
    let rec = Envelope::decode_from(written.as_slice()).unwrap();
    assert_eq!(rec.payload, b"payload bytes");
    assert_eq!(rec.content_type, "text/plain");
    assert!(rec.when_millis > 0);

    shutdown.trigger();
}

#[tokio::test]
async fn raw_route_writes_payload_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let mut routes = RouteMap::new();
    routes.insert(
        "cam".into(),
        RouteConfig {
            raw: true,
            out_template: format!("{}/shot-%T.jpg", dir.path().display()),
            ..RouteConfig::default()
        },
    );
    let (addr, shutdown) = common::spawn_sink(routes).await;

    let body: &[u8] = b"\xff\xd8 not really a jpeg";
    let res = common::client()
        .post(format!("http://{addr}/cam"))
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    assert_eq!(std::fs::read(only_file(dir.path())).unwrap(), body);
    shutdown.trigger();
}

#[tokio::test]
async fn route_selected_by_query_parameter() {
    let dir = tempfile::tempdir().unwrap();
    let mut routes = RouteMap::new();
    routes.insert("target".into(), fresh_route(dir.path(), ""));
    let (addr, shutdown) = common::spawn_sink(routes).await;

    let res = common::client()
        .post(format!("http://{addr}/anything/else?d=target"))
        .body("x")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    only_file(dir.path());
    shutdown.trigger();
}

#[tokio::test]
async fn route_selected_by_path_segment() {
    let dir = tempfile::tempdir().unwrap();
    let mut routes = RouteMap::new();
    routes.insert("myroute".into(), fresh_route(dir.path(), ""));
    let (addr, shutdown) = common::spawn_sink(routes).await;

    let res = common::client()
        .post(format!("http://{addr}/abc/myroute/xyz"))
        .body("x")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    shutdown.trigger();
}

#[tokio::test]
async fn unknown_route_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let mut routes = RouteMap::new();
    routes.insert("known".into(), fresh_route(dir.path(), ""));
    let (addr, shutdown) = common::spawn_sink(routes).await;

    let res = common::client()
        .post(format!("http://{addr}/unknown"))
        .body("x")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    shutdown.trigger();
}

#[tokio::test]
async fn default_route_catches_unmatched_paths() {
    let dir = tempfile::tempdir().unwrap();
    let mut routes = RouteMap::new();
    routes.insert("".into(), fresh_route(dir.path(), ""));
    let (addr, shutdown) = common::spawn_sink(routes).await;

    let res = common::client()
        .post(format!("http://{addr}/whatever/shape"))
        .body("x")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    shutdown.trigger();
}

#[tokio::test]
async fn wrong_token_is_403_right_token_accepts() {
    let dir = tempfile::tempdir().unwrap();
    let mut routes = RouteMap::new();
    routes.insert("sec".into(), fresh_route(dir.path(), "s1"));
    let (addr, shutdown) = common::spawn_sink(routes).await;
    let client = common::client();

    let res = client
        .post(format!("http://{addr}/sec"))
        .header("X-Receiver-Token", "s2")
        .body("x")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);
    assert_eq!(res.text().await.unwrap(), "nope");

    let res = client
        .post(format!("http://{addr}/sec"))
        .header("X-Receiver-Token", "s1")
        .body("x")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    shutdown.trigger();
}

#[tokio::test]
async fn secret_accepted_from_path_or_authorization_substring() {
    let dir = tempfile::tempdir().unwrap();
    let mut routes = RouteMap::new();
    routes.insert("sec".into(), fresh_route(dir.path(), "hunter2"));
    let (addr, shutdown) = common::spawn_sink(routes).await;
    let client = common::client();

    // secret as a path segment
    let res = client
        .post(format!("http://{addr}/sec/hunter2"))
        .body("x")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    // secret anywhere inside the Authorization value
    let res = client
        .post(format!("http://{addr}/sec"))
        .header("Authorization", "Bearer hunter2")
        .body("x")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    // no credentials at all
    let res = client
        .post(format!("http://{addr}/sec"))
        .body("x")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);
    shutdown.trigger();
}

#[tokio::test]
async fn non_post_method_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let mut routes = RouteMap::new();
    routes.insert("up".into(), fresh_route(dir.path(), ""));
    let (addr, shutdown) = common::spawn_sink(routes).await;

    let res = common::client()
        .get(format!("http://{addr}/up"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), "not POST");
    shutdown.trigger();
}

#[tokio::test]
async fn content_type_mismatch_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let mut routes = RouteMap::new();
    routes.insert(
        "img".into(),
        RouteConfig {
            out_template: format!("{}/%T.jpg", dir.path().display()),
            content_type: "image/jpeg".into(),
            ..RouteConfig::default()
        },
    );
    let (addr, shutdown) = common::spawn_sink(routes).await;
    let client = common::client();

    let res = client
        .post(format!("http://{addr}/img"))
        .header("Content-Type", "text/plain")
        .body("x")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let res = client
        .post(format!("http://{addr}/img"))
        .header("Content-Type", "image/jpeg")
        .body("x")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    shutdown.trigger();
}

#[tokio::test]
async fn oversized_body_is_a_server_fault_not_a_truncation() {
    let dir = tempfile::tempdir().unwrap();
    let mut routes = RouteMap::new();
    routes.insert(
        "small".into(),
        RouteConfig {
            out_template: format!("{}/%T.bin", dir.path().display()),
            max_bytes: 64,
            ..RouteConfig::default()
        },
    );
    let (addr, shutdown) = common::spawn_sink(routes).await;

    let res = common::client()
        .post(format!("http://{addr}/small"))
        .body(vec![0u8; 1024])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);

    // nothing may be written on failure
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    shutdown.trigger();
}
