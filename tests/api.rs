use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use filmoteca::infra::http::{self, ApiState};
use filmoteca::infra::store::MovieStore;

struct TestApp {
    router: Router,
    store: Arc<MovieStore>,
    // Holds the backing file's directory alive for the test's duration.
    _dir: tempfile::TempDir,
}

async fn test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(
        MovieStore::open(dir.path().join("movies.json"))
            .await
            .expect("open store"),
    );
    let router = http::build_router(ApiState {
        store: store.clone(),
    });
    TestApp {
        router,
        store,
        _dir: dir,
    }
}

async fn send(app: &TestApp, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            builder
                .body(Body::from(serde_json::to_vec(&body).expect("body")))
                .expect("request")
        }
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn sample_movie() -> Value {
    json!({
        "title": "X",
        "year": 2020,
        "director": "Y",
        "duration": 90,
        "genre": ["Drama"],
        "poster": "http://x/p.jpg"
    })
}

#[tokio::test]
async fn root_returns_the_greeting() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Hola Mundo" }));
}

#[tokio::test]
async fn create_returns_created_movie_with_id_and_default_rate() {
    let app = test_app().await;
    let (status, body) = send(&app, "POST", "/movies", Some(sample_movie())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "X");
    assert_eq!(body["year"], 2020);
    assert_eq!(body["rate"], 0.0);
    assert!(body["id"].as_str().is_some(), "expected a generated id");
}

#[tokio::test]
async fn create_with_missing_title_reports_the_field() {
    let app = test_app().await;
    let mut payload = sample_movie();
    payload.as_object_mut().expect("object").remove("title");

    let (status, body) = send(&app, "POST", "/movies", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["error"].as_array().expect("error array");
    assert!(
        errors.iter().any(|issue| issue["field"] == "title"),
        "expected a title violation, got {errors:?}"
    );
}

#[tokio::test]
async fn get_returns_the_record_or_404() {
    let app = test_app().await;
    let (_, created) = send(&app, "POST", "/movies", Some(sample_movie())).await;
    let id = created["id"].as_str().expect("id");

    let (status, body) = send(&app, "GET", &format!("/movies/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);

    let (status, body) = send(
        &app,
        "GET",
        "/movies/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Movie not found" }));
}

#[tokio::test]
async fn malformed_ids_are_not_found_rather_than_bad_requests() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/movies/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Movie not found" }));
}

#[tokio::test]
async fn genre_filter_ignores_case() {
    let app = test_app().await;
    send(&app, "POST", "/movies", Some(sample_movie())).await;
    let mut comedy = sample_movie();
    comedy["title"] = json!("Z");
    comedy["genre"] = json!(["Comedy"]);
    send(&app, "POST", "/movies", Some(comedy)).await;

    let (status, upper) = send(&app, "GET", "/movies?genre=Drama", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, lower) = send(&app, "GET", "/movies?genre=drama", None).await;

    assert_eq!(upper, lower);
    let matches = upper.as_array().expect("array");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["title"], "X");

    let (status, none) = send(&app, "GET", "/movies?genre=Western", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn patch_changes_only_the_supplied_fields() {
    let app = test_app().await;
    let (_, created) = send(&app, "POST", "/movies", Some(sample_movie())).await;
    let id = created["id"].as_str().expect("id");

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/movies/{id}"),
        Some(json!({ "year": 2000 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["year"], 2000);
    assert_eq!(updated["title"], created["title"]);
    assert_eq!(updated["director"], created["director"]);
    assert_eq!(updated["id"], created["id"]);
}

#[tokio::test]
async fn patch_validation_failures_outrank_missing_ids() {
    let app = test_app().await;

    // Invalid body against an id that does not exist: 400, not 404.
    let (status, body) = send(
        &app,
        "PATCH",
        "/movies/00000000-0000-0000-0000-000000000000",
        Some(json!({ "rate": 99 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_array());

    // Valid body against a missing id: 404.
    let (status, _) = send(
        &app,
        "PATCH",
        "/movies/00000000-0000-0000-0000-000000000000",
        Some(json!({ "year": 2000 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_with_no_recognized_fields_is_rejected() {
    let app = test_app().await;
    let (_, created) = send(&app, "POST", "/movies", Some(sample_movie())).await;
    let id = created["id"].as_str().expect("id");

    let (status, _) = send(&app, "PATCH", &format!("/movies/{id}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_confirms_and_removes_exactly_one_record() {
    let app = test_app().await;
    let (_, first) = send(&app, "POST", "/movies", Some(sample_movie())).await;
    let mut second_payload = sample_movie();
    second_payload["title"] = json!("Second");
    let (_, second) = send(&app, "POST", "/movies", Some(second_payload)).await;
    let id = first["id"].as_str().expect("id");

    let (status, body) = send(&app, "DELETE", &format!("/movies/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Movie deleted successfully" }));

    let (_, remaining) = send(&app, "GET", "/movies", None).await;
    assert_eq!(remaining, json!([second]));

    // Deleting again is a 404.
    let (status, _) = send(&app, "DELETE", &format!("/movies/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mutations_are_mirrored_to_the_backing_file() {
    let app = test_app().await;
    let (_, created) = send(&app, "POST", "/movies", Some(sample_movie())).await;

    let persisted = tokio::fs::read(app.store.path()).await.expect("read mirror");
    let persisted: Value = serde_json::from_slice(&persisted).expect("json mirror");
    assert_eq!(persisted, json!([created]));
}

#[tokio::test]
async fn demo_page_is_served_under_web() {
    let app = test_app().await;
    let request = Request::builder()
        .method("GET")
        .uri("/web")
        .body(Body::empty())
        .expect("request");

    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"), "{content_type}");
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let app = test_app().await;
    let request = Request::builder()
        .method("GET")
        .uri("/movies")
        .header(header::ORIGIN, "http://localhost:8080")
        .body(Body::empty())
        .expect("request");

    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
