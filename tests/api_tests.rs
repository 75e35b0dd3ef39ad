//! End to end tests for the web service, driven through the router and
//! backed by an in-process stand-in for the hosted lectura table.

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use chrono_tz::Europe::Madrid;
use invernadero::server;
use invernadero::storage::Storage;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone, Default)]
struct FakeTable {
    rows: Arc<Mutex<Vec<Value>>>,
}

async fn fake_insert(
    State(table): State<FakeTable>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut rows = table.rows.lock().unwrap();
    let mut row = body;
    row["id"] = json!(rows.len() as i64 + 1);
    row["fecha_hora"] = json!(Utc::now().with_timezone(&Madrid).to_rfc3339());
    rows.push(row.clone());
    // PostgREST returns the inserted row wrapped in an array
    (StatusCode::CREATED, Json(json!([row])))
}

// The window filter is not reproduced here; every seeded row is recent.
async fn fake_select(State(table): State<FakeTable>) -> Json<Value> {
    Json(Value::Array(table.rows.lock().unwrap().clone()))
}

async fn start_fake_storage(seed: Vec<Value>) -> (String, FakeTable) {
    let table = FakeTable {
        rows: Arc::new(Mutex::new(seed)),
    };
    let router = Router::new()
        .route("/rest/v1/lectura", post(fake_insert).get(fake_select))
        .with_state(table.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), table)
}

async fn start_broken_storage() -> String {
    async fn failing() -> (StatusCode, Json<Value>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "permission denied for table lectura"})),
        )
    }
    let router = Router::new().route("/rest/v1/lectura", post(failing).get(failing));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn app(base_url: &str) -> Router {
    let storage = Storage::new(base_url, "test-key").expect("storage client");
    server::routes(storage)
}

fn post_lectura(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/lectura")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_recent() -> Request<Body> {
    Request::builder()
        .uri("/api/lecturas_recientes")
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn valid_reading_is_created_and_echoed() {
    let (url, table) = start_fake_storage(Vec::new()).await;
    let app = app(&url);

    let resp = app
        .oneshot(post_lectura(r#"{"temperatura": 21.5, "humedad": 55.0}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = json_body(resp).await;
    assert_eq!(body["message"], "Lectura guardada exitosamente");
    assert_eq!(body["data"]["temperatura"], 21.5);
    assert_eq!(body["data"]["humedad"], 55.0);
    assert_eq!(body["data"]["id"], 1);
    assert!(body["data"]["fecha_hora"].is_string());

    assert_eq!(table.rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_field_never_reaches_storage() {
    let (url, table) = start_fake_storage(Vec::new()).await;
    let app = app(&url);

    let resp = app
        .oneshot(post_lectura(r#"{"humedad": 55.0}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = json_body(resp).await;
    assert_eq!(body["error"], "Falta el campo 'temperatura'");
    assert!(table.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn out_of_range_values_are_rejected() {
    let (url, table) = start_fake_storage(Vec::new()).await;
    let app = app(&url);

    let resp = app
        .clone()
        .oneshot(post_lectura(r#"{"temperatura": 150, "humedad": 55.0}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["error"], "Temperatura fuera del rango válido (-50°C a 100°C)");

    let resp = app
        .oneshot(post_lectura(r#"{"temperatura": 21.5, "humedad": -5}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["error"], "Humedad fuera del rango válido (0% a 100%)");

    assert!(table.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn wrong_content_type_is_rejected() {
    let (url, _table) = start_fake_storage(Vec::new()).await;
    let app = app(&url);

    let req = Request::builder()
        .method("POST")
        .uri("/lectura")
        .header("content-type", "text/plain")
        .body(Body::from(r#"{"temperatura": 21.5, "humedad": 55.0}"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = json_body(resp).await;
    assert_eq!(body["error"], "Content-Type debe ser application/json");
}

#[tokio::test]
async fn empty_window_answers_with_message_not_error() {
    let (url, _table) = start_fake_storage(Vec::new()).await;
    let app = app(&url);

    let resp = app.oneshot(get_recent()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["temperaturas"], json!([]));
    assert_eq!(body["humedades"], json!([]));
    assert_eq!(body["fechas"], json!([]));
    assert_eq!(body["latest"]["temperatura"], 0.0);
    assert_eq!(body["latest"]["humedad"], 0.0);
    assert_eq!(body["message"], "No se encontraron lecturas en la última hora");
}

#[tokio::test]
async fn posted_reading_comes_back_last_with_latest_equal() {
    let (url, _table) = start_fake_storage(Vec::new()).await;
    let app = app(&url);

    for body in [
        r#"{"temperatura": 20.0, "humedad": 50.0}"#,
        r#"{"temperatura": 23.5, "humedad": 61.0}"#,
    ] {
        let resp = app.clone().oneshot(post_lectura(body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = app.oneshot(get_recent()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["temperaturas"], json!([20.0, 23.5]));
    assert_eq!(body["humedades"], json!([50.0, 61.0]));
    assert_eq!(body["latest"]["temperatura"], 23.5);
    assert_eq!(body["latest"]["humedad"], 61.0);
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn corrupted_row_degrades_to_zero_without_aborting() {
    let seed = vec![
        json!({"id": 1, "temperatura": "averiado", "humedad": 48.0,
               "fecha_hora": "2025-06-01T10:00:00+02:00"}),
        json!({"id": 2, "temperatura": 21.0, "humedad": 52.0,
               "fecha_hora": "2025-06-01T10:30:00+02:00"}),
    ];
    let (url, _table) = start_fake_storage(seed).await;
    let app = app(&url);

    let resp = app.oneshot(get_recent()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["temperaturas"], json!([0.0, 21.0]));
    assert_eq!(body["humedades"], json!([48.0, 52.0]));
    assert_eq!(body["latest"]["temperatura"], 21.0);
}

#[tokio::test]
async fn storage_failure_surfaces_as_server_error() {
    let url = start_broken_storage().await;
    let app = app(&url);

    let resp = app
        .clone()
        .oneshot(post_lectura(r#"{"temperatura": 21.5, "humedad": 55.0}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(resp).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Error al guardar en la base de datos:"));

    let resp = app.oneshot(get_recent()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(resp).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Error al obtener lecturas recientes:"));
}

#[tokio::test]
async fn dashboard_renders_html_with_the_data() {
    let (url, _table) = start_fake_storage(vec![json!({
        "id": 1, "temperatura": 21.5, "humedad": 55.0,
        "fecha_hora": "2025-06-01T10:00:00+02:00",
    })])
    .await;
    let app = app(&url);

    let resp = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let ct = resp
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(ct.contains("text/html"));

    let bytes = to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("Panel del invernadero"));
    assert!(page.contains("21.5"));
}

#[tokio::test]
async fn dashboard_storage_failure_renders_error_page() {
    let url = start_broken_storage().await;
    let app = app(&url);

    let resp = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("No se pudo cargar el panel"));
    assert!(page.contains("Error al obtener lecturas recientes:"));
}
