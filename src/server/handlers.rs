use super::error::ApiError;
use crate::readings::{
    self, RecentReadings, MAX_HUMIDITY, MAX_TEMPERATURE, MIN_HUMIDITY, MIN_TEMPERATURE,
};
use crate::storage::models::NewReading;
use crate::storage::Storage;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use super::pages;

const BAD_CONTENT_TYPE: &str = "Content-Type debe ser application/json";
const NO_JSON_DATA: &str = "No se recibieron datos JSON válidos";
const NOT_AN_OBJECT: &str = "Los datos deben ser un objeto JSON";
const TEMPERATURE_RANGE: &str = "Temperatura fuera del rango válido (-50°C a 100°C)";
const HUMIDITY_RANGE: &str = "Humedad fuera del rango válido (0% a 100%)";

// POST /lectura
pub async fn create_reading(
    State(storage): State<Storage>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let reading = validate_payload(content_type(&headers), &body)?;
    let stored = storage.insert_reading(&reading).await.map_err(|e| {
        error!("insert failed: {e:#}");
        ApiError::Storage(format!("Error al guardar en la base de datos: {e}"))
    })?;
    info!(
        "stored reading {:.1} °C / {:.1} %",
        reading.temperatura, reading.humedad
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Lectura guardada exitosamente",
            "data": stored,
        })),
    ))
}

// GET /api/lecturas_recientes
pub async fn recent_readings(
    State(storage): State<Storage>,
) -> Result<Json<RecentReadings>, ApiError> {
    Ok(Json(fetch_recent(&storage).await?))
}

// GET /
pub async fn dashboard(State(storage): State<Storage>) -> Response {
    match fetch_recent(&storage).await {
        Ok(data) => Html(pages::dashboard(&data)).into_response(),
        Err(e) => {
            let page = Html(pages::error(&e.message()));
            (StatusCode::INTERNAL_SERVER_ERROR, page).into_response()
        }
    }
}

// Both presentation modes share this fetch of the last Madrid hour.
async fn fetch_recent(storage: &Storage) -> Result<RecentReadings, ApiError> {
    let since = readings::window_start();
    let rows = storage.readings_since(&since).await.map_err(|e| {
        error!("select failed: {e:#}");
        ApiError::Storage(format!("Error al obtener lecturas recientes: {e}"))
    })?;
    debug!("{} readings since {}", rows.len(), since);
    Ok(RecentReadings::from_rows(&rows))
}

fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
}

// An empty object, empty array, empty string, zero or false carries no
// reading; treated the same as a missing body.
fn is_empty_payload(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

fn require_field<'a>(
    data: &'a serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, ApiError> {
    match data.get(field) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(ApiError::MissingField(field)),
    }
}

fn validate_payload(content_type: Option<&str>, body: &[u8]) -> Result<NewReading, ApiError> {
    let is_json = content_type
        .map(|value| value.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false);
    if !is_json {
        return Err(ApiError::MalformedRequest(BAD_CONTENT_TYPE));
    }

    let data: Value =
        serde_json::from_slice(body).map_err(|_| ApiError::MalformedRequest(NO_JSON_DATA))?;
    if is_empty_payload(&data) {
        return Err(ApiError::MalformedRequest(NO_JSON_DATA));
    }
    let data = data
        .as_object()
        .ok_or(ApiError::MalformedRequest(NOT_AN_OBJECT))?;

    let temperatura = require_field(data, "temperatura")?;
    let humedad = require_field(data, "humedad")?;

    let temperatura = readings::parse_decimal(temperatura).ok_or(ApiError::InvalidType)?;
    let humedad = readings::parse_decimal(humedad).ok_or(ApiError::InvalidType)?;

    if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperatura) {
        return Err(ApiError::OutOfRange(TEMPERATURE_RANGE));
    }
    if !(MIN_HUMIDITY..=MAX_HUMIDITY).contains(&humedad) {
        return Err(ApiError::OutOfRange(HUMIDITY_RANGE));
    }

    Ok(NewReading {
        temperatura,
        humedad,
    })
}
