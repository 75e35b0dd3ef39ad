use crate::storage::models::StoredReading;
use chrono::{Duration, Utc};
use chrono_tz::Europe::Madrid;
use serde::Serialize;
use serde_json::Value;

pub const MIN_TEMPERATURE: f64 = -50.0;
pub const MAX_TEMPERATURE: f64 = 100.0;
pub const MIN_HUMIDITY: f64 = 0.0;
pub const MAX_HUMIDITY: f64 = 100.0;

pub const EMPTY_WINDOW_MESSAGE: &str = "No se encontraron lecturas en la última hora";

// The dashboard window is anchored in Madrid local time, where the
// greenhouse lives. Not an UTC offset: the hour must follow DST.
pub fn window_start() -> String {
    let madrid_now = Utc::now().with_timezone(&Madrid);
    (madrid_now - Duration::hours(1)).to_rfc3339()
}

// Both endpoints convert with the same rule: JSON numbers and numeric
// strings count as decimals, anything else does not.
pub fn parse_decimal(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

// Retrieval tolerates corrupted historic rows; a bad field becomes 0.0
// instead of aborting the whole request.
pub fn coerce_decimal_or_zero(value: &Value) -> f64 {
    parse_decimal(value).unwrap_or(0.0)
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Latest {
    pub temperatura: f64,
    pub humedad: f64,
}

// The shape both the JSON API and the dashboard consume: three parallel
// sequences ordered oldest to newest, plus the newest reading on its own.
#[derive(Serialize, Clone, Debug)]
pub struct RecentReadings {
    pub temperaturas: Vec<f64>,
    pub humedades: Vec<f64>,
    pub fechas: Vec<String>,
    pub latest: Latest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RecentReadings {
    pub fn empty() -> Self {
        Self {
            temperaturas: Vec::new(),
            humedades: Vec::new(),
            fechas: Vec::new(),
            latest: Latest {
                temperatura: 0.0,
                humedad: 0.0,
            },
            message: Some(EMPTY_WINDOW_MESSAGE.to_string()),
        }
    }

    pub fn from_rows(rows: &[StoredReading]) -> Self {
        if rows.is_empty() {
            return Self::empty();
        }
        let mut temperaturas = Vec::with_capacity(rows.len());
        let mut humedades = Vec::with_capacity(rows.len());
        let mut fechas = Vec::with_capacity(rows.len());
        for row in rows {
            temperaturas.push(coerce_decimal_or_zero(&row.temperatura));
            humedades.push(coerce_decimal_or_zero(&row.humedad));
            fechas.push(row.fecha_hora.as_str().unwrap_or_default().to_string());
        }
        let last = &rows[rows.len() - 1];
        let latest = Latest {
            temperatura: coerce_decimal_or_zero(&last.temperatura),
            humedad: coerce_decimal_or_zero(&last.humedad),
        };
        Self {
            temperaturas,
            humedades,
            fechas,
            latest,
            message: None,
        }
    }
}
