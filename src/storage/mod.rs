pub mod models;

use anyhow::{anyhow, bail, Result};
use models::{NewReading, StoredReading};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

const TABLE: &str = "lectura";

// Client for the hosted Supabase table, speaking its PostgREST dialect.
// Built once at startup and shared read-only by every request.
#[derive(Clone, Debug)]
pub struct Storage {
    client: reqwest::Client,
    base_url: String,
}

impl Storage {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(api_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))?,
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::new(5, 0))
            .build()?;
        info!("Opened storage client for {}", base_url);
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TABLE)
    }

    // Returns the stored row, with the id and fecha_hora the table assigned.
    pub async fn insert_reading(&self, reading: &NewReading) -> Result<Value> {
        let response = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(reading)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            bail!("{} {}", status, body.trim());
        }
        debug!("insert response: {}", body.trim());
        // PostgREST wraps the inserted row in a one element array
        let mut rows: Vec<Value> = serde_json::from_str(&body)?;
        if rows.is_empty() {
            return Err(anyhow!("no se pudo guardar la lectura"));
        }
        Ok(rows.remove(0))
    }

    // All rows with fecha_hora on or after `since`, oldest first.
    pub async fn readings_since(&self, since: &str) -> Result<Vec<StoredReading>> {
        let response = self
            .client
            .get(self.table_url())
            .query(&[
                ("select", "*"),
                ("fecha_hora", &format!("gte.{since}")),
                ("order", "fecha_hora.asc"),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("{} {}", status, body.trim());
        }
        let rows = response.json::<Vec<StoredReading>>().await?;
        debug!("fetched {} rows since {}", rows.len(), since);
        Ok(rows)
    }
}
