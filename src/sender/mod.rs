use crate::storage::models::NewReading;
use anyhow::Result;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{error, info};

// Ranges the greenhouse sensor reports under normal operation
const TEMPERATURE_BASE: f64 = 15.0;
const TEMPERATURE_SPAN: f64 = 20.0;
const HUMIDITY_BASE: f64 = 40.0;
const HUMIDITY_SPAN: f64 = 40.0;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn random_reading() -> NewReading {
    NewReading {
        temperatura: round1(TEMPERATURE_BASE + rand::random::<f64>() * TEMPERATURE_SPAN),
        humedad: round1(HUMIDITY_BASE + rand::random::<f64>() * HUMIDITY_SPAN),
    }
}

// Simulated sensor: posts one reading per cycle, a fixed number of times.
// Every failure is logged and skipped; the next cycle goes on regardless.
pub async fn run(url: &str, count: usize, interval: Duration) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::new(5, 0))
        .build()?;
    for i in 1..=count {
        info!("Lectura {}/{}", i, count);
        let reading = random_reading();
        match client.post(url).json(&reading).send().await {
            Ok(response) if response.status() == StatusCode::CREATED => {
                info!(
                    "Enviada: {:.1} °C, {:.1} %",
                    reading.temperatura, reading.humedad
                );
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                error!("Error: {}, {}", status, body.trim());
            }
            Err(e) => error!("Fallo al enviar: {e}"),
        }
        tokio::time::sleep(interval).await;
    }
    info!("Envío terminado");
    Ok(())
}
