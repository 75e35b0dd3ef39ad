use serde::{Deserialize, Serialize};
use serde_json::Value;

// What the ingestion endpoint writes. The table assigns id and fecha_hora.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NewReading {
    pub temperatura: f64,
    pub humedad: f64,
}

// One row of the lectura table as the hosted API returns it. Fields stay
// loosely typed: historic rows may carry corrupted values and retrieval
// must degrade per field instead of failing the whole request.
#[derive(Deserialize, Clone, Debug)]
pub struct StoredReading {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub temperatura: Value,
    #[serde(default)]
    pub humedad: Value,
    #[serde(default)]
    pub fecha_hora: Value,
}
