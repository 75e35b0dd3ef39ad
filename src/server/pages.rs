use crate::readings::RecentReadings;

// The dashboard is a single self-contained page: current values, a
// Chart.js line chart and the readings table, refreshed against the JSON
// API every 30 seconds. Timestamps are displayed in Madrid local time.
const DASHBOARD: &str = r#"<!doctype html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Panel del invernadero</title>
<script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.0/dist/chart.umd.min.js"></script>
<style>
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 60rem; color: #203020; }
h1 { margin-bottom: 0.25rem; }
.subtitle { color: #557055; margin-top: 0; }
.cards { display: flex; gap: 1rem; margin: 1.5rem 0; flex-wrap: wrap; }
.card { background: #eef6ee; border-radius: 8px; padding: 1rem 1.5rem; min-width: 10rem; }
.card .value { font-size: 2rem; font-weight: bold; }
.card .label { color: #557055; font-size: 0.85rem; }
.message { background: #fff6e0; border-radius: 8px; padding: 0.75rem 1rem; }
table { border-collapse: collapse; width: 100%; margin-top: 1.5rem; }
th, td { border-bottom: 1px solid #cfe0cf; padding: 0.4rem 0.6rem; text-align: left; }
</style>
</head>
<body>
<h1>Panel del invernadero</h1>
<p class="subtitle">Lecturas de la última hora</p>
<div class="cards">
  <div class="card">
    <div class="value"><span id="currentTemp">--</span> &deg;C</div>
    <div class="label">Temperatura actual</div>
  </div>
  <div class="card">
    <div class="value"><span id="currentHumidity">--</span> %</div>
    <div class="label">Humedad actual</div>
  </div>
  <div class="card">
    <div class="value" id="lastUpdate">--</div>
    <div class="label">Última actualización</div>
  </div>
</div>
<div class="message" id="message" hidden></div>
<canvas id="chart" height="110"></canvas>
<table id="readingsTable">
  <thead>
    <tr><th>Fecha</th><th>Temperatura (&deg;C)</th><th>Humedad (%)</th></tr>
  </thead>
  <tbody></tbody>
</table>
<script>
const INITIAL_DATA = __INITIAL_DATA__;
let chart = null;

function formatMadridDate(value) {
  const date = new Date(value);
  if (isNaN(date)) return value;
  return date.toLocaleString('es-ES', {
    timeZone: 'Europe/Madrid',
    hour: '2-digit', minute: '2-digit', second: '2-digit',
    hourCycle: 'h23',
  });
}

function render(data) {
  document.getElementById('currentTemp').textContent =
      data.latest.temperatura ? data.latest.temperatura.toFixed(1) : '--';
  document.getElementById('currentHumidity').textContent =
      data.latest.humedad ? data.latest.humedad.toFixed(1) : '--';
  document.getElementById('lastUpdate').textContent =
      new Date().toLocaleTimeString('es-ES', { timeZone: 'Europe/Madrid' });

  const message = document.getElementById('message');
  message.hidden = !data.message;
  message.textContent = data.message || '';

  const labels = data.fechas.map(formatMadridDate);
  if (chart === null) {
    chart = new Chart(document.getElementById('chart'), {
      type: 'line',
      data: {
        labels: labels,
        datasets: [
          { label: 'Temperatura (°C)', data: data.temperaturas,
            borderColor: '#d66a3c', tension: 0.2 },
          { label: 'Humedad (%)', data: data.humedades,
            borderColor: '#3c7ad6', tension: 0.2 },
        ],
      },
      options: { animation: false },
    });
  } else {
    chart.data.labels = labels;
    chart.data.datasets[0].data = data.temperaturas;
    chart.data.datasets[1].data = data.humedades;
    chart.update();
  }

  const body = document.querySelector('#readingsTable tbody');
  body.textContent = '';
  data.fechas.forEach((fecha, i) => {
    const tr = document.createElement('tr');
    [formatMadridDate(fecha),
     data.temperaturas[i].toFixed(1),
     data.humedades[i].toFixed(1)].forEach((text) => {
      const td = document.createElement('td');
      td.textContent = text;
      tr.appendChild(td);
    });
    body.appendChild(tr);
  });
}

async function fetchData() {
  try {
    const response = await fetch('/api/lecturas_recientes');
    const data = await response.json();
    if (data.error) {
      console.error('Error al obtener datos:', data.error);
      return;
    }
    render(data);
  } catch (e) {
    console.error('Error al obtener datos:', e);
  }
}

render(INITIAL_DATA);
setInterval(fetchData, 30000);
</script>
</body>
</html>
"#;

const ERROR_PAGE: &str = r#"<!doctype html>
<html lang="es">
<head>
<meta charset="utf-8">
<title>Error del invernadero</title>
</head>
<body style="font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 40rem;">
  <h1 style="color: #b03030;">No se pudo cargar el panel</h1>
  <p>__ERROR__</p>
  <p style="color: #777;">Vuelva a intentarlo en unos segundos.</p>
</body>
</html>
"#;

pub fn dashboard(data: &RecentReadings) -> String {
    let payload = serde_json::to_string(data)
        .unwrap_or_else(|_| r#"{"temperaturas":[],"humedades":[],"fechas":[],"latest":{"temperatura":0.0,"humedad":0.0}}"#.to_string())
        .replace("</", "<\\/");
    DASHBOARD.replace("__INITIAL_DATA__", &payload)
}

pub fn error(message: &str) -> String {
    ERROR_PAGE.replace("__ERROR__", &html_escape(message))
}

// escape html special characters to prevent xss
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
