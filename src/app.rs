use axum::{response::Html, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{domains::distance::rest::distance_routes, state::SharedAppState};

pub fn create_app(state: SharedAppState) -> Router {
  Router::new()
    .route("/", get(index_handler))
    .route("/health", get(health_handler))
    .nest("/api/v1", distance_routes())
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

pub async fn index_handler() -> Html<&'static str> {
  Html(INDEX_HTML)
}

pub async fn health_handler() -> Json<Value> {
  Json(json!({
    "status": "healthy",
    "message": "Great-circle distance API is running",
  }))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Geodesic Distance API</title>
</head>
<body>
  <h1>Geodesic Distance API</h1>
  <p>Shortest surface distance between coordinates, by haversine or Vincenty.</p>

  <h2>Endpoints</h2>
  <ul>
    <li><code>POST /api/v1/distance</code> <code>{"lat1": 41.0082, "lon1": 28.9784, "lat2": 39.9334, "lon2": 32.8597, "method": "haversine", "unit": "km"}</code></li>
    <li><code>GET /api/v1/distance?lat1=..&amp;lon1=..&amp;lat2=..&amp;lon2=..&amp;method=..&amp;unit=..</code></li>
    <li><code>POST /api/v1/batch-distance</code> <code>{"reference_point": {"lat": .., "lon": .., "name": ..}, "target_points": [..]}</code></li>
    <li><code>GET /health</code></li>
  </ul>
  <p><code>method</code>: <code>haversine</code> | <code>vincenty</code>. <code>unit</code>: <code>km</code> | <code>miles</code> | <code>nautical_miles</code>.</p>

  <h2>Sample coordinates</h2>
  <ul>
    <li>Istanbul: 41.0082, 28.9784</li>
    <li>Ankara: 39.9334, 32.8597</li>
    <li>Izmir: 38.4192, 27.1287</li>
    <li>Antalya: 36.8969, 30.7133</li>
  </ul>
</body>
</html>
"#;
