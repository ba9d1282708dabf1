use axum::{
  debug_handler,
  extract::{
    rejection::{JsonRejection, QueryRejection},
    Json, Query, State,
  },
  response::Json as JsonResponse,
  routing::{get, post},
  Router,
};

use super::model::{BatchDistanceRequest, BatchDistanceResponse, DistanceRequest, DistanceResponse};
use crate::{
  state::{AppState, SharedAppState},
  AppError,
};

pub fn distance_routes() -> Router<SharedAppState> {
  Router::new()
    .route("/distance", post(compute_distance_handler).get(compute_distance_query_handler))
    .route("/batch-distance", post(batch_distance_handler))
}

#[debug_handler]
pub async fn compute_distance_handler(
  State(state): State<SharedAppState>,
  payload: Result<Json<DistanceRequest>, JsonRejection>,
) -> Result<JsonResponse<DistanceResponse>, AppError> {
  let Json(payload) = payload?;

  state
    .compute_distance(payload)
    .await
    .map(JsonResponse)
    .map_err(Into::into)
}

#[debug_handler]
pub async fn compute_distance_query_handler(
  State(state): State<SharedAppState>,
  query: Result<Query<DistanceRequest>, QueryRejection>,
) -> Result<JsonResponse<DistanceResponse>, AppError> {
  let Query(query) = query?;

  state
    .compute_distance(query)
    .await
    .map(JsonResponse)
    .map_err(Into::into)
}

#[debug_handler]
pub async fn batch_distance_handler(
  State(state): State<SharedAppState>,
  payload: Result<Json<BatchDistanceRequest>, JsonRejection>,
) -> Result<JsonResponse<BatchDistanceResponse>, AppError> {
  let Json(payload) = payload?;

  state
    .batch_distance(payload)
    .await
    .map(JsonResponse)
    .map_err(Into::into)
}

#[cfg(test)]
mod tests {
  use super::super::model::{
    Algorithm, BatchDistanceRequest, BatchDistanceResponse, DistanceRequest, DistanceResponse, PointRequest, Unit,
  };
  use crate::test_support::{app, get, post_json, post_raw};
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tower::ServiceExt;

  fn istanbul_to_ankara(method: Algorithm, unit: Unit) -> DistanceRequest {
    DistanceRequest {
      lat1: 41.0082,
      lon1: 28.9784,
      lat2: 39.9334,
      lon2: 32.8597,
      method,
      unit,
    }
  }

  fn target(lat: f64, lon: f64, name: Option<&str>) -> PointRequest {
    PointRequest {
      lat,
      lon,
      name: name.map(str::to_string),
    }
  }

  #[tokio::test]
  async fn compute_distance_success() {
    let payload = istanbul_to_ankara(Algorithm::GreatCircle, Unit::Kilometers);
    let (status, body) = post_json(app(), "/api/v1/distance", &payload).await;
    assert_eq!(status, StatusCode::OK);

    let response: DistanceResponse = serde_json::from_slice(&body).expect("deserialize response");
    assert_eq!(response.distance, 349.356);
    assert_eq!(response.unit, Unit::Kilometers);
    assert_eq!(response.algorithm, Algorithm::GreatCircle);
    assert_eq!(response.coordinates.point1.lat, 41.0082);
    assert_eq!(response.coordinates.point2.lon, 32.8597);
  }

  #[tokio::test]
  async fn compute_distance_vincenty_in_miles() {
    let payload = istanbul_to_ankara(Algorithm::Ellipsoidal, Unit::Miles);
    let (status, body) = post_json(app(), "/api/v1/distance", &payload).await;
    assert_eq!(status, StatusCode::OK);

    let response: DistanceResponse = serde_json::from_slice(&body).expect("deserialize response");
    assert_eq!(response.unit, Unit::Miles);
    assert_eq!(response.algorithm, Algorithm::Ellipsoidal);
    assert!((response.distance - 350.082 * 0.621371).abs() < 0.01);
  }

  #[tokio::test]
  async fn compute_distance_reports_fallback() {
    let payload = DistanceRequest {
      lat1: 0.0,
      lon1: 0.0,
      lat2: 0.0,
      lon2: 180.0,
      method: Algorithm::Ellipsoidal,
      unit: Unit::Kilometers,
    };
    let (status, body) = post_json(app(), "/api/v1/distance", &payload).await;
    assert_eq!(status, StatusCode::OK);

    let response: DistanceResponse = serde_json::from_slice(&body).expect("deserialize response");
    assert_eq!(response.algorithm, Algorithm::GreatCircle);
    assert_eq!(response.distance, 20015.087);
  }

  #[tokio::test]
  async fn compute_distance_via_query_string() {
    let (status, body) = get(
      app(),
      "/api/v1/distance?lat1=41.0082&lon1=28.9784&lat2=39.9334&lon2=32.8597&unit=nautical_miles",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response: DistanceResponse = serde_json::from_slice(&body).expect("deserialize response");
    assert_eq!(response.unit, Unit::NauticalMiles);
    assert_eq!(response.algorithm, Algorithm::GreatCircle);
  }

  #[tokio::test]
  async fn compute_distance_invalid_latitude() {
    let mut payload = istanbul_to_ankara(Algorithm::GreatCircle, Unit::Kilometers);
    payload.lat1 = 90.0001;
    let (status, body) = post_json(app(), "/api/v1/distance", &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let error: serde_json::Value = serde_json::from_slice(&body).expect("deserialize error");
    assert_eq!(error["error"], "Invalid Coordinate: latitude out of [-90,90]");
    assert_eq!(error["status_code"], 400);
  }

  #[tokio::test]
  async fn compute_distance_missing_field() {
    let (status, body) = post_raw(app(), "/api/v1/distance", r#"{"lat1": 1.0, "lon1": 2.0, "lat2": 3.0}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let error: serde_json::Value = serde_json::from_slice(&body).expect("deserialize error");
    assert_eq!(error["error"], "Missing Field: lon2");
  }

  #[tokio::test]
  async fn compute_distance_without_content_type() {
    let request = Request::builder()
      .method("POST")
      .uri("/api/v1/distance")
      .body(Body::from(r#"{"lat1": 1.0, "lon1": 2.0}"#))
      .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
  }

  #[tokio::test]
  async fn compute_distance_malformed_json() {
    let (status, body) = post_raw(app(), "/api/v1/distance", r#"{"lat1": 1.0,"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let error: serde_json::Value = serde_json::from_slice(&body).expect("deserialize error");
    assert!(error["error"].as_str().unwrap().starts_with("Failed to parse the request body as JSON"));
  }

  #[tokio::test]
  async fn compute_distance_vincenty_antipode_is_finite() {
    let payload = DistanceRequest {
      lat1: -12.0,
      lon1: -180.0,
      lat2: 12.0,
      lon2: 0.0,
      method: Algorithm::Ellipsoidal,
      unit: Unit::Kilometers,
    };
    let (status, body) = post_json(app(), "/api/v1/distance", &payload).await;
    assert_eq!(status, StatusCode::OK);

    let response: DistanceResponse = serde_json::from_slice(&body).expect("deserialize response");
    assert_eq!(response.algorithm, Algorithm::GreatCircle);
    assert_eq!(response.distance, 20015.087);
  }

  #[tokio::test]
  async fn compute_distance_non_numeric() {
    let (status, body) = post_raw(
      app(),
      "/api/v1/distance",
      r#"{"lat1": "north", "lon1": 2.0, "lat2": 3.0, "lon2": 4.0}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let error: serde_json::Value = serde_json::from_slice(&body).expect("deserialize error");
    assert_eq!(error["error"], "Invalid Coordinate: non-numeric input");
  }

  #[tokio::test]
  async fn batch_distance_success() {
    let payload = BatchDistanceRequest {
      reference_point: target(41.0082, 28.9784, Some("İstanbul")),
      target_points: vec![
        target(36.8969, 30.7133, Some("Antalya")),
        target(39.9334, 32.8597, Some("Ankara")),
        target(38.4192, 27.1287, None),
      ],
      method: Algorithm::GreatCircle,
      unit: Unit::Kilometers,
    };
    let (status, body) = post_json(app(), "/api/v1/batch-distance", &payload).await;
    assert_eq!(status, StatusCode::OK);

    let response: BatchDistanceResponse = serde_json::from_slice(&body).expect("deserialize response");
    assert_eq!(response.reference_point.name, "İstanbul");
    assert_eq!(response.total_points, 3);
    assert_eq!(response.algorithm, Algorithm::GreatCircle);

    let names: Vec<&str> = response.distances.iter().map(|d| d.target_name.as_str()).collect();
    assert_eq!(names, vec!["Point 3", "Ankara", "Antalya"]);
    assert!(response.distances.windows(2).all(|w| w[0].distance <= w[1].distance));
  }

  #[tokio::test]
  async fn batch_distance_unnamed_reference() {
    let payload = BatchDistanceRequest {
      reference_point: target(41.0082, 28.9784, None),
      target_points: vec![target(39.9334, 32.8597, None)],
      method: Algorithm::Ellipsoidal,
      unit: Unit::Kilometers,
    };
    let (status, body) = post_json(app(), "/api/v1/batch-distance", &payload).await;
    assert_eq!(status, StatusCode::OK);

    let response: BatchDistanceResponse = serde_json::from_slice(&body).expect("deserialize response");
    assert_eq!(response.reference_point.name, "(41.0082, 28.9784)");
    assert_eq!(response.distances[0].target_name, "Point 1");
    assert_eq!(response.distances[0].algorithm, Algorithm::Ellipsoidal);
  }

  #[tokio::test]
  async fn batch_distance_empty_targets() {
    let payload = BatchDistanceRequest {
      reference_point: target(41.0082, 28.9784, None),
      target_points: Vec::new(),
      method: Algorithm::GreatCircle,
      unit: Unit::Kilometers,
    };
    let (status, body) = post_json(app(), "/api/v1/batch-distance", &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let error: serde_json::Value = serde_json::from_slice(&body).expect("deserialize error");
    assert_eq!(error["error"], "Empty Target Set: at least one target point is required");
  }

  #[tokio::test]
  async fn batch_distance_invalid_target_aborts_batch() {
    let payload = BatchDistanceRequest {
      reference_point: target(41.0082, 28.9784, None),
      target_points: vec![target(39.9334, 32.8597, Some("Ankara")), target(0.0, 180.0001, Some("bad"))],
      method: Algorithm::GreatCircle,
      unit: Unit::Kilometers,
    };
    let (status, body) = post_json(app(), "/api/v1/batch-distance", &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let error: serde_json::Value = serde_json::from_slice(&body).expect("deserialize error");
    assert_eq!(error["error"], "Invalid Coordinate: longitude out of [-180,180]");
  }

  #[tokio::test]
  async fn batch_distance_missing_targets() {
    let (status, body) = post_raw(app(), "/api/v1/batch-distance", r#"{"reference_point": {"lat": 1.0, "lon": 2.0}}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let error: serde_json::Value = serde_json::from_slice(&body).expect("deserialize error");
    assert_eq!(error["error"], "Missing Field: target_points");
  }
}
