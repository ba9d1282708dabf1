use axum::{
  extract::rejection::{JsonRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;

use crate::domains::distance::{
  model::{CoordinateViolation, GeoError},
  service::DistanceServiceError,
};

#[derive(Debug)]
pub struct AppError {
  pub status_code: StatusCode,
  pub message: String,
}

impl AppError {
  pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status_code,
      message: message.into(),
    }
  }

  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::new(StatusCode::BAD_REQUEST, message)
  }

  /// Maps a field-level deserialization failure onto the domain taxonomy.
  ///
  /// Only absent fields and non-numeric coordinates are reclassified. Anything else,
  /// such as an unknown `method`, keeps axum's own status.
  fn from_data_error(status_code: StatusCode, body_text: String) -> Self {
    if let Some(field) = missing_field_name(&body_text) {
      return DistanceServiceError::from(GeoError::MissingField(field)).into();
    }

    if body_text.contains("expected f64") || body_text.contains("invalid float literal") {
      return DistanceServiceError::from(GeoError::InvalidCoordinate(CoordinateViolation::NonNumeric)).into();
    }

    tracing::debug!("Rejected request: {}", body_text);
    Self::new(status_code, body_text)
  }
}

fn missing_field_name(text: &str) -> Option<String> {
  let rest = text.split_once("missing field `")?.1;
  let (field, _) = rest.split_once('`')?;
  Some(field.to_string())
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let body = Json(json!({
      "error": self.message,
      "status_code": self.status_code.as_u16(),
    }));

    (self.status_code, body).into_response()
  }
}

impl From<JsonRejection> for AppError {
  fn from(rejection: JsonRejection) -> Self {
    match rejection {
      JsonRejection::JsonDataError(err) => AppError::from_data_error(err.status(), err.body_text()),
      other => {
        tracing::debug!("Rejected body: {}", other.body_text());
        AppError::new(other.status(), other.body_text())
      }
    }
  }
}

impl From<QueryRejection> for AppError {
  fn from(rejection: QueryRejection) -> Self {
    match rejection {
      QueryRejection::FailedToDeserializeQueryString(err) => AppError::from_data_error(err.status(), err.body_text()),
      other => {
        tracing::debug!("Rejected query: {}", other.body_text());
        AppError::new(other.status(), other.body_text())
      }
    }
  }
}

impl From<DistanceServiceError> for AppError {
  fn from(error: DistanceServiceError) -> Self {
    let message = error.to_string();
    match error {
      DistanceServiceError::InvalidCoordinate(_) => AppError::bad_request(message),
      DistanceServiceError::EmptyTargetSet(_) => AppError::bad_request(message),
      DistanceServiceError::MissingField(_) => AppError::bad_request(message),
    }
  }
}
