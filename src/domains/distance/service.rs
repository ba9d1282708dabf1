use async_trait::async_trait;
use std::error::Error;

use super::{
  engine,
  model::{BatchDistanceRequest, BatchDistanceResponse, BatchQuery, DistanceQuery, DistanceRequest, DistanceResponse, GeoError},
};

#[derive(Debug)]
pub enum DistanceServiceError {
  InvalidCoordinate(String),
  EmptyTargetSet(String),
  MissingField(String),
}

impl Error for DistanceServiceError {}

impl std::fmt::Display for DistanceServiceError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      DistanceServiceError::InvalidCoordinate(msg) => write!(f, "Invalid Coordinate: {}", msg),
      DistanceServiceError::EmptyTargetSet(msg) => write!(f, "Empty Target Set: {}", msg),
      DistanceServiceError::MissingField(msg) => write!(f, "Missing Field: {}", msg),
    }
  }
}

impl From<GeoError> for DistanceServiceError {
  fn from(err: GeoError) -> Self {
    match err {
      GeoError::InvalidCoordinate(violation) => DistanceServiceError::InvalidCoordinate(violation.to_string()),
      GeoError::EmptyTargetSet => {
        DistanceServiceError::EmptyTargetSet("at least one target point is required".to_string())
      }
      GeoError::MissingField(field) => DistanceServiceError::MissingField(field),
    }
  }
}

#[async_trait]
pub trait DistanceService: Send + Sync {
  async fn compute_distance(&self, req: DistanceRequest) -> Result<DistanceResponse, DistanceServiceError>;
  async fn batch_distance(&self, req: BatchDistanceRequest) -> Result<BatchDistanceResponse, DistanceServiceError>;
}

#[derive(Debug, Default)]
pub struct DistanceServiceImpl;

impl DistanceServiceImpl {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl DistanceService for DistanceServiceImpl {
  async fn compute_distance(&self, req: DistanceRequest) -> Result<DistanceResponse, DistanceServiceError> {
    let query = DistanceQuery::try_from(req)?;
    let result = engine::compute_distance(&query);

    tracing::debug!(
      "Computed {} {} with {} (requested {})",
      result.value,
      result.unit.label(),
      result.algorithm_used,
      query.algorithm
    );

    Ok(DistanceResponse::new(&query, result))
  }

  async fn batch_distance(&self, req: BatchDistanceRequest) -> Result<BatchDistanceResponse, DistanceServiceError> {
    let query = BatchQuery::try_from(req)?;
    let batch = engine::rank_targets(&query);

    tracing::debug!(
      "Ranked {} targets with {} in {}",
      batch.count,
      query.algorithm,
      query.unit.label()
    );

    Ok(BatchDistanceResponse::new(query.algorithm, query.unit, batch))
  }
}
