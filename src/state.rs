use std::sync::Arc;

use crate::domains::distance::{
  model::{BatchDistanceRequest, BatchDistanceResponse, DistanceRequest, DistanceResponse},
  service::{DistanceService, DistanceServiceError, DistanceServiceImpl},
};

pub trait AppState: Clone + Send + Sync + 'static {
  fn compute_distance(
    &self,
    req: DistanceRequest,
  ) -> impl std::future::Future<Output = Result<DistanceResponse, DistanceServiceError>> + Send;
  fn batch_distance(
    &self,
    req: BatchDistanceRequest,
  ) -> impl std::future::Future<Output = Result<BatchDistanceResponse, DistanceServiceError>> + Send;
}

#[derive(Clone)]
pub struct SharedAppState {
  pub distance_service: Arc<DistanceServiceImpl>,
}

impl SharedAppState {
  pub fn new() -> Self {
    let distance_service = Arc::new(DistanceServiceImpl::new());

    Self { distance_service }
  }
}

impl Default for SharedAppState {
  fn default() -> Self {
    Self::new()
  }
}

impl AppState for SharedAppState {
  async fn compute_distance(&self, req: DistanceRequest) -> Result<DistanceResponse, DistanceServiceError> {
    self.distance_service.compute_distance(req).await
  }

  async fn batch_distance(&self, req: BatchDistanceRequest) -> Result<BatchDistanceResponse, DistanceServiceError> {
    self.distance_service.batch_distance(req).await
  }
}
