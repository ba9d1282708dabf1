use super::model::{Algorithm, BatchQuery, BatchResult, Coordinate, DistanceQuery, DistanceResult, RankedTarget, Unit};
use crate::utils::geo::{haversine_distance, vincenty_distance};

/// Distance in kilometres plus the algorithm that actually produced it.
fn kilometers_between(a: &Coordinate, b: &Coordinate, algorithm: Algorithm) -> (f64, Algorithm) {
  let (lat1, lon1, lat2, lon2) = (a.latitude(), a.longitude(), b.latitude(), b.longitude());

  match algorithm {
    Algorithm::GreatCircle => (haversine_distance(lat1, lon1, lat2, lon2), Algorithm::GreatCircle),
    Algorithm::Ellipsoidal => match vincenty_distance(lat1, lon1, lat2, lon2).kilometers() {
      Some(km) => (km, Algorithm::Ellipsoidal),
      None => {
        tracing::warn!(
          "Vincenty did not converge for ({}, {}) -> ({}, {}), falling back to haversine",
          lat1,
          lon1,
          lat2,
          lon2
        );
        (haversine_distance(lat1, lon1, lat2, lon2), Algorithm::GreatCircle)
      }
    },
  }
}

fn measure(a: &Coordinate, b: &Coordinate, algorithm: Algorithm, unit: Unit) -> DistanceResult {
  let (km, algorithm_used) = kilometers_between(a, b, algorithm);

  DistanceResult {
    value: unit.from_kilometers(km),
    unit,
    algorithm_used,
  }
}

pub fn compute_distance(query: &DistanceQuery) -> DistanceResult {
  measure(&query.point_a, &query.point_b, query.algorithm, query.unit)
}

/// Measures every target from the reference and orders them nearest first.
///
/// Ties keep their input order.
pub fn rank_targets(query: &BatchQuery) -> BatchResult {
  let reference = query.reference();

  let mut ranked: Vec<RankedTarget> = query
    .targets()
    .iter()
    .enumerate()
    .map(|(index, target)| RankedTarget {
      label: target
        .label()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Point {}", index + 1)),
      target: target.clone(),
      result: measure(reference, target, query.algorithm, query.unit),
    })
    .collect();

  // `sort_by` is stable.
  ranked.sort_by(|a, b| a.result.value.total_cmp(&b.result.value));

  BatchResult {
    reference: reference.clone(),
    count: ranked.len(),
    ranked,
  }
}
