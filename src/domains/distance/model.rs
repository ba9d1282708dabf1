use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::utils::round_to_millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateViolation {
  Latitude,
  Longitude,
  NonNumeric,
}

impl fmt::Display for CoordinateViolation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CoordinateViolation::Latitude => write!(f, "latitude out of [-90,90]"),
      CoordinateViolation::Longitude => write!(f, "longitude out of [-180,180]"),
      CoordinateViolation::NonNumeric => write!(f, "non-numeric input"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoError {
  InvalidCoordinate(CoordinateViolation),
  EmptyTargetSet,
  MissingField(String),
}

impl std::error::Error for GeoError {}

impl fmt::Display for GeoError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GeoError::InvalidCoordinate(violation) => write!(f, "Invalid coordinate: {}", violation),
      GeoError::EmptyTargetSet => write!(f, "Empty target set: at least one target point is required"),
      GeoError::MissingField(field) => write!(f, "Missing field: {}", field),
    }
  }
}

/// A validated point on the Earth's surface.
///
/// Fields are private; build one with [`Coordinate::new`] or from a request type.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
  latitude: f64,
  longitude: f64,
  label: Option<String>,
}

impl Coordinate {
  pub fn new(latitude: f64, longitude: f64, label: Option<String>) -> Result<Self, GeoError> {
    Coordinate::try_from(PointRequest {
      lat: latitude,
      lon: longitude,
      name: label,
    })
  }

  fn checked(latitude: f64, longitude: f64, label: Option<String>) -> Self {
    Self {
      latitude,
      longitude,
      label,
    }
  }

  pub fn latitude(&self) -> f64 {
    self.latitude
  }

  pub fn longitude(&self) -> f64 {
    self.longitude
  }

  pub fn label(&self) -> Option<&str> {
    self.label.as_deref()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Algorithm {
  #[default]
  #[serde(rename = "haversine")]
  GreatCircle,
  #[serde(rename = "vincenty")]
  Ellipsoidal,
}

impl Algorithm {
  pub fn as_str(&self) -> &'static str {
    match self {
      Algorithm::GreatCircle => "haversine",
      Algorithm::Ellipsoidal => "vincenty",
    }
  }
}

impl fmt::Display for Algorithm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Unit {
  #[default]
  #[serde(rename = "km")]
  Kilometers,
  #[serde(rename = "miles")]
  Miles,
  #[serde(rename = "nautical_miles")]
  NauticalMiles,
}

impl Unit {
  fn factor(&self) -> f64 {
    match self {
      Unit::Kilometers => 1.0,
      Unit::Miles => 0.621371,
      Unit::NauticalMiles => 0.539957,
    }
  }

  pub fn from_kilometers(&self, km: f64) -> f64 {
    km * self.factor()
  }

  pub fn to_kilometers(&self, value: f64) -> f64 {
    value / self.factor()
  }

  pub fn label(&self) -> &'static str {
    match self {
      Unit::Kilometers => "km",
      Unit::Miles => "miles",
      Unit::NauticalMiles => "nautical_miles",
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistanceQuery {
  pub point_a: Coordinate,
  pub point_b: Coordinate,
  pub algorithm: Algorithm,
  pub unit: Unit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceResult {
  pub value: f64,
  pub unit: Unit,
  pub algorithm_used: Algorithm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchQuery {
  reference: Coordinate,
  targets: Vec<Coordinate>,
  pub algorithm: Algorithm,
  pub unit: Unit,
}

impl BatchQuery {
  pub fn new(reference: Coordinate, targets: Vec<Coordinate>, algorithm: Algorithm, unit: Unit) -> Result<Self, GeoError> {
    if targets.is_empty() {
      return Err(GeoError::EmptyTargetSet);
    }

    Ok(Self {
      reference,
      targets,
      algorithm,
      unit,
    })
  }

  pub fn reference(&self) -> &Coordinate {
    &self.reference
  }

  pub fn targets(&self) -> &[Coordinate] {
    &self.targets
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedTarget {
  pub label: String,
  pub target: Coordinate,
  pub result: DistanceResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
  pub reference: Coordinate,
  pub ranked: Vec<RankedTarget>,
  pub count: usize,
}

// Wire types

// `validator`'s range check lets NaN through, so finiteness is checked first.
fn ensure_finite(values: &[f64]) -> Result<(), GeoError> {
  if values.iter().all(|value| value.is_finite()) {
    Ok(())
  } else {
    Err(GeoError::InvalidCoordinate(CoordinateViolation::NonNumeric))
  }
}

fn range_violation(errors: ValidationErrors) -> GeoError {
  let latitude_failed = errors.field_errors().keys().any(|field| field.starts_with("lat"));
  if latitude_failed {
    GeoError::InvalidCoordinate(CoordinateViolation::Latitude)
  } else {
    GeoError::InvalidCoordinate(CoordinateViolation::Longitude)
  }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct DistanceRequest {
  #[validate(range(min = -90.0, max = 90.0, message = "latitude out of [-90,90]"))]
  pub lat1: f64,
  #[validate(range(min = -180.0, max = 180.0, message = "longitude out of [-180,180]"))]
  pub lon1: f64,
  #[validate(range(min = -90.0, max = 90.0, message = "latitude out of [-90,90]"))]
  pub lat2: f64,
  #[validate(range(min = -180.0, max = 180.0, message = "longitude out of [-180,180]"))]
  pub lon2: f64,
  #[serde(default)]
  pub method: Algorithm,
  #[serde(default)]
  pub unit: Unit,
}

impl TryFrom<DistanceRequest> for DistanceQuery {
  type Error = GeoError;

  fn try_from(req: DistanceRequest) -> Result<Self, Self::Error> {
    ensure_finite(&[req.lat1, req.lon1, req.lat2, req.lon2])?;
    req.validate().map_err(range_violation)?;

    Ok(Self {
      point_a: Coordinate::checked(req.lat1, req.lon1, None),
      point_b: Coordinate::checked(req.lat2, req.lon2, None),
      algorithm: req.method,
      unit: req.unit,
    })
  }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct PointRequest {
  #[validate(range(min = -90.0, max = 90.0, message = "latitude out of [-90,90]"))]
  pub lat: f64,
  #[validate(range(min = -180.0, max = 180.0, message = "longitude out of [-180,180]"))]
  pub lon: f64,
  pub name: Option<String>,
}

impl TryFrom<PointRequest> for Coordinate {
  type Error = GeoError;

  fn try_from(point: PointRequest) -> Result<Self, Self::Error> {
    ensure_finite(&[point.lat, point.lon])?;
    point.validate().map_err(range_violation)?;

    Ok(Coordinate::checked(point.lat, point.lon, point.name))
  }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchDistanceRequest {
  pub reference_point: PointRequest,
  pub target_points: Vec<PointRequest>,
  #[serde(default)]
  pub method: Algorithm,
  #[serde(default)]
  pub unit: Unit,
}

impl TryFrom<BatchDistanceRequest> for BatchQuery {
  type Error = GeoError;

  fn try_from(req: BatchDistanceRequest) -> Result<Self, Self::Error> {
    let reference = Coordinate::try_from(req.reference_point)?;
    let targets = req
      .target_points
      .into_iter()
      .map(Coordinate::try_from)
      .collect::<Result<Vec<_>, _>>()?;

    BatchQuery::new(reference, targets, req.method, req.unit)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LatLon {
  pub lat: f64,
  pub lon: f64,
}

impl From<&Coordinate> for LatLon {
  fn from(coordinate: &Coordinate) -> Self {
    Self {
      lat: coordinate.latitude(),
      lon: coordinate.longitude(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PointPair {
  pub point1: LatLon,
  pub point2: LatLon,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DistanceResponse {
  pub distance: f64,
  pub unit: Unit,
  pub algorithm: Algorithm,
  pub coordinates: PointPair,
}

impl DistanceResponse {
  pub fn new(query: &DistanceQuery, result: DistanceResult) -> Self {
    Self {
      distance: round_to_millis(result.value),
      unit: result.unit,
      algorithm: result.algorithm_used,
      coordinates: PointPair {
        point1: LatLon::from(&query.point_a),
        point2: LatLon::from(&query.point_b),
      },
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReferencePoint {
  pub name: String,
  pub coordinates: LatLon,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TargetDistance {
  pub target_name: String,
  pub distance: f64,
  pub algorithm: Algorithm,
  pub coordinates: LatLon,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BatchDistanceResponse {
  pub reference_point: ReferencePoint,
  pub distances: Vec<TargetDistance>,
  pub unit: Unit,
  pub algorithm: Algorithm,
  pub total_points: usize,
}

impl BatchDistanceResponse {
  pub fn new(algorithm: Algorithm, unit: Unit, batch: BatchResult) -> Self {
    let reference = &batch.reference;
    let name = reference
      .label()
      .map(str::to_string)
      .unwrap_or_else(|| format!("({:?}, {:?})", reference.latitude(), reference.longitude()));

    let distances = batch
      .ranked
      .iter()
      .map(|entry| TargetDistance {
        target_name: entry.label.clone(),
        distance: round_to_millis(entry.result.value),
        algorithm: entry.result.algorithm_used,
        coordinates: LatLon::from(&entry.target),
      })
      .collect();

    Self {
      reference_point: ReferencePoint {
        name,
        coordinates: LatLon::from(reference),
      },
      distances,
      unit,
      algorithm,
      total_points: batch.count,
    }
  }
}
