use std::f64::consts::PI;

/// Mean Earth radius used by the spherical model.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// WGS-84 semi-major axis in metres.
pub const WGS84_A: f64 = 6378137.0;
/// WGS-84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257223563;
/// WGS-84 semi-minor axis in metres.
pub const WGS84_B: f64 = (1.0 - WGS84_F) * WGS84_A;

const CONVERGENCE_TOLERANCE: f64 = 1e-12;
const MAX_ITERATIONS: usize = 100;

/// Great-circle distance between two points on a sphere, in kilometres.
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
  let lat1_rad = lat1 * PI / 180.0;
  let lat2_rad = lat2 * PI / 180.0;
  let delta_lat = (lat2 - lat1) * PI / 180.0;
  let delta_lng = (lng2 - lng1) * PI / 180.0;

  let a = (delta_lat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
  // Rounding can push `a` just past 1 for antipodal points.
  let a = a.clamp(0.0, 1.0);

  let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

  EARTH_RADIUS_KM * c
}

/// Terminal states of the Vincenty inverse iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VincentyOutcome {
  /// The iteration settled; distance in kilometres.
  Converged(f64),
  /// Both points are the same place on the ellipsoid.
  Coincident,
  /// Hit the iteration cap (or went non-finite). Nearly antipodal points end up here.
  Diverged,
}

impl VincentyOutcome {
  pub fn kilometers(self) -> Option<f64> {
    match self {
      VincentyOutcome::Converged(km) => Some(km),
      VincentyOutcome::Coincident => Some(0.0),
      VincentyOutcome::Diverged => None,
    }
  }
}

/// Vincenty's inverse formula on the WGS-84 ellipsoid.
///
/// The caller decides what to do with [`VincentyOutcome::Diverged`]; the distance
/// engine falls back to [`haversine_distance`].
pub fn vincenty_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> VincentyOutcome {
  let f = WGS84_F;
  let l = (lng2 - lng1).to_radians();

  let u1 = ((1.0 - f) * lat1.to_radians().tan()).atan();
  let u2 = ((1.0 - f) * lat2.to_radians().tan()).atan();
  let (sin_u1, cos_u1) = u1.sin_cos();
  let (sin_u2, cos_u2) = u2.sin_cos();

  let mut lambda = l;

  for _ in 0..MAX_ITERATIONS {
    let (sin_lambda, cos_lambda) = lambda.sin_cos();

    let sin_sigma =
      ((cos_u2 * sin_lambda).powi(2) + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2)).sqrt();
    if sin_sigma == 0.0 {
      return VincentyOutcome::Coincident;
    }

    let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
    let sigma = sin_sigma.atan2(cos_sigma);

    let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
    let cos2_alpha = 1.0 - sin_alpha.powi(2);

    // Equatorial line: cos²α vanishes.
    let cos_2sigma_m = if cos2_alpha == 0.0 {
      0.0
    } else {
      cos_sigma - 2.0 * sin_u1 * sin_u2 / cos2_alpha
    };

    let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));

    let lambda_prev = lambda;
    lambda = l
      + (1.0 - c)
        * f
        * sin_alpha
        * (sigma + c * sin_sigma * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

    if !lambda.is_finite() {
      return VincentyOutcome::Diverged;
    }

    if (lambda - lambda_prev).abs() <= CONVERGENCE_TOLERANCE {
      let u_sq = cos2_alpha * (WGS84_A.powi(2) - WGS84_B.powi(2)) / WGS84_B.powi(2);
      let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
      let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

      let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
          + big_b / 4.0
            * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
              - big_b / 6.0 * cos_2sigma_m * (-3.0 + 4.0 * sin_sigma.powi(2)) * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));

      let meters = WGS84_B * big_a * (sigma - delta_sigma);
      if !meters.is_finite() {
        return VincentyOutcome::Diverged;
      }
      return VincentyOutcome::Converged(meters / 1000.0);
    }
  }

  VincentyOutcome::Diverged
}
