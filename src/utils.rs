pub mod error;
pub mod geo;

/// Rounds to 3 decimal places, the precision distances are reported with.
pub fn round_to_millis(value: f64) -> f64 {
  (value * 1000.0).round() / 1000.0
}
