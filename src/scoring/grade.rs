// src/scoring/grade.rs

use crate::config;
use crate::error::AppError;

/// Validated pass threshold (nivel de exigencia).
///
/// Must lie strictly between 0 and 100: either endpoint would make one of
/// the curve denominators zero, so the value is rejected up front as a
/// configuration error instead of propagating a NaN into the results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassThreshold(f64);

impl PassThreshold {
    pub fn new(value: f64) -> Result<Self, AppError> {
        if !value.is_finite() || value <= 0.0 || value >= 100.0 {
            return Err(AppError::BadRequest(format!(
                "Pass threshold must lie strictly between 0 and 100, got {}",
                value
            )));
        }
        Ok(PassThreshold(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Maps a correctness percentage to the 1.0-7.0 grading scale.
///
/// Piecewise linear: [0, threshold] maps onto [1.0, 4.0] and
/// (threshold, 100] onto (4.0, 7.0], so `grade_for(t, t)` is exactly the
/// passing grade. Results are rounded to 2 decimals.
pub fn grade_for(percentage: f64, threshold: PassThreshold) -> f64 {
    let exigencia = threshold.value();

    let nota = if percentage <= exigencia {
        let slope = (config::PASSING_GRADE - config::GRADE_MIN) / exigencia;
        config::GRADE_MIN + percentage * slope
    } else {
        let slope = (config::GRADE_MAX - config::PASSING_GRADE) / (100.0 - exigencia);
        config::PASSING_GRADE + (percentage - exigencia) * slope
    };

    round2(nota)
}

/// Half-up rounding to 2 decimals, shared by the curve and the statistics.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
