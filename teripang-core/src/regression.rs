//! Ordinary least squares fit of `y = slope * x + intercept`.

use crate::error::TeripangError;
use serde::Serialize;
use tracing::warn;

/// Result of a closed-form least squares fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, `1 - SS_res / SS_tot`.
    pub r2: f64,
    /// Set when all `x` values coincide. The slope is then reported as zero,
    /// the intercept as the mean of `y`, and `r2` as zero.
    pub degenerate: bool,
}

impl LinearFit {
    pub const MIN_POINTS: usize = 2;

    /// Fits a line through `(x, y)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`TeripangError::InsufficientData`] for fewer than two points.
    pub fn fit(points: &[(f64, f64)]) -> Result<Self, TeripangError> {
        if points.len() < Self::MIN_POINTS {
            return Err(TeripangError::InsufficientData {
                context: "linear regression",
                required: Self::MIN_POINTS,
                found: points.len(),
            });
        }

        let n = points.len() as f64;
        let (sum_x, sum_y, sum_xy, sum_xx) = points.iter().fold(
            (0.0, 0.0, 0.0, 0.0),
            |(sx, sy, sxy, sxx), &(x, y)| (sx + x, sy + y, sxy + x * y, sxx + x * x),
        );
        let mean_y = sum_y / n;
        let denominator = n * sum_xx - sum_x * sum_x;

        // Relative to the magnitude of the sums; cancellation leaves a few ulps
        // behind when every x is identical.
        if denominator.abs() <= 1e-12 * (n * sum_xx).abs() {
            warn!(points = points.len(), "x values have no variance; regression is degenerate");
            return Ok(Self {
                slope: 0.0,
                intercept: mean_y,
                r2: 0.0,
                degenerate: true,
            });
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;
        let (ss_res, ss_tot) = points.iter().fold((0.0, 0.0), |(res, tot), &(x, y)| {
            let predicted = slope * x + intercept;
            (res + (y - predicted).powi(2), tot + (y - mean_y).powi(2))
        });
        let r2 = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

        Ok(Self {
            slope,
            intercept,
            r2,
            degenerate: false,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}
