use serde::{Deserialize, Serialize};

use crate::error::MeasureError;
use crate::{evaluate, threshold};

/// Result of comparing one probe against one enrolled model. Higher = more similar.
pub type Score = f64;

/// Decision boundary: a score `>= threshold` is accepted.
pub type Threshold = f64;

/// Genuine and impostor score populations produced by one scoring run.
///
/// Only the multiset of values matters downstream; insertion order is
/// irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    /// Probe compared against its own identity's model.
    pub genuine: Vec<Score>,
    /// Probe compared against a different identity's model.
    pub impostor: Vec<Score>,
}

impl ScoreSet {
    pub fn new(genuine: Vec<Score>, impostor: Vec<Score>) -> Self {
        Self { genuine, impostor }
    }

    /// Total number of comparisons in both populations.
    pub fn len(&self) -> usize {
        self.genuine.len() + self.impostor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genuine.is_empty() && self.impostor.is_empty()
    }

    /// Equal-error-rate threshold. See [`threshold::solve_eer`].
    pub fn solve_eer(&self) -> Result<Threshold, MeasureError> {
        threshold::solve_eer(&self.genuine, &self.impostor)
    }

    /// FAR/FRR at `threshold`. See [`evaluate::evaluate`].
    pub fn evaluate(&self, threshold: Threshold) -> OperatingPoint {
        evaluate::evaluate(&self.genuine, &self.impostor, threshold)
    }

    /// ROC curve over `num_points` evenly spaced thresholds.
    pub fn roc_curve(&self, num_points: usize) -> Result<RocCurve, MeasureError> {
        evaluate::roc_curve(&self.genuine, &self.impostor, num_points)
    }

    /// EER threshold together with the operating point it produces.
    pub fn eer_report(&self) -> Result<EerReport, MeasureError> {
        evaluate::eer_report(&self.genuine, &self.impostor)
    }
}

/// Error rates at one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    pub threshold: Threshold,
    /// Fraction of impostor scores `>= threshold`.
    pub far: f64,
    /// Fraction of genuine scores `< threshold`.
    pub frr: f64,
    /// Set when at least one population was empty, so a reported 0.0 rate
    /// is vacuous rather than measured.
    pub degenerate: bool,
}

impl OperatingPoint {
    /// Correct accept rate, `1 - FRR`.
    pub fn car(&self) -> f64 {
        1.0 - self.frr
    }

    /// Half total error rate, `(FAR + FRR) / 2`.
    pub fn hter(&self) -> f64 {
        (self.far + self.frr) / 2.0
    }
}

/// A single point on the ROC curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    pub threshold: Threshold,
    pub far: f64,
    /// Correct accept rate, `1 - FRR`.
    pub car: f64,
}

impl RocPoint {
    pub fn frr(&self) -> f64 {
        1.0 - self.car
    }
}

/// ROC curve ordered by increasing threshold, so both FAR and CAR are
/// non-increasing along `points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    pub points: Vec<RocPoint>,
}

impl RocCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Area under the (FAR, CAR) curve by the trapezoidal rule.
    ///
    /// The curve is not extended to (0, 0) or (1, 1); a sweep that does not
    /// reach those corners underestimates the area.
    pub fn auc(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| {
                let (hi, lo) = (&w[0], &w[1]);
                (hi.far - lo.far) * (hi.car + lo.car) / 2.0
            })
            .sum()
    }
}

/// Operating point at the EER threshold, as printed by the evaluation tools.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EerReport {
    pub operating_point: OperatingPoint,
    /// `(FAR + FRR) / 2` at the EER threshold.
    pub eer: f64,
    pub genuine_count: usize,
    pub impostor_count: usize,
}

impl EerReport {
    pub fn threshold(&self) -> Threshold {
        self.operating_point.threshold
    }
}
