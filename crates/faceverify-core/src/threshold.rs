//! Decision thresholds from genuine/impostor score populations.
//!
//! FAR and FRR are step functions of the threshold, so every solver here
//! sweeps a discrete candidate set in increasing order rather than looking
//! for a closed-form crossing. Candidates are every distinct score plus the
//! midpoint between each pair of consecutive distinct scores. Acceptance is
//! inclusive (`score >= threshold`) throughout.
//!
//! Costs are compared as exact integer cross-products of the error counts,
//! so ties are detected without floating point noise and always resolve to
//! the smallest candidate.

use crate::error::{MeasureError, Population};
use crate::types::{Score, Threshold};

/// Both populations, sorted ascending, with O(log n) error-count lookups.
pub(crate) struct SortedScores {
    genuine: Vec<Score>,
    impostor: Vec<Score>,
}

impl SortedScores {
    /// Copy and sort both populations. Rejects NaN; emptiness is left to callers.
    pub(crate) fn new(genuine: &[Score], impostor: &[Score]) -> Result<Self, MeasureError> {
        Ok(Self {
            genuine: sorted(genuine, Population::Genuine)?,
            impostor: sorted(impostor, Population::Impostor)?,
        })
    }

    /// Number of impostor scores accepted at `t`.
    pub(crate) fn false_accepts(&self, t: Threshold) -> usize {
        self.impostor.len() - self.impostor.partition_point(|&s| s < t)
    }

    /// Number of genuine scores rejected at `t`.
    pub(crate) fn false_rejects(&self, t: Threshold) -> usize {
        self.genuine.partition_point(|&s| s < t)
    }

    pub(crate) fn genuine_len(&self) -> usize {
        self.genuine.len()
    }

    pub(crate) fn impostor_len(&self) -> usize {
        self.impostor.len()
    }

    /// Smallest and largest score over both populations.
    pub(crate) fn range(&self) -> Option<(Score, Score)> {
        let min = match (self.genuine.first(), self.impostor.first()) {
            (Some(&g), Some(&i)) => g.min(i),
            (Some(&g), None) => g,
            (None, Some(&i)) => i,
            (None, None) => return None,
        };
        let max = match (self.genuine.last(), self.impostor.last()) {
            (Some(&g), Some(&i)) => g.max(i),
            (Some(&g), None) => g,
            (None, Some(&i)) => i,
            (None, None) => return None,
        };
        Some((min, max))
    }

    /// Distinct scores of both populations merged, ascending.
    fn distinct(&self) -> Vec<Score> {
        let mut merged = Vec::with_capacity(self.genuine.len() + self.impostor.len());
        let (mut gi, mut ii) = (0, 0);
        while gi < self.genuine.len() || ii < self.impostor.len() {
            let next = match (self.genuine.get(gi), self.impostor.get(ii)) {
                (Some(&g), Some(&i)) if g <= i => {
                    gi += 1;
                    g
                }
                (_, Some(&i)) => {
                    ii += 1;
                    i
                }
                (Some(&g), None) => {
                    gi += 1;
                    g
                }
                (None, None) => break,
            };
            if merged.last() != Some(&next) {
                merged.push(next);
            }
        }
        merged
    }

    /// Candidate thresholds: distinct scores interleaved with their midpoints.
    pub(crate) fn candidates(&self) -> Vec<Threshold> {
        let distinct = self.distinct();
        let mut out = Vec::with_capacity(distinct.len() * 2);
        for (i, &value) in distinct.iter().enumerate() {
            out.push(value);
            if let Some(&next) = distinct.get(i + 1) {
                if let Some(mid) = midpoint(value, next) {
                    out.push(mid);
                }
            }
        }
        out
    }

    /// First candidate minimizing `cost(false_accepts, false_rejects)`.
    fn sweep<K: Ord>(&self, cost: impl Fn(usize, usize) -> K) -> Option<(Threshold, K)> {
        let mut best: Option<(Threshold, K)> = None;
        for t in self.candidates() {
            let key = cost(self.false_accepts(t), self.false_rejects(t));
            let better = match &best {
                None => true,
                Some((_, best_key)) => key < *best_key,
            };
            if better {
                best = Some((t, key));
            }
        }
        best
    }

    /// Fail when every score is the same single value.
    fn ensure_separable(&self) -> Result<(), MeasureError> {
        match self.range() {
            Some((min, max)) if min == max => {
                tracing::warn!(value = min, "all scores identical; no separating threshold");
                Err(MeasureError::DegenerateScores(min))
            }
            _ => Ok(()),
        }
    }
}

fn sorted(scores: &[Score], population: Population) -> Result<Vec<Score>, MeasureError> {
    if scores.iter().any(|s| s.is_nan()) {
        return Err(MeasureError::NonFiniteScore(population));
    }
    let mut v = scores.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    // total_cmp orders -0.0 before 0.0; they compare equal for thresholds.
    Ok(v)
}

/// Midpoint strictly between `a < b`, if one is representable.
fn midpoint(a: Score, b: Score) -> Option<Threshold> {
    if !a.is_finite() || !b.is_finite() {
        return None;
    }
    let mid = a / 2.0 + b / 2.0;
    (mid > a && mid < b).then_some(mid)
}

/// Smallest `f64` strictly greater than `x`. Infinity maps to itself.
fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

fn require_non_empty(scores: &[Score], population: Population) -> Result<(), MeasureError> {
    if scores.is_empty() {
        return Err(MeasureError::EmptyPopulation(population));
    }
    Ok(())
}

/// Threshold at which FAR and FRR are closest (the equal error rate point).
///
/// Minimizes `|FAR(t) - FRR(t)|` over the candidate set; among equal gaps
/// the smallest `t` wins, so repeated calls on the same input agree.
///
/// # Errors
///
/// `EmptyPopulation` if either side is empty, `NonFiniteScore` on NaN, and
/// `DegenerateScores` when all scores share one value.
pub fn solve_eer(genuine: &[Score], impostor: &[Score]) -> Result<Threshold, MeasureError> {
    require_non_empty(genuine, Population::Genuine)?;
    require_non_empty(impostor, Population::Impostor)?;

    let scores = SortedScores::new(genuine, impostor)?;
    scores.ensure_separable()?;

    let ng = scores.genuine_len() as u128;
    let ni = scores.impostor_len() as u128;
    // |fa/ni - fr/ng| scaled by ni*ng.
    let (threshold, _) = scores
        .sweep(|fa, fr| (fa as u128 * ng).abs_diff(fr as u128 * ni))
        .ok_or(MeasureError::EmptyPopulation(Population::Combined))?;

    tracing::debug!(
        threshold,
        far = scores.false_accepts(threshold) as f64 / ni as f64,
        frr = scores.false_rejects(threshold) as f64 / ng as f64,
        "solved EER threshold"
    );
    Ok(threshold)
}

/// Threshold minimizing the half total error rate `(FAR + FRR) / 2`.
///
/// Same candidate set, conventions and errors as [`solve_eer`].
pub fn min_hter_threshold(genuine: &[Score], impostor: &[Score]) -> Result<Threshold, MeasureError> {
    require_non_empty(genuine, Population::Genuine)?;
    require_non_empty(impostor, Population::Impostor)?;

    let scores = SortedScores::new(genuine, impostor)?;
    scores.ensure_separable()?;

    let ng = scores.genuine_len() as u128;
    let ni = scores.impostor_len() as u128;
    let (threshold, _) = scores
        .sweep(|fa, fr| fa as u128 * ng + fr as u128 * ni)
        .ok_or(MeasureError::EmptyPopulation(Population::Combined))?;

    tracing::debug!(threshold, "solved minimum HTER threshold");
    Ok(threshold)
}

/// Smallest candidate threshold whose FAR does not exceed `far_target`.
///
/// Only the impostor population must be non-empty; genuine scores still
/// contribute candidates. When no candidate reaches the target, the value
/// just above the highest impostor score is returned so FAR drops to zero.
///
/// # Errors
///
/// `InvalidRate` unless `0 <= far_target <= 1`, `EmptyPopulation` for an
/// empty impostor side, `NonFiniteScore` on NaN. `UnreachableRate` when the
/// target needs rejecting impostors scored `+inf`, which every threshold
/// accepts.
pub fn far_threshold(
    genuine: &[Score],
    impostor: &[Score],
    far_target: f64,
) -> Result<Threshold, MeasureError> {
    if !(0.0..=1.0).contains(&far_target) {
        return Err(MeasureError::InvalidRate(far_target));
    }
    require_non_empty(impostor, Population::Impostor)?;

    let scores = SortedScores::new(genuine, impostor)?;
    let ni = scores.impostor_len() as f64;

    let found = scores
        .candidates()
        .into_iter()
        .find(|&t| scores.false_accepts(t) as f64 / ni <= far_target);
    let threshold = match found {
        Some(t) => t,
        None => {
            let highest = scores.impostor[scores.impostor.len() - 1];
            if highest == f64::INFINITY {
                return Err(MeasureError::UnreachableRate(far_target));
            }
            next_up(highest)
        }
    };

    tracing::debug!(threshold, far_target, "solved FAR threshold");
    Ok(threshold)
}
