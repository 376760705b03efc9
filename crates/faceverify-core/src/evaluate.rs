//! FAR/FRR at a threshold and ROC curves over the score range.

use crate::error::{MeasureError, Population};
use crate::threshold::{self, SortedScores};
use crate::types::{EerReport, OperatingPoint, RocCurve, RocPoint, Score, Threshold};

/// `count / total`, or 0.0 by convention when `total` is zero.
fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn operating_point(scores: &SortedScores, threshold: Threshold) -> OperatingPoint {
    OperatingPoint {
        threshold,
        far: rate(scores.false_accepts(threshold), scores.impostor_len()),
        frr: rate(scores.false_rejects(threshold), scores.genuine_len()),
        degenerate: scores.genuine_len() == 0 || scores.impostor_len() == 0,
    }
}

/// FAR and FRR of both populations at `threshold`.
///
/// FAR = |impostor >= t| / |impostor|, FRR = |genuine < t| / |genuine|.
/// A rate over an empty population is 0.0 and flags the result
/// `degenerate`. A NaN score fails both comparisons and is never counted
/// as an error.
pub fn evaluate(genuine: &[Score], impostor: &[Score], threshold: Threshold) -> OperatingPoint {
    let far = rate(impostor.iter().filter(|&&s| s >= threshold).count(), impostor.len());
    let frr = rate(genuine.iter().filter(|&&s| s < threshold).count(), genuine.len());
    let degenerate = genuine.is_empty() || impostor.is_empty();
    if degenerate {
        tracing::warn!(
            genuine = genuine.len(),
            impostor = impostor.len(),
            "empty score population; rate reported as 0.0"
        );
    }
    OperatingPoint { threshold, far, frr, degenerate }
}

/// ROC curve over `num_points` thresholds evenly spaced across
/// `[min, max]` of the combined scores.
///
/// Points are ordered by increasing threshold. The last threshold is
/// exactly `max`; a single point sits at `min`. If one population is
/// empty its rate is 0.0 throughout.
///
/// # Errors
///
/// `InvalidPointCount` for zero points, `EmptyPopulation` when both sides
/// are empty, `NonFiniteScore` on NaN.
pub fn roc_curve(
    genuine: &[Score],
    impostor: &[Score],
    num_points: usize,
) -> Result<RocCurve, MeasureError> {
    if num_points == 0 {
        return Err(MeasureError::InvalidPointCount(num_points));
    }
    let scores = SortedScores::new(genuine, impostor)?;
    let (min, max) = scores
        .range()
        .ok_or(MeasureError::EmptyPopulation(Population::Combined))?;

    let points = sweep_thresholds(min, max, num_points)
        .map(|t| {
            let op = operating_point(&scores, t);
            RocPoint { threshold: t, far: op.far, car: op.car() }
        })
        .collect();

    tracing::debug!(num_points, min, max, "computed ROC curve");
    Ok(RocCurve { points })
}

/// `n` evenly spaced values from `min` to `max` inclusive, non-decreasing.
///
/// Rounding can make consecutive interpolated values step backwards when
/// the range is only a few ulps wide, so each value is floored at its
/// predecessor.
fn sweep_thresholds(min: f64, max: f64, n: usize) -> impl Iterator<Item = f64> {
    let last = n.saturating_sub(1);
    let span = max - min;
    let mut prev = min;
    (0..n).map(move |i| {
        let t = if i == 0 {
            min
        } else if i == last {
            max
        } else {
            let frac = i as f64 / last as f64;
            let t = min + span * frac;
            // Infinite bounds make the span infinite or NaN.
            if t.is_nan() {
                if frac < 0.5 { min } else { max }
            } else {
                t.clamp(min, max)
            }
        };
        let t = t.max(prev);
        prev = t;
        t
    })
}

/// Solve the EER threshold and report the operating point it yields.
///
/// # Errors
///
/// Same as [`threshold::solve_eer`].
pub fn eer_report(genuine: &[Score], impostor: &[Score]) -> Result<EerReport, MeasureError> {
    let threshold = threshold::solve_eer(genuine, impostor)?;
    let scores = SortedScores::new(genuine, impostor)?;
    let operating_point = operating_point(&scores, threshold);

    Ok(EerReport {
        operating_point,
        eer: operating_point.hter(),
        genuine_count: genuine.len(),
        impostor_count: impostor.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate::gaussian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_evaluate_counts() {
        let op = evaluate(&[0.9, 0.4, 0.6, 0.2], &[0.1, 0.5, 0.7], 0.5);
        assert!((op.far - 2.0 / 3.0).abs() < 1e-12);
        assert!((op.frr - 0.5).abs() < 1e-12);
        assert!(!op.degenerate);
        assert_eq!(op.threshold, 0.5);
    }

    #[test]
    fn test_evaluate_empty_impostor_is_degenerate() {
        let op = evaluate(&[0.9, 0.1], &[], 0.5);
        assert_eq!(op.far, 0.0);
        assert!((op.frr - 0.5).abs() < 1e-12);
        assert!(op.degenerate);
    }

    #[test]
    fn test_evaluate_empty_genuine_is_degenerate() {
        let op = evaluate(&[], &[0.9], 0.5);
        assert_eq!(op.frr, 0.0);
        assert_eq!(op.far, 1.0);
        assert!(op.degenerate);
    }

    #[test]
    fn test_rates_monotonic_in_threshold() {
        let genuine = [0.2, 0.55, 0.6, 0.8, 0.95, 0.4];
        let impostor = [0.1, 0.3, 0.45, 0.5, 0.62, 0.05, 0.2];
        let mut prev = evaluate(&genuine, &impostor, -1.0);
        for i in 0..=120 {
            let t = -0.1 + i as f64 * 0.01;
            let op = evaluate(&genuine, &impostor, t);
            assert!(op.far <= prev.far, "FAR rose at {t}");
            assert!(op.frr >= prev.frr, "FRR fell at {t}");
            prev = op;
        }
    }

    #[test]
    fn test_roc_shape() {
        let genuine = [0.2, 0.55, 0.6, 0.8, 0.95, 0.4];
        let impostor = [0.1, 0.3, 0.45, 0.5, 0.62, 0.05, 0.2];
        let curve = roc_curve(&genuine, &impostor, 50).unwrap();
        assert_eq!(curve.len(), 50);
        assert_eq!(curve.points[0].threshold, 0.05);
        assert_eq!(curve.points[49].threshold, 0.95);
        for w in curve.points.windows(2) {
            assert!(w[1].threshold >= w[0].threshold);
            assert!(w[1].far <= w[0].far);
            assert!(w[1].car <= w[0].car);
        }
        // Lowest threshold accepts everything.
        assert_eq!(curve.points[0].far, 1.0);
        assert_eq!(curve.points[0].car, 1.0);
    }

    #[test]
    fn test_roc_matches_evaluate() {
        let genuine = [0.9, 0.8, 0.3];
        let impostor = [0.5, 0.1];
        let curve = roc_curve(&genuine, &impostor, 7).unwrap();
        for p in &curve.points {
            let op = evaluate(&genuine, &impostor, p.threshold);
            assert_eq!(p.far, op.far);
            assert_eq!(p.car, op.car());
        }
    }

    #[test]
    fn test_roc_single_point() {
        let curve = roc_curve(&[0.9], &[0.1], 1).unwrap();
        assert_eq!(curve.len(), 1);
        assert_eq!(curve.points[0].threshold, 0.1);
    }

    #[test]
    fn test_roc_errors() {
        assert_eq!(roc_curve(&[0.9], &[0.1], 0), Err(MeasureError::InvalidPointCount(0)));
        assert_eq!(
            roc_curve(&[], &[], 10),
            Err(MeasureError::EmptyPopulation(Population::Combined))
        );
    }

    #[test]
    fn test_roc_one_population_empty() {
        let curve = roc_curve(&[0.2, 0.8], &[], 3).unwrap();
        assert!(curve.points.iter().all(|p| p.far == 0.0));
        assert_eq!(curve.points[2].car, 0.5);
    }

    #[test]
    fn test_roc_shape_over_ulp_wide_range() {
        let min = 905.3413853167497;
        let max = 905.3413853167544;
        let curve = roc_curve(&[max], &[min, min], 129).unwrap();
        assert_eq!(curve.points[0].threshold, min);
        assert_eq!(curve.points[128].threshold, max);
        for w in curve.points.windows(2) {
            assert!(
                w[1].threshold >= w[0].threshold,
                "threshold fell from {} to {}",
                w[0].threshold,
                w[1].threshold
            );
            assert!(w[1].far <= w[0].far, "FAR rose at {}", w[1].threshold);
            assert!(w[1].car <= w[0].car, "CAR rose at {}", w[1].threshold);
        }
    }

    #[test]
    fn test_sweep_thresholds_monotone_on_narrow_ranges() {
        for k in 0..64 {
            let min = -1000.0 + k as f64 * 31.25 + 1e-7;
            let max = min + 1e-12 * (k + 1) as f64;
            let ts: Vec<f64> = sweep_thresholds(min, max, 97).collect();
            assert_eq!(ts[96], max);
            for w in ts.windows(2) {
                assert!(w[1] >= w[0], "sweep {min}..{max} fell from {} to {}", w[0], w[1]);
            }
        }
    }

    #[test]
    fn test_sweep_thresholds_infinite_bounds() {
        let ts: Vec<f64> = sweep_thresholds(f64::NEG_INFINITY, 1.0, 4).collect();
        assert_eq!(ts[0], f64::NEG_INFINITY);
        assert_eq!(ts[3], 1.0);
        for w in ts.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn test_eer_report_separated() {
        let report = eer_report(&[0.9, 0.8, 0.7], &[0.3, 0.2, 0.1]).unwrap();
        assert_eq!(report.operating_point.far, 0.0);
        assert_eq!(report.operating_point.frr, 0.0);
        assert_eq!(report.eer, 0.0);
        assert_eq!(report.genuine_count, 3);
        assert_eq!(report.impostor_count, 3);
        assert!(!report.operating_point.degenerate);
    }

    #[test]
    fn test_eer_gaussian_separation() {
        let mut rng = StdRng::seed_from_u64(7);
        let genuine = gaussian(&mut rng, 1.0, 0.1, 100);
        let impostor = gaussian(&mut rng, 0.0, 0.1, 100);
        let report = eer_report(&genuine, &impostor).unwrap();
        assert!(report.eer < 0.05, "EER {} too high", report.eer);
        assert!(report.threshold() > 0.0 && report.threshold() < 1.0);
        let curve = roc_curve(&genuine, &impostor, 100).unwrap();
        assert!(curve.auc() > 0.95, "AUC {}", curve.auc());
    }
}
