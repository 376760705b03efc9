//! Synthetic score populations for demos and sanity checks.

use rand::Rng;

use crate::types::Score;

/// Draw `n` scores from N(mean, sigma) with the Box-Muller transform.
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, sigma: f64, n: usize) -> Vec<Score> {
    (0..n)
        .map(|_| {
            let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
            let u2: f64 = rng.gen();
            let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
            mean + sigma * z
        })
        .collect()
}
