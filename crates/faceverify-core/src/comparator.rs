//! Scoring functions that turn a (model, probe) pair into a [`Score`].
//!
//! Every comparator follows the convention "higher = more likely the same
//! identity", so distance measures are negated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Score;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComparatorError {
    #[error("feature dimension mismatch: model has {model}, probe has {probe}")]
    DimensionMismatch { model: usize, probe: usize },
    #[error("model has no enrolled templates")]
    EmptyTemplates,
}

/// Dense feature vector extracted from one face image (eigenface
/// projection, flattened Gabor graph, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feature {
    pub values: Vec<f64>,
}

impl Feature {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    fn check_dim(&self, other: &Feature) -> Result<(), ComparatorError> {
        if self.dim() != other.dim() {
            return Err(ComparatorError::DimensionMismatch {
                model: self.dim(),
                probe: other.dim(),
            });
        }
        Ok(())
    }

    /// Cosine similarity in [-1, 1]; 0.0 if either vector has zero norm.
    pub fn similarity(&self, other: &Feature) -> f64 {
        let mut dot = 0.0;
        let mut norm_a = 0.0;
        let mut norm_b = 0.0;

        for (a, b) in self.values.iter().zip(other.values.iter()) {
            dot += a * b;
            norm_a += a * a;
            norm_b += b * b;
        }

        let denom = norm_a.sqrt() * norm_b.sqrt();
        if denom > 0.0 { dot / denom } else { 0.0 }
    }

    pub fn euclidean_distance(&self, other: &Feature) -> f64 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

impl From<Vec<f64>> for Feature {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

/// Strategy for scoring a probe against one enrolled model.
///
/// Implementations must not rely on shared mutable state: pairs may be
/// scored in any order and on any thread.
pub trait Comparator<M: ?Sized, P: ?Sized> {
    type Error;

    fn compare(&self, model: &M, probe: &P) -> Result<Score, Self::Error>;
}

/// Negated Euclidean distance, so nearer features score higher.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegatedEuclidean;

impl Comparator<Feature, Feature> for NegatedEuclidean {
    type Error = ComparatorError;

    fn compare(&self, model: &Feature, probe: &Feature) -> Result<Score, ComparatorError> {
        model.check_dim(probe)?;
        Ok(-model.euclidean_distance(probe))
    }
}

/// Cosine similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosine;

impl Comparator<Feature, Feature> for Cosine {
    type Error = ComparatorError;

    fn compare(&self, model: &Feature, probe: &Feature) -> Result<Score, ComparatorError> {
        model.check_dim(probe)?;
        Ok(model.similarity(probe))
    }
}

/// Sum of the inner comparator over every template of a model.
fn sum_templates<C, T, P>(inner: &C, templates: &[T], probe: &P) -> Result<Score, ComparatorError>
where
    C: Comparator<T, P, Error = ComparatorError>,
    P: ?Sized,
{
    if templates.is_empty() {
        return Err(ComparatorError::EmptyTemplates);
    }
    let mut sum = 0.0;
    for template in templates {
        sum += inner.compare(template, probe)?;
    }
    Ok(sum)
}

/// Scores a model enrolled from several templates as the mean of the
/// inner comparator over all of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanOverTemplates<C> {
    pub inner: C,
}

impl<C> MeanOverTemplates<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C, T, P> Comparator<[T], P> for MeanOverTemplates<C>
where
    C: Comparator<T, P, Error = ComparatorError>,
    P: ?Sized,
{
    type Error = ComparatorError;

    fn compare(&self, templates: &[T], probe: &P) -> Result<Score, ComparatorError> {
        Ok(sum_templates(&self.inner, templates, probe)? / templates.len() as f64)
    }
}

impl<C, T, P> Comparator<Vec<T>, P> for MeanOverTemplates<C>
where
    C: Comparator<T, P, Error = ComparatorError>,
    P: ?Sized,
{
    type Error = ComparatorError;

    fn compare(&self, templates: &Vec<T>, probe: &P) -> Result<Score, ComparatorError> {
        <Self as Comparator<[T], P>>::compare(self, templates.as_slice(), probe)
    }
}

/// Scores a model as the plain sum of the inner comparator over its
/// templates.
///
/// Unlike [`MeanOverTemplates`], the score scales with the template count,
/// so models enrolled from different numbers of templates are not on a
/// common scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumOverTemplates<C> {
    pub inner: C,
}

impl<C> SumOverTemplates<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C, T, P> Comparator<[T], P> for SumOverTemplates<C>
where
    C: Comparator<T, P, Error = ComparatorError>,
    P: ?Sized,
{
    type Error = ComparatorError;

    fn compare(&self, templates: &[T], probe: &P) -> Result<Score, ComparatorError> {
        sum_templates(&self.inner, templates, probe)
    }
}

impl<C, T, P> Comparator<Vec<T>, P> for SumOverTemplates<C>
where
    C: Comparator<T, P, Error = ComparatorError>,
    P: ?Sized,
{
    type Error = ComparatorError;

    fn compare(&self, templates: &Vec<T>, probe: &P) -> Result<Score, ComparatorError> {
        sum_templates(&self.inner, templates.as_slice(), probe)
    }
}

/// Comparator backed by a closure. Build with [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnComparator<F>(F);

/// Wrap `f` so it can be passed wherever a [`Comparator`] is expected.
pub fn from_fn<M, P, E, F>(f: F) -> FnComparator<F>
where
    M: ?Sized,
    P: ?Sized,
    F: Fn(&M, &P) -> Result<Score, E>,
{
    FnComparator(f)
}

impl<M, P, E, F> Comparator<M, P> for FnComparator<F>
where
    M: ?Sized,
    P: ?Sized,
    F: Fn(&M, &P) -> Result<Score, E>,
{
    type Error = E;

    fn compare(&self, model: &M, probe: &P) -> Result<Score, E> {
        (self.0)(model, probe)
    }
}
