//! Scoring every enrolled model against every probe and splitting the
//! results into genuine and impostor populations.

use thiserror::Error;

use crate::comparator::Comparator;
use crate::gallery::Gallery;
use crate::types::{Score, ScoreSet};

#[derive(Error, Debug)]
pub enum PartitionError<E> {
    #[error("no enrolled models to score against")]
    EmptyModelSet,
    #[error("no probe samples to score")]
    EmptyProbeSet,
    /// The comparator's own error, passed through untouched.
    #[error("comparator failed: {0}")]
    Comparator(E),
}

/// A probe sample with its ground-truth identity.
#[derive(Debug, Clone)]
pub struct Probe<I, P> {
    pub id: String,
    pub identity: I,
    pub sample: P,
}

impl<I, P> Probe<I, P> {
    pub fn new(id: impl Into<String>, identity: I, sample: P) -> Self {
        Self { id: id.into(), identity, sample }
    }
}

fn check_inputs<I, M, P, E>(
    models: &Gallery<I, M>,
    probes: &[Probe<I, P>],
) -> Result<(), PartitionError<E>> {
    if models.is_empty() {
        return Err(PartitionError::EmptyModelSet);
    }
    if probes.is_empty() {
        return Err(PartitionError::EmptyProbeSet);
    }
    Ok(())
}

/// Score one model against all probes: `(is_genuine, score)` per probe.
fn score_row<I, M, P, C>(
    key: &I,
    model: &M,
    probes: &[Probe<I, P>],
    comparator: &C,
) -> Result<Vec<(bool, Score)>, PartitionError<C::Error>>
where
    I: PartialEq,
    C: Comparator<M, P>,
{
    probes
        .iter()
        .map(|probe| {
            comparator
                .compare(model, &probe.sample)
                .map(|score| (probe.identity == *key, score))
                .map_err(PartitionError::Comparator)
        })
        .collect()
}

/// Probes that matched no model in any row, read off the genuine flags
/// `score_row` already computed.
fn count_unenrolled(rows: &[Vec<(bool, Score)>], num_probes: usize) -> usize {
    let mut enrolled = vec![false; num_probes];
    for row in rows {
        for (seen, &(genuine, _)) in enrolled.iter_mut().zip(row) {
            *seen |= genuine;
        }
    }
    enrolled.iter().filter(|&&seen| !seen).count()
}

fn group<I, M, P>(
    rows: Vec<Vec<(bool, Score)>>,
    models: &Gallery<I, M>,
    probes: &[Probe<I, P>],
) -> ScoreSet {
    let unenrolled = count_unenrolled(&rows, probes.len());

    let mut scores = ScoreSet::default();
    for (genuine, score) in rows.into_iter().flatten() {
        if genuine {
            scores.genuine.push(score);
        } else {
            scores.impostor.push(score);
        }
    }

    if unenrolled > 0 {
        tracing::warn!(
            probes = unenrolled,
            "probes whose identity has no enrolled model contribute impostor scores only"
        );
    }

    tracing::debug!(
        models = models.len(),
        probes = probes.len(),
        genuine = scores.genuine.len(),
        impostor = scores.impostor.len(),
        "partitioned scores"
    );
    scores
}

/// Compare every model with every probe exactly once.
///
/// A score is genuine when the probe's identity equals the model's key,
/// impostor otherwise. The first comparator error aborts the run and is
/// returned as [`PartitionError::Comparator`].
pub fn partition<I, M, P, C>(
    models: &Gallery<I, M>,
    probes: &[Probe<I, P>],
    comparator: &C,
) -> Result<ScoreSet, PartitionError<C::Error>>
where
    I: PartialEq,
    C: Comparator<M, P>,
{
    check_inputs::<_, _, _, C::Error>(models, probes)?;

    let rows = models
        .entries()
        .iter()
        .map(|(key, model)| score_row(key, model, probes, comparator))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(group(rows, models, probes))
}

/// [`partition`] with models scored in parallel on the rayon pool.
///
/// Produces the same populations; only the order within each may differ
/// from the sequential run.
#[cfg(feature = "parallel")]
pub fn partition_par<I, M, P, C>(
    models: &Gallery<I, M>,
    probes: &[Probe<I, P>],
    comparator: &C,
) -> Result<ScoreSet, PartitionError<C::Error>>
where
    I: PartialEq + Sync,
    M: Sync,
    P: Sync,
    C: Comparator<M, P> + Sync,
    C::Error: Send,
{
    use rayon::prelude::*;

    check_inputs::<_, _, _, C::Error>(models, probes)?;

    let rows = models
        .entries()
        .par_iter()
        .map(|(key, model)| score_row(key, model, probes, comparator))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(group(rows, models, probes))
}
