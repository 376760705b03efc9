//! faceverify-core — Biometric verification scoring and error-rate evaluation.
//!
//! Scores every enrolled model against every probe through a pluggable
//! [`Comparator`], splits the scores into genuine and impostor populations,
//! solves the equal-error-rate threshold and reports FAR/FRR and ROC curves.

pub mod comparator;
pub mod error;
pub mod evaluate;
pub mod gallery;
pub mod partition;
#[cfg(any(test, feature = "simulate"))]
pub mod simulate;
pub mod threshold;
pub mod types;

pub use comparator::{
    Comparator, ComparatorError, Cosine, Feature, MeanOverTemplates, NegatedEuclidean,
    SumOverTemplates,
};
pub use error::{MeasureError, Population};
pub use evaluate::{eer_report, evaluate, roc_curve};
pub use gallery::{Gallery, GalleryError};
#[cfg(feature = "parallel")]
pub use partition::partition_par;
pub use partition::{partition, PartitionError, Probe};
pub use threshold::{far_threshold, min_hter_threshold, solve_eer};
pub use types::{EerReport, OperatingPoint, RocCurve, RocPoint, Score, ScoreSet, Threshold};
