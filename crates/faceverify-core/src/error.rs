use thiserror::Error;

/// Precondition failures of the threshold solvers and rate evaluators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("{0} score population is empty")]
    EmptyPopulation(Population),
    #[error("all scores collapse to the single value {0}; no threshold separates the populations")]
    DegenerateScores(f64),
    #[error("{0} score population contains NaN")]
    NonFiniteScore(Population),
    #[error("ROC curve needs at least one point, got {0}")]
    InvalidPointCount(usize),
    #[error("rate must lie in [0, 1], got {0}")]
    InvalidRate(f64),
    #[error("no threshold brings FAR down to {0}: impostor scores of +inf are always accepted")]
    UnreachableRate(f64),
}

/// Which side of the genuine/impostor split an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Population {
    Genuine,
    Impostor,
    /// Both populations together.
    Combined,
}

impl std::fmt::Display for Population {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Population::Genuine => f.write_str("genuine"),
            Population::Impostor => f.write_str("impostor"),
            Population::Combined => f.write_str("combined"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_population() {
        let err = MeasureError::EmptyPopulation(Population::Impostor);
        assert_eq!(err.to_string(), "impostor score population is empty");

        let err = MeasureError::NonFiniteScore(Population::Genuine);
        assert_eq!(err.to_string(), "genuine score population contains NaN");
    }
}
