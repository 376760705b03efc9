//! JSON inputs: precomputed score sets and feature datasets.

use std::path::Path;

use anyhow::{Context, Result};
use faceverify_core::{Feature, Gallery, Probe, ScoreSet};
use serde::Deserialize;

/// An enrolled identity with one feature vector per enrollment image.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    pub templates: Vec<Feature>,
}

/// A probe image's feature vector and the identity it truly belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeEntry {
    pub id: String,
    pub identity: String,
    pub feature: Feature,
}

/// Features extracted by an external pipeline, ready for scoring.
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub models: Vec<ModelEntry>,
    pub probes: Vec<ProbeEntry>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self> {
        let dataset: Dataset = read_json(path)?;
        tracing::info!(
            path = %path.display(),
            models = dataset.models.len(),
            probes = dataset.probes.len(),
            "loaded feature dataset"
        );
        Ok(dataset)
    }

    /// Split into the enrolled gallery and the probe list.
    pub fn into_parts(self) -> Result<(Gallery<String, Vec<Feature>>, Vec<Probe<String, Feature>>)> {
        let gallery = Gallery::from_entries(self.models.into_iter().map(|m| (m.id, m.templates)))
            .context("building model gallery")?;
        let probes = self
            .probes
            .into_iter()
            .map(|p| Probe::new(p.id, p.identity, p.feature))
            .collect();
        Ok((gallery, probes))
    }
}

pub fn load_scores(path: &Path) -> Result<ScoreSet> {
    let scores: ScoreSet = read_json(path)?;
    tracing::info!(
        path = %path.display(),
        genuine = scores.genuine.len(),
        impostor = scores.impostor.len(),
        "loaded score set"
    );
    Ok(scores)
}

pub fn save_scores(path: &Path, scores: &ScoreSet) -> Result<()> {
    let json = serde_json::to_string_pretty(scores)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "saved score set");
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = r#"{
        "models": [
            {"id": "s1", "templates": [[1.0, 0.0], [0.9, 0.1]]},
            {"id": "s2", "templates": [[0.0, 1.0]]}
        ],
        "probes": [
            {"id": "s1/5.pgm", "identity": "s1", "feature": [1.0, 0.05]},
            {"id": "s2/5.pgm", "identity": "s2", "feature": [0.1, 1.0]}
        ]
    }"#;

    #[test]
    fn test_dataset_into_parts() {
        let dataset: Dataset = serde_json::from_str(DATASET).unwrap();
        let (gallery, probes) = dataset.into_parts().unwrap();
        assert_eq!(gallery.len(), 2);
        assert_eq!(gallery.get(&"s1".to_string()).map(Vec::len), Some(2));
        assert_eq!(probes.len(), 2);
        assert_eq!(probes[1].identity, "s2");
        assert_eq!(probes[1].sample.dim(), 2);
    }

    #[test]
    fn test_dataset_duplicate_model_rejected() {
        let dataset: Dataset = serde_json::from_str(
            r#"{"models": [{"id": "s1", "templates": []}, {"id": "s1", "templates": []}], "probes": []}"#,
        )
        .unwrap();
        assert!(dataset.into_parts().is_err());
    }

    #[test]
    fn test_scores_round_trip_file() {
        let path = std::env::temp_dir().join(format!("faceverify-scores-{}.json", std::process::id()));
        let scores = ScoreSet::new(vec![0.9, 0.8], vec![0.1]);
        save_scores(&path, &scores).unwrap();
        assert_eq!(load_scores(&path).unwrap(), scores);
        let _ = std::fs::remove_file(&path);
    }
}
