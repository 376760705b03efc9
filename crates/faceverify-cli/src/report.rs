//! Result formatting: text or JSON reports and ROC CSV export.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use faceverify_core::{EerReport, RocCurve};
use serde::Serialize;

/// Everything a run prints.
#[derive(Debug, Serialize)]
pub struct Summary {
    #[serde(flatten)]
    pub eer: EerReport,
    /// Area under the ROC curve, when one was computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roc_auc: Option<f64>,
}

impl Summary {
    pub fn new(eer: EerReport, roc: Option<&RocCurve>) -> Self {
        Self { eer, roc_auc: roc.map(RocCurve::auc) }
    }

    pub fn to_text(&self, precision: usize) -> String {
        let op = &self.eer.operating_point;
        let mut out = format!(
            "Result: FAR {:.p$} and FRR {:.p$} at threshold {:.p$}\n\
             EER {:.p$} over {} genuine and {} impostor scores",
            op.far,
            op.frr,
            op.threshold,
            self.eer.eer,
            self.eer.genuine_count,
            self.eer.impostor_count,
            p = precision
        );
        if let Some(auc) = self.roc_auc {
            out.push_str(&format!("\nROC AUC {auc:.precision$}"));
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Write `threshold,far,car` rows, one per ROC point, then flush.
pub fn write_roc_csv<W: Write>(out: &mut W, curve: &RocCurve) -> std::io::Result<()> {
    writeln!(out, "threshold,far,car")?;
    for p in &curve.points {
        writeln!(out, "{},{},{}", p.threshold, p.far, p.car)?;
    }
    out.flush()
}

pub fn save_roc_csv(path: &Path, curve: &RocCurve) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    write_roc_csv(&mut writer, curve)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), points = curve.len(), "saved ROC curve");
    Ok(())
}
