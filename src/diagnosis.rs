//! Turning a probability vector into a diagnosis.
//!
//! Everything here is a pure function of the model output, so it is tested
//! without any model loaded.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::labels::{display_name, LabelSet};
use crate::treatment::TreatmentCatalog;

/// Confidence (percent) strictly above which a diagnosis is High.
pub const HIGH_SEVERITY_ABOVE: f64 = 85.0;
/// Confidence (percent) strictly above which a diagnosis is at least Moderate.
pub const MODERATE_SEVERITY_ABOVE: f64 = 65.0;

/// Coarse bucketing of confidence for display. Not a calibrated measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityTier {
    High,
    Moderate,
    Low,
}

impl SeverityTier {
    /// > 85 → High, (65, 85] → Moderate, ≤ 65 → Low.
    pub fn from_confidence(confidence_percent: f64) -> Self {
        if confidence_percent > HIGH_SEVERITY_ABOVE {
            SeverityTier::High
        } else if confidence_percent > MODERATE_SEVERITY_ABOVE {
            SeverityTier::Moderate
        } else {
            SeverityTier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeverityTier::High => "High Severity",
            SeverityTier::Moderate => "Moderate Severity",
            SeverityTier::Low => "Low / Early Stage",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A complete diagnosis. Built once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub predicted_class: String,
    pub confidence_percent: f64,
    pub severity: SeverityTier,
    pub treatment: String,
}

impl DiagnosisResult {
    pub fn display_name(&self) -> String {
        display_name(&self.predicted_class)
    }
}

impl fmt::Display for DiagnosisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Diagnosis:  {}", self.display_name())?;
        writeln!(f, "Confidence: {:.2}%", self.confidence_percent)?;
        writeln!(f, "Severity:   {}", self.severity)?;
        write!(f, "Treatment:  {}", self.treatment)
    }
}

/// Index and value of the maximum. Ties go to the lowest index; `None` for
/// an empty slice.
pub fn argmax(values: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best
}

/// Maps model output to a `DiagnosisResult` using a label set and a treatment catalog.
#[derive(Debug, Clone)]
pub struct Interpreter {
    labels: LabelSet,
    catalog: TreatmentCatalog,
}

impl Interpreter {
    pub fn new(labels: LabelSet, catalog: TreatmentCatalog) -> Self {
        Interpreter { labels, catalog }
    }

    /// Fails with `Error::Inference` when the output is the wrong length or
    /// holds anything outside [0, 1]; no partial result is produced.
    pub fn interpret(&self, probabilities: &[f64]) -> Result<DiagnosisResult> {
        if probabilities.len() != self.labels.len() {
            return Err(Error::Inference(format!(
                "model returned {} values, expected {}",
                probabilities.len(),
                self.labels.len()
            )));
        }
        if let Some((i, v)) = probabilities
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(Error::Inference(format!(
                "model output {} at index {} is not a probability",
                v, i
            )));
        }

        let (index, max) = argmax(probabilities)
            .ok_or_else(|| Error::Inference("model returned an empty output".into()))?;
        let predicted_class = self
            .labels
            .get(index)
            .ok_or_else(|| Error::Inference(format!("no label for output index {}", index)))?
            .to_owned();

        let confidence_percent = max * 100.0;
        Ok(DiagnosisResult {
            treatment: self.catalog.get(&predicted_class).to_owned(),
            severity: SeverityTier::from_confidence(confidence_percent),
            confidence_percent,
            predicted_class,
        })
    }
}
