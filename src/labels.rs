//! The ordered class list the model was trained on.

use crate::error::{Error, Result};

/// Classes in model output order. Index i of the probability vector is
/// `PLANT_DISEASE_LABELS[i]`.
pub const PLANT_DISEASE_LABELS: [&str; 6] = [
    "Apple___healthy",
    "Apple___Scab",
    "Apple___Black_rot",
    "Apple___Cedar_apple_rust",
    "Corn___healthy",
    "Corn___Common_rust",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LabelSet { labels: labels.into_iter().map(Into::into).collect() }
    }

    pub fn plant_disease() -> Self {
        LabelSet::new(PLANT_DISEASE_LABELS)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// The label set must cover the classifier's output exactly; anything
    /// else is a startup misconfiguration.
    pub fn check_output_size(&self, output_size: usize) -> Result<()> {
        if self.labels.len() != output_size {
            return Err(Error::Configuration(format!(
                "label set has {} classes but the model produces {} outputs",
                self.labels.len(), output_size
            )));
        }
        Ok(())
    }

    /// Compares against labels a model artifact declares about itself.
    pub fn check_declared(&self, declared: &[String]) -> Result<()> {
        if declared != self.labels.as_slice() {
            return Err(Error::Configuration(format!(
                "model declares labels {:?}, expected {:?}",
                declared, self.labels
            )));
        }
        Ok(())
    }
}

/// Human-readable form of a class identifier: underscores become spaces.
pub fn display_name(label: &str) -> String {
    label.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_is_indexed_in_model_order() {
        let labels = LabelSet::plant_disease();
        assert_eq!(labels.len(), 6);
        assert_eq!(labels.get(2), Some("Apple___Black_rot"));
        assert_eq!(labels.get(6), None);
    }

    #[test]
    fn output_size_mismatch_is_configuration_error() {
        let labels = LabelSet::plant_disease();
        assert!(labels.check_output_size(6).is_ok());
        assert!(matches!(labels.check_output_size(5), Err(Error::Configuration(_))));
    }

    #[test]
    fn declared_labels_must_match_in_order() {
        let labels = LabelSet::new(["a", "b"]);
        assert!(labels.check_declared(&["a".to_string(), "b".to_string()]).is_ok());
        assert!(labels.check_declared(&["b".to_string(), "a".to_string()]).is_err());
    }

    #[test]
    fn display_name_replaces_every_underscore() {
        assert_eq!(display_name("Apple___Cedar_apple_rust"), "Apple   Cedar apple rust");
    }
}
