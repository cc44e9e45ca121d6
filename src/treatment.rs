//! Static treatment advice keyed by class name.

use std::collections::HashMap;

pub const FALLBACK_TREATMENT: &str = "Consult agricultural expert for treatment guidance.";

const PLANT_DISEASE_TREATMENTS: [(&str, &str); 6] = [
    ("Apple___healthy", "The plant is healthy. Maintain proper irrigation and regular monitoring."),
    ("Apple___Scab", "Apply fungicide like Captan. Remove infected leaves and improve air circulation."),
    ("Apple___Black_rot", "Prune infected branches and apply copper-based fungicide."),
    ("Apple___Cedar_apple_rust", "Use myclobutanil fungicide and remove nearby juniper plants."),
    ("Corn___healthy", "Crop is healthy. Maintain fertilization and irrigation schedule."),
    ("Corn___Common_rust", "Apply appropriate fungicide and consider resistant corn varieties."),
];

/// Lookups never fail: unknown classes get the fallback text.
#[derive(Debug, Clone)]
pub struct TreatmentCatalog {
    entries: HashMap<String, String>,
    fallback: String,
}

impl TreatmentCatalog {
    pub fn new(fallback: impl Into<String>) -> Self {
        TreatmentCatalog { entries: HashMap::new(), fallback: fallback.into() }
    }

    pub fn with_entry(mut self, class: impl Into<String>, advice: impl Into<String>) -> Self {
        self.entries.insert(class.into(), advice.into());
        self
    }

    /// The hand-authored table for the six plant disease classes.
    pub fn plant_disease() -> Self {
        PLANT_DISEASE_TREATMENTS
            .iter()
            .fold(TreatmentCatalog::new(FALLBACK_TREATMENT), |catalog, (class, advice)| {
                catalog.with_entry(*class, *advice)
            })
    }

    pub fn get(&self, class: &str) -> &str {
        self.entries.get(class).map_or(self.fallback.as_str(), String::as_str)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn contains(&self, class: &str) -> bool {
        self.entries.contains_key(class)
    }
}
