//! upload → decode → preprocess → predict → interpret.

use tracing::{info, info_span};

use crate::classifier::Classifier;
use crate::diagnosis::{DiagnosisResult, Interpreter};
use crate::error::Result;
use crate::labels::LabelSet;
use crate::preprocess::preprocess;
use crate::treatment::TreatmentCatalog;
use crate::upload::UploadedImage;

/// One classifier plus the rules to read its output. Holds no per-request
/// state, so diagnosing the same bytes twice gives the same result.
pub struct DiagnosisPipeline<C: Classifier> {
    classifier: C,
    interpreter: Interpreter,
}

impl<C: Classifier> DiagnosisPipeline<C> {
    /// Fails with `Error::Configuration` if the labels do not line up with
    /// what the classifier produces.
    pub fn new(classifier: C, labels: LabelSet, catalog: TreatmentCatalog) -> Result<Self> {
        labels.check_output_size(classifier.output_size())?;
        if let Some(declared) = classifier.declared_labels() {
            labels.check_declared(declared)?;
        }
        Ok(DiagnosisPipeline {
            classifier,
            interpreter: Interpreter::new(labels, catalog),
        })
    }

    /// Pipeline with the built-in plant disease labels and treatments.
    pub fn plant_disease(classifier: C) -> Result<Self> {
        DiagnosisPipeline::new(classifier, LabelSet::plant_disease(), TreatmentCatalog::plant_disease())
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Runs one upload through every stage. Any stage failing ends the request.
    pub fn diagnose(&self, upload: &UploadedImage) -> Result<DiagnosisResult> {
        let span = info_span!("diagnose", file = %upload.file_name, bytes = upload.bytes.len());
        let _enter = span.enter();

        let img = upload.decode()?;
        let tensor = preprocess(&img);
        let probabilities = self.classifier.predict(&tensor)?;
        let result = self.interpreter.interpret(&probabilities)?;

        info!(
            class = %result.predicted_class,
            confidence = result.confidence_percent,
            severity = ?result.severity,
            "diagnosis complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::preprocess::NormalizedTensor;

    struct Fixed(Vec<f64>);

    impl Classifier for Fixed {
        fn predict(&self, _tensor: &NormalizedTensor) -> Result<Vec<f64>> {
            Ok(self.0.clone())
        }

        fn output_size(&self) -> usize {
            self.0.len()
        }
    }

    struct Declaring(Vec<String>);

    impl Classifier for Declaring {
        fn predict(&self, _tensor: &NormalizedTensor) -> Result<Vec<f64>> {
            Ok(vec![0.0; self.0.len()])
        }

        fn output_size(&self) -> usize {
            self.0.len()
        }

        fn declared_labels(&self) -> Option<&[String]> {
            Some(&self.0)
        }
    }

    #[test]
    fn label_count_mismatch_fails_construction() {
        let result = DiagnosisPipeline::plant_disease(Fixed(vec![0.2; 5]));
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn declared_labels_must_agree() {
        let mut labels: Vec<String> = LabelSet::plant_disease().iter().map(str::to_owned).collect();
        assert!(DiagnosisPipeline::plant_disease(Declaring(labels.clone())).is_ok());
        labels.swap(0, 1);
        assert!(matches!(
            DiagnosisPipeline::plant_disease(Declaring(labels)),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn decode_failure_stops_before_the_model() {
        struct Unreachable;
        impl Classifier for Unreachable {
            fn predict(&self, _tensor: &NormalizedTensor) -> Result<Vec<f64>> {
                panic!("classifier must not run after a decode failure");
            }
            fn output_size(&self) -> usize {
                6
            }
        }

        let pipeline = DiagnosisPipeline::plant_disease(Unreachable).unwrap();
        let err = pipeline
            .diagnose(&UploadedImage::new("leaf.png", vec![0x89, b'P', b'N', b'G']))
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
