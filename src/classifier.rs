//! The narrow seam between the pipeline and the pretrained model.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::network::{InputType, Network};
use crate::preprocess::{NormalizedTensor, TENSOR_HEIGHT, TENSOR_SHAPE, TENSOR_WIDTH};

/// `predict(tensor) -> probability vector`. Implementations are loaded once
/// and reused read-only across requests.
pub trait Classifier {
    fn predict(&self, tensor: &NormalizedTensor) -> Result<Vec<f64>>;

    /// Length of the vector `predict` returns.
    fn output_size(&self) -> usize;

    /// Class labels the model artifact declares, if it carries any.
    fn declared_labels(&self) -> Option<&[String]> {
        None
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict(&self, tensor: &NormalizedTensor) -> Result<Vec<f64>> {
        (**self).predict(tensor)
    }

    fn output_size(&self) -> usize {
        (**self).output_size()
    }

    fn declared_labels(&self) -> Option<&[String]> {
        (**self).declared_labels()
    }
}

/// Classifier backed by a JSON dense network.
#[derive(Debug, Clone)]
pub struct NetworkClassifier {
    network: Network,
}

impl NetworkClassifier {
    /// Wraps a network whose input layer takes a flattened 224×224 RGB image.
    pub fn new(network: Network) -> Result<Self> {
        network.validate()?;
        let expected: usize = TENSOR_SHAPE.iter().product();
        if network.input_size() != expected {
            return Err(Error::Configuration(format!(
                "model takes {} inputs, expected {} for a {}x{} RGB image",
                network.input_size(), expected, TENSOR_WIDTH, TENSOR_HEIGHT
            )));
        }
        match network.metadata.as_ref().and_then(|m| m.input_type.as_ref()) {
            None => {}
            Some(InputType::ImageRgb { width, height })
                if *width as usize == TENSOR_WIDTH && *height as usize == TENSOR_HEIGHT => {}
            Some(other) => {
                return Err(Error::Configuration(format!(
                    "model declares input {:?}, expected a {}x{} RGB image",
                    other, TENSOR_WIDTH, TENSOR_HEIGHT
                )));
            }
        }
        Ok(NetworkClassifier { network })
    }

    /// Loads and checks the model artifact. Any failure is fatal at startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let network = Network::load_json(path)?;
        let classifier = NetworkClassifier::new(network)?;
        info!(
            model = %path.display(),
            layers = classifier.network.layers.len(),
            outputs = classifier.output_size(),
            "loaded model"
        );
        Ok(classifier)
    }
}

impl Classifier for NetworkClassifier {
    fn predict(&self, tensor: &NormalizedTensor) -> Result<Vec<f64>> {
        if tensor.len() != self.network.input_size() {
            return Err(Error::Inference(format!(
                "tensor of shape {:?} has {} values, model takes {}",
                tensor.shape(),
                tensor.len(),
                self.network.input_size()
            )));
        }
        let output = self.network.forward(tensor.as_slice());
        debug!(outputs = output.len(), "forward pass complete");
        Ok(output)
    }

    fn output_size(&self) -> usize {
        self.network.output_size()
    }

    fn declared_labels(&self) -> Option<&[String]> {
        self.network
            .metadata
            .as_ref()
            .and_then(|m| m.output_labels.as_deref())
    }
}
