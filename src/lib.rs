pub mod math;
pub mod activation;
pub mod layers;
pub mod network;

pub mod error;
pub mod logging;
pub mod upload;
pub mod preprocess;
pub mod labels;
pub mod treatment;
pub mod diagnosis;
pub mod classifier;
pub mod pipeline;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{InputType, ModelMetadata, Network};

pub use error::{Error, Result};
pub use upload::UploadedImage;
pub use preprocess::{preprocess, NormalizedTensor};
pub use labels::LabelSet;
pub use treatment::TreatmentCatalog;
pub use diagnosis::{DiagnosisResult, Interpreter, SeverityTier};
pub use classifier::{Classifier, NetworkClassifier};
pub use pipeline::DiagnosisPipeline;
