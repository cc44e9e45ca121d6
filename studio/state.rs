use leafscan::{Classifier, DiagnosisPipeline};

/// Everything a request handler needs. Built once at startup and only read
/// afterwards; requests are served one at a time.
pub struct StudioState {
    /// The loaded model wrapped in the diagnosis pipeline.
    pub pipeline:   DiagnosisPipeline<Box<dyn Classifier>>,
    /// Where the model was loaded from, shown in the sidebar.
    pub model_path: String,
}

impl StudioState {
    pub fn new(pipeline: DiagnosisPipeline<Box<dyn Classifier>>, model_path: impl Into<String>) -> Self {
        StudioState { pipeline, model_path: model_path.into() }
    }
}
