use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::network::metadata::ModelMetadata;
use crate::{activation::activation::ActivationFunction, layers::dense::Layer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub metadata: Option<ModelMetadata>,
}

impl Network {
    /// Builds a randomly initialised network from (size, input_size, activation) tuples.
    pub fn new<R: Rng>(layer_specs: Vec<(usize, usize, ActivationFunction)>, rng: &mut R) -> Network {
        let layers = layer_specs.into_iter()
            .map(|(size, input_size, activation)| Layer::new(size, input_size, activation, rng))
            .collect();
        Network { layers, metadata: None }
    }

    pub fn with_metadata(mut self, metadata: ModelMetadata) -> Network {
        self.metadata = Some(metadata);
        self
    }

    /// Number of values the first layer consumes, 0 for an empty network.
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.input_size())
    }

    /// Number of values the last layer produces, 0 for an empty network.
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.size)
    }

    /// Forward pass. Caller guarantees `input.len() == self.input_size()`.
    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.feed_from(&current);
        }
        current
    }

    /// Checks that the network has layers and that consecutive layer shapes chain.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(Error::Configuration("model has no layers".into()));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            layer.validate()
                .map_err(|e| Error::Configuration(format!("layer {}: {}", i, e)))?;
        }
        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[1].input_size() != pair[0].size {
                return Err(Error::Configuration(format!(
                    "layer {} expects {} inputs but layer {} produces {}",
                    i + 1, pair[1].input_size(), i, pair[0].size
                )));
            }
        }
        Ok(())
    }

    /// Serializes the network to a JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        writer.flush()?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    ///
    /// Any failure (missing file, bad JSON, inconsistent shapes) is a
    /// configuration error: a model that cannot be loaded is fatal at startup.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::Configuration(format!("cannot open model '{}': {}", path.display(), e))
        })?;
        let reader = BufReader::new(file);
        let network: Network = serde_json::from_reader(reader).map_err(|e| {
            Error::Configuration(format!("cannot parse model '{}': {}", path.display(), e))
        })?;
        network.validate()?;
        Ok(network)
    }
}
