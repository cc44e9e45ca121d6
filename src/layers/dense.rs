use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// Fully connected layer. Inference only: the forward pass borrows the layer
/// immutably so a loaded model can be shared read-only between requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer{
    pub size: usize,
    /// Shape (input_size, size).
    pub weights: Matrix,
    /// Shape (1, size).
    pub biases: Matrix,
    pub activator: ActivationFunction
}

impl Layer {
    pub fn new<R: Rng>(size: usize, input_size: usize, activation: ActivationFunction, rng: &mut R) -> Layer {
        Layer {
            size,
            weights: Matrix::xavier(input_size, size, rng),
            biases: Matrix::zeros(1, size),
            activator: activation
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    /// a = σ(xW + b). Caller guarantees `input.len() == self.input_size()`.
    pub fn feed_from(&self, input: &[f64]) -> Vec<f64> {
        let x = Matrix::from_data(vec![input.to_vec()]);
        let z = &(&x * &self.weights) + &self.biases;
        self.activator.apply(&z.data[0])
    }

    /// Checks that the weight and bias shapes agree with `size`.
    pub fn validate(&self) -> Result<(), String> {
        if !self.weights.is_consistent() || !self.biases.is_consistent() {
            return Err("weights or biases have ragged rows".into());
        }
        if self.weights.cols != self.size {
            return Err(format!("weights have {} columns, layer size is {}", self.weights.cols, self.size));
        }
        if self.biases.rows != 1 || self.biases.cols != self.size {
            return Err(format!(
                "biases are {}x{}, expected 1x{}",
                self.biases.rows, self.biases.cols, self.size
            ));
        }
        Ok(())
    }
}
