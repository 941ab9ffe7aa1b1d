use crate::{
    error::{Error, Result},
    layers::dense::{Gradients, Layer},
    math::matrix::Matrix,
    network::summary::{ModelSummary, SummaryRow},
};

/// A sequential stack of dense layers.
#[derive(Debug, Clone)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    pub fn new(layers: Vec<Layer>) -> Network {
        Network { layers }
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map(|l| l.input_size()).unwrap_or(0)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map(|l| l.units).unwrap_or(0)
    }

    pub fn param_count(&self) -> usize {
        self.layers.iter().map(Layer::param_count).sum()
    }

    fn check_input(&self, input: &Matrix) -> Result<()> {
        if input.cols() != self.input_size() {
            return Err(Error::InputShape { expected: self.input_size(), actual: input.cols() });
        }
        Ok(())
    }

    /// Training forward pass; each layer caches what `backward` needs.
    pub fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        self.check_input(input)?;
        let mut current = input.clone();
        for layer in &mut self.layers {
            current = layer.forward(&current);
        }
        Ok(current)
    }

    /// Backpropagates ∂L/∂output through every layer, last to first.
    /// Returned gradients are in layer order.
    pub fn backward(&self, grad_output: Matrix) -> Vec<Gradients> {
        let mut grads = Vec::with_capacity(self.layers.len());
        let mut delta = grad_output;
        for layer in self.layers.iter().rev() {
            let g = layer.backward(&delta);
            delta = g.input.clone();
            grads.push(g);
        }
        grads.reverse();
        grads
    }

    /// Inference on a batch of row-vector samples.
    pub fn predict(&self, input: &Matrix) -> Result<Matrix> {
        self.check_input(input)?;
        let mut current = input.clone();
        for layer in &self.layers {
            current = layer.infer(&current);
        }
        Ok(current)
    }

    /// Drops every cached activation, e.g. once training is over.
    pub fn clear_caches(&mut self) {
        for layer in &mut self.layers {
            layer.clear_cache();
        }
    }

    pub fn summary(&self) -> ModelSummary {
        let rows = self
            .layers
            .iter()
            .enumerate()
            .map(|(i, layer)| SummaryRow {
                name: format!("dense_{}", i + 1),
                activation: layer.activator,
                output_units: layer.units,
                params: layer.param_count(),
            })
            .collect();
        ModelSummary { rows, total_params: self.param_count() }
    }
}
