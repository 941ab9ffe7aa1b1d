use crate::layers::dense::{Gradients, Layer};

#[derive(Debug, Clone)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    /// Applies one SGD update to a layer given its pre-computed gradients.
    pub fn step(&self, layer: &mut Layer, grads: &Gradients) {
        layer.weights.sub_scaled_assign(&grads.weights, self.learning_rate);
        layer.biases.sub_scaled_assign(&grads.biases, self.learning_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{activation::activation::ActivationFunction, math::matrix::Matrix};

    #[test]
    fn step_moves_against_the_gradient() {
        let mut layer = Layer::from_parts(
            Matrix::row(&[1.0, 2.0]),
            Matrix::row(&[0.0, 0.0]),
            ActivationFunction::Identity,
        );
        let grads = Gradients {
            weights: Matrix::row(&[10.0, -10.0]),
            biases: Matrix::row(&[1.0, 1.0]),
            input: Matrix::zeros(1, 1),
        };
        let mut sgd = Sgd::new(0.1);
        sgd.step(&mut layer, &grads);
        assert_eq!(layer.weights.as_slice(), &[0.0, 3.0]);
        assert_eq!(layer.biases.as_slice(), &[-0.1, -0.1]);

        sgd.set_learning_rate(0.0);
        sgd.step(&mut layer, &grads);
        assert_eq!(layer.weights.as_slice(), &[0.0, 3.0]);
    }
}
