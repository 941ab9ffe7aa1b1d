use rand::Rng;

use crate::{activation::activation::ActivationFunction, math::matrix::Matrix};

/// Gradients of the loss for one layer, averaged over the batch.
#[derive(Debug)]
pub struct Gradients {
    pub weights: Matrix,
    pub biases: Matrix,
    /// ∂L/∂input, fed to the previous layer's `backward`.
    pub input: Matrix,
}

/// Fully connected layer: `a = f(x·W + b)` over a batch of row vectors.
#[derive(Debug, Clone)]
pub struct Layer {
    pub units: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction,
    input: Option<Matrix>,
    pre_activation: Option<Matrix>,
}

impl Layer {
    /// He-initialized weights for ReLU, Xavier otherwise; zero biases.
    pub fn new<R: Rng + ?Sized>(
        units: usize,
        input_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Layer {
        let weights = match activation {
            ActivationFunction::ReLU => Matrix::he(input_size, units, rng),
            _ => Matrix::xavier(input_size, units, rng),
        };
        Layer::from_parts(weights, Matrix::zeros(1, units), activation)
    }

    /// Builds a layer from explicit parameters.
    ///
    /// # Panics
    /// Panics if `biases` is not `1 × weights.cols()`.
    pub fn from_parts(weights: Matrix, biases: Matrix, activation: ActivationFunction) -> Layer {
        assert_eq!(
            biases.shape(),
            (1, weights.cols()),
            "biases {:?} do not match weights {:?}",
            biases.shape(),
            weights.shape()
        );
        Layer {
            units: weights.cols(),
            weights,
            biases,
            activator: activation,
            input: None,
            pre_activation: None,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows()
    }

    pub fn param_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    /// Forward pass that keeps `input` and `z` for the following `backward`.
    pub fn forward(&mut self, input: &Matrix) -> Matrix {
        let z = (input * &self.weights).add_row_broadcast(&self.biases);
        let a = z.map(|x| self.activator.function(x));
        self.input = Some(input.clone());
        self.pre_activation = Some(z);
        a
    }

    /// Forward pass without caching, for inference.
    pub fn infer(&self, input: &Matrix) -> Matrix {
        (input * &self.weights)
            .add_row_broadcast(&self.biases)
            .map(|x| self.activator.function(x))
    }

    /// Backward pass. `grad_output` is ∂L/∂a for this layer's last `forward`.
    ///
    /// # Panics
    /// Panics if called before `forward`.
    pub fn backward(&self, grad_output: &Matrix) -> Gradients {
        let (input, z) = match (&self.input, &self.pre_activation) {
            (Some(input), Some(z)) => (input, z),
            _ => panic!("Layer::backward called before Layer::forward"),
        };
        // δ = ∂L/∂a ⊙ f'(z)
        let delta = grad_output.hadamard(&z.map(|x| self.activator.derivative(x)));

        Gradients {
            weights: &input.transpose() * &delta,
            biases: delta.sum_rows(),
            input: &delta * &self.weights.transpose(),
        }
    }

    /// Releases the activations cached by `forward`.
    pub fn clear_cache(&mut self) {
        self.input = None;
        self.pre_activation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sum_of_squares(m: &Matrix) -> f64 {
        m.as_slice().iter().map(|v| v * v).sum::<f64>() / 2.0
    }

    #[test]
    fn forward_applies_weights_bias_and_activation() {
        let mut layer = Layer::from_parts(
            Matrix::from_vec(1, 2, vec![2.0, -1.0]),
            Matrix::row(&[0.5, 0.5]),
            ActivationFunction::ReLU,
        );
        let out = layer.forward(&Matrix::column(&[1.0, 3.0]));
        assert_eq!(out.shape(), (2, 2));
        assert_eq!(out.as_slice(), &[2.5, 0.0, 6.5, 0.0]);
    }

    #[test]
    fn infer_matches_forward() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut layer = Layer::new(4, 3, ActivationFunction::Tanh, &mut rng);
        let x = Matrix::xavier(5, 3, &mut rng);
        assert_eq!(layer.infer(&x), layer.forward(&x));
    }

    #[test]
    fn gradients_match_finite_differences() {
        // L = 0.5 * sum(a²) so ∂L/∂a = a.
        let mut rng = StdRng::seed_from_u64(11);
        let mut layer = Layer::new(3, 2, ActivationFunction::Tanh, &mut rng);
        layer.biases = Matrix::row(&[0.1, -0.2, 0.3]);
        let x = Matrix::from_vec(2, 2, vec![0.5, -1.0, 1.5, 0.25]);

        let a = layer.forward(&x);
        let grads = layer.backward(&a);

        let h = 1e-6;
        for idx in 0..layer.weights.len() {
            let (r, c) = (idx / layer.weights.cols(), idx % layer.weights.cols());
            let mut plus = layer.clone();
            let mut minus = layer.clone();
            let bump = Matrix::from_vec(
                layer.weights.rows(),
                layer.weights.cols(),
                (0..layer.weights.len()).map(|i| if i == idx { h } else { 0.0 }).collect(),
            );
            plus.weights = &layer.weights + &bump;
            minus.weights = &layer.weights - &bump;
            let numeric = (sum_of_squares(&plus.infer(&x)) - sum_of_squares(&minus.infer(&x))) / (2.0 * h);
            assert!(
                (numeric - grads.weights.get(r, c)).abs() < 1e-5,
                "weight ({}, {}): numeric {} analytic {}",
                r, c, numeric, grads.weights.get(r, c)
            );
        }

        for c in 0..layer.units {
            let bump = Matrix::row(&(0..layer.units).map(|i| if i == c { h } else { 0.0 }).collect::<Vec<_>>());
            let mut plus = layer.clone();
            let mut minus = layer.clone();
            plus.biases = &layer.biases + &bump;
            minus.biases = &layer.biases - &bump;
            let numeric = (sum_of_squares(&plus.infer(&x)) - sum_of_squares(&minus.infer(&x))) / (2.0 * h);
            assert!((numeric - grads.biases.get(0, c)).abs() < 1e-5);
        }

        assert_eq!(grads.input.shape(), x.shape());
    }

    #[test]
    #[should_panic(expected = "before Layer::forward")]
    fn backward_requires_forward() {
        let layer = Layer::new(1, 1, ActivationFunction::Identity, &mut StdRng::seed_from_u64(0));
        let _ = layer.backward(&Matrix::zeros(1, 1));
    }

    #[test]
    fn param_count_includes_biases() {
        let layer = Layer::new(50, 1, ActivationFunction::ReLU, &mut StdRng::seed_from_u64(0));
        assert_eq!(layer.param_count(), 100);
        assert_eq!(layer.input_size(), 1);
    }
}
