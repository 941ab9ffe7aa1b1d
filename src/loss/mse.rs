use crate::math::matrix::Matrix;

pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((predicted - expected)²) over every element.
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> f64 {
        let diff = predicted - expected;
        let n = diff.len().max(1) as f64;
        diff.as_slice().iter().map(|d| d * d).sum::<f64>() / n
    }

    /// ∂MSE/∂predicted = 2 (predicted - expected) / N.
    pub fn gradient(predicted: &Matrix, expected: &Matrix) -> Matrix {
        let diff = predicted - expected;
        let n = diff.len().max(1) as f64;
        diff.scale(2.0 / n)
    }
}
