use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Observed bounds used for min-max scaling.
///
/// The same bounds must be reused for every batch fed to a model trained on
/// data scaled with them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    pub fn observe(values: &Matrix) -> Result<MinMax> {
        match (values.min(), values.max()) {
            (Some(min), Some(max)) => Ok(MinMax { min, max }),
            _ => Err(Error::EmptyDataset),
        }
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// `(x - min) / (max - min)`.
    pub fn scale(&self, x: f64) -> f64 {
        (x - self.min) / self.range()
    }

    pub fn apply(&self, values: &Matrix) -> Result<Matrix> {
        if self.range() == 0.0 || !self.range().is_finite() {
            return Err(Error::DegenerateRange { min: self.min, max: self.max });
        }
        Ok(values.map(|x| self.scale(x)))
    }
}

/// Result of `normalize`: the scaled values and the bounds that produced them.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub tensor: Matrix,
    pub bounds: MinMax,
}

/// Min-max normalizes `values`.
///
/// With `bounds == None` the min and max are taken from `values` itself;
/// otherwise the given (training) bounds are reused, so values outside them
/// land outside `[0, 1]`.
pub fn normalize(values: &Matrix, bounds: Option<MinMax>) -> Result<Normalized> {
    let bounds = match bounds {
        Some(b) => b,
        None => MinMax::observe(values)?,
    };
    let tensor = bounds.apply(values)?;
    Ok(Normalized { tensor, bounds })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_bounds_map_into_unit_interval() {
        let values = Matrix::column(&[3.0, 0.0, 9.0, 4.5]);
        let n = normalize(&values, None).unwrap();
        assert_eq!(n.bounds, MinMax { min: 0.0, max: 9.0 });
        assert_eq!(n.tensor.as_slice(), &[3.0 / 9.0, 0.0, 1.0, 0.5]);
        assert!(n.tensor.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn reused_bounds_extrapolate() {
        let bounds = MinMax { min: 0.0, max: 9.0 };
        let n = normalize(&Matrix::column(&[1.0, 5.0, 7.0, 10.0, 25.0]), Some(bounds)).unwrap();
        assert_eq!(n.bounds, bounds);
        let v = n.tensor.as_slice();
        assert!((v[0] - 1.0 / 9.0).abs() < 1e-12);
        assert!(v[3] > 1.0);
        assert!((v[4] - 25.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn in_range_values_stay_in_unit_interval() {
        let bounds = MinMax { min: -4.0, max: 6.0 };
        for i in 0..=100 {
            let x = -4.0 + 10.0 * i as f64 / 100.0;
            let s = bounds.scale(x);
            assert!((0.0..=1.0).contains(&s), "{} -> {}", x, s);
        }
    }

    #[test]
    fn zero_range_is_an_error() {
        let err = normalize(&Matrix::column(&[2.0, 2.0]), None).unwrap_err();
        assert!(matches!(err, Error::DegenerateRange { .. }));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(normalize(&Matrix::zeros(0, 1), None), Err(Error::EmptyDataset)));
    }
}
