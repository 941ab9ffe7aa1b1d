use rand::Rng;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Paired scalar inputs and targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    inputs: Vec<f64>,
    outputs: Vec<f64>,
}

impl Dataset {
    pub fn new(inputs: Vec<f64>, outputs: Vec<f64>) -> Result<Dataset> {
        if inputs.len() != outputs.len() {
            return Err(Error::LengthMismatch { inputs: inputs.len(), outputs: outputs.len() });
        }
        if inputs.is_empty() {
            return Err(Error::EmptyDataset);
        }
        Ok(Dataset { inputs, outputs })
    }

    /// Inputs `0..count` with targets `x²`.
    pub fn squares(count: usize) -> Dataset {
        let inputs: Vec<f64> = (0..count).map(|x| x as f64).collect();
        let outputs = inputs.iter().map(|x| x * x).collect();
        Dataset { inputs, outputs }
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.inputs.iter().copied().zip(self.outputs.iter().copied())
    }

    /// Shuffles inputs and outputs with the same permutation.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        debug_assert_eq!(self.inputs.len(), self.outputs.len());
        permute_in_lockstep(self.inputs.as_mut_slice(), self.outputs.as_mut_slice(), rng);
    }

    pub fn input_matrix(&self) -> Matrix {
        Matrix::column(&self.inputs)
    }

    pub fn output_matrix(&self) -> Matrix {
        Matrix::column(&self.outputs)
    }
}

/// Fisher-Yates shuffle applied to two slices in lock-step, so that
/// `a[i]` and `b[i]` stay paired.
pub fn shuffle_combo<A, B, R: Rng + ?Sized>(a: &mut [A], b: &mut [B], rng: &mut R) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch { inputs: a.len(), outputs: b.len() });
    }
    permute_in_lockstep(a, b, rng);
    Ok(())
}

/// Caller guarantees `a.len() == b.len()`.
fn permute_in_lockstep<A, B, R: Rng + ?Sized>(a: &mut [A], b: &mut [B], rng: &mut R) {
    for i in (1..a.len()).rev() {
        let j = rng.gen_range(0..=i);
        a.swap(i, j);
        b.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn squares_pairs_each_input_with_its_square() {
        let ds = Dataset::squares(10);
        assert_eq!(ds.len(), 10);
        assert_eq!(ds.outputs()[9], 81.0);
    }

    #[test]
    fn shuffle_keeps_pairs_together() {
        for seed in 0..20 {
            let mut ds = Dataset::squares(10);
            ds.shuffle(&mut StdRng::seed_from_u64(seed));
            for (x, y) in ds.pairs() {
                assert_eq!(y, x * x);
            }
            let mut seen: Vec<f64> = ds.inputs().to_vec();
            seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(seen, Dataset::squares(10).inputs());
        }
    }

    #[test]
    fn shuffle_changes_order_for_some_seed() {
        let moved = (0..10).any(|seed| {
            let mut ds = Dataset::squares(10);
            ds.shuffle(&mut StdRng::seed_from_u64(seed));
            ds != Dataset::squares(10)
        });
        assert!(moved);
    }

    #[test]
    fn dataset_shuffle_matches_shuffle_combo() {
        let mut ds = Dataset::squares(10);
        ds.shuffle(&mut StdRng::seed_from_u64(4));

        let mut xs = Dataset::squares(10).inputs().to_vec();
        let mut ys = Dataset::squares(10).outputs().to_vec();
        shuffle_combo(&mut xs[..], &mut ys[..], &mut StdRng::seed_from_u64(4)).unwrap();

        assert_eq!(ds.inputs(), &xs[..]);
        assert_eq!(ds.outputs(), &ys[..]);
    }

    #[test]
    fn shuffle_combo_rejects_unequal_lengths() {
        let mut a = [1, 2, 3];
        let mut b = [1, 2];
        let err = shuffle_combo(&mut a[..], &mut b[..], &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { inputs: 3, outputs: 2 }));
    }

    #[test]
    fn new_validates() {
        assert!(matches!(Dataset::new(vec![], vec![]), Err(Error::EmptyDataset)));
        assert!(matches!(Dataset::new(vec![1.0], vec![]), Err(Error::LengthMismatch { .. })));
    }
}
