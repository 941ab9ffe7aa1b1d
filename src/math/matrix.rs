use rand::Rng;
use std::f64::consts::PI;
use std::fmt;
use std::mem::size_of;
use std::ops::{Add, Mul, Sub};

use crate::math::memory::{track_alloc, track_free};

/// Dense row-major matrix of `f64`.
///
/// Every instance is counted by `math::memory` while it is alive.
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::from_vec(rows, cols, vec![0.0; rows * cols])
    }

    /// Wraps `data` (row-major) as a `rows × cols` matrix.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Matrix {
        assert_eq!(
            data.len(),
            rows * cols,
            "buffer of {} values does not fit a {}x{} matrix",
            data.len(),
            rows,
            cols
        );
        track_alloc(data.len() * size_of::<f64>());
        Matrix { rows, cols, data }
    }

    /// An `n × 1` matrix, the shape of a batch of scalar samples.
    pub fn column(values: &[f64]) -> Matrix {
        Matrix::from_vec(values.len(), 1, values.to_vec())
    }

    /// A `1 × n` matrix.
    pub fn row(values: &[f64]) -> Matrix {
        Matrix::from_vec(1, values.len(), values.to_vec())
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // u in (0, 1] so that ln(u) is finite.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    fn normal<R: Rng + ?Sized>(rows: usize, cols: usize, std_dev: f64, rng: &mut R) -> Matrix {
        let data = (0..rows * cols)
            .map(|_| Matrix::sample_standard_normal(rng) * std_dev)
            .collect();
        Matrix::from_vec(rows, cols, data)
    }

    /// He initialization: N(0, sqrt(2 / rows)), where `rows` is the fan-in.
    ///
    /// Used in front of ReLU, which zeroes half of its inputs on average.
    pub fn he<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        Matrix::normal(rows, cols, (2.0 / rows as f64).sqrt(), rng)
    }

    /// Xavier (Glorot) initialization: N(0, sqrt(1 / rows)).
    pub fn xavier<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        Matrix::normal(rows, cols, (1.0 / rows as f64).sqrt(), rng)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data.clone()
    }

    /// Copies the given rows, in the given order, into a new matrix.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &r in indices {
            data.extend_from_slice(&self.data[r * self.cols..(r + 1) * self.cols]);
        }
        Matrix::from_vec(indices.len(), self.cols, data)
    }

    pub fn transpose(&self) -> Matrix {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self.data[i * self.cols + j]);
            }
        }
        Matrix::from_vec(self.cols, self.rows, data)
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix::from_vec(self.rows, self.cols, self.data.iter().map(|&x| functor(x)).collect())
    }

    pub fn scale(&self, k: f64) -> Matrix {
        self.map(|x| x * k)
    }

    pub fn matmul(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(
            self.cols, rhs.rows,
            "cannot multiply {:?} by {:?}",
            self.shape(),
            rhs.shape()
        );
        let mut data = vec![0.0; self.rows * rhs.cols];
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                if a == 0.0 {
                    continue;
                }
                let rhs_row = &rhs.data[k * rhs.cols..(k + 1) * rhs.cols];
                let out_row = &mut data[i * rhs.cols..(i + 1) * rhs.cols];
                for (out, &b) in out_row.iter_mut().zip(rhs_row) {
                    *out += a * b;
                }
            }
        }
        Matrix::from_vec(self.rows, rhs.cols, data)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        self.zip_with(rhs, "hadamard", |a, b| a * b)
    }

    /// Adds a `1 × cols` row vector to every row.
    pub fn add_row_broadcast(&self, row: &Matrix) -> Matrix {
        assert!(
            row.rows == 1 && row.cols == self.cols,
            "cannot broadcast {:?} over {:?}",
            row.shape(),
            self.shape()
        );
        let data = self
            .data
            .chunks(self.cols.max(1))
            .flat_map(|r| r.iter().zip(&row.data).map(|(a, b)| a + b))
            .collect();
        Matrix::from_vec(self.rows, self.cols, data)
    }

    /// Sums over rows, producing a `1 × cols` matrix.
    pub fn sum_rows(&self) -> Matrix {
        let mut sums = vec![0.0; self.cols];
        for r in self.data.chunks(self.cols.max(1)) {
            for (s, v) in sums.iter_mut().zip(r) {
                *s += v;
            }
        }
        Matrix::from_vec(1, self.cols, sums)
    }

    /// In-place `self -= k * other`.
    pub fn sub_scaled_assign(&mut self, other: &Matrix, k: f64) {
        assert_eq!(
            self.shape(),
            other.shape(),
            "cannot update {:?} with {:?}",
            self.shape(),
            other.shape()
        );
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a -= k * b;
        }
    }

    /// Smallest element, or `None` for an empty matrix.
    pub fn min(&self) -> Option<f64> {
        self.data.iter().copied().reduce(f64::min)
    }

    /// Largest element, or `None` for an empty matrix.
    pub fn max(&self) -> Option<f64> {
        self.data.iter().copied().reduce(f64::max)
    }

    fn zip_with<F>(&self, rhs: &Matrix, op: &str, f: F) -> Matrix
    where
        F: Fn(f64, f64) -> f64,
    {
        assert_eq!(
            self.shape(),
            rhs.shape(),
            "{}: shapes {:?} and {:?} differ",
            op,
            self.shape(),
            rhs.shape()
        );
        let data = self.data.iter().zip(&rhs.data).map(|(&a, &b)| f(a, b)).collect();
        Matrix::from_vec(self.rows, self.cols, data)
    }
}

impl Clone for Matrix {
    fn clone(&self) -> Self {
        Matrix::from_vec(self.rows, self.cols, self.data.clone())
    }
}

impl Drop for Matrix {
    fn drop(&mut self) {
        track_free(self.data.len() * size_of::<f64>());
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.data == other.data
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("data", &self.data)
            .finish()
    }
}

/// Prints the values as a flat list with two decimals: `[0.00, 0.11, ...]`.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.2}", v)?;
        }
        write!(f, "]")
    }
}

impl Add for &Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Matrix {
        self.zip_with(rhs, "add", |a, b| a + b)
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Matrix {
        self.zip_with(rhs, "sub", |a, b| a - b)
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Matrix {
        self.matmul(rhs)
    }
}
