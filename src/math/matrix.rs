use rand::Rng;
use serde::{Serialize, Deserialize};

/// Dense row-major matrix. `data[r][c]` is the element at row `r`, column `c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        let cols = data.first().map_or(0, |row| row.len());
        assert!(
            data.iter().all(|row| row.len() == cols),
            "Matrix rows must all have the same length"
        );
        Matrix {
            rows: data.len(),
            cols,
            data
        }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row][col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row]
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// `self[r][c] -= scale * other[r][c]` for every element.
    pub fn sub_scaled(&mut self, other: &Matrix, scale: f64) {
        if self.rows != other.rows || self.cols != other.cols {
            panic!("Matrices are of incorrect sizes")
        }

        for (row, grad) in self.data.iter_mut().zip(other.data.iter()) {
            sub_scaled(row, grad, scale);
        }
    }

    /// Iterates every element in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.data.iter().flat_map(|row| row.iter())
    }
}

/// Draws one value uniform on [-1, 1).
pub fn uniform<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>() * 2.0 - 1.0
}

pub fn fill_uniform<R: Rng + ?Sized>(values: &mut [f64], rng: &mut R) {
    for v in values.iter_mut() {
        *v = uniform(rng);
    }
}

/// Element-wise `values[i] -= scale * grads[i]`.
pub fn sub_scaled(values: &mut [f64], grads: &[f64], scale: f64) {
    assert_eq!(values.len(), grads.len());
    for (v, g) in values.iter_mut().zip(grads.iter()) {
        *v -= scale * g;
    }
}

/// Dot product of two equal-length slices.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
