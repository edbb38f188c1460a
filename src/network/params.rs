use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::math::matrix::{self, Matrix};
use crate::network::dims::NetworkDims;

/// The learned parameters of a 3-layer network.
///
/// - `wxh` — hidden × input weights (H × F)
/// - `bh`  — hidden biases (H)
/// - `why` — output × hidden weights (C × H)
/// - `by`  — output biases (C)
///
/// Shapes never change after construction; only element values do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterStore {
    dims: NetworkDims,
    pub(crate) wxh: Matrix,
    pub(crate) bh: Vec<f64>,
    pub(crate) why: Matrix,
    pub(crate) by: Vec<f64>,
}

impl ParameterStore {
    /// All-zero parameters.
    pub fn zeros(dims: NetworkDims) -> ParameterStore {
        ParameterStore {
            dims,
            wxh: Matrix::zeros(dims.hidden, dims.inputs),
            bh: vec![0.0; dims.hidden],
            why: Matrix::zeros(dims.outputs, dims.hidden),
            by: vec![0.0; dims.outputs],
        }
    }

    /// Uniform [-1, 1) initialization.
    ///
    /// Draw order is fixed so a seed reproduces the same store: for every
    /// hidden unit its `wxh` row then its `bh` entry, then for every output
    /// unit its `why` row then its `by` entry.
    pub fn random<R: Rng + ?Sized>(dims: NetworkDims, rng: &mut R) -> ParameterStore {
        let mut store = ParameterStore::zeros(dims);

        for j in 0..dims.hidden {
            matrix::fill_uniform(&mut store.wxh.data[j], rng);
            store.bh[j] = matrix::uniform(rng);
        }
        for k in 0..dims.outputs {
            matrix::fill_uniform(&mut store.why.data[k], rng);
            store.by[k] = matrix::uniform(rng);
        }

        store
    }

    /// Random initialization from a fresh `StdRng` seeded with `seed`.
    pub fn seeded(dims: NetworkDims, seed: u64) -> ParameterStore {
        ParameterStore::random(dims, &mut StdRng::seed_from_u64(seed))
    }

    /// Builds a store from explicit tensors.
    ///
    /// # Panics
    /// Panics if any tensor's shape disagrees with `dims`.
    pub fn from_parts(
        dims: NetworkDims,
        wxh: Matrix,
        bh: Vec<f64>,
        why: Matrix,
        by: Vec<f64>,
    ) -> ParameterStore {
        assert_eq!(wxh.shape(), (dims.hidden, dims.inputs), "wxh shape");
        assert_eq!(bh.len(), dims.hidden, "bh length");
        assert_eq!(why.shape(), (dims.outputs, dims.hidden), "why shape");
        assert_eq!(by.len(), dims.outputs, "by length");
        ParameterStore { dims, wxh, bh, why, by }
    }

    pub fn dims(&self) -> NetworkDims {
        self.dims
    }

    pub fn wxh(&self) -> &Matrix {
        &self.wxh
    }

    pub fn bh(&self) -> &[f64] {
        &self.bh
    }

    pub fn why(&self) -> &Matrix {
        &self.why
    }

    pub fn by(&self) -> &[f64] {
        &self.by
    }

    pub fn set_wxh(&mut self, hidden: usize, input: usize, value: f64) {
        self.wxh.set(hidden, input, value);
    }

    pub fn set_bh(&mut self, hidden: usize, value: f64) {
        self.bh[hidden] = value;
    }

    pub fn set_why(&mut self, output: usize, hidden: usize, value: f64) {
        self.why.set(output, hidden, value);
    }

    pub fn set_by(&mut self, output: usize, value: f64) {
        self.by[output] = value;
    }

    /// Every parameter in file order (`wxh`, `bh`, `why`, `by`).
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.wxh
            .iter()
            .chain(self.bh.iter())
            .chain(self.why.iter())
            .chain(self.by.iter())
            .copied()
    }
}
