use crate::activation::sigmoid::sigmoid;
use crate::math::matrix::dot;
use crate::network::params::ParameterStore;

/// Intermediate values of one forward evaluation.
///
/// Each call to [`forward`] returns a fresh snapshot, so backpropagation for a
/// sample always sees that sample's own activations.
#[derive(Debug, Clone, PartialEq)]
pub struct Activations {
    /// Hidden pre-activations, `z = bh + Wxh·x`.
    pub z: Vec<f64>,
    /// Hidden activations, `h = σ(z)`.
    pub h: Vec<f64>,
    /// Output activations, `y = σ(by + Why·h)`.
    pub y: Vec<f64>,
}

/// Runs `x` through the network.
///
/// # Panics
/// Panics if `x.len()` differs from the network's input width.
pub fn forward(params: &ParameterStore, x: &[f64]) -> Activations {
    let dims = params.dims();
    assert_eq!(
        x.len(),
        dims.inputs,
        "feature vector has {} values, network expects {}",
        x.len(),
        dims.inputs
    );

    let z: Vec<f64> = params.bh.iter()
        .zip(params.wxh.data.iter())
        .map(|(b, row)| b + dot(row, x))
        .collect();
    let h: Vec<f64> = z.iter().map(|&v| sigmoid(v)).collect();

    let y: Vec<f64> = params.by.iter()
        .zip(params.why.data.iter())
        .map(|(b, row)| sigmoid(b + dot(row, &h)))
        .collect();

    Activations { z, h, y }
}
