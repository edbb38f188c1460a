use crate::math::matrix::sub_scaled;
use crate::network::params::ParameterStore;
use crate::train::gradients::Gradients;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one averaged SGD update: `param -= (η / batch_size) · grad_sum`.
    ///
    /// `grads` must hold the *summed* gradient of a complete batch of
    /// `batch_size` samples.
    pub fn step(&self, params: &mut ParameterStore, grads: &Gradients, batch_size: usize) {
        assert!(batch_size > 0, "batch_size must be at least 1");
        let scale = self.learning_rate / batch_size as f64;

        params.wxh.sub_scaled(&grads.wxh, scale);
        sub_scaled(&mut params.bh, &grads.bh, scale);
        params.why.sub_scaled(&grads.why, scale);
        sub_scaled(&mut params.by, &grads.by, scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::dims::NetworkDims;
    use approx::assert_abs_diff_eq;

    #[test]
    fn step_scales_by_learning_rate_over_batch() {
        let dims = NetworkDims::new(1, 1, 1);
        let mut params = ParameterStore::zeros(dims);
        let mut grads = Gradients::zeros(dims);
        grads.wxh.set(0, 0, 4.0);
        grads.bh[0] = 2.0;
        grads.why.set(0, 0, -8.0);
        grads.by[0] = 1.0;

        Sgd::new(0.5).step(&mut params, &grads, 4);

        assert_abs_diff_eq!(params.wxh().get(0, 0), -0.5);
        assert_abs_diff_eq!(params.bh()[0], -0.25);
        assert_abs_diff_eq!(params.why().get(0, 0), 1.0);
        assert_abs_diff_eq!(params.by()[0], -0.125);
    }

    #[test]
    fn zero_gradient_leaves_parameters() {
        let dims = NetworkDims::new(3, 2, 2);
        let mut params = ParameterStore::seeded(dims, 8);
        let before = params.clone();
        Sgd::new(3.0).step(&mut params, &Gradients::zeros(dims), 10);
        assert_eq!(params, before);
    }
}
