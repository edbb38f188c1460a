use crate::activation::sigmoid::sigmoid_prime_from_output;
use crate::data::sample::Sample;
use crate::math::matrix::Matrix;
use crate::network::dims::NetworkDims;
use crate::network::forward::forward;
use crate::network::params::ParameterStore;

/// Summed gradients for one mini-batch, shaped like a [`ParameterStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub wxh: Matrix,
    pub bh: Vec<f64>,
    pub why: Matrix,
    pub by: Vec<f64>,
    /// Summed quadratic loss `½·Σ(y − t)²` over the batch; reporting only.
    pub loss: f64,
}

impl Gradients {
    pub fn zeros(dims: NetworkDims) -> Gradients {
        Gradients {
            wxh: Matrix::zeros(dims.hidden, dims.inputs),
            bh: vec![0.0; dims.hidden],
            why: Matrix::zeros(dims.outputs, dims.hidden),
            by: vec![0.0; dims.outputs],
            loss: 0.0,
        }
    }

    /// Adds one sample's backpropagated gradient.
    ///
    /// Output delta is the quadratic-loss error times the sigmoid slope,
    /// `δ_out[k] = (y_k − t_k)·y_k·(1 − y_k)`, and the hidden delta is
    /// `δ_hid[j] = (Σ_k Why[k][j]·δ_out[k])·h_j·(1 − h_j)`.
    pub fn accumulate(&mut self, params: &ParameterStore, sample: &Sample) {
        let acts = forward(params, sample.features());
        let target = sample.one_hot(params.dims().outputs);

        let delta_out: Vec<f64> = acts.y.iter()
            .zip(target.iter())
            .map(|(&y, &t)| (y - t) * sigmoid_prime_from_output(y))
            .collect();

        self.loss += 0.5 * acts.y.iter()
            .zip(target.iter())
            .map(|(y, t)| (y - t).powi(2))
            .sum::<f64>();

        for (k, &d) in delta_out.iter().enumerate() {
            self.by[k] += d;
            for (g, &h) in self.why.data[k].iter_mut().zip(acts.h.iter()) {
                *g += d * h;
            }
        }

        for (j, &h) in acts.h.iter().enumerate() {
            let back: f64 = params.why.data.iter()
                .zip(delta_out.iter())
                .map(|(row, d)| row[j] * d)
                .sum();
            let d = back * sigmoid_prime_from_output(h);

            self.bh[j] += d;
            for (g, &x) in self.wxh.data[j].iter_mut().zip(sample.features().iter()) {
                *g += d * x;
            }
        }
    }
}

/// Sums per-sample gradients over `batch`. No averaging happens here;
/// scaling by batch size is the optimizer's job.
pub fn accumulate_batch<'a, I>(params: &ParameterStore, batch: I) -> Gradients
where
    I: IntoIterator<Item = &'a Sample>,
{
    let mut grads = Gradients::zeros(params.dims());
    for sample in batch {
        grads.accumulate(params, sample);
    }
    grads
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn empty_batch_gives_zero_gradients() {
        let params = ParameterStore::seeded(NetworkDims::new(3, 2, 2), 1);
        let grads = accumulate_batch(&params, std::iter::empty::<&Sample>());
        assert_eq!(grads, Gradients::zeros(params.dims()));
    }

    #[test]
    fn zero_weights_output_delta() {
        // All outputs are 0.5; delta is (0.5 - t) * 0.25.
        let params = ParameterStore::zeros(NetworkDims::new(2, 2, 2));
        let grads = accumulate_batch(&params, &[Sample::new(1, vec![1.0, 0.0])]);
        assert_abs_diff_eq!(grads.by[0], 0.125, epsilon = 1e-15);
        assert_abs_diff_eq!(grads.by[1], -0.125, epsilon = 1e-15);
        // Why is zero, so nothing reaches the hidden layer.
        assert!(grads.bh.iter().all(|&g| g == 0.0));
        assert!(grads.wxh.iter().all(|&g| g == 0.0));
        assert_abs_diff_eq!(grads.loss, 0.25, epsilon = 1e-15);
    }

    #[test]
    fn batch_gradient_is_sum_of_sample_gradients() {
        let params = ParameterStore::seeded(NetworkDims::new(3, 4, 3), 21);
        let a = Sample::new(0, vec![0.1, 0.5, 0.9]);
        let b = Sample::new(2, vec![0.7, 0.0, 0.3]);

        let both = accumulate_batch(&params, [&a, &b]);
        let ga = accumulate_batch(&params, [&a]);
        let gb = accumulate_batch(&params, [&b]);

        for ((s, x), y) in both.values().zip(ga.values()).zip(gb.values()) {
            assert_abs_diff_eq!(s, x + y, epsilon = 1e-12);
        }
    }

    #[test]
    fn matches_numerical_gradient() {
        let params = ParameterStore::seeded(NetworkDims::new(3, 2, 2), 4);
        let sample = Sample::new(1, vec![0.2, 0.6, 0.4]);
        let grads = accumulate_batch(&params, [&sample]);

        let loss_at = |p: &ParameterStore| {
            let y = forward(p, sample.features()).y;
            let t = sample.one_hot(2);
            0.5 * y.iter().zip(t.iter()).map(|(a, b)| (a - b).powi(2)).sum::<f64>()
        };

        let eps = 1e-6;
        let mut plus = params.clone();
        plus.set_wxh(1, 2, params.wxh().get(1, 2) + eps);
        let mut minus = params.clone();
        minus.set_wxh(1, 2, params.wxh().get(1, 2) - eps);
        let numeric = (loss_at(&plus) - loss_at(&minus)) / (2.0 * eps);
        assert_abs_diff_eq!(grads.wxh.get(1, 2), numeric, epsilon = 1e-8);

        let mut plus = params.clone();
        plus.set_by(0, params.by()[0] + eps);
        let mut minus = params.clone();
        minus.set_by(0, params.by()[0] - eps);
        let numeric = (loss_at(&plus) - loss_at(&minus)) / (2.0 * eps);
        assert_abs_diff_eq!(grads.by[0], numeric, epsilon = 1e-8);
    }

    impl Gradients {
        fn values(&self) -> impl Iterator<Item = f64> + '_ {
            self.wxh.iter()
                .chain(self.bh.iter())
                .chain(self.why.iter())
                .chain(self.by.iter())
                .copied()
        }
    }
}
