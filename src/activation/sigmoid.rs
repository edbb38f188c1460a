use std::f64::consts::E;

/// Logistic sigmoid, `1 / (1 + e^-x)`. Maps any real into (0, 1).
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

/// Sigmoid derivative written in terms of the activation `a = sigmoid(z)`:
/// `σ'(z) = a · (1 - a)`.
pub fn sigmoid_prime_from_output(a: f64) -> f64 {
    a * (1.0 - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sigmoid_at_zero_is_half() {
        assert_abs_diff_eq!(sigmoid(0.0), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn sigmoid_is_symmetric() {
        for x in [-3.0, -0.25, 0.7, 5.0] {
            assert_abs_diff_eq!(sigmoid(x) + sigmoid(-x), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let z = 0.3;
        let h = 1e-6;
        let numeric = (sigmoid(z + h) - sigmoid(z - h)) / (2.0 * h);
        assert_abs_diff_eq!(sigmoid_prime_from_output(sigmoid(z)), numeric, epsilon = 1e-9);
    }
}
