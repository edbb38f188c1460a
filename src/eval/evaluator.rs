use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::sample::Sample;
use crate::network::forward::forward;
use crate::network::params::ParameterStore;

/// Classification score over a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accuracy {
    pub correct: usize,
    pub total: usize,
    /// `100 · correct / total`; 0.0 for an empty dataset.
    pub percentage: f64,
}

impl Accuracy {
    pub fn new(correct: usize, total: usize) -> Accuracy {
        let percentage = if total == 0 {
            0.0
        } else {
            100.0 * correct as f64 / total as f64
        };
        Accuracy { correct, total, percentage }
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({:.2}%)", self.correct, self.total, self.percentage)
    }
}

/// Index of the largest element. Ties go to the lowest index: a later value
/// only wins if it is strictly greater than the best so far. Returns 0 for
/// an empty slice.
pub fn argmax(v: &[f64]) -> usize {
    let mut idx = 0;
    let mut best = match v.first() {
        Some(&first) => first,
        None => return 0,
    };
    for (i, &x) in v.iter().enumerate().skip(1) {
        if x > best {
            best = x;
            idx = i;
        }
    }
    idx
}

/// Predicted class for one feature vector.
pub fn predict(params: &ParameterStore, features: &[f64]) -> usize {
    argmax(&forward(params, features).y)
}

/// Scores `samples` against `params`.
pub fn evaluate(params: &ParameterStore, samples: &[Sample]) -> Accuracy {
    let correct = samples.iter()
        .filter(|s| predict(params, s.features()) == s.label())
        .count();
    Accuracy::new(correct, samples.len())
}

/// A single inference result, tagged with the sample's dataset position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    pub index: usize,
    pub label: usize,
    pub predicted: usize,
}

impl Prediction {
    pub fn is_correct(&self) -> bool {
        self.label == self.predicted
    }
}

/// Lazily predicts every sample in order.
pub fn predictions<'a>(
    params: &'a ParameterStore,
    samples: &'a [Sample],
) -> impl Iterator<Item = Prediction> + 'a {
    samples.iter().enumerate().map(move |(index, s)| Prediction {
        index,
        label: s.label(),
        predicted: predict(params, s.features()),
    })
}

/// Lazily yields only the misclassified samples.
pub fn misclassified<'a>(
    params: &'a ParameterStore,
    samples: &'a [Sample],
) -> impl Iterator<Item = Prediction> + 'a {
    predictions(params, samples).filter(|p| !p.is_correct())
}
