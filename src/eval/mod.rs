pub mod evaluator;

pub use evaluator::{argmax, evaluate, misclassified, predict, predictions, Accuracy, Prediction};
