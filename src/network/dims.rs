use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Structural sizes of the network: `inputs` (F) → `hidden` (H) → `outputs` (C).
///
/// These are fixed for the lifetime of a parameter store. The defaults match a
/// 28×28 grayscale digit classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDims {
    pub inputs: usize,
    pub hidden: usize,
    pub outputs: usize,
}

impl NetworkDims {
    pub const fn new(inputs: usize, hidden: usize, outputs: usize) -> Self {
        NetworkDims { inputs, hidden, outputs }
    }

    /// Rejects zero-sized layers.
    pub fn validate(&self) -> Result<()> {
        if self.inputs == 0 || self.hidden == 0 || self.outputs == 0 {
            return Err(Error::InvalidConfig(format!(
                "every layer needs at least one unit, got {self}"
            )));
        }
        Ok(())
    }
}

impl Default for NetworkDims {
    fn default() -> Self {
        NetworkDims::new(784, 128, 10)
    }
}

impl fmt::Display for NetworkDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.inputs, self.hidden, self.outputs)
    }
}
