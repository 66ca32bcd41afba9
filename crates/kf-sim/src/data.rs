//! Sampled simulation output.

use std::collections::HashMap;

use nalgebra::DMatrix;

/// Raw solver output: one row per sample, one column per label.
#[derive(Clone, Debug)]
pub struct SimData {
    pub values: DMatrix<f64>,
    pub labels: Vec<String>,
}

impl SimData {
    pub fn n_samples(&self) -> usize {
        self.values.nrows()
    }

    /// Column index by label.
    pub fn label_index(&self) -> HashMap<&str, usize> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), i))
            .collect()
    }

    pub fn column(&self, index: usize) -> Vec<f64> {
        self.values.column(index).iter().copied().collect()
    }
}
