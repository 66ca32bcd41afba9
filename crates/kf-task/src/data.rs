//! Task descriptors supplied by the caller, and the results handed back.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The only symbol a variable may observe.
pub const TIME_SYMBOL: &str = "urn:sedml:symbol:time";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub model: ModelRef,
    pub simulation: UniformTimeCourseSimulation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelRef {
    pub id: String,
    pub source: PathBuf,
    pub language: String,
    #[serde(default)]
    pub changes: Vec<ModelChange>,
}

/// Pre-execution change to a model element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelChange {
    pub target: String,
    pub new_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UniformTimeCourseSimulation {
    pub id: String,
    pub initial_time: f64,
    pub output_start_time: f64,
    pub output_end_time: f64,
    pub number_of_points: usize,
    pub algorithm: Algorithm,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Algorithm {
    pub kisao_id: String,
    #[serde(default)]
    pub changes: Vec<AlgorithmParameterChange>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlgorithmParameterChange {
    pub kisao_id: String,
    pub new_value: String,
}

/// An observable to record, by symbol or by target path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variable {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Variable {
    pub fn time(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: Some(TIME_SYMBOL.to_string()),
            target: None,
        }
    }

    pub fn target(id: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: None,
            target: Some(target.into()),
        }
    }
}

/// Recorded sequences keyed by variable id.
pub type VariableResults = BTreeMap<String, Vec<f64>>;
