//! Error types for task execution.

use std::path::PathBuf;

use kf_core::ValueType;

use crate::data::TIME_SYMBOL;

/// Fatal task execution error.
///
/// Every variant aborts the current execution; recoverable conditions are
/// reported as [`crate::TaskWarning`]s instead.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Task `{task}` is invalid:\n  - {}", .problems.join("\n  - "))]
    InvalidTask { task: String, problems: Vec<String> },

    #[error("Invalid configuration: {key} = '{value}' ({reason})")]
    InvalidConfig {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Model at {} could not be imported:\n  {}", .path.display(), .cause.replace('\n', "\n  "))]
    ModelImport { path: PathBuf, cause: String },

    #[error("{0}")]
    InvalidTarget(String),

    #[error("Algorithm {kisao_id} is not supported. {reason}")]
    UnsupportedAlgorithm { kisao_id: String, reason: String },

    #[error(
        "Algorithm parameter with KiSAO id '{kisao_id}' is not supported. \
         Parameter must have one of the following KiSAO ids:\n  - {}",
        .legal.join("\n  - ")
    )]
    UnsupportedParameter { kisao_id: String, legal: Vec<String> },

    #[error("'{value}' is not a valid {value_type} value for parameter {kisao_id}")]
    InvalidParameterValue {
        value: String,
        value_type: ValueType,
        kisao_id: String,
    },

    #[error("Time course must specify an integer number of time points (got {sim_points})")]
    NonIntegralTimeGrid { sim_points: f64 },

    #[error("{solver} cannot execute the simulation because the model has {feature}")]
    ModelFeatureUnsupported {
        solver: &'static str,
        feature: &'static str,
    },

    #[error(
        "The following variable symbols are not supported:\n  - {}\n\n\
         Symbols must be one of the following:\n  - {}",
        .symbols.join("\n  - "),
        TIME_SYMBOL
    )]
    UnsupportedSymbols { symbols: Vec<String> },

    #[error(
        "The following variable targets could not be recorded:\n  - {}\n\n\
         Targets must have one of the following ids:\n  - {}",
        .targets.join("\n  - "),
        .available.join("\n  - ")
    )]
    UnrecordedTargets {
        targets: Vec<String>,
        available: Vec<String>,
    },

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TaskResult<T> = Result<T, TaskError>;

impl From<kf_sim::SimError> for TaskError {
    fn from(err: kf_sim::SimError) -> Self {
        TaskError::Simulation(err.to_string())
    }
}
