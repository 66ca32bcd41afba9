//! Error types for simulation operations.

use kf_core::CoreError;
use thiserror::Error;

/// Errors encountered while loading or integrating a model.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Invalid solver setting '{key}': {message}")]
    InvalidSetting { key: String, message: String },

    #[error("Invalid model: {message}")]
    Model { message: String },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: String },

    #[error("Maximum number of steps ({max_steps}) exceeded before t = {t}")]
    TooManySteps { t: f64, max_steps: usize },

    #[error("Step size {h:e} fell below the minimum at t = {t}")]
    StepSizeUnderflow { t: f64, h: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Native model format error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
