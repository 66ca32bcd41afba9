//! Record of what actually ran.

use std::collections::BTreeMap;

use kf_core::Value;
use kf_sim::RunnableModel;
use serde::{Deserialize, Serialize};

use crate::catalog;

/// Engine entry point recorded in every log.
pub const SIMULATE_METHOD: &str = "kf_sim::RunnableModel::simulate";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskLog {
    /// KiSAO id of the algorithm executed, after any substitution.
    pub algorithm: String,
    pub simulator_details: SimulatorDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorDetails {
    pub method: String,
    /// Settings of the active solver, keyed by engine setting name.
    pub arguments: BTreeMap<String, Value>,
}

impl TaskLog {
    pub fn from_model(model: &RunnableModel) -> Self {
        let algorithm = catalog::algorithm_for_mode(model.mode_integrator)
            .map_or_else(|| model.mode_integrator.to_string(), |e| e.kisao_id.to_string());
        Self {
            algorithm,
            simulator_details: SimulatorDetails {
                method: SIMULATE_METHOD.to_string(),
                arguments: model.active_settings(),
            },
        }
    }
}
