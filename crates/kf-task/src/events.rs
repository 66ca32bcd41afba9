//! Solver override for models with discrete events.

use kf_core::Value;
use kf_sim::{RunnableModel, SolverMode};

use crate::catalog;
use crate::error::{TaskError, TaskResult};
use crate::policy::SubstitutionPolicy;
use crate::warning::TaskWarning;

const RETURN_EVENT_TIMEPOINTS: &str = "cvode_return_event_timepoints";

fn described(mode: SolverMode) -> String {
    match catalog::algorithm_for_mode(mode) {
        Some(entry) => format!("{mode} ({})", entry.kisao_id),
        None => mode.to_string(),
    }
}

/// Move an event-unaware model onto the event-aware solver when needed.
///
/// Switching requires the `SIMILAR_VARIABLES` policy. Whenever the
/// event-aware solver ends up selected, event times are kept out of the
/// output trace so the sample count matches the grid.
pub fn select_event_solver(
    model: &mut RunnableModel,
    policy: SubstitutionPolicy,
    warnings: &mut Vec<TaskWarning>,
) -> TaskResult<()> {
    if !model.mode_integrator.supports_events() && model.has_events() {
        let from = model.mode_integrator;
        policy.check(
            SubstitutionPolicy::SimilarVariables,
            || TaskError::ModelFeatureUnsupported {
                solver: from.id(),
                feature: "events",
            },
            TaskWarning::EventSolverForced {
                requested: described(from),
                substitute: described(SolverMode::Cvode),
            },
            warnings,
        )?;
        model.mode_integrator = SolverMode::Cvode;
    }

    if model.mode_integrator == SolverMode::Cvode {
        model
            .settings
            .insert(RETURN_EVENT_TIMEPOINTS.to_string(), Value::Boolean(false));
    }
    Ok(())
}
