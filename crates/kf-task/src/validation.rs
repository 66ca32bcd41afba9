//! Structural checks on caller-supplied descriptors.

use std::collections::HashSet;

use kf_core::value::is_kisao_id;
use kf_model::NETWORK_LANGUAGE;

use crate::data::{Task, Variable};
use crate::error::{TaskError, TaskResult};

/// Problems with the task descriptor, empty when it is runnable.
pub fn validate_task(task: &Task) -> Vec<String> {
    let mut problems = Vec::new();

    if task.model.language != NETWORK_LANGUAGE {
        problems.push(format!(
            "Language `{}` of model `{}` is not supported; it must be `{NETWORK_LANGUAGE}`",
            task.model.language, task.model.id
        ));
    }
    if !task.model.changes.is_empty() {
        problems.push(format!(
            "Model `{}` has {} changes; changes are not supported",
            task.model.id,
            task.model.changes.len()
        ));
    }

    let sim = &task.simulation;
    let times = [sim.initial_time, sim.output_start_time, sim.output_end_time];
    if times.iter().any(|t| !t.is_finite()) {
        problems.push(format!("Simulation `{}` times must be finite", sim.id));
    } else {
        if sim.output_start_time < sim.initial_time {
            problems.push(format!(
                "Output start time {} of simulation `{}` must be at least its initial time {}",
                sim.output_start_time, sim.id, sim.initial_time
            ));
        }
        if sim.output_end_time <= sim.output_start_time {
            problems.push(format!(
                "Output end time {} of simulation `{}` must be after its output start time {}",
                sim.output_end_time, sim.id, sim.output_start_time
            ));
        }
    }
    if sim.number_of_points < 1 {
        problems.push(format!(
            "Simulation `{}` must have at least one time point",
            sim.id
        ));
    }

    if !is_kisao_id(&sim.algorithm.kisao_id) {
        problems.push(format!(
            "Algorithm id `{}` is not a KiSAO id",
            sim.algorithm.kisao_id
        ));
    }
    for change in &sim.algorithm.changes {
        if !is_kisao_id(&change.kisao_id) {
            problems.push(format!(
                "Algorithm parameter id `{}` is not a KiSAO id",
                change.kisao_id
            ));
        }
    }

    problems
}

/// Problems with the variable list, empty when every variable is well formed.
pub fn validate_variables(variables: &[Variable]) -> Vec<String> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();
    for variable in variables {
        if variable.id.is_empty() {
            problems.push("Variables must have ids".to_string());
        } else if !seen.insert(variable.id.as_str()) {
            problems.push(format!("Variable id `{}` is repeated", variable.id));
        }
        match (&variable.symbol, &variable.target) {
            (Some(_), Some(_)) => problems.push(format!(
                "Variable `{}` must define a symbol or a target, not both",
                variable.id
            )),
            (None, None) => problems.push(format!(
                "Variable `{}` must define a symbol or a target",
                variable.id
            )),
            _ => {}
        }
    }
    problems
}

pub(crate) fn ensure_valid(task: &Task, variables: &[Variable]) -> TaskResult<()> {
    let mut problems = validate_task(task);
    problems.extend(validate_variables(variables));
    if problems.is_empty() {
        Ok(())
    } else {
        Err(TaskError::InvalidTask {
            task: task.id.clone(),
            problems,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Algorithm, ModelChange, ModelRef, UniformTimeCourseSimulation};

    fn task() -> Task {
        Task {
            id: "task".to_string(),
            model: ModelRef {
                id: "model".to_string(),
                source: "model.yaml".into(),
                language: NETWORK_LANGUAGE.to_string(),
                changes: Vec::new(),
            },
            simulation: UniformTimeCourseSimulation {
                id: "sim".to_string(),
                initial_time: 0.0,
                output_start_time: 0.0,
                output_end_time: 10.0,
                number_of_points: 10,
                algorithm: Algorithm {
                    kisao_id: "KISAO_0000019".to_string(),
                    changes: Vec::new(),
                },
            },
        }
    }

    #[test]
    fn well_formed_task_passes() {
        assert!(validate_task(&task()).is_empty());
        assert!(ensure_valid(&task(), &[Variable::time("t")]).is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let mut t = task();
        t.model.language = "urn:sedml:language:sbml".to_string();
        t.model.changes.push(ModelChange {
            target: "/network/listOfSpecies/species[@id='A']".to_string(),
            new_value: "1".to_string(),
        });
        t.simulation.output_start_time = -1.0;
        t.simulation.number_of_points = 0;
        t.simulation.algorithm.kisao_id = "CVODE".to_string();
        assert_eq!(validate_task(&t).len(), 5);
    }

    #[test]
    fn empty_time_window_is_invalid() {
        let mut t = task();
        t.simulation.output_end_time = t.simulation.output_start_time;
        let problems = validate_task(&t);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("must be after"));
    }

    #[test]
    fn variables_need_unique_ids_and_one_source() {
        let both = Variable {
            id: "b".to_string(),
            symbol: Some(crate::data::TIME_SYMBOL.to_string()),
            target: Some("/network/listOfSpecies/species[@id='A']".to_string()),
        };
        let neither = Variable {
            id: "n".to_string(),
            symbol: None,
            target: None,
        };
        let problems =
            validate_variables(&[Variable::time("t"), Variable::time("t"), both, neither]);
        assert_eq!(problems.len(), 3);

        let err = ensure_valid(&task(), &[Variable::time("")]).unwrap_err();
        assert!(err.to_string().starts_with("Task `task` is invalid:"));
    }
}
