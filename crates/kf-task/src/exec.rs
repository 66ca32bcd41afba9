//! Task execution pipeline.

use std::collections::BTreeMap;
use std::path::Path;

use kf_model::{ModelError, ModelLoader, NetworkLoader};
use kf_sim::{RunnableModel, SimData};

use crate::catalog::AlgorithmEntry;
use crate::config::Config;
use crate::cwd::WorkingDirGuard;
use crate::data::{Task, Variable, VariableResults};
use crate::error::{TaskError, TaskResult};
use crate::events::select_event_solver;
use crate::extract::extract_variables;
use crate::log::TaskLog;
use crate::parameters::apply_parameter_changes;
use crate::resolver::resolve_algorithm;
use crate::time_course::configure_time_course;
use crate::validation::ensure_valid;
use crate::warning::TaskWarning;

/// Work that only depends on the task descriptors, reusable across runs.
#[derive(Debug, Clone)]
pub struct PreprocessedTask {
    /// Algorithm that runs, after substitution.
    pub algorithm: &'static AlgorithmEntry,
    /// Target path -> model element id.
    pub target_ids: BTreeMap<String, String>,
    /// Warnings raised while preprocessing.
    pub warnings: Vec<TaskWarning>,
}

#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub results: VariableResults,
    /// Present when logging is enabled.
    pub log: Option<TaskLog>,
    pub warnings: Vec<TaskWarning>,
}

fn import_error(source: &Path, err: ModelError) -> TaskError {
    match err {
        ModelError::InvalidTarget { .. } => TaskError::InvalidTarget(err.to_string()),
        other => TaskError::ModelImport {
            path: source.to_path_buf(),
            cause: other.to_string(),
        },
    }
}

/// Validate the descriptors, resolve the algorithm and resolve every target.
pub fn preprocess_task(
    task: &Task,
    variables: &[Variable],
    config: &Config,
) -> TaskResult<PreprocessedTask> {
    if config.validate_inputs {
        ensure_valid(task, variables)?;
    }

    let targets: Vec<&str> = variables
        .iter()
        .filter_map(|v| v.target.as_deref())
        .collect();
    let target_ids = if targets.is_empty() {
        BTreeMap::new()
    } else {
        let source = &task.model.source;
        let doc = kf_model::load_document(source).map_err(|err| import_error(source, err))?;
        kf_model::resolve_targets(&doc, targets).map_err(|err| import_error(source, err))?
    };

    let mut warnings = Vec::new();
    let algorithm = resolve_algorithm(
        &task.simulation.algorithm.kisao_id,
        config.algorithm_substitution_policy,
        &mut warnings,
    )?;
    tracing::debug!(
        task = %task.id,
        requested = %task.simulation.algorithm.kisao_id,
        resolved = algorithm.kisao_id,
        targets = target_ids.len(),
        "task preprocessed"
    );

    Ok(PreprocessedTask {
        algorithm,
        target_ids,
        warnings,
    })
}

/// Execute a task against a YAML network model.
pub fn exec_task(
    task: &Task,
    variables: &[Variable],
    preprocessed: Option<&PreprocessedTask>,
    config: &Config,
) -> TaskResult<TaskOutcome> {
    exec_task_with(&NetworkLoader, task, variables, preprocessed, config)
}

/// Execute a task, building the model with `loader`.
///
/// The working directory is restored before returning, whether the run
/// succeeds or fails.
pub fn exec_task_with<L: ModelLoader + ?Sized>(
    loader: &L,
    task: &Task,
    variables: &[Variable],
    preprocessed: Option<&PreprocessedTask>,
    config: &Config,
) -> TaskResult<TaskOutcome> {
    let _cwd = WorkingDirGuard::new()?;

    let owned;
    let preprocessed = match preprocessed {
        Some(p) => p,
        None => {
            owned = preprocess_task(task, variables, config)?;
            &owned
        }
    };
    let policy = config.algorithm_substitution_policy;
    let sim = &task.simulation;
    let mut warnings = preprocessed.warnings.clone();

    let mut model = loader
        .load(&task.model.source)
        .map_err(|err| import_error(&task.model.source, err))?;

    model.mode_integrator = preprocessed.algorithm.solver;
    if preprocessed.algorithm.kisao_id == sim.algorithm.kisao_id {
        apply_parameter_changes(
            &mut model,
            preprocessed.algorithm,
            &sim.algorithm.changes,
            policy,
            &mut warnings,
        )?;
    }
    select_event_solver(&mut model, policy, &mut warnings)?;
    configure_time_course(&mut model, sim)?;

    let data = run_simulation(&model)?;
    let results = extract_variables(
        &data,
        &model,
        variables,
        &preprocessed.target_ids,
        sim.number_of_points,
    )?;

    let log = config.log.then(|| TaskLog::from_model(&model));
    tracing::debug!(task = %task.id, variables = results.len(), warnings = warnings.len(), "task executed");
    Ok(TaskOutcome {
        results,
        log,
        warnings,
    })
}

/// Integrate once over the configured grid.
fn run_simulation(model: &RunnableModel) -> TaskResult<SimData> {
    tracing::debug!(
        model = %model.id,
        mode = %model.mode_integrator,
        points = model.sim_points,
        "simulating"
    );
    Ok(model.simulate()?)
}
