//! Task files: one task plus the variables to record, in YAML.

use std::path::Path;

use kf_task::{Task, TaskLog, TaskWarning, Variable, VariableResults};
use serde::{Deserialize, Serialize};

use crate::CliResult;

#[derive(Debug, Clone, Deserialize)]
pub struct TaskFile {
    #[serde(flatten)]
    pub task: Task,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl TaskFile {
    /// Read a task file. A relative model source is taken relative to the
    /// task file's directory.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut file: TaskFile = serde_yaml::from_str(&content)?;
        if file.task.model.source.is_relative()
            && let Some(dir) = path.parent()
        {
            file.task.model.source = dir.join(&file.task.model.source);
        }
        Ok(file)
    }
}

/// What `run --output` writes.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub task: &'a str,
    pub results: &'a VariableResults,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<&'a TaskLog>,
    pub warnings: Vec<String>,
}

impl<'a> RunReport<'a> {
    pub fn new(
        task: &'a str,
        results: &'a VariableResults,
        log: Option<&'a TaskLog>,
        warnings: &[TaskWarning],
    ) -> Self {
        Self {
            task,
            results,
            log,
            warnings: warnings.iter().map(ToString::to_string).collect(),
        }
    }
}
