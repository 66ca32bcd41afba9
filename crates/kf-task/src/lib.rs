//! Simulation task execution core for kineflow.
//!
//! Takes a uniform time-course task and a list of variables, and runs it
//! against a reaction network model:
//!
//! 1. resolve the requested KiSAO algorithm, substituting under the policy;
//! 2. apply algorithm parameter overrides;
//! 3. switch to the event-aware solver when the model has events;
//! 4. configure the sampling grid;
//! 5. simulate once and map the output onto the variables.
//!
//! Fatal conditions are [`TaskError`]s. Recoverable ones are returned as
//! [`TaskWarning`]s and also emitted through `tracing`.

pub mod catalog;
pub mod config;
pub mod cwd;
pub mod data;
pub mod error;
pub mod events;
pub mod exec;
pub mod extract;
pub mod log;
pub mod ontology;
pub mod parameters;
pub mod policy;
pub mod resolver;
pub mod time_course;
pub mod validation;
pub mod warning;

pub use catalog::{AlgorithmEntry, SettingSpec};
pub use config::Config;
pub use cwd::WorkingDirGuard;
pub use data::{
    Algorithm, AlgorithmParameterChange, ModelChange, ModelRef, TIME_SYMBOL, Task,
    UniformTimeCourseSimulation, Variable, VariableResults,
};
pub use error::{TaskError, TaskResult};
pub use exec::{PreprocessedTask, TaskOutcome, exec_task, exec_task_with, preprocess_task};
pub use log::{SimulatorDetails, TaskLog};
pub use policy::SubstitutionPolicy;
pub use warning::TaskWarning;
