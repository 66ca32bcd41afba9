//! Non-fatal conditions raised while executing a task.

use std::fmt;

use kf_core::ValueType;

#[derive(Debug, Clone, PartialEq)]
pub enum TaskWarning {
    /// The requested algorithm is unavailable and a permitted substitute runs instead.
    AlgorithmSubstituted {
        requested: String,
        substitute: String,
    },
    /// The model declares events the resolved solver cannot handle.
    EventSolverForced {
        requested: String,
        substitute: String,
    },
    /// A parameter change names a parameter the algorithm does not have.
    ParameterIgnored { kisao_id: String, legal: Vec<String> },
    /// A parameter change value does not match the parameter's type.
    InvalidValueIgnored {
        value: String,
        value_type: ValueType,
        kisao_id: String,
    },
}

impl TaskWarning {
    /// Whether a different algorithm than the requested one runs.
    pub fn is_substitution(&self) -> bool {
        matches!(
            self,
            TaskWarning::AlgorithmSubstituted { .. } | TaskWarning::EventSolverForced { .. }
        )
    }
}

impl fmt::Display for TaskWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskWarning::AlgorithmSubstituted {
                requested,
                substitute,
            } => write!(
                f,
                "'{requested}' is not supported. '{substitute}' will be used instead"
            ),
            TaskWarning::EventSolverForced {
                requested,
                substitute,
            } => write!(
                f,
                "{substitute} will be used rather than {requested} because the model has events"
            ),
            TaskWarning::ParameterIgnored { kisao_id, legal } => write!(
                f,
                "Algorithm parameter with KiSAO id '{kisao_id}' was ignored because it is not supported. \
                 Parameter must have one of the following KiSAO ids:\n  - {}",
                legal.join("\n  - ")
            ),
            TaskWarning::InvalidValueIgnored {
                value,
                value_type,
                kisao_id,
            } => write!(
                f,
                "'{value}' was ignored because it is not a valid {value_type} value for parameter {kisao_id}"
            ),
        }
    }
}
