//! Algorithm substitution policy.
//!
//! Levels are ordered from "never substitute" to "anything goes". Every
//! fail-or-warn decision in the pipeline goes through
//! [`SubstitutionPolicy::check`], and every warning is raised by
//! [`SubstitutionPolicy::warn`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TaskError, TaskResult};
use crate::warning::TaskWarning;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubstitutionPolicy {
    None,
    SameMethod,
    SameMath,
    SimilarApproximations,
    DistinctApproximations,
    DistinctScience,
    SameVariables,
    #[default]
    SimilarVariables,
    Any,
}

impl SubstitutionPolicy {
    pub const ALL: [SubstitutionPolicy; 9] = [
        SubstitutionPolicy::None,
        SubstitutionPolicy::SameMethod,
        SubstitutionPolicy::SameMath,
        SubstitutionPolicy::SimilarApproximations,
        SubstitutionPolicy::DistinctApproximations,
        SubstitutionPolicy::DistinctScience,
        SubstitutionPolicy::SameVariables,
        SubstitutionPolicy::SimilarVariables,
        SubstitutionPolicy::Any,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubstitutionPolicy::None => "NONE",
            SubstitutionPolicy::SameMethod => "SAME_METHOD",
            SubstitutionPolicy::SameMath => "SAME_MATH",
            SubstitutionPolicy::SimilarApproximations => "SIMILAR_APPROXIMATIONS",
            SubstitutionPolicy::DistinctApproximations => "DISTINCT_APPROXIMATIONS",
            SubstitutionPolicy::DistinctScience => "DISTINCT_SCIENCE",
            SubstitutionPolicy::SameVariables => "SAME_VARIABLES",
            SubstitutionPolicy::SimilarVariables => "SIMILAR_VARIABLES",
            SubstitutionPolicy::Any => "ANY",
        }
    }

    /// Numeric severity, 0 for `NONE` up to 8 for `ANY`.
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Allow a recoverable deviation that needs at least `required`.
    ///
    /// When this policy is permissive enough, `warning` is logged and pushed
    /// onto `warnings`; otherwise the error built by `error` is returned.
    pub fn check(
        self,
        required: SubstitutionPolicy,
        error: impl FnOnce() -> TaskError,
        warning: TaskWarning,
        warnings: &mut Vec<TaskWarning>,
    ) -> TaskResult<()> {
        if self >= required {
            self.warn(warning, warnings);
            Ok(())
        } else {
            Err(error())
        }
    }

    /// Log `warning` and push it onto `warnings`.
    pub fn warn(self, warning: TaskWarning, warnings: &mut Vec<TaskWarning>) {
        tracing::warn!(policy = %self, "{warning}");
        warnings.push(warning);
    }
}

impl fmt::Display for SubstitutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubstitutionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|p| p.as_str()).collect();
                format!("must be one of {}", names.join(", "))
            })
    }
}
