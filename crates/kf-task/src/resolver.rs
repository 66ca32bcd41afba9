//! Requested algorithm -> runnable catalog entry.

use crate::catalog::{self, AlgorithmEntry};
use crate::error::{TaskError, TaskResult};
use crate::ontology;
use crate::policy::SubstitutionPolicy;
use crate::warning::TaskWarning;

/// Resolve `requested` against the catalog.
///
/// A cataloged id is used as is. Otherwise the closest supported algorithm
/// the policy permits runs in its place and an
/// [`TaskWarning::AlgorithmSubstituted`] is raised.
pub fn resolve_algorithm(
    requested: &str,
    policy: SubstitutionPolicy,
    warnings: &mut Vec<TaskWarning>,
) -> TaskResult<&'static AlgorithmEntry> {
    if let Some(entry) = catalog::algorithm(requested) {
        return Ok(entry);
    }

    let supported = catalog::algorithms().map(|entry| entry.kisao_id);
    let unsupported = |reason: String| TaskError::UnsupportedAlgorithm {
        kisao_id: requested.to_string(),
        reason,
    };
    let Some(substitute) = ontology::preferred_substitute(requested, supported, policy) else {
        let ids: Vec<_> = catalog::algorithms().map(|e| e.kisao_id).collect();
        return Err(unsupported(format!(
            "No supported algorithm ({}) may substitute for it under the {policy} policy",
            ids.join(", ")
        )));
    };
    let entry = catalog::algorithm(substitute)
        .ok_or_else(|| unsupported(format!("substitute {substitute} is not cataloged")))?;

    policy.warn(
        TaskWarning::AlgorithmSubstituted {
            requested: requested.to_string(),
            substitute: entry.kisao_id.to_string(),
        },
        warnings,
    );
    Ok(entry)
}
