//! Algorithm parameter overrides.

use kf_core::{parse_value, validate_str_value};
use kf_sim::RunnableModel;

use crate::catalog::AlgorithmEntry;
use crate::data::AlgorithmParameterChange;
use crate::error::{TaskError, TaskResult};
use crate::policy::SubstitutionPolicy;
use crate::warning::TaskWarning;

/// Write each change into the model's settings under the catalog key.
///
/// Unknown parameter ids and ill-typed values are fatal under the `NONE`
/// policy; under any other policy they are skipped with a warning.
pub fn apply_parameter_changes(
    model: &mut RunnableModel,
    entry: &AlgorithmEntry,
    changes: &[AlgorithmParameterChange],
    policy: SubstitutionPolicy,
    warnings: &mut Vec<TaskWarning>,
) -> TaskResult<()> {
    for change in changes {
        let Some(setting) = entry.settings.get(change.kisao_id.as_str()) else {
            let legal = entry.legal_parameters();
            policy.check(
                SubstitutionPolicy::SameMethod,
                || TaskError::UnsupportedParameter {
                    kisao_id: change.kisao_id.clone(),
                    legal: legal.clone(),
                },
                TaskWarning::ParameterIgnored {
                    kisao_id: change.kisao_id.clone(),
                    legal: legal.clone(),
                },
                warnings,
            )?;
            continue;
        };

        if !validate_str_value(&change.new_value, setting.value_type) {
            policy.check(
                SubstitutionPolicy::SameMethod,
                || TaskError::InvalidParameterValue {
                    value: change.new_value.clone(),
                    value_type: setting.value_type,
                    kisao_id: change.kisao_id.clone(),
                },
                TaskWarning::InvalidValueIgnored {
                    value: change.new_value.clone(),
                    value_type: setting.value_type,
                    kisao_id: change.kisao_id.clone(),
                },
                warnings,
            )?;
            continue;
        }

        let value = parse_value(&change.new_value, setting.value_type).map_err(|_| {
            TaskError::InvalidParameterValue {
                value: change.new_value.clone(),
                value_type: setting.value_type,
                kisao_id: change.kisao_id.clone(),
            }
        })?;
        tracing::debug!(parameter = %change.kisao_id, key = setting.key, %value, "parameter override");
        model.settings.insert(setting.key.to_string(), value);
    }
    Ok(())
}
