//! Execution configuration.

use serde::{Deserialize, Serialize};

use crate::error::{TaskError, TaskResult};
use crate::policy::SubstitutionPolicy;

pub const VALIDATE_ENV: &str = "VALIDATE_SEDML";
pub const LOG_ENV: &str = "LOG";
pub const POLICY_ENV: &str = "ALGORITHM_SUBSTITUTION_POLICY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Check task and variable descriptors before running.
    pub validate_inputs: bool,
    /// Build a [`crate::TaskLog`] for each execution.
    pub log: bool,
    pub algorithm_substitution_policy: SubstitutionPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            validate_inputs: true,
            log: true,
            algorithm_substitution_policy: SubstitutionPolicy::default(),
        }
    }
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> TaskResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults
    /// for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> TaskResult<Self> {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| -> TaskResult<bool> {
            match lookup(key) {
                None => Ok(default),
                Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                    "1" | "true" => Ok(true),
                    "0" | "false" => Ok(false),
                    _ => Err(TaskError::InvalidConfig {
                        key: key.to_string(),
                        value: raw,
                        reason: "expected a boolean".to_string(),
                    }),
                },
            }
        };

        let algorithm_substitution_policy = match lookup(POLICY_ENV) {
            None => defaults.algorithm_substitution_policy,
            Some(raw) => raw
                .parse()
                .map_err(|reason| TaskError::InvalidConfig {
                    key: POLICY_ENV.to_string(),
                    value: raw.clone(),
                    reason,
                })?,
        };

        Ok(Self {
            validate_inputs: flag(VALIDATE_ENV, defaults.validate_inputs)?,
            log: flag(LOG_ENV, defaults.log)?,
            algorithm_substitution_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.validate_inputs);
        assert!(config.log);
        assert_eq!(
            config.algorithm_substitution_policy,
            SubstitutionPolicy::SimilarVariables
        );
    }

    #[test]
    fn reads_environment_names() {
        let config = Config::from_lookup(lookup(&[
            (VALIDATE_ENV, "0"),
            (LOG_ENV, "False"),
            (POLICY_ENV, "none"),
        ]))
        .unwrap();
        assert!(!config.validate_inputs);
        assert!(!config.log);
        assert_eq!(config.algorithm_substitution_policy, SubstitutionPolicy::None);
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = Config::from_lookup(lookup(&[(POLICY_ENV, "SOMETIMES")])).unwrap_err();
        assert!(err.to_string().contains(POLICY_ENV));
    }

    #[test]
    fn deserializes_partial_config() {
        let config: Config =
            serde_json::from_str(r#"{"algorithm_substitution_policy": "ANY"}"#).unwrap();
        assert!(config.validate_inputs);
        assert_eq!(config.algorithm_substitution_policy, SubstitutionPolicy::Any);
    }
}
