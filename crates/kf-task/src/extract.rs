//! Mapping engine output columns onto requested variables.

use std::collections::BTreeMap;

use kf_sim::{RunnableModel, SimData, TIME_LABEL};

use crate::data::{TIME_SYMBOL, Variable, VariableResults};
use crate::error::{TaskError, TaskResult};

/// Record every variable from `data`, keeping the last `n_points + 1` samples.
///
/// `target_ids` maps target paths to model element ids. Targets whose id has
/// no output column fall back to the constant value of a fixed species.
/// Problems are collected across all variables before failing; unsupported
/// symbols are reported ahead of unrecorded targets.
pub fn extract_variables(
    data: &SimData,
    model: &RunnableModel,
    variables: &[Variable],
    target_ids: &BTreeMap<String, String>,
    n_points: usize,
) -> TaskResult<VariableResults> {
    let keep = n_points + 1;
    let skip = data.n_samples().saturating_sub(keep);
    let index = data.label_index();
    let tail = |label: &str| -> Option<Vec<f64>> {
        index
            .get(label)
            .map(|&i| data.values.column(i).iter().skip(skip).copied().collect())
    };

    let mut results = VariableResults::new();
    let mut unsupported_symbols = Vec::new();
    let mut unrecorded_targets = Vec::new();

    for variable in variables {
        if let Some(symbol) = &variable.symbol {
            if symbol == TIME_SYMBOL
                && let Some(time) = tail(TIME_LABEL)
            {
                results.insert(variable.id.clone(), time);
            } else {
                unsupported_symbols.push(symbol.clone());
            }
        } else if let Some(target) = &variable.target {
            let id = target_ids.get(target);
            let column = id.and_then(|id| tail(id.as_str()));
            let fixed = id.and_then(|id| model.fixed_value(id));
            match (column, fixed) {
                (Some(column), _) => {
                    results.insert(variable.id.clone(), column);
                }
                (None, Some(value)) => {
                    results.insert(variable.id.clone(), vec![value; keep]);
                }
                (None, None) => unrecorded_targets.push(target.clone()),
            }
        } else {
            unrecorded_targets.push(format!("(variable `{}` has no target)", variable.id));
        }
    }

    if !unsupported_symbols.is_empty() {
        unsupported_symbols.sort();
        return Err(TaskError::UnsupportedSymbols {
            symbols: unsupported_symbols,
        });
    }
    if !unrecorded_targets.is_empty() {
        unrecorded_targets.sort();
        let mut available: Vec<String> = data
            .labels
            .iter()
            .filter(|label| *label != TIME_LABEL)
            .cloned()
            .collect();
        available.sort();
        return Err(TaskError::UnrecordedTargets {
            targets: unrecorded_targets,
            available,
        });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kf_sim::{NativeModel, NativeParameter, NativeSpecies};
    use nalgebra::DMatrix;

    fn species(id: &str, initial: f64, fixed: bool) -> NativeSpecies {
        NativeSpecies {
            id: id.to_string(),
            initial,
            fixed,
        }
    }

    fn model() -> RunnableModel {
        RunnableModel::from_native(&NativeModel {
            id: "m".to_string(),
            species: vec![species("A", 1.0, false), species("F", 4.0, true)],
            parameters: vec![NativeParameter {
                id: "k".to_string(),
                value: 0.3,
            }],
            reactions: Vec::new(),
            events: Vec::new(),
        })
        .unwrap()
    }

    /// Five samples of time and A on 0..4.
    fn data() -> SimData {
        SimData {
            values: DMatrix::from_fn(5, 2, |row, col| {
                if col == 0 {
                    row as f64
                } else {
                    10.0 * row as f64
                }
            }),
            labels: vec![TIME_LABEL.to_string(), "A".to_string()],
        }
    }

    fn targets() -> BTreeMap<String, String> {
        ["A", "F"]
            .into_iter()
            .map(|id| (format!("/network/listOfSpecies/species[@id='{id}']"), id.to_string()))
            .chain(std::iter::once((
                "/network/listOfParameters/parameter[@id='k']".to_string(),
                "k".to_string(),
            )))
            .collect()
    }

    #[test]
    fn keeps_trailing_samples() {
        let variables = [
            Variable::time("t"),
            Variable::target("a", "/network/listOfSpecies/species[@id='A']"),
        ];
        let results = extract_variables(&data(), &model(), &variables, &targets(), 2).unwrap();
        assert_eq!(results["t"], vec![2.0, 3.0, 4.0]);
        assert_eq!(results["a"], vec![20.0, 30.0, 40.0]);
    }

    #[test]
    fn fixed_species_are_constant() {
        let variables = [Variable::target(
            "f",
            "/network/listOfSpecies/species[@id='F']",
        )];
        let results = extract_variables(&data(), &model(), &variables, &targets(), 3).unwrap();
        assert_eq!(results["f"], vec![4.0; 4]);
    }

    #[test]
    fn parameters_are_not_recorded() {
        let variables = [Variable::target(
            "k",
            "/network/listOfParameters/parameter[@id='k']",
        )];
        let err = extract_variables(&data(), &model(), &variables, &targets(), 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The following variable targets could not be recorded:\n  \
             - /network/listOfParameters/parameter[@id='k']\n\n\
             Targets must have one of the following ids:\n  - A"
        );
    }

    #[test]
    fn symbol_errors_come_first_and_are_sorted() {
        let variables = [
            Variable {
                id: "x".to_string(),
                symbol: Some("urn:sedml:symbol:zeta".to_string()),
                target: None,
            },
            Variable {
                id: "y".to_string(),
                symbol: Some("urn:sedml:symbol:alpha".to_string()),
                target: None,
            },
            Variable::target("k", "/network/listOfParameters/parameter[@id='k']"),
        ];
        let err = extract_variables(&data(), &model(), &variables, &targets(), 3).unwrap_err();
        match err {
            TaskError::UnsupportedSymbols { symbols } => assert_eq!(
                symbols,
                vec!["urn:sedml:symbol:alpha", "urn:sedml:symbol:zeta"]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }
}
