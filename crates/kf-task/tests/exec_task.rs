//! Integration test: full task execution against YAML network fixtures.

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use kf_core::Value;
use kf_model::{ModelLoader, ModelResult, NETWORK_LANGUAGE};
use kf_sim::{NativeModel, NativeSpecies, RunnableModel};
use kf_task::{
    Algorithm, AlgorithmParameterChange, Config, ModelRef, SubstitutionPolicy, Task, TaskError,
    TaskWarning, UniformTimeCourseSimulation, Variable, exec_task, exec_task_with,
    preprocess_task,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn species_target(id: &str) -> String {
    format!("/network/listOfSpecies/species[@id='{id}']")
}

fn task(model: &str, kisao_id: &str) -> Task {
    Task {
        id: "task".to_string(),
        model: ModelRef {
            id: "model".to_string(),
            source: fixture(model),
            language: NETWORK_LANGUAGE.to_string(),
            changes: Vec::new(),
        },
        simulation: UniformTimeCourseSimulation {
            id: "sim".to_string(),
            initial_time: 0.0,
            output_start_time: 0.0,
            output_end_time: 10.0,
            number_of_points: 20,
            algorithm: Algorithm {
                kisao_id: kisao_id.to_string(),
                changes: Vec::new(),
            },
        },
    }
}

fn change(kisao_id: &str, new_value: &str) -> AlgorithmParameterChange {
    AlgorithmParameterChange {
        kisao_id: kisao_id.to_string(),
        new_value: new_value.to_string(),
    }
}

fn config(policy: SubstitutionPolicy) -> Config {
    Config {
        algorithm_substitution_policy: policy,
        ..Config::default()
    }
}

fn variables() -> Vec<Variable> {
    vec![
        Variable::time("time"),
        Variable::target("a", species_target("A")),
        Variable::target("b", species_target("B")),
    ]
}

#[test]
fn cataloged_algorithm_is_logged_unchanged() {
    for kisao_id in ["KISAO_0000019", "KISAO_0000088"] {
        let outcome = exec_task(
            &task("decay.yaml", kisao_id),
            &variables(),
            None,
            &Config::default(),
        )
        .unwrap();
        let log = outcome.log.expect("logging is on by default");
        assert_eq!(log.algorithm, kisao_id);
        assert_eq!(log.simulator_details.method, "kf_sim::RunnableModel::simulate");
        assert!(outcome.warnings.is_empty());
    }
}

#[test]
fn results_follow_the_output_grid() {
    let outcome = exec_task(
        &task("decay.yaml", "KISAO_0000019"),
        &variables(),
        None,
        &Config::default(),
    )
    .unwrap();

    let time = &outcome.results["time"];
    assert_eq!(time.len(), 21);
    for (i, t) in time.iter().enumerate() {
        assert_relative_eq!(*t, i as f64 * 0.5, epsilon = 1e-12);
    }
    for values in outcome.results.values() {
        assert_eq!(values.len(), 21);
        assert!(values.iter().all(|v| !v.is_nan()));
    }

    let a = &outcome.results["a"];
    let b = &outcome.results["b"];
    for i in 0..21 {
        assert_relative_eq!(a[i], 2.0 * (-0.5 * time[i]).exp(), max_relative = 1e-6);
        assert_relative_eq!(a[i] + b[i], 2.0, max_relative = 1e-6);
    }
}

#[test]
fn output_window_after_initial_time() {
    let mut t = task("decay.yaml", "KISAO_0000088");
    t.simulation.initial_time = 5.0;
    t.simulation.output_start_time = 10.0;
    t.simulation.output_end_time = 20.0;
    t.simulation.number_of_points = 20;

    let outcome = exec_task(&t, &variables(), None, &Config::default()).unwrap();
    let time = &outcome.results["time"];
    assert_eq!(time.len(), 21);
    assert_relative_eq!(time[0], 10.0, epsilon = 1e-9);
    assert_relative_eq!(time[20], 20.0, epsilon = 1e-12);
    // A starts decaying at the initial time, not the output start.
    assert_relative_eq!(
        outcome.results["a"][0],
        2.0 * (-0.5f64 * 5.0).exp(),
        max_relative = 1e-5
    );

    t.simulation.output_end_time = 20.1;
    let err = exec_task(&t, &variables(), None, &Config::default()).unwrap_err();
    assert!(matches!(err, TaskError::NonIntegralTimeGrid { .. }));
}

#[test]
fn fixed_species_are_reported_as_constants() {
    let outcome = exec_task(
        &task("decay.yaml", "KISAO_0000088"),
        &[Variable::target("c", species_target("C"))],
        None,
        &Config::default(),
    )
    .unwrap();
    assert_eq!(outcome.results["c"], vec![7.0; 21]);
}

#[test]
fn parameter_overrides_reach_the_log() {
    let mut t = task("decay.yaml", "KISAO_0000088");
    t.simulation.algorithm.changes = vec![
        change("KISAO_0000209", "1e-9"),
        change("KISAO_0000415", "5000"),
    ];
    let outcome = exec_task(&t, &variables(), None, &config(SubstitutionPolicy::None)).unwrap();
    let arguments = outcome.log.unwrap().simulator_details.arguments;
    assert_eq!(arguments["lsoda_rtol"], Value::Float(1e-9));
    assert_eq!(arguments["lsoda_mxstep"], Value::Integer(5000));
    assert!(arguments.keys().all(|k| k.starts_with("lsoda_")));
}

#[test]
fn unknown_parameter_depends_on_policy() {
    let mut t = task("decay.yaml", "KISAO_0000019");
    t.simulation.algorithm.changes = vec![change("KISAO_0000559", "0.1")];

    let err = exec_task(&t, &variables(), None, &config(SubstitutionPolicy::None)).unwrap_err();
    assert!(matches!(err, TaskError::UnsupportedParameter { ref kisao_id, .. } if kisao_id == "KISAO_0000559"));

    let outcome = exec_task(&t, &variables(), None, &config(SubstitutionPolicy::SameMethod)).unwrap();
    assert!(matches!(
        outcome.warnings[..],
        [TaskWarning::ParameterIgnored { .. }]
    ));
    assert_eq!(outcome.results["a"].len(), 21);
}

#[test]
fn invalid_parameter_value_under_strict_policy() {
    let mut t = task("decay.yaml", "KISAO_0000019");
    t.simulation.algorithm.changes = vec![change("KISAO_0000415", "many")];
    let err = exec_task(&t, &variables(), None, &config(SubstitutionPolicy::None)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "'many' is not a valid integer value for parameter KISAO_0000415"
    );
}

#[test]
fn events_with_lsoda_depend_on_policy() {
    let t = task("refill.yaml", "KISAO_0000088");

    let err = exec_task(&t, &variables(), None, &config(SubstitutionPolicy::SameVariables))
        .unwrap_err();
    assert!(matches!(err, TaskError::ModelFeatureUnsupported { .. }));

    let outcome = exec_task(&t, &variables(), None, &Config::default()).unwrap();
    let log = outcome.log.unwrap();
    assert_eq!(log.algorithm, "KISAO_0000019");
    assert_eq!(
        log.simulator_details.arguments["cvode_return_event_timepoints"],
        Value::Boolean(false)
    );
    assert!(outcome.warnings.iter().any(TaskWarning::is_substitution));

    // No extra rows for the event time.
    assert_eq!(outcome.results["time"].len(), 21);
    // The refill at t = 2 ln 2 lifts A back up.
    assert!(outcome.results["a"][4] > outcome.results["a"][2]);
}

#[test]
fn substituted_algorithm_skips_parameter_changes() {
    let mut t = task("decay.yaml", "KISAO_0000560");
    t.simulation.algorithm.changes = vec![change("KISAO_0000209", "not a number")];

    let outcome = exec_task(&t, &variables(), None, &config(SubstitutionPolicy::SameMethod)).unwrap();
    assert_eq!(outcome.log.unwrap().algorithm, "KISAO_0000088");
    assert_eq!(
        outcome.warnings,
        vec![TaskWarning::AlgorithmSubstituted {
            requested: "KISAO_0000560".to_string(),
            substitute: "KISAO_0000088".to_string(),
        }]
    );

    let err = exec_task(&t, &variables(), None, &config(SubstitutionPolicy::None)).unwrap_err();
    assert!(matches!(err, TaskError::UnsupportedAlgorithm { .. }));
}

#[test]
fn unsupported_symbols_and_unrecorded_targets() {
    let t = task("decay.yaml", "KISAO_0000019");

    let err = exec_task(
        &t,
        &[Variable {
            id: "x".to_string(),
            symbol: Some("urn:sedml:symbol:amount".to_string()),
            target: None,
        }],
        None,
        &Config::default(),
    )
    .unwrap_err();
    assert!(matches!(err, TaskError::UnsupportedSymbols { .. }));
    assert!(err.to_string().contains("urn:sedml:symbol:time"));

    let err = exec_task(
        &t,
        &[Variable::target(
            "k",
            "/network/listOfParameters/parameter[@id='k1']",
        )],
        None,
        &Config::default(),
    )
    .unwrap_err();
    match err {
        TaskError::UnrecordedTargets { targets, available } => {
            assert_eq!(targets, vec!["/network/listOfParameters/parameter[@id='k1']"]);
            assert_eq!(available, vec!["A", "B"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unresolvable_target_fails_before_simulation() {
    let err = exec_task(
        &task("decay.yaml", "KISAO_0000019"),
        &[Variable::target("z", species_target("Z"))],
        None,
        &Config::default(),
    )
    .unwrap_err();
    assert!(matches!(err, TaskError::InvalidTarget(_)));
}

#[test]
fn broken_model_is_an_import_error() {
    let mut t = task("decay.yaml", "KISAO_0000019");
    t.model.source = fixture("missing.yaml");
    let err = exec_task(&t, &[Variable::time("time")], None, &Config::default()).unwrap_err();
    assert!(matches!(err, TaskError::ModelImport { .. }));
    assert!(err.to_string().starts_with("Model at "));
    assert!(err.to_string().contains("could not be imported:\n  "));
}

#[test]
fn invalid_task_is_rejected_when_validating() {
    let mut t = task("decay.yaml", "KISAO_0000019");
    t.model.language = "urn:sedml:language:sbml".to_string();
    let err = exec_task(&t, &variables(), None, &Config::default()).unwrap_err();
    assert!(matches!(err, TaskError::InvalidTask { .. }));

    let lenient = Config {
        validate_inputs: false,
        ..Config::default()
    };
    assert!(exec_task(&t, &variables(), None, &lenient).is_ok());
}

#[test]
fn logging_can_be_disabled() {
    let quiet = Config {
        log: false,
        ..Config::default()
    };
    let outcome = exec_task(&task("decay.yaml", "KISAO_0000019"), &variables(), None, &quiet).unwrap();
    assert!(outcome.log.is_none());
}

#[test]
fn preprocessed_task_is_reusable() {
    let t = task("decay.yaml", "KISAO_0000088");
    let vars = variables();
    let config = Config::default();
    let pre = preprocess_task(&t, &vars, &config).unwrap();
    assert_eq!(pre.algorithm.kisao_id, "KISAO_0000088");
    assert_eq!(pre.target_ids[&species_target("B")], "B");

    let first = exec_task(&t, &vars, Some(&pre), &config).unwrap();
    let second = exec_task(&t, &vars, Some(&pre), &config).unwrap();
    assert_eq!(first.results, second.results);
}

/// Builds a single constant species without touching the filesystem.
struct InMemoryLoader;

impl ModelLoader for InMemoryLoader {
    fn load(&self, _source: &Path) -> ModelResult<RunnableModel> {
        let native = NativeModel {
            id: "memory".to_string(),
            species: vec![NativeSpecies {
                id: "A".to_string(),
                initial: 3.0,
                fixed: false,
            }],
            parameters: Vec::new(),
            reactions: Vec::new(),
            events: Vec::new(),
        };
        Ok(RunnableModel::from_native(&native)?)
    }
}

#[test]
fn custom_loader_drives_the_pipeline() {
    let outcome = exec_task_with(
        &InMemoryLoader,
        &task("decay.yaml", "KISAO_0000019"),
        &[Variable::time("time")],
        None,
        &Config::default(),
    )
    .unwrap();
    assert_eq!(outcome.results["time"].len(), 21);
}

#[test]
fn task_descriptor_reads_from_yaml() {
    let content = std::fs::read_to_string(fixture("task.yaml")).unwrap();
    let mut t: Task = serde_yaml::from_str(&content).unwrap();
    assert_eq!(t.simulation.number_of_points, 20);
    assert_eq!(t.simulation.algorithm.changes.len(), 1);

    t.model.source = fixture(&t.model.source.to_string_lossy());
    let outcome = exec_task(&t, &variables(), None, &Config::default()).unwrap();
    assert_eq!(
        outcome.log.unwrap().simulator_details.arguments["lsoda_rtol"],
        Value::Float(1e-9)
    );
}
