//! Integration test: YAML documents through validation, targets and loading.

use std::path::PathBuf;

use kf_model::{
    ModelError, ModelLoader, NetworkLoader, ValidationError, load_document, resolve_target,
    resolve_targets, to_native,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn loads_and_runs_decay_document() {
    let mut model = NetworkLoader.load(&fixture("decay.yaml")).unwrap();
    assert_eq!(model.id, "decay");
    assert!(!model.has_events());
    assert_eq!(model.fixed_value("C"), Some(7.0));

    model.sim_start = 0.0;
    model.sim_end = 4.0;
    model.sim_points = 5;
    let data = model.simulate().unwrap();
    assert_eq!(data.labels, vec!["Time", "A", "B"]);
    assert_eq!(data.n_samples(), 5);
}

#[test]
fn conversion_carries_parameters() {
    let doc = load_document(&fixture("decay.yaml")).unwrap();
    let native = to_native(&doc);
    let k1 = native.parameters.iter().find(|p| p.id == "k1").unwrap();
    assert_eq!(k1.value, 0.5);
}

#[test]
fn event_document_reports_events() {
    let model = NetworkLoader.load(&fixture("refill.yaml")).unwrap();
    assert!(model.has_events());
}

#[test]
fn dangling_reference_fails_validation() {
    let err = NetworkLoader.load(&fixture("dangling.yaml")).unwrap_err();
    assert!(matches!(
        err,
        ModelError::Validation(ValidationError::MissingReference { ref id, .. }) if id == "k_missing"
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = NetworkLoader.load(&fixture("absent.yaml")).unwrap_err();
    assert!(matches!(err, ModelError::Io(_)));
}

#[test]
fn targets_resolve_against_document() {
    let doc = load_document(&fixture("decay.yaml")).unwrap();
    assert_eq!(
        resolve_target(&doc, "/network/listOfSpecies/species[@id='B']").unwrap(),
        "B"
    );
    assert_eq!(
        resolve_target(&doc, "/network/listOfParameters/parameter[@id=\"k1\"]").unwrap(),
        "k1"
    );

    let err = resolve_target(&doc, "/network/listOfSpecies/species[@id='Z']").unwrap_err();
    assert!(err.to_string().contains("no species with id 'Z'"));

    // A parameter id is not a species.
    assert!(resolve_target(&doc, "/network/listOfSpecies/species[@id='k1']").is_err());
}

#[test]
fn batch_resolution_stops_at_first_bad_target() {
    let doc = load_document(&fixture("decay.yaml")).unwrap();
    let map = resolve_targets(
        &doc,
        [
            "/network/listOfSpecies/species[@id='A']",
            "/network/listOfSpecies/species[@id='C']",
        ],
    )
    .unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map["/network/listOfSpecies/species[@id='C']"], "C");

    assert!(resolve_targets(&doc, ["/network/listOfSpecies/species[@id='nope']"]).is_err());
}
