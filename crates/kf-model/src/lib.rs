//! kf-model: reaction network document format, validation and conversion.
//!
//! The structural document is YAML. Observables address its elements with
//! XPath-like target paths, and the loader converts it into the engine's
//! native form through one transient file.

pub mod convert;
pub mod schema;
pub mod target;
pub mod validate;

pub use convert::{ModelLoader, NetworkLoader, to_native};
pub use schema::*;
pub use target::{ElementKind, TargetRef, parse_target, resolve_target, resolve_targets};
pub use validate::{ValidationError, validate_document};

/// Language URN of network documents.
pub const NETWORK_LANGUAGE: &str = "urn:sedml:language:kineflow";

/// Newest document version this crate reads.
pub const LATEST_VERSION: u32 = 1;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Engine error: {0}")]
    Sim(#[from] kf_sim::SimError),
}

pub fn load_document(path: &std::path::Path) -> ModelResult<NetworkDocument> {
    let content = std::fs::read_to_string(path)?;
    let document: NetworkDocument = serde_yaml::from_str(&content)?;
    validate_document(&document)?;
    Ok(document)
}
