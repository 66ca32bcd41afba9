//! Native (solver-ready) model form.
//!
//! This is the flat text form the engine reads. Structural documents are
//! converted into it by an external conversion step; the engine never sees
//! the structural markup itself.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NativeModel {
    pub id: String,
    #[serde(default)]
    pub species: Vec<NativeSpecies>,
    #[serde(default)]
    pub parameters: Vec<NativeParameter>,
    #[serde(default)]
    pub reactions: Vec<NativeReaction>,
    #[serde(default)]
    pub events: Vec<NativeEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NativeSpecies {
    pub id: String,
    pub initial: f64,
    /// Held constant for the whole run and left out of the output trace.
    #[serde(default)]
    pub fixed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NativeParameter {
    pub id: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NativeReaction {
    pub id: String,
    #[serde(default)]
    pub reactants: Vec<NativeTerm>,
    #[serde(default)]
    pub products: Vec<NativeTerm>,
    /// Parameter id of the forward rate constant.
    pub forward: String,
    /// Parameter id of the reverse rate constant, if reversible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NativeTerm {
    pub species: String,
    pub stoichiometry: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NativeEvent {
    pub id: String,
    pub trigger: NativeTrigger,
    #[serde(default)]
    pub assignments: Vec<NativeAssignment>,
}

/// Fires when `variable` crosses `threshold` in `direction`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NativeTrigger {
    /// `time`, a species id or a parameter id.
    pub variable: String,
    pub direction: Direction,
    pub threshold: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Above,
    Below,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NativeAssignment {
    pub variable: String,
    pub value: f64,
}

impl NativeModel {
    pub fn read(path: &Path) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn write(&self, path: &Path) -> SimResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
