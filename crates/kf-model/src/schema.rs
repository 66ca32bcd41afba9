//! Network document schema definitions.

use kf_sim::Direction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkDocument {
    pub version: u32,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub compartments: Vec<CompartmentDef>,
    #[serde(default)]
    pub species: Vec<SpeciesDef>,
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,
    #[serde(default)]
    pub reactions: Vec<ReactionDef>,
    #[serde(default)]
    pub events: Vec<EventDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompartmentDef {
    pub id: String,
    #[serde(default = "default_one")]
    pub size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeciesDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub compartment: String,
    pub initial_concentration: f64,
    /// Held at its initial value for the whole run.
    #[serde(default)]
    pub fixed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterDef {
    pub id: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReactionDef {
    pub id: String,
    #[serde(default)]
    pub reactants: Vec<SpeciesRefDef>,
    #[serde(default)]
    pub products: Vec<SpeciesRefDef>,
    /// Parameter holding the forward mass-action constant.
    pub forward_rate: String,
    /// Parameter holding the reverse mass-action constant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_rate: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeciesRefDef {
    pub species: String,
    #[serde(default = "default_one")]
    pub stoichiometry: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventDef {
    pub id: String,
    pub trigger: TriggerDef,
    #[serde(default)]
    pub assignments: Vec<AssignmentDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriggerDef {
    /// `time`, a species id or a parameter id.
    pub variable: String,
    pub direction: Direction,
    pub threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignmentDef {
    pub variable: String,
    pub value: f64,
}

fn default_one() -> f64 {
    1.0
}

impl NetworkDocument {
    pub fn species(&self, id: &str) -> Option<&SpeciesDef> {
        self.species.iter().find(|s| s.id == id)
    }

    pub fn parameter(&self, id: &str) -> Option<&ParameterDef> {
        self.parameters.iter().find(|p| p.id == id)
    }

    pub fn compartment(&self, id: &str) -> Option<&CompartmentDef> {
        self.compartments.iter().find(|c| c.id == id)
    }

    pub fn reaction(&self, id: &str) -> Option<&ReactionDef> {
        self.reactions.iter().find(|r| r.id == id)
    }
}
