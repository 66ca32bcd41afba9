//! Network document validation logic.

use std::collections::HashSet;

use crate::schema::{EventDef, NetworkDocument, ReactionDef, SpeciesRefDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_document(doc: &NetworkDocument) -> Result<(), ValidationError> {
    if doc.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: doc.version,
        });
    }

    // Compartments, species, parameters, reactions and events share one id space.
    let mut ids = HashSet::new();
    let all_ids = doc
        .compartments
        .iter()
        .map(|c| &c.id)
        .chain(doc.species.iter().map(|s| &s.id))
        .chain(doc.parameters.iter().map(|p| &p.id))
        .chain(doc.reactions.iter().map(|r| &r.id))
        .chain(doc.events.iter().map(|e| &e.id));
    for id in all_ids {
        if id.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "id".to_string(),
                value: String::new(),
                reason: "ids must be non-empty".to_string(),
            });
        }
        if id == "time" {
            return Err(ValidationError::InvalidValue {
                field: "id".to_string(),
                value: id.clone(),
                reason: "'time' is reserved".to_string(),
            });
        }
        if !ids.insert(id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: id.clone(),
                context: doc.id.clone(),
            });
        }
    }

    for compartment in &doc.compartments {
        if !(compartment.size.is_finite() && compartment.size > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.size", compartment.id),
                value: compartment.size.to_string(),
                reason: "must be positive".to_string(),
            });
        }
    }

    for species in &doc.species {
        if doc.compartment(&species.compartment).is_none() {
            return Err(ValidationError::MissingReference {
                id: species.compartment.clone(),
                context: format!("species {}", species.id),
            });
        }
        if !(species.initial_concentration.is_finite() && species.initial_concentration >= 0.0) {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.initial_concentration", species.id),
                value: species.initial_concentration.to_string(),
                reason: "must be non-negative".to_string(),
            });
        }
    }

    for parameter in &doc.parameters {
        if !parameter.value.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.value", parameter.id),
                value: parameter.value.to_string(),
                reason: "must be finite".to_string(),
            });
        }
    }

    for reaction in &doc.reactions {
        validate_reaction(doc, reaction)?;
    }
    for event in &doc.events {
        validate_event(doc, event)?;
    }

    Ok(())
}

fn validate_reaction(doc: &NetworkDocument, reaction: &ReactionDef) -> Result<(), ValidationError> {
    let context = format!("reaction {}", reaction.id);
    if reaction.reactants.is_empty() && reaction.products.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.reactants", reaction.id),
            value: "[]".to_string(),
            reason: "a reaction needs at least one reactant or product".to_string(),
        });
    }
    for term in reaction.reactants.iter().chain(&reaction.products) {
        validate_term(doc, term, &context)?;
    }

    for rate in std::iter::once(&reaction.forward_rate).chain(&reaction.reverse_rate) {
        if doc.parameter(rate).is_none() {
            return Err(ValidationError::MissingReference {
                id: rate.clone(),
                context: context.clone(),
            });
        }
    }
    Ok(())
}

fn validate_term(
    doc: &NetworkDocument,
    term: &SpeciesRefDef,
    context: &str,
) -> Result<(), ValidationError> {
    if doc.species(&term.species).is_none() {
        return Err(ValidationError::MissingReference {
            id: term.species.clone(),
            context: context.to_string(),
        });
    }
    if !(term.stoichiometry.is_finite() && term.stoichiometry > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: format!("{context} stoichiometry of {}", term.species),
            value: term.stoichiometry.to_string(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_event(doc: &NetworkDocument, event: &EventDef) -> Result<(), ValidationError> {
    let context = format!("event {}", event.id);
    let watched = &event.trigger.variable;
    if watched != "time" && doc.species(watched).is_none() && doc.parameter(watched).is_none() {
        return Err(ValidationError::MissingReference {
            id: watched.clone(),
            context,
        });
    }
    if !event.trigger.threshold.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.trigger.threshold", event.id),
            value: event.trigger.threshold.to_string(),
            reason: "must be finite".to_string(),
        });
    }

    for assignment in &event.assignments {
        match doc.species(&assignment.variable) {
            Some(species) if species.fixed => {
                return Err(ValidationError::InvalidValue {
                    field: format!("{}.assignments", event.id),
                    value: assignment.variable.clone(),
                    reason: "fixed species cannot be assigned".to_string(),
                });
            }
            Some(_) => {}
            None if doc.parameter(&assignment.variable).is_some() => {}
            None => {
                return Err(ValidationError::MissingReference {
                    id: assignment.variable.clone(),
                    context: context.clone(),
                });
            }
        }
        if !assignment.value.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.{}", event.id, assignment.variable),
                value: assignment.value.to_string(),
                reason: "must be finite".to_string(),
            });
        }
    }
    Ok(())
}
