//! Structural target paths.
//!
//! A target addresses one element of a network document with an XPath-like
//! path whose last step carries an id predicate, for example
//! `/network/listOfSpecies/species[@id='A']`. Namespace prefixes on steps are
//! ignored.

use std::collections::BTreeMap;

use crate::schema::NetworkDocument;
use crate::{ModelError, ModelResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Species,
    Parameter,
    Compartment,
    Reaction,
}

impl ElementKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "species" => Some(ElementKind::Species),
            "parameter" => Some(ElementKind::Parameter),
            "compartment" => Some(ElementKind::Compartment),
            "reaction" => Some(ElementKind::Reaction),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Species => "species",
            ElementKind::Parameter => "parameter",
            ElementKind::Compartment => "compartment",
            ElementKind::Reaction => "reaction",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    pub kind: ElementKind,
    pub id: String,
}

fn invalid(target: &str, reason: impl Into<String>) -> ModelError {
    ModelError::InvalidTarget {
        target: target.to_string(),
        reason: reason.into(),
    }
}

fn local_name(step: &str) -> &str {
    step.rsplit_once(':').map_or(step, |(_, name)| name)
}

/// Parse a target path into the element it addresses.
pub fn parse_target(target: &str) -> ModelResult<TargetRef> {
    let path = target.trim();
    let Some(rest) = path.strip_prefix('/') else {
        return Err(invalid(target, "path must be absolute"));
    };
    let Some(last) = rest.rsplit('/').next().filter(|s| !s.is_empty()) else {
        return Err(invalid(target, "path has no steps"));
    };

    let (tag, predicate) = match last.split_once('[') {
        Some((tag, predicate)) => (tag, predicate),
        None => return Err(invalid(target, "last step needs an [@id=...] predicate")),
    };
    let Some(predicate) = predicate.strip_suffix(']') else {
        return Err(invalid(target, "unterminated predicate"));
    };

    let tag = local_name(tag.trim());
    let kind = ElementKind::from_tag(tag)
        .ok_or_else(|| invalid(target, format!("unsupported element '{tag}'")))?;

    let Some((attr, value)) = predicate.split_once('=') else {
        return Err(invalid(target, "predicate must compare @id"));
    };
    let is_id = attr
        .trim()
        .strip_prefix('@')
        .is_some_and(|name| local_name(name) == "id");
    if !is_id {
        return Err(invalid(target, "predicate must compare @id"));
    }
    let value = value.trim();
    let id = ['\'', '"']
        .iter()
        .find_map(|&q| value.strip_prefix(q).and_then(|v| v.strip_suffix(q)))
        .ok_or_else(|| invalid(target, "id must be quoted"))?;
    if id.is_empty() {
        return Err(invalid(target, "id is empty"));
    }

    Ok(TargetRef {
        kind,
        id: id.to_string(),
    })
}

/// Resolve a target to the id of the element it names in `doc`.
pub fn resolve_target(doc: &NetworkDocument, target: &str) -> ModelResult<String> {
    let target_ref = parse_target(target)?;
    let id = target_ref.id.as_str();
    let found = match target_ref.kind {
        ElementKind::Species => doc.species(id).is_some(),
        ElementKind::Parameter => doc.parameter(id).is_some(),
        ElementKind::Compartment => doc.compartment(id).is_some(),
        ElementKind::Reaction => doc.reaction(id).is_some(),
    };
    if !found {
        return Err(invalid(
            target,
            format!("no {} with id '{id}'", target_ref.kind.tag()),
        ));
    }
    Ok(target_ref.id)
}

/// Resolve several targets, keyed by target path.
pub fn resolve_targets<'a>(
    doc: &NetworkDocument,
    targets: impl IntoIterator<Item = &'a str>,
) -> ModelResult<BTreeMap<String, String>> {
    targets
        .into_iter()
        .map(|target| Ok((target.to_string(), resolve_target(doc, target)?)))
        .collect()
}
