//! Conversion of network documents into engine models.

use std::path::Path;

use kf_sim::{
    NativeAssignment, NativeEvent, NativeModel, NativeParameter, NativeReaction, NativeSpecies,
    NativeTerm, NativeTrigger, RunnableModel,
};

use crate::schema::{NetworkDocument, SpeciesRefDef};
use crate::{ModelResult, load_document};

/// Builds a fresh runnable model from a model source file.
pub trait ModelLoader {
    fn load(&self, source: &Path) -> ModelResult<RunnableModel>;
}

/// Loads YAML network documents.
///
/// The document is validated, converted to the engine's native text form in a
/// temporary file and read back by the engine. The temporary file is removed
/// once the model is built, whatever the outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkLoader;

impl ModelLoader for NetworkLoader {
    fn load(&self, source: &Path) -> ModelResult<RunnableModel> {
        let doc = load_document(source)?;
        let native = to_native(&doc);

        let file = tempfile::Builder::new()
            .prefix("kineflow-")
            .suffix(".kfn")
            .tempfile()?;
        native.write(file.path())?;
        tracing::debug!(
            source = %source.display(),
            native = %file.path().display(),
            "converted network document"
        );
        let model = RunnableModel::load(file.path())?;
        file.close()?;
        Ok(model)
    }
}

fn terms(refs: &[SpeciesRefDef]) -> Vec<NativeTerm> {
    refs.iter()
        .map(|r| NativeTerm {
            species: r.species.clone(),
            stoichiometry: r.stoichiometry,
        })
        .collect()
}

/// Convert a validated document into the engine's native model.
pub fn to_native(doc: &NetworkDocument) -> NativeModel {
    NativeModel {
        id: doc.id.clone(),
        species: doc
            .species
            .iter()
            .map(|s| NativeSpecies {
                id: s.id.clone(),
                initial: s.initial_concentration,
                fixed: s.fixed,
            })
            .collect(),
        parameters: doc
            .parameters
            .iter()
            .map(|p| NativeParameter {
                id: p.id.clone(),
                value: p.value,
            })
            .collect(),
        reactions: doc
            .reactions
            .iter()
            .map(|r| NativeReaction {
                id: r.id.clone(),
                reactants: terms(&r.reactants),
                products: terms(&r.products),
                forward: r.forward_rate.clone(),
                reverse: r.reverse_rate.clone(),
            })
            .collect(),
        events: doc
            .events
            .iter()
            .map(|e| NativeEvent {
                id: e.id.clone(),
                trigger: NativeTrigger {
                    variable: e.trigger.variable.clone(),
                    direction: e.trigger.direction,
                    threshold: e.trigger.threshold,
                },
                assignments: e
                    .assignments
                    .iter()
                    .map(|a| NativeAssignment {
                        variable: a.variable.clone(),
                        value: a.value,
                    })
                    .collect(),
            })
            .collect(),
    }
}
