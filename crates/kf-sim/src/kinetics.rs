//! Mass-action kinetics over a reaction network.

use std::collections::HashMap;

use nalgebra::DVector;

use crate::error::{SimError, SimResult};
use crate::events::{Assigned, Event, Watched, crossing_time};
use crate::model::{EventHit, TransientModel};
use crate::native::NativeModel;

#[derive(Clone, Debug)]
struct Species {
    id: String,
    initial: f64,
    /// Index into the state vector, `None` for fixed species.
    state: Option<usize>,
}

#[derive(Clone, Debug)]
struct Reaction {
    reactants: Vec<(usize, f64)>,
    products: Vec<(usize, f64)>,
    forward: usize,
    reverse: Option<usize>,
}

/// Reaction network with mass-action rate laws.
///
/// Each reaction contributes `kf * prod(reactants^s) - kr * prod(products^s)`.
/// Fixed species enter rate laws with their constant value and have no
/// derivative.
#[derive(Clone, Debug)]
pub struct MassActionNetwork {
    species: Vec<Species>,
    parameters: Vec<f64>,
    reactions: Vec<Reaction>,
    events: Vec<Event>,
    dim: usize,
}

impl MassActionNetwork {
    pub fn from_native(native: &NativeModel) -> SimResult<Self> {
        let mut species = Vec::with_capacity(native.species.len());
        let mut species_index = HashMap::new();
        let mut dim = 0;
        for s in &native.species {
            if species_index.insert(s.id.as_str(), species.len()).is_some() {
                return Err(model_error(format!("duplicate species '{}'", s.id)));
            }
            let state = if s.fixed {
                None
            } else {
                dim += 1;
                Some(dim - 1)
            };
            species.push(Species {
                id: s.id.clone(),
                initial: s.initial,
                state,
            });
        }

        let mut parameter_index = HashMap::new();
        for (i, p) in native.parameters.iter().enumerate() {
            if parameter_index.insert(p.id.as_str(), i).is_some() {
                return Err(model_error(format!("duplicate parameter '{}'", p.id)));
            }
        }

        let lookup_species = |id: &str, context: &str| {
            species_index
                .get(id)
                .copied()
                .ok_or_else(|| model_error(format!("{context} references unknown species '{id}'")))
        };
        let lookup_parameter = |id: &str, context: &str| {
            parameter_index.get(id).copied().ok_or_else(|| {
                model_error(format!("{context} references unknown parameter '{id}'"))
            })
        };

        let mut reactions = Vec::with_capacity(native.reactions.len());
        for r in &native.reactions {
            let context = format!("reaction '{}'", r.id);
            let reactants = r
                .reactants
                .iter()
                .map(|term| Ok((lookup_species(&term.species, &context)?, term.stoichiometry)))
                .collect::<SimResult<Vec<_>>>()?;
            let products = r
                .products
                .iter()
                .map(|term| Ok((lookup_species(&term.species, &context)?, term.stoichiometry)))
                .collect::<SimResult<Vec<_>>>()?;
            let forward = lookup_parameter(&r.forward, &context)?;
            let reverse = r
                .reverse
                .as_deref()
                .map(|id| lookup_parameter(id, &context))
                .transpose()?;
            reactions.push(Reaction {
                reactants,
                products,
                forward,
                reverse,
            });
        }

        let mut events = Vec::with_capacity(native.events.len());
        for e in &native.events {
            let context = format!("event '{}'", e.id);
            let var = e.trigger.variable.as_str();
            let watched = if var == "time" {
                Watched::Time
            } else if let Some(&i) = species_index.get(var) {
                match species[i].state {
                    Some(s) => Watched::State(s),
                    None => Watched::Constant(species[i].initial),
                }
            } else if let Some(&i) = parameter_index.get(var) {
                Watched::Parameter(i)
            } else {
                return Err(model_error(format!(
                    "{context} trigger watches unknown variable '{var}'"
                )));
            };

            let mut assignments = Vec::with_capacity(e.assignments.len());
            for a in &e.assignments {
                let target = if let Some(&i) = species_index.get(a.variable.as_str()) {
                    match species[i].state {
                        Some(s) => Assigned::State(s),
                        None => {
                            return Err(model_error(format!(
                                "{context} assigns fixed species '{}'",
                                a.variable
                            )));
                        }
                    }
                } else {
                    Assigned::Parameter(lookup_parameter(&a.variable, &context)?)
                };
                assignments.push((target, a.value));
            }

            events.push(Event {
                id: e.id.clone(),
                watched,
                direction: e.trigger.direction,
                threshold: e.trigger.threshold,
                assignments,
                armed: false,
                last_fired: f64::NAN,
            });
        }

        Ok(Self {
            species,
            parameters: native.parameters.iter().map(|p| p.value).collect(),
            reactions,
            events,
            dim,
        })
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Ids of the dynamic species, in state-vector order.
    pub fn dynamic_species(&self) -> impl Iterator<Item = &str> {
        self.species
            .iter()
            .filter(|s| s.state.is_some())
            .map(|s| s.id.as_str())
    }

    /// Ids of the species held constant.
    pub fn fixed_species(&self) -> impl Iterator<Item = &str> {
        self.species
            .iter()
            .filter(|s| s.state.is_none())
            .map(|s| s.id.as_str())
    }

    /// Initial (and for fixed species, permanent) value of a species.
    pub fn species_value(&self, id: &str) -> Option<f64> {
        self.species.iter().find(|s| s.id == id).map(|s| s.initial)
    }

    fn concentration(&self, species: usize, x: &DVector<f64>) -> f64 {
        let s = &self.species[species];
        match s.state {
            Some(i) => x[i],
            None => s.initial,
        }
    }

    fn mass_action(&self, terms: &[(usize, f64)], x: &DVector<f64>) -> f64 {
        terms.iter().fold(1.0, |acc, &(s, stoich)| {
            let c = self.concentration(s, x);
            if stoich == 1.0 {
                acc * c
            } else {
                acc * c.powf(stoich)
            }
        })
    }
}

fn model_error(message: String) -> SimError {
    SimError::Model { message }
}

impl TransientModel for MassActionNetwork {
    fn dim(&self) -> usize {
        self.dim
    }

    fn initial_state(&self) -> DVector<f64> {
        DVector::from_iterator(
            self.dim,
            self.species
                .iter()
                .filter(|s| s.state.is_some())
                .map(|s| s.initial),
        )
    }

    fn rhs(&self, _t: f64, x: &DVector<f64>) -> SimResult<DVector<f64>> {
        let mut dx = DVector::zeros(self.dim);
        for r in &self.reactions {
            let mut rate = self.parameters[r.forward] * self.mass_action(&r.reactants, x);
            if let Some(k) = r.reverse {
                rate -= self.parameters[k] * self.mass_action(&r.products, x);
            }
            for &(s, stoich) in &r.reactants {
                if let Some(i) = self.species[s].state {
                    dx[i] -= stoich * rate;
                }
            }
            for &(s, stoich) in &r.products {
                if let Some(i) = self.species[s].state {
                    dx[i] += stoich * rate;
                }
            }
        }
        Ok(dx)
    }

    fn locate_event(
        &self,
        t0: f64,
        x0: &DVector<f64>,
        t1: f64,
        x1: &DVector<f64>,
    ) -> Option<EventHit> {
        let mut hit: Option<EventHit> = None;
        for (i, event) in self.events.iter().enumerate() {
            if !event.armed {
                continue;
            }
            let s1 = event.signal(t1, x1, &self.parameters);
            if s1 <= 0.0 {
                continue;
            }
            let s0 = event.signal(t0, x0, &self.parameters);
            let t = crossing_time(t0, s0, t1, s1);
            let earlier = hit.as_ref().is_none_or(|h| t < h.t);
            if earlier {
                hit = Some(EventHit { t, events: vec![i] });
            } else if let Some(h) = hit.as_mut()
                && t == h.t
            {
                h.events.push(i);
            }
        }
        hit
    }

    fn apply_event(&mut self, hit: &EventHit, x: &mut DVector<f64>) -> SimResult<()> {
        for &i in &hit.events {
            let event = &mut self.events[i];
            event.armed = false;
            event.last_fired = hit.t;
            tracing::debug!(event = %event.id, t = hit.t, "event fired");
            for &(target, value) in &event.assignments {
                match target {
                    Assigned::State(s) => x[s] = value,
                    Assigned::Parameter(p) => self.parameters[p] = value,
                }
            }
        }
        Ok(())
    }

    fn arm_events(&mut self, t: f64, x: &DVector<f64>) {
        let parameters = &self.parameters;
        for event in &mut self.events {
            // An event never re-arms at the instant it fired.
            if !event.armed && event.last_fired != t && event.signal(t, x, parameters) <= 0.0 {
                event.armed = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{NativeParameter, NativeReaction, NativeSpecies, NativeTerm};

    fn isomerization() -> NativeModel {
        NativeModel {
            id: "iso".to_string(),
            species: vec![
                NativeSpecies {
                    id: "A".to_string(),
                    initial: 2.0,
                    fixed: false,
                },
                NativeSpecies {
                    id: "B".to_string(),
                    initial: 0.0,
                    fixed: false,
                },
                NativeSpecies {
                    id: "E".to_string(),
                    initial: 0.5,
                    fixed: true,
                },
            ],
            parameters: vec![
                NativeParameter {
                    id: "kf".to_string(),
                    value: 3.0,
                },
                NativeParameter {
                    id: "kr".to_string(),
                    value: 1.0,
                },
            ],
            reactions: vec![NativeReaction {
                id: "R1".to_string(),
                reactants: vec![
                    NativeTerm {
                        species: "A".to_string(),
                        stoichiometry: 1.0,
                    },
                    NativeTerm {
                        species: "E".to_string(),
                        stoichiometry: 1.0,
                    },
                ],
                products: vec![
                    NativeTerm {
                        species: "B".to_string(),
                        stoichiometry: 1.0,
                    },
                    NativeTerm {
                        species: "E".to_string(),
                        stoichiometry: 1.0,
                    },
                ],
                forward: "kf".to_string(),
                reverse: Some("kr".to_string()),
            }],
            events: Vec::new(),
        }
    }

    #[test]
    fn fixed_species_are_not_state() {
        let net = MassActionNetwork::from_native(&isomerization()).unwrap();
        assert_eq!(net.dim(), 2);
        assert_eq!(net.dynamic_species().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(net.fixed_species().collect::<Vec<_>>(), vec!["E"]);
        assert_eq!(net.species_value("E"), Some(0.5));
    }

    #[test]
    fn rhs_conserves_mass() {
        let net = MassActionNetwork::from_native(&isomerization()).unwrap();
        let x = net.initial_state();
        let dx = net.rhs(0.0, &x).unwrap();
        // kf * A * E - kr * B * E = 3 * 2 * 0.5
        assert_eq!(dx[0], -3.0);
        assert_eq!(dx[1], 3.0);
    }

    #[test]
    fn unknown_rate_parameter_is_rejected() {
        let mut native = isomerization();
        native.reactions[0].forward = "missing".to_string();
        let err = MassActionNetwork::from_native(&native).unwrap_err();
        assert!(err.to_string().contains("unknown parameter 'missing'"));
    }
}
