//! Algorithm ontology relations used to pick substitutes.
//!
//! Each known KiSAO algorithm belongs to a method family and a class of
//! mathematics. The closer two algorithms are, the less permissive a policy
//! needs to be to swap one for the other.

use crate::policy::SubstitutionPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MathClass {
    DeterministicOde,
    Stochastic,
    Constraint,
}

#[derive(Debug, Clone, Copy)]
struct Term {
    id: &'static str,
    family: &'static str,
    math: MathClass,
}

#[rustfmt::skip]
const TERMS: &[Term] = &[
    Term { id: "KISAO_0000019", family: "cvode", math: MathClass::DeterministicOde },
    Term { id: "KISAO_0000496", family: "cvode", math: MathClass::DeterministicOde },
    Term { id: "KISAO_0000088", family: "lsoda", math: MathClass::DeterministicOde },
    Term { id: "KISAO_0000560", family: "lsoda", math: MathClass::DeterministicOde },
    Term { id: "KISAO_0000094", family: "lsode", math: MathClass::DeterministicOde },
    Term { id: "KISAO_0000030", family: "euler", math: MathClass::DeterministicOde },
    Term { id: "KISAO_0000032", family: "runge-kutta", math: MathClass::DeterministicOde },
    Term { id: "KISAO_0000086", family: "runge-kutta", math: MathClass::DeterministicOde },
    Term { id: "KISAO_0000087", family: "runge-kutta", math: MathClass::DeterministicOde },
    Term { id: "KISAO_0000029", family: "ssa", math: MathClass::Stochastic },
    Term { id: "KISAO_0000027", family: "ssa", math: MathClass::Stochastic },
    Term { id: "KISAO_0000039", family: "tau-leaping", math: MathClass::Stochastic },
    Term { id: "KISAO_0000437", family: "fba", math: MathClass::Constraint },
];

fn term(id: &str) -> Option<&'static Term> {
    TERMS.iter().find(|t| t.id == id)
}

/// Least permissive policy under which `from` may be replaced by `to`.
///
/// `None` when either id is unknown.
pub fn required_policy(from: &str, to: &str) -> Option<SubstitutionPolicy> {
    if from == to {
        return Some(SubstitutionPolicy::None);
    }
    let (a, b) = (term(from)?, term(to)?);
    let required = if a.family == b.family {
        SubstitutionPolicy::SameMethod
    } else if a.math == MathClass::DeterministicOde && b.math == MathClass::DeterministicOde {
        SubstitutionPolicy::SimilarApproximations
    } else if matches!(
        (a.math, b.math),
        (MathClass::DeterministicOde, MathClass::Stochastic)
            | (MathClass::Stochastic, MathClass::DeterministicOde)
    ) {
        SubstitutionPolicy::DistinctScience
    } else {
        SubstitutionPolicy::Any
    };
    Some(required)
}

/// Closest algorithm among `supported` that `policy` permits in place of `requested`.
///
/// Ties go to the candidate listed first.
pub fn preferred_substitute<'a>(
    requested: &str,
    supported: impl IntoIterator<Item = &'a str>,
    policy: SubstitutionPolicy,
) -> Option<&'a str> {
    supported
        .into_iter()
        .filter_map(|id| required_policy(requested, id).map(|level| (id, level)))
        .filter(|&(_, level)| level <= policy)
        .min_by_key(|&(_, level)| level)
        .map(|(id, _)| id)
}
