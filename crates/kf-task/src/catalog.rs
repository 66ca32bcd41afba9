//! Algorithms the engine can run, keyed by KiSAO id.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use kf_core::ValueType;
use kf_sim::SolverMode;

/// One tunable solver setting exposed through a KiSAO parameter id.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingSpec {
    /// Engine setting key.
    pub key: &'static str,
    pub value_type: ValueType,
    pub name: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmEntry {
    pub kisao_id: &'static str,
    pub solver: SolverMode,
    pub name: &'static str,
    /// Parameter KiSAO id -> setting.
    pub settings: BTreeMap<&'static str, SettingSpec>,
}

impl AlgorithmEntry {
    /// Legal parameter ids formatted as `id: key (name)`.
    pub fn legal_parameters(&self) -> Vec<String> {
        self.settings
            .iter()
            .map(|(id, s)| format!("{id}: {} ({})", s.key, s.name))
            .collect()
    }
}

fn setting(
    id: &'static str,
    key: &'static str,
    value_type: ValueType,
    name: &'static str,
) -> (&'static str, SettingSpec) {
    (
        id,
        SettingSpec {
            key,
            value_type,
            name,
        },
    )
}

static CATALOG: LazyLock<BTreeMap<&'static str, AlgorithmEntry>> = LazyLock::new(|| {
    let cvode = AlgorithmEntry {
        kisao_id: "KISAO_0000019",
        solver: SolverMode::Cvode,
        name: "CVODE",
        settings: BTreeMap::from([
            setting("KISAO_0000209", "cvode_reltol", ValueType::Float, "relative tolerance"),
            setting("KISAO_0000211", "cvode_abstol", ValueType::Float, "absolute tolerance"),
            setting("KISAO_0000415", "cvode_mxstep", ValueType::Integer, "maximum number of steps"),
            setting("KISAO_0000467", "cvode_hmax", ValueType::Float, "maximum step size"),
        ]),
    };
    let lsoda = AlgorithmEntry {
        kisao_id: "KISAO_0000088",
        solver: SolverMode::Lsoda,
        name: "LSODA",
        settings: BTreeMap::from([
            setting("KISAO_0000209", "lsoda_rtol", ValueType::Float, "relative tolerance"),
            setting("KISAO_0000211", "lsoda_atol", ValueType::Float, "absolute tolerance"),
            setting("KISAO_0000415", "lsoda_mxstep", ValueType::Integer, "maximum number of steps"),
            setting("KISAO_0000467", "lsoda_hmax", ValueType::Float, "maximum step size"),
            setting("KISAO_0000559", "lsoda_h0", ValueType::Float, "initial step size"),
            setting("KISAO_0000485", "lsoda_hmin", ValueType::Float, "minimum step size"),
            setting(
                "KISAO_0000219",
                "lsoda_mxordn",
                ValueType::Integer,
                "maximum non-stiff order (Adams order)",
            ),
            setting(
                "KISAO_0000220",
                "lsoda_mxords",
                ValueType::Integer,
                "maximum stiff order (BDF order)",
            ),
        ]),
    };
    BTreeMap::from([(cvode.kisao_id, cvode), (lsoda.kisao_id, lsoda)])
});

/// Supported algorithms, ordered by KiSAO id.
pub fn algorithms() -> impl Iterator<Item = &'static AlgorithmEntry> {
    CATALOG.values()
}

pub fn algorithm(kisao_id: &str) -> Option<&'static AlgorithmEntry> {
    CATALOG.get(kisao_id)
}

/// Catalog entry of the algorithm that drives `mode`.
pub fn algorithm_for_mode(mode: SolverMode) -> Option<&'static AlgorithmEntry> {
    CATALOG.values().find(|entry| entry.solver == mode)
}
