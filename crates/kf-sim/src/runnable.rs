//! The mutable in-memory model driven by the task core.
//!
//! A `RunnableModel` is created fresh per execution, configured in place
//! (solver mode, settings, time bounds) and simulated once.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use kf_core::{Value, ensure_finite, linspace};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::data::SimData;
use crate::error::{SimError, SimResult};
use crate::integrator::DormandPrince;
use crate::kinetics::MassActionNetwork;
use crate::model::TransientModel;
use crate::native::NativeModel;
use crate::sim::{SimOptions, run_sim};

/// Output label of the time column.
pub const TIME_LABEL: &str = "Time";

/// mxstep value of 0 selects this budget.
const DEFAULT_MAX_STEPS: usize = 500;

/// Integration mode of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SolverMode {
    /// Event-unaware mode; discrete events are ignored.
    Lsoda,
    /// Event-aware mode.
    Cvode,
}

impl SolverMode {
    pub fn id(self) -> &'static str {
        match self {
            SolverMode::Lsoda => "LSODA",
            SolverMode::Cvode => "CVODE",
        }
    }

    /// Prefix shared by every setting key of this mode.
    pub fn setting_prefix(self) -> &'static str {
        match self {
            SolverMode::Lsoda => "lsoda_",
            SolverMode::Cvode => "cvode_",
        }
    }

    pub fn supports_events(self) -> bool {
        matches!(self, SolverMode::Cvode)
    }
}

impl fmt::Display for SolverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

fn default_settings() -> BTreeMap<String, Value> {
    [
        ("cvode_reltol", Value::Float(1e-9)),
        ("cvode_abstol", Value::Float(1e-15)),
        ("cvode_mxstep", Value::Integer(1000)),
        ("cvode_hmax", Value::Float(0.0)),
        ("cvode_return_event_timepoints", Value::Boolean(true)),
        ("lsoda_rtol", Value::Float(1e-7)),
        ("lsoda_atol", Value::Float(1e-12)),
        ("lsoda_mxstep", Value::Integer(0)),
        ("lsoda_h0", Value::Float(0.0)),
        ("lsoda_hmax", Value::Float(0.0)),
        ("lsoda_hmin", Value::Float(0.0)),
        ("lsoda_mxordn", Value::Integer(12)),
        ("lsoda_mxords", Value::Integer(5)),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// In-memory model with solver configuration.
#[derive(Clone, Debug)]
pub struct RunnableModel {
    pub id: String,
    pub mode_integrator: SolverMode,
    /// Solver settings keyed by engine setting name.
    pub settings: BTreeMap<String, Value>,
    pub sim_start: f64,
    pub sim_end: f64,
    /// Number of output samples, both ends included.
    pub sim_points: usize,
    network: MassActionNetwork,
}

impl RunnableModel {
    pub fn from_native(native: &NativeModel) -> SimResult<Self> {
        Ok(Self {
            id: native.id.clone(),
            mode_integrator: SolverMode::Lsoda,
            settings: default_settings(),
            sim_start: 0.0,
            sim_end: 10.0,
            sim_points: 21,
            network: MassActionNetwork::from_native(native)?,
        })
    }

    /// Read a model from its native text file.
    pub fn load(path: &Path) -> SimResult<Self> {
        Self::from_native(&NativeModel::read(path)?)
    }

    pub fn has_events(&self) -> bool {
        self.network.has_events()
    }

    pub fn fixed_species(&self) -> impl Iterator<Item = &str> {
        self.network.fixed_species()
    }

    /// Constant value of a fixed species.
    pub fn fixed_value(&self, id: &str) -> Option<f64> {
        if self.network.fixed_species().any(|s| s == id) {
            self.network.species_value(id)
        } else {
            None
        }
    }

    /// Labels of the output trace: time, then every dynamic species.
    pub fn output_labels(&self) -> Vec<String> {
        std::iter::once(TIME_LABEL.to_string())
            .chain(self.network.dynamic_species().map(str::to_string))
            .collect()
    }

    /// Settings of the active mode, keyed by engine setting name.
    pub fn active_settings(&self) -> BTreeMap<String, Value> {
        let prefix = self.mode_integrator.setting_prefix();
        self.settings
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn float_setting(&self, key: &str) -> SimResult<f64> {
        let value = self.settings.get(key).ok_or_else(|| SimError::InvalidSetting {
            key: key.to_string(),
            message: "missing".to_string(),
        })?;
        match value.as_f64() {
            Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
            _ => Err(SimError::InvalidSetting {
                key: key.to_string(),
                message: format!("expected a non-negative number, got {value}"),
            }),
        }
    }

    fn step_budget(&self, key: &str) -> SimResult<usize> {
        let value = self.settings.get(key).ok_or_else(|| SimError::InvalidSetting {
            key: key.to_string(),
            message: "missing".to_string(),
        })?;
        match value.as_i64() {
            Some(0) => Ok(DEFAULT_MAX_STEPS),
            Some(v) if v > 0 => Ok(v as usize),
            _ => Err(SimError::InvalidSetting {
                key: key.to_string(),
                message: format!("expected a non-negative integer, got {value}"),
            }),
        }
    }

    fn bool_setting(&self, key: &str) -> SimResult<bool> {
        self.settings
            .get(key)
            .and_then(Value::as_bool)
            .ok_or_else(|| SimError::InvalidSetting {
                key: key.to_string(),
                message: "expected a boolean".to_string(),
            })
    }

    /// Integration options derived from the active mode's settings.
    pub fn solver_options(&self) -> SimResult<SimOptions> {
        match self.mode_integrator {
            SolverMode::Lsoda => Ok(SimOptions {
                rtol: self.float_setting("lsoda_rtol")?,
                atol: self.float_setting("lsoda_atol")?,
                max_steps: self.step_budget("lsoda_mxstep")?,
                h0: self.float_setting("lsoda_h0")?,
                hmax: self.float_setting("lsoda_hmax")?,
                hmin: self.float_setting("lsoda_hmin")?,
                handle_events: false,
                return_event_timepoints: false,
            }),
            SolverMode::Cvode => Ok(SimOptions {
                rtol: self.float_setting("cvode_reltol")?,
                atol: self.float_setting("cvode_abstol")?,
                max_steps: self.step_budget("cvode_mxstep")?,
                h0: 0.0,
                hmax: self.float_setting("cvode_hmax")?,
                hmin: 0.0,
                handle_events: true,
                return_event_timepoints: self.bool_setting("cvode_return_event_timepoints")?,
            }),
        }
    }

    /// Integrate over `[sim_start, sim_end]` with `sim_points` samples.
    pub fn simulate(&self) -> SimResult<SimData> {
        let start = ensure_finite(self.sim_start, "simulation start")?;
        let end = ensure_finite(self.sim_end, "simulation end")?;
        if end <= start {
            return Err(SimError::InvalidArg {
                what: "simulation end must be after simulation start",
            });
        }
        let opts = self.solver_options()?;
        if self.has_events() && !opts.handle_events {
            tracing::debug!(mode = %self.mode_integrator, "model events are ignored in this mode");
        }

        let grid = linspace(start, end, self.sim_points);
        let mut network = self.network.clone();
        let record = run_sim(&mut network, &DormandPrince, &grid, &opts)?;

        let n_cols = 1 + network.dim();
        let values = DMatrix::from_fn(record.t.len(), n_cols, |row, col| {
            if col == 0 {
                record.t[row]
            } else {
                record.x[row][col - 1]
            }
        });

        let data = SimData {
            values,
            labels: self.output_labels(),
        };
        tracing::debug!(
            model = %self.id,
            mode = %self.mode_integrator,
            samples = data.n_samples(),
            "simulation finished"
        );
        Ok(data)
    }
}
