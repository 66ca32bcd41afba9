//! Simulation runner and result recording.

use kf_core::ensure_finite;
use nalgebra::DVector;

use crate::error::{SimError, SimResult};
use crate::integrator::Integrator;
use crate::model::TransientModel;

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Relative tolerance of the local error test
    pub rtol: f64,
    /// Absolute tolerance of the local error test
    pub atol: f64,
    /// Maximum number of step attempts per output interval
    pub max_steps: usize,
    /// Initial step size (0 = automatic)
    pub h0: f64,
    /// Maximum step size (0 = unbounded)
    pub hmax: f64,
    /// Minimum step size (0 = no limit beyond round-off)
    pub hmin: f64,
    /// Locate and apply discrete events
    pub handle_events: bool,
    /// Record an extra sample at every event time
    pub return_event_timepoints: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-7,
            atol: 1e-12,
            max_steps: 500,
            h0: 0.0,
            hmax: 0.0,
            hmin: 0.0,
            handle_events: false,
            return_event_timepoints: false,
        }
    }
}

/// Record of simulation results.
#[derive(Clone, Debug)]
pub struct SimRecord {
    /// Sample times
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<DVector<f64>>,
}

const SAFETY: f64 = 0.9;
const FAC_MIN: f64 = 0.2;
const FAC_MAX: f64 = 5.0;

fn error_norm(err: &DVector<f64>, x0: &DVector<f64>, x1: &DVector<f64>, opts: &SimOptions) -> f64 {
    if err.is_empty() {
        return 0.0;
    }
    let sum: f64 = err
        .iter()
        .zip(x0.iter().zip(x1.iter()))
        .map(|(e, (a, b))| {
            let sc = (opts.atol + opts.rtol * a.abs().max(b.abs())).max(f64::MIN_POSITIVE);
            (e / sc).powi(2)
        })
        .sum();
    (sum / err.len() as f64).sqrt()
}

fn initial_step<M: TransientModel>(
    model: &M,
    t0: f64,
    x0: &DVector<f64>,
    span: f64,
    opts: &SimOptions,
) -> SimResult<f64> {
    if opts.h0 > 0.0 {
        return Ok(opts.h0.min(span));
    }
    if x0.is_empty() {
        return Ok(span);
    }
    let f0 = model.rhs(t0, x0)?;
    let zeros = DVector::zeros(x0.len());
    let d0 = error_norm(x0, x0, &zeros, opts);
    let d1 = error_norm(&f0, x0, &zeros, opts);
    let h = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };
    Ok(h.min(span))
}

/// Integrate `model` adaptively and sample it at every time in `grid`.
///
/// The first grid time is the start of the run. Steps are clipped so every
/// grid time is hit exactly. Event times are added to the record only when
/// `return_event_timepoints` is set.
pub fn run_sim<M: TransientModel, I: Integrator>(
    model: &mut M,
    integrator: &I,
    grid: &[f64],
    opts: &SimOptions,
) -> SimResult<SimRecord> {
    if grid.len() < 2 {
        return Err(SimError::InvalidArg {
            what: "output grid needs at least two time points",
        });
    }
    for &t in grid {
        ensure_finite(t, "output grid time")?;
    }
    if grid.windows(2).any(|w| w[1] <= w[0]) {
        return Err(SimError::InvalidArg {
            what: "output grid must be strictly increasing",
        });
    }
    if opts.rtol < 0.0 || opts.atol < 0.0 || (opts.rtol == 0.0 && opts.atol == 0.0) {
        return Err(SimError::InvalidArg {
            what: "tolerances must be non-negative and not both zero",
        });
    }
    if opts.max_steps == 0 {
        return Err(SimError::InvalidArg {
            what: "max_steps must be positive",
        });
    }

    let order = integrator.error_order();
    let mut t = grid[0];
    let mut x = model.initial_state();
    if x.len() != model.dim() {
        return Err(SimError::InvalidArg {
            what: "initial state does not match model dimension",
        });
    }

    let mut t_record = vec![t];
    let mut x_record = vec![x.clone()];

    if opts.handle_events {
        model.arm_events(t, &x);
    }

    let mut h = initial_step(model, t, &x, grid[grid.len() - 1] - t, opts)?;

    for &t_out in &grid[1..] {
        let mut attempts = 0;
        while t < t_out {
            if attempts >= opts.max_steps {
                return Err(SimError::TooManySteps {
                    t,
                    max_steps: opts.max_steps,
                });
            }
            attempts += 1;

            let remaining = t_out - t;
            let mut dt = h.min(remaining);
            if opts.hmax > 0.0 {
                dt = dt.min(opts.hmax);
            }
            let lands = remaining - dt <= 1e-12 * t_out.abs().max(1.0);
            if lands {
                dt = remaining;
            }

            let trial = integrator.step(model, t, &x, dt)?;
            let err = error_norm(&trial.error, &x, &trial.x, opts);

            if err.is_finite() && err <= 1.0 {
                let mut t_new = if lands { t_out } else { t + dt };
                let mut x_new = trial.x;

                if opts.handle_events
                    && let Some(mut hit) = model.locate_event(t, &x, t_new, &x_new)
                {
                    if hit.t < t_new {
                        x_new = integrator.step(model, t, &x, hit.t - t)?.x;
                        t_new = hit.t;
                    } else {
                        hit.t = t_new;
                    }
                    model.apply_event(&hit, &mut x_new)?;
                    if opts.return_event_timepoints && t_new < t_out {
                        t_record.push(t_new);
                        x_record.push(x_new.clone());
                    }
                }

                if let Some(i) = x_new.iter().position(|v| !v.is_finite()) {
                    return Err(SimError::NonPhysical {
                        what: format!("state component {i} became non-finite at t = {t_new}"),
                    });
                }

                t = t_new;
                x = x_new;
                if opts.handle_events {
                    model.arm_events(t, &x);
                }

                let factor = if err == 0.0 {
                    FAC_MAX
                } else {
                    (SAFETY * err.powf(-1.0 / order)).clamp(FAC_MIN, FAC_MAX)
                };
                // A step clipped to the grid says nothing about the next step size.
                h = if lands { h.max(dt * factor) } else { dt * factor };
            } else {
                let factor = if err.is_finite() {
                    (SAFETY * err.powf(-1.0 / order)).max(FAC_MIN)
                } else {
                    FAC_MIN
                };
                h = dt * factor;
                let floor = opts.hmin.max(16.0 * f64::EPSILON * t.abs().max(1.0));
                if h < floor {
                    return Err(SimError::StepSizeUnderflow { t, h });
                }
            }
        }

        t_record.push(t_out);
        x_record.push(x.clone());
    }

    Ok(SimRecord {
        t: t_record,
        x: x_record,
    })
}
