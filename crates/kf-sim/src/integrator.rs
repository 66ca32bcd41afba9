//! Single-step time integrators.

use nalgebra::DVector;

use crate::error::SimResult;
use crate::model::TransientModel;

/// Outcome of one trial step.
#[derive(Clone, Debug)]
pub struct StepResult {
    /// Proposed state at `t + dt`.
    pub x: DVector<f64>,
    /// Local error estimate per component (embedded pair difference).
    pub error: DVector<f64>,
}

/// Trait for time integrators.
pub trait Integrator {
    /// Order used by the step-size controller exponent.
    fn error_order(&self) -> f64;

    /// Attempt one step of size `dt` from `(t, x)`.
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &DVector<f64>,
        dt: f64,
    ) -> SimResult<StepResult>;
}

/// Dormand-Prince 5(4) embedded Runge-Kutta pair.
#[derive(Clone, Debug, Default)]
pub struct DormandPrince;

const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
const A71: f64 = 35.0 / 384.0;
const A73: f64 = 500.0 / 1113.0;
const A74: f64 = 125.0 / 192.0;
const A75: f64 = -2187.0 / 6784.0;
const A76: f64 = 11.0 / 84.0;

// 5th minus 4th order weights
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

impl Integrator for DormandPrince {
    fn error_order(&self) -> f64 {
        5.0
    }

    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &DVector<f64>,
        dt: f64,
    ) -> SimResult<StepResult> {
        let k1 = model.rhs(t, x)?;
        let k2 = model.rhs(t + C2 * dt, &(x + &k1 * (A21 * dt)))?;
        let k3 = model.rhs(t + C3 * dt, &(x + (&k1 * A31 + &k2 * A32) * dt))?;
        let k4 = model.rhs(
            t + C4 * dt,
            &(x + (&k1 * A41 + &k2 * A42 + &k3 * A43) * dt),
        )?;
        let k5 = model.rhs(
            t + C5 * dt,
            &(x + (&k1 * A51 + &k2 * A52 + &k3 * A53 + &k4 * A54) * dt),
        )?;
        let k6 = model.rhs(
            t + dt,
            &(x + (&k1 * A61 + &k2 * A62 + &k3 * A63 + &k4 * A64 + &k5 * A65) * dt),
        )?;

        let x_new = x + (&k1 * A71 + &k3 * A73 + &k4 * A74 + &k5 * A75 + &k6 * A76) * dt;
        let k7 = model.rhs(t + dt, &x_new)?;

        let error = (&k1 * E1 + &k3 * E3 + &k4 * E4 + &k5 * E5 + &k6 * E6 + &k7 * E7) * dt;

        Ok(StepResult { x: x_new, error })
    }
}
