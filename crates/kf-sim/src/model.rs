//! TransientModel trait for pluggable dynamic systems.

use nalgebra::DVector;

use crate::error::SimResult;

/// A located discrete event: the time of the earliest trigger crossing inside
/// a step and the indices of the events that cross there.
#[derive(Clone, Debug, PartialEq)]
pub struct EventHit {
    pub t: f64,
    pub events: Vec<usize>,
}

/// Trait for transient (dynamic) system models.
///
/// A TransientModel must implement:
/// - State dimension and initial state
/// - RHS (right-hand side) computation: x_dot = f(t, x)
///
/// Models with discrete events also override the event hooks. The defaults
/// describe a model without events.
pub trait TransientModel {
    /// Number of dynamic state variables.
    fn dim(&self) -> usize;

    /// Initial state at the start of the run.
    fn initial_state(&self) -> DVector<f64>;

    /// Compute state derivative dxdt = f(t, x).
    fn rhs(&self, t: f64, x: &DVector<f64>) -> SimResult<DVector<f64>>;

    /// Earliest armed trigger crossing in `(t0, t1]`, if any.
    fn locate_event(
        &self,
        _t0: f64,
        _x0: &DVector<f64>,
        _t1: f64,
        _x1: &DVector<f64>,
    ) -> Option<EventHit> {
        None
    }

    /// Apply the assignments of the events in `hit` at time `hit.t`.
    fn apply_event(&mut self, _hit: &EventHit, _x: &mut DVector<f64>) -> SimResult<()> {
        Ok(())
    }

    /// Re-arm every trigger that is currently false.
    fn arm_events(&mut self, _t: f64, _x: &DVector<f64>) {}
}
