//! Minimal event handling for transient simulation.

use nalgebra::DVector;

use crate::native::Direction;

/// Quantity a trigger watches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Watched {
    Time,
    State(usize),
    Constant(f64),
    Parameter(usize),
}

/// Quantity an assignment writes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Assigned {
    State(usize),
    Parameter(usize),
}

#[derive(Clone, Debug)]
pub(crate) struct Event {
    pub id: String,
    pub watched: Watched,
    pub direction: Direction,
    pub threshold: f64,
    pub assignments: Vec<(Assigned, f64)>,
    /// Trigger has been false since the last firing.
    pub armed: bool,
    /// Time of the last firing (NaN before the first).
    pub last_fired: f64,
}

impl Event {
    /// Positive while the trigger condition holds.
    pub fn signal(&self, t: f64, x: &DVector<f64>, parameters: &[f64]) -> f64 {
        let value = match self.watched {
            Watched::Time => t,
            Watched::State(i) => x[i],
            Watched::Constant(v) => v,
            Watched::Parameter(i) => parameters[i],
        };
        match self.direction {
            Direction::Above => value - self.threshold,
            Direction::Below => self.threshold - value,
        }
    }
}

/// Linear estimate of where the signal crosses zero inside `(t0, t1]`.
pub(crate) fn crossing_time(t0: f64, s0: f64, t1: f64, s1: f64) -> f64 {
    if s1 == s0 || s0 >= 0.0 {
        return t1;
    }
    let frac = (-s0 / (s1 - s0)).clamp(0.0, 1.0);
    let t = t0 + frac * (t1 - t0);
    if t <= t0 { t1.min(t0 + f64::EPSILON * t0.abs().max(1.0)) } else { t }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_is_interpolated() {
        let t = crossing_time(0.0, -1.0, 2.0, 1.0);
        assert!((t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn crossing_at_end_when_already_positive() {
        assert_eq!(crossing_time(0.0, 0.5, 2.0, 1.0), 2.0);
    }

    #[test]
    fn below_trigger_signal() {
        let event = Event {
            id: "e".to_string(),
            watched: Watched::State(0),
            direction: Direction::Below,
            threshold: 2.0,
            assignments: Vec::new(),
            armed: true,
            last_fired: f64::NAN,
        };
        let x = DVector::from_element(1, 1.5);
        assert!(event.signal(0.0, &x, &[]) > 0.0);
    }
}
