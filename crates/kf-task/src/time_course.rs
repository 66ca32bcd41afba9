//! Sampling grid of a uniform time course.

use kf_core::is_integral;
use kf_sim::RunnableModel;

use crate::data::UniformTimeCourseSimulation;
use crate::error::{TaskError, TaskResult};

/// Number of engine samples needed to cover `[initial_time, output_end_time]`
/// at the output spacing.
///
/// The engine integrates from the initial time, so the output window's
/// spacing is stretched back to it. The result must be an exact integer.
pub fn sim_points(sim: &UniformTimeCourseSimulation) -> TaskResult<usize> {
    let points = sim.number_of_points as f64 * (sim.output_end_time - sim.initial_time)
        / (sim.output_end_time - sim.output_start_time)
        + 1.0;
    if !is_integral(points) || points < 1.0 {
        return Err(TaskError::NonIntegralTimeGrid { sim_points: points });
    }
    Ok(points as usize)
}

/// Set the model's time bounds and sample count.
pub fn configure_time_course(
    model: &mut RunnableModel,
    sim: &UniformTimeCourseSimulation,
) -> TaskResult<()> {
    let points = sim_points(sim)?;
    model.sim_start = sim.initial_time;
    model.sim_end = sim.output_end_time;
    model.sim_points = points;
    tracing::debug!(
        start = model.sim_start,
        end = model.sim_end,
        points,
        "time course configured"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Algorithm;
    use proptest::prelude::*;

    fn sim(initial: f64, start: f64, end: f64, n: usize) -> UniformTimeCourseSimulation {
        UniformTimeCourseSimulation {
            id: "sim".to_string(),
            initial_time: initial,
            output_start_time: start,
            output_end_time: end,
            number_of_points: n,
            algorithm: Algorithm {
                kisao_id: "KISAO_0000019".to_string(),
                changes: Vec::new(),
            },
        }
    }

    #[test]
    fn stretches_to_initial_time() {
        assert_eq!(sim_points(&sim(5.0, 10.0, 20.0, 20)).unwrap(), 31);
        assert_eq!(sim_points(&sim(0.0, 0.0, 10.0, 10)).unwrap(), 11);
    }

    #[test]
    fn rejects_fractional_count() {
        let err = sim_points(&sim(5.0, 10.0, 20.1, 20)).unwrap_err();
        assert!(matches!(err, TaskError::NonIntegralTimeGrid { .. }));
        assert!(
            err.to_string()
                .starts_with("Time course must specify an integer number of time points")
        );
    }

    proptest! {
        #[test]
        fn whole_multiples_of_the_window_are_integral(
            n in 1usize..200,
            k in 0u32..5,
            start in -100i32..100,
            width in 1u32..50,
        ) {
            // initial = start - k * width, so the count is n * (k + 1) + 1.
            let start = start as f64;
            let width = width as f64;
            let initial = start - k as f64 * width;
            let s = sim(initial, start, start + width, n);
            prop_assert_eq!(sim_points(&s).unwrap(), n * (k as usize + 1) + 1);
        }
    }
}
