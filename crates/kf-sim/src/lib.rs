//! Numerical engine for kineflow reaction networks.
//!
//! Provides:
//! - Native (solver-ready) model form, read from a JSON text file
//! - Mass-action right-hand side over the dynamic species
//! - Adaptive Dormand-Prince 5(4) integration onto a fixed output grid
//! - Discrete events (threshold triggers with assignments)
//! - `RunnableModel`, the mutable in-memory model the task core drives

pub mod data;
pub mod error;
pub mod integrator;
pub mod kinetics;
pub mod model;
pub mod native;
pub mod runnable;
pub mod sim;

mod events;

// Re-exports for public API
pub use data::SimData;
pub use error::{SimError, SimResult};
pub use integrator::{DormandPrince, Integrator, StepResult};
pub use kinetics::MassActionNetwork;
pub use model::{EventHit, TransientModel};
pub use native::{
    Direction, NativeAssignment, NativeEvent, NativeModel, NativeParameter, NativeReaction,
    NativeSpecies, NativeTerm, NativeTrigger,
};
pub use runnable::{RunnableModel, SolverMode, TIME_LABEL};
pub use sim::{SimOptions, SimRecord, run_sim};
