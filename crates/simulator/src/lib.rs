//! Variational optimization of circuit-encoded iMPS tensors: environment
//! fixed points, ground states and Loschmidt-echo quenches.

pub mod environment;
pub mod error;
pub mod evolve;
pub mod ground_state;
pub mod loschmidt;
pub mod objective;
pub mod optimizer;
pub mod output;
pub mod record;
pub mod trajectory;

pub use environment::EnvironmentOptimizer;
pub use error::{Result, SimulatorError};
pub use evolve::EvolutionOptimizer;
pub use ground_state::GroundStateOptimizer;
pub use loschmidt::{echo_series, loschmidt_evolve, EchoPoint, QuenchConfig, RecordSchedule};
pub use objective::{EnvironmentObjective, Objective, ObjectiveResult, SwapVariant};
pub use optimizer::Optimizer;
pub use record::{OptimizationRecord, Operands};
pub use trajectory::Trajectory;
