use quantum::QuantumError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimulatorError>;

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error(transparent)]
    Quantum(#[from] QuantumError),

    /// The minimizer itself failed to run. Non-convergence is not reported
    /// here; it comes back as an ordinary result.
    #[error("minimizer failed: {0}")]
    Minimizer(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("trajectory is empty")]
    EmptyTrajectory,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
