use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuantumError>;

/// Errors raised while building or evaluating circuits.
#[derive(Debug, Error)]
pub enum QuantumError {
    /// Operand arities disagree; nothing is truncated or padded.
    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("a {rows}x{cols} matrix is not a square power-of-two gate")]
    NotAGate { rows: usize, cols: usize },

    #[error("bond dimension {0} is not a power of two >= 2")]
    BondDimension(usize),

    #[error("expected {expected} ansatz parameters, got {got}")]
    ParameterCount { expected: usize, got: usize },

    #[error("tensor power {0} is not defined")]
    InvalidPower(i32),

    #[error("qubit {qubit} out of range for a {width}-qubit register")]
    QubitOutOfRange { qubit: usize, width: usize },

    #[error("qubit {0} appears twice in one placement")]
    DuplicateQubit(usize),

    #[error("unknown Hamiltonian term '{0}'")]
    UnknownTerm(String),

    #[error("sampled backend needs at least one repetition")]
    ZeroReps,
}
