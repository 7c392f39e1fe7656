pub mod ansatz;
pub mod backend;
pub mod circuit;
pub mod compose;
pub mod energy;
pub mod environment;
pub mod error;
pub mod gates;
pub mod hamiltonian;
pub mod measurement;
pub mod observables;
pub mod statevector;
pub mod tensor;

pub use ansatz::{AnsatzRole, ShallowAnsatz};
pub use backend::{Backend, Measurement};
pub use circuit::{CircuitBuilder, ComposedCircuit};
pub use error::{QuantumError, Result};
pub use hamiltonian::Hamiltonian;
pub use tensor::{Tensor, UnitaryTensor};
