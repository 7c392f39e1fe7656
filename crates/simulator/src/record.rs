use crate::objective::Diagnostics;
use crate::optimizer::Minimum;
use serde::{Deserialize, Serialize};
use tn::CMatrix;

/// The fixed side of an optimization: the state unitary it was run against
/// and, when there is one, the target environment or evolution unitary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operands {
    pub state: CMatrix,
    pub target: Option<CMatrix>,
}

/// Result of one optimizer call. Built once, never edited.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRecord {
    pub operands: Operands,
    pub params: Vec<f64>,
    pub cost: f64,
    pub iterations: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<f64>>,
    pub diagnostics: Diagnostics,
}

impl OptimizationRecord {
    pub fn new(operands: Operands, minimum: Minimum, recorded: bool) -> Self {
        Self {
            operands,
            params: minimum.params,
            cost: minimum.cost,
            iterations: minimum.iterations,
            trace: recorded.then_some(minimum.trace),
            diagnostics: minimum.diagnostics,
        }
    }
}
