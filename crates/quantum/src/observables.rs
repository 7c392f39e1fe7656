use crate::gates::{pauli_x, pauli_y, pauli_z};
use tn::{CMatrix, C64};

/// `Tr(ρ O)` for Hermitian `O`.
pub fn expect(rho: &CMatrix, op: &CMatrix) -> f64 {
    rho.matmul(op).trace().re
}

/// Bloch vector of a single-qubit density matrix.
pub fn bloch_vector(rho: &CMatrix) -> [f64; 3] {
    [
        expect(rho, &pauli_x()),
        expect(rho, &pauli_y()),
        expect(rho, &pauli_z()),
    ]
}

pub fn bloch_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// `Tr(ρσ)`.
pub fn overlap(rho: &CMatrix, sigma: &CMatrix) -> f64 {
    rho.matmul(sigma).trace().re
}

/// Normalised Hilbert–Schmidt distance `Tr((ρ-σ)²)/2`, 1 for orthogonal
/// pure states.
pub fn hs_distance(rho: &CMatrix, sigma: &CMatrix) -> f64 {
    let d = rho.sub(sigma);
    (d.matmul(&d).trace() * C64::new(0.5, 0.0)).re
}
