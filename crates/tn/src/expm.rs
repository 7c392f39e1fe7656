//! Matrix exponential by scaling and squaring with a truncated Taylor series.

use crate::{CMatrix, C64};

const TAYLOR_TERMS: usize = 18;

/// `exp(a)` for a square matrix.
///
/// The matrix is scaled by `2^-s` until its 1-norm is at most 1/2, the
/// series is summed, and the result squared `s` times.
pub fn expm(a: &CMatrix) -> CMatrix {
    assert!(a.is_square(), "expm needs a square matrix");

    let mut norm = a.one_norm();
    let mut squarings = 0u32;
    while norm > 0.5 {
        norm /= 2.0;
        squarings += 1;
    }
    let scaled = a.scale(C64::new(0.5f64.powi(squarings as i32), 0.0));

    let mut result = CMatrix::identity(a.rows);
    let mut term = CMatrix::identity(a.rows);
    for k in 1..=TAYLOR_TERMS {
        term = term.matmul(&scaled).scale(C64::new(1.0 / k as f64, 0.0));
        result = result.add(&term);
    }

    for _ in 0..squarings {
        result = result.matmul(&result);
    }
    result
}

/// `exp(i·t·h)`, unitary when `h` is Hermitian.
pub fn unitary_exp(h: &CMatrix, t: f64) -> CMatrix {
    expm(&h.scale(C64::new(0.0, t)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_of_pauli_x_is_rotation() {
        let o = C64::new(1.0, 0.0);
        let z = C64::new(0.0, 0.0);
        let x = CMatrix::from_rows(&[vec![z, o], vec![o, z]]);
        let theta = 1.3_f64;
        let u = unitary_exp(&x, theta);

        assert!((u.get(0, 0) - C64::new(theta.cos(), 0.0)).norm() < 1e-12);
        assert!((u.get(0, 1) - C64::new(0.0, theta.sin())).norm() < 1e-12);
        assert!(u.is_unitary(1e-12));
    }

    #[test]
    fn large_norm_is_scaled() {
        let d = CMatrix::diagonal(&[C64::new(3.0, 0.0), C64::new(-2.0, 0.0)]);
        let e = expm(&d);
        assert!((e.get(0, 0).re - 3.0f64.exp()).abs() < 1e-9);
        assert!((e.get(1, 1).re - (-2.0f64).exp()).abs() < 1e-12);
        assert!(e.get(0, 1).norm() < 1e-14);
    }
}
