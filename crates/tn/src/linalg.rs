//! Decompositions backed by `faer`: PSD square roots, null vectors,
//! dominant eigenvalues and unitary completion of a state vector.

use crate::{CMatrix, C64};
use faer::Mat;

fn to_faer(m: &CMatrix) -> Mat<C64> {
    let mut out = Mat::<C64>::zeros(m.rows, m.cols);
    for r in 0..m.rows {
        for c in 0..m.cols {
            out.write(r, c, m.get(r, c));
        }
    }
    out
}

/// Principal square root of a Hermitian positive semidefinite matrix.
///
/// For PSD input the SVD coincides with the eigendecomposition, so
/// `sqrt(M) = U·sqrt(S)·U†`.
pub fn sqrtm_psd(m: &CMatrix) -> CMatrix {
    assert!(m.is_square(), "sqrtm_psd needs a square matrix");
    let n = m.rows;

    let svd = to_faer(m).thin_svd();
    let s = svd.s_diagonal();
    let u = svd.u();

    let mut out = CMatrix::zeros(n, n);
    for k in 0..n {
        let root = s.read(k).re.max(0.0).sqrt();
        if root == 0.0 {
            continue;
        }
        for i in 0..n {
            let uik = u.read(i, k) * root;
            for j in 0..n {
                let cur = out.get(i, j);
                out.set(i, j, cur + uik * u.read(j, k).conj());
            }
        }
    }
    out
}

/// Right singular vector belonging to the smallest singular value, together
/// with that singular value.
pub fn null_vector(m: &CMatrix) -> (Vec<C64>, f64) {
    assert!(m.is_square(), "null_vector needs a square matrix");
    let n = m.cols;

    let svd = to_faer(m).thin_svd();
    let s = svd.s_diagonal();
    let v = svd.v();

    // singular values come sorted in decreasing order
    let last = n - 1;
    let vec = (0..n).map(|i| v.read(i, last)).collect();
    (vec, s.read(last).re)
}

/// Eigenvalue of largest modulus of a general (non-Hermitian) square
/// matrix. Among eigenvalues of equal modulus the first one `faer` reports
/// wins; callers that only read the modulus are unaffected.
pub fn dominant_eigenvalue(m: &CMatrix) -> C64 {
    assert!(m.is_square(), "dominant_eigenvalue needs a square matrix");
    to_faer(m)
        .complex_eigenvalues()
        .into_iter()
        .fold(C64::new(0.0, 0.0), |best, z| if z.norm() > best.norm() { z } else { best })
}

/// A unitary whose first column is the unit vector `v`.
///
/// Built from a single Householder reflection that carries `e0` (with the
/// phase of `v[0]`) onto `v`, so the result is exact up to rounding.
pub fn unitary_with_first_column(v: &[C64]) -> CMatrix {
    let d = v.len();
    let norm = v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
    assert!(norm > 0.0, "cannot extend a zero vector");
    let v: Vec<C64> = v.iter().map(|z| z / norm).collect();

    let phase = if v[0].norm() > 1e-14 {
        v[0] / v[0].norm()
    } else {
        C64::new(1.0, 0.0)
    };

    let mut w = v.clone();
    w[0] -= phase;
    let w_norm_sqr: f64 = w.iter().map(|z| z.norm_sqr()).sum();

    let mut reflect = CMatrix::identity(d);
    if w_norm_sqr > 1e-28 {
        for i in 0..d {
            for j in 0..d {
                let cur = reflect.get(i, j);
                reflect.set(i, j, cur - w[i] * w[j].conj() * (2.0 / w_norm_sqr));
            }
        }
    }

    let mut phases = vec![C64::new(1.0, 0.0); d];
    phases[0] = phase;
    reflect.matmul(&CMatrix::diagonal(&phases))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> C64 {
        C64::new(re, im)
    }

    #[test]
    fn sqrt_of_density_matrix_squares_back() {
        let rho = CMatrix::from_rows(&[
            vec![c(0.7, 0.0), c(0.1, -0.2)],
            vec![c(0.1, 0.2), c(0.3, 0.0)],
        ]);
        let root = sqrtm_psd(&rho);
        assert!(root.matmul(&root).approx_eq(&rho, 1e-10));
        assert!(root.approx_eq(&root.dagger(), 1e-10));
    }

    #[test]
    fn null_vector_of_singular_matrix() {
        let m = CMatrix::from_rows(&[
            vec![c(1.0, 0.0), c(1.0, 0.0)],
            vec![c(2.0, 0.0), c(2.0, 0.0)],
        ]);
        let (v, s) = null_vector(&m);
        assert!(s < 1e-12, "s = {}", s);
        assert!((v[0] + v[1]).norm() < 1e-12);
    }

    #[test]
    fn dominant_eigenvalue_of_a_plus_minus_pair() {
        let t = CMatrix::diagonal(&[c(0.8, 0.0), c(-0.8, 0.0), c(0.3, 0.0)]);
        let lambda = dominant_eigenvalue(&t);
        assert!((lambda.norm() - 0.8).abs() < 1e-12, "lambda = {}", lambda);

        // non-normal, spectrum ±0.6
        let t = CMatrix::from_rows(&[
            vec![c(0.0, 0.0), c(0.9, 0.0)],
            vec![c(0.4, 0.0), c(0.0, 0.0)],
        ]);
        let lambda = dominant_eigenvalue(&t);
        assert!((lambda.norm() - 0.6).abs() < 1e-12, "lambda = {}", lambda);
    }

    #[test]
    fn dominant_eigenvalue_of_a_conjugate_pair() {
        // rotation by a quarter turn scaled by 0.9: spectrum ±0.9i
        let t = CMatrix::from_rows(&[
            vec![c(0.0, 0.0), c(-0.9, 0.0), c(0.0, 0.0)],
            vec![c(0.9, 0.0), c(0.0, 0.0), c(0.0, 0.0)],
            vec![c(0.0, 0.0), c(0.0, 0.0), c(0.5, 0.0)],
        ]);
        let lambda = dominant_eigenvalue(&t);
        assert!((lambda.norm() - 0.9).abs() < 1e-12, "lambda = {}", lambda);
        assert!(lambda.re.abs() < 1e-12, "lambda = {}", lambda);
    }

    #[test]
    fn completion_keeps_first_column() {
        let v = [c(0.0, 0.5), c(0.5, 0.0), c(0.5, 0.0), c(0.0, -0.5)];
        let u = unitary_with_first_column(&v);
        assert!(u.is_unitary(1e-12));
        for (i, vi) in v.iter().enumerate() {
            assert!((u.get(i, 0) - vi).norm() < 1e-12);
        }

        let e0 = [c(1.0, 0.0), c(0.0, 0.0)];
        assert!(unitary_with_first_column(&e0).approx_eq(&CMatrix::identity(2), 1e-14));
    }
}
