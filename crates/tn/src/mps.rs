use crate::linalg::{dominant_eigenvalue, null_vector, sqrtm_psd};
use crate::{CMatrix, C64};

/// Site tensor `A[l, p, r]` with left bond `dl`, physical `dp`, right bond `dr`.
#[derive(Clone, Debug)]
pub struct Tensor3 {
    pub data: Vec<C64>,
    pub dl: usize,
    pub dp: usize,
    pub dr: usize,
}

impl Tensor3 {
    pub fn zeros(dl: usize, dp: usize, dr: usize) -> Self {
        Self {
            data: vec![C64::new(0.0, 0.0); dl * dp * dr],
            dl,
            dp,
            dr,
        }
    }

    /// Read the site tensor off a state unitary acting on
    /// `(fresh qubit, bond)` and producing `(bond, physical)`:
    /// `A[l, σ, r] = U[l·2 + σ, r]`.
    pub fn from_state_unitary(u: &CMatrix, bond_dim: usize) -> Self {
        assert_eq!(u.rows, 2 * bond_dim, "state unitary must act on bond ⊗ qubit");
        let mut t = Self::zeros(bond_dim, 2, bond_dim);
        for l in 0..bond_dim {
            for p in 0..2 {
                for r in 0..bond_dim {
                    t.set(l, p, r, u.get(l * 2 + p, r));
                }
            }
        }
        t
    }

    #[inline]
    fn idx(&self, l: usize, p: usize, r: usize) -> usize {
        (l * self.dp + p) * self.dr + r
    }

    pub fn get(&self, l: usize, p: usize, r: usize) -> C64 {
        self.data[self.idx(l, p, r)]
    }

    pub fn set(&mut self, l: usize, p: usize, r: usize, v: C64) {
        let i = self.idx(l, p, r);
        self.data[i] = v;
    }

    /// The bond matrix `A^p`.
    pub fn slice(&self, p: usize) -> CMatrix {
        let mut m = CMatrix::zeros(self.dl, self.dr);
        for l in 0..self.dl {
            for r in 0..self.dr {
                m.set(l, r, self.get(l, p, r));
            }
        }
        m
    }
}

/// Translation-invariant MPS generated by a single site tensor.
#[derive(Clone, Debug)]
pub struct UniformMps {
    pub site: Tensor3,
}

const FIXED_POINT_ITERS: usize = 10_000;

impl UniformMps {
    pub fn new(site: Tensor3) -> Self {
        assert_eq!(site.dl, site.dr, "uniform MPS needs a square bond");
        Self { site }
    }

    pub fn from_state_unitary(u: &CMatrix, bond_dim: usize) -> Self {
        Self::new(Tensor3::from_state_unitary(u, bond_dim))
    }

    pub fn bond_dim(&self) -> usize {
        self.site.dl
    }

    /// Mixed transfer matrix `Σ_σ A^σ ⊗ conj(B^σ)` acting on row-major
    /// `vec(X)` as `X ↦ Σ_σ A^σ X B^σ†`.
    pub fn transfer_matrix(&self, other: &UniformMps) -> CMatrix {
        assert_eq!(self.site.dp, other.site.dp, "physical dimensions differ");
        let d = self.bond_dim() * other.bond_dim();
        let mut t = CMatrix::zeros(d, d);
        for p in 0..self.site.dp {
            t = t.add(&self.site.slice(p).kron(&other.site.slice(p).conj()));
        }
        t
    }

    /// Apply the channel `ρ ↦ Σ_σ A^σ ρ A^σ†`.
    pub fn apply_channel(&self, rho: &CMatrix) -> CMatrix {
        let mut out = CMatrix::zeros(self.bond_dim(), self.bond_dim());
        for p in 0..self.site.dp {
            let a = self.site.slice(p);
            out = out.add(&a.matmul(rho).matmul(&a.dagger()));
        }
        out
    }

    /// Trace-one right fixed point `r = Σ_σ A^σ r A^σ†`.
    pub fn right_fixed_point(&self) -> CMatrix {
        let d = self.bond_dim();
        let t = self.transfer_matrix(self);
        let (v, _) = null_vector(&t.sub(&CMatrix::identity(d * d)));

        let mut r = CMatrix::zeros(d, d);
        for i in 0..d {
            for j in 0..d {
                r.set(i, j, v[i * d + j]);
            }
        }

        let tr = r.trace();
        if tr.norm() < 1e-12 {
            return self.fixed_point_by_iteration();
        }
        let r = r.scale(C64::new(1.0, 0.0) / tr);
        hermitian_part(&r)
    }

    fn fixed_point_by_iteration(&self) -> CMatrix {
        let d = self.bond_dim();
        let mut r = CMatrix::identity(d).scale(C64::new(1.0 / d as f64, 0.0));
        for _ in 0..FIXED_POINT_ITERS {
            let next = self.apply_channel(&r);
            let next = next.scale(C64::new(1.0, 0.0) / next.trace());
            let delta = next.sub(&r).frobenius_norm();
            r = next;
            if delta < 1e-14 {
                break;
            }
        }
        hermitian_part(&r)
    }

    /// Purification of the right fixed point: `vec(sqrt(r))`, a unit vector
    /// on `bond ⊗ bond`.
    pub fn environment_state(&self) -> Vec<C64> {
        let root = sqrtm_psd(&self.right_fixed_point());
        let norm = root.frobenius_norm();
        root.data.iter().map(|z| z / norm).collect()
    }

    /// Dominant eigenvalue of the mixed transfer matrix with `other`: the
    /// per-site overlap of the two infinite states.
    pub fn overlap(&self, other: &UniformMps) -> C64 {
        dominant_eigenvalue(&self.transfer_matrix(other))
    }
}

fn hermitian_part(m: &CMatrix) -> CMatrix {
    m.add(&m.dagger()).scale(C64::new(0.5, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> C64 {
        C64::new(re, im)
    }

    fn rotation(theta: f64) -> CMatrix {
        // (Ry(theta) on the fresh qubit) ⊗ I on the bond, then a CNOT
        let (cs, sn) = ((theta / 2.0).cos(), (theta / 2.0).sin());
        let ry = CMatrix::from_rows(&[vec![c(cs, 0.0), c(-sn, 0.0)], vec![c(sn, 0.0), c(cs, 0.0)]]);
        let o = c(1.0, 0.0);
        let z = c(0.0, 0.0);
        let cnot = CMatrix::from_rows(&[
            vec![o, z, z, z],
            vec![z, o, z, z],
            vec![z, z, z, o],
            vec![z, z, o, z],
        ]);
        cnot.matmul(&ry.kron(&CMatrix::identity(2)))
    }

    #[test]
    fn fixed_point_is_invariant() {
        let mps = UniformMps::from_state_unitary(&rotation(0.8), 2);
        let r = mps.right_fixed_point();
        assert!((r.trace() - c(1.0, 0.0)).norm() < 1e-10);
        assert!(mps.apply_channel(&r).approx_eq(&r, 1e-10));
    }

    #[test]
    fn self_overlap_is_one() {
        let mps = UniformMps::from_state_unitary(&rotation(0.8), 2);
        let lambda = mps.overlap(&mps);
        assert!((lambda - c(1.0, 0.0)).norm() < 1e-9, "lambda = {}", lambda);
    }

    #[test]
    fn distinct_states_overlap_below_one() {
        let a = UniformMps::from_state_unitary(&rotation(0.3), 2);
        let b = UniformMps::from_state_unitary(&rotation(1.9), 2);
        let lambda = a.overlap(&b);
        // |λ| = sin((θa + θb)/2)
        assert!((lambda.norm() - 1.1f64.sin()).abs() < 1e-8, "lambda = {}", lambda);
    }

    #[test]
    fn environment_state_purifies_fixed_point() {
        let mps = UniformMps::from_state_unitary(&rotation(1.1), 2);
        let r = mps.right_fixed_point();
        let v = mps.environment_state();
        // reduced state on the first factor of vec(sqrt r)
        let mut red = CMatrix::zeros(2, 2);
        for a in 0..2 {
            for ap in 0..2 {
                let mut acc = c(0.0, 0.0);
                for b in 0..2 {
                    acc += v[a * 2 + b] * v[ap * 2 + b].conj();
                }
                red.set(a, ap, acc);
            }
        }
        assert!(red.approx_eq(&r, 1e-10));
    }
}
