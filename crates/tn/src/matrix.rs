use crate::C64;
use serde::{Deserialize, Serialize};

/// Row-major dense complex matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CMatrix {
    pub data: Vec<C64>,
    pub rows: usize,
    pub cols: usize,
}

impl CMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![C64::new(0.0, 0.0); rows * cols],
            rows,
            cols,
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.set(i, i, C64::new(1.0, 0.0));
        }
        m
    }

    /// Build from nested rows. Panics on ragged input.
    pub fn from_rows(rows: &[Vec<C64>]) -> Self {
        let r = rows.len();
        let c = rows.first().map_or(0, |row| row.len());
        let mut data = Vec::with_capacity(r * c);
        for row in rows {
            assert_eq!(row.len(), c, "ragged rows");
            data.extend_from_slice(row);
        }
        Self { data, rows: r, cols: c }
    }

    pub fn diagonal(diag: &[C64]) -> Self {
        let mut m = Self::zeros(diag.len(), diag.len());
        for (i, &d) in diag.iter().enumerate() {
            m.set(i, i, d);
        }
        m
    }

    #[inline]
    fn idx(&self, r: usize, c: usize) -> usize {
        r * self.cols + c
    }

    pub fn get(&self, r: usize, c: usize) -> C64 {
        self.data[self.idx(r, c)]
    }

    pub fn set(&mut self, r: usize, c: usize, v: C64) {
        let i = self.idx(r, c);
        self.data[i] = v;
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn matmul(&self, other: &CMatrix) -> CMatrix {
        assert_eq!(self.cols, other.rows, "matmul shape mismatch");
        let mut out = CMatrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.get(i, k);
                if a == C64::new(0.0, 0.0) {
                    continue;
                }
                for j in 0..other.cols {
                    let idx = out.idx(i, j);
                    out.data[idx] += a * other.get(k, j);
                }
            }
        }
        out
    }

    /// Conjugate transpose.
    pub fn dagger(&self) -> CMatrix {
        let mut out = CMatrix::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.set(c, r, self.get(r, c).conj());
            }
        }
        out
    }

    pub fn conj(&self) -> CMatrix {
        CMatrix {
            data: self.data.iter().map(|z| z.conj()).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn kron(&self, other: &CMatrix) -> CMatrix {
        let rows = self.rows * other.rows;
        let cols = self.cols * other.cols;
        let mut out = CMatrix::zeros(rows, cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                let a = self.get(i, j);
                for k in 0..other.rows {
                    for l in 0..other.cols {
                        out.set(i * other.rows + k, j * other.cols + l, a * other.get(k, l));
                    }
                }
            }
        }
        out
    }

    pub fn add(&self, other: &CMatrix) -> CMatrix {
        assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        CMatrix {
            data: self.data.iter().zip(&other.data).map(|(a, b)| a + b).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn sub(&self, other: &CMatrix) -> CMatrix {
        assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        CMatrix {
            data: self.data.iter().zip(&other.data).map(|(a, b)| a - b).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn scale(&self, s: C64) -> CMatrix {
        CMatrix {
            data: self.data.iter().map(|z| z * s).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn trace(&self) -> C64 {
        (0..self.rows.min(self.cols)).map(|i| self.get(i, i)).sum()
    }

    pub fn frobenius_norm(&self) -> f64 {
        self.data.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
    }

    /// Largest absolute column sum.
    pub fn one_norm(&self) -> f64 {
        (0..self.cols)
            .map(|c| (0..self.rows).map(|r| self.get(r, c).norm()).sum::<f64>())
            .fold(0.0, f64::max)
    }

    /// `k`-fold product `self · self · … · self`; `k = 0` gives the identity.
    pub fn pow(&self, k: u32) -> CMatrix {
        assert!(self.is_square(), "pow needs a square matrix");
        let mut out = CMatrix::identity(self.rows);
        for _ in 0..k {
            out = out.matmul(self);
        }
        out
    }

    /// `‖A†A − I‖_F ≤ tol`.
    pub fn is_unitary(&self, tol: f64) -> bool {
        self.is_square()
            && self
                .dagger()
                .matmul(self)
                .sub(&CMatrix::identity(self.rows))
                .frobenius_norm()
                <= tol
    }

    pub fn approx_eq(&self, other: &CMatrix, tol: f64) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.sub(other).frobenius_norm() <= tol
    }
}
