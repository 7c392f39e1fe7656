//! Dense state-vector simulation. Qubit 0 is the most significant bit.

use crate::circuit::{ComposedCircuit, Placement};
use tn::{CMatrix, C64};

#[derive(Clone, Debug, PartialEq)]
pub struct StateVector {
    width: usize,
    amps: Vec<C64>,
}

impl StateVector {
    pub fn zero(width: usize) -> Self {
        Self::basis(width, 0)
    }

    pub fn basis(width: usize, index: usize) -> Self {
        let mut amps = vec![C64::new(0.0, 0.0); 1 << width];
        amps[index] = C64::new(1.0, 0.0);
        Self { width, amps }
    }

    /// Run `circuit` on `|0…0>`.
    pub fn from_circuit(circuit: &ComposedCircuit) -> Self {
        let mut psi = Self::zero(circuit.width());
        psi.run(circuit);
        psi
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn amplitudes(&self) -> &[C64] {
        &self.amps
    }

    pub fn run(&mut self, circuit: &ComposedCircuit) {
        for p in circuit.placements() {
            self.apply(p);
        }
    }

    pub fn apply(&mut self, placement: &Placement) {
        let k = placement.qubits.len();
        let local = 1usize << k;
        let shifts: Vec<usize> = placement
            .qubits
            .iter()
            .map(|q| self.width - 1 - q)
            .collect();
        let mask: usize = shifts.iter().map(|s| 1usize << s).sum();

        let offsets: Vec<usize> = (0..local)
            .map(|j| {
                shifts
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| (j >> (k - 1 - i)) & 1 == 1)
                    .map(|(_, s)| 1usize << s)
                    .sum()
            })
            .collect();

        let mut buf = vec![C64::new(0.0, 0.0); local];
        for base in 0..self.amps.len() {
            if base & mask != 0 {
                continue;
            }
            for (j, off) in offsets.iter().enumerate() {
                buf[j] = self.amps[base | off];
            }
            for (r, off) in offsets.iter().enumerate() {
                let mut acc = C64::new(0.0, 0.0);
                for (c, v) in buf.iter().enumerate() {
                    acc += placement.matrix.get(r, c) * v;
                }
                self.amps[base | off] = acc;
            }
        }
    }

    /// Marginal distribution over `qubits`, indexed with `qubits[0]` as MSB.
    pub fn probabilities(&self, qubits: &[usize]) -> Vec<f64> {
        let k = qubits.len();
        let mut probs = vec![0.0; 1 << k];
        for (idx, a) in self.amps.iter().enumerate() {
            let mut outcome = 0usize;
            for q in qubits {
                outcome = (outcome << 1) | ((idx >> (self.width - 1 - q)) & 1);
            }
            probs[outcome] += a.norm_sqr();
        }
        probs
    }

    /// Partial trace onto `keep`, in the order given.
    pub fn reduced_density_matrix(&self, keep: &[usize]) -> CMatrix {
        let k = keep.len();
        let dim = 1usize << k;
        let split = |idx: usize| {
            let mut kept = 0usize;
            let mut rest = idx;
            for q in keep {
                let s = self.width - 1 - q;
                kept = (kept << 1) | ((idx >> s) & 1);
                rest &= !(1usize << s);
            }
            (kept, rest)
        };

        let mut rho = CMatrix::zeros(dim, dim);
        let parts: Vec<(usize, usize)> = (0..self.amps.len()).map(split).collect();
        for (i, &(ki, ri)) in parts.iter().enumerate() {
            if self.amps[i].norm_sqr() == 0.0 {
                continue;
            }
            for (j, &(kj, rj)) in parts.iter().enumerate() {
                if ri == rj {
                    let v = rho.get(ki, kj) + self.amps[i] * self.amps[j].conj();
                    rho.set(ki, kj, v);
                }
            }
        }
        rho
    }
}
