//! Two-site bond Hamiltonians for translation-invariant chains.

use crate::error::{QuantumError, Result};
use crate::gates::pauli;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tn::expm::unitary_exp;
use tn::{CMatrix, C64};

/// Couplings keyed by Pauli words.
///
/// Two-letter words (`"ZZ"`, `"XY"`) are bond couplings `P⊗Q`. One-letter
/// words are on-site fields, split evenly over the two sites of a bond as
/// `(P⊗I + I⊗P)/2` so that summing bonds counts each site once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hamiltonian {
    terms: BTreeMap<String, f64>,
}

impl Hamiltonian {
    pub fn new(terms: BTreeMap<String, f64>) -> Result<Self> {
        for word in terms.keys() {
            let valid = matches!(word.len(), 1 | 2) && word.chars().all(|c| pauli(c).is_some());
            if !valid {
                return Err(QuantumError::UnknownTerm(word.clone()));
            }
        }
        Ok(Self { terms })
    }

    pub fn from_terms<'a>(terms: impl IntoIterator<Item = (&'a str, f64)>) -> Result<Self> {
        Self::new(terms.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    /// `zz·Z⊗Z + g·X`, the transverse-field Ising bond.
    pub fn ising(zz: f64, g: f64) -> Self {
        let terms = [("ZZ".to_string(), zz), ("X".to_string(), g)].into_iter().collect();
        Self { terms }
    }

    pub fn terms(&self) -> &BTreeMap<String, f64> {
        &self.terms
    }

    /// The 4×4 bond operator.
    pub fn to_matrix(&self) -> CMatrix {
        let id = CMatrix::identity(2);
        let mut h = CMatrix::zeros(4, 4);
        for (word, &coeff) in &self.terms {
            let ops: Vec<CMatrix> = word.chars().filter_map(pauli).collect();
            let term = match ops.as_slice() {
                [p, q] => p.kron(q).scale(C64::new(coeff, 0.0)),
                [p] => p.kron(&id).add(&id.kron(p)).scale(C64::new(coeff / 2.0, 0.0)),
                _ => continue,
            };
            h = h.add(&term);
        }
        h
    }

    /// Sum of bond operators over an open block of `sites` sites.
    pub fn block(&self, sites: usize) -> CMatrix {
        let dim = 1usize << sites;
        let bond = self.to_matrix();
        let mut h = CMatrix::zeros(dim, dim);
        for i in 0..sites.saturating_sub(1) {
            let left = CMatrix::identity(1 << i);
            let right = CMatrix::identity(1 << (sites - i - 2));
            h = h.add(&left.kron(&bond).kron(&right));
        }
        h
    }

    /// `W = exp(i·H·dt)` for the open block of `sites` sites. Interior
    /// sites see every bond that touches them; the two ends do not.
    pub fn evolution_operator(&self, dt: f64, sites: usize) -> CMatrix {
        unitary_exp(&self.block(sites), dt)
    }
}
