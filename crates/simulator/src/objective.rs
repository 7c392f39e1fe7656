//! Parameter vector → scalar cost.
//!
//! Every objective rebuilds its circuits from the parameters it is handed,
//! so evaluations never share state. The RNG handle is threaded through
//! explicitly and only consumed by sampled backends.

use crate::error::Result;
use quantum::compose::{
    bond_range, environment_circuit, physical_range, state_circuit, state_width, swap_test,
};
use quantum::energy::exact_energy_density;
use quantum::environment::exact_environment;
use quantum::observables::bloch_distance;
use quantum::{Backend, ComposedCircuit, Hamiltonian, QuantumError, ShallowAnsatz, Tensor};
use rng::ONDRng;
use serde::{Deserialize, Serialize};
use tn::{exact_log2, CMatrix};

/// Side information recorded next to a cost. Never read by the minimizer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub bloch_norm: Option<f64>,
    /// Probability of the all-ones pattern in the cross swap test.
    pub probability: Option<f64>,
    pub histogram: Option<Vec<usize>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveResult {
    pub cost: f64,
    pub diagnostics: Diagnostics,
}

impl ObjectiveResult {
    pub fn bare(cost: f64) -> Self {
        Self {
            cost,
            diagnostics: Diagnostics::default(),
        }
    }
}

pub trait Objective {
    fn evaluate(&self, params: &[f64], rng: &mut ONDRng) -> Result<ObjectiveResult>;
}

/// Which sub-circuits a swap test pairs and which qubits it probes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapVariant {
    /// Transfer direction: the bond qubits of `State(U, V, 1)` against the
    /// reference environment alone.
    Vertical,
    /// Chain direction: the physical qubits of two state circuits.
    Horizontal,
}

/// Sum over `probes` of the Bloch-vector distance between `a` and `b`.
pub fn tomography_distance(
    a: &ComposedCircuit,
    b: &ComposedCircuit,
    probes: &[usize],
    backend: &Backend,
    rng: &mut ONDRng,
) -> Result<ObjectiveResult> {
    let mut cost = 0.0;
    let mut first_norm = None;
    for &q in probes {
        let va = backend.bloch_vector(a, q, rng)?;
        let vb = backend.bloch_vector(b, q, rng)?;
        if first_norm.is_none() {
            first_norm = Some(va.iter().map(|x| x * x).sum::<f64>().sqrt());
        }
        cost += bloch_distance(&va, &vb);
    }
    Ok(ObjectiveResult {
        cost,
        diagnostics: Diagnostics {
            bloch_norm: first_norm,
            ..Diagnostics::default()
        },
    })
}

/// `(Tr ρ² + Tr σ² - 2 Tr ρσ)/2` over `probes`, every term read off a
/// destructive swap test.
pub fn swap_distance(
    a: &ComposedCircuit,
    b: &ComposedCircuit,
    probes: &[usize],
    backend: &Backend,
    rng: &mut ONDRng,
) -> Result<ObjectiveResult> {
    let purity = |c: &ComposedCircuit, rng: &mut ONDRng| -> Result<f64> {
        let test = swap_test(c, c, probes)?;
        let m = backend.run(test.circuit(), &test.measured_qubits(), rng)?;
        Ok(test.overlap(&m.probabilities))
    };
    let pa = purity(a, rng)?;
    let pb = purity(b, rng)?;

    let cross = swap_test(a, b, probes)?;
    let m = backend.run(cross.circuit(), &cross.measured_qubits(), rng)?;
    let overlap = cross.overlap(&m.probabilities);
    let all_ones = m.probabilities.len() - 1;

    Ok(ObjectiveResult {
        cost: ((pa + pb - 2.0 * overlap) / 2.0).max(0.0),
        diagnostics: Diagnostics {
            bloch_norm: None,
            probability: Some(m.probability(all_ones)),
            histogram: m.counts,
        },
    })
}

/// How an environment candidate is scored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnvironmentObjective {
    FullTomography,
    SampledTomography { reps: usize },
    SwapTest { variant: SwapVariant, backend: Backend },
}

/// Trial environment from `ansatz` against the fixed pair `(u, reference)`.
#[derive(Clone, Debug)]
pub struct EnvironmentCost {
    pub u: Tensor,
    pub reference: Tensor,
    pub ansatz: ShallowAnsatz,
    pub objective: EnvironmentObjective,
}

impl EnvironmentCost {
    fn bond_qubits(&self) -> usize {
        self.u.qubit_count() - 1
    }
}

impl EnvironmentCost {
    /// Score an arbitrary trial environment, ansatz-built or not.
    pub fn score(&self, trial: &Tensor, rng: &mut ONDRng) -> Result<ObjectiveResult> {
        let b = self.bond_qubits();
        let bond: Vec<usize> = bond_range(b).collect();

        match &self.objective {
            EnvironmentObjective::FullTomography => {
                let capped = state_circuit(&self.u, trial, 1)?;
                let alone = environment_circuit(&self.reference, 2 * b)?;
                tomography_distance(&capped, &alone, &bond, &Backend::Exact, rng)
            }
            EnvironmentObjective::SampledTomography { reps } => {
                let capped = state_circuit(&self.u, trial, 1)?;
                let alone = environment_circuit(&self.reference, 2 * b)?;
                let backend = Backend::Sampled { reps: *reps };
                tomography_distance(&capped, &alone, &bond, &backend, rng)
            }
            EnvironmentObjective::SwapTest {
                variant: SwapVariant::Vertical,
                backend,
            } => {
                let capped = state_circuit(&self.u, trial, 1)?;
                let alone = environment_circuit(&self.reference, state_width(b, 1))?;
                swap_distance(&capped, &alone, &bond, backend, rng)
            }
            EnvironmentObjective::SwapTest {
                variant: SwapVariant::Horizontal,
                backend,
            } => {
                let trial_state = state_circuit(&self.u, trial, 2)?;
                let reference_state = state_circuit(&self.u, &self.reference, 2)?;
                let physical: Vec<usize> = physical_range(b, 2).collect();
                swap_distance(&trial_state, &reference_state, &physical, backend, rng)
            }
        }
    }
}

impl Objective for EnvironmentCost {
    fn evaluate(&self, params: &[f64], rng: &mut ONDRng) -> Result<ObjectiveResult> {
        let trial = self.ansatz.tensor(params)?;
        self.score(&trial, rng)
    }
}

/// Energy per bond of `State(U(x), V_exact(U(x)), sites)`.
#[derive(Clone, Debug)]
pub struct EnergyCost {
    pub hamiltonian: Hamiltonian,
    pub ansatz: ShallowAnsatz,
    pub sites: usize,
}

impl Objective for EnergyCost {
    fn evaluate(&self, params: &[f64], _rng: &mut ONDRng) -> Result<ObjectiveResult> {
        let u = self.ansatz.tensor(params)?;
        let e = exact_energy_density(&u, &self.hamiltonian, self.sites)?;
        Ok(ObjectiveResult::bare(e))
    }
}

/// `(U, V_exact(U))` for a state-ansatz parameter vector.
pub fn param_u(ansatz: &ShallowAnsatz, params: &[f64]) -> Result<(Tensor, Tensor)> {
    let u = ansatz.tensor(params)?;
    let v = exact_environment(&u)?;
    Ok((u, v))
}

/// Number of sites a block evolution gate `w` spans. The gate needs an
/// interior, so at least three.
pub fn evolution_sites(w: &CMatrix) -> Result<usize> {
    let not_a_gate = || QuantumError::NotAGate {
        rows: w.rows,
        cols: w.cols,
    };
    if !w.is_square() {
        return Err(not_a_gate().into());
    }
    match exact_log2(w.rows) {
        Some(k) if k >= 3 => Ok(k),
        Some(k) => Err(QuantumError::Shape(format!(
            "evolution gate spans {} site(s), needs at least 3",
            k
        ))
        .into()),
        None => Err(not_a_gate().into()),
    }
}

/// Horizontal swap distance between `State(U(x), V(x), sites)` and a fixed
/// target of the same width, read on the interior physical sites only.
///
/// The end sites of an open block miss the bonds to their outer
/// neighbours, so only the interior sees the full evolution.
#[derive(Clone, Debug)]
pub struct EvolutionCost {
    pub ansatz: ShallowAnsatz,
    pub target: ComposedCircuit,
    pub sites: usize,
    pub backend: Backend,
}

impl EvolutionCost {
    /// `State(u, v, k)` followed by the `k`-site gate `w` on all physical
    /// qubits.
    pub fn evolved_target(u: &Tensor, v: &Tensor, w: &CMatrix) -> Result<ComposedCircuit> {
        let sites = evolution_sites(w)?;
        let mut builder = state_circuit(u, v, sites)?.to_builder();
        let physical: Vec<usize> = physical_range(u.qubit_count() - 1, sites).collect();
        builder.place(w.clone(), &physical, "W")?;
        Ok(builder.build())
    }

    /// Physical qubits of a `sites`-site block minus the two ends.
    pub fn interior(bond_qubits: usize, sites: usize) -> Vec<usize> {
        physical_range(bond_qubits, sites)
            .skip(1)
            .take(sites.saturating_sub(2))
            .collect()
    }
}

impl Objective for EvolutionCost {
    fn evaluate(&self, params: &[f64], rng: &mut ONDRng) -> Result<ObjectiveResult> {
        let (u, v) = param_u(&self.ansatz, params)?;
        let trial = state_circuit(&u, &v, self.sites)?;
        if trial.width() != self.target.width() {
            return Err(QuantumError::Shape(format!(
                "trial width {} against target width {}",
                trial.width(),
                self.target.width()
            ))
            .into());
        }
        let probes = Self::interior(u.qubit_count() - 1, self.sites);
        swap_distance(&trial, &self.target, &probes, &self.backend, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulatorError;
    use quantum::gates::{identity, pauli_x};
    use quantum::observables::hs_distance;
    use quantum::statevector::StateVector;
    use tn::expm::unitary_exp;

    fn fixed_u() -> Tensor {
        ShallowAnsatz::state(2, 2)
            .unwrap()
            .tensor(&[0.3, 0.2, -0.4, 0.1])
            .unwrap()
    }

    #[test]
    fn exact_environment_costs_nothing() {
        let u = fixed_u();
        let v = exact_environment(&u).unwrap();
        let mut rng = ONDRng::new(b"zero");
        for objective in [
            EnvironmentObjective::FullTomography,
            EnvironmentObjective::SwapTest {
                variant: SwapVariant::Vertical,
                backend: Backend::Exact,
            },
            EnvironmentObjective::SwapTest {
                variant: SwapVariant::Horizontal,
                backend: Backend::Exact,
            },
        ] {
            let cost = EnvironmentCost {
                u: u.clone(),
                reference: v.clone(),
                ansatz: ShallowAnsatz::environment(2, 1).unwrap(),
                objective: objective.clone(),
            };
            let r = cost.score(&v, &mut rng).unwrap();
            assert!(r.cost < 1e-10, "{:?} gave {}", objective, r.cost);
        }
        assert_eq!(rng.steps(), 0, "exact backends must not draw");
    }

    #[test]
    fn orthogonal_bond_states_cost_one() {
        // U = I keeps the bond in |0>; the reference flips it to |1>
        let u = Tensor::fixed(identity().kron(&identity()), "U").unwrap();
        let reference = Tensor::fixed(pauli_x().kron(&identity()), "Vref").unwrap();
        let cost = EnvironmentCost {
            u,
            reference,
            ansatz: ShallowAnsatz::environment(2, 1).unwrap(),
            objective: EnvironmentObjective::SwapTest {
                variant: SwapVariant::Vertical,
                backend: Backend::Exact,
            },
        };
        let r = cost.evaluate(&[0.0, 0.0], &mut ONDRng::new(b"orth")).unwrap();
        assert!((r.cost - 1.0).abs() < 1e-12, "cost = {}", r.cost);
        // single pair, Tr ρσ = 0: P(11) = 1/2
        let p = r.diagnostics.probability.unwrap();
        assert!((p - 0.5).abs() < 1e-12, "P(11) = {}", p);
    }

    #[test]
    fn swap_distance_matches_reduced_states() {
        let ansatz = ShallowAnsatz::state(2, 2).unwrap();
        let (ua, va) = param_u(&ansatz, &[0.3, 0.2, -0.4, 0.1]).unwrap();
        let (ub, vb) = param_u(&ansatz, &[0.6, -0.1, 0.2, 0.3]).unwrap();
        let a = state_circuit(&ua, &va, 2).unwrap();
        let b = state_circuit(&ub, &vb, 2).unwrap();
        let probes: Vec<usize> = physical_range(1, 2).collect();

        let rho = StateVector::from_circuit(&a).reduced_density_matrix(&probes);
        let sigma = StateVector::from_circuit(&b).reduced_density_matrix(&probes);
        let expected = hs_distance(&rho, &sigma);

        let r = swap_distance(&a, &b, &probes, &Backend::Exact, &mut ONDRng::new(b"hs")).unwrap();
        assert!((r.cost - expected).abs() < 1e-10, "{} vs {}", r.cost, expected);
        assert!(expected > 1e-6);
    }

    #[test]
    fn sampled_swap_keeps_histogram() {
        let u = fixed_u();
        let v = exact_environment(&u).unwrap();
        let cost = EnvironmentCost {
            u,
            reference: v,
            ansatz: ShallowAnsatz::environment(2, 1).unwrap(),
            objective: EnvironmentObjective::SwapTest {
                variant: SwapVariant::Vertical,
                backend: Backend::Sampled { reps: 256 },
            },
        };
        let r = cost.evaluate(&[0.4, -0.2], &mut ONDRng::new(b"hist")).unwrap();
        let hist = r.diagnostics.histogram.unwrap();
        assert_eq!(hist.iter().sum::<usize>(), 256);
        assert!(r.cost >= 0.0);
    }

    #[test]
    fn evolution_with_identity_gate_is_satisfied_by_previous_params() {
        let ansatz = ShallowAnsatz::state(2, 2).unwrap();
        let params = [0.3, 0.2, -0.4, 0.1];
        let (u, v) = param_u(&ansatz, &params).unwrap();
        let target = EvolutionCost::evolved_target(&u, &v, &CMatrix::identity(16)).unwrap();
        let cost = EvolutionCost {
            ansatz,
            target,
            sites: 4,
            backend: Backend::Exact,
        };
        let mut rng = ONDRng::new(b"evo");
        let at_prev = cost.evaluate(&params, &mut rng).unwrap().cost;
        let away = cost.evaluate(&[0.9, -0.7, 0.5, 0.3], &mut rng).unwrap().cost;
        assert!(at_prev < 1e-10, "cost at previous params = {}", at_prev);
        assert!(away > 1e-4, "cost away from previous params = {}", away);
    }

    #[test]
    fn pure_field_step_turns_interior_sites_by_the_full_angle() {
        let (g, dt) = (0.7, 0.1);
        let ansatz = ShallowAnsatz::state(2, 2).unwrap();
        let (u, v) = param_u(&ansatz, &[0.3, 0.2, -0.4, 0.1]).unwrap();
        let w = Hamiltonian::from_terms([("X", g)])
            .unwrap()
            .evolution_operator(dt, 4);

        let before = StateVector::from_circuit(&state_circuit(&u, &v, 4).unwrap());
        let after =
            StateVector::from_circuit(&EvolutionCost::evolved_target(&u, &v, &w).unwrap());
        let full = unitary_exp(&pauli_x(), g * dt);
        let half = unitary_exp(&pauli_x(), g * dt / 2.0);

        let interior = EvolutionCost::interior(1, 4);
        assert_eq!(interior, vec![2, 3]);
        for q in interior {
            let rho = before.reduced_density_matrix(&[q]);
            let got = after.reduced_density_matrix(&[q]);
            let expected = full.matmul(&rho).matmul(&full.dagger());
            let halfway = half.matmul(&rho).matmul(&half.dagger());
            assert!(got.approx_eq(&expected, 1e-12), "site {} not turned by g·dt", q);
            assert!(!got.approx_eq(&halfway, 1e-6), "site {} insensitive to the angle", q);
        }

        // both interior sites together: the gate factorizes into single-site turns
        let pair = before.reduced_density_matrix(&[2, 3]);
        let both = full.kron(&full);
        let expected = both.matmul(&pair).matmul(&both.dagger());
        assert!(after.reduced_density_matrix(&[2, 3]).approx_eq(&expected, 1e-12));
    }

    #[test]
    fn evolution_gates_must_span_an_interior() {
        assert!(evolution_sites(&CMatrix::identity(16)).is_ok());
        assert!(matches!(
            evolution_sites(&CMatrix::identity(4)),
            Err(SimulatorError::Quantum(QuantumError::Shape(_)))
        ));
        assert!(matches!(
            evolution_sites(&CMatrix::identity(6)),
            Err(SimulatorError::Quantum(QuantumError::NotAGate { rows: 6, cols: 6 }))
        ));
    }
}
