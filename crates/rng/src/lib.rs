//! OND-RNG: a deterministic, context-separated generator built on SHAKE256.
//!
//! Every draw mixes a caller-supplied context label into the output, so two
//! call sites sharing one generator still see decorrelated streams. The
//! generator is an explicit handle: nothing in the workspace reads ambient
//! randomness.

use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};

#[derive(Clone, Debug)]
pub struct ONDRng {
    state: [u8; 32],
    step: u64,
}

impl ONDRng {
    pub fn new(seed: &[u8]) -> Self {
        let mut state = [0u8; 32];
        shake(&[seed, b"OND_INIT"], &mut state);
        Self { state, step: 0 }
    }

    /// Seed from a textual label plus an index, e.g. `("quench", step)`.
    pub fn from_label(seed: &str, label: &str, index: u64) -> Self {
        let mut rng = Self::new(seed.as_bytes());
        rng.fork_indexed(label.as_bytes(), index)
    }

    /// Derive an independent generator without advancing `self`.
    pub fn fork_indexed(&self, label: &[u8], index: u64) -> Self {
        let mut state = [0u8; 32];
        shake(
            &[&self.state, &self.step.to_be_bytes(), label, &index.to_be_bytes(), b"FORK"],
            &mut state,
        );
        Self { state, step: 0 }
    }

    /// Number of draws taken so far.
    pub fn steps(&self) -> u64 {
        self.step
    }

    /// Uniform draw in `[0, 1]`.
    pub fn next_f64(&mut self, ctx: &[u8]) -> f64 {
        self.step += 1;

        let state = self.state;
        let step_bytes = self.step.to_be_bytes();
        let mut next_state = self.state;
        shake(&[&state, &step_bytes, b"QSIM"], &mut next_state);
        self.state = next_state;

        let mut out = [0u8; 8];
        shake(&[&self.state, ctx], &mut out);

        if self.state[0] < 16 {
            let state = self.state;
            let mut next_state = self.state;
            shake(&[&state, b"SKIP"], &mut next_state);
            self.state = next_state;
        }

        (u64::from_be_bytes(out) as f64) / (u64::MAX as f64)
    }

    /// Draw an index with probability proportional to `weights[i]`.
    ///
    /// Negative weights count as zero. Returns `None` when the total weight
    /// is zero.
    pub fn sample_weighted(&mut self, weights: &[f64], ctx: &[u8]) -> Option<usize> {
        let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
        if total <= 0.0 {
            return None;
        }

        let mut x = self.next_f64(ctx) * total;
        let mut last = None;
        for (idx, &w) in weights.iter().enumerate() {
            let w = w.max(0.0);
            if w == 0.0 {
                continue;
            }
            if x < w {
                return Some(idx);
            }
            x -= w;
            last = Some(idx);
        }
        // x == total after rounding: fall back to the last index with weight
        last
    }
}

fn shake(parts: &[&[u8]], out: &mut [u8]) {
    let mut h = Shake256::default();
    for p in parts {
        h.update(p);
    }
    let mut r = h.finalize_xof();
    r.read(out);
}
