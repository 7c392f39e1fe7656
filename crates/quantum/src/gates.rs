use tn::{CMatrix, C64};

fn c(re: f64, im: f64) -> C64 {
    C64::new(re, im)
}

pub fn hadamard() -> CMatrix {
    let s = 1.0 / 2.0_f64.sqrt();
    CMatrix::from_rows(&[vec![c(s, 0.0), c(s, 0.0)], vec![c(s, 0.0), c(-s, 0.0)]])
}

pub fn identity() -> CMatrix {
    CMatrix::identity(2)
}

pub fn pauli_x() -> CMatrix {
    CMatrix::from_rows(&[vec![c(0.0, 0.0), c(1.0, 0.0)], vec![c(1.0, 0.0), c(0.0, 0.0)]])
}

pub fn pauli_y() -> CMatrix {
    CMatrix::from_rows(&[vec![c(0.0, 0.0), c(0.0, -1.0)], vec![c(0.0, 1.0), c(0.0, 0.0)]])
}

pub fn pauli_z() -> CMatrix {
    CMatrix::diagonal(&[c(1.0, 0.0), c(-1.0, 0.0)])
}

/// diag(1, -i): rotates the Y eigenbasis onto the X eigenbasis.
pub fn s_dagger() -> CMatrix {
    CMatrix::diagonal(&[c(1.0, 0.0), c(0.0, -1.0)])
}

pub fn rx(theta: f64) -> CMatrix {
    let cs = (theta / 2.0).cos();
    let sn = (theta / 2.0).sin();
    CMatrix::from_rows(&[vec![c(cs, 0.0), c(0.0, -sn)], vec![c(0.0, -sn), c(cs, 0.0)]])
}

/// `X^t`, a rotation by `π·t` about X (global phase dropped).
pub fn x_pow(t: f64) -> CMatrix {
    rx(std::f64::consts::PI * t)
}

/// `ZZ^t = diag(1, e^{iπt}, e^{iπt}, 1)`.
pub fn zz_pow(t: f64) -> CMatrix {
    let p = C64::from_polar(1.0, std::f64::consts::PI * t);
    CMatrix::diagonal(&[c(1.0, 0.0), p, p, c(1.0, 0.0)])
}

/// |00>→|00>, |01>→|01>, |10>→|11>, |11>→|10>
pub fn cnot() -> CMatrix {
    let z = c(0.0, 0.0);
    let o = c(1.0, 0.0);
    CMatrix::from_rows(&[
        vec![o, z, z, z],
        vec![z, o, z, z],
        vec![z, z, z, o],
        vec![z, z, o, z],
    ])
}

/// Pauli matrix by letter, `I` included.
pub fn pauli(letter: char) -> Option<CMatrix> {
    match letter {
        'I' => Some(identity()),
        'X' => Some(pauli_x()),
        'Y' => Some(pauli_y()),
        'Z' => Some(pauli_z()),
        _ => None,
    }
}
