//! Dense linear algebra and uniform-MPS contractions for small registers.

pub mod expm;
pub mod linalg;
pub mod matrix;
pub mod mps;

pub use matrix::CMatrix;

pub type C64 = num_complex::Complex64;

/// `log2(dim)` when `dim` is a power of two greater than zero.
pub fn exact_log2(dim: usize) -> Option<usize> {
    if dim.is_power_of_two() {
        Some(dim.trailing_zeros() as usize)
    } else {
        None
    }
}
