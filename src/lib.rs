//! Integer matrix multiplication self-check for user-program loaders.
//!
//! Fills `A[i][j] = i` and `B[i][j] = j`, computes `C = A × B` and checks
//! the bottom-right cell against `N·(N-1)·(N-1)`. The resulting [`Outcome`]
//! is meant to be handed to the exit system call, so a loader under test can
//! tell from the exit status alone whether the program ran correctly.

#![cfg_attr(not(test), no_std)]
#![allow(clippy::needless_range_loop)]

mod config;
mod matrix;
mod multiply;
mod verify;

pub use config::{DEFAULT_DIM, DIM};
pub use matrix::{Matrix, Operands};
pub use multiply::multiply_into;
pub use verify::{Outcome, expected_corner, verify};

/// Runs initialization, multiplication and verification for dimension `N`.
pub fn run<const N: usize>() -> Outcome {
    let mut ops = Operands::<N>::new();
    ops.multiply();
    verify(&ops.c)
}

/// Runs the check with the configured dimension [`DIM`].
pub fn run_default() -> Outcome {
    run::<DIM>()
}
