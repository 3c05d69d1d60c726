use crate::matrix::Matrix;

/// Exit signal of the check, encoded as the process exit status.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The corner cell did not match.
    Failure = 0,
    /// The corner cell matched `N·(N-1)·(N-1)`.
    Success = 1,
}

impl Outcome {
    /// Exit status handed to the exit system call.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Interprets an exit status. Anything other than 0 or 1 is not an outcome.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Failure),
            1 => Some(Self::Success),
            _ => None,
        }
    }

    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<bool> for Outcome {
    fn from(matched: bool) -> Self {
        if matched { Self::Success } else { Self::Failure }
    }
}

/// Value of `C[n-1][n-1]` for the `A[i][j] = i`, `B[i][j] = j` fill.
///
/// The bottom row of A and the right column of B are all `n-1`, so the
/// corner is `n·(n-1)·(n-1)`. Computed with the same wrapping arithmetic as
/// the multiplier so the comparison holds for any `n >= 1`.
pub const fn expected_corner(n: usize) -> i32 {
    let n_minus_one = n.wrapping_sub(1) as i32;
    (n as i32)
        .wrapping_mul(n_minus_one)
        .wrapping_mul(n_minus_one)
}

/// Checks the bottom-right cell of a product matrix.
pub fn verify<const N: usize>(c: &Matrix<N>) -> Outcome {
    const { assert!(N >= 1, "matrix dimension must be at least 1") };

    let expected = expected_corner(N);
    let actual = c[N - 1][N - 1];
    log::debug!("C[{}][{}] = {actual}, expected {expected}", N - 1, N - 1);
    Outcome::from(actual == expected)
}
