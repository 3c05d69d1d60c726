/// Row-major square matrix of 32-bit signed integers.
pub type Matrix<const N: usize> = [[i32; N]; N];

/// The three matrices of one check: inputs `a`, `b` and accumulator `c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operands<const N: usize> {
    pub a: Matrix<N>,
    pub b: Matrix<N>,
    pub c: Matrix<N>,
}

impl<const N: usize> Operands<N> {
    /// Builds `a[i][j] = i`, `b[i][j] = j` and a zeroed `c`.
    pub fn new() -> Self {
        let mut a = [[0; N]; N];
        let mut b = [[0; N]; N];
        for i in 0..N {
            for j in 0..N {
                a[i][j] = i as i32;
                b[i][j] = j as i32;
            }
        }
        log::trace!("initialized {}x{} operands", N, N);
        Self {
            a,
            b,
            c: [[0; N]; N],
        }
    }
}

impl<const N: usize> Default for Operands<N> {
    fn default() -> Self {
        Self::new()
    }
}
