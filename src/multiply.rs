use crate::matrix::{Matrix, Operands};

/// Accumulates `a × b` into `c` with the textbook i-j-k loop.
///
/// `c` is not cleared first. Arithmetic wraps on overflow.
pub fn multiply_into<const N: usize>(a: &Matrix<N>, b: &Matrix<N>, c: &mut Matrix<N>) {
    for i in 0..N {
        for j in 0..N {
            for k in 0..N {
                c[i][j] = c[i][j].wrapping_add(a[i][k].wrapping_mul(b[k][j]));
            }
        }
    }
}

impl<const N: usize> Operands<N> {
    /// Computes `c += a × b`.
    pub fn multiply(&mut self) {
        log::debug!("multiplying {}x{} matrices", N, N);
        multiply_into(&self.a, &self.b, &mut self.c);
    }
}
