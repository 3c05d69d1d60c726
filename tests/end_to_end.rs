use pretty_assertions::assert_eq;
use safematmult::{DIM, Matrix, Operands, Outcome, expected_corner, run, run_default, verify};
use test_log::test;

/// Multiplier with the inner loop stopping one row short.
fn multiply_short<const N: usize>(a: &Matrix<N>, b: &Matrix<N>, c: &mut Matrix<N>) {
    for i in 0..N {
        for j in 0..N {
            for k in 0..N - 1 {
                c[i][j] = c[i][j].wrapping_add(a[i][k].wrapping_mul(b[k][j]));
            }
        }
    }
}

fn corner_after_run<const N: usize>() -> i32 {
    let mut ops = Operands::<N>::new();
    ops.multiply();
    ops.c[N - 1][N - 1]
}

macro_rules! check_dims {
    ($($n:literal),*) => {
        $(
            assert_eq!(run::<$n>(), Outcome::Success, "dimension {}", $n);
            assert_eq!(corner_after_run::<$n>(), expected_corner($n), "dimension {}", $n);
        )*
    };
}

#[test]
fn default_dimension_passes() {
    assert_eq!(run::<20>(), Outcome::Success);
    assert_eq!(run::<20>().code(), 1);
    assert_eq!(run_default(), Outcome::Success);
    assert_eq!(run_default(), run::<DIM>());
}

#[test]
fn single_element() {
    let ops = Operands::<1>::new();
    assert_eq!(ops.a, [[0]]);
    assert_eq!(ops.b, [[0]]);
    assert_eq!(expected_corner(1), 0);
    assert_eq!(run::<1>(), Outcome::Success);
}

#[test]
fn two_by_two() {
    assert_eq!(corner_after_run::<2>(), 2);
    assert_eq!(run::<2>(), Outcome::Success);
}

#[test]
fn corner_matches_closed_form_across_dimensions() {
    check_dims!(1, 2, 3, 4, 5, 7, 8, 13, 16, 20, 21, 31, 32, 50, 64, 100);
}

#[test]
fn off_by_one_multiplier_is_detected() {
    let mut ops = Operands::<20>::new();
    multiply_short(&ops.a, &ops.b, &mut ops.c);
    assert_eq!(verify(&ops.c), Outcome::Failure);
    assert_eq!(verify(&ops.c).code(), 0);
}

#[test]
fn repeated_runs_agree() {
    let first = run::<20>();
    let second = run::<20>();
    assert_eq!(first, second);

    let mut x = Operands::<20>::new();
    let mut y = Operands::<20>::new();
    x.multiply();
    y.multiply();
    assert_eq!(x, y);
}
