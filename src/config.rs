/// Dimension used when `SAFEMATMULT_DIM` is not set at build time.
pub const DEFAULT_DIM: usize = 20;

/// Side length of the matrices, fixed at compile time.
///
/// Set `SAFEMATMULT_DIM` in the build environment to try other sizes.
pub const DIM: usize = match option_env!("SAFEMATMULT_DIM") {
    Some(s) => parse_dim(s),
    None => DEFAULT_DIM,
};

const _: () = assert!(DIM >= 1, "SAFEMATMULT_DIM must be at least 1");

const fn parse_dim(s: &str) -> usize {
    let bytes = s.as_bytes();
    assert!(!bytes.is_empty(), "SAFEMATMULT_DIM is empty");

    let mut dim: usize = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        assert!(b.is_ascii_digit(), "SAFEMATMULT_DIM must be a decimal number");
        dim = match dim.checked_mul(10) {
            Some(v) => v,
            None => panic!("SAFEMATMULT_DIM is too large"),
        };
        dim = match dim.checked_add((b - b'0') as usize) {
            Some(v) => v,
            None => panic!("SAFEMATMULT_DIM is too large"),
        };
        i += 1;
    }
    dim
}
