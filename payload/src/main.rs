//! User-space matrix multiplication check.
//!
//! This is the payload a monolithic kernel loads into user space. It
//! multiplies two `DIM`×`DIM` matrices and exits through SYS_EXIT (93) with
//! status 1 if the result is correct, 0 otherwise. Nothing is printed: the
//! exit status is the only output.
//!
//! Built for a hosted target, the same program exits the host process with
//! that status instead.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod syscall;

/// Exit status reported when the program panics.
#[cfg(target_os = "none")]
const PANIC_EXIT_CODE: i32 = -1;

#[cfg(target_os = "none")]
#[unsafe(no_mangle)]
unsafe extern "C" fn _start() -> ! {
    let outcome = safematmult::run_default();
    syscall::sys_exit(outcome.code())
}

#[cfg(target_os = "none")]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    syscall::sys_exit(PANIC_EXIT_CODE)
}

#[cfg(not(target_os = "none"))]
fn main() {
    env_logger::init();

    let outcome = safematmult::run_default();
    log::info!(
        "{}x{} matrix check: {:?} (exit {})",
        safematmult::DIM,
        safematmult::DIM,
        outcome,
        outcome.code()
    );
    std::process::exit(outcome.code());
}
