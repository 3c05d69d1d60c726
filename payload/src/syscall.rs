const SYS_EXIT: usize = 93;

/// Terminates the process through SYS_EXIT, passing `exit_code` as arg0.
pub fn sys_exit(exit_code: i32) -> ! {
    let arg0 = exit_code as isize as usize;
    unsafe {
        #[cfg(any(target_arch = "riscv64", target_arch = "riscv32"))]
        core::arch::asm!(
            "ecall",
            in("a7") SYS_EXIT,
            in("a0") arg0,
            options(noreturn)
        );

        #[cfg(target_arch = "aarch64")]
        core::arch::asm!(
            "svc #0",
            in("x8") SYS_EXIT,
            in("x0") arg0,
            options(noreturn)
        );

        #[cfg(target_arch = "x86_64")]
        core::arch::asm!(
            "syscall",
            in("rax") SYS_EXIT,
            in("rdi") arg0,
            options(noreturn)
        );

        #[cfg(target_arch = "loongarch64")]
        core::arch::asm!(
            "syscall 0",
            in("$a7") SYS_EXIT,
            in("$a0") arg0,
            options(noreturn)
        );
    }
}
