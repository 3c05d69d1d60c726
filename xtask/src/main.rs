use clap::{Parser, Subcommand};
use env_logger::{Builder, Target};
use log::LevelFilter;
use safematmult::{Outcome, expected_corner};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{self, Command, ExitStatus};

/// The loader maps the payload into a single page at its entry address.
const LOADER_PAGE_SIZE: u64 = 4096;
/// Where the loader looks for the program inside the disk image.
const PAYLOAD_DISK_PATH: &str = "sbin/safematmult";
const DIM_ENV: &str = "SAFEMATMULT_DIM";

/// safematmult build & check tool
#[derive(Parser)]
#[command(name = "xtask", about = "Build, package and check the safematmult payload")]
struct Cli {
    /// Set log filter value [ off, error, warn, info, debug, trace ]
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Cross-build the payload as a flat binary for a given architecture
    Build {
        #[arg(long, default_value = "riscv64")]
        arch: String,
        /// Matrix dimension baked into the payload
        #[arg(long)]
        dim: Option<usize>,
    },
    /// Build the payload and put it on a FAT32 disk image for the loader
    Disk {
        #[arg(long, default_value = "riscv64")]
        arch: String,
        /// Matrix dimension baked into the payload
        #[arg(long)]
        dim: Option<usize>,
        /// Output image, defaults to target/disk.img
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Build the payload for the host, run it and interpret its exit status
    Check {
        /// Matrix dimension baked into the payload
        #[arg(long)]
        dim: Option<usize>,
    },
}

#[derive(thiserror::Error, Debug)]
enum XtaskError {
    #[error("unsupported architecture '{0}'. Supported: riscv64, aarch64, x86_64, loongarch64")]
    UnsupportedArch(String),
    #[error("matrix dimension must be at least 1")]
    InvalidDim,
    #[error("failed to execute {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("{0} failed with {1}")]
    ToolFailed(&'static str, ExitStatus),
    #[error("payload is {size} bytes, but the loader maps a single {limit}-byte page")]
    PayloadTooLarge { size: u64, limit: u64 },
    #[error("payload exited with unexpected status {0}")]
    UnexpectedStatus(ExitStatus),
    #[error("matrix check failed for dimension {0}")]
    CheckFailed(usize),
    #[error(transparent)]
    Io(#[from] io::Error),
}

type Result<T> = std::result::Result<T, XtaskError>;

#[derive(Debug, PartialEq, Eq)]
struct ArchInfo {
    target: &'static str,
    objcopy_arch: &'static str,
}

fn arch_info(arch: &str) -> Result<ArchInfo> {
    match arch {
        "riscv64" => Ok(ArchInfo {
            target: "riscv64gc-unknown-none-elf",
            objcopy_arch: "riscv64",
        }),
        "aarch64" => Ok(ArchInfo {
            target: "aarch64-unknown-none-softfloat",
            objcopy_arch: "aarch64",
        }),
        "x86_64" => Ok(ArchInfo {
            target: "x86_64-unknown-none",
            objcopy_arch: "x86_64",
        }),
        "loongarch64" => Ok(ArchInfo {
            target: "loongarch64-unknown-none",
            objcopy_arch: "loongarch64",
        }),
        _ => Err(XtaskError::UnsupportedArch(arch.to_string())),
    }
}

fn check_dim(dim: Option<usize>) -> Result<Option<usize>> {
    match dim {
        Some(0) => Err(XtaskError::InvalidDim),
        dim => Ok(dim),
    }
}

fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Runs a tool to completion, failing on spawn errors and non-zero exits.
fn run_tool(tool: &'static str, cmd: &mut Command) -> Result<()> {
    log::debug!("Running: {:?}", cmd);
    let status = cmd
        .status()
        .map_err(|source| XtaskError::Spawn { tool, source })?;
    if !status.success() {
        return Err(XtaskError::ToolFailed(tool, status));
    }
    Ok(())
}

fn cargo_build(manifest: &Path, target: Option<&str>, dim: Option<usize>) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.arg("build").arg("--release");
    if let Some(target) = target {
        cmd.args(["--target", target]);
    }
    cmd.arg("--manifest-path").arg(manifest);
    if let Some(dim) = dim {
        cmd.env(DIM_ENV, dim.to_string());
    }
    cmd
}

/// Build the user-space payload for the target architecture and strip it to
/// a flat binary.
fn build_payload(root: &Path, info: &ArchInfo, dim: Option<usize>) -> Result<PathBuf> {
    let payload_dir = root.join("payload");
    let manifest = payload_dir.join("Cargo.toml");

    log::info!("Building payload for {} ...", info.target);
    run_tool(
        "cargo build",
        &mut cargo_build(&manifest, Some(info.target), dim),
    )?;

    let elf = payload_dir
        .join("target")
        .join(info.target)
        .join("release")
        .join("safematmult");
    let bin = elf.with_extension("bin");

    run_tool(
        "rust-objcopy",
        Command::new("rust-objcopy")
            .arg(format!("--binary-architecture={}", info.objcopy_arch))
            .arg(&elf)
            .args(["--strip-all", "-O", "binary"])
            .arg(&bin),
    )?;

    log::info!("Payload built: {}", bin.display());
    Ok(bin)
}

/// Create a 64MB FAT32 disk image containing `/sbin/safematmult`.
fn create_fat_disk_image(path: &Path, payload_bin: &Path) -> Result<()> {
    const DISK_SIZE: u64 = 64 * 1024 * 1024;

    let payload_data = std::fs::read(payload_bin)?;
    let size = payload_data.len() as u64;
    log::info!("Payload binary size: {} bytes", size);
    if size > LOADER_PAGE_SIZE {
        return Err(XtaskError::PayloadTooLarge {
            size,
            limit: LOADER_PAGE_SIZE,
        });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.set_len(DISK_SIZE)?;

    let format_opts = fatfs::FormatVolumeOptions::new().fat_type(fatfs::FatType::Fat32);
    fatfs::format_volume(&file, format_opts)?;

    {
        let fs = fatfs::FileSystem::new(&file, fatfs::FsOptions::new())?;
        let root_dir = fs.root_dir();
        root_dir.create_dir("sbin")?;
        let mut f = root_dir.create_file(PAYLOAD_DISK_PATH)?;
        f.write_all(&payload_data)?;
        f.flush()?;
    }

    log::info!(
        "Created FAT32 disk image: {} ({}MB) with /{}",
        path.display(),
        DISK_SIZE / (1024 * 1024),
        PAYLOAD_DISK_PATH
    );
    Ok(())
}

/// Builds the payload for the host and maps its exit status to an outcome.
fn do_check(root: &Path, dim: Option<usize>) -> Result<()> {
    let manifest = root.join("Cargo.toml");
    let dim_desc = dim
        .or_else(|| std::env::var(DIM_ENV).ok()?.parse().ok())
        .unwrap_or(safematmult::DEFAULT_DIM);

    log::info!("Building host payload (dimension {}) ...", dim_desc);
    let mut build = cargo_build(&manifest, None, dim);
    build.args(["--features", "payload", "--bin", "safematmult"]);
    run_tool("cargo build", &mut build)?;

    let exe = root
        .join("target")
        .join("release")
        .join(format!("safematmult{}", std::env::consts::EXE_SUFFIX));
    log::info!(
        "Running {}, expecting C[{}][{}] = {}",
        exe.display(),
        dim_desc.saturating_sub(1),
        dim_desc.saturating_sub(1),
        expected_corner(dim_desc)
    );
    let status = Command::new(&exe)
        .status()
        .map_err(|source| XtaskError::Spawn {
            tool: "safematmult",
            source,
        })?;

    match status.code().and_then(Outcome::from_code) {
        Some(Outcome::Success) => {
            log::info!("matrix check passed (exit {})", Outcome::Success.code());
            Ok(())
        }
        Some(Outcome::Failure) => Err(XtaskError::CheckFailed(dim_desc)),
        None => Err(XtaskError::UnexpectedStatus(status)),
    }
}

fn run(cli: Cli) -> Result<()> {
    let root = project_root();

    match cli.command {
        Cmd::Build { ref arch, dim } => {
            let info = arch_info(arch)?;
            let dim = check_dim(dim)?;
            build_payload(&root, &info, dim)?;
            log::info!("Build complete for {arch} ({})", info.target);
        }
        Cmd::Disk {
            ref arch,
            dim,
            ref image,
        } => {
            let info = arch_info(arch)?;
            let dim = check_dim(dim)?;
            let payload_bin = build_payload(&root, &info, dim)?;
            let disk = image
                .clone()
                .unwrap_or_else(|| root.join("target").join("disk.img"));
            create_fat_disk_image(&disk, &payload_bin)?;
        }
        Cmd::Check { dim } => {
            let dim = check_dim(dim)?;
            do_check(&root, dim)?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let mut builder = Builder::new();
    builder
        .filter_level(cli.log_level)
        .parse_default_env()
        .target(Target::Stdout)
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli) {
        log::error!("{e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    #[test]
    fn known_architectures() {
        assert_eq!(
            arch_info("riscv64").unwrap().target,
            "riscv64gc-unknown-none-elf"
        );
        assert_eq!(arch_info("aarch64").unwrap().objcopy_arch, "aarch64");
        assert_eq!(arch_info("x86_64").unwrap().target, "x86_64-unknown-none");
        assert_eq!(
            arch_info("loongarch64").unwrap().target,
            "loongarch64-unknown-none"
        );
    }

    #[test]
    fn unknown_architecture() {
        let err = arch_info("mips").unwrap_err();
        assert!(matches!(err, XtaskError::UnsupportedArch(ref a) if a == "mips"));
        assert!(err.to_string().contains("'mips'"));
    }

    #[test]
    fn dimension_validation() {
        assert!(matches!(check_dim(Some(0)), Err(XtaskError::InvalidDim)));
        assert_eq!(check_dim(Some(1)).unwrap(), Some(1));
        assert_eq!(check_dim(None).unwrap(), None);
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["xtask", "disk", "--arch", "aarch64", "--dim", "8"]).unwrap();
        assert_eq!(cli.log_level, LevelFilter::Info);
        match cli.command {
            Cmd::Disk { arch, dim, image } => {
                assert_eq!(arch, "aarch64");
                assert_eq!(dim, Some(8));
                assert_eq!(image, None);
            }
            _ => panic!("expected disk subcommand"),
        }

        let cli = Cli::try_parse_from(["xtask", "--log-level", "debug", "check"]).unwrap();
        assert_eq!(cli.log_level, LevelFilter::Debug);
        assert!(matches!(cli.command, Cmd::Check { dim: None }));
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let dir = std::env::temp_dir().join(format!("safematmult-xtask-{}", process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let bin = dir.join("big.bin");
        std::fs::write(&bin, vec![0u8; LOADER_PAGE_SIZE as usize + 1]).unwrap();

        let err = create_fat_disk_image(&dir.join("disk.img"), &bin).unwrap_err();
        assert!(matches!(
            err,
            XtaskError::PayloadTooLarge { size, limit } if size == LOADER_PAGE_SIZE + 1 && limit == LOADER_PAGE_SIZE
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
