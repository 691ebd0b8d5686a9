//! Partition a disk with a single MBR partition.
//!
//! ```text
//! mkpart-mbr [options] <device> [start-offset-MB]
//! ```
//!
//! The partition has type 0x83 and covers the disk after the first MiB or
//! the given start offset.  An existing disk signature is kept.
//!
//! # Exit codes
//!
//! - 0 success, also when the kernel refuses to reread the table
//! - 1 invalid arguments
//! - 2 unknown options
//! - 3 the device can not be opened
//! - 4 sector or device size unknown
//! - 5 the disk signature can not be read
//! - 6 the partition does not fit on the disk
//! - 7 a write failed, the table may be incomplete
//! - 8 sync failed
use ap_storage_linux::LinuxDiskRW;
use ap_storage_mbr_mkpart::{MakeMbr, MkpartError};
use gumdrop::Options;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Options)]
struct CommandOptions {
    /// Print the help message.
    help: bool,
    /// Verbose output.
    verbose: bool,
    /// Do not write.
    dry_run: bool,
    /// The block device and an optional start offset in MiB.
    #[options(free)]
    args: Vec<String>,
}

fn run(opts: &CommandOptions) -> Result<(), MkpartError> {
    let (device, start) = match opts.args.as_slice() {
        [device] => (device, None),
        [device, mib] => {
            let mib = mib
                .parse::<u32>()
                .map_err(|e| MkpartError::Usage(format!("invalid start offset {mib:?}: {e}")))?;
            (device, Some(mib))
        }
        _ => {
            return Err(MkpartError::Usage(
                "usage: mkpart-mbr [options] <device> [start-offset-MB]".into(),
            ))
        }
    };

    let mut builder = MakeMbr::default();
    if let Some(mib) = start {
        builder = builder.start_mib(mib);
    }

    // closed on every return path when disk drops
    let disk = LinuxDiskRW::new(device, 0).map_err(|source| MkpartError::DeviceOpen {
        path: device.clone(),
        source,
    })?;

    let plan = builder.plan(&disk)?;
    if opts.dry_run {
        for node in plan.writes.iter() {
            println!("{:#05x} {:02x?}", node.offset, node.data);
        }
        return Ok(());
    }
    let outcome = plan.commit(&disk)?;
    if opts.verbose {
        println!("{outcome:#?}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let opts = CommandOptions::parse_args_default_or_exit();

    let level = if opts.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
