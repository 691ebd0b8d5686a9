//! Show the legacy geometry of a block device.
use ap_storage::Error;
use ap_storage_linux::LinuxDisk;
use gumdrop::Options;

#[derive(Debug, Options)]
struct CommandOptions {
    /// Print the help message.
    help: bool,
    /// The block device.
    #[options(free)]
    device: Vec<String>,
}

fn main() -> Result<(), Error> {
    let opts = CommandOptions::parse_args_default_or_exit();
    let [device] = opts.device.as_slice() else {
        return Err(anyhow::anyhow!("usage: geometry <device>"));
    };
    let disk = LinuxDisk::new(device, 0)?;
    let geo = disk.geometry()?;
    println!(
        "geometry : head {}, sector {}, cylinder {}, start {}",
        geo.heads, geo.sectors, geo.cylinders, geo.start
    );
    Ok(())
}
