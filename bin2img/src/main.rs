//! bin2img - reduce a raw 128 KiB flash image into a `.img` container.
//!
//! The linker emits a fixed-size `.bin` image that is mostly 0xFF
//! padding. This tool drops the padding and writes a compact `.img`
//! container of two offset/length-prefixed segments (the CCFG block and
//! the trimmed code) ready for flash programming.

use std::ffi::OsStr;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use img_reduce::{IMAGE_SIZE, RawImage};
use log::info;

#[derive(Parser, Debug)]
#[command(name = "bin2img")]
#[command(about = "Reduce a raw 128 KiB flash image into a segmented .img container")]
struct Args {
    /// Raw image produced by the linker (must end in .bin)
    input: PathBuf,
}

/// Derive the output path by swapping the `.bin` suffix for `.img`.
fn output_path(input: &Path) -> Result<PathBuf> {
    if input.extension() != Some(OsStr::new("bin")) {
        bail!(
            "Illegal file name \"{}\": expected a .bin image",
            input.display()
        );
    }
    Ok(input.with_extension("img"))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let output = output_path(&args.input)?;

    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open \"{}\"", args.input.display()))?;
    let image = RawImage::from_reader(file)
        .with_context(|| format!("Failed to read image \"{}\"", args.input.display()))?;
    info!(
        "\"{}\" contains image of {}K bytes",
        args.input.display(),
        IMAGE_SIZE / 1024
    );

    let container = img_reduce::reduce(&image);

    // The output file must not exist until the container is fully built;
    // a failed conversion has to leave no partial .img behind.
    let mut out_file = File::create(&output)
        .with_context(|| format!("Failed to create \"{}\"", output.display()))?;
    out_file
        .write_all(&container)
        .with_context(|| format!("Failed to write \"{}\"", output.display()))?;

    println!(
        "\"{}\" contains reduced image of {} bytes",
        output.display(),
        container.len()
    );
    Ok(())
}
