mod args;

use std::process::ExitCode;

use clap::Parser;
use image::imageops::FilterType;
use image::GenericImageView;
use log::info;
use thiserror::Error;

use args::Args;
use lib_rlei::{encode, resolve, UniqueColourQuantizer};

#[derive(Error, Debug)]
enum CliError {
    #[error("failed to load source image")]
    Image(#[from] image::ImageError),
    #[error("invalid format arguments")]
    Format(#[from] lib_rlei::image::format::FormatParseError),
    #[error("encoding failed")]
    Encoding(#[from] lib_rlei::image::encoder::EncodingError),
    #[error("image dimensions {width}x{height} exceed the 16-bit container limit")]
    ImageTooLarge { width: u32, height: u32 },
    #[error("failed to write output file")]
    Io(#[from] std::io::Error),
}

fn main() -> ExitCode {
    lib_rlei::init_logging();

    // Help and version land on stdout and exit 0; every misuse exits 1.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => {
            let _ = error.print();
            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("[Error] {error}");
            let mut source = std::error::Error::source(&error);
            while let Some(cause) = source {
                eprintln!("    caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let (descriptor, palette_format) =
        resolve(&args.colour_format, args.palette_format.as_deref())?;

    let mut source = image::open(&args.source)?;
    let (source_width, source_height) = source.dimensions();
    if args.width.is_some() || args.height.is_some() {
        let width = args.width.unwrap_or(source_width);
        let height = args.height.unwrap_or(source_height);
        info!("Resizing {} to {}x{}", args.source.display(), width, height);
        source = source.resize_exact(width, height, FilterType::Triangle);
    }

    let rgba = source.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(CliError::ImageTooLarge { width, height });
    }

    let encoded = encode(
        width as u16,
        height as u16,
        rgba.as_raw(),
        descriptor,
        palette_format,
        &UniqueColourQuantizer,
    )?;
    std::fs::write(&args.destination, &encoded)?;
    info!(
        "Wrote {} bytes to {}",
        encoded.len(),
        args.destination.display()
    );
    Ok(())
}
