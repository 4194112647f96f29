//! Command-line argument definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rlei",
    version,
    about = "Compresses raster images into the run-length RLEI container",
    disable_help_flag = true
)]
pub struct Args {
    /// Width of the output image (px)
    #[arg(short = 'w', long)]
    pub width: Option<u32>,

    /// Height of the output image (px)
    #[arg(short = 'h', long)]
    pub height: Option<u32>,

    /// Format of outputted colours - Options: pi1, pi2, pi4, i8r1, i8r2,
    /// pg1, pg2, pc3, pg3, pg4, pc6, c555r1, c555r2, c565r1, c565r2, c24r1,
    /// c24r2
    #[arg(short = 'c', long = "colour-format")]
    pub colour_format: String,

    /// Format of palette colours - Options: g2, c3, g3, g4, c6, c555, c565,
    /// c24 (required for the indexed colour formats)
    #[arg(short = 'p', long = "palette-format")]
    pub palette_format: Option<String>,

    /// File path of input image
    #[arg(short = 's', long)]
    pub source: PathBuf,

    /// File path of output image
    #[arg(short = 'd', long)]
    pub destination: PathBuf,

    /// Print help (-h belongs to --height)
    #[arg(long, action = clap::ArgAction::HelpLong)]
    help: Option<bool>,
}
