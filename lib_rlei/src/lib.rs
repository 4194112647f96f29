pub mod codec;
pub mod image;

use log::*;
use std::fs::File;
use std::io::Write;

pub use crate::image::container::CompressedImage;
pub use crate::image::decoder::{decode, DecodedImage};
pub use crate::image::encoder::encode;
pub use crate::image::format::{colour_format, resolve, ColourFormat, PaletteFormat};
pub use crate::image::palette::{Quantizer, UniqueColourQuantizer};

pub fn init_logging() {
    let target = Box::new(File::create("log.txt").expect("Can't create file"));

    env_logger::Builder::new()
        .target(env_logger::Target::Pipe(target))
        .filter(Some("lib_rlei"), LevelFilter::Debug)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
