use log::{debug, info};
use thiserror::Error;

use crate::codec::bits::{BitReader, OutOfData};
use crate::codec::colour::ConvertibleColour;
use crate::codec::rle::{run_length_decode, RleDecodeError};

use super::container::{CompressedImage, ContainerError};
use super::format::{ColourFormat, PaletteFormat};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("container parsing failed")]
    Container(#[from] ContainerError),
    #[error("run-length decoding failed")]
    RunLength(#[from] RleDecodeError),
    #[error("palette block truncated")]
    PaletteTruncated(#[from] OutOfData),
    #[error("invalid palette index {index}: palette holds {size} entries")]
    InvalidPaletteIndex { index: usize, size: usize },
}

/// A decoded RLEI image: dimensions, the palette expanded to RGBA (empty
/// for direct-colour formats), and the reconstructed RGBA pixel buffer.
#[derive(Debug)]
pub struct DecodedImage {
    pub width: u16,
    pub height: u16,
    pub colour_format: ColourFormat,
    pub palette: Vec<[u8; 4]>,
    pub rgba_data: Vec<u8>,
}

/// Reverses [`crate::image::encoder::encode`]: parses the container,
/// expands the palette, run-length decodes exactly `width x height`
/// symbols, and rebuilds the RGBA pixel buffer.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let image = CompressedImage::from_bytes(bytes)?;
    info!(
        "Decoding {}x{} image, colour format {:?}",
        image.width, image.height, image.colour_format
    );

    let palette = decode_palette(&image)?;
    debug!("Palette expanded to {} entries", palette.len());

    let pixel_count = usize::from(image.width) * usize::from(image.height);
    let symbols = run_length_decode(
        &image.data,
        image.unit_length,
        image.pack_length,
        pixel_count,
    )?;
    debug!("Run-length decoding produced {} symbols", symbols.len());

    let mut rgba_data = Vec::with_capacity(pixel_count * 4);
    if image.colour_format.is_indexed() {
        for &symbol in &symbols {
            let index = symbol as usize;
            let entry = palette
                .get(index)
                .ok_or(DecodeError::InvalidPaletteIndex {
                    index,
                    size: palette.len(),
                })?;
            rgba_data.extend_from_slice(entry);
        }
    } else {
        for &symbol in &symbols {
            let [red, green, blue] = symbol_colour(image.colour_format, symbol);
            rgba_data.extend_from_slice(&[red, green, blue, 255]);
        }
    }

    info!("Decoding complete");
    Ok(DecodedImage {
        width: image.width,
        height: image.height,
        colour_format: image.colour_format,
        palette,
        rgba_data,
    })
}

fn decode_palette(image: &CompressedImage) -> Result<Vec<[u8; 4]>, DecodeError> {
    if image.palette_format == PaletteFormat::NoPalette {
        return Ok(Vec::new());
    }

    let width = u32::from(image.palette_format.entry_bits());
    let mut reader = BitReader::new(&image.palette);
    let mut palette = Vec::with_capacity(usize::from(image.palette_entries));
    for _ in 0..image.palette_entries {
        let raw = reader.read_bits(width)?;
        let [red, green, blue] = entry_colour(image.palette_format, raw);
        palette.push([red, green, blue, 255]);
    }
    Ok(palette)
}

fn entry_colour(palette_format: PaletteFormat, raw: u32) -> [u8; 3] {
    match palette_format {
        PaletteFormat::Greyscale2Bit => ConvertibleColour::from_greyscale2(raw as u8).to_colour24(),
        PaletteFormat::Greyscale3Bit => ConvertibleColour::from_greyscale3(raw as u8).to_colour24(),
        PaletteFormat::Greyscale4Bit => ConvertibleColour::from_greyscale4(raw as u8).to_colour24(),
        PaletteFormat::Colour3Bit => ConvertibleColour::from_colour3(raw as u8).to_colour24(),
        PaletteFormat::Colour6Bit => ConvertibleColour::from_colour6(raw as u8).to_colour24(),
        PaletteFormat::Colour555 => ConvertibleColour::from_colour555(raw as u16).to_colour24(),
        PaletteFormat::Colour565 => ConvertibleColour::from_colour565(raw as u16).to_colour24(),
        PaletteFormat::ColourFull => [(raw >> 16) as u8, (raw >> 8) as u8, raw as u8],
        // decode_palette returns early for NoPalette.
        PaletteFormat::NoPalette => unreachable!("no palette entries without a palette format"),
    }
}

fn symbol_colour(format: ColourFormat, symbol: u32) -> [u8; 3] {
    match format {
        ColourFormat::PackedGreyscale1Bit => {
            ConvertibleColour::from_greyscale1(symbol as u8).to_colour24()
        }
        ColourFormat::PackedGreyscale2Bit => {
            ConvertibleColour::from_greyscale2(symbol as u8).to_colour24()
        }
        ColourFormat::PackedGreyscale3Bit => {
            ConvertibleColour::from_greyscale3(symbol as u8).to_colour24()
        }
        ColourFormat::PackedGreyscale4Bit => {
            ConvertibleColour::from_greyscale4(symbol as u8).to_colour24()
        }
        ColourFormat::PackedColour3Bit => {
            ConvertibleColour::from_colour3(symbol as u8).to_colour24()
        }
        ColourFormat::PackedColour6Bit => {
            ConvertibleColour::from_colour6(symbol as u8).to_colour24()
        }
        ColourFormat::Colour555 => ConvertibleColour::from_colour555(symbol as u16).to_colour24(),
        ColourFormat::Colour565 => ConvertibleColour::from_colour565(symbol as u16).to_colour24(),
        ColourFormat::ColourFull => [(symbol >> 16) as u8, (symbol >> 8) as u8, symbol as u8],
        // decode() resolves indexed symbols through the palette instead.
        ColourFormat::PackedIndex1Bit
        | ColourFormat::PackedIndex2Bit
        | ColourFormat::PackedIndex4Bit
        | ColourFormat::Index8Bit => unreachable!("indexed formats are palette-mapped"),
    }
}
