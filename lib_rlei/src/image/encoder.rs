use log::{debug, info};
use thiserror::Error;

use crate::codec::bits::BitPacker;
use crate::codec::colour::{ConvertibleColour, NotGreyscale};
use crate::codec::rle::{run_length_encode, RleEncodeError};

use super::container::CompressedImage;
use super::format::{ColourFormat, ColourFormatDescriptor, PaletteFormat};
use super::palette::{index_pixels, IndexingError, QuantizeError, Quantizer};

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("image is empty: width and height must be nonzero")]
    EmptyImage,
    #[error("invalid pixel data length: expected {expected} bytes for {width}x{height} RGBA, got {actual}")]
    InvalidPixelDataLength {
        expected: usize,
        actual: usize,
        width: u16,
        height: u16,
    },
    #[error("palette of {0} entries exceeds the supported maximum of 256")]
    PaletteTooLarge(usize),
    #[error("colour format '{0}' is indexed and requires a palette format")]
    MissingPaletteFormat(&'static str),
    #[error("greyscale conversion failed")]
    NotGreyscale(#[from] NotGreyscale),
    #[error("palette quantization failed")]
    Quantization(#[from] QuantizeError),
    #[error("palette indexing failed")]
    Indexing(#[from] IndexingError),
    #[error("run-length encoding failed")]
    RunLength(#[from] RleEncodeError),
    #[error("container assembly failed")]
    Container(#[from] bincode::Error),
}

/// Compresses a row-major RGBA pixel buffer into a complete RLEI container.
///
/// For indexed colour formats the palette comes from `quantizer` and pixels
/// are mapped by exact colour match; for direct formats every pixel is
/// converted to a packed symbol. Either way the symbols are run-length
/// packed and the container is assembled entirely in memory.
pub fn encode(
    width: u16,
    height: u16,
    rgba: &[u8],
    descriptor: &ColourFormatDescriptor,
    palette_format: PaletteFormat,
    quantizer: &dyn Quantizer,
) -> Result<Vec<u8>, EncodingError> {
    info!(
        "Encoding {}x{} image as '{}'",
        width, height, descriptor.token
    );

    if width == 0 || height == 0 {
        return Err(EncodingError::EmptyImage);
    }
    let pixel_count = usize::from(width) * usize::from(height);
    if rgba.len() != pixel_count * 4 {
        return Err(EncodingError::InvalidPixelDataLength {
            expected: pixel_count * 4,
            actual: rgba.len(),
            width,
            height,
        });
    }
    if descriptor.palette_size > 256 {
        return Err(EncodingError::PaletteTooLarge(
            descriptor.palette_size as usize,
        ));
    }

    let (palette_bytes, palette_entries, symbols) = if descriptor.format.is_indexed() {
        if palette_format == PaletteFormat::NoPalette {
            return Err(EncodingError::MissingPaletteFormat(descriptor.token));
        }
        let greyscale_hint = matches!(
            palette_format,
            PaletteFormat::Greyscale2Bit | PaletteFormat::Greyscale3Bit | PaletteFormat::Greyscale4Bit
        );
        let palette = quantizer.quantize(
            rgba,
            usize::from(descriptor.palette_size),
            greyscale_hint,
        )?;
        if palette.len() > usize::from(descriptor.palette_size) {
            return Err(EncodingError::PaletteTooLarge(palette.len()));
        }
        debug!("Quantized palette holds {} entries", palette.len());

        let palette_bytes = encode_palette(&palette, palette_format)?;
        let symbols = index_pixels(rgba, &palette)?;
        (palette_bytes, palette.len() as u16, symbols)
    } else {
        let mut symbols = Vec::with_capacity(pixel_count);
        for pixel in rgba.chunks_exact(4) {
            symbols.push(direct_symbol(
                descriptor.format,
                [pixel[0], pixel[1], pixel[2]],
            )?);
        }
        (Vec::new(), 0, symbols)
    };

    let packed = run_length_encode(&symbols, descriptor.unit_length, descriptor.pack_length)?;
    debug!(
        "Run-length encoding packed {} symbols into {} bytes",
        symbols.len(),
        packed.byte_length()
    );

    let image = CompressedImage {
        width,
        height,
        colour_format: descriptor.format,
        unit_length: descriptor.unit_length,
        pack_length: descriptor.pack_length,
        palette_entries,
        palette_format: if descriptor.format.is_indexed() {
            palette_format
        } else {
            PaletteFormat::NoPalette
        },
        palette: palette_bytes,
        data: packed.dump(),
    };
    let bytes = image.to_bytes()?;
    info!(
        "Encoding complete: {} bytes ({} palette, {} image data)",
        bytes.len(),
        image.palette.len(),
        image.data.len()
    );
    Ok(bytes)
}

/// Packs palette entries into the palette block, high bits first, one entry
/// after another with no alignment between them.
fn encode_palette(
    entries: &[[u8; 3]],
    palette_format: PaletteFormat,
) -> Result<Vec<u8>, EncodingError> {
    let mut packer = BitPacker::new();
    for &entry in entries {
        let colour = ConvertibleColour::from_colour24(entry);
        let width = u32::from(palette_format.entry_bits());
        let value = match palette_format {
            PaletteFormat::Greyscale2Bit => u32::from(colour.to_greyscale2()?),
            PaletteFormat::Greyscale3Bit => u32::from(colour.to_greyscale3()?),
            PaletteFormat::Greyscale4Bit => u32::from(colour.to_greyscale4()?),
            PaletteFormat::Colour3Bit => u32::from(colour.to_colour3()),
            PaletteFormat::Colour6Bit => u32::from(colour.to_colour6()),
            PaletteFormat::Colour555 => u32::from(colour.to_colour555()),
            PaletteFormat::Colour565 => u32::from(colour.to_colour565()),
            PaletteFormat::ColourFull => {
                let [red, green, blue] = colour.to_colour24();
                u32::from(red) << 16 | u32::from(green) << 8 | u32::from(blue)
            }
            // encode() rejects NoPalette before the palette is built.
            PaletteFormat::NoPalette => unreachable!("no palette block without a palette format"),
        };
        packer.push_bits(value, width);
    }
    Ok(packer.dump())
}

fn direct_symbol(format: ColourFormat, rgb: [u8; 3]) -> Result<u32, EncodingError> {
    let colour = ConvertibleColour::from_colour24(rgb);
    Ok(match format {
        ColourFormat::PackedGreyscale1Bit => u32::from(colour.to_greyscale1()?),
        ColourFormat::PackedGreyscale2Bit => u32::from(colour.to_greyscale2()?),
        ColourFormat::PackedGreyscale3Bit => u32::from(colour.to_greyscale3()?),
        ColourFormat::PackedGreyscale4Bit => u32::from(colour.to_greyscale4()?),
        ColourFormat::PackedColour3Bit => u32::from(colour.to_colour3()),
        ColourFormat::PackedColour6Bit => u32::from(colour.to_colour6()),
        ColourFormat::Colour555 => u32::from(colour.to_colour555()),
        ColourFormat::Colour565 => u32::from(colour.to_colour565()),
        ColourFormat::ColourFull => {
            let [red, green, blue] = colour.to_colour24();
            u32::from(red) << 16 | u32::from(green) << 8 | u32::from(blue)
        }
        // encode() sends indexed formats down the palette path.
        ColourFormat::PackedIndex1Bit
        | ColourFormat::PackedIndex2Bit
        | ColourFormat::PackedIndex4Bit
        | ColourFormat::Index8Bit => unreachable!("indexed formats are palette-mapped"),
    })
}
