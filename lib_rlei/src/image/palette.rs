use std::collections::HashMap;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuantizeError {
    #[error("invalid pixel data length: expected a multiple of 4 bytes, got {0}")]
    InvalidPixelDataLength(usize),
    #[error("palette overflow: image holds more than {max} unique colours")]
    PaletteOverflow { max: usize },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IndexingError {
    #[error("colour ({0}, {1}, {2}) is not present in the palette")]
    ColourNotInPalette(u8, u8, u8),
}

/// Palette selection contract. Implementations reduce an RGBA pixel buffer
/// to at most `max_colours` representative RGB entries, ordered by palette
/// index. The codec consumes the entries as-is and maps pixels by exact
/// match, so implementations that remap colours must rewrite the pixels
/// before the buffer reaches the encoder.
pub trait Quantizer {
    fn quantize(
        &self,
        rgba: &[u8],
        max_colours: usize,
        greyscale_hint: bool,
    ) -> Result<Vec<[u8; 3]>, QuantizeError>;
}

/// Exact quantizer: collects unique colours in first-appearance order and
/// refuses images with more unique colours than the palette can hold. Alpha
/// is ignored. The hint is unused; grey entries come out grey on their own.
#[derive(Debug, Default)]
pub struct UniqueColourQuantizer;

impl Quantizer for UniqueColourQuantizer {
    fn quantize(
        &self,
        rgba: &[u8],
        max_colours: usize,
        _greyscale_hint: bool,
    ) -> Result<Vec<[u8; 3]>, QuantizeError> {
        if rgba.len() % 4 != 0 {
            return Err(QuantizeError::InvalidPixelDataLength(rgba.len()));
        }

        let mut seen = HashMap::new();
        let mut palette = Vec::new();
        for pixel in rgba.chunks_exact(4) {
            let colour = [pixel[0], pixel[1], pixel[2]];
            if seen.contains_key(&colour) {
                continue;
            }
            if palette.len() >= max_colours {
                return Err(QuantizeError::PaletteOverflow { max: max_colours });
            }
            seen.insert(colour, palette.len());
            palette.push(colour);
        }
        Ok(palette)
    }
}

/// Maps every pixel to its palette index by exact colour match.
pub fn index_pixels(rgba: &[u8], palette: &[[u8; 3]]) -> Result<Vec<u32>, IndexingError> {
    let lookup: HashMap<[u8; 3], u32> = palette
        .iter()
        .enumerate()
        .map(|(index, &colour)| (colour, index as u32))
        .collect();

    let mut indices = Vec::with_capacity(rgba.len() / 4);
    for pixel in rgba.chunks_exact(4) {
        let colour = [pixel[0], pixel[1], pixel[2]];
        let index = lookup
            .get(&colour)
            .ok_or(IndexingError::ColourNotInPalette(
                colour[0], colour[1], colour[2],
            ))?;
        indices.push(*index);
    }
    Ok(indices)
}
