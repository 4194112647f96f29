use log::{debug, error};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::format::{ColourFormat, PaletteFormat};

pub const MAGIC: [u8; 4] = *b"RLEI";
pub const VERSION: u32 = 1;
/// Header fields laid out tightly, no compiler padding.
pub const HEADER_SIZE: usize = 36;

/// On-disk header, field for field. All integers little-endian; bincode's
/// default options serialize this struct to exactly [`HEADER_SIZE`] bytes.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
struct RawHeader {
    magic: [u8; 4],
    version: u32,
    file_size_bytes: u32,
    width: u16,
    height: u16,
    image_data_size_bytes: u32,
    colour_format: u32,
    unit_length: u8,
    pack_length: u8,
    palette_size: u8,
    reserved1: u8,
    palette_size_bytes: u16,
    reserved2: u16,
    palette_colour_format: u32,
}

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("bad magic: not an RLEI file")]
    BadMagic,
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u32),
    #[error("file truncated: expected at least {expected} bytes, got {actual}")]
    TruncatedFile { expected: usize, actual: usize },
    #[error("malformed header")]
    MalformedHeader(#[from] bincode::Error),
    #[error("unrecognized colour format value {0:#x}")]
    UnknownColourFormat(u32),
    #[error("unrecognized palette colour format value {0:#x}")]
    PaletteFormatMismatch(u32),
    #[error("unit length {actual} does not match colour format (expected {expected})")]
    UnitLengthMismatch { expected: u8, actual: u8 },
    #[error("palette block of {actual} bytes does not hold {entries} {entry_bits}-bit entries (expected {expected} bytes)")]
    PaletteSizeMismatch {
        entries: u16,
        entry_bits: u8,
        expected: usize,
        actual: usize,
    },
}

/// The complete in-memory artifact: header fields plus the palette and
/// run-length-compressed image blocks. Assembled fully before any output
/// I/O happens, and rebuilt fresh from file bytes on decode.
#[derive(Debug)]
pub struct CompressedImage {
    pub width: u16,
    pub height: u16,
    pub colour_format: ColourFormat,
    pub unit_length: u8,
    pub pack_length: u8,
    /// Actual palette entry count (0 for direct-colour formats, up to 256).
    pub palette_entries: u16,
    pub palette_format: PaletteFormat,
    pub palette: Vec<u8>,
    pub data: Vec<u8>,
}

impl CompressedImage {
    pub fn total_size_bytes(&self) -> usize {
        HEADER_SIZE + self.palette.len() + self.data.len()
    }

    /// Serializes header, palette block, and image block into one buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        let header = RawHeader {
            magic: MAGIC,
            version: VERSION,
            file_size_bytes: self.total_size_bytes() as u32,
            width: self.width,
            height: self.height,
            image_data_size_bytes: self.data.len() as u32,
            colour_format: self.colour_format as u32,
            unit_length: self.unit_length,
            pack_length: self.pack_length,
            // The wire field is one byte; a full 256-entry palette wraps to
            // 0 and is recovered from palette_size_bytes on read.
            palette_size: (self.palette_entries & 0xFF) as u8,
            reserved1: 0,
            palette_size_bytes: self.palette.len() as u16,
            reserved2: 0,
            palette_colour_format: self.palette_format as u32,
        };

        let mut bytes = bincode::serialize(&header)?;
        debug!(
            "Header written: {}x{}, colour format {:?}, palette {} entries / {} bytes, image {} bytes",
            self.width,
            self.height,
            self.colour_format,
            self.palette_entries,
            self.palette.len(),
            self.data.len()
        );
        bytes.extend_from_slice(&self.palette);
        bytes.extend_from_slice(&self.data);
        Ok(bytes)
    }

    /// Parses and validates a container. The palette and image blocks are
    /// copied out; trailing bytes beyond the declared sizes are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ContainerError> {
        if bytes.len() >= MAGIC.len() && bytes[..MAGIC.len()] != MAGIC {
            error!("Invalid magic number in header");
            return Err(ContainerError::BadMagic);
        }
        if bytes.len() < HEADER_SIZE {
            return Err(ContainerError::TruncatedFile {
                expected: HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        let header: RawHeader = bincode::deserialize(&bytes[..HEADER_SIZE])?;
        if header.version != VERSION {
            return Err(ContainerError::UnsupportedVersion(header.version));
        }

        let colour_format = ColourFormat::from_wire(header.colour_format)
            .ok_or(ContainerError::UnknownColourFormat(header.colour_format))?;
        let palette_format = PaletteFormat::from_wire(header.palette_colour_format).ok_or(
            ContainerError::PaletteFormatMismatch(header.palette_colour_format),
        )?;
        if header.unit_length != colour_format.unit_length() {
            return Err(ContainerError::UnitLengthMismatch {
                expected: colour_format.unit_length(),
                actual: header.unit_length,
            });
        }

        let palette_size_bytes = header.palette_size_bytes as usize;
        let image_data_size_bytes = header.image_data_size_bytes as usize;
        let expected = HEADER_SIZE + palette_size_bytes + image_data_size_bytes;
        if bytes.len() < expected {
            error!(
                "Unexpected end of data: header promises {} bytes, file holds {}",
                expected,
                bytes.len()
            );
            return Err(ContainerError::TruncatedFile {
                expected,
                actual: bytes.len(),
            });
        }

        // The one-byte palette_size field stores the entry count modulo 256:
        // 0 with a nonzero palette block means a full 256-entry palette.
        let palette_entries: u16 = if header.palette_size != 0 {
            u16::from(header.palette_size)
        } else if palette_size_bytes != 0 {
            256
        } else {
            0
        };

        let entry_bits = palette_format.entry_bits();
        let expected_palette_bytes =
            (usize::from(palette_entries) * usize::from(entry_bits)).div_ceil(8);
        if expected_palette_bytes != palette_size_bytes
            || (palette_format == PaletteFormat::NoPalette) != (palette_entries == 0)
        {
            return Err(ContainerError::PaletteSizeMismatch {
                entries: palette_entries,
                entry_bits,
                expected: expected_palette_bytes,
                actual: palette_size_bytes,
            });
        }

        debug!(
            "Header read: {}x{}, colour format {:?}, palette {} entries / {} bytes, image {} bytes",
            header.width,
            header.height,
            colour_format,
            palette_entries,
            palette_size_bytes,
            image_data_size_bytes
        );

        let palette_start = HEADER_SIZE;
        let data_start = palette_start + palette_size_bytes;
        Ok(Self {
            width: header.width,
            height: header.height,
            colour_format,
            unit_length: header.unit_length,
            pack_length: header.pack_length,
            palette_entries,
            palette_format,
            palette: bytes[palette_start..data_start].to_vec(),
            data: bytes[data_start..data_start + image_data_size_bytes].to_vec(),
        })
    }
}
