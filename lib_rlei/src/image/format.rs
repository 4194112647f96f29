use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormatParseError {
    #[error("unknown colour format token '{0}'")]
    UnknownColourFormat(String),
    #[error("unknown palette format token '{0}'")]
    UnknownPaletteFormat(String),
    #[error("colour format '{0}' is indexed and requires a palette format")]
    MissingPaletteFormat(&'static str),
}

/// Wire identifier of the image data encoding. The discriminants are the
/// bitmask values stored in the container's `colourFormat` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ColourFormat {
    PackedIndex1Bit = 0x1,
    PackedIndex2Bit = 0x2,
    PackedIndex4Bit = 0x4,
    Index8Bit = 0x8,
    PackedGreyscale1Bit = 0x10,
    PackedGreyscale2Bit = 0x20,
    PackedColour3Bit = 0x40,
    PackedGreyscale3Bit = 0x80,
    PackedGreyscale4Bit = 0x100,
    PackedColour6Bit = 0x200,
    Colour555 = 0x400,
    Colour565 = 0x800,
    ColourFull = 0x1000,
}

impl ColourFormat {
    pub fn from_wire(value: u32) -> Option<Self> {
        Some(match value {
            0x1 => Self::PackedIndex1Bit,
            0x2 => Self::PackedIndex2Bit,
            0x4 => Self::PackedIndex4Bit,
            0x8 => Self::Index8Bit,
            0x10 => Self::PackedGreyscale1Bit,
            0x20 => Self::PackedGreyscale2Bit,
            0x40 => Self::PackedColour3Bit,
            0x80 => Self::PackedGreyscale3Bit,
            0x100 => Self::PackedGreyscale4Bit,
            0x200 => Self::PackedColour6Bit,
            0x400 => Self::Colour555,
            0x800 => Self::Colour565,
            0x1000 => Self::ColourFull,
            _ => return None,
        })
    }

    pub fn is_indexed(self) -> bool {
        matches!(
            self,
            Self::PackedIndex1Bit | Self::PackedIndex2Bit | Self::PackedIndex4Bit | Self::Index8Bit
        )
    }

    /// Symbol width this encoding produces, independent of the run packing.
    pub fn unit_length(self) -> u8 {
        match self {
            Self::PackedIndex1Bit | Self::PackedGreyscale1Bit => 1,
            Self::PackedIndex2Bit | Self::PackedGreyscale2Bit => 2,
            Self::PackedColour3Bit | Self::PackedGreyscale3Bit => 3,
            Self::PackedIndex4Bit | Self::PackedGreyscale4Bit => 4,
            Self::PackedColour6Bit => 6,
            Self::Index8Bit => 8,
            Self::Colour555 | Self::Colour565 => 16,
            Self::ColourFull => 24,
        }
    }
}

/// Wire identifier of the palette entry encoding, stored in the container's
/// `paletteColourFormat` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PaletteFormat {
    NoPalette = 0x0,
    Greyscale2Bit = 0x1,
    Colour3Bit = 0x2,
    Greyscale3Bit = 0x4,
    Greyscale4Bit = 0x8,
    Colour6Bit = 0x10,
    Colour555 = 0x20,
    Colour565 = 0x40,
    ColourFull = 0x80,
}

impl PaletteFormat {
    pub fn from_wire(value: u32) -> Option<Self> {
        Some(match value {
            0x0 => Self::NoPalette,
            0x1 => Self::Greyscale2Bit,
            0x2 => Self::Colour3Bit,
            0x4 => Self::Greyscale3Bit,
            0x8 => Self::Greyscale4Bit,
            0x10 => Self::Colour6Bit,
            0x20 => Self::Colour555,
            0x40 => Self::Colour565,
            0x80 => Self::ColourFull,
            _ => return None,
        })
    }

    pub fn from_token(token: &str) -> Result<Self, FormatParseError> {
        Ok(match token {
            "g2" => Self::Greyscale2Bit,
            "g3" => Self::Greyscale3Bit,
            "g4" => Self::Greyscale4Bit,
            "c3" => Self::Colour3Bit,
            "c6" => Self::Colour6Bit,
            "c555" => Self::Colour555,
            "c565" => Self::Colour565,
            "c24" => Self::ColourFull,
            _ => {
                return Err(FormatParseError::UnknownPaletteFormat(token.to_string()));
            }
        })
    }

    pub fn entry_bits(self) -> u8 {
        match self {
            Self::NoPalette => 0,
            Self::Greyscale2Bit => 2,
            Self::Colour3Bit | Self::Greyscale3Bit => 3,
            Self::Greyscale4Bit => 4,
            Self::Colour6Bit => 6,
            Self::Colour555 | Self::Colour565 => 16,
            Self::ColourFull => 24,
        }
    }
}

/// Structural parameters behind one colour-format token.
#[derive(Debug, PartialEq, Eq)]
pub struct ColourFormatDescriptor {
    pub token: &'static str,
    pub format: ColourFormat,
    pub unit_length: u8,
    pub pack_length: u8,
    /// Palette capacity in entries; 0 for direct-colour formats.
    pub palette_size: u16,
}

/// Every supported colour-format token. The r1/r2 suffixed tokens share a
/// wire format and differ only in run-count width.
pub const COLOUR_FORMATS: [ColourFormatDescriptor; 17] = [
    ColourFormatDescriptor {
        token: "pi1",
        format: ColourFormat::PackedIndex1Bit,
        unit_length: 1,
        pack_length: 8,
        palette_size: 2,
    },
    ColourFormatDescriptor {
        token: "pi2",
        format: ColourFormat::PackedIndex2Bit,
        unit_length: 2,
        pack_length: 8,
        palette_size: 4,
    },
    ColourFormatDescriptor {
        token: "pi4",
        format: ColourFormat::PackedIndex4Bit,
        unit_length: 4,
        pack_length: 8,
        palette_size: 16,
    },
    ColourFormatDescriptor {
        token: "i8r1",
        format: ColourFormat::Index8Bit,
        unit_length: 8,
        pack_length: 16,
        palette_size: 256,
    },
    ColourFormatDescriptor {
        token: "i8r2",
        format: ColourFormat::Index8Bit,
        unit_length: 8,
        pack_length: 24,
        palette_size: 256,
    },
    ColourFormatDescriptor {
        token: "pg1",
        format: ColourFormat::PackedGreyscale1Bit,
        unit_length: 1,
        pack_length: 8,
        palette_size: 0,
    },
    ColourFormatDescriptor {
        token: "pg2",
        format: ColourFormat::PackedGreyscale2Bit,
        unit_length: 2,
        pack_length: 8,
        palette_size: 0,
    },
    ColourFormatDescriptor {
        token: "pc3",
        format: ColourFormat::PackedColour3Bit,
        unit_length: 3,
        pack_length: 8,
        palette_size: 0,
    },
    ColourFormatDescriptor {
        token: "pg3",
        format: ColourFormat::PackedGreyscale3Bit,
        unit_length: 3,
        pack_length: 8,
        palette_size: 0,
    },
    ColourFormatDescriptor {
        token: "pg4",
        format: ColourFormat::PackedGreyscale4Bit,
        unit_length: 4,
        pack_length: 8,
        palette_size: 0,
    },
    ColourFormatDescriptor {
        token: "pc6",
        format: ColourFormat::PackedColour6Bit,
        unit_length: 6,
        pack_length: 8,
        palette_size: 0,
    },
    ColourFormatDescriptor {
        token: "c555r1",
        format: ColourFormat::Colour555,
        unit_length: 16,
        pack_length: 24,
        palette_size: 0,
    },
    ColourFormatDescriptor {
        token: "c555r2",
        format: ColourFormat::Colour555,
        unit_length: 16,
        pack_length: 32,
        palette_size: 0,
    },
    ColourFormatDescriptor {
        token: "c565r1",
        format: ColourFormat::Colour565,
        unit_length: 16,
        pack_length: 24,
        palette_size: 0,
    },
    ColourFormatDescriptor {
        token: "c565r2",
        format: ColourFormat::Colour565,
        unit_length: 16,
        pack_length: 32,
        palette_size: 0,
    },
    ColourFormatDescriptor {
        token: "c24r1",
        format: ColourFormat::ColourFull,
        unit_length: 24,
        pack_length: 32,
        palette_size: 0,
    },
    ColourFormatDescriptor {
        token: "c24r2",
        format: ColourFormat::ColourFull,
        unit_length: 24,
        pack_length: 40,
        palette_size: 0,
    },
];

pub fn colour_format(token: &str) -> Result<&'static ColourFormatDescriptor, FormatParseError> {
    COLOUR_FORMATS
        .iter()
        .find(|descriptor| descriptor.token == token)
        .ok_or_else(|| FormatParseError::UnknownColourFormat(token.to_string()))
}

/// Resolves a colour-format token and an optional palette-format token into
/// the pair the encoder consumes. Indexed colour formats require the palette
/// token; direct-colour formats ignore it.
pub fn resolve(
    colour_token: &str,
    palette_token: Option<&str>,
) -> Result<(&'static ColourFormatDescriptor, PaletteFormat), FormatParseError> {
    let descriptor = colour_format(colour_token)?;
    if !descriptor.format.is_indexed() {
        return Ok((descriptor, PaletteFormat::NoPalette));
    }
    match palette_token {
        Some(token) => Ok((descriptor, PaletteFormat::from_token(token)?)),
        None => Err(FormatParseError::MissingPaletteFormat(descriptor.token)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_token_resolves_to_itself() {
        for descriptor in &COLOUR_FORMATS {
            let found = colour_format(descriptor.token).unwrap();
            assert_eq!(found.format, descriptor.format);
            assert!(found.pack_length > found.unit_length);
        }
    }

    #[test]
    fn test_descriptor_unit_length_matches_format() {
        for descriptor in &COLOUR_FORMATS {
            assert_eq!(descriptor.unit_length, descriptor.format.unit_length());
        }
    }

    #[test]
    fn test_unknown_colour_token_rejected() {
        assert_eq!(
            colour_format("c999"),
            Err(FormatParseError::UnknownColourFormat("c999".to_string()))
        );
    }

    #[test]
    fn test_indexed_format_requires_palette_token() {
        assert_eq!(
            resolve("pi4", None),
            Err(FormatParseError::MissingPaletteFormat("pi4"))
        );
        let (descriptor, palette_format) = resolve("pi4", Some("c24")).unwrap();
        assert_eq!(descriptor.palette_size, 16);
        assert_eq!(palette_format, PaletteFormat::ColourFull);
    }

    #[test]
    fn test_direct_format_ignores_palette_token() {
        let (descriptor, palette_format) = resolve("c565r1", Some("c24")).unwrap();
        assert_eq!(descriptor.format, ColourFormat::Colour565);
        assert_eq!(palette_format, PaletteFormat::NoPalette);
    }

    #[test]
    fn test_unknown_palette_token_rejected() {
        assert_eq!(
            resolve("pi2", Some("g9")),
            Err(FormatParseError::UnknownPaletteFormat("g9".to_string()))
        );
    }

    #[test]
    fn test_wire_values_round_trip() {
        for descriptor in &COLOUR_FORMATS {
            let wire = descriptor.format as u32;
            assert_eq!(ColourFormat::from_wire(wire), Some(descriptor.format));
        }
        assert_eq!(ColourFormat::from_wire(0x3), None);
        for value in [0x0u32, 0x1, 0x2, 0x4, 0x8, 0x10, 0x20, 0x40, 0x80] {
            let format = PaletteFormat::from_wire(value).unwrap();
            assert_eq!(format as u32, value);
        }
        assert_eq!(PaletteFormat::from_wire(0x100), None);
    }
}
