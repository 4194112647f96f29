mod common;

use common::{colour_spread, grey_ramp, quantized_rgb, two_tone};
use lib_rlei::image::encoder::EncodingError;
use lib_rlei::image::format::FormatParseError;
use lib_rlei::image::palette::QuantizeError;
use lib_rlei::{decode, encode, resolve, UniqueColourQuantizer};

fn encode_with(
    token: &str,
    palette_token: Option<&str>,
    width: u16,
    height: u16,
    rgba: &[u8],
) -> Result<Vec<u8>, EncodingError> {
    let (descriptor, palette_format) = resolve(token, palette_token).unwrap();
    encode(
        width,
        height,
        rgba,
        descriptor,
        palette_format,
        &UniqueColourQuantizer,
    )
}

fn assert_round_trip(token: &str, palette_token: Option<&str>, width: u16, height: u16, rgba: &[u8]) {
    let encoded = encode_with(token, palette_token, width, height, rgba).unwrap();
    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded.width, width);
    assert_eq!(decoded.height, height);
    assert_eq!(decoded.rgba_data, rgba, "pixels changed through {}", token);
}

#[test]
fn test_round_trip_greyscale_formats() {
    // Fixture levels are exact for 4-bit grey; 1-bit needs pure black/white.
    assert_round_trip("pg4", None, 8, 4, &grey_ramp(8, 4));
    assert_round_trip("pg1", None, 8, 4, &two_tone(8, 4));
}

#[test]
fn test_round_trip_reduced_colour_formats() {
    assert_round_trip("pc3", None, 5, 3, &two_tone(5, 3));
    assert_round_trip("pc6", None, 10, 4, &quantized_rgb(10, 4));
}

#[test]
fn test_round_trip_true_colour_formats() {
    let rgba = colour_spread(12, 5);
    assert_round_trip("c24r1", None, 12, 5, &rgba);
    assert_round_trip("c24r2", None, 12, 5, &rgba);
}

#[test]
fn test_round_trip_16_bit_formats() {
    // 0, 123, 255 are fixed points of the 5-bit channel scale; 125 of the
    // 6-bit green scale.
    let mut rgba = Vec::new();
    for &[red, green, blue] in &[[0u8, 123, 255], [123, 123, 0], [255, 255, 255], [0, 0, 0]] {
        rgba.extend_from_slice(&[red, green, blue, 255]);
    }
    assert_round_trip("c555r1", None, 4, 1, &rgba);
    assert_round_trip("c555r2", None, 4, 1, &rgba);

    let mut rgba = Vec::new();
    for &[red, green, blue] in &[[0u8, 125, 255], [123, 0, 0], [255, 125, 123], [0, 0, 0]] {
        rgba.extend_from_slice(&[red, green, blue, 255]);
    }
    assert_round_trip("c565r1", None, 4, 1, &rgba);
    assert_round_trip("c565r2", None, 4, 1, &rgba);
}

#[test]
fn test_round_trip_indexed_formats() {
    assert_round_trip("pi1", Some("g2"), 8, 4, &two_tone(8, 4));
    assert_round_trip("pi2", Some("c24"), 6, 2, &two_tone(6, 2));
    assert_round_trip("pi4", Some("c24"), 10, 4, &quantized_rgb(10, 4));
    assert_round_trip("i8r1", Some("c24"), 16, 16, &colour_spread(16, 16));
    assert_round_trip("i8r2", Some("c24"), 16, 16, &colour_spread(16, 16));
}

#[test]
fn test_indexed_decode_exposes_palette() {
    let rgba = quantized_rgb(10, 4);
    let encoded = encode_with("pi4", Some("c24"), 10, 4, &rgba).unwrap();
    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded.palette.len(), 5);
    assert_eq!(decoded.palette[0], [255, 0, 0, 255]);
    assert_eq!(decoded.palette[4], [0, 0, 0, 255]);
}

#[test]
fn test_full_256_entry_palette_round_trip() {
    // All 256 colours unique: the header's one-byte entry count wraps to 0
    // and must still decode as a full palette.
    let rgba = colour_spread(16, 16);
    let encoded = encode_with("i8r1", Some("c24"), 16, 16, &rgba).unwrap();
    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded.palette.len(), 256);
    assert_eq!(decoded.rgba_data, rgba);
}

#[test]
fn test_direct_format_writes_no_palette() {
    let rgba = colour_spread(4, 2);
    let encoded = encode_with("c565r1", None, 4, 2, &rgba).unwrap();

    // Header bytes: palette entry count, palette byte count, palette format.
    assert_eq!(encoded[26], 0);
    assert_eq!(encoded[28..30], [0, 0]);
    assert_eq!(encoded[32..36], [0, 0, 0, 0]);

    let decoded = decode(&encoded).unwrap();
    assert!(decoded.palette.is_empty());
}

#[test]
fn test_empty_image_rejected() {
    let result = encode_with("pg1", None, 0, 4, &[]);
    assert!(matches!(result, Err(EncodingError::EmptyImage)));
    let result = encode_with("pg1", None, 4, 0, &[]);
    assert!(matches!(result, Err(EncodingError::EmptyImage)));
}

#[test]
fn test_pixel_buffer_length_must_match_dimensions() {
    let result = encode_with("pg1", None, 2, 2, &[0; 12]);
    assert!(matches!(
        result,
        Err(EncodingError::InvalidPixelDataLength {
            expected: 16,
            actual: 12,
            ..
        })
    ));
}

#[test]
fn test_indexed_format_without_palette_format_rejected() {
    assert_eq!(
        resolve("pi4", None),
        Err(FormatParseError::MissingPaletteFormat("pi4"))
    );
}

#[test]
fn test_too_many_unique_colours_rejected() {
    // 17 unique colours cannot fit a pi4 palette.
    let mut rgba = Vec::new();
    for i in 0..17u8 {
        rgba.extend_from_slice(&[i, 0, 0, 255]);
    }
    let result = encode_with("pi4", Some("c24"), 17, 1, &rgba);
    assert!(matches!(
        result,
        Err(EncodingError::Quantization(QuantizeError::PaletteOverflow {
            max: 16
        }))
    ));
}

#[test]
fn test_greyscale_format_rejects_colour_pixels() {
    let rgba = [255u8, 0, 0, 255];
    let result = encode_with("pg2", None, 1, 1, &rgba);
    assert!(matches!(result, Err(EncodingError::NotGreyscale(_))));
}

#[test]
fn test_greyscale_palette_rejects_colour_entries() {
    let rgba = [255u8, 0, 0, 255, 0, 0, 0, 255];
    let result = encode_with("pi1", Some("g4"), 2, 1, &rgba);
    assert!(matches!(result, Err(EncodingError::NotGreyscale(_))));
}
