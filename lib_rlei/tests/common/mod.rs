#![allow(dead_code)]

//! Deterministic pixel fixtures. Colour values sit on exact quantization
//! levels of the format under test, so lossy formats round-trip bit-exactly.

/// Grey ramp cycling through the sixteen 4-bit grey levels (0, 17, .. 255).
pub fn grey_ramp(width: u16, height: u16) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(usize::from(width) * usize::from(height) * 4);
    for i in 0..usize::from(width) * usize::from(height) {
        let level = ((i % 16) * 17) as u8;
        rgba.extend_from_slice(&[level, level, level, 255]);
    }
    rgba
}

/// Black and white in alternating two-pixel runs.
pub fn two_tone(width: u16, height: u16) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(usize::from(width) * usize::from(height) * 4);
    for i in 0..usize::from(width) * usize::from(height) {
        let level = if (i / 2) % 2 == 0 { 0 } else { 255 };
        rgba.extend_from_slice(&[level, level, level, 255]);
    }
    rgba
}

/// A handful of saturated colours on exact 2-bit-per-channel levels.
pub fn quantized_rgb(width: u16, height: u16) -> Vec<u8> {
    const COLOURS: [[u8; 3]; 5] = [
        [255, 0, 0],
        [0, 170, 85],
        [85, 85, 255],
        [255, 255, 255],
        [0, 0, 0],
    ];
    let mut rgba = Vec::with_capacity(usize::from(width) * usize::from(height) * 4);
    for i in 0..usize::from(width) * usize::from(height) {
        let [red, green, blue] = COLOURS[i % COLOURS.len()];
        rgba.extend_from_slice(&[red, green, blue, 255]);
    }
    rgba
}

/// 256 distinct colours, one per pixel index (wraps after 256 pixels).
pub fn colour_spread(width: u16, height: u16) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(usize::from(width) * usize::from(height) * 4);
    for i in 0..usize::from(width) * usize::from(height) {
        let p = (i % 256) as u8;
        rgba.extend_from_slice(&[p, p.wrapping_mul(3), 255 - p, 255]);
    }
    rgba
}
