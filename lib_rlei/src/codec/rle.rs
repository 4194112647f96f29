use thiserror::Error;

use super::bits::{BitPacker, BitReader, OutOfData};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RleEncodeError {
    #[error("invalid packing: pack length {pack_length} leaves no run-count space over unit length {unit_length}")]
    InvalidPacking { unit_length: u8, pack_length: u8 },
    #[error("unsupported unit length {0}: symbols are 1 to 24 bits wide")]
    UnsupportedUnitLength(u8),
    #[error("empty symbol sequence")]
    EmptyInput,
    #[error("symbol {symbol:#x} does not fit in {unit_length} bits")]
    SymbolTooWide { symbol: u32, unit_length: u8 },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RleDecodeError {
    #[error("invalid packing: pack length {pack_length} leaves no run-count space over unit length {unit_length}")]
    InvalidPacking { unit_length: u8, pack_length: u8 },
    #[error("unsupported unit length {0}: symbols are 1 to 24 bits wide")]
    UnsupportedUnitLength(u8),
    #[error("run unit truncated")]
    Truncated(#[from] OutOfData),
    #[error("run count of zero in run unit #{unit}")]
    ZeroRunCount { unit: usize },
    #[error("run of {count} overruns the expected total of {expected} symbols")]
    SymbolOverrun { count: u32, expected: usize },
}

// Run counts travel through a u32, so the count field is capped at 32 bits.
fn check_packing(unit_length: u8, pack_length: u8) -> Result<(u32, u32), (u8, u8)> {
    if unit_length == 0 || unit_length > 24 {
        return Err((unit_length, pack_length));
    }
    if pack_length <= unit_length || pack_length - unit_length > 32 {
        return Err((unit_length, pack_length));
    }
    let packing_space = u32::from(pack_length - unit_length);
    Ok((packing_space, ((1u64 << packing_space) - 1) as u32))
}

/// Run-length encodes `symbols` (each `unit_length` bits wide) into a
/// bitstream of (symbol, count) units, `pack_length` bits each. A run longer
/// than the count field can hold is split into consecutive units, all but the
/// last holding the maximum count.
pub fn run_length_encode(
    symbols: &[u32],
    unit_length: u8,
    pack_length: u8,
) -> Result<BitPacker, RleEncodeError> {
    let (packing_space, max_run) = check_packing(unit_length, pack_length).map_err(|_| {
        if unit_length == 0 || unit_length > 24 {
            RleEncodeError::UnsupportedUnitLength(unit_length)
        } else {
            RleEncodeError::InvalidPacking {
                unit_length,
                pack_length,
            }
        }
    })?;

    let Some((&first, rest)) = symbols.split_first() else {
        return Err(RleEncodeError::EmptyInput);
    };

    let mut out = BitPacker::new();
    let mut current = first;
    let mut run: u32 = 1;
    for &symbol in rest {
        if symbol == current {
            run += 1;
        } else {
            push_run(&mut out, current, run, unit_length, packing_space, max_run)?;
            current = symbol;
            run = 1;
        }
    }
    push_run(&mut out, current, run, unit_length, packing_space, max_run)?;
    Ok(out)
}

fn push_run(
    out: &mut BitPacker,
    symbol: u32,
    mut run: u32,
    unit_length: u8,
    packing_space: u32,
    max_run: u32,
) -> Result<(), RleEncodeError> {
    if symbol >> unit_length != 0 {
        return Err(RleEncodeError::SymbolTooWide {
            symbol,
            unit_length,
        });
    }
    while run > max_run {
        out.push_bits(symbol, u32::from(unit_length));
        out.push_bits(max_run, packing_space);
        run -= max_run;
    }
    out.push_bits(symbol, u32::from(unit_length));
    out.push_bits(run, packing_space);
    Ok(())
}

/// Decodes exactly `expected_symbols` symbols from `data`. The stream carries
/// no end marker: decoding stops at the expected count so trailing pad bits
/// are never misread as another run unit.
pub fn run_length_decode(
    data: &[u8],
    unit_length: u8,
    pack_length: u8,
    expected_symbols: usize,
) -> Result<Vec<u32>, RleDecodeError> {
    let (packing_space, _) = check_packing(unit_length, pack_length).map_err(|_| {
        if unit_length == 0 || unit_length > 24 {
            RleDecodeError::UnsupportedUnitLength(unit_length)
        } else {
            RleDecodeError::InvalidPacking {
                unit_length,
                pack_length,
            }
        }
    })?;

    let mut reader = BitReader::new(data);
    let mut decoded = Vec::with_capacity(expected_symbols);
    let mut unit = 0usize;
    while decoded.len() < expected_symbols {
        let symbol = reader.read_bits(u32::from(unit_length))?;
        let count = reader.read_bits(packing_space)?;
        if count == 0 {
            return Err(RleDecodeError::ZeroRunCount { unit });
        }
        if decoded.len() + count as usize > expected_symbols {
            return Err(RleDecodeError::SymbolOverrun {
                count,
                expected: expected_symbols,
            });
        }
        decoded.extend(std::iter::repeat(symbol).take(count as usize));
        unit += 1;
    }
    Ok(decoded)
}
