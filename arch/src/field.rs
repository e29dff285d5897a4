//! Fixed-width bit fields.

/// Width of the addi immediate, memory offset, branch offset and data index.
pub const IMM_BITS: u32 = 6;
/// Width of the absolute jump target.
pub const ADDR_BITS: u32 = 12;

pub fn mask(width: u32) -> u16 {
    ((1u32 << width) - 1) as u16
}

pub fn fits_signed(v: i64, width: u32) -> bool {
    let half = 1i64 << (width - 1);
    (-half..half).contains(&v)
}

pub fn fits_unsigned(v: i64, width: u32) -> bool {
    (0..(1i64 << width)).contains(&v)
}

/// Two's-complement packing: `(1 << width) + v` for negative `v`, `v` otherwise,
/// kept to exactly `width` bits.
pub fn twos(v: i64, width: u32) -> u16 {
    let raw = if v < 0 { (1i64 << width) + v } else { v };
    raw as u16 & mask(width)
}

pub fn sign_extend(bits: u16, width: u32) -> i64 {
    let bits = (bits & mask(width)) as i64;
    if bits & (1 << (width - 1)) != 0 {
        bits - (1 << width)
    } else {
        bits
    }
}
