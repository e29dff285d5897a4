use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TryFromPrimitive,
    IntoPrimitive,
    Display,
)]
#[repr(u8)]
#[strum(serialize_all = "lowercase")]
pub enum Reg {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Reg {
    /// Parse a register token.
    ///
    /// Accepted shape: optional `$`, optional ASCII letters, then a single
    /// digit `0`-`7`. `$3`, `r3`, `$t3` and `$s3` all name register 3.
    pub fn parse(s: &str) -> Result<Self, String> {
        let body = s.strip_prefix('$').unwrap_or(s);
        let mut chars = body.chars();
        let digit = chars
            .next_back()
            .and_then(|c| c.to_digit(10))
            .ok_or(format!("Unknown reg name: {s}"))?;
        if !chars.as_str().chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!("Unknown reg name: {s}"));
        }
        Reg::try_from(digit as u8).map_err(|_| format!("Register out of range: {s}"))
    }

    /// 3-bit field value.
    pub fn bits(self) -> u16 {
        u8::from(self) as u16
    }
}
