use bimap::BiMap;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

// ----------------------------------------------------------------------------
// Opcode (bits 15..12)

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TryFromPrimitive, IntoPrimitive,
)]
#[repr(u8)]
pub enum OpCode {
    ALU = 0b0000,
    LW = 0b0001,
    SW = 0b0010,
    BEQ = 0b0011,
    J = 0b0100,
    ADDI = 0b0101,
    BNE = 0b0110,
    JR = 0b0111,
    JAL = 0b1000,
    DISPLAY = 0b1111,
}

impl OpCode {
    pub fn bits(self) -> u16 {
        u8::from(self) as u16
    }
}

// ----------------------------------------------------------------------------
// Funct (bits 2..0 of ALU ops)

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TryFromPrimitive, IntoPrimitive,
)]
#[repr(u8)]
pub enum Funct {
    AND = 0b000,
    OR = 0b001,
    ADD = 0b010,
    SUB = 0b110,
    SLT = 0b111,
}

impl Funct {
    pub fn bits(self) -> u16 {
        u8::from(self) as u16
    }
}

// ----------------------------------------------------------------------------
// Mnemonic

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum OpKind {
    Add,
    Sub,
    And,
    Or,
    Slt,
    Beq,
    Bne,
    Addi,
    Lw,
    Sw,
    J,
    Jal,
    Jr,
    Display,
}

static OP_STR: Lazy<BiMap<OpKind, &'static str>> = Lazy::new(|| {
    let mut map: BiMap<OpKind, &'static str> = BiMap::new();
    map.insert(OpKind::Add, "add");
    map.insert(OpKind::Sub, "sub");
    map.insert(OpKind::And, "and");
    map.insert(OpKind::Or, "or");
    map.insert(OpKind::Slt, "slt");
    map.insert(OpKind::Beq, "beq");
    map.insert(OpKind::Bne, "bne");
    map.insert(OpKind::Addi, "addi");
    map.insert(OpKind::Lw, "lw");
    map.insert(OpKind::Sw, "sw");
    map.insert(OpKind::J, "j");
    map.insert(OpKind::Jal, "jal");
    map.insert(OpKind::Jr, "jr");
    map.insert(OpKind::Display, "display");
    map
});

impl OpKind {
    pub fn parse(s: &str) -> Result<OpKind, String> {
        match OP_STR.get_by_right(s) {
            Some(kind) => Ok(*kind),
            None => Err(format!("Unknown Operation Name: `{}`", s)),
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        OP_STR.get_by_left(self).copied().unwrap_or("?")
    }

    /// Number of operand tokens the mnemonic takes.
    pub fn arity(&self) -> usize {
        use OpKind::*;
        match self {
            Add | Sub | And | Or | Slt | Beq | Bne | Addi => 3,
            Lw | Sw => 2,
            J | Jal | Jr => 1,
            Display => 0,
        }
    }
}
