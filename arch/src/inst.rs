use crate::{
    field::{self, ADDR_BITS, IMM_BITS},
    op::{Funct, OpCode},
    reg::Reg,
};

use color_print::cformat;
use serde::{Deserialize, Serialize};

/// One fully resolved machine instruction.
///
/// Operand order follows the assembly syntax, not the bit layout:
/// `add rd, rs, rt` is `ADD(rd, rs, rt)`, `lw rt, off(rs)` is `LW(rt, rs, off)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Inst {
    ADD(Reg, Reg, Reg),
    SUB(Reg, Reg, Reg),
    AND(Reg, Reg, Reg),
    OR(Reg, Reg, Reg),
    SLT(Reg, Reg, Reg),

    BEQ(Reg, Reg, i8),
    BNE(Reg, Reg, i8),
    ADDI(Reg, Reg, i8),

    LW(Reg, Reg, i8),
    SW(Reg, Reg, i8),
    // Direct data access: base field is zero, index is unsigned
    LWD(Reg, u8),
    SWD(Reg, u8),

    J(u16),
    JAL(u16),
    JR(Reg),
    DISPLAY(),
}

// opcode(4) a(3) b(3) imm(6)
fn rri(op: OpCode, a: Reg, b: Reg, imm: u16) -> u16 {
    op.bits() << 12 | a.bits() << 9 | b.bits() << 6 | imm & field::mask(IMM_BITS)
}

// opcode(4) rs(3) rt(3) rd(3) funct(3)
fn rrr(funct: Funct, rd: Reg, rs: Reg, rt: Reg) -> u16 {
    OpCode::ALU.bits() << 12 | rs.bits() << 9 | rt.bits() << 6 | rd.bits() << 3 | funct.bits()
}

// opcode(4) addr(12)
fn jmp(op: OpCode, addr: u16) -> u16 {
    op.bits() << 12 | addr & field::mask(ADDR_BITS)
}

impl Inst {
    pub fn to_bin(&self) -> u16 {
        let imm = |v: i8| field::twos(v as i64, IMM_BITS);
        match *self {
            Inst::ADD(rd, rs, rt) => rrr(Funct::ADD, rd, rs, rt),
            Inst::SUB(rd, rs, rt) => rrr(Funct::SUB, rd, rs, rt),
            Inst::AND(rd, rs, rt) => rrr(Funct::AND, rd, rs, rt),
            Inst::OR(rd, rs, rt) => rrr(Funct::OR, rd, rs, rt),
            Inst::SLT(rd, rs, rt) => rrr(Funct::SLT, rd, rs, rt),

            Inst::BEQ(rd, rs, off) => rri(OpCode::BEQ, rs, rd, imm(off)),
            Inst::BNE(rd, rs, off) => rri(OpCode::BNE, rs, rd, imm(off)),
            Inst::ADDI(rd, rs, v) => rri(OpCode::ADDI, rs, rd, imm(v)),

            Inst::LW(rt, rs, off) => rri(OpCode::LW, rs, rt, imm(off)),
            Inst::SW(rt, rs, off) => rri(OpCode::SW, rs, rt, imm(off)),
            Inst::LWD(rt, idx) => rri(OpCode::LW, Reg::R0, rt, idx as u16),
            Inst::SWD(rt, idx) => rri(OpCode::SW, Reg::R0, rt, idx as u16),

            Inst::J(addr) => jmp(OpCode::J, addr),
            Inst::JAL(addr) => jmp(OpCode::JAL, addr),
            Inst::JR(rs) => OpCode::JR.bits() << 12 | rs.bits() << 9,
            Inst::DISPLAY() => OpCode::DISPLAY.bits() << 12,
        }
    }

    /// Decode a word back into an instruction.
    ///
    /// Memory accesses whose base field is zero decode to the direct form, so
    /// `lw rt, off($0)` comes back as `LWD`. Words with an unassigned opcode
    /// or funct give `None`.
    pub fn from_bin(bin: u16) -> Option<Inst> {
        let op = OpCode::try_from((bin >> 12) as u8).ok()?;
        let reg = |shift: u16| Reg::try_from(((bin >> shift) & 0b111) as u8).ok();
        let (a, b, c) = (reg(9)?, reg(6)?, reg(3)?);
        let imm6 = bin & field::mask(IMM_BITS);
        let off = field::sign_extend(imm6, IMM_BITS) as i8;

        let inst = match op {
            OpCode::ALU => match Funct::try_from((bin & 0b111) as u8).ok()? {
                Funct::ADD => Inst::ADD(c, a, b),
                Funct::SUB => Inst::SUB(c, a, b),
                Funct::AND => Inst::AND(c, a, b),
                Funct::OR => Inst::OR(c, a, b),
                Funct::SLT => Inst::SLT(c, a, b),
            },
            OpCode::BEQ => Inst::BEQ(b, a, off),
            OpCode::BNE => Inst::BNE(b, a, off),
            OpCode::ADDI => Inst::ADDI(b, a, off),
            OpCode::LW => match a {
                Reg::R0 => Inst::LWD(b, imm6 as u8),
                _ => Inst::LW(b, a, off),
            },
            OpCode::SW => match a {
                Reg::R0 => Inst::SWD(b, imm6 as u8),
                _ => Inst::SW(b, a, off),
            },
            OpCode::J => Inst::J(bin & field::mask(ADDR_BITS)),
            OpCode::JAL => Inst::JAL(bin & field::mask(ADDR_BITS)),
            OpCode::JR => Inst::JR(a),
            OpCode::DISPLAY => Inst::DISPLAY(),
        };
        Some(inst)
    }
}

impl Inst {
    pub fn cformat(&self) -> String {
        macro_rules! rrr {
            ($name:expr, $a:expr, $b:expr, $c:expr) => {
                cformat!("<r>{:<8}</><b>{:<3} {:<3} {:<3}</>", $name, $a, $b, $c)
            };
        }

        macro_rules! rri {
            ($name:expr, $a:expr, $b:expr, $imm:expr) => {
                cformat!("<r>{:<8}</><b>{:<3} {:<3} <y>{}</></>", $name, $a, $b, $imm)
            };
        }

        match self {
            Inst::ADD(rd, rs, rt) => rrr!("add", rd, rs, rt),
            Inst::SUB(rd, rs, rt) => rrr!("sub", rd, rs, rt),
            Inst::AND(rd, rs, rt) => rrr!("and", rd, rs, rt),
            Inst::OR(rd, rs, rt) => rrr!("or", rd, rs, rt),
            Inst::SLT(rd, rs, rt) => rrr!("slt", rd, rs, rt),
            Inst::BEQ(rd, rs, off) => rri!("beq", rd, rs, format!("{:+}", off)),
            Inst::BNE(rd, rs, off) => rri!("bne", rd, rs, format!("{:+}", off)),
            Inst::ADDI(rd, rs, imm) => rri!("addi", rd, rs, imm),
            Inst::LW(rt, rs, off) => rri!("lw", rt, rs, off),
            Inst::SW(rt, rs, off) => rri!("sw", rt, rs, off),
            Inst::LWD(rt, idx) => rri!("lw", rt, "", format!("[{}]", idx)),
            Inst::SWD(rt, idx) => rri!("sw", rt, "", format!("[{}]", idx)),
            Inst::J(addr) => rri!("j", "", "", format!("0x{:03X}", addr)),
            Inst::JAL(addr) => rri!("jal", "", "", format!("0x{:03X}", addr)),
            Inst::JR(rs) => rrr!("jr", rs, "", ""),
            Inst::DISPLAY() => rrr!("display", "", "", ""),
        }
    }
}
