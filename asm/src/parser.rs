use arch::{
    field::{self, ADDR_BITS, IMM_BITS},
    inst::Inst,
    op::OpKind,
    reg::Reg,
};

use crate::{data::DataTable, error::Error, label::Labels};

// ----------------------------------------------------------------------------
// Operation

/// Instruction with validated operand shapes and unresolved symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code {
    ADD(Reg, Reg, Reg),
    SUB(Reg, Reg, Reg),
    AND(Reg, Reg, Reg),
    OR(Reg, Reg, Reg),
    SLT(Reg, Reg, Reg),
    BEQ(Reg, Reg, String),
    BNE(Reg, Reg, String),
    ADDI(Reg, Reg, Imm),
    LW(Reg, Mem),
    SW(Reg, Mem),
    J(String),
    JAL(String),
    JR(Reg),
    DISPLAY(),
}

/// Memory operand of `lw` / `sw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mem {
    /// `imm(rs)`
    Offset(Imm, Reg),
    /// data label
    Data(String),
}

pub type Imm = i64;

pub fn tokenize(code: &str) -> Vec<&str> {
    code.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Code {
    pub fn parse(code: &str) -> Result<Code, Error> {
        let words = tokenize(code);
        let (op, args) = words
            .split_first()
            .ok_or_else(|| Error::UnknownOperation(code.to_string()))?;

        let kind = OpKind::parse(op).map_err(|_| Error::UnknownOperation(op.to_string()))?;
        if args.len() != kind.arity() {
            return Err(Error::OperandCount(op.to_string(), kind.arity(), args.len()));
        }

        // Get argument by index and parse as Type
        // Example: arg!(0, Reg) -> Reg
        macro_rules! arg {
            ($index:expr, $Type:ident) => {{
                let arg = args[$index];
                $Type::parse(arg).ok_or(Error::ParseArgument(
                    arg.to_string(),
                    stringify!($Type).to_string(),
                ))?
            }};
        }

        let code = match kind {
            OpKind::Add => Code::ADD(arg!(0, Register), arg!(1, Register), arg!(2, Register)),
            OpKind::Sub => Code::SUB(arg!(0, Register), arg!(1, Register), arg!(2, Register)),
            OpKind::And => Code::AND(arg!(0, Register), arg!(1, Register), arg!(2, Register)),
            OpKind::Or => Code::OR(arg!(0, Register), arg!(1, Register), arg!(2, Register)),
            OpKind::Slt => Code::SLT(arg!(0, Register), arg!(1, Register), arg!(2, Register)),
            OpKind::Beq => Code::BEQ(arg!(0, Register), arg!(1, Register), arg!(2, Symbol)),
            OpKind::Bne => Code::BNE(arg!(0, Register), arg!(1, Register), arg!(2, Symbol)),
            OpKind::Addi => Code::ADDI(arg!(0, Register), arg!(1, Register), arg!(2, Immediate)),
            OpKind::Lw => Code::LW(arg!(0, Register), arg!(1, Memory)),
            OpKind::Sw => Code::SW(arg!(0, Register), arg!(1, Memory)),
            OpKind::J => Code::J(arg!(0, Symbol)),
            OpKind::Jal => Code::JAL(arg!(0, Symbol)),
            OpKind::Jr => Code::JR(arg!(0, Register)),
            OpKind::Display => Code::DISPLAY(),
        };
        Ok(code)
    }
}

impl Code {
    /// Resolve symbols for the instruction at `addr` and range-check fields.
    pub fn resolve(&self, addr: usize, labels: &Labels, data: &DataTable) -> Result<Inst, Error> {
        let branch = |target: &str| -> Result<i8, Error> {
            let dest = labels
                .get(target)
                .ok_or_else(|| Error::UndefinedLabel(target.to_string()))?;
            // relative to the instruction after the branch
            let off = dest as i64 - addr as i64 - 1;
            signed(off, "6-bit branch offset")
        };
        let jump = |target: &str| -> Result<u16, Error> {
            let dest = labels
                .get(target)
                .ok_or_else(|| Error::UndefinedLabel(target.to_string()))?;
            if !field::fits_unsigned(dest as i64, ADDR_BITS) {
                return Err(Error::OutOfRange {
                    value: dest as i64,
                    field: "12-bit jump target",
                });
            }
            Ok(dest as u16)
        };
        let memory = |rt: Reg,
                      mem: &Mem,
                      offset: fn(Reg, Reg, i8) -> Inst,
                      direct: fn(Reg, u8) -> Inst|
         -> Result<Inst, Error> {
            match mem {
                Mem::Offset(imm, rs) => Ok(offset(rt, *rs, signed(*imm, "6-bit memory offset")?)),
                Mem::Data(name) => {
                    let idx = data
                        .get(name)
                        .ok_or_else(|| Error::UndefinedData(name.to_string()))?;
                    if !field::fits_unsigned(idx as i64, IMM_BITS) {
                        return Err(Error::OutOfRange {
                            value: idx as i64,
                            field: "6-bit data index",
                        });
                    }
                    Ok(direct(rt, idx as u8))
                }
            }
        };

        match self {
            Code::ADD(rd, rs, rt) => Ok(Inst::ADD(*rd, *rs, *rt)),
            Code::SUB(rd, rs, rt) => Ok(Inst::SUB(*rd, *rs, *rt)),
            Code::AND(rd, rs, rt) => Ok(Inst::AND(*rd, *rs, *rt)),
            Code::OR(rd, rs, rt) => Ok(Inst::OR(*rd, *rs, *rt)),
            Code::SLT(rd, rs, rt) => Ok(Inst::SLT(*rd, *rs, *rt)),
            Code::BEQ(rd, rs, label) => Ok(Inst::BEQ(*rd, *rs, branch(label)?)),
            Code::BNE(rd, rs, label) => Ok(Inst::BNE(*rd, *rs, branch(label)?)),
            Code::ADDI(rd, rs, imm) => Ok(Inst::ADDI(*rd, *rs, signed(*imm, "6-bit immediate")?)),
            Code::LW(rt, mem) => memory(*rt, mem, Inst::LW, Inst::LWD),
            Code::SW(rt, mem) => memory(*rt, mem, Inst::SW, Inst::SWD),
            Code::J(label) => Ok(Inst::J(jump(label)?)),
            Code::JAL(label) => Ok(Inst::JAL(jump(label)?)),
            Code::JR(rs) => Ok(Inst::JR(*rs)),
            Code::DISPLAY() => Ok(Inst::DISPLAY()),
        }
    }
}

fn signed(v: Imm, name: &'static str) -> Result<i8, Error> {
    if field::fits_signed(v, IMM_BITS) {
        Ok(v as i8)
    } else {
        Err(Error::OutOfRange { value: v, field: name })
    }
}

// ----------------------------------------------------------------------------
// Operand parsers

struct Register;

impl Register {
    fn parse(s: &str) -> Option<Reg> {
        Reg::parse(s).ok()
    }
}

struct Immediate;

impl Immediate {
    fn parse(s: &str) -> Option<Imm> {
        let (neg, body) = match s.strip_prefix('-') {
            Some(body) => (true, body),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let v = parse_with_prefix(body)?;
        Some(if neg { -v } else { v })
    }
}

struct Symbol;

impl Symbol {
    /// Any name a `label:` or data declaration can define.
    fn parse(s: &str) -> Option<String> {
        let valid = s
            .chars()
            .all(|c| !c.is_whitespace() && !matches!(c, ',' | '(' | ')' | ':'));
        (valid && !s.is_empty()).then(|| s.to_string())
    }
}

struct Memory;

impl Memory {
    fn parse(s: &str) -> Option<Mem> {
        match s.split_once('(') {
            Some((imm, rest)) => {
                let reg = rest.strip_suffix(')')?;
                Some(Mem::Offset(Immediate::parse(imm)?, Register::parse(reg)?))
            }
            None => Symbol::parse(s).map(Mem::Data),
        }
    }
}

fn parse_with_prefix(s: &str) -> Option<Imm> {
    let (radix, num) = match s.get(0..2) {
        Some("0b") => (2, &s[2..]),
        Some("0o") => (8, &s[2..]),
        Some("0x") => (16, &s[2..]),
        _ => (10, s),
    };
    if num.is_empty() || !num.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    Imm::from_str_radix(num, radix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::DataSection, data::DuplicatePolicy, preprocess::preprocess};

    macro_rules! test_parse {
        ($($name:ident: $src:expr => $code:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(Code::parse($src).unwrap(), $code);
                }
            )*
        }
    }

    test_parse! {
        parse_add: "add $3, $1, $2" => Code::ADD(Reg::R3, Reg::R1, Reg::R2),
        parse_slt_no_commas: "slt r1 r2 r3" => Code::SLT(Reg::R1, Reg::R2, Reg::R3),
        parse_beq: "beq $t0,$t1,L" => Code::BEQ(Reg::R0, Reg::R1, "L".into()),
        parse_addi_neg: "addi $1, $2, -5" => Code::ADDI(Reg::R1, Reg::R2, -5),
        parse_addi_hex: "addi $1, $2, 0x1f" => Code::ADDI(Reg::R1, Reg::R2, 31),
        parse_lw_offset: "lw $1, 4($2)" => Code::LW(Reg::R1, Mem::Offset(4, Reg::R2)),
        parse_sw_neg_offset: "sw $1, -2($t7)" => Code::SW(Reg::R1, Mem::Offset(-2, Reg::R7)),
        parse_lw_data: "lw $t0, x" => Code::LW(Reg::R0, Mem::Data("x".into())),
        parse_j: "j main" => Code::J("main".into()),
        parse_jal: "jal func_1" => Code::JAL("func_1".into()),
        parse_j_dashed: "j my-loop" => Code::J("my-loop".into()),
        parse_lw_dashed_data: "lw $1, my-var" => Code::LW(Reg::R1, Mem::Data("my-var".into())),
        parse_jr: "jr $7" => Code::JR(Reg::R7),
        parse_display: "display" => Code::DISPLAY(),
    }

    #[test]
    fn unknown_operation() {
        assert!(matches!(Code::parse("mul $1, $2, $3"), Err(Error::UnknownOperation(op)) if op == "mul"));
    }

    #[test]
    fn wrong_operand_count() {
        assert!(matches!(Code::parse("add $1, $2"), Err(Error::OperandCount(_, 3, 2))));
        assert!(matches!(Code::parse("lw $1, 4($2), $3"), Err(Error::OperandCount(_, 2, 3))));
        assert!(matches!(Code::parse("display $1"), Err(Error::OperandCount(_, 0, 1))));
        assert!(matches!(Code::parse("jr"), Err(Error::OperandCount(_, 1, 0))));
    }

    #[test]
    fn malformed_operands() {
        for src in [
            "add $9, $1, $2",
            "add $, $1, $2",
            "jr x",
            "addi $1, $2, five",
            "lw $1, 4($2",
            "lw $1, ($2)",
            "lw $1, x)",
            "j a:b",
        ] {
            assert!(matches!(Code::parse(src), Err(Error::ParseArgument(..))), "{}", src);
        }
    }

    fn tables(src: &[&str]) -> (Labels, DataTable) {
        let (section, text, _) = DataSection::extract(preprocess(src), DuplicatePolicy::Overwrite).unwrap();
        let (labels, _, _) = Labels::collect(text);
        (labels, section.table)
    }

    #[test]
    fn forward_branch_offset() {
        let (labels, data) = tables(&[
            ".text", "display", "display", "display", "display", "display", "L:", "display",
        ]);
        let inst = Code::parse("beq $t0,$t1,L").unwrap().resolve(2, &labels, &data).unwrap();
        assert_eq!(inst, Inst::BEQ(Reg::R0, Reg::R1, 2));
        assert_eq!(inst.to_bin() & 0b111111, 0b000010);
    }

    #[test]
    fn backward_branch_offset() {
        let (labels, data) = tables(&[".text", "top:", "display", "display"]);
        let inst = Code::parse("bne $1, $2, top").unwrap().resolve(1, &labels, &data).unwrap();
        assert_eq!(inst, Inst::BNE(Reg::R1, Reg::R2, -2));
    }

    #[test]
    fn direct_data_index() {
        let (labels, data) = tables(&[".data", "x: 3", "y: 7", ".text", "lw $t0, x"]);
        let inst = Code::parse("lw $t0, y").unwrap().resolve(0, &labels, &data).unwrap();
        assert_eq!(inst, Inst::LWD(Reg::R0, 1));
        let inst = Code::parse("lw $t0, x").unwrap().resolve(0, &labels, &data).unwrap();
        assert_eq!(inst.to_bin() & 0b111111, 0b000000);
    }

    #[test]
    fn unresolved_references() {
        let (labels, data) = tables(&[".text", "display"]);
        let err = Code::parse("j nowhere").unwrap().resolve(0, &labels, &data).unwrap_err();
        assert!(matches!(err, Error::UndefinedLabel(l) if l == "nowhere"));
        let err = Code::parse("sw $1, missing").unwrap().resolve(0, &labels, &data).unwrap_err();
        assert!(matches!(err, Error::UndefinedData(l) if l == "missing"));
    }

    #[test]
    fn immediate_ranges() {
        let (labels, data) = tables(&[".text"]);
        let resolve = |src: &str| Code::parse(src).unwrap().resolve(0, &labels, &data);
        assert_eq!(resolve("addi $1, $1, 31").unwrap(), Inst::ADDI(Reg::R1, Reg::R1, 31));
        assert_eq!(resolve("addi $1, $1, -32").unwrap(), Inst::ADDI(Reg::R1, Reg::R1, -32));
        assert!(matches!(resolve("addi $1, $1, 32"), Err(Error::OutOfRange { value: 32, .. })));
        assert!(matches!(resolve("lw $1, -33($2)"), Err(Error::OutOfRange { value: -33, .. })));
    }

    #[test]
    fn tokenize_commas_and_spaces() {
        assert_eq!(tokenize("beq $t0,$t1,  L"), vec!["beq", "$t0", "$t1", "L"]);
        assert_eq!(tokenize("add\t$1 ,$2,$3"), vec!["add", "$1", "$2", "$3"]);
    }
}
