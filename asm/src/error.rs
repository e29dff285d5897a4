use thiserror::Error;

use crate::diag::Msg;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown operation: `{0}`")]
    UnknownOperation(String),

    #[error("`{0}` takes {1} operand(s), found {2}")]
    OperandCount(String, usize, usize),

    #[error("Cannot parse `{0}` as {1}")]
    ParseArgument(String, String),

    #[error("Value {value} does not fit in {field}")]
    OutOfRange { value: i64, field: &'static str },

    #[error("Undefined label: `{0}`")]
    UndefinedLabel(String),

    #[error("Undefined data label: `{0}`")]
    UndefinedData(String),

    #[error("Malformed data declaration: `{text}`")]
    MalformedData { line: usize, text: String },

    #[error("Re-defined data label: `{label}`")]
    RedefinedData { line: usize, label: String },

    #[error("Cannot parse data value `{0}` as a 16-bit word")]
    InvalidData(String),

    #[error("Error occurred assembling instruction {addr}: {cause}")]
    Instruction {
        addr: usize,
        line: usize,
        #[source]
        cause: Box<Error>,
    },

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read line")]
    FileRead(#[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Syntax,
    UnresolvedReference,
    Io,
}

impl Error {
    /// Attach the failing instruction's address and source line.
    pub fn at(self, addr: usize, line: usize) -> Error {
        Error::Instruction {
            addr,
            line,
            cause: Box::new(self),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Error::UnknownOperation(_)
            | Error::OperandCount(..)
            | Error::ParseArgument(..)
            | Error::OutOfRange { .. }
            | Error::MalformedData { .. }
            | Error::RedefinedData { .. }
            | Error::InvalidData(_) => ErrorClass::Syntax,
            Error::UndefinedLabel(_) | Error::UndefinedData(_) => ErrorClass::UnresolvedReference,
            Error::Instruction { cause, .. } => cause.class(),
            Error::FileOpen(..)
            | Error::FileRead(_)
            | Error::FileCreate(..)
            | Error::FileWrite(..) => ErrorClass::Io,
        }
    }

    /// 0-based instruction address, if the error came from the encoder.
    pub fn addr(&self) -> Option<usize> {
        match self {
            Error::Instruction { addr, .. } => Some(*addr),
            _ => None,
        }
    }

    /// 0-based source line, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Instruction { line, .. }
            | Error::MalformedData { line, .. }
            | Error::RedefinedData { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Print error with diagnostic information showing file location and line content
    pub fn print_diag(&self, file: &str, lines: &[String]) {
        match self.line() {
            Some(idx) => {
                let raw = lines.get(idx).map(|s| s.as_str()).unwrap_or("");
                Msg::Error(self.to_string()).diag(file, idx, raw);
            }
            None => Msg::Error(self.to_string()).print(),
        }
    }
}
