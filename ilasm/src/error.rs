//! `ilasm::Error`: the load-time error tier. Folds a grammar-level
//! `pest::error::Error` and the assembler's own semantic errors into one
//! enum rather than keeping them as separate types, since IL opcodes
//! carry enough semantic validation (operand counts, numeric ranges) that
//! a single `Display` impl reads better than two.

use crate::parser::Rule;
use ilvm::image::BuildError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The line doesn't match `[LABEL:] [OPCODE [OPERAND1[,OPERAND2]]]`.
    Grammar {
        line: usize,
        source: Box<pest::error::Error<Rule>>,
    },
    /// An identifier in opcode position isn't one of the opcodes this
    /// loader knows.
    UnknownOpcode { line: usize, opcode: String },
    /// An opcode that requires an operand (a dest label, a literal, a
    /// numeric argument) didn't get one.
    MissingOperand {
        line: usize,
        opcode: String,
        index: usize,
    },
    /// An operand was present but couldn't be interpreted the way the
    /// opcode needs it (e.g. `LIT` with a non-numeric operand).
    InvalidOperand {
        line: usize,
        opcode: String,
        operand: String,
    },
    /// Label table errors from `ilvm::ImageBuilder::finish` (duplicate
    /// label, reference to an undefined label, missing `CO`/`XEC`/`ERRENT`).
    Build(BuildError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Grammar { line, source } => write!(f, "line {}: {}", line, source),
            Error::UnknownOpcode { line, opcode } => {
                write!(f, "line {}: unknown opcode {:?}", line, opcode)
            }
            Error::MissingOperand {
                line,
                opcode,
                index,
            } => write!(
                f,
                "line {}: {} is missing operand {}",
                line,
                opcode,
                index + 1
            ),
            Error::InvalidOperand {
                line,
                opcode,
                operand,
            } => write!(
                f,
                "line {}: {} can't use {:?} as an operand",
                line, opcode, operand
            ),
            Error::Build(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<BuildError> for Error {
    fn from(err: BuildError) -> Error {
        Error::Build(err)
    }
}
