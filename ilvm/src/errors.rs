//! VM invariant violations.
//!
//! These are never produced by correct IL, so they are not routed through
//! `ERRENT` the way a BASIC-level parse/runtime error is; they abort the
//! dispatch loop and propagate to the host.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VmFault {
    /// A stack-machine opcode popped an empty stack.
    StackUnderflow(&'static str),
    /// `CMPR` saw an operator code outside `0..=5`.
    BadComparisonOperator(i64),
    /// PC advanced past the end of the image without hitting a fatal exit.
    ProgramCounterOutOfRange(usize),
    /// `TAB` assumes a control stack at least three deep at the point it
    /// executes; the loaded IL violated that.
    TabDepthMismatch { depth: usize },
    /// A variable or array index resolved to a cell outside `vars`.
    BadVariableIndex(i64),
}

impl std::fmt::Display for VmFault {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            VmFault::StackUnderflow(stack) => write!(f, "{} underflow", stack),
            VmFault::BadComparisonOperator(code) => {
                write!(f, "CMPR operator code {} out of range 0..=5", code)
            }
            VmFault::ProgramCounterOutOfRange(pc) => {
                write!(f, "program counter {} out of range", pc)
            }
            VmFault::TabDepthMismatch { depth } => write!(
                f,
                "TAB expects a control stack at least 3 deep, found {}",
                depth
            ),
            VmFault::BadVariableIndex(index) => write!(f, "variable index {} out of range", index),
        }
    }
}

impl std::error::Error for VmFault {}
