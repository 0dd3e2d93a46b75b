//! The typed, immutable IL image and the builder `ilasm` uses to produce it.
//!
//! Opcodes are a tagged variant with operands normalized at load time, and
//! the "branch-to-self means exhausted alternatives" convention is resolved
//! once, here, rather than re-derived on every failed match. [`Instruction`]
//! is the tagged variant, and [`Branch`] is the precomputed alternative.

use crate::{Cell, LabelName};
use std::collections::HashMap;

/// Where a parse opcode goes when its match fails.
///
/// `Fail` is the "branch target is this very instruction" case: the chain
/// of alternatives is exhausted and a syntax error is the only option left.
/// `To` is an ordinary alternative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Branch {
    Fail,
    To(usize),
}

/// One IL instruction with its operands normalized to Rust types.
///
/// Unlabeled variants (`Add`, `Rtn`, ...) carry no payload at all; the
/// PC simply advances past them on fetch.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    // --- Parse opcodes ---
    Tst { dest: Branch, text: String },
    TstNum { dest: Branch },
    TstVar { dest: Branch },
    TstLineNum { dest: Branch },
    /// TBX only.
    TstArrayVar { dest: Branch },
    /// TBX only.
    TstFuncName { dest: Branch },

    // --- Evaluator opcodes ---
    Lit(Cell),
    Ind,
    Store,
    Add,
    Sub,
    Mpy,
    Div,
    Neg,
    Cmpr,
    /// TBX only.
    Random,

    // --- Flow-control opcodes ---
    ICall(usize),
    Rtn,
    IJmp(usize),
    Xfer,
    Sav,
    Rstr,
    Fin,
    Nxt,
    /// TBX only.
    NxtX,
    Done,

    // --- Program store opcodes ---
    Insrt,
    Lst,
    List0,
    List1,
    List2,
    Init,
    XInit,

    // --- Array opcodes (TBX only) ---
    Dim1,
    Dim2,
    Array1,
    Array2,

    // --- Host I/O opcodes ---
    GetLn,
    InNum,
    Prn,
    Prs,
    Spc,
    /// TBX only.
    SpcOne,
    NLine,
    /// TBX only.
    Tab,

    /// TBX numbered error: prints the canonical message for `code` and
    /// transfers to `ERRENT`.
    Err(u8),
}

/// The immutable, ordered IL program plus its label table.
#[derive(Clone, Debug)]
pub struct Image {
    instructions: Vec<Instruction>,
    labels: HashMap<LabelName, usize>,
}

impl Image {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, pc: usize) -> Option<&Instruction> {
        self.instructions.get(pc)
    }

    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    /// Resolves a required entry-point label. Callers that reach this after
    /// a successful `ImageBuilder::finish` can trust these exist: `CO`,
    /// `XEC` and `ERRENT` are checked at build time (see
    /// [`BuildError::MissingEntryPoint`]).
    pub fn entry(&self, name: &str) -> usize {
        self.label(name)
            .unwrap_or_else(|| panic!("IL image missing required label {:?}", name))
    }
}

/// An instruction as produced by the textual loader, before label
/// references have been resolved to instruction indices.
#[derive(Clone, Debug, PartialEq)]
pub enum UnresolvedInstruction {
    Tst { dest: LabelName, text: String },
    TstNum { dest: LabelName },
    TstVar { dest: LabelName },
    TstLineNum { dest: LabelName },
    TstArrayVar { dest: LabelName },
    TstFuncName { dest: LabelName },

    Lit(Cell),
    Ind,
    Store,
    Add,
    Sub,
    Mpy,
    Div,
    Neg,
    Cmpr,
    Random,

    ICall(LabelName),
    Rtn,
    IJmp(LabelName),
    Xfer,
    Sav,
    Rstr,
    Fin,
    Nxt,
    NxtX,
    Done,

    Insrt,
    Lst,
    List0,
    List1,
    List2,
    Init,
    XInit,

    Dim1,
    Dim2,
    Array1,
    Array2,

    GetLn,
    InNum,
    Prn,
    Prs,
    Spc,
    SpcOne,
    NLine,
    Tab,

    Err(u8),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildError {
    DuplicateLabel(LabelName),
    UndefinedLabel(LabelName),
    MissingEntryPoint(&'static str),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BuildError::DuplicateLabel(name) => write!(f, "duplicate label {:?}", name),
            BuildError::UndefinedLabel(name) => write!(f, "reference to undefined label {:?}", name),
            BuildError::MissingEntryPoint(name) => {
                write!(f, "IL program has no {:?} entry point", name)
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Accumulates unresolved instructions and pending labels, then resolves
/// every label reference (including the `Branch::Fail` self-reference
/// check) in one pass. Line-splitting and opcode recognition live in
/// `ilasm`, which calls this builder.
#[derive(Default)]
pub struct ImageBuilder {
    instructions: Vec<UnresolvedInstruction>,
    labels: HashMap<LabelName, usize>,
    pending_labels: Vec<LabelName>,
}

impl ImageBuilder {
    pub fn new() -> ImageBuilder {
        ImageBuilder::default()
    }

    /// Attaches `label` to whichever instruction is pushed next, matching
    /// the loader's "a label-only line attaches to the next instruction"
    /// rule.
    pub fn mark_label(&mut self, label: LabelName) -> Result<(), BuildError> {
        if self.labels.contains_key(&label) || self.pending_labels.contains(&label) {
            return Err(BuildError::DuplicateLabel(label));
        }
        self.pending_labels.push(label);
        Ok(())
    }

    pub fn push(&mut self, instr: UnresolvedInstruction) {
        let index = self.instructions.len();
        for label in self.pending_labels.drain(..) {
            self.labels.insert(label, index);
        }
        self.instructions.push(instr);
    }

    /// `DB` pseudo-op support: appends an extra byte operand to the
    /// previously pushed instruction. Only `Tst`'s `text` field is
    /// extensible this way in practice (DB-extended literals).
    pub fn append_db_byte(&mut self, byte: &str) -> Result<(), BuildError> {
        if let Some(UnresolvedInstruction::Tst { text, .. }) = self.instructions.last_mut() {
            text.push_str(byte);
        }
        Ok(())
    }

    pub fn finish(self) -> Result<Image, BuildError> {
        let ImageBuilder {
            instructions,
            labels,
            ..
        } = self;

        for required in ["CO", "XEC", "ERRENT"] {
            if !labels.contains_key(required) {
                return Err(BuildError::MissingEntryPoint(required));
            }
        }

        let resolve_branch = |at: usize, dest: &LabelName| -> Result<Branch, BuildError> {
            let target = *labels
                .get(dest)
                .ok_or_else(|| BuildError::UndefinedLabel(dest.clone()))?;
            if target == at {
                Ok(Branch::Fail)
            } else {
                Ok(Branch::To(target))
            }
        };
        let resolve_index = |dest: &LabelName| -> Result<usize, BuildError> {
            labels
                .get(dest)
                .copied()
                .ok_or_else(|| BuildError::UndefinedLabel(dest.clone()))
        };

        let mut resolved = Vec::with_capacity(instructions.len());
        for (at, instr) in instructions.into_iter().enumerate() {
            let resolved_instr = match instr {
                UnresolvedInstruction::Tst { dest, text } => Instruction::Tst {
                    dest: resolve_branch(at, &dest)?,
                    text,
                },
                UnresolvedInstruction::TstNum { dest } => Instruction::TstNum {
                    dest: resolve_branch(at, &dest)?,
                },
                UnresolvedInstruction::TstVar { dest } => Instruction::TstVar {
                    dest: resolve_branch(at, &dest)?,
                },
                UnresolvedInstruction::TstLineNum { dest } => Instruction::TstLineNum {
                    dest: resolve_branch(at, &dest)?,
                },
                UnresolvedInstruction::TstArrayVar { dest } => Instruction::TstArrayVar {
                    dest: resolve_branch(at, &dest)?,
                },
                UnresolvedInstruction::TstFuncName { dest } => Instruction::TstFuncName {
                    dest: resolve_branch(at, &dest)?,
                },
                UnresolvedInstruction::Lit(v) => Instruction::Lit(v),
                UnresolvedInstruction::Ind => Instruction::Ind,
                UnresolvedInstruction::Store => Instruction::Store,
                UnresolvedInstruction::Add => Instruction::Add,
                UnresolvedInstruction::Sub => Instruction::Sub,
                UnresolvedInstruction::Mpy => Instruction::Mpy,
                UnresolvedInstruction::Div => Instruction::Div,
                UnresolvedInstruction::Neg => Instruction::Neg,
                UnresolvedInstruction::Cmpr => Instruction::Cmpr,
                UnresolvedInstruction::Random => Instruction::Random,
                UnresolvedInstruction::ICall(dest) => Instruction::ICall(resolve_index(&dest)?),
                UnresolvedInstruction::Rtn => Instruction::Rtn,
                UnresolvedInstruction::IJmp(dest) => Instruction::IJmp(resolve_index(&dest)?),
                UnresolvedInstruction::Xfer => Instruction::Xfer,
                UnresolvedInstruction::Sav => Instruction::Sav,
                UnresolvedInstruction::Rstr => Instruction::Rstr,
                UnresolvedInstruction::Fin => Instruction::Fin,
                UnresolvedInstruction::Nxt => Instruction::Nxt,
                UnresolvedInstruction::NxtX => Instruction::NxtX,
                UnresolvedInstruction::Done => Instruction::Done,
                UnresolvedInstruction::Insrt => Instruction::Insrt,
                UnresolvedInstruction::Lst => Instruction::Lst,
                UnresolvedInstruction::List0 => Instruction::List0,
                UnresolvedInstruction::List1 => Instruction::List1,
                UnresolvedInstruction::List2 => Instruction::List2,
                UnresolvedInstruction::Init => Instruction::Init,
                UnresolvedInstruction::XInit => Instruction::XInit,
                UnresolvedInstruction::Dim1 => Instruction::Dim1,
                UnresolvedInstruction::Dim2 => Instruction::Dim2,
                UnresolvedInstruction::Array1 => Instruction::Array1,
                UnresolvedInstruction::Array2 => Instruction::Array2,
                UnresolvedInstruction::GetLn => Instruction::GetLn,
                UnresolvedInstruction::InNum => Instruction::InNum,
                UnresolvedInstruction::Prn => Instruction::Prn,
                UnresolvedInstruction::Prs => Instruction::Prs,
                UnresolvedInstruction::Spc => Instruction::Spc,
                UnresolvedInstruction::SpcOne => Instruction::SpcOne,
                UnresolvedInstruction::NLine => Instruction::NLine,
                UnresolvedInstruction::Tab => Instruction::Tab,
                UnresolvedInstruction::Err(code) => Instruction::Err(code),
            };
            resolved.push(resolved_instr);
        }

        Ok(Image {
            instructions: resolved,
            labels,
        })
    }
}
