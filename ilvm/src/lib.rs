//! Virtual machine core for the Tiny BASIC / TBX Interpretive Language (IL).
//!
//! This crate owns the VM side of the split described in the workspace
//! `DESIGN.md`: it consumes an already-assembled [`Image`] (produced by the
//! sibling `ilasm` crate) and executes it. It never parses IL source text
//! itself.

extern crate num;
#[macro_use]
extern crate num_derive;

pub mod comparison;
pub mod dispatch;
pub mod errors;
pub mod image;
pub mod io;
pub mod opcodes;
pub mod state;


pub use comparison::Comparison;
pub use dispatch::{ExitReason, StepOutcome};
pub use errors::VmFault;
pub use image::{Branch, Image, ImageBuilder, Instruction};
pub use io::HostIo;
pub use state::{ListingRange, Mode, Vm};

/// Cell type backing the expression stack, variable memory and line numbers.
///
/// Values, variable indices, comparison operator codes and line numbers all
/// share the expression stack by convention; keep that one type, don't
/// split it into a tagged union, or IL programs that rely on the convention
/// (as real Tiny BASIC IL does) break.
pub type Cell = i64;

/// Label name as it appears in IL source, before resolution to an index.
pub type LabelName = String;
