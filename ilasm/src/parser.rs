//! The pest-generated parser for one line of IL source. Kept as its own
//! module, behind a single `Rule` re-export, so `crate::Rule` is the only
//! thing the rest of the crate needs to import.

use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct IlParser;
