//! Loader/assembler for the Tiny BASIC / TBX Interpretive Language (IL)
//! source format.
//!
//! A single-pass line splitter, external to the VM core: it reads IL
//! source text and produces an `ilvm::Image` the VM can run. It never
//! executes anything itself.

mod error;
mod opcode;
mod parser;

#[cfg(test)]
mod test;

pub use error::Error;
pub use parser::Rule;

use ilvm::image::{Image, ImageBuilder};
use opcode::{Operand, Statement};
use pest::iterators::Pair;
use pest::Parser;
use parser::IlParser;

pub type Result<T> = std::result::Result<T, Error>;

/// Assembles IL source text into an `ilvm::Image`.
///
/// Blank lines and pure-comment lines are ignored. Everything else is
/// parsed per-line against `[LABEL:] [OPCODE [OPERAND1[,OPERAND2]]]`,
/// normalized into a typed `UnresolvedInstruction`, and handed to
/// `ImageBuilder`, which resolves every label reference,
/// including the `Branch::Fail` "points at itself" convention, in one
/// pass at the end.
pub fn assemble(source: &str) -> Result<Image> {
    let mut builder = ImageBuilder::new();

    for (zero_based, raw_line) in source.lines().enumerate() {
        let line_number = zero_based + 1;
        let stripped = strip_comment(raw_line);
        if stripped.trim().is_empty() {
            continue;
        }

        let mut pairs = IlParser::parse(Rule::line, stripped).map_err(|source| Error::Grammar {
            line: line_number,
            source: Box::new(source),
        })?;
        let line_pair = pairs.next().expect("`line` rule always produces a pair");

        let mut label = None;
        let mut statement = None;
        for part in line_pair.into_inner() {
            match part.as_rule() {
                Rule::label => {
                    let ident = part.into_inner().next().unwrap();
                    label = Some(ident.as_str().to_string());
                }
                Rule::statement => statement = Some(parse_statement(part)),
                Rule::EOI => {}
                other => unreachable!("unexpected top-level rule {:?}", other),
            }
        }

        if let Some(label) = label {
            builder.mark_label(label)?;
        }

        let stmt = match statement {
            Some(stmt) => stmt,
            None => continue,
        };

        if stmt.opcode.eq_ignore_ascii_case("DB") {
            let byte = opcode::db_byte(&stmt, line_number)?;
            let _ = builder.append_db_byte(&byte);
            continue;
        }

        if let Some(instr) = opcode::resolve(&stmt, line_number)? {
            builder.push(instr);
        }
    }

    builder.finish().map_err(Error::from)
}

fn parse_statement(pair: Pair<Rule>) -> Statement {
    let mut inner = pair.into_inner();
    let opcode = inner.next().unwrap().as_str().to_string();
    let mut operands = Vec::new();

    if let Some(operands_pair) = inner.next() {
        for operand_pair in operands_pair.into_inner() {
            let text_pair = operand_pair.into_inner().next().unwrap();
            operands.push(match text_pair.as_rule() {
                Rule::quoted => {
                    let raw = text_pair.as_str();
                    Operand::Quoted(raw[1..raw.len() - 1].to_string())
                }
                Rule::bare => Operand::Bare(text_pair.as_str().to_string()),
                other => unreachable!("unexpected operand rule {:?}", other),
            });
        }
    }

    Statement { opcode, operands }
}

/// Strips a `; comment` suffix, the way the reference loader's
/// `re.fullmatch` does, but quote-aware so a `;` inside a quoted TST
/// literal isn't mistaken for the start of a comment.
fn strip_comment(line: &str) -> &str {
    let mut in_quote = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '\'' => in_quote = !in_quote,
            ';' if !in_quote => return &line[..index],
            _ => {}
        }
    }
    line
}
