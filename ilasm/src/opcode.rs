//! Maps one parsed `(mnemonic, operands)` line onto an
//! `ilvm::image::UnresolvedInstruction`, or reports why it couldn't. This
//! is the part of the loader that normalizes, at load time, into typed
//! operands per opcode.

use crate::error::Error;
use ilvm::image::UnresolvedInstruction as I;
use ilvm::Cell;

/// One operand as the grammar produced it: either quoted (a
/// leading/trailing single quote is stripped from the second operand) or
/// bare.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Quoted(String),
    Bare(String),
}

impl Operand {
    fn text(&self) -> &str {
        match self {
            Operand::Quoted(s) | Operand::Bare(s) => s,
        }
    }
}

pub struct Statement {
    pub opcode: String,
    pub operands: Vec<Operand>,
}

fn operand<'a>(stmt: &'a Statement, index: usize, line: usize) -> Result<&'a Operand, Error> {
    stmt.operands
        .get(index)
        .ok_or_else(|| Error::MissingOperand {
            line,
            opcode: stmt.opcode.clone(),
            index,
        })
}

fn label_operand(stmt: &Statement, index: usize, line: usize) -> Result<String, Error> {
    Ok(operand(stmt, index, line)?.text().to_string())
}

fn numeric_operand(stmt: &Statement, index: usize, line: usize) -> Result<i64, Error> {
    let op = operand(stmt, index, line)?;
    op.text()
        .parse::<i64>()
        .map_err(|_| Error::InvalidOperand {
            line,
            opcode: stmt.opcode.clone(),
            operand: op.text().to_string(),
        })
}

/// `TST d, s`: `s` is either a quoted literal (quotes already stripped by
/// the grammar) or a decimal ASCII code.
fn tst_text(stmt: &Statement, line: usize) -> Result<String, Error> {
    let op = operand(stmt, 1, line)?;
    match op {
        Operand::Quoted(text) => Ok(text.clone()),
        Operand::Bare(text) => match text.parse::<u32>().ok().and_then(char::from_u32) {
            Some(c) => Ok(c.to_string()),
            None => Ok(text.clone()),
        },
    }
}

/// Resolves one statement to an `UnresolvedInstruction`, or `None` if the
/// opcode was the `DB` pseudo-op (handled by the caller against the
/// previously pushed instruction).
pub fn resolve(stmt: &Statement, line: usize) -> Result<Option<I>, Error> {
    let opcode = stmt.opcode.to_ascii_uppercase();

    let instr = match opcode.as_str() {
        "DB" => return Ok(None),

        "TST" => I::Tst {
            dest: label_operand(stmt, 0, line)?,
            text: tst_text(stmt, line)?,
        },
        "TSTN" => I::TstNum {
            dest: label_operand(stmt, 0, line)?,
        },
        "TSTV" => I::TstVar {
            dest: label_operand(stmt, 0, line)?,
        },
        "TSTL" => I::TstLineNum {
            dest: label_operand(stmt, 0, line)?,
        },
        "TSTA" => I::TstArrayVar {
            dest: label_operand(stmt, 0, line)?,
        },
        "TSTF" => I::TstFuncName {
            dest: label_operand(stmt, 0, line)?,
        },

        "LIT" => I::Lit(numeric_operand(stmt, 0, line)? as Cell),
        "IND" => I::Ind,
        "STORE" => I::Store,
        "ADD" => I::Add,
        "SUB" => I::Sub,
        "MPY" => I::Mpy,
        "DIV" => I::Div,
        "NEG" => I::Neg,
        "CMPR" => I::Cmpr,
        "RANDOM" => I::Random,

        "ICALL" => I::ICall(label_operand(stmt, 0, line)?),
        "RTN" => I::Rtn,
        "IJMP" | "HOP" => I::IJmp(label_operand(stmt, 0, line)?),
        "XFER" => I::Xfer,
        "SAV" => I::Sav,
        "RSTR" => I::Rstr,
        "FIN" => I::Fin,
        "NXT" => I::Nxt,
        "NXTX" => I::NxtX,
        "DONE" => I::Done,

        "INSRT" => I::Insrt,
        "LST" => I::Lst,
        "LIST0" => I::List0,
        "LIST1" => I::List1,
        "LIST2" => I::List2,
        "INIT" => I::Init,
        "XINIT" => I::XInit,

        "DIM1" => I::Dim1,
        "DIM2" => I::Dim2,
        "ARRAY1" => I::Array1,
        "ARRAY2" => I::Array2,

        "GETLN" => I::GetLn,
        "INNUM" => I::InNum,
        "PRN" => I::Prn,
        "PRS" => I::Prs,
        "SPC" => I::Spc,
        "SPCONE" => I::SpcOne,
        "NLINE" => I::NLine,
        "TAB" => I::Tab,

        "ERR" => I::Err(numeric_operand(stmt, 0, line)?.clamp(0, u8::MAX as i64) as u8),

        other => {
            return Err(Error::UnknownOpcode {
                line,
                opcode: other.to_string(),
            })
        }
    };

    Ok(Some(instr))
}

/// `DB`: the literal byte to append to the previously pushed instruction's
/// `TST` text. A quoted comma (`DB ','`) lets `DB` supply the comma byte a
/// bare operand list can't carry; `operand()` already strips quotes, so
/// that case falls out for free here.
pub fn db_byte(stmt: &Statement, line: usize) -> Result<String, Error> {
    Ok(operand(stmt, 0, line)?.text().to_string())
}
