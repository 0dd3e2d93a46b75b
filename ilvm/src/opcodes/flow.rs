//! Flow-control opcodes, the sequencer, and the numbered-error helper
//! TBX's `ERR` opcode uses.

use crate::io::HostIo;
use crate::state::Vm;
use crate::VmFault;

/// The fourteen canonical TBX error messages, indexed by code `1..=14`.
const ERR_MESSAGES: [&str; 14] = [
    "Line too long.",
    "Numeric overflow.",
    "Illegal character.",
    "Unclosed quote.",
    "Expression too complex.",
    "Illegal expression.",
    "Invalid line number.",
    "Division by zero.",
    "Subroutines nested too deep.",
    "RET without GOSUB.",
    "Illegal variable.",
    "Bad command or statement name.",
    "Unmatched parentheses.",
    "OOM",
];

impl<H: HostIo> Vm<H> {
    /// `ICALL L`: pushes the current PC to the control stack and jumps.
    pub(crate) fn icall(&mut self, target: usize) -> Result<(), VmFault> {
        self.control_stack.push(self.pc);
        self.pc = target;
        Ok(())
    }

    pub(crate) fn rtn(&mut self) -> Result<(), VmFault> {
        self.pc = self.pop_control()?;
        Ok(())
    }

    /// `IJMP L` / `HOP L`.
    pub(crate) fn ijmp(&mut self, target: usize) -> Result<(), VmFault> {
        self.pc = target;
        Ok(())
    }

    /// `SAV`: pushes the current BASIC line number for `GOSUB`.
    pub(crate) fn sav(&mut self) -> Result<(), VmFault> {
        self.subroutine_stack.push(self.basic_linenum as i64);
        Ok(())
    }

    /// `RSTR`: pops it back for `RETURN`.
    pub(crate) fn rstr(&mut self) -> Result<(), VmFault> {
        let line = self.pop_subroutine()?;
        self.basic_linenum = line.max(0) as usize;
        Ok(())
    }

    /// `FIN`: back to command mode.
    pub(crate) fn fin(&mut self) -> Result<(), VmFault> {
        self.basic_linenum = 0;
        self.pc = self.image.entry("CO");
        Ok(())
    }

    /// `XFER`: transfers to a BASIC line number popped off the expression
    /// stack. `loc == 1` is special-cased: if line 1 itself is empty (the
    /// `RUN` case), scan forward for the first non-empty stored line.
    pub(crate) fn xfer(&mut self) -> Result<(), VmFault> {
        let mut target = self.pop_expr("expression stack")?;

        if target == 1 {
            while (target as usize) < self.program.len() && self.stored_line(target as usize).is_empty() {
                target += 1;
            }
        }

        let max_lines = self.mode.max_lines() as i64;
        if target >= 1 && target < max_lines && !self.stored_line(target as usize).is_empty() {
            self.basic_linenum = target as usize;
            self.nxt();
        } else {
            self.host.write_line("Invalid line number.");
            self.pc = self.image.entry("ERRENT");
        }
        Ok(())
    }

    /// `NXT`: the end-of-statement hook and program sequencer. Infallible;
    /// it only ever reads `program` and writes `pc`/`line_buffer`/
    /// `basic_linenum`.
    pub(crate) fn nxt(&mut self) {
        if self.basic_linenum == 0 {
            self.pc = self.image.entry("CO");
            return;
        }

        let max_lines = self.mode.max_lines();
        self.line_buffer = self.stored_line(self.basic_linenum).to_string();
        self.basic_linenum += 1;
        while self.basic_linenum < max_lines && self.stored_line(self.basic_linenum).is_empty() {
            self.basic_linenum += 1;
        }
        if self.basic_linenum >= max_lines {
            self.basic_linenum = 0;
        }
        self.pc = self.image.entry("XEC");
    }

    /// `NXTX` (TBX): jumps straight to `XEC` without advancing the line;
    /// used to parse the next `$`-separated statement on the same line.
    pub(crate) fn nxt_x(&mut self) -> Result<(), VmFault> {
        self.pc = self.image.entry("XEC");
        Ok(())
    }

    /// `ERR n` (TBX): prints the canonical message for `n` and transfers
    /// to `ERRENT`.
    pub(crate) fn err(&mut self, code: u8) {
        if let Some(message) = (code as usize)
            .checked_sub(1)
            .and_then(|i| ERR_MESSAGES.get(i))
        {
            self.host.write_line(message);
        }
        self.pc = self.image.entry("ERRENT");
    }
}
