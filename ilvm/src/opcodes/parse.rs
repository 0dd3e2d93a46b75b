//! Parse opcodes: the `TST*` family.
//!
//! Every one of these trims leading whitespace from the line buffer first,
//! then either consumes a matched prefix and falls through, or fails by
//! following `dest`: `Branch::Fail` prints a syntax error and jumps to
//! `ERRENT`, `Branch::To(target)` jumps to `target`.

use crate::image::Branch;
use crate::io::HostIo;
use crate::state::Vm;
use crate::VmFault;

impl<H: HostIo> Vm<H> {
    fn take_branch(&mut self, dest: Branch) {
        match dest {
            Branch::Fail => {
                self.host
                    .write_line(&format!("Syntax error at line {}.", self.basic_linenum));
                self.pc = self.image.entry("ERRENT");
            }
            Branch::To(target) => self.pc = target,
        }
    }

    /// `TST d, s`: matches the literal `s` case-insensitively, with the
    /// special case that an empty `s == "\r"` (a bare CR) against an empty
    /// line buffer always succeeds without consuming anything.
    pub(crate) fn tst(&mut self, dest: Branch, text: &str) -> Result<(), VmFault> {
        self.line_buffer = self.line_buffer.trim_start().to_string();

        if text == "\r" && self.line_buffer.is_empty() {
            return Ok(());
        }

        let upper_buf = self.line_buffer.to_uppercase();
        let upper_text = text.to_uppercase();
        if upper_buf.starts_with(&upper_text) {
            self.line_buffer.drain(..text.len());
        } else {
            self.take_branch(dest);
        }
        Ok(())
    }

    /// `TSTN d`: one or more decimal digits; pushes the parsed integer.
    pub(crate) fn tst_num(&mut self, dest: Branch) -> Result<(), VmFault> {
        self.line_buffer = self.line_buffer.trim_start().to_string();
        let digit_len = self
            .line_buffer
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or_else(|| self.line_buffer.len());

        if digit_len == 0 {
            self.take_branch(dest);
            return Ok(());
        }

        let digits: String = self.line_buffer.drain(..digit_len).collect();
        let value: i64 = digits.parse().unwrap_or(i64::MAX);
        self.push_expr(value);
        Ok(())
    }

    /// `TSTV d`: one alphabetic character, pushed as `0..25` (A..Z).
    pub(crate) fn tst_var(&mut self, dest: Branch) -> Result<(), VmFault> {
        self.line_buffer = self.line_buffer.trim_start().to_string();
        match self.line_buffer.chars().next() {
            Some(c) if c.is_ascii_alphabetic() => {
                self.push_expr((c.to_ascii_uppercase() as u8 - b'A') as i64);
                self.line_buffer.drain(..1);
            }
            _ => self.take_branch(dest),
        }
        Ok(())
    }

    /// `TSTL d`: head word parses as an integer line number in
    /// `[1, MAX_LINES)`. Unlike the other `TST*` opcodes, a successful match
    /// leaves the line buffer untouched, and an out-of-range number is a
    /// BASIC-level error (`Invalid line number.`), not an alternative to try.
    pub(crate) fn tst_line_num(&mut self, dest: Branch) -> Result<(), VmFault> {
        let trimmed = self.line_buffer.trim_start();
        let head = trimmed.split_whitespace().next().unwrap_or("");

        match head.parse::<i64>() {
            Ok(n) if n >= 1 && (n as usize) < self.mode.max_lines() => Ok(()),
            Ok(_) => {
                self.host.write_line("Invalid line number.");
                self.pc = self.image.entry("ERRENT");
                Ok(())
            }
            Err(_) => {
                self.take_branch(dest);
                Ok(())
            }
        }
    }

    /// `TSTA d` (TBX): an alpha character immediately followed by `(`.
    /// Consumes only the letter, pushing its variable index, so a
    /// subsequent opcode can parse the argument list inside the parens.
    pub(crate) fn tst_array_var(&mut self, dest: Branch) -> Result<(), VmFault> {
        self.line_buffer = self.line_buffer.trim_start().to_string();
        let mut chars = self.line_buffer.chars();
        match (chars.next(), chars.next()) {
            (Some(c), Some('(')) if c.is_ascii_alphabetic() => {
                self.push_expr((c.to_ascii_uppercase() as u8 - b'A') as i64);
                self.line_buffer.drain(..1);
            }
            _ => self.take_branch(dest),
        }
        Ok(())
    }

    /// `TSTF d` (TBX): two alphabetic characters at the head, left
    /// untouched in the line buffer (a lookahead, used for two-letter
    /// function/keyword names).
    pub(crate) fn tst_func_name(&mut self, dest: Branch) -> Result<(), VmFault> {
        let trimmed = self.line_buffer.trim_start();
        let matches = trimmed
            .chars()
            .take(2)
            .all(|c| c.is_ascii_alphabetic())
            && trimmed.chars().count() >= 2;

        if matches {
            Ok(())
        } else {
            self.take_branch(dest);
            Ok(())
        }
    }

    /// `DONE`: end-of-statement check. Tiny BASIC treats any leftover
    /// non-blank line buffer as a syntax error; TBX additionally allows a
    /// `$`-prefixed residual to start the next statement on the same line.
    pub(crate) fn done(&mut self) -> Result<(), VmFault> {
        let residual = self.line_buffer.trim_start();
        if residual.is_empty() {
            return Ok(());
        }

        if self.mode == crate::Mode::Tbx && residual.starts_with('$') {
            self.line_buffer = residual[1..].to_string();
            self.pc = self.image.entry("XEC");
            return Ok(());
        }

        self.host
            .write_line(&format!("Syntax error at line {}.", self.basic_linenum));
        self.pc = self.image.entry("ERRENT");
        Ok(())
    }
}
