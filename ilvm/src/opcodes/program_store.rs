//! Program store opcodes and the two initialization opcodes.

use crate::io::HostIo;
use crate::state::{ListingRange, Vm};
use crate::VmFault;

impl<H: HostIo> Vm<H> {
    /// `INSRT`: pulls a leading decimal line number off the line buffer and
    /// stores the remaining trimmed text at that slot. Tiny BASIC clears
    /// the line buffer afterwards; TBX does not.
    pub(crate) fn insrt(&mut self) -> Result<(), VmFault> {
        self.line_buffer = self.line_buffer.trim_start().to_string();
        let digit_len = self
            .line_buffer
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or_else(|| self.line_buffer.len());
        let digits: String = self.line_buffer.drain(..digit_len).collect();
        let line_num: usize = digits.parse().unwrap_or(0);

        let text = self.line_buffer.trim().to_string();
        if line_num < self.program.len() {
            self.program[line_num] = text;
        }

        if self.mode.insrt_clears_line_buffer() {
            self.line_buffer.clear();
        }
        Ok(())
    }

    /// `LST`: prints every non-empty stored line in the current listing
    /// range, numbered right-aligned to width 3.
    pub(crate) fn lst(&mut self) -> Result<(), VmFault> {
        let (lo, hi) = match self.listing_range {
            ListingRange::All => (0, self.program.len()),
            ListingRange::One(n) => (n, n + 1),
            ListingRange::Range(lo, hi) => (lo, hi + 1),
        };

        for (number, line) in self.program.iter().enumerate() {
            if number < lo || number >= hi {
                continue;
            }
            if !line.trim().is_empty() {
                self.host.write_line(&format!("{:>3} {}", number, line));
            }
        }
        Ok(())
    }

    pub(crate) fn list0(&mut self) -> Result<(), VmFault> {
        self.listing_range = ListingRange::All;
        Ok(())
    }

    pub(crate) fn list1(&mut self) -> Result<(), VmFault> {
        let n = self.pop_expr("expression stack")?;
        self.listing_range = ListingRange::One(n.max(0) as usize);
        Ok(())
    }

    /// `LIST2`: pops upper then lower; out-of-range is TBX error 7.
    pub(crate) fn list2(&mut self) -> Result<(), VmFault> {
        let upper = self.pop_expr("expression stack")?;
        let lower = self.pop_expr("expression stack")?;
        let max_lines = self.mode.max_lines() as i64;

        if lower < 1 || upper >= max_lines || lower > upper {
            self.err(7);
            return Ok(());
        }

        self.listing_range = ListingRange::Range(lower as usize, upper as usize);
        Ok(())
    }

    pub(crate) fn init(&mut self) -> Result<(), VmFault> {
        self.reset_cold();
        Ok(())
    }

    pub(crate) fn xinit(&mut self) -> Result<(), VmFault> {
        self.dispatch_gate();
        Ok(())
    }
}
