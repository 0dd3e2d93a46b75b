//! Evaluator opcodes: arithmetic, comparison, indirect load/store, literal
//! push.

use crate::comparison::Comparison;
use crate::io::HostIo;
use crate::state::Vm;
use crate::{Cell, VmFault};

impl<H: HostIo> Vm<H> {
    pub(crate) fn lit(&mut self, value: Cell) -> Result<(), VmFault> {
        self.push_expr(value);
        Ok(())
    }

    /// `IND`: pops a variable index, pushes its value.
    pub(crate) fn ind(&mut self) -> Result<(), VmFault> {
        let index = self.pop_expr("expression stack")?;
        let value = self.read_var(index)?;
        self.push_expr(value);
        Ok(())
    }

    /// `STORE`: pops value then index; order matters.
    pub(crate) fn store(&mut self) -> Result<(), VmFault> {
        let value = self.pop_expr("expression stack")?;
        let index = self.pop_expr("expression stack")?;
        self.write_var(index, value)
    }

    pub(crate) fn add(&mut self) -> Result<(), VmFault> {
        let rhs = self.pop_expr("expression stack")?;
        let lhs = self.pop_expr("expression stack")?;
        self.push_expr(lhs.wrapping_add(rhs));
        Ok(())
    }

    pub(crate) fn sub(&mut self) -> Result<(), VmFault> {
        let rhs = self.pop_expr("expression stack")?;
        let lhs = self.pop_expr("expression stack")?;
        self.push_expr(lhs.wrapping_sub(rhs));
        Ok(())
    }

    pub(crate) fn mpy(&mut self) -> Result<(), VmFault> {
        let rhs = self.pop_expr("expression stack")?;
        let lhs = self.pop_expr("expression stack")?;
        self.push_expr(lhs.wrapping_mul(rhs));
        Ok(())
    }

    /// `DIV`: integer floor division (matching Python's `//`, not Rust's
    /// truncating `/`). Division by zero is `ERR 8` in TBX, and in Tiny
    /// BASIC it prints `Division by zero.` and jumps to `ERRENT`; there is
    /// no host-level fault for it, both modes route through a printed
    /// message rather than a propagated Rust error.
    pub(crate) fn div(&mut self) -> Result<(), VmFault> {
        let rhs = self.pop_expr("expression stack")?;
        let lhs = self.pop_expr("expression stack")?;
        if rhs == 0 {
            if self.mode == crate::Mode::Tbx {
                self.err(8);
            } else {
                self.host.write_line("Division by zero.");
                self.pc = self.image.entry("ERRENT");
            }
            return Ok(());
        }
        let quotient = lhs.wrapping_div(rhs);
        let remainder = lhs.wrapping_rem(rhs);
        let floor = if remainder != 0 && (remainder < 0) != (rhs < 0) {
            quotient - 1
        } else {
            quotient
        };
        self.push_expr(floor);
        Ok(())
    }

    pub(crate) fn neg(&mut self) -> Result<(), VmFault> {
        let value = self.pop_expr("expression stack")?;
        self.push_expr(value.wrapping_neg());
        Ok(())
    }

    /// `CMPR`: pops right, operator, left; if the predicate is false it
    /// invokes `NXT` to skip the rest of the current BASIC line.
    pub(crate) fn cmpr(&mut self) -> Result<(), VmFault> {
        let rhs = self.pop_expr("expression stack")?;
        let operator = self.pop_expr("expression stack")?;
        let lhs = self.pop_expr("expression stack")?;

        let comparison =
            Comparison::from_code(operator).ok_or(VmFault::BadComparisonOperator(operator))?;

        if !comparison.apply(lhs, rhs) {
            self.nxt();
        }
        Ok(())
    }

    /// `RANDOM` (TBX): a uniform integer in `[0, 10000]`.
    pub(crate) fn random(&mut self) -> Result<(), VmFault> {
        use rand::Rng;
        let value = rand::thread_rng().gen_range(0..=10_000);
        self.push_expr(value);
        Ok(())
    }

    pub(crate) fn read_var(&self, index: Cell) -> Result<Cell, VmFault> {
        if index < 0 || index as usize >= self.vars.len() {
            return Err(VmFault::BadVariableIndex(index));
        }
        Ok(self.vars[index as usize])
    }

    pub(crate) fn write_var(&mut self, index: Cell, value: Cell) -> Result<(), VmFault> {
        if index < 0 || index as usize >= self.vars.len() {
            return Err(VmFault::BadVariableIndex(index));
        }
        self.vars[index as usize] = value;
        Ok(())
    }
}
