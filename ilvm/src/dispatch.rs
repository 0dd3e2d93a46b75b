//! The fetch-decode-execute loop.

use crate::image::Instruction;
use crate::io::HostIo;
use crate::state::Vm;
use crate::VmFault;

/// What happened after a single `Vm::step`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Quit,
}

/// Why `Vm::run` stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    /// End-of-input on `GETLN` or `INNUM`.
    Quit,
}

impl<H: HostIo> Vm<H> {
    /// Fetches `image[pc]`, advances `pc`, and executes the handler for
    /// that opcode. Unknown opcodes can't occur here (they're rejected at
    /// load time by `ilasm`), but a PC that has walked off the end of the
    /// image is the one fetch-time invariant violation this loop itself
    /// can observe: the PC must be a valid instruction index, or equal
    /// `ERRENT`'s index, after every opcode completes.
    pub fn step(&mut self) -> Result<StepOutcome, VmFault> {
        if self.quit {
            return Ok(StepOutcome::Quit);
        }

        let instr = self
            .image
            .get(self.pc)
            .cloned()
            .ok_or(VmFault::ProgramCounterOutOfRange(self.pc))?;
        self.pc += 1;

        match instr {
            Instruction::Tst { dest, text } => self.tst(dest, &text)?,
            Instruction::TstNum { dest } => self.tst_num(dest)?,
            Instruction::TstVar { dest } => self.tst_var(dest)?,
            Instruction::TstLineNum { dest } => self.tst_line_num(dest)?,
            Instruction::TstArrayVar { dest } => self.tst_array_var(dest)?,
            Instruction::TstFuncName { dest } => self.tst_func_name(dest)?,

            Instruction::Lit(value) => self.lit(value)?,
            Instruction::Ind => self.ind()?,
            Instruction::Store => self.store()?,
            Instruction::Add => self.add()?,
            Instruction::Sub => self.sub()?,
            Instruction::Mpy => self.mpy()?,
            Instruction::Div => self.div()?,
            Instruction::Neg => self.neg()?,
            Instruction::Cmpr => self.cmpr()?,
            Instruction::Random => self.random()?,

            Instruction::ICall(target) => self.icall(target)?,
            Instruction::Rtn => self.rtn()?,
            Instruction::IJmp(target) => self.ijmp(target)?,
            Instruction::Xfer => self.xfer()?,
            Instruction::Sav => self.sav()?,
            Instruction::Rstr => self.rstr()?,
            Instruction::Fin => self.fin()?,
            Instruction::Nxt => self.nxt(),
            Instruction::NxtX => self.nxt_x()?,
            Instruction::Done => self.done()?,

            Instruction::Insrt => self.insrt()?,
            Instruction::Lst => self.lst()?,
            Instruction::List0 => self.list0()?,
            Instruction::List1 => self.list1()?,
            Instruction::List2 => self.list2()?,
            Instruction::Init => self.init()?,
            Instruction::XInit => self.xinit()?,

            Instruction::Dim1 => self.dim1()?,
            Instruction::Dim2 => self.dim2()?,
            Instruction::Array1 => self.array1()?,
            Instruction::Array2 => self.array2()?,

            Instruction::GetLn => self.get_ln()?,
            Instruction::InNum => self.in_num()?,
            Instruction::Prn => self.prn()?,
            Instruction::Prs => self.prs()?,
            Instruction::Spc => self.spc()?,
            Instruction::SpcOne => self.spc_one()?,
            Instruction::NLine => self.nline()?,
            Instruction::Tab => self.tab()?,

            Instruction::Err(code) => self.err(code),
        }

        if self.quit {
            Ok(StepOutcome::Quit)
        } else {
            Ok(StepOutcome::Continue)
        }
    }

    /// Runs until `GETLN`/`INNUM` sees end-of-input, or a VM invariant
    /// violation surfaces.
    pub fn run(&mut self) -> Result<ExitReason, VmFault> {
        loop {
            if let StepOutcome::Quit = self.step()? {
                return Ok(ExitReason::Quit);
            }
        }
    }
}
