//! Host I/O opcodes.

use crate::io::HostIo;
use crate::state::Vm;
use crate::VmFault;

impl<H: HostIo> Vm<H> {
    /// `GETLN`: the autoload queue is drained first (each line echoed with
    /// the command prompt); once empty, read from the terminal until a
    /// non-blank line comes back. End-of-input sets the quit flag.
    pub(crate) fn get_ln(&mut self) -> Result<(), VmFault> {
        if let Some(line) = self.autoload_queue.pop_front() {
            self.host.write(self.mode.command_prompt());
            self.host.write_line(&line);
            self.line_buffer = line;
            return Ok(());
        }

        loop {
            match self.host.read_line(self.mode.command_prompt()) {
                Some(line) => {
                    if !line.trim().is_empty() {
                        self.line_buffer = line;
                        return Ok(());
                    }
                }
                None => {
                    self.quit = true;
                    return Ok(());
                }
            }
        }
    }

    /// `INNUM`: drains one integer from the input queue, refilling it by
    /// prompting and splitting a comma-separated response when empty.
    pub(crate) fn in_num(&mut self) -> Result<(), VmFault> {
        loop {
            if let Some(value) = self.innum_queue.pop_front() {
                self.push_expr(value);
                return Ok(());
            }

            match self.host.read_line(self.mode.input_prompt()) {
                Some(line) => {
                    let mut parsed = Vec::new();
                    let mut bad = false;
                    for part in line.split(',') {
                        match part.trim().parse::<i64>() {
                            Ok(n) => parsed.push(n),
                            Err(_) => {
                                bad = true;
                                break;
                            }
                        }
                    }
                    if bad || parsed.is_empty() {
                        self.host.write_line("Type a number.");
                    } else {
                        self.innum_queue.extend(parsed);
                    }
                }
                None => {
                    self.quit = true;
                    return Ok(());
                }
            }
        }
    }

    pub(crate) fn prn(&mut self) -> Result<(), VmFault> {
        let value = self.pop_expr("expression stack")?;
        self.host.write(&value.to_string());
        Ok(())
    }

    /// `PRS`: prints the line buffer up to the next `"`, leaving the
    /// remainder (if unterminated, the whole rest of the buffer is
    /// consumed and nothing remains).
    pub(crate) fn prs(&mut self) -> Result<(), VmFault> {
        match self.line_buffer.find('"') {
            Some(index) => {
                let text = self.line_buffer[..index].to_string();
                self.host.write(&text);
                self.line_buffer = self.line_buffer[index + 1..].to_string();
            }
            None => {
                let text = std::mem::take(&mut self.line_buffer);
                self.host.write(&text);
            }
        }
        Ok(())
    }

    pub(crate) fn spc(&mut self) -> Result<(), VmFault> {
        self.host.write("\t");
        Ok(())
    }

    /// `SPCONE` (TBX): a single space, as opposed to `SPC`'s tab.
    pub(crate) fn spc_one(&mut self) -> Result<(), VmFault> {
        self.host.write(" ");
        Ok(())
    }

    pub(crate) fn nline(&mut self) -> Result<(), VmFault> {
        self.host.write("\n");
        Ok(())
    }

    /// `TAB` (TBX): pops `n`, prints `n` spaces, then bumps the third
    /// control-stack entry by one to signal the caller that its "result"
    /// should be suppressed. The depth this assumes is validated rather
    /// than blindly indexed.
    pub(crate) fn tab(&mut self) -> Result<(), VmFault> {
        let n = self.pop_expr("expression stack")?;
        for _ in 0..n.max(0) {
            self.host.write(" ");
        }

        if self.control_stack.len() < 3 {
            return Err(VmFault::TabDepthMismatch {
                depth: self.control_stack.len(),
            });
        }
        let index = self.control_stack.len() - 3;
        self.control_stack[index] = self.control_stack[index].wrapping_add(1);
        Ok(())
    }
}
