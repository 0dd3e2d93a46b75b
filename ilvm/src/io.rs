//! The host collaborator boundary. The VM never touches a terminal
//! directly; it calls out through this trait, which `tbrepl` implements
//! against stdin/stdout and which tests implement against an in-memory
//! buffer.

/// Everything the dispatcher needs from the outside world.
///
/// `read_line` returning `None` signals end-of-input, which ties to the
/// VM's quit flag.
pub trait HostIo {
    /// Prompts with `prompt` and returns one line of input, or `None` on
    /// end-of-input. The returned string must not include the trailing
    /// newline.
    fn read_line(&mut self, prompt: &str) -> Option<String>;

    /// Writes `s` with no trailing newline, as `print(..., end='')` does in
    /// the reference interpreter.
    fn write(&mut self, s: &str);

    fn write_line(&mut self, s: &str) {
        self.write(s);
        self.write("\n");
    }
}
