//! VM state and its two lifecycles, `INIT` and `XINIT`.

use crate::image::Image;
use crate::io::HostIo;
use crate::{Cell, VmFault};
use std::collections::{HashMap, VecDeque};

/// Selects Tiny BASIC or TBX semantics: `MAX_LINES`, prompts, and which
/// opcode set the loaded IL is allowed to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    TinyBasic,
    Tbx,
}

impl Mode {
    pub fn max_lines(self) -> usize {
        match self {
            Mode::TinyBasic => 256,
            Mode::Tbx => 65_536,
        }
    }

    pub fn command_prompt(self) -> &'static str {
        match self {
            Mode::TinyBasic => "? ",
            Mode::Tbx => ": ",
        }
    }

    pub fn input_prompt(self) -> &'static str {
        match self {
            Mode::TinyBasic => "# ",
            Mode::Tbx => "? ",
        }
    }

    /// Tiny BASIC's `INSRT` clears the line buffer after insertion, TBX's
    /// does not.
    pub fn insrt_clears_line_buffer(self) -> bool {
        matches!(self, Mode::TinyBasic)
    }
}

/// The range of stored lines `LST` prints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListingRange {
    All,
    One(usize),
    Range(usize, usize),
}

impl Default for ListingRange {
    fn default() -> ListingRange {
        ListingRange::All
    }
}

/// The full mutable state of one VM instance, plus the host collaborator it
/// drives I/O through. One `Vm` serves both command-mode REPL and stored
/// program execution; there is no separate "interpreter" object for `RUN`.
pub struct Vm<H: HostIo> {
    pub(crate) image: Image,
    pub(crate) mode: Mode,
    pub(crate) pc: usize,

    pub(crate) line_buffer: String,
    pub(crate) autoload_queue: VecDeque<String>,
    pub(crate) innum_queue: VecDeque<Cell>,

    pub(crate) expr_stack: Vec<Cell>,
    pub(crate) control_stack: Vec<usize>,
    pub(crate) subroutine_stack: Vec<Cell>,

    pub(crate) program: Vec<String>,
    pub(crate) vars: Vec<Cell>,
    pub(crate) var_widths: HashMap<usize, Cell>,

    pub(crate) basic_linenum: usize,
    pub(crate) listing_range: ListingRange,
    pub(crate) quit: bool,

    pub(crate) host: H,
}

impl<H: HostIo> Vm<H> {
    pub fn new(image: Image, mode: Mode, host: H) -> Vm<H> {
        let pc = image.entry("CO");
        let max_lines = mode.max_lines();
        Vm {
            image,
            mode,
            pc,
            line_buffer: String::new(),
            autoload_queue: VecDeque::new(),
            innum_queue: VecDeque::new(),
            expr_stack: Vec::new(),
            control_stack: Vec::new(),
            subroutine_stack: Vec::new(),
            program: vec![String::new(); max_lines],
            vars: vec![0; 26],
            var_widths: HashMap::new(),
            basic_linenum: 0,
            listing_range: ListingRange::All,
            quit: false,
            host,
        }
    }

    /// Seeds the autoload queue: lines `GETLN` drains before falling back
    /// to the interactive prompt.
    pub fn autoload(&mut self, lines: impl IntoIterator<Item = String>) {
        self.autoload_queue.extend(lines);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn basic_linenum(&self) -> usize {
        self.basic_linenum
    }

    pub fn has_quit(&self) -> bool {
        self.quit
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn variable(&self, index: usize) -> Cell {
        self.vars.get(index).copied().unwrap_or(0)
    }

    pub fn stored_line(&self, number: usize) -> &str {
        self.program
            .get(number)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// A user break clears `basic_linenum` and jumps to `ERRENT`, but
    /// leaves all three stacks untouched (a documented, accepted leak).
    pub fn interrupt(&mut self) {
        self.basic_linenum = 0;
        self.pc = self.image.entry("ERRENT");
    }

    /// `INIT`: cold-start reset of everything except the loaded image
    /// itself.
    pub(crate) fn reset_cold(&mut self) {
        self.line_buffer.clear();
        self.innum_queue.clear();
        self.program = vec![String::new(); self.mode.max_lines()];
        self.vars = vec![0; 26];
        self.var_widths.clear();
        self.expr_stack.clear();
        self.control_stack.clear();
        self.subroutine_stack.clear();
    }

    /// The expression, control and subroutine stacks are independent and
    /// never share entries. Every opcode that pops one goes through here
    /// so an empty pop surfaces as the invariant violation it is, rather
    /// than panicking.
    pub(crate) fn pop_expr(&mut self, who: &'static str) -> Result<Cell, VmFault> {
        self.expr_stack
            .pop()
            .ok_or(VmFault::StackUnderflow(who))
    }

    pub(crate) fn push_expr(&mut self, value: Cell) {
        self.expr_stack.push(value);
    }

    pub(crate) fn pop_control(&mut self) -> Result<usize, VmFault> {
        self.control_stack
            .pop()
            .ok_or(VmFault::StackUnderflow("control stack"))
    }

    pub(crate) fn pop_subroutine(&mut self) -> Result<Cell, VmFault> {
        self.subroutine_stack
            .pop()
            .ok_or(VmFault::StackUnderflow("subroutine stack"))
    }

    /// `XINIT`: the dispatch gate run at the top of every user-line
    /// dispatch.
    pub(crate) fn dispatch_gate(&mut self) {
        if self.line_buffer.trim().is_empty() {
            self.expr_stack.clear();
            self.control_stack.clear();
            self.subroutine_stack.clear();
            self.basic_linenum = 1;
            self.nxt();
        }
    }
}
