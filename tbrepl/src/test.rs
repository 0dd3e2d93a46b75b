//! End-to-end tests: assemble the bundled IL programs and drive them
//! through a scripted `HostIo`, round-tripping assembler output through
//! the VM. These exercise `ilasm` and `ilvm` together against the same
//! text the `--il` flag would otherwise read from disk.

use crate::{TBX_IL, TINYBASIC_IL};
use ilvm::{HostIo, Mode, Vm};
use std::collections::VecDeque;

struct FakeHost {
    input: VecDeque<String>,
    output: String,
}

impl FakeHost {
    fn new(lines: &[&str]) -> FakeHost {
        FakeHost {
            input: lines.iter().map(|s| s.to_string()).collect(),
            output: String::new(),
        }
    }
}

impl HostIo for FakeHost {
    fn read_line(&mut self, _prompt: &str) -> Option<String> {
        self.input.pop_front()
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }
}

fn run_lines(source: &str, mode: Mode, lines: &[&str]) -> String {
    let image = ilasm::assemble(source).expect("bundled IL assembles");
    let mut vm = Vm::new(image, mode, FakeHost::new(lines));
    vm.run().expect("bundled IL runs without a VM fault");
    vm.into_host().output
}

#[test]
fn arithmetic_let_and_print() {
    let output = run_lines(
        TINYBASIC_IL,
        Mode::TinyBasic,
        &["10 LET A=3", "20 PRINT A+4", "RUN"],
    );
    assert_eq!(output, "7\n");
}

#[test]
fn if_false_skips_to_the_next_stored_line() {
    let output = run_lines(
        TINYBASIC_IL,
        Mode::TinyBasic,
        &["10 IF 2 < 1 THEN PRINT 99", "20 PRINT 5", "RUN"],
    );
    assert_eq!(output, "5\n");
}

#[test]
fn if_true_runs_the_then_clause() {
    let output = run_lines(
        TINYBASIC_IL,
        Mode::TinyBasic,
        &["10 IF 1 < 2 THEN PRINT 99", "20 PRINT 5", "RUN"],
    );
    assert_eq!(output, "99\n5\n");
}

#[test]
fn gosub_returns_to_the_line_after_the_call() {
    let output = run_lines(
        TINYBASIC_IL,
        Mode::TinyBasic,
        &["10 GOSUB 100", "20 PRINT 1", "100 PRINT 2", "110 RETURN", "RUN"],
    );
    assert_eq!(output, "2\n1\n");
}

#[test]
fn goto_skips_the_intervening_line() {
    let output = run_lines(
        TINYBASIC_IL,
        Mode::TinyBasic,
        &["10 GOTO 30", "20 PRINT 1", "30 PRINT 2", "RUN"],
    );
    assert_eq!(output, "2\n");
}

#[test]
fn list_round_trips_a_stored_string_literal_line() {
    let output = run_lines(TINYBASIC_IL, Mode::TinyBasic, &["10 PRINT \"HI\"", "LIST"]);
    assert_eq!(output, " 10 PRINT \"HI\"\n");
}

#[test]
fn run_with_no_stored_program_reports_invalid_line_number() {
    let output = run_lines(TINYBASIC_IL, Mode::TinyBasic, &["RUN"]);
    assert_eq!(output, "Invalid line number.\n");
}

#[test]
fn goto_out_of_range_reports_invalid_line_number() {
    let output = run_lines(TINYBASIC_IL, Mode::TinyBasic, &["GOTO 0"]);
    assert_eq!(output, "Invalid line number.\n");
}

#[test]
fn division_by_zero_prints_the_tiny_basic_message() {
    let output = run_lines(TINYBASIC_IL, Mode::TinyBasic, &["PRINT 1/0"]);
    assert_eq!(output, "Division by zero.\n");
}

#[test]
fn tbx_dollar_separated_statements_share_one_line() {
    let output = run_lines(TBX_IL, Mode::Tbx, &["10 LET A=1 $ PRINT A", "RUN"]);
    assert_eq!(output, "1\n");
}

#[test]
fn tbx_array_assignment_and_read() {
    let output = run_lines(
        TBX_IL,
        Mode::Tbx,
        &["10 DIM A(3)", "20 LET A(2)=9", "30 PRINT A(2)", "RUN"],
    );
    assert_eq!(output, "9\n");
}

#[test]
fn tbx_division_by_zero_uses_the_numbered_error() {
    let output = run_lines(TBX_IL, Mode::Tbx, &["PRINT 1/0"]);
    assert_eq!(output, "Division by zero.\n");
}
