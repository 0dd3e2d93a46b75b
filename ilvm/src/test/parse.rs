use super::{image_with, vm_with, FakeHost};
use crate::image::{Branch, ImageBuilder, UnresolvedInstruction};
use crate::state::Vm;
use crate::StepOutcome;

#[test]
fn tst_matches_literal_case_insensitively() {
    let mut vm = vm_with(vec![], FakeHost::new(&[]));
    vm.line_buffer = "PRINT 5".to_string();
    vm.tst(Branch::Fail, "print").unwrap();
    assert_eq!(vm.line_buffer, " 5");
}

#[test]
fn tst_fails_to_alternative_when_not_self_branch() {
    // TST at index 0 branches to CO (index 1) on failure: an ordinary
    // alternative, not exhaustion; it should land on CO, not ERRENT.
    let mut vm = vm_with(
        vec![UnresolvedInstruction::Tst {
            dest: "CO".to_string(),
            text: "LET".to_string(),
        }],
        FakeHost::new(&[]),
    );
    vm.pc = 0;
    vm.line_buffer = "PRINT 5".to_string();
    let outcome = vm.step().unwrap();
    assert_eq!(outcome, StepOutcome::Continue);
    assert_eq!(vm.pc(), 1); // CO's index
}

#[test]
fn tst_cr_against_empty_buffer_succeeds_without_consuming() {
    let mut vm = vm_with(vec![], FakeHost::new(&[]));
    vm.line_buffer = "".to_string();
    vm.tst(Branch::Fail, "\r").unwrap();
    assert_eq!(vm.line_buffer, "");
}

#[test]
fn tst_self_branch_prints_syntax_error_and_jumps_errent() {
    // Build an image by hand so the TST instruction's branch target
    // resolves to its own index (the "exhausted alternatives" case).
    let mut builder = ImageBuilder::new();
    builder.mark_label("SELF".to_string()).unwrap();
    builder.push(UnresolvedInstruction::Tst {
        dest: "SELF".to_string(),
        text: "LET".to_string(),
    });
    builder.mark_label("CO".to_string()).unwrap();
    builder.push(UnresolvedInstruction::Fin);
    builder.mark_label("XEC".to_string()).unwrap();
    builder.push(UnresolvedInstruction::Fin);
    builder.mark_label("ERRENT".to_string()).unwrap();
    builder.push(UnresolvedInstruction::Fin);
    let image = builder.finish().unwrap();

    let self_index = image.label("SELF").unwrap();
    let errent = image.label("ERRENT").unwrap();

    let mut vm = Vm::new(image, crate::Mode::TinyBasic, FakeHost::new(&[]));
    vm.pc = self_index;
    vm.basic_linenum = 10;
    vm.line_buffer = "PRINT 5".to_string();
    vm.step().unwrap();

    assert!(vm.host_mut().output.contains("Syntax error at line 10."));
    assert_eq!(vm.pc(), errent);
}

#[test]
fn tst_num_pushes_parsed_integer() {
    let mut vm = vm_with(vec![], FakeHost::new(&[]));
    vm.line_buffer = "123abc".to_string();
    vm.tst_num(Branch::Fail).unwrap();
    assert_eq!(vm.expr_stack, vec![123]);
    assert_eq!(vm.line_buffer, "abc");
}

#[test]
fn tst_num_empty_branches_away() {
    let mut vm = vm_with(vec![], FakeHost::new(&[]));
    vm.line_buffer = "abc".to_string();
    vm.tst_num(Branch::To(2)).unwrap();
    assert!(vm.expr_stack.is_empty());
    assert_eq!(vm.pc(), 2);
}

#[test]
fn tst_var_pushes_zero_based_index() {
    let mut vm = vm_with(vec![], FakeHost::new(&[]));
    vm.line_buffer = "Z rest".to_string();
    vm.tst_var(Branch::Fail).unwrap();
    assert_eq!(vm.expr_stack, vec![25]);
    assert_eq!(vm.line_buffer, " rest");
}

#[test]
fn tst_line_num_rejects_out_of_range() {
    let image = image_with(vec![]);
    let errent = image.label("ERRENT").unwrap();
    let mut vm = Vm::new(image, crate::Mode::TinyBasic, FakeHost::new(&[]));
    vm.line_buffer = "999 PRINT".to_string();
    vm.tst_line_num(Branch::Fail).unwrap();
    assert!(vm.host_mut().output.contains("Invalid line number."));
    assert_eq!(vm.pc(), errent);
}

#[test]
fn tst_line_num_accepts_in_range_without_consuming() {
    let mut vm = vm_with(vec![], FakeHost::new(&[]));
    vm.line_buffer = "10 PRINT".to_string();
    vm.tst_line_num(Branch::Fail).unwrap();
    assert_eq!(vm.line_buffer, "10 PRINT");
}

#[test]
fn done_with_blank_residual_falls_through() {
    let mut vm = vm_with(vec![], FakeHost::new(&[]));
    vm.line_buffer = "   ".to_string();
    let pc_before = vm.pc();
    vm.done().unwrap();
    assert_eq!(vm.pc(), pc_before);
}

#[test]
fn done_with_residual_is_syntax_error() {
    let image = image_with(vec![]);
    let errent = image.label("ERRENT").unwrap();
    let mut vm = Vm::new(image, crate::Mode::TinyBasic, FakeHost::new(&[]));
    vm.basic_linenum = 7;
    vm.line_buffer = "GARBAGE".to_string();
    vm.done().unwrap();
    assert!(vm.host_mut().output.contains("Syntax error at line 7."));
    assert_eq!(vm.pc(), errent);
}

#[test]
fn tbx_done_continues_on_dollar_separator() {
    let image = image_with(vec![]);
    let xec = image.label("XEC").unwrap();
    let mut vm = Vm::new(image, crate::Mode::Tbx, FakeHost::new(&[]));
    vm.line_buffer = "$ PRINT A".to_string();
    vm.done().unwrap();
    assert_eq!(vm.line_buffer, " PRINT A");
    assert_eq!(vm.pc(), xec);
}
