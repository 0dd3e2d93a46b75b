//! A `test/pest.rs` submodule of grammar-only checks, plus assemble-level
//! tests here that build a tiny IL program and inspect the resulting
//! `ilvm::Image`.


use crate::assemble;
use crate::Error;
use ilvm::image::Branch;
use ilvm::Instruction;

const MINIMAL: &str = "\
CO:   GETLN\n\
      IJMP XEC\n\
XEC:  FIN\n\
ERRENT: FIN\n\
";

#[test]
fn assembles_the_minimal_entry_points() {
    let image = assemble(MINIMAL).unwrap();
    assert_eq!(image.label("CO"), Some(0));
    assert_eq!(image.label("XEC"), Some(2));
    assert_eq!(image.label("ERRENT"), Some(3));
    assert_eq!(image.get(0), Some(&Instruction::GetLn));
    assert_eq!(image.get(1), Some(&Instruction::IJmp(2)));
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let source = "\
; a header comment\n\
\n\
CO: GETLN    ; read a line\n\
XEC: FIN\n\
ERRENT: FIN\n\
";
    let image = assemble(source).unwrap();
    assert_eq!(image.len(), 3);
}

#[test]
fn duplicate_labels_are_a_load_error() {
    let source = "\
CO: FIN\n\
CO: FIN\n\
XEC: FIN\n\
ERRENT: FIN\n\
";
    assert!(matches!(
        assemble(source),
        Err(Error::Build(ilvm::image::BuildError::DuplicateLabel(_)))
    ));
}

#[test]
fn missing_entry_point_is_a_load_error() {
    let source = "CO: FIN\nXEC: FIN\n";
    assert!(matches!(
        assemble(source),
        Err(Error::Build(ilvm::image::BuildError::MissingEntryPoint(
            "ERRENT"
        )))
    ));
}

#[test]
fn branch_to_self_resolves_to_fail() {
    let source = "\
CO: GETLN\n\
XEC: TST L1,'PRINT'\n\
L1: TSTN L1\n\
    FIN\n\
ERRENT: FIN\n\
";
    let image = assemble(source).unwrap();
    match image.get(2).unwrap() {
        Instruction::TstNum { dest } => assert_eq!(*dest, Branch::Fail),
        other => panic!("expected TstNum, got {:?}", other),
    }
}

#[test]
fn tst_accepts_an_ascii_code_operand_for_cr() {
    let source = "\
CO: TST ERRENT,13\n\
XEC: FIN\n\
ERRENT: FIN\n\
";
    let image = assemble(source).unwrap();
    match image.get(0).unwrap() {
        Instruction::Tst { text, .. } => assert_eq!(text, "\r"),
        other => panic!("expected Tst, got {:?}", other),
    }
}

#[test]
fn db_pseudo_op_extends_the_previous_tst_literal() {
    let source = "\
CO: TST ERRENT,'PRIN'\n\
    DB 'T'\n\
XEC: FIN\n\
ERRENT: FIN\n\
";
    let image = assemble(source).unwrap();
    match image.get(0).unwrap() {
        Instruction::Tst { text, .. } => assert_eq!(text, "PRINT"),
        other => panic!("expected Tst, got {:?}", other),
    }
}

#[test]
fn unknown_opcode_is_a_load_error() {
    let source = "CO: BOGUS\nXEC: FIN\nERRENT: FIN\n";
    assert!(matches!(
        assemble(source),
        Err(Error::UnknownOpcode { opcode, .. }) if opcode == "BOGUS"
    ));
}

#[test]
fn missing_operand_is_a_load_error() {
    let source = "CO: LIT\nXEC: FIN\nERRENT: FIN\n";
    assert!(matches!(
        assemble(source),
        Err(Error::MissingOperand { opcode, index: 0, .. }) if opcode == "LIT"
    ));
}

#[test]
fn label_only_line_attaches_to_the_next_instruction() {
    let source = "\
CO:\n\
    GETLN\n\
XEC: FIN\n\
ERRENT: FIN\n\
";
    let image = assemble(source).unwrap();
    assert_eq!(image.label("CO"), Some(0));
    assert_eq!(image.get(0), Some(&Instruction::GetLn));
}
