use jack_compiler::{
    compile::{CodeGen, CompileConf},
    compile_class, compile_class_with, compile_str,
    error::{CodegenError, CompileError, LexError, ResolutionError},
    parse_str,
};
use std::collections::HashSet;

const POINT: &str = include_str!("Point.jack");
const SUM: &str = include_str!("Sum.jack");
const MAIN: &str = include_str!("Main.jack");

/// Lines of the named function, from its `function` line up to the next one.
fn function_body<'a>(text: &'a str, name: &str) -> Vec<&'a str> {
    let header = format!("function {name} ");
    text.lines()
        .skip_while(|line| !line.starts_with(&header))
        .enumerate()
        .take_while(|(i, line)| *i == 0 || !line.starts_with("function "))
        .map(|(_, line)| line)
        .collect()
}

#[test]
fn test_compile_main() {
    let text = compile_str(MAIN).unwrap();
    assert_eq!(
        text,
        "function Main.main 2
push constant 3
call String.new 1
push constant 97
call String.appendChar 2
push constant 60
call String.appendChar 2
push constant 98
call String.appendChar 2
pop local 0
push constant 90
pop local 1
push constant 1
push constant 2
push constant 3
call Math.multiply 2
add
call Output.printInt 1
pop temp 0
push local 0
call Output.printString 1
pop temp 0
push constant 0
return
"
    );
}

#[test]
fn test_compile_constructor() {
    let text = compile_str(POINT).unwrap();
    assert_eq!(
        function_body(&text, "Point.new"),
        vec![
            "function Point.new 0",
            "push constant 2",
            "call Memory.alloc 1",
            "pop pointer 0",
            "push argument 0",
            "pop this 0",
            "push argument 1",
            "pop this 1",
            "push static 0",
            "push constant 1",
            "add",
            "pop static 0",
            "push pointer 0",
            "return",
        ]
    );
}

#[test]
fn test_compile_methods() {
    let text = compile_str(POINT).unwrap();

    assert_eq!(
        function_body(&text, "Point.plus"),
        vec![
            "function Point.plus 0",
            "push argument 0",
            "pop pointer 0",
            "push this 0",
            "push argument 1",
            "call Point.getX 1",
            "add",
            "push this 1",
            "call Point.new 2",
            "return",
        ]
    );

    assert_eq!(
        function_body(&text, "Point.dispose"),
        vec![
            "function Point.dispose 0",
            "push argument 0",
            "pop pointer 0",
            "push pointer 0",
            "call Memory.deAlloc 1",
            "pop temp 0",
            "push constant 0",
            "return",
        ]
    );

    assert_eq!(
        function_body(&text, "Point.total"),
        vec!["function Point.total 0", "push static 0", "return"]
    );
}

#[test]
fn test_compile_control_flow() {
    let text = compile_str(SUM).unwrap();

    assert_eq!(
        function_body(&text, "Sum.sum"),
        vec![
            "function Sum.sum 2",
            "push constant 0",
            "pop local 0",
            "push constant 0",
            "pop local 1",
            "label WHILE_EXP0",
            "push local 0",
            "push argument 1",
            "lt",
            "not",
            "if-goto WHILE_END0",
            "push argument 0",
            "push local 0",
            "add",
            "pop pointer 1",
            "push that 0",
            "push constant 0",
            "gt",
            "if-goto IF_TRUE0",
            "goto IF_FALSE0",
            "label IF_TRUE0",
            "push local 1",
            "push argument 0",
            "push local 0",
            "add",
            "pop pointer 1",
            "push that 0",
            "add",
            "pop local 1",
            "goto IF_END0",
            "label IF_FALSE0",
            "push argument 0",
            "push local 0",
            "add",
            "push constant 0",
            "pop temp 0",
            "pop pointer 1",
            "push temp 0",
            "pop that 0",
            "label IF_END0",
            "push local 0",
            "push constant 1",
            "add",
            "pop local 0",
            "goto WHILE_EXP0",
            "label WHILE_END0",
            "push local 1",
            "return",
        ]
    );

    // Counters restart for every subroutine.
    assert_eq!(
        function_body(&text, "Sum.twice"),
        vec![
            "function Sum.twice 0",
            "push constant 0",
            "not",
            "if-goto IF_TRUE0",
            "goto IF_FALSE0",
            "label IF_TRUE0",
            "call Sum.twice 0",
            "pop temp 0",
            "label IF_FALSE0",
            "label WHILE_EXP0",
            "push constant 0",
            "not",
            "if-goto WHILE_END0",
            "goto WHILE_EXP0",
            "label WHILE_END0",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn test_labels_unique_within_subroutine() {
    let source = "class L { function void f() {
        if (true) { if (false) { } else { while (true) { } } }
        while (false) { if (true) { } }
        return;
    } }";
    let text = compile_class(source).unwrap();

    let labels: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("label "))
        .collect();
    let unique: HashSet<&str> = labels.iter().copied().collect();
    assert_eq!(labels.len(), unique.len(), "duplicate labels in {labels:?}");

    // Outer statements take their number before nested ones.
    assert_eq!(
        &labels[..3],
        &["IF_TRUE0", "IF_TRUE1", "IF_FALSE1"]
    );
}

#[test]
fn test_variable_receiver_uses_declared_type() {
    let source = "class C { function void f(Point p) { var Array a; do p.move(1); do a.dispose(); return; } }";
    let text = compile_class(source).unwrap();
    assert!(text.contains("push argument 0\npush constant 1\ncall Point.move 2\n"));
    assert!(text.contains("push local 0\ncall Array.dispose 1\n"));
}

#[test]
fn test_output_is_deterministic() {
    let first = compile_str(POINT).unwrap();
    let second = compile_str(POINT).unwrap();
    assert_eq!(first, second);

    let class = parse_str(POINT).unwrap();
    let codegen = CodeGen::new();
    assert_eq!(codegen.generate(&class).unwrap(), codegen.generate(&class).unwrap());
}

#[test]
fn test_without_implicit_return() {
    let source = "class E { function void f() { } }";
    assert_eq!(
        compile_class(source).unwrap(),
        "function E.f 0\npush constant 0\nreturn\n"
    );
    let conf = CompileConf {
        implicit_return: false,
    };
    assert_eq!(compile_class_with(source, conf).unwrap(), "function E.f 0\n");
}

#[test]
fn test_compile_errors() {
    let err = compile_class("class E { function void f() { let z = 1; return; } }").unwrap_err();
    assert_eq!(
        err,
        CompileError::Resolution(ResolutionError::Unresolved {
            name: "z".into(),
            subroutine: "f".into(),
        })
    );

    let err = compile_class("class E { field int a; static char a; }").unwrap_err();
    assert!(matches!(
        err,
        CompileError::Resolution(ResolutionError::Redeclared { .. })
    ));

    let err = compile_class("class E { function int f() { return this; } }").unwrap_err();
    assert!(matches!(
        err,
        CompileError::Codegen(CodegenError::NoReceiver { .. })
    ));

    let err = compile_class("class E { function void f(boolean b) { do b.flip(); return; } }")
        .unwrap_err();
    assert!(matches!(
        err,
        CompileError::Codegen(CodegenError::PrimitiveReceiver { .. })
    ));

    assert!(matches!(
        compile_class("class E { function void f() { return } }"),
        Err(CompileError::Parse(_))
    ));
    assert!(matches!(
        compile_str("class E { /* open"),
        Err(CompileError::Lex(_))
    ));
}

#[test]
fn test_char_literal_quote_before_comment() {
    let source = "class A { function void f() { var char c; let c = '\"'; // note\n return; } }";
    assert_eq!(
        compile_str(source).unwrap(),
        "function A.f 1\npush constant 34\npop local 0\npush constant 0\nreturn\n"
    );
}

#[test]
fn test_string_char_out_of_range() {
    let source = "class A { function void f() { do Output.printString(\"\u{1F600}\"); return; } }";
    let err = compile_str(source).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Lex(LexError::CharOutOfRange { c: '\u{1F600}', .. })
    ));

    // Characters up to the largest constant still compile.
    let source = "class A { function void f() { do Output.printString(\"\u{e9}\"); return; } }";
    let text = compile_str(source).unwrap();
    assert!(text.contains("push constant 1\ncall String.new 1\npush constant 233\n"));
}
