use oleander::interp::{Interpreter, Program, Value};
use oleander::runtime::Runtime;

fn parse(runtime: &mut Interpreter, text: &str) -> Program {
    runtime
        .parse_text(text, false, "test.ol")
        .expect("unit should parse")
}

fn run(runtime: &mut Interpreter, text: &str) {
    let unit = parse(runtime, text);
    assert!(runtime.execute(&unit), "execution should succeed: {text}");
    runtime.release(unit);
}

fn run_err(runtime: &mut Interpreter, text: &str) {
    let unit = parse(runtime, text);
    assert!(!runtime.execute(&unit), "execution should fail: {text}");
    runtime.release(unit);
}

#[test]
fn evaluates_basic_arithmetic() {
    let mut runtime = Interpreter::new();
    run(&mut runtime, "x = 2 + 2");
    assert_eq!(runtime.global("x"), Some(&Value::Int(4)));
}

#[test]
fn applies_operator_precedence() {
    let mut runtime = Interpreter::new();
    run(&mut runtime, "a = 2 + 3 * 4");
    run(&mut runtime, "b = (2 + 3) * 4");
    run(&mut runtime, "c = 20 - 8 / 2");
    run(&mut runtime, "d = 7 % 3");
    assert_eq!(runtime.global("a"), Some(&Value::Int(14)));
    assert_eq!(runtime.global("b"), Some(&Value::Int(20)));
    assert_eq!(runtime.global("c"), Some(&Value::Int(16)));
    assert_eq!(runtime.global("d"), Some(&Value::Int(1)));
}

#[test]
fn negates_and_chains_unary_minus() {
    let mut runtime = Interpreter::new();
    run(&mut runtime, "x = -5 + 1");
    run(&mut runtime, "y = --3");
    assert_eq!(runtime.global("x"), Some(&Value::Int(-4)));
    assert_eq!(runtime.global("y"), Some(&Value::Int(3)));
}

#[test]
fn concatenates_text() {
    let mut runtime = Interpreter::new();
    run(&mut runtime, r#"s = "fox" + " " + "trot""#);
    assert_eq!(
        runtime.global("s"),
        Some(&Value::Text("fox trot".to_string()))
    );
}

#[test]
fn decodes_escapes_in_text_literals() {
    let mut runtime = Interpreter::new();
    run(&mut runtime, r#"s = "a\nb\t\"c\"""#);
    assert_eq!(
        runtime.global("s"),
        Some(&Value::Text("a\nb\t\"c\"".to_string()))
    );
}

#[test]
fn keeps_globals_across_units() {
    let mut runtime = Interpreter::new();
    run(&mut runtime, "x = 40");
    run(&mut runtime, "y = x + 2");
    assert_eq!(runtime.global("y"), Some(&Value::Int(42)));
}

#[test]
fn splits_statements_on_semicolons_and_skips_comments() {
    let mut runtime = Interpreter::new();
    run(&mut runtime, "# greeting\na = 1; b = a + 1\nc = b * 2");
    assert_eq!(runtime.global("b"), Some(&Value::Int(2)));
    assert_eq!(runtime.global("c"), Some(&Value::Int(4)));
}

#[test]
fn empty_units_execute_successfully() {
    let mut runtime = Interpreter::new();
    run(&mut runtime, "");
    run(&mut runtime, "\n\n");
}

#[test]
fn rejects_malformed_units() {
    let mut runtime = Interpreter::new();
    assert!(runtime.parse_text("say )(", false, "test.ol").is_none());
    assert!(runtime.parse_text("x = ", false, "test.ol").is_none());
    assert!(runtime.parse_text("\"open", false, "test.ol").is_none());
    assert!(runtime
        .parse_text("say 99999999999999999999", false, "test.ol")
        .is_none());
    assert!(runtime.parse_text("x = 1 2", false, "test.ol").is_none());
    assert!(runtime.parse_text("say 1 ??", false, "test.ol").is_none());
}

#[test]
fn reports_runtime_failures() {
    let mut runtime = Interpreter::new();
    run_err(&mut runtime, "say boom");
    run_err(&mut runtime, "x = 1 / 0");
    run_err(&mut runtime, "x = 1 % 0");
    run_err(&mut runtime, r#"y = "a" - 1"#);
    run_err(&mut runtime, r#"z = -"a""#);
    run_err(&mut runtime, "big = 9223372036854775807\nover = big + 1");
}

#[test]
fn execution_failure_leaves_earlier_assignments_visible() {
    let mut runtime = Interpreter::new();
    run_err(&mut runtime, "a = 5\nb = a / 0");
    assert_eq!(runtime.global("a"), Some(&Value::Int(5)));
    assert_eq!(runtime.global("b"), None);
}

#[test]
fn retains_source_buffer_in_compiled_units() {
    let mut runtime = Interpreter::new();
    let unit = parse(&mut runtime, "x = 1");
    assert_eq!(unit.label(), "test.ol");
    assert!(unit.source().starts_with(b"x = 1"));
    assert_eq!(unit.source().last(), Some(&0));
    runtime.release(unit);
}

#[test]
fn renders_structural_dump_with_debug_lines() {
    let mut runtime = Interpreter::new();
    let unit = runtime
        .parse_text("say 1 + 2 * 3\nx = 4", true, "dump.ol")
        .expect("unit should parse");
    let rendered = runtime.dump(&unit).expect("dump should render");
    assert!(rendered.contains("unit dump.ol"));
    assert!(rendered.contains("1| say (+ 1 (* 2 3))"));
    assert!(rendered.contains("2| x = 4"));
    runtime.release(unit);
}

#[test]
fn renders_structural_dump_without_lines_by_default() {
    let mut runtime = Interpreter::new();
    let unit = parse(&mut runtime, "say 1");
    let rendered = runtime.dump(&unit).expect("dump should render");
    assert!(rendered.contains("say 1"));
    assert!(!rendered.contains('|'));
    runtime.release(unit);
}
