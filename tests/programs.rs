use std::fs;

use simplang::eval::RuntimeError;
use simplang::interpreter::{interpret, SimplangError};
use simplang::scanner::Scanner;
use simplang::token::TokenKind;

fn run_demo(name: &str, args: &[i64]) -> Result<i64, SimplangError> {
    let path = format!("{}/demos/{}", env!("CARGO_MANIFEST_DIR"), name);
    let src = fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path}: {e}"));
    interpret(&src, args)
}

#[test]
fn demo_programs() -> Result<(), SimplangError> {
    assert_eq!(run_demo("sum.sl", &[5])?, 15);
    assert_eq!(run_demo("fib.sl", &[10])?, 55);
    assert_eq!(run_demo("fib.sl", &[90])?, 2880067194370816120);
    assert_eq!(run_demo("gcd.sl", &[12, 18])?, 6);
    assert_eq!(run_demo("power.sl", &[2, 10])?, 1024);
    Ok(())
}

#[test]
fn operator_precedence() -> Result<(), SimplangError> {
    assert_eq!(interpret("let main x = 2+3*4 end", &[0])?, 14);
    Ok(())
}

#[test]
fn loop_runs_in_constant_stack() -> Result<(), SimplangError> {
    let src = r#"
        let main n =
            loop i = 0 in
                if i == n then i else recur(i + 1) end
            end
        end
    "#;
    assert_eq!(interpret(src, &[10_000_000])?, 10_000_000);
    Ok(())
}

#[test]
fn evaluation_is_deterministic() {
    let src = "let main a b = loop x = a in if b < x then x else recur(x * 2) end end end";
    let first = interpret(src, &[3, 1000]);
    for _ in 0..3 {
        assert_eq!(interpret(src, &[3, 1000]), first);
    }
    assert_eq!(first, Ok(1536));

    let bad = "let main a = loop x = a in 1 + recur(x) end end";
    let first = interpret(bad, &[1]);
    assert!(matches!(
        first,
        Err(SimplangError::Runtime(RuntimeError::RecurInBinary(_)))
    ));
    assert_eq!(interpret(bad, &[1]), first);
}

#[test]
fn escaping_recur_is_reported() {
    match interpret("let main n = recur(n) end", &[1]) {
        Err(e @ SimplangError::Runtime(RuntimeError::RecurEscapedFunction(..))) => {
            assert!(e.to_string().contains("recur appeared after function ended"))
        }
        r => panic!("unexpected output: {:?}", r),
    }
}

#[test]
fn scanner_reports_identifier_line() {
    let mut s = Scanner::new("let\n  x");
    assert_eq!(s.get_token().map(|t| t.kind), Ok(TokenKind::Let));
    match s.get_token() {
        Ok(t) if t.kind == TokenKind::Identifier => assert_eq!(t.pos.line, 2),
        r => panic!("unexpected output: {:?}", r),
    }
}
