// tarn-core - Cancellation integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Cancellation unwinds promptly, is not catchable, and `context*` scopes
//! derived tokens to the subexpression.

mod common;

use common::{CancelToken, new_env, rep_all};
use tarn_core::{ErrorKind, eval, repl};
use tarn_parser::read_str;

#[test]
fn test_cancelled_token_unwinds_immediately() {
    let env = new_env();
    let token = CancelToken::new();
    token.cancel();

    let err = repl(&env, "(+ 1 2)", &token).unwrap_err();
    assert_eq!(err.to_string(), "timeout while evaluating expression");
}

#[test]
fn test_cancellation_reaches_nested_evaluation() {
    let env = new_env();
    rep_all(
        "(def! spin (fn* (n) (if (= n 0) 0 (spin (- n 1)))))",
        &env,
    )
    .unwrap();

    let token = CancelToken::new();
    token.cancel();
    let ast = read_str("(spin 1000000)", None, None).unwrap();
    let err = eval(&ast, &env, &token).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Cancelled));
}

#[test]
fn test_cancellation_is_not_catchable() {
    let env = new_env();
    let token = CancelToken::new();
    token.cancel();

    let err = repl(&env, "(try* (+ 1 2) (catch* e \"caught\"))", &token).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Cancelled));
}

#[test]
fn test_context_scope_completes_normally() {
    let env = new_env();
    let token = CancelToken::new();
    assert_eq!(repl(&env, "(context* (+ 1 2))", &token).unwrap(), "3");
    // The parent token is untouched by the scope's exit cancellation.
    assert!(!token.is_cancelled());
    assert_eq!(repl(&env, "(+ 3 4)", &token).unwrap(), "7");
}

#[test]
fn test_context_inherits_parent_cancellation() {
    let env = new_env();
    let token = CancelToken::new();
    token.cancel();
    let err = repl(&env, "(context* (+ 1 2))", &token).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Cancelled));
}

#[test]
fn test_builtin_poll_point() {
    let env = new_env();
    let token = CancelToken::new();
    token.cancel();
    let ast = read_str("(slurp \"/nonexistent\")", None, None).unwrap();
    let err = eval(&ast, &env, &token).unwrap_err();
    // The token check fires before the I/O is attempted.
    assert!(matches!(err.kind(), ErrorKind::Cancelled));
}
