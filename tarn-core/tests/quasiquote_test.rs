// tarn-core - Quasiquote integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for quasiquote, unquote, splice-unquote and
//! quasiquoteexpand.

mod common;

use common::{new_env, rep, rep_all};

macro_rules! assert_rep {
    ($input:expr, $expected:expr) => {
        let result = rep($input);
        assert!(
            result.is_ok(),
            "Failed to evaluate '{}': {:?}",
            $input,
            result.err()
        );
        assert_eq!(
            result.unwrap(),
            $expected,
            "Evaluation of '{}' did not match expected",
            $input
        );
    };
}

#[test]
fn test_quasiquote_of_scalars() {
    assert_rep!("`7", "7");
    assert_rep!("`\"s\"", "\"s\"");
    assert_rep!("`sym", "sym");
}

#[test]
fn test_quasiquote_of_list_without_holes() {
    assert_rep!("`(1 2 3)", "(1 2 3)");
    assert_rep!("`(a b c)", "(a b c)");
}

#[test]
fn test_unquote() {
    assert_rep!("`(1 ~(+ 1 1) 3)", "(1 2 3)");
    let env = new_env();
    assert_eq!(
        rep_all("(def! x 9) `(a ~x)", &env).unwrap(),
        "(a 9)"
    );
}

#[test]
fn test_splice_unquote() {
    assert_rep!("`(1 ~@(list 2 3) 4)", "(1 2 3 4)");
    assert_rep!("`(~@(list) 1)", "(1)");
    assert_rep!("`(~@(list 1 2))", "(1 2)");
}

#[test]
fn test_spec_scenario_mixed_holes() {
    assert_rep!("`(1 ~(+ 1 1) ~@(list 3 4) 5)", "(1 2 3 4 5)");
}

#[test]
fn test_quasiquote_vector_wraps_with_vec() {
    assert_rep!("`[1 ~(+ 1 1) 3]", "[1 2 3]");
    assert_rep!("`[~@(list 1 2) 3]", "[1 2 3]");
    // Splice at the vector's tail follows the list rule, then vec-wraps.
    assert_rep!("`[1 ~@(list 2 3)]", "[1 2 3]");
}

#[test]
fn test_quasiquote_nested_vectors() {
    assert_rep!("`[1 [2 ~(+ 1 2)]]", "[1 [2 3]]");
}

#[test]
fn test_quasiquote_map_is_quoted() {
    assert_rep!("`{\"a\" b}", "{\"a\" b}");
}

#[test]
fn test_quasiquoteexpand_returns_rewrite() {
    assert_rep!(
        "(quasiquoteexpand (1 ~(+ 1 1)))",
        "(cons 1 (cons (+ 1 1) ()))"
    );
    assert_rep!(
        "(quasiquoteexpand (~@(list 1) 2))",
        "(concat (list 1) (cons 2 ()))"
    );
    assert_rep!("(quasiquoteexpand [1])", "(vec (cons 1 ()))");
    assert_rep!("(quasiquoteexpand x)", "(quote x)");
}

#[test]
fn test_quasiquote_in_macro_body() {
    let env = new_env();
    assert_eq!(
        rep_all(
            "(defmacro! unless2 (fn* (c t e) `(if ~c ~e ~t)))
             (unless2 false 1 2)",
            &env
        )
        .unwrap(),
        "1"
    );
}
