// tarn-core - Exception handling integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for throw, try* and catch*.

mod common;

use common::{new_env, rep, rep_all};

#[test]
fn test_spec_scenario_catch_payload() {
    assert_eq!(
        rep("(try* (throw {\"code\" 42}) (catch* e (get e \"code\")))").unwrap(),
        "42"
    );
}

#[test]
fn test_try_without_error_returns_value() {
    assert_eq!(rep("(try* (+ 1 2))").unwrap(), "3");
    assert_eq!(rep("(try* 7 (catch* e 0))").unwrap(), "7");
}

#[test]
fn test_uncaught_throw_propagates_payload() {
    let err = rep("(throw \"boo\")").unwrap_err();
    assert_eq!(err.catch_value(), common::TarnVal::string("boo"));
}

#[test]
fn test_throw_payload_can_be_any_value() {
    assert_eq!(
        rep("(try* (throw [1 2 3]) (catch* e (count e)))").unwrap(),
        "3"
    );
    assert_eq!(
        rep("(try* (throw 7) (catch* e (+ e 1)))").unwrap(),
        "8"
    );
}

#[test]
fn test_runtime_error_binds_message_string() {
    assert_eq!(
        rep("(try* missing-symbol (catch* e e))").unwrap(),
        "\"'missing-symbol' not found\""
    );
    assert_eq!(
        rep("(try* (/ 1 0) (catch* e e))").unwrap(),
        "\"division by zero\""
    );
}

#[test]
fn test_try_without_catch_rethrows() {
    let err = rep("(try* (throw \"inner\"))").unwrap_err();
    assert_eq!(err.catch_value(), common::TarnVal::string("inner"));
}

#[test]
fn test_catch_binding_is_scoped() {
    let env = new_env();
    assert_eq!(
        rep_all(
            "(def! e 1)
             (try* (throw 99) (catch* e e))
             e",
            &env
        )
        .unwrap(),
        "1"
    );
}

#[test]
fn test_handler_errors_propagate() {
    let err = rep("(try* (throw 1) (catch* e (throw 2)))").unwrap_err();
    assert_eq!(err.catch_value(), common::TarnVal::Int(2));
}

#[test]
fn test_nested_try() {
    assert_eq!(
        rep("(try* (try* (throw \"in\") (catch* a (throw \"out\"))) (catch* b b))")
            .unwrap(),
        "\"out\""
    );
}

#[test]
fn test_errors_in_called_functions_are_caught() {
    let env = new_env();
    assert_eq!(
        rep_all(
            "(def! boom (fn* () (throw \"from-fn\")))
             (try* (boom) (catch* e e))",
            &env
        )
        .unwrap(),
        "\"from-fn\""
    );
}
