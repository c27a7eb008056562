// tarn-core - Atom integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for atom, deref, reset! and swap!.

mod common;

use common::{new_env, rep, rep_all, rep_with_env};

#[test]
fn test_spec_scenario_swap() {
    let env = new_env();
    assert_eq!(
        rep_all(
            "(def! a (atom 0))
             (swap! a (fn* (x) (+ x 1)))
             (deref a)",
            &env
        )
        .unwrap(),
        "1"
    );
}

#[test]
fn test_atom_prints_with_contents() {
    assert_eq!(rep("(atom 7)").unwrap(), "(atom 7)");
}

#[test]
fn test_deref_reader_macro() {
    let env = new_env();
    assert_eq!(rep_all("(def! a (atom 3)) @a", &env).unwrap(), "3");
}

#[test]
fn test_reset_returns_new_value() {
    let env = new_env();
    assert_eq!(rep_all("(def! a (atom 1)) (reset! a 9)", &env).unwrap(), "9");
    assert_eq!(rep_with_env("@a", &env).unwrap(), "9");
}

#[test]
fn test_swap_with_extra_arguments() {
    let env = new_env();
    assert_eq!(
        rep_all("(def! a (atom 10)) (swap! a + 1 2 3)", &env).unwrap(),
        "16"
    );
}

#[test]
fn test_atom_identity_not_structural() {
    assert_eq!(rep("(= (atom 1) (atom 1))").unwrap(), "false");
    let env = new_env();
    assert_eq!(
        rep_all("(def! a (atom 1)) (def! b a) (= a b)", &env).unwrap(),
        "true"
    );
}

#[test]
fn test_shared_atom_is_one_cell() {
    let env = new_env();
    assert_eq!(
        rep_all(
            "(def! a (atom 0))
             (def! b a)
             (reset! b 5)
             @a",
            &env
        )
        .unwrap(),
        "5"
    );
}

#[test]
fn test_atom_predicate() {
    assert_eq!(rep("(atom? (atom 1))").unwrap(), "true");
    assert_eq!(rep("(atom? 1)").unwrap(), "false");
}
