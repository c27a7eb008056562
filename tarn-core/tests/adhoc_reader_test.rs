// tarn-core - Ad-hoc reader form integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! `«Name args…»` forms resolve their constructor in the environment at
//! read time and print through the foreign value's own capability.

mod common;

use std::any::Any;

use common::{new_env, rep_with_env};
use tarn_core::{make_native_fn, read};
use tarn_parser::{ForeignValue, TarnForeign, TarnVal, pr_str};

#[derive(Debug)]
struct Example {
    n: i64,
    s: String,
}

impl ForeignValue for Example {
    fn type_name(&self) -> &'static str {
        "example"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn lisp_print(&self, pr: &dyn Fn(&TarnVal, bool) -> String) -> String {
        format!(
            "«example {} {}»",
            pr(&TarnVal::Int(self.n), true),
            pr(&TarnVal::string(self.s.as_str()), true)
        )
    }
}

fn env_with_example() -> common::Env {
    let env = new_env();
    env.set(
        "example",
        TarnVal::NativeFn(make_native_fn("example", |args, _token| {
            match args {
                [TarnVal::Int(n), TarnVal::Str(s)] => {
                    Ok(TarnVal::Foreign(TarnForeign::new(Example {
                        n: *n,
                        s: s.to_string(),
                    })))
                }
                _ => Err(tarn_core::Error::arity_named("example", 2, args.len())),
            }
        })),
    );
    env
}

#[test]
fn test_construction_happens_at_read_time() {
    let env = env_with_example();
    let form = read("«example 33 \"hello\"»", None, &env).unwrap();
    match &form {
        TarnVal::Foreign(f) => {
            let example = f.downcast_ref::<Example>().unwrap();
            assert_eq!(example.n, 33);
            assert_eq!(example.s, "hello");
        }
        other => panic!("expected foreign value, got {}", other.type_name()),
    }
}

#[test]
fn test_foreign_value_prints_via_capability() {
    let env = env_with_example();
    let form = read("«example 33 \"hello\"»", None, &env).unwrap();
    assert_eq!(pr_str(&form, true), "«example 33 \"hello\"»");
}

#[test]
fn test_foreign_value_is_self_evaluating() {
    let env = env_with_example();
    assert_eq!(
        rep_with_env("«example 1 \"x\"»", &env).unwrap(),
        "«example 1 \"x\"»"
    );
}

#[test]
fn test_unknown_constructor_fails_the_read() {
    let env = new_env();
    let err = read("«mystery 1»", None, &env).unwrap_err();
    assert!(err.to_string().contains("'mystery' not found"));
}

#[test]
fn test_constructor_must_be_a_builtin() {
    let env = new_env();
    env.set("not-a-fn", TarnVal::Int(3));
    let err = read("«not-a-fn 1»", None, &env).unwrap_err();
    assert!(err.to_string().contains("is not a reader constructor"));
}

#[test]
fn test_nested_construction() {
    let env = env_with_example();
    env.set(
        "boxed",
        TarnVal::NativeFn(make_native_fn("boxed", |args, _token| {
            Ok(TarnVal::list(args.to_vec()))
        })),
    );
    let form = read("«boxed «example 1 \"a\"» «example 2 \"b\"»»", None, &env).unwrap();
    assert_eq!(
        pr_str(&form, true),
        "(«example 1 \"a\"» «example 2 \"b\"»)"
    );
}
