// tarn-core - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared helpers for tarn-core integration tests.
//!
//! Results compare as printed strings: `rep` and `rep_all` return the
//! readable form of the evaluated value, which is what the REPL façade
//! hands to shells.

#[allow(unused_imports)]
pub use tarn_core::{CancelToken, Env, Error, eval, init_prelude, register_builtins, repl};
#[allow(unused_imports)]
pub use tarn_parser::{Parser, Position, TarnVal, pr_str};

/// Create an environment with builtins and the prelude loaded.
#[allow(dead_code)]
#[must_use]
pub fn new_env() -> Env {
    let env = Env::new();
    register_builtins(&env);
    init_prelude(&env).expect("prelude should load");
    env
}

/// Read, evaluate and print a single form in a fresh environment.
#[allow(dead_code)]
pub fn rep(source: &str) -> Result<String, Error> {
    rep_with_env(source, &new_env())
}

/// Read, evaluate and print a single form in the given environment.
#[allow(dead_code)]
pub fn rep_with_env(source: &str, env: &Env) -> Result<String, Error> {
    repl(env, source, &CancelToken::new())
}

/// Evaluate every top-level form of `source` in the given environment and
/// print the last result.
#[allow(dead_code)]
pub fn rep_all(source: &str, env: &Env) -> Result<String, Error> {
    let token = CancelToken::new();
    let mut parser = Parser::new(source).map_err(Error::from)?.with_host(env);
    let mut last = TarnVal::Nil;
    while let Some(form) = parser.parse().map_err(Error::from)? {
        last = eval(&form, env, &token)?;
    }
    Ok(pr_str(&last, true))
}
