// tarn-core - Runtime and evaluator for the tarn programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # tarn-core
//!
//! Runtime and evaluator for the tarn programming language: lexically-scoped
//! environments, the trampolined evaluator, built-in functions, cooperative
//! cancellation and the read–eval–print façade.
//!
//! # Quick Start
//!
//! ```
//! use tarn_core::{CancelToken, Env, init_prelude, register_builtins, repl};
//!
//! let env = Env::new();
//! register_builtins(&env);
//! init_prelude(&env).unwrap();
//!
//! let token = CancelToken::new();
//! assert_eq!(repl(&env, "(+ 1 2)", &token).unwrap(), "3");
//! ```
//!
//! # Core Components
//!
//! - [`Env`] - Lexical environment for variable bindings
//! - [`eval`] - Trampolined evaluation of a `TarnVal` expression
//! - [`register_builtins`] - Register native functions
//! - [`init_prelude`] - Bind `eval` and load the source-level prelude
//! - [`repl`] / [`repl_position`] - read, evaluate and print one form

pub mod builtins;
pub mod context;
pub mod env;
pub mod error;
pub mod eval;

pub use builtins::register_builtins;
pub use context::CancelToken;
pub use env::Env;
pub use error::{Error, ErrorKind, Result};
pub use eval::{apply, eval, macroexpand, make_native_fn, quasiquote};

// Re-export parser types for convenience
pub use tarn_parser::{ParseError, Position, Symbol, TarnVal, pr_str};

use tarn_parser::AdHocHost;

/// `«Name args…»` reader forms resolve their constructor in an environment
/// and call the resulting builtin at read time.
impl AdHocHost for Env {
    fn construct(
        &self,
        name: &str,
        args: &[TarnVal],
        _cursor: &Position,
    ) -> std::result::Result<TarnVal, String> {
        let ctor = self.get(name).map_err(|e| e.to_string())?;
        match &ctor {
            TarnVal::NativeFn(_) => {
                apply(&ctor, args, &CancelToken::new()).map_err(|e| e.to_string())
            }
            other => Err(format!("'{}' is not a reader constructor", other.type_name())),
        }
    }
}

/// Read one top-level form from `source`, resolving `«…»` constructors in
/// `env`. `start` positions cursors relative to a host module.
pub fn read(source: &str, start: Option<&Position>, env: &Env) -> Result<TarnVal> {
    tarn_parser::read_str(source, start, Some(env as &dyn AdHocHost)).map_err(Error::from)
}

/// Print a value in its readable form.
#[must_use]
pub fn print(val: &TarnVal) -> String {
    pr_str(val, true)
}

/// Read, evaluate and print one form: the returned value is the printed
/// string so shells and tests can compare textually.
pub fn repl(env: &Env, source: &str, token: &CancelToken) -> Result<String> {
    let ast = read(source, None, env)?;
    let value = eval(&ast, env, token)?;
    Ok(print(&value))
}

/// [`repl`] with a starting cursor, for sources embedded in a host.
pub fn repl_position(
    env: &Env,
    source: &str,
    token: &CancelToken,
    start: &Position,
) -> Result<String> {
    let ast = read(source, Some(start), env)?;
    let value = eval(&ast, env, token)?;
    Ok(print(&value))
}

const PRELUDE_HOST_LANGUAGE: &str = r#"(def! *host-language* "rust")"#;
const PRELUDE_NOT: &str = "(def! not (fn* (a)
                                (if a
                                    false
                                    true)))";
const PRELUDE_LOAD_FILE: &str = r#"(def! load-file (fn* (f)
                            (eval
                                (read-string
                                    (str "(do " (slurp f) " nil)")))))"#;
const PRELUDE_COND: &str = "(defmacro! cond (fn* (& xs)
                        (if (> (count xs) 0)
                            (list
                                'if (first xs)
                                    (if (> (count xs) 1)
                                        (nth xs 1)
                                        (throw \"odd number of forms to cond\"))
                                    (cons 'cond (rest (rest xs)))))))";

/// Bind the host-provided `eval` symbol and evaluate the source-level
/// prelude (`not`, `load-file`, `cond`) in `env`.
///
/// The bound `eval` re-enters the evaluator with `env` as the base
/// environment, which is what meta-circular code such as `load-file` runs
/// against. Call after [`register_builtins`].
pub fn init_prelude(env: &Env) -> Result<()> {
    let base = env.clone();
    env.set(
        "eval",
        TarnVal::NativeFn(make_native_fn("eval", move |args, token| {
            eval(args.first().unwrap_or(&TarnVal::Nil), &base, token)
        })),
    );

    let token = CancelToken::new();
    let start = Position::in_module("tarn.prelude");
    for source in [
        PRELUDE_HOST_LANGUAGE,
        PRELUDE_NOT,
        PRELUDE_LOAD_FILE,
        PRELUDE_COND,
    ] {
        repl_position(env, source, &token, &start)?;
    }
    Ok(())
}
