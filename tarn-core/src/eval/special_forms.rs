// tarn-core - Non-tail special forms
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Special forms that return directly rather than rebinding the trampoline:
//! `def!`, `defmacro!`, `fn*`, `try*`/`catch*`, `context*` and `trace`.
//!
//! Host-language panics are converted to evaluation errors at the `try*`,
//! `context*` and `trace` boundaries so they never leak to the embedder.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use tarn_parser::{TarnFn, TarnVal, Vector};

use crate::context::CancelToken;
use crate::env::Env;
use crate::error::{Error, Result};
use crate::eval::eval;

/// `(def! s v)` / `(defmacro! s v)`: evaluate `v`, bind `s` in the current
/// frame, return the value. `defmacro!` requires a closure and rebinds a
/// copy with the macro flag set.
pub(crate) fn eval_def(
    items: &Vector<TarnVal>,
    ast: &TarnVal,
    env: &Env,
    token: &CancelToken,
    as_macro: bool,
) -> Result<TarnVal> {
    let value = eval(items.get(2).unwrap_or(&TarnVal::Nil), env, token)?;
    let value = if as_macro {
        match value {
            TarnVal::Fn(f) => TarnVal::Fn(Rc::new(f.to_macro())),
            other => {
                return Err(
                    Error::type_error_in("defmacro!", "fn", other.type_name())
                        .with_cursor(ast.cursor()),
                );
            }
        }
    } else {
        value
    };
    match items.get(1) {
        Some(TarnVal::Sym(sym)) => Ok(env.set(sym.name(), value)),
        other => {
            let got = other.map_or("nil", |v| v.type_name());
            Err(Error::eval(format!("cannot use '{}' as identifier", got))
                .with_cursor(ast.cursor()))
        }
    }
}

/// `(fn* params body)`: construct a closure capturing the current
/// environment.
pub(crate) fn eval_fn(items: &Vector<TarnVal>, ast: &TarnVal, env: &Env) -> Result<TarnVal> {
    let params = items.get(1).cloned().unwrap_or(TarnVal::Nil);
    if params.as_seq().is_none() {
        return Err(
            Error::syntax("fn*", "parameters must be a list or vector").with_cursor(ast.cursor())
        );
    }
    let body = items.get(2).cloned().unwrap_or(TarnVal::Nil);
    Ok(TarnVal::Fn(Rc::new(TarnFn {
        params,
        body,
        env: Rc::new(env.clone()),
        is_macro: false,
        meta: None,
        cursor: ast.cursor().cloned(),
    })))
}

/// `(try* e)` / `(try* e (catch* s handler))`: evaluate `e`; on a catchable
/// error with a catch clause present, bind `s` to the error's user-visible
/// value in a child environment and evaluate the handler.
pub(crate) fn eval_try(
    items: &Vector<TarnVal>,
    env: &Env,
    token: &CancelToken,
) -> Result<TarnVal> {
    let protected = items.get(1).cloned().unwrap_or(TarnVal::Nil);
    let result = eval_recovering(&protected, env, token);

    let err = match result {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };
    if !err.is_catchable() {
        return Err(err);
    }

    if let Some(TarnVal::List(clause, _)) = items.get(2)
        && matches!(clause.front(), Some(TarnVal::Sym(s)) if s.name() == "catch*")
    {
        if let (Some(TarnVal::Sym(bind)), Some(handler)) = (clause.get(1), clause.get(2)) {
            let catch_env = env.child();
            catch_env.set(bind.name(), err.catch_value());
            return eval(handler, &catch_env, token);
        }
        return Err(Error::syntax("catch*", "expected a binding symbol and a handler"));
    }
    Err(err)
}

/// `(context* e)`: evaluate `e` under a derived cancellation token that is
/// cancelled on return, success or failure.
pub(crate) fn eval_context(
    items: &Vector<TarnVal>,
    env: &Env,
    token: &CancelToken,
) -> Result<TarnVal> {
    if items.len() > 2 {
        return Err(Error::eval("context* does not allow more than one argument")
            .with_cursor(items[2].cursor()));
    }
    let body = items.get(1).cloned().unwrap_or(TarnVal::Nil);
    let child = token.child();
    let result = eval_recovering(&body, env, &child);
    child.cancel();
    result
}

/// `(trace e)`: evaluate `e` in a child environment with the trace flag set,
/// so the evaluator prints each form before reducing it.
pub(crate) fn eval_trace(
    items: &Vector<TarnVal>,
    env: &Env,
    token: &CancelToken,
) -> Result<TarnVal> {
    if items.len() > 2 {
        return Err(Error::eval("trace does not allow more than one argument")
            .with_cursor(items[2].cursor()));
    }
    let body = items.get(1).cloned().unwrap_or(TarnVal::Nil);
    let trace_env = env.child();
    trace_env.set_trace(true);
    eval_recovering(&body, &trace_env, token)
}

/// Evaluate, converting a host-language panic into an evaluation error.
fn eval_recovering(ast: &TarnVal, env: &Env, token: &CancelToken) -> Result<TarnVal> {
    catch_unwind(AssertUnwindSafe(|| eval(ast, env, token)))
        .unwrap_or_else(|panic| Err(Error::eval(panic_message(panic))))
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "panic during evaluation".to_string()
    }
}
