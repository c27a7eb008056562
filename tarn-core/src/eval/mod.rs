// tarn-core - Trampolined evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Trampolined evaluator for tarn expressions.
//!
//! [`eval`] is a loop, not a recursion: tail positions (the body of `let*`,
//! the last form of `do`, the taken branch of `if`, the quasiquote rewrite
//! and the body of a closure call) rebind `ast`/`env` and continue, so
//! deeply chained self-calls run in constant host stack. Every iteration
//! polls the cancellation token first. Non-tail positions (argument
//! evaluation, builtin invocation, the protected expression of `try*`)
//! recurse normally.

mod apply;
mod macros;
mod quasiquote;
mod special_forms;

pub use apply::{NativeFnImpl, apply, make_native_fn};
pub use macros::macroexpand;
pub use quasiquote::quasiquote;

use tarn_parser::{TarnVal, Vector, pr_str};

use crate::context::CancelToken;
use crate::env::Env;
use crate::error::{Error, Result};

use apply::{apply_native, closure_env};

/// Evaluate a tarn expression in the given environment.
///
/// # Examples
///
/// ```
/// use tarn_core::{CancelToken, Env, eval, register_builtins};
/// use tarn_parser::{TarnVal, read_str};
///
/// let env = Env::new();
/// register_builtins(&env);
///
/// let expr = read_str("(+ 1 (* 2 3))", None, None).unwrap();
/// let result = eval(&expr, &env, &CancelToken::new()).unwrap();
/// assert_eq!(result, TarnVal::Int(7));
/// ```
///
/// # Errors
///
/// Returns an error when a symbol cannot be resolved, a form is applied
/// with the wrong shape or arity, a builtin fails, a `throw`n value goes
/// uncaught, or the cancellation token fires.
pub fn eval(ast: &TarnVal, env: &Env, token: &CancelToken) -> Result<TarnVal> {
    let mut ast = ast.clone();
    let mut env = env.clone();

    loop {
        if token.is_cancelled() {
            return Err(Error::cancelled());
        }

        if !matches!(ast, TarnVal::List(_, _)) {
            return eval_ast(&ast, &env, token);
        }

        if env.trace() {
            println!("> {}", pr_str(&ast, true));
        }

        ast = macroexpand(ast, &env, token)?;
        let items = match &ast {
            TarnVal::List(items, _) => items.clone(),
            _ => return eval_ast(&ast, &env, token),
        };
        if items.is_empty() {
            return Ok(ast);
        }

        let head = match &items[0] {
            TarnVal::Sym(sym) => sym.name(),
            _ => "",
        };
        match head {
            "def!" => return special_forms::eval_def(&items, &ast, &env, token, false),
            "defmacro!" => return special_forms::eval_def(&items, &ast, &env, token, true),
            "quote" => return Ok(items.get(1).cloned().unwrap_or(TarnVal::Nil)),
            "quasiquoteexpand" => {
                return Ok(quasiquote(items.get(1).cloned().unwrap_or(TarnVal::Nil)));
            }
            "quasiquote" => {
                ast = quasiquote(items.get(1).cloned().unwrap_or(TarnVal::Nil));
            }
            "macroexpand" => {
                return macroexpand(items.get(1).cloned().unwrap_or(TarnVal::Nil), &env, token);
            }
            "fn*" => return special_forms::eval_fn(&items, &ast, &env),
            "try*" => return special_forms::eval_try(&items, &env, token),
            "context*" => return special_forms::eval_context(&items, &env, token),
            "trace" => return special_forms::eval_trace(&items, &env, token),
            "let*" => {
                let binds_form = items.get(1).cloned().unwrap_or(TarnVal::Nil);
                let binds = match binds_form.as_seq() {
                    Some(binds) => binds.clone(),
                    None => {
                        return Err(Error::syntax("let*", "bindings must be a list or vector")
                            .with_cursor(ast.cursor()));
                    }
                };
                if binds.len() % 2 != 0 {
                    return Err(Error::syntax("let*", "odd elements on binding vector")
                        .with_cursor(binds_form.cursor().or(ast.cursor())));
                }
                let let_env = env.child();
                for pair in binds.iter().collect::<Vec<_>>().chunks(2) {
                    let name = match pair[0] {
                        TarnVal::Sym(sym) => sym.name().to_string(),
                        other => {
                            return Err(Error::syntax("let*", "non-symbol bind value")
                                .with_cursor(other.cursor().or(binds_form.cursor())));
                        }
                    };
                    let value = eval(pair[1], &let_env, token)?;
                    let_env.set(name, value);
                }
                if items.len() == 2 {
                    return Ok(TarnVal::Nil);
                }
                for form in items.iter().skip(2).take(items.len() - 3) {
                    eval(form, &let_env, token)?;
                }
                ast = items[items.len() - 1].clone();
                env = let_env;
            }
            "do" => {
                if items.len() == 1 {
                    return Ok(TarnVal::Nil);
                }
                for form in items.iter().skip(1).take(items.len() - 2) {
                    eval(form, &env, token)?;
                }
                ast = items[items.len() - 1].clone();
            }
            "if" => {
                let cond = eval(items.get(1).unwrap_or(&TarnVal::Nil), &env, token)?;
                if cond.is_truthy() {
                    ast = items.get(2).cloned().unwrap_or(TarnVal::Nil);
                } else if items.len() >= 4 {
                    ast = items[3].clone();
                } else {
                    return Ok(TarnVal::Nil);
                }
            }
            _ => {
                // Function application: evaluate the whole list, then either
                // rebind the trampoline (closure) or invoke directly (builtin).
                let call_cursor = items[0].cursor().or(ast.cursor()).cloned();
                let evaluated = eval_ast(&ast, &env, token)?;
                let elems = match evaluated.as_seq() {
                    Some(elems) => elems.clone(),
                    None => return Err(Error::not_callable().with_cursor(ast.cursor())),
                };
                let func = elems[0].clone();
                let args: Vec<TarnVal> = elems.iter().skip(1).cloned().collect();
                match func {
                    TarnVal::Fn(f) => {
                        let captured = closure_env(&f)?;
                        env = Env::bind(&captured, &f.params, &args)
                            .map_err(|e| e.with_cursor(call_cursor.as_ref()))?;
                        ast = f.body.clone();
                    }
                    TarnVal::NativeFn(f) => {
                        return apply_native(&f, &args, token)
                            .map_err(|e| e.with_cursor(call_cursor.as_ref()));
                    }
                    _ => {
                        return Err(Error::not_callable().with_cursor(ast.cursor()));
                    }
                }
            }
        }
    }
}

/// Structural evaluation of non-special-form values: symbols resolve in the
/// environment (lookup failures get the symbol's cursor), sequences and map
/// values evaluate elementwise, everything else evaluates to itself.
pub(crate) fn eval_ast(ast: &TarnVal, env: &Env, token: &CancelToken) -> Result<TarnVal> {
    match ast {
        TarnVal::Sym(sym) => env
            .get(sym.name())
            .map_err(|e| e.with_cursor(sym.cursor())),
        TarnVal::List(items, _) => Ok(TarnVal::List(eval_elements(items, env, token)?, None)),
        TarnVal::Vector(items, _) => {
            Ok(TarnVal::Vector(eval_elements(items, env, token)?, None))
        }
        TarnVal::Map(map, _) => {
            let mut evaluated = map.clone();
            for (key, value) in map.iter() {
                evaluated.insert(key.clone(), eval(value, env, token)?);
            }
            Ok(TarnVal::Map(evaluated, None))
        }
        _ => Ok(ast.clone()),
    }
}

fn eval_elements(
    items: &Vector<TarnVal>,
    env: &Env,
    token: &CancelToken,
) -> Result<Vector<TarnVal>> {
    let mut out = Vector::new();
    for item in items {
        out.push_back(eval(item, env, token)?);
    }
    Ok(out)
}
