// tarn-core - Macro expansion
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Macro-call detection and expansion.
//!
//! A form is a macro call when it is a non-empty list whose head symbol
//! resolves, in the current environment, to a closure with the macro flag
//! set. Expansion applies the macro to the unevaluated tail and repeats
//! until the head no longer denotes a macro. Expansion runs in the caller's
//! environment; the macro's own closure environment is used only for the
//! macro body.

use std::rc::Rc;

use tarn_parser::{TarnFn, TarnVal};

use crate::context::CancelToken;
use crate::env::Env;
use crate::error::Result;
use crate::eval::apply::apply_fn;

/// The macro a form would invoke, when it is a macro call.
fn as_macro_call(ast: &TarnVal, env: &Env) -> Option<Rc<TarnFn>> {
    let items = match ast {
        TarnVal::List(items, _) if !items.is_empty() => items,
        _ => return None,
    };
    let sym = match &items[0] {
        TarnVal::Sym(sym) => sym,
        _ => return None,
    };
    env.find(sym.name())?;
    match env.get(sym.name()).ok()? {
        TarnVal::Fn(f) if f.is_macro => Some(f),
        _ => None,
    }
}

/// Expand macro calls at the head of `ast` to fixpoint.
///
/// The outermost form's cursor is copied onto any expansion result that does
/// not carry its own, so errors in expanded code still point at the call
/// site.
pub fn macroexpand(ast: TarnVal, env: &Env, token: &CancelToken) -> Result<TarnVal> {
    let mut ast = ast;
    while let Some(mac) = as_macro_call(&ast, env) {
        let args: Vec<TarnVal> = ast
            .as_seq()
            .map(|items| items.iter().skip(1).cloned().collect())
            .unwrap_or_default();
        let origin = ast.cursor().cloned();
        ast = apply_fn(&mac, &args, token)?;
        if ast.cursor().is_none()
            && let Some(cursor) = origin
        {
            ast = ast.with_cursor(cursor);
        }
    }
    Ok(ast)
}
