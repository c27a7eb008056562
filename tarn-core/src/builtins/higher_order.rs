// tarn-core - Higher-order built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Higher-order functions that re-enter application.

use tarn_parser::TarnVal;

use crate::context::CancelToken;
use crate::error::{Error, Result};
use crate::eval::apply;

/// (apply f & xs seq) - Call f with xs prepended to seq's elements
pub(crate) fn builtin_apply(args: &[TarnVal], token: &CancelToken) -> Result<TarnVal> {
    if args.len() < 2 {
        return Err(Error::arity_at_least("apply", 2, args.len()));
    }
    let last = &args[args.len() - 1];
    let tail = match last {
        TarnVal::Nil => Vec::new(),
        TarnVal::List(items, _) | TarnVal::Vector(items, _) => items.iter().cloned().collect(),
        other => return Err(Error::type_error_in("apply", "sequence", other.type_name())),
    };
    let mut call_args: Vec<TarnVal> = args[1..args.len() - 1].to_vec();
    call_args.extend(tail);
    apply(&args[0], &call_args, token)
}

/// (map f seq) - List of f applied to each element of seq
pub(crate) fn builtin_map(args: &[TarnVal], token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 2 {
        return Err(Error::arity_named("map", 2, args.len()));
    }
    let items = match &args[1] {
        TarnVal::Nil => return Ok(TarnVal::empty_list()),
        TarnVal::List(items, _) | TarnVal::Vector(items, _) => items,
        other => return Err(Error::type_error_in("map", "sequence", other.type_name())),
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(apply(&args[0], &[item.clone()], token)?);
    }
    Ok(TarnVal::list(out))
}
