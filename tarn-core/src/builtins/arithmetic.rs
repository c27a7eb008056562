// tarn-core - Arithmetic built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integer arithmetic and comparison: + - * / = < <= > >=

use tarn_parser::TarnVal;

use crate::context::CancelToken;
use crate::error::{Error, Result};

fn require_int(context: &'static str, val: &TarnVal) -> Result<i64> {
    match val {
        TarnVal::Int(n) => Ok(*n),
        other => Err(Error::type_error_in(context, "int", other.type_name())),
    }
}

/// (+ & xs) - Sum of the arguments; 0 with no arguments
pub(crate) fn builtin_add(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    let mut acc: i64 = 0;
    for arg in args {
        let n = require_int("+", arg)?;
        acc = acc.checked_add(n).ok_or_else(|| Error::overflow("+"))?;
    }
    Ok(TarnVal::Int(acc))
}

/// (* & xs) - Product of the arguments; 1 with no arguments
pub(crate) fn builtin_mul(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    let mut acc: i64 = 1;
    for arg in args {
        let n = require_int("*", arg)?;
        acc = acc.checked_mul(n).ok_or_else(|| Error::overflow("*"))?;
    }
    Ok(TarnVal::Int(acc))
}

/// (- x & xs) - Subtraction; a single argument negates
pub(crate) fn builtin_sub(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.is_empty() {
        return Err(Error::arity_at_least("-", 1, 0));
    }
    let first = require_int("-", &args[0])?;
    if args.len() == 1 {
        return Ok(TarnVal::Int(
            first.checked_neg().ok_or_else(|| Error::overflow("-"))?,
        ));
    }
    let mut acc = first;
    for arg in &args[1..] {
        let n = require_int("-", arg)?;
        acc = acc.checked_sub(n).ok_or_else(|| Error::overflow("-"))?;
    }
    Ok(TarnVal::Int(acc))
}

/// (/ x & xs) - Integer division; a single argument divides 1
pub(crate) fn builtin_div(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.is_empty() {
        return Err(Error::arity_at_least("/", 1, 0));
    }
    let first = require_int("/", &args[0])?;
    let (mut acc, rest) = if args.len() == 1 {
        (1i64, &args[..])
    } else {
        (first, &args[1..])
    };
    for arg in rest {
        let n = require_int("/", arg)?;
        if n == 0 {
            return Err(Error::division_by_zero());
        }
        acc = acc.checked_div(n).ok_or_else(|| Error::overflow("/"))?;
    }
    Ok(TarnVal::Int(acc))
}

/// (= a b) - Structural equality; lists and vectors of equal elements are
/// equal
pub(crate) fn builtin_eq(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 2 {
        return Err(Error::arity_named("=", 2, args.len()));
    }
    Ok(TarnVal::Bool(args[0] == args[1]))
}

fn compare(
    name: &'static str,
    args: &[TarnVal],
    keep: impl Fn(std::cmp::Ordering) -> bool,
) -> Result<TarnVal> {
    if args.len() != 2 {
        return Err(Error::arity_named(name, 2, args.len()));
    }
    let a = require_int(name, &args[0])?;
    let b = require_int(name, &args[1])?;
    Ok(TarnVal::Bool(keep(a.cmp(&b))))
}

/// (< a b)
pub(crate) fn builtin_lt(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    compare("<", args, std::cmp::Ordering::is_lt)
}

/// (<= a b)
pub(crate) fn builtin_le(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    compare("<=", args, std::cmp::Ordering::is_le)
}

/// (> a b)
pub(crate) fn builtin_gt(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    compare(">", args, std::cmp::Ordering::is_gt)
}

/// (>= a b)
pub(crate) fn builtin_ge(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    compare(">=", args, std::cmp::Ordering::is_ge)
}
