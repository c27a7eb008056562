// tarn-core - Sequence built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Sequence operations: cons, concat, vec, first, rest, nth, count, empty?
//!
//! Quasiquote expansion depends on `cons`, `concat` and `vec` behaving as
//! the usual list builders.

use tarn_parser::{TarnVal, Vector};

use crate::context::CancelToken;
use crate::error::{Error, Result};

/// Sequence view of an argument; nil is the empty sequence.
fn seq_of(context: &'static str, val: &TarnVal) -> Result<Vector<TarnVal>> {
    match val {
        TarnVal::Nil => Ok(Vector::new()),
        TarnVal::List(items, _) | TarnVal::Vector(items, _) => Ok(items.clone()),
        other => Err(Error::type_error_in(context, "sequence", other.type_name())),
    }
}

/// (cons x seq) - List with x prepended to seq's elements
pub(crate) fn builtin_cons(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 2 {
        return Err(Error::arity_named("cons", 2, args.len()));
    }
    let mut items = seq_of("cons", &args[1])?;
    items.push_front(args[0].clone());
    Ok(TarnVal::List(items, None))
}

/// (concat & seqs) - List of all elements of the argument sequences
pub(crate) fn builtin_concat(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    let mut items = Vector::new();
    for arg in args {
        items.append(seq_of("concat", arg)?);
    }
    Ok(TarnVal::List(items, None))
}

/// (vec seq) - Vector with seq's elements
pub(crate) fn builtin_vec(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("vec", 1, args.len()));
    }
    Ok(TarnVal::Vector(seq_of("vec", &args[0])?, None))
}

/// (first seq) - First element, or nil when empty or nil
pub(crate) fn builtin_first(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("first", 1, args.len()));
    }
    let items = seq_of("first", &args[0])?;
    Ok(items.front().cloned().unwrap_or(TarnVal::Nil))
}

/// (rest seq) - List of all elements but the first; () when empty or nil
pub(crate) fn builtin_rest(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("rest", 1, args.len()));
    }
    let mut items = seq_of("rest", &args[0])?;
    if !items.is_empty() {
        items.pop_front();
    }
    Ok(TarnVal::List(items, None))
}

/// (nth seq i) - Element at index i; out of range is an error
pub(crate) fn builtin_nth(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 2 {
        return Err(Error::arity_named("nth", 2, args.len()));
    }
    let items = seq_of("nth", &args[0])?;
    let index = match &args[1] {
        TarnVal::Int(n) => *n,
        other => return Err(Error::type_error_in("nth", "int", other.type_name())),
    };
    if index < 0 || index as usize >= items.len() {
        return Err(Error::eval(format!(
            "nth: index {} out of range for sequence of length {}",
            index,
            items.len()
        )));
    }
    Ok(items[index as usize].clone())
}

/// (count x) - Number of elements; nil counts 0, strings count characters
pub(crate) fn builtin_count(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("count", 1, args.len()));
    }
    let count = match &args[0] {
        TarnVal::Nil => 0,
        TarnVal::List(items, _) | TarnVal::Vector(items, _) => items.len(),
        TarnVal::Map(map, _) => map.len(),
        TarnVal::Set(items, _) => items.len(),
        TarnVal::Str(s) => s.chars().count(),
        other => return Err(Error::type_error_in("count", "collection", other.type_name())),
    };
    Ok(TarnVal::Int(count as i64))
}

/// (empty? x) - True when x has no elements; nil is empty
pub(crate) fn builtin_empty_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("empty?", 1, args.len()));
    }
    let empty = match &args[0] {
        TarnVal::Nil => true,
        TarnVal::List(items, _) | TarnVal::Vector(items, _) => items.is_empty(),
        TarnVal::Map(map, _) => map.is_empty(),
        TarnVal::Set(items, _) => items.is_empty(),
        TarnVal::Str(s) => s.is_empty(),
        other => {
            return Err(Error::type_error_in("empty?", "collection", other.type_name()));
        }
    };
    Ok(TarnVal::Bool(empty))
}
