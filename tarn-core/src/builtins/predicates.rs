// tarn-core - Type predicate built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Type predicates. `list?` and `vector?` distinguish the two sequence
//! kinds even though `=` treats them as sequential-equal.

use tarn_parser::{KEYWORD_PREFIX, TarnVal};

use crate::context::CancelToken;
use crate::error::{Error, Result};

fn check(
    name: &'static str,
    args: &[TarnVal],
    pred: impl Fn(&TarnVal) -> bool,
) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named(name, 1, args.len()));
    }
    Ok(TarnVal::Bool(pred(&args[0])))
}

/// (nil? x)
pub(crate) fn builtin_nil_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    check("nil?", args, TarnVal::is_nil)
}

/// (true? x)
pub(crate) fn builtin_true_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    check("true?", args, |v| matches!(v, TarnVal::Bool(true)))
}

/// (false? x)
pub(crate) fn builtin_false_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    check("false?", args, |v| matches!(v, TarnVal::Bool(false)))
}

/// (number? x)
pub(crate) fn builtin_number_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    check("number?", args, |v| matches!(v, TarnVal::Int(_)))
}

/// (string? x) - True for strings that are not keywords
pub(crate) fn builtin_string_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    check("string?", args, |v| {
        matches!(v, TarnVal::Str(s) if !s.starts_with(KEYWORD_PREFIX))
    })
}

/// (keyword? x)
pub(crate) fn builtin_keyword_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    check("keyword?", args, TarnVal::is_keyword)
}

/// (symbol? x)
pub(crate) fn builtin_symbol_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    check("symbol?", args, |v| matches!(v, TarnVal::Sym(_)))
}

/// (list? x)
pub(crate) fn builtin_list_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    check("list?", args, |v| matches!(v, TarnVal::List(_, _)))
}

/// (vector? x)
pub(crate) fn builtin_vector_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    check("vector?", args, |v| matches!(v, TarnVal::Vector(_, _)))
}

/// (map? x)
pub(crate) fn builtin_map_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    check("map?", args, |v| matches!(v, TarnVal::Map(_, _)))
}

/// (set? x)
pub(crate) fn builtin_set_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    check("set?", args, |v| matches!(v, TarnVal::Set(_, _)))
}

/// (sequential? x) - True for lists and vectors
pub(crate) fn builtin_sequential_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    check("sequential?", args, |v| v.as_seq().is_some())
}

/// (fn? x) - True for closures and builtins, but not macros
pub(crate) fn builtin_fn_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    check("fn?", args, |v| match v {
        TarnVal::NativeFn(_) => true,
        TarnVal::Fn(f) => !f.is_macro,
        _ => false,
    })
}

/// (macro? x)
pub(crate) fn builtin_macro_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    check("macro?", args, |v| {
        matches!(v, TarnVal::Fn(f) if f.is_macro)
    })
}

/// (atom? x)
pub(crate) fn builtin_atom_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    check("atom?", args, |v| matches!(v, TarnVal::Atom(_)))
}
