// tarn-core - String and printing built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! String building, printing, and symbol/keyword construction.

use tarn_parser::{KEYWORD_PREFIX, Symbol, TarnVal, pr_str};

use crate::context::CancelToken;
use crate::error::{Error, Result};

fn join(args: &[TarnVal], readable: bool, separator: &str) -> String {
    args.iter()
        .map(|arg| pr_str(arg, readable))
        .collect::<Vec<_>>()
        .join(separator)
}

/// (str & xs) - Concatenation of the display forms of the arguments
pub(crate) fn builtin_str(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    Ok(TarnVal::string(join(args, false, "")))
}

/// (pr-str & xs) - Readable forms joined with spaces
pub(crate) fn builtin_pr_str(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    Ok(TarnVal::string(join(args, true, " ")))
}

/// (prn & xs) - Print readable forms to stdout, return nil
pub(crate) fn builtin_prn(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    println!("{}", join(args, true, " "));
    Ok(TarnVal::Nil)
}

/// (println & xs) - Print display forms to stdout, return nil
pub(crate) fn builtin_println(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    println!("{}", join(args, false, " "));
    Ok(TarnVal::Nil)
}

/// (symbol s) - Symbol named by the string s
pub(crate) fn builtin_symbol(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("symbol", 1, args.len()));
    }
    match &args[0] {
        TarnVal::Str(s) if !s.starts_with(KEYWORD_PREFIX) => {
            Ok(TarnVal::Sym(Symbol::new(s)))
        }
        TarnVal::Sym(_) => Ok(args[0].clone()),
        other => Err(Error::type_error_in("symbol", "string", other.type_name())),
    }
}

/// (keyword s) - Keyword named by the string s
pub(crate) fn builtin_keyword(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("keyword", 1, args.len()));
    }
    match &args[0] {
        TarnVal::Str(s) => match s.strip_prefix(KEYWORD_PREFIX) {
            Some(_) => Ok(args[0].clone()),
            None => Ok(TarnVal::keyword(s)),
        },
        other => Err(Error::type_error_in("keyword", "string", other.type_name())),
    }
}

/// (name x) - Bare name of a keyword, symbol or string
pub(crate) fn builtin_name(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("name", 1, args.len()));
    }
    match &args[0] {
        TarnVal::Str(s) => {
            let name = s.strip_prefix(KEYWORD_PREFIX).unwrap_or(s);
            Ok(TarnVal::string(name))
        }
        TarnVal::Sym(sym) => Ok(TarnVal::string(sym.name())),
        other => Err(Error::type_error_in(
            "name",
            "string, keyword or symbol",
            other.type_name(),
        )),
    }
}
