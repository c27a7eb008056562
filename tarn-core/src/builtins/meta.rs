// tarn-core - Metadata built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Metadata access. The reader's `^m v` form rewrites to `(with-meta v m)`.

use tarn_parser::TarnVal;

use crate::context::CancelToken;
use crate::error::{Error, Result};

/// (meta x) - Metadata of x, or nil
pub(crate) fn builtin_meta(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("meta", 1, args.len()));
    }
    Ok(args[0].meta().unwrap_or(TarnVal::Nil))
}

/// (with-meta x m) - Copy of x carrying metadata m
pub(crate) fn builtin_with_meta(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 2 {
        return Err(Error::arity_named("with-meta", 2, args.len()));
    }
    args[0].with_meta(args[1].clone()).ok_or_else(|| {
        Error::type_error_in("with-meta", "collection or fn", args[0].type_name())
    })
}
