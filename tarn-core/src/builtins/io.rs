// tarn-core - I/O built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! File and reader I/O: slurp, read-string.
//!
//! Blocking builtins respect the cancellation token: they check it before
//! doing work so a cancelled scope never starts new I/O.

use std::fs;

use tarn_parser::{TarnVal, read_str};

use crate::context::CancelToken;
use crate::error::{Error, Result};

/// (slurp path) - Contents of the file at path as a string
pub(crate) fn builtin_slurp(args: &[TarnVal], token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("slurp", 1, args.len()));
    }
    if token.is_cancelled() {
        return Err(Error::cancelled());
    }
    match &args[0] {
        TarnVal::Str(path) => fs::read_to_string(&**path)
            .map(TarnVal::string)
            .map_err(|e| Error::io("slurp", &**path, e)),
        other => Err(Error::type_error_in("slurp", "string", other.type_name())),
    }
}

/// (read-string s) - Read one form from the string s
pub(crate) fn builtin_read_string(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("read-string", 1, args.len()));
    }
    match &args[0] {
        TarnVal::Str(s) => read_str(s, None, None).map_err(Error::from),
        other => Err(Error::type_error_in(
            "read-string",
            "string",
            other.type_name(),
        )),
    }
}
