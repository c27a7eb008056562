// tarn-core - Exception built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! User-raised errors.

use tarn_parser::TarnVal;

use crate::context::CancelToken;
use crate::error::{Error, Result};

/// (throw x) - Raise x as a user error; `catch*` binds the raw payload
pub(crate) fn builtin_throw(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("throw", 1, args.len()));
    }
    Err(Error::thrown(args[0].clone()))
}
