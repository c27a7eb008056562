// tarn-core - Atom built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Atom operations: atom, deref, reset!, swap!
//!
//! Atoms are the one mutable value kind; `swap!` re-enters function
//! application with the caller's cancellation token.

use tarn_parser::{TarnAtom, TarnVal};

use crate::context::CancelToken;
use crate::error::{Error, Result};
use crate::eval::apply;

fn require_atom(context: &'static str, val: &TarnVal) -> Result<TarnAtom> {
    match val {
        TarnVal::Atom(a) => Ok(a.clone()),
        other => Err(Error::type_error_in(context, "atom", other.type_name())),
    }
}

/// (atom x) - Atom with initial value x
pub(crate) fn builtin_atom(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("atom", 1, args.len()));
    }
    Ok(TarnVal::atom(args[0].clone()))
}

/// (deref a) - Current value of the atom
pub(crate) fn builtin_deref(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("deref", 1, args.len()));
    }
    Ok(require_atom("deref", &args[0])?.deref())
}

/// (reset! a v) - Set the atom's value, returning v
pub(crate) fn builtin_reset(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 2 {
        return Err(Error::arity_named("reset!", 2, args.len()));
    }
    let atom = require_atom("reset!", &args[0])?;
    atom.set_value(args[1].clone());
    Ok(args[1].clone())
}

/// (swap! a f & xs) - Set the atom to (f current & xs), returning the new
/// value
pub(crate) fn builtin_swap(args: &[TarnVal], token: &CancelToken) -> Result<TarnVal> {
    if args.len() < 2 {
        return Err(Error::arity_at_least("swap!", 2, args.len()));
    }
    let atom = require_atom("swap!", &args[0])?;
    let mut call_args = vec![atom.deref()];
    call_args.extend_from_slice(&args[2..]);
    let new_val = apply(&args[1], &call_args, token)?;
    atom.set_value(new_val.clone());
    Ok(new_val)
}
