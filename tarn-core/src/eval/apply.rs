// tarn-core - Function application
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Function application for tarn.
//!
//! Closure application binds the parameter form into a child of the captured
//! environment and evaluates the body; the captured environment is stored
//! type-erased in the parser crate and downcast back here.

use std::any::Any;
use std::rc::Rc;

use tarn_parser::{TarnFn, TarnNativeFn, TarnVal};

use crate::context::CancelToken;
use crate::env::Env;
use crate::error::{Error, Result};
use crate::eval::eval;

/// Type alias for the native function signature: arguments plus the
/// cancellation token.
pub type NativeFnImpl = dyn Fn(&[TarnVal], &CancelToken) -> Result<TarnVal>;

/// Apply a function value to arguments.
///
/// Used for direct (non-tail) application: macro expansion, `swap!`, the
/// `apply` builtin. Tail calls of closures are handled by the evaluator loop
/// instead, which rebinds rather than recursing.
pub fn apply(func: &TarnVal, args: &[TarnVal], token: &CancelToken) -> Result<TarnVal> {
    match func {
        TarnVal::Fn(f) => apply_fn(f, args, token),
        TarnVal::NativeFn(f) => apply_native(f, args, token),
        _ => Err(Error::not_callable()),
    }
}

/// Apply a user-defined closure.
pub(crate) fn apply_fn(func: &TarnFn, args: &[TarnVal], token: &CancelToken) -> Result<TarnVal> {
    let captured = closure_env(func)?;
    let fn_env = Env::bind(&captured, &func.params, args)?;
    eval(&func.body, &fn_env, token)
}

/// Recover the closure's defining environment from its type-erased handle.
pub(crate) fn closure_env(func: &TarnFn) -> Result<Env> {
    func.env
        .downcast_ref::<Env>()
        .cloned()
        .ok_or_else(|| Error::eval("closure environment has invalid type"))
}

/// Apply a native function, polling the cancellation token first.
pub(crate) fn apply_native(
    func: &TarnNativeFn,
    args: &[TarnVal],
    token: &CancelToken,
) -> Result<TarnVal> {
    if token.is_cancelled() {
        return Err(Error::cancelled());
    }
    let f = func
        .func()
        .downcast_ref::<Rc<NativeFnImpl>>()
        .ok_or_else(|| Error::eval("native function has invalid type"))?;
    f(args, token)
}

/// Create a native function value.
pub fn make_native_fn(
    name: &'static str,
    func: impl Fn(&[TarnVal], &CancelToken) -> Result<TarnVal> + 'static,
) -> TarnNativeFn {
    let func_rc: Rc<NativeFnImpl> = Rc::new(func);
    let func_any: Rc<dyn Any> = Rc::new(func_rc);
    TarnNativeFn::new(name, func_any)
}
