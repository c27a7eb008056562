// tarn-core - Environment for lexical scoping
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Environment for variable bindings with lexical scoping.
//!
//! Environments form a chain through outer references. Lookups walk the
//! chain outward; writes land in the current frame only. A frame is created
//! per function call and per `let*` / `catch*` / `trace` scope, and lives as
//! long as any closure captured within it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tarn_parser::TarnVal;

use crate::error::{Error, Result};

/// A lexical environment for variable bindings.
///
/// # Examples
///
/// ```
/// use tarn_core::Env;
/// use tarn_parser::TarnVal;
///
/// let env = Env::new();
/// env.set("x", TarnVal::Int(42));
/// assert_eq!(env.get("x").unwrap(), TarnVal::Int(42));
///
/// // Children inherit and can shadow parent bindings.
/// let child = env.child();
/// assert_eq!(child.get("x").unwrap(), TarnVal::Int(42));
/// child.set("x", TarnVal::Int(100));
/// assert_eq!(child.get("x").unwrap(), TarnVal::Int(100));
/// assert_eq!(env.get("x").unwrap(), TarnVal::Int(42));
/// ```
#[derive(Debug, Clone)]
pub struct Env {
    inner: Rc<RefCell<EnvInner>>,
}

#[derive(Debug)]
struct EnvInner {
    bindings: HashMap<String, TarnVal>,
    outer: Option<Env>,
    /// Trace flag; `None` defers to the nearest outer frame that sets it.
    trace: Option<bool>,
}

impl Env {
    /// Create a new root environment with no outer frame.
    #[must_use]
    pub fn new() -> Self {
        Env {
            inner: Rc::new(RefCell::new(EnvInner {
                bindings: HashMap::new(),
                outer: None,
                trace: None,
            })),
        }
    }

    /// Create a child environment with this environment as its outer frame.
    #[must_use]
    pub fn child(&self) -> Self {
        Env {
            inner: Rc::new(RefCell::new(EnvInner {
                bindings: HashMap::new(),
                outer: Some(self.clone()),
                trace: None,
            })),
        }
    }

    /// Create a child of `outer` with parameters bound to arguments.
    ///
    /// `binds` is a list or vector of symbols; each pulls the positional
    /// value from `exprs`. A `&` symbol makes the binding variadic: the
    /// single symbol after it is bound to a list of all remaining `exprs`.
    pub fn bind(outer: &Env, binds: &TarnVal, exprs: &[TarnVal]) -> Result<Env> {
        let env = outer.child();
        let params = binds
            .as_seq()
            .ok_or_else(|| Error::type_error_in("function parameters", "sequence", binds.type_name()))?;

        let mut position = 0;
        let mut params_iter = params.iter();
        while let Some(param) = params_iter.next() {
            let name = match param {
                TarnVal::Sym(sym) => sym.name(),
                other => {
                    return Err(Error::type_error_in(
                        "function parameter",
                        "symbol",
                        other.type_name(),
                    )
                    .with_cursor(binds.cursor()));
                }
            };
            if name == "&" {
                let rest = match params_iter.next() {
                    Some(TarnVal::Sym(sym)) => sym.name(),
                    _ => {
                        return Err(Error::syntax("fn*", "expected one symbol after '&'")
                            .with_cursor(binds.cursor()));
                    }
                };
                let remaining: Vec<TarnVal> = exprs[position.min(exprs.len())..].to_vec();
                env.set(rest, TarnVal::list(remaining));
                return Ok(env);
            }
            match exprs.get(position) {
                Some(value) => {
                    env.set(name, value.clone());
                }
                None => {
                    return Err(Error::eval("not enough parameters").with_cursor(binds.cursor()));
                }
            }
            position += 1;
        }
        Ok(env)
    }

    /// Bind `name` in the current frame, returning the bound value.
    pub fn set(&self, name: impl Into<String>, val: TarnVal) -> TarnVal {
        self.inner.borrow_mut().bindings.insert(name.into(), val.clone());
        val
    }

    /// Find the nearest frame (this one or an ancestor) that defines `name`.
    /// Uses iterative traversal to avoid stack overflow on deep environments.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Env> {
        let mut current = self.clone();
        loop {
            let inner = current.inner.borrow();
            if inner.bindings.contains_key(name) {
                drop(inner);
                return Some(current);
            }
            let outer = inner.outer.clone();
            drop(inner);
            match outer {
                Some(o) => current = o,
                None => return None,
            }
        }
    }

    /// Look `name` up in this environment or the outer chain.
    pub fn get(&self, name: &str) -> Result<TarnVal> {
        let mut current = self.clone();
        loop {
            let inner = current.inner.borrow();
            if let Some(val) = inner.bindings.get(name) {
                return Ok(val.clone());
            }
            let outer = inner.outer.clone();
            drop(inner);
            match outer {
                Some(o) => current = o,
                None => return Err(Error::undefined(name)),
            }
        }
    }

    /// Delete `name` from the current frame.
    pub fn remove(&self, name: &str) -> Result<()> {
        match self.inner.borrow_mut().bindings.remove(name) {
            Some(_) => Ok(()),
            None => Err(Error::undefined(name)),
        }
    }

    /// Names bound in the current frame, for completion and introspection.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        self.inner.borrow().bindings.keys().cloned().collect()
    }

    /// Read the trace flag from the nearest frame that sets it.
    #[must_use]
    pub fn trace(&self) -> bool {
        let mut current = self.clone();
        loop {
            let inner = current.inner.borrow();
            if let Some(flag) = inner.trace {
                return flag;
            }
            let outer = inner.outer.clone();
            drop(inner);
            match outer {
                Some(o) => current = o,
                None => return false,
            }
        }
    }

    /// Set the trace flag on this frame only.
    pub fn set_trace(&self, on: bool) {
        self.inner.borrow_mut().trace = Some(on);
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tarn_parser::Symbol;

    fn sym(name: &str) -> TarnVal {
        TarnVal::Sym(Symbol::new(name))
    }

    #[test]
    fn test_set_and_get() {
        let env = Env::new();
        env.set("x", TarnVal::Int(42));
        assert_eq!(env.get("x").unwrap(), TarnVal::Int(42));
    }

    #[test]
    fn test_undefined_symbol_message() {
        let env = Env::new();
        let err = env.get("missing").unwrap_err();
        assert_eq!(err.to_string(), "'missing' not found");
    }

    #[test]
    fn test_child_inherits_and_shadows() {
        let parent = Env::new();
        parent.set("x", TarnVal::Int(42));

        let child = parent.child();
        assert_eq!(child.get("x").unwrap(), TarnVal::Int(42));

        child.set("x", TarnVal::Int(100));
        assert_eq!(child.get("x").unwrap(), TarnVal::Int(100));
        assert_eq!(parent.get("x").unwrap(), TarnVal::Int(42));
    }

    #[test]
    fn test_find_returns_defining_frame() {
        let parent = Env::new();
        parent.set("x", TarnVal::Int(1));
        let child = parent.child();

        assert!(child.find("x").is_some());
        assert!(child.find("y").is_none());
    }

    #[test]
    fn test_remove() {
        let env = Env::new();
        env.set("x", TarnVal::Int(1));
        env.remove("x").unwrap();
        assert!(env.get("x").is_err());
        assert!(env.remove("x").is_err());
    }

    #[test]
    fn test_bind_positional() {
        let outer = Env::new();
        let binds = TarnVal::list(vec![sym("a"), sym("b")]);
        let env = Env::bind(&outer, &binds, &[TarnVal::Int(1), TarnVal::Int(2)]).unwrap();
        assert_eq!(env.get("a").unwrap(), TarnVal::Int(1));
        assert_eq!(env.get("b").unwrap(), TarnVal::Int(2));
    }

    #[test]
    fn test_bind_variadic() {
        let outer = Env::new();
        let binds = TarnVal::list(vec![sym("a"), sym("&"), sym("rest")]);
        let env = Env::bind(
            &outer,
            &binds,
            &[TarnVal::Int(1), TarnVal::Int(2), TarnVal::Int(3)],
        )
        .unwrap();
        assert_eq!(env.get("a").unwrap(), TarnVal::Int(1));
        assert_eq!(
            env.get("rest").unwrap(),
            TarnVal::list(vec![TarnVal::Int(2), TarnVal::Int(3)])
        );
    }

    #[test]
    fn test_bind_variadic_with_no_remaining_args() {
        let outer = Env::new();
        let binds = TarnVal::list(vec![sym("&"), sym("rest")]);
        let env = Env::bind(&outer, &binds, &[]).unwrap();
        assert_eq!(env.get("rest").unwrap(), TarnVal::empty_list());
    }

    #[test]
    fn test_bind_too_few_arguments() {
        let outer = Env::new();
        let binds = TarnVal::list(vec![sym("a"), sym("b")]);
        let err = Env::bind(&outer, &binds, &[TarnVal::Int(1)]).unwrap_err();
        assert_eq!(err.to_string(), "not enough parameters");
    }

    #[test]
    fn test_trace_flag_inherited() {
        let parent = Env::new();
        assert!(!parent.trace());
        parent.set_trace(true);

        let child = parent.child();
        assert!(child.trace());

        child.set_trace(false);
        assert!(!child.trace());
        assert!(parent.trace());
    }

    #[test]
    fn test_symbols_lists_current_frame_only() {
        let parent = Env::new();
        parent.set("outer-name", TarnVal::Nil);
        let child = parent.child();
        child.set("inner-name", TarnVal::Nil);

        let names = child.symbols();
        assert!(names.contains(&"inner-name".to_string()));
        assert!(!names.contains(&"outer-name".to_string()));
    }
}
