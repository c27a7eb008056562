// tarn-parser - Printer for tarn
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Printer producing readable and display forms of values.
//!
//! The readable form escapes strings and can be read back by the parser for
//! every literal value; the display form prints string contents raw. Foreign
//! values print through their [`ForeignValue::lisp_print`] capability, which
//! receives `pr_str` as a callback so nested foreign values recurse.
//!
//! [`ForeignValue::lisp_print`]: crate::value::ForeignValue::lisp_print

use std::fmt;

use crate::value::{KEYWORD_PREFIX, TarnVal};

/// Print a value. `readable` selects the escaped, re-readable form.
#[must_use]
pub fn pr_str(val: &TarnVal, readable: bool) -> String {
    match val {
        TarnVal::Nil => "nil".to_string(),
        TarnVal::Bool(b) => b.to_string(),
        TarnVal::Int(n) => n.to_string(),
        TarnVal::Str(s) => match s.strip_prefix(KEYWORD_PREFIX) {
            Some(name) => format!(":{}", name),
            None if readable => escape_string(s),
            None => s.to_string(),
        },
        TarnVal::Sym(sym) => sym.name().to_string(),
        TarnVal::List(items, _) => {
            format!("({})", join(items.iter(), readable))
        }
        TarnVal::Vector(items, _) => {
            format!("[{}]", join(items.iter(), readable))
        }
        TarnVal::Map(map, _) => {
            let body = map
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{} {}",
                        pr_str(&TarnVal::string(k.as_str()), readable),
                        pr_str(v, readable)
                    )
                })
                .collect::<Vec<_>>()
                .join(" ");
            format!("{{{}}}", body)
        }
        TarnVal::Set(items, _) => {
            format!("#{{{}}}", join(items.iter(), readable))
        }
        TarnVal::Atom(a) => format!("(atom {})", pr_str(&a.deref(), readable)),
        TarnVal::NativeFn(f) => format!("#<native-fn {}>", f.name()),
        TarnVal::Fn(f) if f.is_macro => "#<macro>".to_string(),
        TarnVal::Fn(_) => "#<fn>".to_string(),
        TarnVal::Foreign(f) => f.lisp_print(&pr_str),
    }
}

fn join<'a>(items: impl Iterator<Item = &'a TarnVal>, readable: bool) -> String {
    items
        .map(|item| pr_str(item, readable))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

impl fmt::Display for TarnVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pr_str(self, false))
    }
}

// ============================================================================
// Tests
// ============================================================================
