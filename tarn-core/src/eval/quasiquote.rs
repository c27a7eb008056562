// tarn-core - Quasiquote rewriting
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Quasiquote template rewriting.
//!
//! `(quasiquote x)` rewrites `x` into ordinary list-building code using
//! `cons`, `concat`, `vec` and `quote`, with `unquote` and `splice-unquote`
//! as holes. The evaluator then evaluates the rewritten form in tail
//! position; `quasiquoteexpand` exposes the rewrite without evaluating it.

use tarn_parser::{Symbol, TarnVal, Vector};

fn sym(name: &str) -> TarnVal {
    TarnVal::Sym(Symbol::new(name))
}

fn starts_with(items: &Vector<TarnVal>, name: &str) -> bool {
    matches!(items.front(), Some(TarnVal::Sym(s)) if s.name() == name)
}

/// Fold a sequence right-to-left into `cons`/`concat` chains.
fn qq_fold(items: &Vector<TarnVal>) -> TarnVal {
    let mut acc = TarnVal::empty_list();
    for elt in items.iter().rev() {
        if let TarnVal::List(inner, _) = elt
            && starts_with(inner, "splice-unquote")
        {
            let spliced = inner.get(1).cloned().unwrap_or(TarnVal::Nil);
            acc = TarnVal::list(vec![sym("concat"), spliced, acc]);
            continue;
        }
        acc = TarnVal::list(vec![sym("cons"), quasiquote(elt.clone()), acc]);
    }
    acc
}

/// Rewrite a quasiquote template.
pub fn quasiquote(ast: TarnVal) -> TarnVal {
    match &ast {
        TarnVal::List(items, _) => {
            if starts_with(items, "unquote") {
                items.get(1).cloned().unwrap_or(TarnVal::Nil)
            } else {
                qq_fold(items)
            }
        }
        // Vectors follow the list fold, wrapped so the result stays a vector.
        TarnVal::Vector(items, _) => TarnVal::list(vec![sym("vec"), qq_fold(items)]),
        TarnVal::Sym(_) | TarnVal::Map(_, _) => TarnVal::list(vec![sym("quote"), ast.clone()]),
        _ => ast,
    }
}
