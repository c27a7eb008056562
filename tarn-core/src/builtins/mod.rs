// tarn-core - Built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Built-in functions for tarn.
//!
//! These are the bound symbols the core requires before user code runs:
//! arithmetic and comparison, the collection and sequence builders the
//! quasiquote rewrite depends on, printing, atoms, and `throw`. The `eval`
//! symbol is bound separately by the REPL façade, which closes over the
//! base environment.

mod arithmetic;
mod atoms;
mod collections;
mod exceptions;
mod higher_order;
mod io;
mod meta;
mod predicates;
mod sequences;
mod strings;

use tarn_parser::TarnVal;

use crate::context::CancelToken;
use crate::env::Env;
use crate::error::Result;
use crate::eval::make_native_fn;

use arithmetic::{
    builtin_add, builtin_div, builtin_eq, builtin_ge, builtin_gt, builtin_le, builtin_lt,
    builtin_mul, builtin_sub,
};
use atoms::{builtin_atom, builtin_deref, builtin_reset, builtin_swap};
use collections::{
    builtin_assoc, builtin_contains_p, builtin_dissoc, builtin_get, builtin_hash_map,
    builtin_keys, builtin_list, builtin_set, builtin_vals, builtin_vector,
};
use exceptions::builtin_throw;
use higher_order::{builtin_apply, builtin_map};
use io::{builtin_read_string, builtin_slurp};
use meta::{builtin_meta, builtin_with_meta};
use predicates::{
    builtin_atom_p, builtin_false_p, builtin_fn_p, builtin_keyword_p, builtin_list_p,
    builtin_macro_p, builtin_map_p, builtin_nil_p, builtin_number_p, builtin_sequential_p,
    builtin_set_p, builtin_string_p, builtin_symbol_p, builtin_true_p, builtin_vector_p,
};
use sequences::{
    builtin_concat, builtin_cons, builtin_count, builtin_empty_p, builtin_first, builtin_nth,
    builtin_rest, builtin_vec,
};
use strings::{
    builtin_keyword, builtin_name, builtin_pr_str, builtin_println, builtin_prn, builtin_str,
    builtin_symbol,
};

fn native(
    env: &Env,
    name: &'static str,
    f: fn(&[TarnVal], &CancelToken) -> Result<TarnVal>,
) {
    env.set(name, TarnVal::NativeFn(make_native_fn(name, f)));
}

/// Register all built-in functions into `env`.
pub fn register_builtins(env: &Env) {
    // Arithmetic and comparison
    native(env, "+", builtin_add);
    native(env, "-", builtin_sub);
    native(env, "*", builtin_mul);
    native(env, "/", builtin_div);
    native(env, "=", builtin_eq);
    native(env, "<", builtin_lt);
    native(env, "<=", builtin_le);
    native(env, ">", builtin_gt);
    native(env, ">=", builtin_ge);

    // Collection constructors and map operations
    native(env, "list", builtin_list);
    native(env, "vector", builtin_vector);
    native(env, "hash-map", builtin_hash_map);
    native(env, "set", builtin_set);
    native(env, "get", builtin_get);
    native(env, "assoc", builtin_assoc);
    native(env, "dissoc", builtin_dissoc);
    native(env, "keys", builtin_keys);
    native(env, "vals", builtin_vals);
    native(env, "contains?", builtin_contains_p);

    // Sequences
    native(env, "cons", builtin_cons);
    native(env, "concat", builtin_concat);
    native(env, "vec", builtin_vec);
    native(env, "first", builtin_first);
    native(env, "rest", builtin_rest);
    native(env, "nth", builtin_nth);
    native(env, "count", builtin_count);
    native(env, "empty?", builtin_empty_p);

    // Strings and printing
    native(env, "str", builtin_str);
    native(env, "pr-str", builtin_pr_str);
    native(env, "prn", builtin_prn);
    native(env, "println", builtin_println);
    native(env, "symbol", builtin_symbol);
    native(env, "keyword", builtin_keyword);
    native(env, "name", builtin_name);

    // Predicates
    native(env, "nil?", builtin_nil_p);
    native(env, "true?", builtin_true_p);
    native(env, "false?", builtin_false_p);
    native(env, "number?", builtin_number_p);
    native(env, "string?", builtin_string_p);
    native(env, "keyword?", builtin_keyword_p);
    native(env, "symbol?", builtin_symbol_p);
    native(env, "list?", builtin_list_p);
    native(env, "vector?", builtin_vector_p);
    native(env, "map?", builtin_map_p);
    native(env, "set?", builtin_set_p);
    native(env, "sequential?", builtin_sequential_p);
    native(env, "fn?", builtin_fn_p);
    native(env, "macro?", builtin_macro_p);
    native(env, "atom?", builtin_atom_p);

    // Atoms
    native(env, "atom", builtin_atom);
    native(env, "deref", builtin_deref);
    native(env, "reset!", builtin_reset);
    native(env, "swap!", builtin_swap);

    // Exceptions
    native(env, "throw", builtin_throw);

    // Metadata
    native(env, "meta", builtin_meta);
    native(env, "with-meta", builtin_with_meta);

    // Higher-order
    native(env, "apply", builtin_apply);
    native(env, "map", builtin_map);

    // I/O
    native(env, "slurp", builtin_slurp);
    native(env, "read-string", builtin_read_string);
}
