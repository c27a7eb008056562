// tarn-core - Collection built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Collection constructors and map operations.

use tarn_parser::{OrdMap, TarnVal};

use crate::context::CancelToken;
use crate::error::{Error, Result};

fn map_key(context: &'static str, val: &TarnVal) -> Result<String> {
    match val {
        TarnVal::Str(s) => Ok(s.to_string()),
        other => Err(Error::type_error_in(context, "string", other.type_name())),
    }
}

/// (list & xs) - List of the arguments
pub(crate) fn builtin_list(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    Ok(TarnVal::list(args.to_vec()))
}

/// (vector & xs) - Vector of the arguments
pub(crate) fn builtin_vector(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    Ok(TarnVal::vector(args.to_vec()))
}

/// (hash-map & kvs) - Map of the argument pairs; keys must be strings
pub(crate) fn builtin_hash_map(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() % 2 != 0 {
        return Err(Error::syntax("hash-map", "requires an even number of arguments"));
    }
    let mut map = OrdMap::new();
    for pair in args.chunks(2) {
        map.insert(map_key("hash-map", &pair[0])?, pair[1].clone());
    }
    Ok(TarnVal::Map(map, None))
}

/// (set & xs) - Set of the arguments
pub(crate) fn builtin_set(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    Ok(TarnVal::set(args.to_vec()))
}

/// (get m k) - Value at key k, or nil; nil maps are empty
pub(crate) fn builtin_get(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 2 {
        return Err(Error::arity_named("get", 2, args.len()));
    }
    match &args[0] {
        TarnVal::Nil => Ok(TarnVal::Nil),
        TarnVal::Map(map, _) => {
            let key = map_key("get", &args[1])?;
            Ok(map.get(&key).cloned().unwrap_or(TarnVal::Nil))
        }
        other => Err(Error::type_error_in("get", "hash-map", other.type_name())),
    }
}

/// (assoc m & kvs) - Map with the argument pairs added
pub(crate) fn builtin_assoc(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() < 3 || args.len() % 2 != 1 {
        return Err(Error::syntax("assoc", "requires a map and key/value pairs"));
    }
    let mut map = match &args[0] {
        TarnVal::Nil => OrdMap::new(),
        TarnVal::Map(map, _) => map.clone(),
        other => return Err(Error::type_error_in("assoc", "hash-map", other.type_name())),
    };
    for pair in args[1..].chunks(2) {
        map.insert(map_key("assoc", &pair[0])?, pair[1].clone());
    }
    Ok(TarnVal::Map(map, None))
}

/// (dissoc m & ks) - Map with the argument keys removed
pub(crate) fn builtin_dissoc(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.is_empty() {
        return Err(Error::arity_at_least("dissoc", 1, 0));
    }
    let mut map = match &args[0] {
        TarnVal::Map(map, _) => map.clone(),
        other => return Err(Error::type_error_in("dissoc", "hash-map", other.type_name())),
    };
    for key in &args[1..] {
        map.remove(&map_key("dissoc", key)?);
    }
    Ok(TarnVal::Map(map, None))
}

/// (keys m) - List of m's keys
pub(crate) fn builtin_keys(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("keys", 1, args.len()));
    }
    match &args[0] {
        TarnVal::Map(map, _) => Ok(TarnVal::list(
            map.keys().map(|k| TarnVal::string(k.as_str())).collect(),
        )),
        other => Err(Error::type_error_in("keys", "hash-map", other.type_name())),
    }
}

/// (vals m) - List of m's values
pub(crate) fn builtin_vals(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 1 {
        return Err(Error::arity_named("vals", 1, args.len()));
    }
    match &args[0] {
        TarnVal::Map(map, _) => Ok(TarnVal::list(map.values().cloned().collect())),
        other => Err(Error::type_error_in("vals", "hash-map", other.type_name())),
    }
}

/// (contains? coll k) - True when a map has key k or a set has member k
pub(crate) fn builtin_contains_p(args: &[TarnVal], _token: &CancelToken) -> Result<TarnVal> {
    if args.len() != 2 {
        return Err(Error::arity_named("contains?", 2, args.len()));
    }
    match &args[0] {
        TarnVal::Map(map, _) => {
            let key = map_key("contains?", &args[1])?;
            Ok(TarnVal::Bool(map.contains_key(&key)))
        }
        TarnVal::Set(items, _) => Ok(TarnVal::Bool(items.contains(&args[1]))),
        other => Err(Error::type_error_in(
            "contains?",
            "hash-map or set",
            other.type_name(),
        )),
    }
}
