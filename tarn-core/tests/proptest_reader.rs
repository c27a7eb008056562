// tarn-core - Property-based reader/printer tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Read/print round-trip properties for literal values.

mod common;

use common::rep;
use proptest::prelude::*;
use tarn_parser::{TarnVal, pr_str, read_str};

fn roundtrip(val: &TarnVal) -> TarnVal {
    let printed = pr_str(val, true);
    read_str(&printed, None, None)
        .unwrap_or_else(|e| panic!("could not re-read '{}': {}", printed, e))
}

proptest! {
    #[test]
    fn roundtrip_integers(n in any::<i64>()) {
        let val = TarnVal::Int(n);
        prop_assert_eq!(roundtrip(&val), val);
    }

    #[test]
    fn roundtrip_strings(
        s in any::<String>().prop_filter("keyword-prefixed strings print as keywords", |s| {
            !s.starts_with('\u{29e}')
        })
    ) {
        let val = TarnVal::string(s);
        prop_assert_eq!(roundtrip(&val), val);
    }

    #[test]
    fn roundtrip_keywords(name in "[a-z][a-z0-9-]*") {
        let val = TarnVal::keyword(&name);
        prop_assert_eq!(roundtrip(&val), val);
    }

    #[test]
    fn roundtrip_integer_lists(ns in proptest::collection::vec(any::<i64>(), 0..16)) {
        let val = TarnVal::list(ns.into_iter().map(TarnVal::Int).collect());
        prop_assert_eq!(roundtrip(&val), val);
    }

    #[test]
    fn quote_is_a_fixpoint(n in any::<i64>()) {
        // eval(quote x) = x for arbitrary x.
        let out = rep(&format!("(quote {})", n)).unwrap();
        prop_assert_eq!(out, n.to_string());
    }

    #[test]
    fn integer_literals_evaluate_to_themselves(n in any::<i64>()) {
        prop_assert_eq!(rep(&n.to_string()).unwrap(), n.to_string());
    }
}

#[test]
fn roundtrip_booleans_and_nil() {
    for val in [TarnVal::Nil, TarnVal::Bool(true), TarnVal::Bool(false)] {
        assert_eq!(roundtrip(&val), val);
    }
}
