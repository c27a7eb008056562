// tarn-parser - Reader and value model for the tarn programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # tarn-parser
//!
//! Reader and value model for the tarn programming language.
//! Produces `TarnVal` AST from source code strings, with a cursor attached
//! to every source-derived form, and prints values back out.

pub mod lexer;
pub mod parser;
pub mod position;
pub mod printer;
pub mod value;

pub use im::{OrdMap, OrdSet, Vector};
pub use lexer::{Lexer, LexerError, Token};
pub use parser::{AdHocHost, ParseError, Parser, read_str};
pub use position::Position;
pub use printer::pr_str;
pub use value::{
    ForeignValue, KEYWORD_PREFIX, SourceInfo, Symbol, TarnAtom, TarnFn, TarnForeign,
    TarnNativeFn, TarnVal,
};
