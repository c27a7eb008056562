// tarn-parser - Parser for tarn
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Recursive descent parser for tarn source code.
//!
//! Converts tokens into `TarnVal` AST nodes. Containers carry the cursor of
//! their opening delimiter, so an unterminated `(def …` reports the row of
//! the unmatched `(` rather than the end of input. `«Name …»` forms are
//! constructed at read time through an [`AdHocHost`] supplied by the
//! embedder.

use std::fmt;

use crate::lexer::{Lexer, LexerError, Token};
use crate::position::Position;
use crate::value::{Symbol, TarnVal};

/// Parser error with the cursor where parsing failed.
///
/// The `message` field is part of the REPL contract: an interactive shell
/// detects incomplete input by the `expected ')', got EOF` family of
/// messages (see [`ParseError::is_incomplete_input`]).
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub cursor: Position,
}

impl ParseError {
    fn at(message: impl Into<String>, cursor: Position) -> Self {
        ParseError {
            message: message.into(),
            cursor,
        }
    }

    /// True when the source was a syntactically valid prefix cut short by
    /// end of input, so a line editor should keep reading.
    #[must_use]
    pub fn is_incomplete_input(&self) -> bool {
        matches!(
            self.message.as_str(),
            "expected ')', got EOF"
                | "expected ']', got EOF"
                | "expected '}', got EOF"
                | "expected '»', got EOF"
                | "expected '\"', got EOF"
                | "expected '¬', got EOF"
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cursor.is_unknown() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.cursor, self.message)
        }
    }
}

impl std::error::Error for ParseError {}

impl From<LexerError> for ParseError {
    fn from(e: LexerError) -> Self {
        ParseError {
            message: e.message,
            cursor: e.cursor,
        }
    }
}

/// Read-time constructor lookup for `«Name args…»` forms.
///
/// The embedder resolves `Name` in its environment and applies the resulting
/// builtin to the already-parsed `args`, returning the constructed value or
/// an error message.
pub trait AdHocHost {
    fn construct(
        &self,
        name: &str,
        args: &[TarnVal],
        cursor: &Position,
    ) -> Result<TarnVal, String>;
}

/// The parser converts tokens into `TarnVal` AST nodes.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    current_pos: Position,
    host: Option<&'a dyn AdHocHost>,
}

impl<'a> Parser<'a> {
    /// Create a parser for the given source code.
    pub fn new(source: &'a str) -> Result<Self, ParseError> {
        Self::from_lexer(Lexer::new(source))
    }

    /// Create a parser whose cursors are relative to `start` (module name
    /// and starting row), for sources embedded in a host.
    pub fn positioned(source: &'a str, start: &Position) -> Result<Self, ParseError> {
        Self::from_lexer(Lexer::positioned(source, start))
    }

    fn from_lexer(mut lexer: Lexer<'a>) -> Result<Self, ParseError> {
        let current = lexer.next_token()?;
        let current_pos = lexer.token_position();
        Ok(Parser {
            lexer,
            current,
            current_pos,
            host: None,
        })
    }

    /// Install the read-time constructor host for `«…»` forms.
    #[must_use]
    pub fn with_host(mut self, host: &'a dyn AdHocHost) -> Self {
        self.host = Some(host);
        self
    }

    /// Parse a single form from the source.
    /// Returns None if at end of input.
    pub fn parse(&mut self) -> Result<Option<TarnVal>, ParseError> {
        if matches!(self.current, Token::Eof) {
            return Ok(None);
        }
        let val = self.parse_form()?;
        Ok(Some(val))
    }

    /// Parse all forms from the source.
    pub fn parse_all(&mut self) -> Result<Vec<TarnVal>, ParseError> {
        let mut forms = Vec::new();
        while let Some(form) = self.parse()? {
            forms.push(form);
        }
        Ok(forms)
    }

    /// True once every token has been consumed.
    #[must_use]
    pub fn at_eof(&self) -> bool {
        matches!(self.current, Token::Eof)
    }

    /// Cursor of the token about to be parsed.
    #[must_use]
    pub fn position(&self) -> Position {
        self.current_pos.clone()
    }

    // ========================================================================
    // Internal parsing methods
    // ========================================================================

    fn bump(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        let prev = std::mem::replace(&mut self.current, next);
        self.current_pos = self.lexer.token_position();
        Ok(prev)
    }

    fn parse_form(&mut self) -> Result<TarnVal, ParseError> {
        let pos = self.current_pos.clone();
        match &self.current {
            Token::Nil => {
                self.bump()?;
                Ok(TarnVal::Nil)
            }
            Token::True => {
                self.bump()?;
                Ok(TarnVal::Bool(true))
            }
            Token::False => {
                self.bump()?;
                Ok(TarnVal::Bool(false))
            }
            Token::Int(n) => {
                let n = *n;
                self.bump()?;
                Ok(TarnVal::Int(n))
            }
            Token::Str(s) => {
                let s = s.clone();
                self.bump()?;
                Ok(TarnVal::string(s))
            }
            Token::Keyword(name) => {
                let name = name.clone();
                self.bump()?;
                Ok(TarnVal::keyword(&name))
            }
            Token::Symbol(name) => {
                let name = name.clone();
                self.bump()?;
                Ok(TarnVal::Sym(Symbol::at(&name, pos)))
            }

            Token::LParen => self.parse_list(),
            Token::LBracket => self.parse_vector(),
            Token::LBrace => self.parse_map(),
            Token::OpenAdHoc => self.parse_adhoc(),

            Token::Quote => self.parse_reader_macro("quote"),
            Token::Quasiquote => self.parse_reader_macro("quasiquote"),
            Token::Unquote => self.parse_reader_macro("unquote"),
            Token::SpliceUnquote => self.parse_reader_macro("splice-unquote"),
            Token::Deref => self.parse_reader_macro("deref"),
            Token::Meta => self.parse_meta(),

            Token::RParen => Err(ParseError::at("unexpected ')'", pos)),
            Token::RBracket => Err(ParseError::at("unexpected ']'", pos)),
            Token::RBrace => Err(ParseError::at("unexpected '}'", pos)),
            Token::CloseAdHoc => Err(ParseError::at("unexpected '»'", pos)),
            Token::Eof => Err(ParseError::at("unexpected EOF", pos)),
        }
    }

    fn parse_list(&mut self) -> Result<TarnVal, ParseError> {
        let open = self.current_pos.clone();
        self.bump()?; // consume (
        let mut elements = Vec::new();

        loop {
            match self.current {
                Token::RParen => {
                    self.bump()?;
                    return Ok(TarnVal::list_at(elements, open));
                }
                Token::Eof => return Err(ParseError::at("expected ')', got EOF", open)),
                _ => elements.push(self.parse_form()?),
            }
        }
    }

    fn parse_vector(&mut self) -> Result<TarnVal, ParseError> {
        let open = self.current_pos.clone();
        self.bump()?; // consume [
        let mut elements = Vec::new();

        loop {
            match self.current {
                Token::RBracket => {
                    self.bump()?;
                    return Ok(TarnVal::vector_at(elements, open));
                }
                Token::Eof => return Err(ParseError::at("expected ']', got EOF", open)),
                _ => elements.push(self.parse_form()?),
            }
        }
    }

    fn parse_map(&mut self) -> Result<TarnVal, ParseError> {
        let open = self.current_pos.clone();
        self.bump()?; // consume {
        let mut forms = Vec::new();

        loop {
            match self.current {
                Token::RBrace => {
                    self.bump()?;
                    break;
                }
                Token::Eof => return Err(ParseError::at("expected '}', got EOF", open)),
                _ => forms.push(self.parse_form()?),
            }
        }

        if forms.len() % 2 != 0 {
            return Err(ParseError::at(
                "hash-map literal requires an even number of forms",
                open,
            ));
        }
        let mut pairs = Vec::with_capacity(forms.len() / 2);
        let mut iter = forms.into_iter();
        while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
            match key {
                TarnVal::Str(s) => pairs.push((s.to_string(), value)),
                _ => return Err(ParseError::at("expected hash-map key string", open)),
            }
        }
        Ok(TarnVal::map_at(pairs, open))
    }

    /// `«Name args…»`: look `Name` up in the host environment and call the
    /// resulting builtin with the parsed args. The lookup happens at read
    /// time, not eval time.
    fn parse_adhoc(&mut self) -> Result<TarnVal, ParseError> {
        let open = self.current_pos.clone();
        self.bump()?; // consume «

        let name = match &self.current {
            Token::Symbol(name) => name.clone(),
            other => {
                return Err(ParseError::at(
                    format!("expected constructor symbol after '«', got {}", other),
                    open,
                ));
            }
        };
        self.bump()?;

        let mut args = Vec::new();
        loop {
            match self.current {
                Token::CloseAdHoc => {
                    self.bump()?;
                    break;
                }
                Token::Eof => return Err(ParseError::at("expected '»', got EOF", open)),
                _ => args.push(self.parse_form()?),
            }
        }

        let host = self.host.ok_or_else(|| {
            ParseError::at(format!("unknown ad-hoc constructor '«{}»'", name), open.clone())
        })?;
        host.construct(&name, &args, &open)
            .map_err(|message| ParseError::at(message, open))
    }

    /// `'x`, `` `x ``, `~x`, `~@x`, `@x` rewrite to `(<name> x)` with the
    /// macro token's cursor on both the symbol and the list.
    fn parse_reader_macro(&mut self, name: &str) -> Result<TarnVal, ParseError> {
        let pos = self.current_pos.clone();
        self.bump()?; // consume the macro token
        let form = self.parse_form()?;
        Ok(TarnVal::list_at(
            vec![TarnVal::Sym(Symbol::at(name, pos.clone())), form],
            pos,
        ))
    }

    /// `^m v` rewrites to `(with-meta v m)` — note the argument swap.
    fn parse_meta(&mut self) -> Result<TarnVal, ParseError> {
        let pos = self.current_pos.clone();
        self.bump()?; // consume ^
        let meta = self.parse_form()?;
        let value = self.parse_form()?;
        Ok(TarnVal::list_at(
            vec![
                TarnVal::Sym(Symbol::at("with-meta", pos.clone())),
                value,
                meta,
            ],
            pos,
        ))
    }
}

/// Read exactly one top-level form from `source`.
///
/// This is the reader contract the evaluator and REPL are built on: empty
/// input fails with `<empty line>`, and any tokens left over after the form
/// fail with `not all tokens where parsed` at the last token's cursor.
pub fn read_str(
    source: &str,
    start: Option<&Position>,
    host: Option<&dyn AdHocHost>,
) -> Result<TarnVal, ParseError> {
    let mut parser = match start {
        Some(pos) => Parser::positioned(source, pos)?,
        None => Parser::new(source)?,
    };
    if let Some(host) = host {
        parser = parser.with_host(host);
    }

    match parser.parse()? {
        None => Err(ParseError::at("<empty line>", parser.position())),
        Some(form) => {
            if parser.at_eof() {
                return Ok(form);
            }
            let mut last = parser.position();
            while !parser.at_eof() {
                last = parser.position();
                parser.bump()?;
            }
            Err(ParseError::at("not all tokens where parsed", last))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ForeignValue, TarnForeign};
    use std::any::Any;

    fn read(s: &str) -> TarnVal {
        read_str(s, None, None).unwrap()
    }

    #[test]
    fn test_literals() {
        assert_eq!(read("nil"), TarnVal::Nil);
        assert_eq!(read("true"), TarnVal::Bool(true));
        assert_eq!(read("false"), TarnVal::Bool(false));
        assert_eq!(read("42"), TarnVal::Int(42));
        assert_eq!(read("\"hi\""), TarnVal::string("hi"));
        assert_eq!(read(":k"), TarnVal::keyword("k"));
    }

    #[test]
    fn test_collections() {
        assert_eq!(
            read("(1 2 3)"),
            TarnVal::list(vec![TarnVal::Int(1), TarnVal::Int(2), TarnVal::Int(3)])
        );
        assert_eq!(
            read("[1 2]"),
            TarnVal::vector(vec![TarnVal::Int(1), TarnVal::Int(2)])
        );
        assert_eq!(
            read("{\"a\" 1}"),
            TarnVal::map(vec![("a".to_string(), TarnVal::Int(1))])
        );
    }

    #[test]
    fn test_map_keyword_keys() {
        let m = read("{:a 1}");
        match m {
            TarnVal::Map(map, _) => {
                assert_eq!(map.get("\u{29e}a"), Some(&TarnVal::Int(1)));
            }
            _ => panic!("expected map"),
        }
    }

    #[test]
    fn test_map_rejects_non_string_keys() {
        let err = read_str("{1 2}", None, None).unwrap_err();
        assert_eq!(err.message, "expected hash-map key string");
    }

    #[test]
    fn test_map_rejects_odd_forms() {
        let err = read_str("{\"a\"}", None, None).unwrap_err();
        assert_eq!(err.message, "hash-map literal requires an even number of forms");
    }

    #[test]
    fn test_container_carries_opening_cursor() {
        let form = read("  (1 2)");
        assert_eq!(form.cursor(), Some(&Position::new(1, 3)));
    }

    #[test]
    fn test_nested_cursors_are_monotonic() {
        let form = read("(a\n  (b\n    c))");
        fn check(val: &TarnVal, parent: &Position) {
            if let Some(cursor) = val.cursor() {
                assert!(cursor >= parent, "{} < {}", cursor, parent);
            }
            if let Some(items) = val.as_seq() {
                let here = val.cursor().unwrap_or(parent).clone();
                for item in items {
                    check(item, &here);
                }
            }
        }
        check(&form, &Position::new(1, 1));
    }

    #[test]
    fn test_unterminated_list_reports_open_cursor() {
        let err = read_str("(def dec (fn (a) (- a 1))\n", None, None).unwrap_err();
        assert_eq!(err.message, "expected ')', got EOF");
        assert_eq!(err.cursor.row, 1);
        assert_eq!(err.cursor.col, 1);
        assert!(err.is_incomplete_input());
    }

    #[test]
    fn test_unterminated_vector_and_map() {
        let err = read_str("[1 2", None, None).unwrap_err();
        assert_eq!(err.message, "expected ']', got EOF");
        let err = read_str("{\"a\" 1", None, None).unwrap_err();
        assert_eq!(err.message, "expected '}', got EOF");
    }

    #[test]
    fn test_leftover_tokens() {
        let err = read_str("(+ 1 2) extra", None, None).unwrap_err();
        assert_eq!(err.message, "not all tokens where parsed");
        assert!(!err.is_incomplete_input());
    }

    #[test]
    fn test_leftover_tokens_report_last_token_cursor() {
        let err = read_str("(+ 1 2)\n\nleft over)", None, None).unwrap_err();
        assert_eq!(err.message, "not all tokens where parsed");
        assert_eq!(err.cursor.row, 3);
    }

    #[test]
    fn test_empty_input() {
        let err = read_str("  ; just a comment\n", None, None).unwrap_err();
        assert_eq!(err.message, "<empty line>");
    }

    #[test]
    fn test_quote_rewrites() {
        assert_eq!(
            read("'x"),
            TarnVal::list(vec![
                TarnVal::Sym(Symbol::new("quote")),
                TarnVal::Sym(Symbol::new("x")),
            ])
        );
        assert_eq!(
            read("`x"),
            TarnVal::list(vec![
                TarnVal::Sym(Symbol::new("quasiquote")),
                TarnVal::Sym(Symbol::new("x")),
            ])
        );
        assert_eq!(
            read("~x"),
            TarnVal::list(vec![
                TarnVal::Sym(Symbol::new("unquote")),
                TarnVal::Sym(Symbol::new("x")),
            ])
        );
        assert_eq!(
            read("~@x"),
            TarnVal::list(vec![
                TarnVal::Sym(Symbol::new("splice-unquote")),
                TarnVal::Sym(Symbol::new("x")),
            ])
        );
        assert_eq!(
            read("@a"),
            TarnVal::list(vec![
                TarnVal::Sym(Symbol::new("deref")),
                TarnVal::Sym(Symbol::new("a")),
            ])
        );
    }

    #[test]
    fn test_meta_rewrite_swaps_arguments() {
        assert_eq!(
            read("^{\"m\" 1} [2]"),
            TarnVal::list(vec![
                TarnVal::Sym(Symbol::new("with-meta")),
                TarnVal::vector(vec![TarnVal::Int(2)]),
                TarnVal::map(vec![("m".to_string(), TarnVal::Int(1))]),
            ])
        );
    }

    #[test]
    fn test_positioned_read() {
        let start = Position {
            module: Some(std::rc::Rc::from("embedded")),
            row: 0,
            col: 1,
        };
        let form = read_str("(do\nx)", Some(&start), None).unwrap();
        assert_eq!(form.cursor().map(|c| c.row), Some(0));
        assert_eq!(form.cursor().and_then(|c| c.module.as_deref()), Some("embedded"));
        let items = form.as_seq().unwrap();
        assert_eq!(items[1].cursor().map(|c| c.row), Some(1));
    }

    // A tiny host used to exercise read-time «…» construction.
    #[derive(Debug)]
    struct Example {
        n: i64,
    }

    impl ForeignValue for Example {
        fn type_name(&self) -> &'static str {
            "example"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn lisp_print(&self, pr: &dyn Fn(&TarnVal, bool) -> String) -> String {
            format!("«example {}»", pr(&TarnVal::Int(self.n), true))
        }
    }

    struct ExampleHost;

    impl AdHocHost for ExampleHost {
        fn construct(
            &self,
            name: &str,
            args: &[TarnVal],
            _cursor: &Position,
        ) -> Result<TarnVal, String> {
            if name != "example" {
                return Err(format!("'{}' not found", name));
            }
            match args {
                [TarnVal::Int(n)] => Ok(TarnVal::Foreign(TarnForeign::new(Example { n: *n }))),
                _ => Err("example: expected one integer".to_string()),
            }
        }
    }

    #[test]
    fn test_adhoc_construction_at_read_time() {
        let host = ExampleHost;
        let form = read_str("«example 33»", None, Some(&host)).unwrap();
        match form {
            TarnVal::Foreign(f) => {
                assert_eq!(f.type_name(), "example");
                assert_eq!(f.downcast_ref::<Example>().unwrap().n, 33);
            }
            other => panic!("expected foreign value, got {:?}", other),
        }
    }

    #[test]
    fn test_adhoc_without_host_fails() {
        let err = read_str("«example 33»", None, None).unwrap_err();
        assert_eq!(err.message, "unknown ad-hoc constructor '«example»'");
    }

    #[test]
    fn test_adhoc_unknown_name_fails() {
        let host = ExampleHost;
        let err = read_str("«mystery 1»", None, Some(&host)).unwrap_err();
        assert_eq!(err.message, "'mystery' not found");
    }
}
