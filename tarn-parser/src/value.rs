// tarn-parser - Value types for tarn
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Core value type for tarn.
//!
//! `TarnVal` is the central enum representing all runtime values. Values are
//! structurally immutable and shared by reference counting; the only mutable
//! value kind is [`TarnAtom`]. Variants that can originate in source text
//! carry an optional [`Position`] cursor pointing at the first character of
//! the textual form that produced them.

use std::any::Any;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use im::{OrdMap, OrdSet, Vector};

use crate::position::Position;

/// Sentinel code point prefixed to the string form of keywords.
///
/// Keywords are ordinary string values whose text begins with this private
/// code point; they print with a leading `:` and compare under plain string
/// equality of the sentinel-prefixed form.
pub const KEYWORD_PREFIX: char = '\u{29e}';

// ============================================================================
// Symbols
// ============================================================================

/// An identifier, with the cursor of its source occurrence.
///
/// Equality, ordering and hashing consider the name only; two occurrences of
/// the same symbol at different source positions are the same symbol.
#[derive(Clone)]
pub struct Symbol {
    name: Rc<str>,
    cursor: Option<Position>,
}

impl Symbol {
    /// Create a symbol with no source position.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Symbol {
            name: Rc::from(name),
            cursor: None,
        }
    }

    /// Create a symbol carrying the cursor of its source occurrence.
    #[must_use]
    pub fn at(name: &str, cursor: Position) -> Self {
        Symbol {
            name: Rc::from(name),
            cursor: Some(cursor),
        }
    }

    /// Get the symbol's name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the cursor of the source occurrence, if any.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> Option<&Position> {
        self.cursor.as_ref()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.name)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Symbol {}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

// ============================================================================
// Source info for containers
// ============================================================================

/// Reader-attached information on a container form: the opening delimiter's
/// cursor and optional `with-meta` metadata. Neither affects equality.
#[derive(Debug, Clone, Default)]
pub struct SourceInfo {
    pub cursor: Option<Position>,
    pub meta: Option<TarnVal>,
}

impl SourceInfo {
    #[must_use]
    pub fn at(cursor: Position) -> Option<Rc<SourceInfo>> {
        Some(Rc::new(SourceInfo {
            cursor: Some(cursor),
            meta: None,
        }))
    }
}

// ============================================================================
// Atoms
// ============================================================================

/// The one mutable value kind: a shared, interior-mutable cell.
///
/// Equality and ordering are by cell identity, not contents.
#[derive(Clone)]
pub struct TarnAtom {
    value: Rc<RefCell<TarnVal>>,
}

impl TarnAtom {
    /// Create a new atom holding `value`.
    #[must_use]
    pub fn new(value: TarnVal) -> Self {
        TarnAtom {
            value: Rc::new(RefCell::new(value)),
        }
    }

    /// Get the current value (deref).
    #[inline]
    #[must_use]
    pub fn deref(&self) -> TarnVal {
        self.value.borrow().clone()
    }

    /// Replace the held value.
    #[inline]
    pub fn set_value(&self, new_val: TarnVal) {
        *self.value.borrow_mut() = new_val;
    }

    fn cell_addr(&self) -> usize {
        Rc::as_ptr(&self.value) as usize
    }
}

impl fmt::Debug for TarnAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({:?})", self.value.borrow())
    }
}

impl PartialEq for TarnAtom {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }
}

impl Eq for TarnAtom {}

impl PartialOrd for TarnAtom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TarnAtom {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cell_addr().cmp(&other.cell_addr())
    }
}

// ============================================================================
// Functions
// ============================================================================

/// A user-defined function (closure).
///
/// Stores the parameter form, the body expression and the defining
/// environment, type-erased to `Rc<dyn Any>` to avoid a circular dependency
/// on the evaluator crate (which downcasts it back to its `Env`).
///
/// Closures are immutable: `defmacro!` rebinds the name to a fresh copy with
/// the macro flag set rather than mutating in place.
pub struct TarnFn {
    /// Parameter form: a list or vector of symbols, possibly containing one
    /// `&` followed by a rest symbol.
    pub params: TarnVal,
    /// Body expression, evaluated in a child of the captured environment.
    pub body: TarnVal,
    /// Captured defining environment (type-erased).
    pub env: Rc<dyn Any>,
    /// Set only by `defmacro!`; macro calls receive arguments unevaluated.
    pub is_macro: bool,
    /// Optional metadata.
    pub meta: Option<TarnVal>,
    /// Cursor of the `fn*` form that produced the closure, if any.
    pub cursor: Option<Position>,
}

impl TarnFn {
    /// Copy of this closure with the macro flag set.
    #[must_use]
    pub fn to_macro(&self) -> TarnFn {
        TarnFn {
            params: self.params.clone(),
            body: self.body.clone(),
            env: Rc::clone(&self.env),
            is_macro: true,
            meta: self.meta.clone(),
            cursor: self.cursor.clone(),
        }
    }

    /// Copy of this closure with different metadata.
    #[must_use]
    pub fn with_meta(&self, meta: Option<TarnVal>) -> TarnFn {
        TarnFn {
            params: self.params.clone(),
            body: self.body.clone(),
            env: Rc::clone(&self.env),
            is_macro: self.is_macro,
            meta,
            cursor: self.cursor.clone(),
        }
    }
}

impl fmt::Debug for TarnFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_macro {
            write!(f, "#<macro>")
        } else {
            write!(f, "#<fn>")
        }
    }
}

/// A native (Rust) builtin: an opaque callable taking the argument slice and
/// the cancellation token.
///
/// The implementation is type-erased; the evaluator crate owns the concrete
/// function type and downcasts on application.
#[derive(Clone)]
pub struct TarnNativeFn {
    name: Rc<str>,
    func: Rc<dyn Any>,
    /// Optional metadata.
    pub meta: Option<Rc<TarnVal>>,
    /// Cursor, when the value was produced by a source form.
    pub cursor: Option<Position>,
}

impl TarnNativeFn {
    /// Create a native function with a type-erased implementation.
    pub fn new(name: impl Into<Rc<str>>, func: Rc<dyn Any>) -> Self {
        TarnNativeFn {
            name: name.into(),
            func,
            meta: None,
            cursor: None,
        }
    }

    /// Get the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the inner implementation reference.
    #[must_use]
    pub fn func(&self) -> &Rc<dyn Any> {
        &self.func
    }

    /// Copy with different metadata.
    #[must_use]
    pub fn with_meta(&self, meta: Option<TarnVal>) -> Self {
        TarnNativeFn {
            name: Rc::clone(&self.name),
            func: Rc::clone(&self.func),
            meta: meta.map(Rc::new),
            cursor: self.cursor.clone(),
        }
    }

    fn impl_addr(&self) -> usize {
        Rc::as_ptr(&self.func) as *const () as usize
    }
}

impl fmt::Debug for TarnNativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<native-fn {}>", self.name)
    }
}

impl PartialEq for TarnNativeFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

// ============================================================================
// Foreign values
// ============================================================================

/// Trait for embedding host-defined values as tarn values.
///
/// Foreign values are opaque to tarn code but can be produced by `«…»`
/// reader forms and passed through native functions. They provide their own
/// printed representation via [`ForeignValue::lisp_print`], which receives
/// the printer as a callback so nested foreign values recurse.
pub trait ForeignValue: fmt::Debug {
    /// Type name for display and error messages.
    fn type_name(&self) -> &'static str;

    /// Downcasting access to the underlying value.
    fn as_any(&self) -> &dyn Any;

    /// Readable representation. `pr` prints nested tarn values.
    fn lisp_print(&self, pr: &dyn Fn(&TarnVal, bool) -> String) -> String;
}

/// Wrapper holding a shared foreign value.
#[derive(Clone)]
pub struct TarnForeign {
    inner: Rc<dyn ForeignValue>,
}

impl TarnForeign {
    /// Wrap a foreign value.
    pub fn new<T: ForeignValue + 'static>(value: T) -> Self {
        TarnForeign {
            inner: Rc::new(value),
        }
    }

    /// Get the wrapped value's type name.
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    /// Attempt to downcast to a concrete type.
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    /// Readable representation, recursing through `pr`.
    #[must_use]
    pub fn lisp_print(&self, pr: &dyn Fn(&TarnVal, bool) -> String) -> String {
        self.inner.lisp_print(pr)
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }
}

impl fmt::Debug for TarnForeign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TarnForeign({:?})", &*self.inner)
    }
}

impl PartialEq for TarnForeign {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

// ============================================================================
// The value enum
// ============================================================================

/// The core value type for tarn.
///
/// A closed sum over every runtime value. Container payloads use the `im`
/// persistent collections, which share structure through internal reference
/// counts, so `TarnVal` itself stays cheap to clone and is passed by value.
/// Hash-map keys are always strings (keyword-strings allowed).
#[derive(Clone, Debug)]
pub enum TarnVal {
    /// The absent value; distinct from false
    Nil,
    /// Boolean true or false
    Bool(bool),
    /// Signed 64-bit integer
    Int(i64),
    /// Immutable string; keywords are strings prefixed with U+029E
    Str(Rc<str>),
    /// Identifier, with optional cursor
    Sym(Symbol),
    /// Ordered sequence, with cursor and optional metadata
    List(Vector<TarnVal>, Option<Rc<SourceInfo>>),
    /// Ordered sequence distinct from List for dispatch, but
    /// sequential-equal to a List of the same elements
    Vector(Vector<TarnVal>, Option<Rc<SourceInfo>>),
    /// String-keyed map; insertion order is not observable
    Map(OrdMap<String, TarnVal>, Option<Rc<SourceInfo>>),
    /// Unordered collection of values
    Set(OrdSet<TarnVal>, Option<Rc<SourceInfo>>),
    /// Heap-identity cell with interior mutability
    Atom(TarnAtom),
    /// Native (Rust) builtin
    NativeFn(TarnNativeFn),
    /// User-defined function (closure)
    Fn(Rc<TarnFn>),
    /// Host-defined value with a print capability
    Foreign(TarnForeign),
}

impl TarnVal {
    /// Create a string value.
    #[must_use]
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        TarnVal::Str(s.into())
    }

    /// Create a keyword value: a string prefixed with the keyword sentinel.
    #[must_use]
    pub fn keyword(name: &str) -> Self {
        TarnVal::Str(Rc::from(format!("{}{}", KEYWORD_PREFIX, name)))
    }

    /// Create a symbol value.
    #[must_use]
    pub fn symbol(sym: Symbol) -> Self {
        TarnVal::Sym(sym)
    }

    /// Create an empty list.
    #[inline]
    #[must_use]
    pub fn empty_list() -> Self {
        TarnVal::List(Vector::new(), None)
    }

    /// Create a list from elements.
    #[must_use]
    pub fn list(elements: Vec<TarnVal>) -> Self {
        TarnVal::List(elements.into_iter().collect(), None)
    }

    /// Create a list carrying the cursor of its opening delimiter.
    #[must_use]
    pub fn list_at(elements: Vec<TarnVal>, cursor: Position) -> Self {
        TarnVal::List(elements.into_iter().collect(), SourceInfo::at(cursor))
    }

    /// Create a vector from elements.
    #[must_use]
    pub fn vector(elements: Vec<TarnVal>) -> Self {
        TarnVal::Vector(elements.into_iter().collect(), None)
    }

    /// Create a vector carrying the cursor of its opening delimiter.
    #[must_use]
    pub fn vector_at(elements: Vec<TarnVal>, cursor: Position) -> Self {
        TarnVal::Vector(elements.into_iter().collect(), SourceInfo::at(cursor))
    }

    /// Create a map from string-keyed pairs.
    #[must_use]
    pub fn map(pairs: Vec<(String, TarnVal)>) -> Self {
        TarnVal::Map(pairs.into_iter().collect(), None)
    }

    /// Create a map carrying the cursor of its opening delimiter.
    #[must_use]
    pub fn map_at(pairs: Vec<(String, TarnVal)>, cursor: Position) -> Self {
        TarnVal::Map(pairs.into_iter().collect(), SourceInfo::at(cursor))
    }

    /// Create a set from elements.
    #[must_use]
    pub fn set(elements: Vec<TarnVal>) -> Self {
        TarnVal::Set(elements.into_iter().collect(), None)
    }

    /// Create an atom holding `value`.
    #[must_use]
    pub fn atom(value: TarnVal) -> Self {
        TarnVal::Atom(TarnAtom::new(value))
    }

    /// Check if this value is nil.
    #[inline]
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, TarnVal::Nil)
    }

    /// Check if this value is truthy (not nil and not false).
    #[inline]
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, TarnVal::Nil | TarnVal::Bool(false))
    }

    /// Check if this value is a keyword (a sentinel-prefixed string).
    #[must_use]
    pub fn is_keyword(&self) -> bool {
        matches!(self, TarnVal::Str(s) if s.starts_with(KEYWORD_PREFIX))
    }

    /// Get the type name as a string.
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            TarnVal::Nil => "nil",
            TarnVal::Bool(_) => "bool",
            TarnVal::Int(_) => "int",
            TarnVal::Str(s) if s.starts_with(KEYWORD_PREFIX) => "keyword",
            TarnVal::Str(_) => "string",
            TarnVal::Sym(_) => "symbol",
            TarnVal::List(_, _) => "list",
            TarnVal::Vector(_, _) => "vector",
            TarnVal::Map(_, _) => "hash-map",
            TarnVal::Set(_, _) => "set",
            TarnVal::Atom(_) => "atom",
            TarnVal::NativeFn(_) => "fn",
            TarnVal::Fn(f) if f.is_macro => "macro",
            TarnVal::Fn(_) => "fn",
            TarnVal::Foreign(v) => v.type_name(),
        }
    }

    /// Sequence view: the element vector of a List or Vector.
    #[inline]
    #[must_use]
    pub fn as_seq(&self) -> Option<&Vector<TarnVal>> {
        match self {
            TarnVal::List(items, _) | TarnVal::Vector(items, _) => Some(items),
            _ => None,
        }
    }

    /// Cursor of the source form that produced this value, if any.
    #[must_use]
    pub fn cursor(&self) -> Option<&Position> {
        match self {
            TarnVal::Sym(sym) => sym.cursor(),
            TarnVal::List(_, info)
            | TarnVal::Vector(_, info)
            | TarnVal::Map(_, info)
            | TarnVal::Set(_, info) => info.as_ref().and_then(|i| i.cursor.as_ref()),
            TarnVal::NativeFn(f) => f.cursor.as_ref(),
            TarnVal::Fn(f) => f.cursor.as_ref(),
            _ => None,
        }
    }

    /// Copy of this value carrying `cursor`, when the variant supports one;
    /// other variants are returned unchanged.
    #[must_use]
    pub fn with_cursor(self, cursor: Position) -> Self {
        fn update(info: Option<Rc<SourceInfo>>, cursor: Position) -> Option<Rc<SourceInfo>> {
            let meta = info.as_ref().and_then(|i| i.meta.clone());
            Some(Rc::new(SourceInfo {
                cursor: Some(cursor),
                meta,
            }))
        }
        match self {
            TarnVal::Sym(sym) => TarnVal::Sym(Symbol::at(sym.name(), cursor)),
            TarnVal::List(items, info) => TarnVal::List(items, update(info, cursor)),
            TarnVal::Vector(items, info) => TarnVal::Vector(items, update(info, cursor)),
            TarnVal::Map(map, info) => TarnVal::Map(map, update(info, cursor)),
            TarnVal::Set(items, info) => TarnVal::Set(items, update(info, cursor)),
            other => other,
        }
    }

    /// Metadata attached to this value, if any.
    #[must_use]
    pub fn meta(&self) -> Option<TarnVal> {
        match self {
            TarnVal::List(_, info)
            | TarnVal::Vector(_, info)
            | TarnVal::Map(_, info)
            | TarnVal::Set(_, info) => info.as_ref().and_then(|i| i.meta.clone()),
            TarnVal::NativeFn(f) => f.meta.as_deref().cloned(),
            TarnVal::Fn(f) => f.meta.clone(),
            _ => None,
        }
    }

    /// Copy of this value with `meta` attached. Returns `None` for variants
    /// that cannot carry metadata.
    #[must_use]
    pub fn with_meta(&self, meta: TarnVal) -> Option<TarnVal> {
        fn update(info: &Option<Rc<SourceInfo>>, meta: TarnVal) -> Option<Rc<SourceInfo>> {
            let cursor = info.as_ref().and_then(|i| i.cursor.clone());
            Some(Rc::new(SourceInfo {
                cursor,
                meta: Some(meta),
            }))
        }
        match self {
            TarnVal::List(items, info) => {
                Some(TarnVal::List(items.clone(), update(info, meta)))
            }
            TarnVal::Vector(items, info) => {
                Some(TarnVal::Vector(items.clone(), update(info, meta)))
            }
            TarnVal::Map(map, info) => Some(TarnVal::Map(map.clone(), update(info, meta))),
            TarnVal::Set(items, info) => Some(TarnVal::Set(items.clone(), update(info, meta))),
            TarnVal::NativeFn(f) => Some(TarnVal::NativeFn(f.with_meta(Some(meta)))),
            TarnVal::Fn(f) => Some(TarnVal::Fn(Rc::new(f.with_meta(Some(meta))))),
            _ => None,
        }
    }
}

fn cmp_seq(a: &Vector<TarnVal>, b: &Vector<TarnVal>) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

impl PartialEq for TarnVal {
    /// Structural equality. List and Vector are sequential-equal; atoms,
    /// functions and foreign values compare by identity. Cursors and
    /// metadata never participate.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TarnVal::Nil, TarnVal::Nil) => true,
            (TarnVal::Bool(a), TarnVal::Bool(b)) => a == b,
            (TarnVal::Int(a), TarnVal::Int(b)) => a == b,
            (TarnVal::Str(a), TarnVal::Str(b)) => a == b,
            (TarnVal::Sym(a), TarnVal::Sym(b)) => a == b,
            (
                TarnVal::List(a, _) | TarnVal::Vector(a, _),
                TarnVal::List(b, _) | TarnVal::Vector(b, _),
            ) => a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y),
            (TarnVal::Map(a, _), TarnVal::Map(b, _)) => a == b,
            (TarnVal::Set(a, _), TarnVal::Set(b, _)) => a == b,
            (TarnVal::Atom(a), TarnVal::Atom(b)) => a == b,
            (TarnVal::NativeFn(a), TarnVal::NativeFn(b)) => a == b,
            (TarnVal::Fn(a), TarnVal::Fn(b)) => Rc::ptr_eq(a, b),
            (TarnVal::Foreign(a), TarnVal::Foreign(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TarnVal {}

impl PartialOrd for TarnVal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TarnVal {
    /// Total order used by the sorted set payload. Variants rank by kind
    /// (List and Vector share a rank so ordering stays consistent with
    /// sequential equality); identity-equal kinds order by address.
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(v: &TarnVal) -> u8 {
            match v {
                TarnVal::Nil => 0,
                TarnVal::Bool(_) => 1,
                TarnVal::Int(_) => 2,
                TarnVal::Str(_) => 3,
                TarnVal::Sym(_) => 4,
                TarnVal::List(_, _) | TarnVal::Vector(_, _) => 5,
                TarnVal::Map(_, _) => 6,
                TarnVal::Set(_, _) => 7,
                TarnVal::Atom(_) => 8,
                TarnVal::NativeFn(_) => 9,
                TarnVal::Fn(_) => 10,
                TarnVal::Foreign(_) => 11,
            }
        }
        match (self, other) {
            (TarnVal::Bool(a), TarnVal::Bool(b)) => a.cmp(b),
            (TarnVal::Int(a), TarnVal::Int(b)) => a.cmp(b),
            (TarnVal::Str(a), TarnVal::Str(b)) => a.cmp(b),
            (TarnVal::Sym(a), TarnVal::Sym(b)) => a.cmp(b),
            (
                TarnVal::List(a, _) | TarnVal::Vector(a, _),
                TarnVal::List(b, _) | TarnVal::Vector(b, _),
            ) => cmp_seq(a, b),
            (TarnVal::Map(a, _), TarnVal::Map(b, _)) => a.iter().cmp(b.iter()),
            (TarnVal::Set(a, _), TarnVal::Set(b, _)) => a.iter().cmp(b.iter()),
            (TarnVal::Atom(a), TarnVal::Atom(b)) => a.cmp(b),
            (TarnVal::NativeFn(a), TarnVal::NativeFn(b)) => a.impl_addr().cmp(&b.impl_addr()),
            (TarnVal::Fn(a), TarnVal::Fn(b)) => {
                (Rc::as_ptr(a) as usize).cmp(&(Rc::as_ptr(b) as usize))
            }
            (TarnVal::Foreign(a), TarnVal::Foreign(b)) => a.addr().cmp(&b.addr()),
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
