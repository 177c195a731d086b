//! The surface AST, the contract between the parser and the desugarer.
//!
//! Every node is annotated with the span of the source text it was parsed
//! from. The tree is richer than the core calculus: it still has slices,
//! standalone asserts, if-without-else, multi-spec comprehensions, and
//! objects with their three lists (fields, object-locals, asserts).

#![allow(missing_docs)]

use sonnet_core::{BinOp, Id, Lit, Span, Str, UnOp, Vis};

/// An annotated surface expression.
#[derive(Debug, Clone)]
pub struct Expr {
  pub kind: ExprKind,
  pub span: Span,
}

impl Expr {
  #[must_use]
  pub fn new(kind: ExprKind, span: Span) -> Self {
    Self { kind, span }
  }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
  Lit(Lit),
  Ident(Id),
  Fn { params: Vec<Param>, body: Box<Expr> },
  Apply { func: Box<Expr>, args: Vec<Arg> },
  Local { binds: Vec<Bind>, body: Box<Expr> },
  BinOp { lhs: Box<Expr>, op: BinOp, rhs: Box<Expr> },
  UnOp { op: UnOp, inner: Box<Expr> },
  IfElse { cond: Box<Expr>, yes: Box<Expr>, no: Box<Expr> },
  /// `if` without `else`; the missing branch is `null`.
  If { cond: Box<Expr>, yes: Box<Expr> },
  Array(Vec<Expr>),
  Object(Object),
  /// `e.field`
  Lookup { on: Box<Expr>, field: Id },
  /// `e[idx]`
  Index { on: Box<Expr>, idx: Box<Expr> },
  Error(Box<Expr>),
  /// `assert cond : msg; body`
  Assert { assert: Box<Assert>, body: Box<Expr> },
  /// `e[start:end:step]`, any part optional.
  Slice {
    on: Box<Expr>,
    start: Option<Box<Expr>>,
    end: Option<Box<Expr>>,
    step: Option<Box<Expr>>,
  },
  /// `[body for x in xs if c for y in ys ...]`
  ArrayComp { body: Box<Expr>, comp: Vec<CompSpec> },
  /// `{ [key]: val, local a = b, for x in xs ... }`
  ObjectComp { field: CompField, locals: Vec<Bind>, comp: Vec<CompSpec> },
}

/// A function parameter with an optional default.
#[derive(Debug, Clone)]
pub struct Param {
  pub name: Id,
  pub default: Option<Expr>,
}

/// A call-site argument.
#[derive(Debug, Clone)]
pub enum Arg {
  Pos(Expr),
  Named(Id, Expr),
}

/// A `local` binding.
#[derive(Debug, Clone)]
pub struct Bind {
  pub name: Id,
  pub expr: Expr,
}

/// An assertion: a condition with an optional message.
#[derive(Debug, Clone)]
pub struct Assert {
  pub cond: Expr,
  pub msg: Option<Expr>,
}

/// An object literal: field definitions, object-local binds private to the
/// object, and object-level asserts.
#[derive(Debug, Clone, Default)]
pub struct Object {
  pub fields: Vec<ObjField>,
  pub locals: Vec<Bind>,
  pub asserts: Vec<Assert>,
}

#[derive(Debug, Clone)]
pub struct ObjField {
  pub key: FieldKey,
  pub vis: Vis,
  pub val: Expr,
}

#[derive(Debug, Clone)]
pub enum FieldKey {
  /// `foo: ...`
  Ident(Id),
  /// `"foo bar": ...`
  Str(Str),
  /// `[expr]: ...`
  Computed(Expr),
}

/// The single field of an object comprehension. The key is always computed.
#[derive(Debug, Clone)]
pub struct CompField {
  pub key: Box<Expr>,
  pub vis: Vis,
  pub val: Box<Expr>,
}

/// One `for x in xs` with an optional trailing `if c`.
#[derive(Debug, Clone)]
pub struct CompSpec {
  pub var: Id,
  pub source: Expr,
  pub cond: Option<Expr>,
}
