//! The core calculus: a small call-by-need expression language that the
//! surface syntax desugars into, plus the vocabulary (literals, operators,
//! visibility, spans, names) shared by every stage of the pipeline.

#![allow(missing_docs)]

pub mod display;

mod string;

pub use sonnet_num::{NotFinite, Num};
pub use string::{Id, Str};

use std::fmt;

/// A source span, with 1-based line and column pairs. Produced by the parser
/// and threaded through desugaring opaquely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
  pub file: Str,
  pub line_start: u32,
  pub col_start: u32,
  pub line_end: u32,
  pub col_end: u32,
}

impl Span {
  #[must_use]
  pub fn new(file: Str, line_start: u32, col_start: u32, line_end: u32, col_end: u32) -> Self {
    Self { file, line_start, col_start, line_end, col_end }
  }
}

impl fmt::Display for Span {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.line_start == self.line_end {
      write!(f, "{}:{}:{}-{}", self.file, self.line_start, self.col_start, self.col_end)
    } else {
      write!(
        f,
        "{}:{}:{}-{}:{}",
        self.file, self.line_start, self.col_start, self.line_end, self.col_end
      )
    }
  }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
  Null,
  Bool(bool),
  Str(Str),
  Num(Num),
}

impl Lit {
  /// The name of this literal's type, as reported in type errors.
  #[must_use]
  pub fn type_name(&self) -> &'static str {
    match self {
      Lit::Null => "null",
      Lit::Bool(_) => "boolean",
      Lit::Str(_) => "string",
      Lit::Num(_) => "number",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
  Add,
  Sub,
  Mul,
  Div,
  Mod,
  Lt,
  Le,
  Gt,
  Ge,
  Eq,
  Ne,
  /// bitwise and. requires whole-number operands.
  And,
  /// bitwise or. requires whole-number operands.
  Or,
  /// bitwise xor. requires whole-number operands.
  Xor,
  Shl,
  Shr,
  /// short-circuit logical and.
  LAnd,
  /// short-circuit logical or.
  LOr,
  /// object key membership.
  In,
  /// generalized indexing, the operator form of field/index access.
  Lookup,
}

impl fmt::Display for BinOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      BinOp::Add => "+",
      BinOp::Sub => "-",
      BinOp::Mul => "*",
      BinOp::Div => "/",
      BinOp::Mod => "%",
      BinOp::Lt => "<",
      BinOp::Le => "<=",
      BinOp::Gt => ">",
      BinOp::Ge => ">=",
      BinOp::Eq => "==",
      BinOp::Ne => "!=",
      BinOp::And => "&",
      BinOp::Or => "|",
      BinOp::Xor => "^",
      BinOp::Shl => "<<",
      BinOp::Shr => ">>",
      BinOp::LAnd => "&&",
      BinOp::LOr => "||",
      BinOp::In => "in",
      BinOp::Lookup => "[]",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
  /// bitwise complement. requires a whole-number operand.
  Compl,
  LNot,
  Plus,
  Minus,
  /// raises its operand as an error message.
  Err,
}

impl fmt::Display for UnOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      UnOp::Compl => "~",
      UnOp::LNot => "!",
      UnOp::Plus => "+",
      UnOp::Minus => "-",
      UnOp::Err => "error ",
    };
    f.write_str(s)
  }
}

/// Per-field visibility.
///
/// `Hidden` fields evaluate normally but are dropped by manifestation.
/// `Forced` fields always manifest, even when they override a hidden field.
/// `Visible` fields manifest unless they override a hidden field, in which
/// case they inherit the hiddenness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vis {
  Visible,
  Hidden,
  Forced,
}

impl Vis {
  /// The visibility of `override_` layered on top of a field of visibility
  /// `base` with the same name.
  #[must_use]
  pub fn combine(base: Vis, override_: Vis) -> Vis {
    match override_ {
      Vis::Forced => Vis::Forced,
      Vis::Hidden => Vis::Hidden,
      Vis::Visible => match base {
        Vis::Hidden => Vis::Hidden,
        Vis::Visible | Vis::Forced => Vis::Visible,
      },
    }
  }
}

impl fmt::Display for Vis {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Vis::Visible => ":",
      Vis::Hidden => "::",
      Vis::Forced => ":::",
    };
    f.write_str(s)
  }
}

/// An argument at a call site. The order of positional and named arguments is
/// preserved so the static checker can reject positional-after-named.
#[derive(Debug, Clone)]
pub enum Arg {
  Pos(ExprId),
  Named(Id, ExprId),
}

/// Whether arguments are forced at the call site or passed as thunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
  Strict,
  Lazy,
}

/// An argument list.
#[derive(Debug, Clone)]
pub struct Args {
  pub args: Vec<Arg>,
  pub strictness: Strictness,
}

impl Args {
  #[must_use]
  pub fn lazy(args: Vec<Arg>) -> Self {
    Self { args, strictness: Strictness::Lazy }
  }
}

/// An object field in the core calculus. The key is an expression; it must
/// evaluate to a string (or null, which drops the field).
#[derive(Debug, Clone)]
pub struct Field {
  pub key: ExprId,
  pub vis: Vis,
  pub val: ExprId,
}

/// An object-level assertion: a condition and an optional message.
#[derive(Debug, Clone)]
pub struct Assert {
  pub cond: ExprId,
  pub msg: Option<ExprId>,
}

/// A core expression.
#[derive(Debug, Clone)]
pub enum ExprData {
  Lit(Lit),
  Var(Id),
  /// A recursive function: every parameter default may mention every
  /// parameter, including itself.
  Fn { params: Vec<(Id, Option<ExprId>)>, body: ExprId },
  Call { func: ExprId, args: Args },
  /// A recursive let: every binding is visible in every right-hand side and
  /// in the body.
  Local { binds: Vec<(Id, ExprId)>, body: ExprId },
  BinOp { lhs: ExprId, op: BinOp, rhs: ExprId },
  UnOp { op: UnOp, inner: ExprId },
  If { cond: ExprId, yes: ExprId, no: ExprId },
  Array(Vec<ExprId>),
  Object { asserts: Vec<Assert>, fields: Vec<Field> },
  /// Field, index, or character access; polymorphic over objects, arrays,
  /// and strings.
  Lookup { on: ExprId, idx: ExprId },
  Error(ExprId),
  /// An array comprehension over one `for` spec, with an optional `if`
  /// filter. The body must evaluate to an array; the result is the
  /// concatenation over the source elements.
  ArrayComp { var: Id, body: ExprId, cond: Option<ExprId>, source: ExprId },
  /// An object comprehension over a tuple source. `source` evaluates to an
  /// array of tuples; for each tuple, bound to `tuple`, the key and value
  /// expressions produce one field.
  ObjectComp { tuple: Id, key: ExprId, vis: Vis, val: ExprId, source: ExprId },
}

/// An allocated core expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(la_arena::Idx<ExprData>);

/// The expression arena. Every allocation records the span of the surface
/// node it was lowered from, so errors can always point at source.
#[derive(Debug, Default, Clone)]
pub struct ExprArena {
  exprs: la_arena::Arena<ExprData>,
  spans: la_arena::ArenaMap<la_arena::Idx<ExprData>, Span>,
}

impl std::ops::Index<ExprId> for ExprArena {
  type Output = ExprData;

  fn index(&self, index: ExprId) -> &Self::Output {
    &self.exprs[index.0]
  }
}

impl ExprArena {
  pub fn alloc(&mut self, data: ExprData, span: Span) -> ExprId {
    let idx = self.exprs.alloc(data);
    self.spans.insert(idx, span);
    ExprId(idx)
  }

  /// Returns the span this expression was lowered from.
  ///
  /// # Panics
  ///
  /// If the expression was not allocated with `alloc` (impossible from
  /// outside this crate).
  #[must_use]
  pub fn span(&self, e: ExprId) -> &Span {
    &self.spans[e.0]
  }

  pub fn iter(&self) -> impl Iterator<Item = (ExprId, &ExprData)> {
    self.exprs.iter().map(|(a, b)| (ExprId(a), b))
  }
}
