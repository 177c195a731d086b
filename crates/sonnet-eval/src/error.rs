//! Errors.

use sonnet_core::{Id, Span, Str};
use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An evaluation error: what went wrong, where, and the call stack at the
/// time. Cloned into failed thunks so a re-force reports the same error.
#[derive(Debug, Clone)]
pub struct Error {
  /// The span of the expression that raised.
  pub span: Span,
  pub kind: Kind,
  /// The backtrace, outermost frame first.
  pub trace: Vec<StackFrame>,
}

/// A call-stack frame. Pushed on function application and object field
/// force, popped on return.
#[derive(Debug, Clone)]
pub struct StackFrame {
  /// The name of the applied function, when the call site names one.
  pub name: Option<Str>,
  pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Kind {
  TypeMismatch { expected: &'static str, actual: &'static str },
  /// A non-string key used to look up an object field. Carries the type of
  /// the key.
  InvalidKey(&'static str),
  /// A non-integer index used on an array or string. Carries the type or
  /// rendering of the index.
  InvalidIndex(&'static str),
  NoSuchKey(Str),
  IndexOutOfBounds(i64),
  DivByZero,
  VarNotFound(Id),
  AssertionFailed(Str),
  StdError(Str),
  RuntimeError(Str),
  ParamNotBound(Id),
  BadParam(Id),
  ManifestError(Str),
  TooManyArgs(usize),
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.kind.fmt(f)
  }
}

impl fmt::Display for Kind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Kind::TypeMismatch { expected, actual } => {
        write!(f, "type mismatch: expected {expected}, found {actual}")
      }
      Kind::InvalidKey(ty) => write!(f, "invalid object key of type {ty}"),
      Kind::InvalidIndex(ty) => write!(f, "invalid index of type {ty}"),
      Kind::NoSuchKey(name) => write!(f, "no such field: {name}"),
      Kind::IndexOutOfBounds(i) => write!(f, "index out of bounds: {i}"),
      Kind::DivByZero => f.write_str("division by zero"),
      Kind::VarNotFound(name) => write!(f, "variable not found: {name}"),
      Kind::AssertionFailed(msg) => write!(f, "assertion failed: {msg}"),
      Kind::StdError(msg) => msg.fmt(f),
      Kind::RuntimeError(msg) => msg.fmt(f),
      Kind::ParamNotBound(name) => {
        write!(f, "parameter `{name}` was not defined at the function call site")
      }
      Kind::BadParam(name) => {
        write!(f, "argument `{name}` was not requested at the function definition site")
      }
      Kind::ManifestError(msg) => msg.fmt(f),
      Kind::TooManyArgs(n) => write!(f, "too many arguments: {n}"),
    }
  }
}
