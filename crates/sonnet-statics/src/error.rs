//! Errors.

use sonnet_core::{Id, Span};
use std::fmt;

/// An error from the static checks.
#[derive(Debug, Clone)]
pub struct Error {
  /// The span of the offending expression.
  pub span: Span,
  /// What went wrong.
  pub kind: Kind,
}

#[derive(Debug, Clone)]
pub enum Kind {
  DuplicateParam(Id),
  DuplicateBinding(Id),
  PosAfterNamedArg,
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.kind {
      Kind::DuplicateParam(name) => write!(f, "duplicate parameter '{name}'"),
      Kind::DuplicateBinding(name) => write!(f, "duplicate local var '{name}'"),
      Kind::PosAfterNamedArg => f.write_str("positional after named argument"),
    }
  }
}
