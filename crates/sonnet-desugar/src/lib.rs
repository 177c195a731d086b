//! Desugaring the surface AST into the core calculus.
//!
//! The transformation is pure and total: every surface tree lowers to a core
//! expression. Constructs that can only fail at runtime (`$` outside an
//! object, a failing assert) lower to `error` expressions rather than being
//! rejected here.

mod internal;
mod st;

use sonnet_core::{ExprArena, ExprId};

/// Lowers the surface tree into the core calculus.
#[must_use]
pub fn get(root: &sonnet_ast::Expr) -> Desugar {
  let mut st = st::St::default();
  let top = internal::expr(&mut st, root, false);
  Desugar { top, arena: st.finish() }
}

/// The result of desugaring.
#[derive(Debug)]
pub struct Desugar {
  /// The single top-level expression.
  pub top: ExprId,
  /// The arena holding the allocations, with their spans.
  pub arena: ExprArena,
}
