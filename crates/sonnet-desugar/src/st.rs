//! The mutable desugaring state.

use sonnet_core::{ExprArena, ExprData, ExprId, Id, Span};

#[derive(Debug, Default)]
pub(crate) struct St {
  arena: ExprArena,
  fresh_idx: usize,
}

impl St {
  pub(crate) fn expr(&mut self, data: ExprData, span: Span) -> ExprId {
    self.arena.alloc(data, span)
  }

  /// Returns a fresh unutterable identifier.
  pub(crate) fn fresh(&mut self) -> Id {
    let ret = Id::unutterable(self.fresh_idx);
    self.fresh_idx += 1;
    ret
  }

  pub(crate) fn finish(self) -> ExprArena {
    self.arena
  }
}
