//! The dynamic semantics: executing core expressions to produce lazy values,
//! and manifesting values into JSON.
//!
//! The two operations are mutually recursive:
//!
//! - Values are lazy, so they contain unexecuted expressions which must be
//!   executed during manifestation.
//! - Execution may need to manifest a value, e.g. to render it as a string or
//!   to decide equality.
//!
//! All evaluator state — the expression arena, the explicit backtrace, and
//! the assert-cycle guard — lives in [`Interp`], threaded mutably through
//! every operation.

pub mod error;
pub mod val;

mod exec;
mod manifest;
mod std_lib;

use always::always;
use error::{Error, Kind, Result, StackFrame};
use rustc_hash::FxHashSet;
use sonnet_core::{ExprArena, ExprId, Id, Str};
use sonnet_json::Json;
use val::{Env, Object, Thunk, Val};

/// The bound on explicit call-stack frames. Runaway recursion surfaces as a
/// runtime error instead of a native stack overflow.
const MAX_STACK: usize = 500;

/// The evaluator state.
#[derive(Debug)]
pub struct Interp<'a> {
  /// The arena the expressions under evaluation live in.
  pub ars: &'a ExprArena,
  bt: Vec<StackFrame>,
  checking_asserts: FxHashSet<usize>,
}

impl<'a> Interp<'a> {
  #[must_use]
  pub fn new(ars: &'a ExprArena) -> Self {
    Self { ars, bt: Vec::new(), checking_asserts: FxHashSet::default() }
  }

  /// An error at `at`, capturing the current backtrace.
  pub(crate) fn err(&self, at: ExprId, kind: Kind) -> Error {
    Error { span: self.ars.span(at).clone(), kind, trace: self.bt.clone() }
  }

  pub(crate) fn push_frame(&mut self, name: Option<Str>, at: ExprId) -> Result<()> {
    if self.bt.len() >= MAX_STACK {
      return Err(self.err(at, Kind::RuntimeError(Str::new("max stack frames exceeded"))));
    }
    self.bt.push(StackFrame { name, span: self.ars.span(at).clone() });
    Ok(())
  }

  pub(crate) fn pop_frame(&mut self) {
    let popped = self.bt.pop();
    always!(popped.is_some(), "pop from an empty backtrace");
  }

  /// Returns whether we should actually start checking the asserts on the
  /// object with this identity. `false` means a check is already running
  /// further up the stack (an assert reached a field through `self`).
  pub(crate) fn start_checking_asserts(&mut self, id: usize) -> bool {
    self.checking_asserts.insert(id)
  }

  pub(crate) fn finish_checking_asserts(&mut self, id: usize) {
    let removed = self.checking_asserts.remove(&id);
    always!(removed, "should only finish checking asserts once started");
  }
}

/// Executes the expression to produce a value.
///
/// # Errors
///
/// If execution failed.
pub fn get_exec(ip: &mut Interp<'_>, env: &Env, top: ExprId) -> Result<Val> {
  exec::get(ip, env, top)
}

/// Manifests the value into a JSON value. `at` is the expression to blame
/// for errors with no better location.
///
/// # Errors
///
/// If manifestation failed.
pub fn get_manifest(ip: &mut Interp<'_>, val: &Val, at: ExprId) -> Result<Json> {
  manifest::get(ip, val, at)
}

/// The standard library object: one hidden field per
/// [`sonnet_std_sig::StdFn`].
#[must_use]
pub fn std_obj() -> Val {
  Val::Object(Object::std_lib())
}

/// The initial environment, binding `std` and nothing else.
#[must_use]
pub fn initial_env(std: Val) -> Env {
  Env::empty().bind(Id::new("std"), Thunk::forced(std))
}
