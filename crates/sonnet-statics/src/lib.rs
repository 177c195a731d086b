//! Static checks for lexical well-formedness of the core calculus.
//!
//! The checks are purely syntactic: duplicate function parameters, duplicate
//! `local` bindings, and positional arguments after named arguments. At most
//! one error is reported, the first one encountered in pre-order. On success
//! the core is unchanged (the checker never rewrites).

mod error;

pub use error::{Error, Kind};

use rustc_hash::FxHashSet;
use sonnet_core::{Arg, ExprArena, ExprData, ExprId};

/// Checks the expression and everything under it.
///
/// # Errors
///
/// If the check failed.
pub fn check(ars: &ExprArena, top: ExprId) -> Result<(), Error> {
  get(ars, top)
}

fn get(ars: &ExprArena, e: ExprId) -> Result<(), Error> {
  match &ars[e] {
    ExprData::Lit(_) | ExprData::Var(_) => Ok(()),
    ExprData::Fn { params, body } => {
      let mut seen = FxHashSet::<&str>::default();
      for (name, _) in params {
        if !seen.insert(name.as_str()) {
          return Err(mk(ars, e, Kind::DuplicateParam(name.clone())));
        }
      }
      for (_, default) in params {
        if let Some(default) = default {
          get(ars, *default)?;
        }
      }
      get(ars, *body)
    }
    ExprData::Call { func, args } => {
      let mut named_seen = false;
      for arg in &args.args {
        match arg {
          Arg::Pos(_) => {
            if named_seen {
              return Err(mk(ars, e, Kind::PosAfterNamedArg));
            }
          }
          Arg::Named(..) => named_seen = true,
        }
      }
      get(ars, *func)?;
      for arg in &args.args {
        let (Arg::Pos(arg) | Arg::Named(_, arg)) = arg;
        get(ars, *arg)?;
      }
      Ok(())
    }
    ExprData::Local { binds, body } => {
      let mut seen = FxHashSet::<&str>::default();
      for (name, _) in binds {
        if !seen.insert(name.as_str()) {
          return Err(mk(ars, e, Kind::DuplicateBinding(name.clone())));
        }
      }
      for (_, rhs) in binds {
        get(ars, *rhs)?;
      }
      get(ars, *body)
    }
    ExprData::BinOp { lhs, rhs, .. } => {
      get(ars, *lhs)?;
      get(ars, *rhs)
    }
    ExprData::UnOp { inner, .. } => get(ars, *inner),
    ExprData::If { cond, yes, no } => {
      get(ars, *cond)?;
      get(ars, *yes)?;
      get(ars, *no)
    }
    ExprData::Array(elems) => {
      for &elem in elems {
        get(ars, elem)?;
      }
      Ok(())
    }
    ExprData::Object { asserts, fields } => {
      for assert in asserts {
        get(ars, assert.cond)?;
        if let Some(msg) = assert.msg {
          get(ars, msg)?;
        }
      }
      for field in fields {
        get(ars, field.key)?;
        get(ars, field.val)?;
      }
      Ok(())
    }
    ExprData::Lookup { on, idx } => {
      get(ars, *on)?;
      get(ars, *idx)
    }
    ExprData::Error(inner) => get(ars, *inner),
    ExprData::ArrayComp { body, cond, source, .. } => {
      get(ars, *source)?;
      if let Some(cond) = cond {
        get(ars, *cond)?;
      }
      get(ars, *body)
    }
    ExprData::ObjectComp { key, val, source, .. } => {
      get(ars, *source)?;
      get(ars, *key)?;
      get(ars, *val)
    }
  }
}

fn mk(ars: &ExprArena, e: ExprId, kind: Kind) -> Error {
  Error { span: ars.span(e).clone(), kind }
}
