//! Displaying core expressions, mostly for debugging.

use crate::{Arg, ExprArena, ExprData, ExprId, Lit};
use std::fmt;

/// Displays an expression, sort of. Doesn't have great handling for
/// precedence or trailing commas.
#[must_use]
pub fn expr(e: ExprId, ar: &ExprArena) -> impl fmt::Display + '_ {
  ExprDisplay { e, ar }
}

#[derive(Clone, Copy)]
struct ExprDisplay<'a> {
  e: ExprId,
  ar: &'a ExprArena,
}

impl<'a> ExprDisplay<'a> {
  fn with(self, e: ExprId) -> ExprDisplay<'a> {
    ExprDisplay { e, ..self }
  }
}

impl fmt::Display for ExprDisplay<'_> {
  #[allow(clippy::too_many_lines)]
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.ar[self.e] {
      ExprData::Lit(lit) => match lit {
        Lit::Null => f.write_str("null"),
        Lit::Bool(b) => b.fmt(f),
        Lit::Str(s) => write!(f, "{s:?}", s = s.as_str()),
        Lit::Num(n) => n.fmt(f),
      },
      ExprData::Var(id) => id.fmt(f),
      ExprData::Fn { params, body } => {
        f.write_str("function(")?;
        for (name, default) in params {
          match default {
            None => write!(f, "{name}, ")?,
            Some(d) => write!(f, "{name}={}, ", self.with(*d))?,
          }
        }
        write!(f, ") {}", self.with(*body))
      }
      ExprData::Call { func, args } => {
        self.with(*func).fmt(f)?;
        f.write_str("(")?;
        for arg in &args.args {
          match arg {
            Arg::Pos(e) => write!(f, "{}, ", self.with(*e))?,
            Arg::Named(name, e) => write!(f, "{name}={}, ", self.with(*e))?,
          }
        }
        f.write_str(")")
      }
      ExprData::Local { binds, body } => {
        f.write_str("local ")?;
        for (name, rhs) in binds {
          write!(f, "{name} = {}, ", self.with(*rhs))?;
        }
        write!(f, "; {}", self.with(*body))
      }
      ExprData::BinOp { lhs, op, rhs } => {
        write!(f, "({} {op} {})", self.with(*lhs), self.with(*rhs))
      }
      ExprData::UnOp { op, inner } => write!(f, "{op}{}", self.with(*inner)),
      ExprData::If { cond, yes, no } => {
        write!(f, "if {} then {} else {}", self.with(*cond), self.with(*yes), self.with(*no))
      }
      ExprData::Array(elems) => {
        f.write_str("[")?;
        for &elem in elems {
          write!(f, "{}, ", self.with(elem))?;
        }
        f.write_str("]")
      }
      ExprData::Object { asserts, fields } => {
        f.write_str("{ ")?;
        for a in asserts {
          write!(f, "assert {}", self.with(a.cond))?;
          if let Some(msg) = a.msg {
            write!(f, " : {}", self.with(msg))?;
          }
          f.write_str(", ")?;
        }
        for field in fields {
          write!(f, "[{}]{} {}, ", self.with(field.key), field.vis, self.with(field.val))?;
        }
        f.write_str("}")
      }
      ExprData::Lookup { on, idx } => {
        write!(f, "{}[{}]", self.with(*on), self.with(*idx))
      }
      ExprData::Error(inner) => write!(f, "error {}", self.with(*inner)),
      ExprData::ArrayComp { var, body, cond, source } => {
        write!(f, "[{} for {var} in {}", self.with(*body), self.with(*source))?;
        if let Some(cond) = cond {
          write!(f, " if {}", self.with(*cond))?;
        }
        f.write_str("]")
      }
      ExprData::ObjectComp { tuple, key, vis, val, source } => {
        write!(
          f,
          "{{ [{}]{vis} {} for {tuple} in {} }}",
          self.with(*key),
          self.with(*val),
          self.with(*source)
        )
      }
    }
  }
}
