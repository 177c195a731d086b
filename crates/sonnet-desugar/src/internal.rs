//! The internal impl.

use crate::st::St;
use sonnet_ast as ast;
use sonnet_core::{Arg, Args, Assert, ExprData, ExprId, Field, Id, Lit, Num, Span, Str};

pub(crate) fn expr(st: &mut St, e: &ast::Expr, in_obj: bool) -> ExprId {
  let span = e.span.clone();
  let data = match &e.kind {
    ast::ExprKind::Lit(lit) => ExprData::Lit(lit.clone()),
    ast::ExprKind::Ident(id) => {
      if !in_obj && (id.is_self() || id.is_super() || id.is_dollar()) {
        let msg = format!("`{id}` outside of an object");
        let msg = st.expr(ExprData::Lit(Lit::Str(Str::from(msg))), span.clone());
        ExprData::Error(msg)
      } else {
        ExprData::Var(id.clone())
      }
    }
    ast::ExprKind::Fn { params, body } => function(st, params, body, in_obj),
    ast::ExprKind::Apply { func, args } => {
      let func = expr(st, func, in_obj);
      let args = args
        .iter()
        .map(|arg| match arg {
          ast::Arg::Pos(e) => Arg::Pos(expr(st, e, in_obj)),
          ast::Arg::Named(name, e) => Arg::Named(name.clone(), expr(st, e, in_obj)),
        })
        .collect();
      ExprData::Call { func, args: Args::lazy(args) }
    }
    ast::ExprKind::Local { binds, body } => {
      let binds = bindings(st, binds, in_obj);
      let body = expr(st, body, in_obj);
      ExprData::Local { binds, body }
    }
    ast::ExprKind::BinOp { lhs, op, rhs } => {
      let lhs = expr(st, lhs, in_obj);
      let rhs = expr(st, rhs, in_obj);
      ExprData::BinOp { lhs, op: *op, rhs }
    }
    ast::ExprKind::UnOp { op, inner } => {
      let inner = expr(st, inner, in_obj);
      ExprData::UnOp { op: *op, inner }
    }
    ast::ExprKind::IfElse { cond, yes, no } => {
      let cond = expr(st, cond, in_obj);
      let yes = expr(st, yes, in_obj);
      let no = expr(st, no, in_obj);
      ExprData::If { cond, yes, no }
    }
    ast::ExprKind::If { cond, yes } => {
      let cond = expr(st, cond, in_obj);
      let yes = expr(st, yes, in_obj);
      let no = st.expr(ExprData::Lit(Lit::Null), span.clone());
      ExprData::If { cond, yes, no }
    }
    ast::ExprKind::Array(elems) => {
      let elems = elems.iter().map(|elem| expr(st, elem, in_obj)).collect();
      ExprData::Array(elems)
    }
    ast::ExprKind::Object(obj) => object(st, obj, &span),
    ast::ExprKind::Lookup { on, field } => {
      let on = expr(st, on, in_obj);
      let idx = st.expr(ExprData::Lit(Lit::Str(field.as_name().clone())), span.clone());
      ExprData::Lookup { on, idx }
    }
    ast::ExprKind::Index { on, idx } => {
      let on = expr(st, on, in_obj);
      let idx = expr(st, idx, in_obj);
      ExprData::Lookup { on, idx }
    }
    ast::ExprKind::Error(inner) => {
      let inner = expr(st, inner, in_obj);
      ExprData::Error(inner)
    }
    ast::ExprKind::Assert { assert, body } => {
      let cond = expr(st, &assert.cond, in_obj);
      let yes = expr(st, body, in_obj);
      let msg = assert_msg(st, assert.msg.as_ref(), in_obj, &span);
      let no = st.expr(ExprData::Error(msg), span.clone());
      ExprData::If { cond, yes, no }
    }
    ast::ExprKind::Slice { on, start, end, step } => {
      let on = expr(st, on, in_obj);
      let mut positional = vec![Arg::Pos(on)];
      for part in [start, end, step] {
        let part = match part {
          Some(part) => expr(st, part, in_obj),
          None => st.expr(ExprData::Lit(Lit::Null), span.clone()),
        };
        positional.push(Arg::Pos(part));
      }
      ExprData::Call { func: std_fn(st, "slice", &span), args: Args::lazy(positional) }
    }
    ast::ExprKind::ArrayComp { body, comp } => {
      let body = expr(st, body, in_obj);
      let init = st.expr(ExprData::Array(vec![body]), span.clone());
      return array_comp(st, init, comp, in_obj, &span);
    }
    ast::ExprKind::ObjectComp { field, locals, comp } => object_comp(st, field, locals, comp, &span),
  };
  st.expr(data, span)
}

fn bindings(st: &mut St, binds: &[ast::Bind], in_obj: bool) -> Vec<(Id, ExprId)> {
  binds.iter().map(|bind| (bind.name.clone(), expr(st, &bind.expr, in_obj))).collect()
}

fn function(st: &mut St, params: &[ast::Param], body: &ast::Expr, in_obj: bool) -> ExprData {
  let params = params
    .iter()
    .map(|param| {
      let default = param.default.as_ref().map(|d| expr(st, d, in_obj));
      (param.name.clone(), default)
    })
    .collect();
  let body = expr(st, body, in_obj);
  ExprData::Fn { params, body }
}

fn assert_msg(st: &mut St, msg: Option<&ast::Expr>, in_obj: bool, span: &Span) -> ExprId {
  match msg {
    Some(msg) => expr(st, msg, in_obj),
    None => st.expr(ExprData::Lit(Lit::Str(Str::new("Assertion failed"))), span.clone()),
  }
}

/// `std.name`, for desugarings that target the standard library.
fn std_fn(st: &mut St, name: &str, span: &Span) -> ExprId {
  let std = st.expr(ExprData::Var(Id::new("std")), span.clone());
  let idx = st.expr(ExprData::Lit(Lit::Str(Str::new(name))), span.clone());
  st.expr(ExprData::Lookup { on: std, idx }, span.clone())
}

/// Everything inside an object body sees the object locals; the locals are
/// mutually recursive and may mention `self`.
fn in_locals(st: &mut St, locals: &[(Id, ExprId)], body: ExprId, span: &Span) -> ExprId {
  if locals.is_empty() {
    body
  } else {
    st.expr(ExprData::Local { binds: locals.to_vec(), body }, span.clone())
  }
}

fn object(st: &mut St, obj: &ast::Object, span: &Span) -> ExprData {
  let locals = bindings(st, &obj.locals, true);
  let asserts = obj
    .asserts
    .iter()
    .map(|a| {
      let cond = expr(st, &a.cond, true);
      let cond = in_locals(st, &locals, cond, span);
      let msg = a.msg.as_ref().map(|m| {
        let m = expr(st, m, true);
        in_locals(st, &locals, m, span)
      });
      Assert { cond, msg }
    })
    .collect();
  let fields = obj
    .fields
    .iter()
    .map(|field| {
      let key = match &field.key {
        ast::FieldKey::Ident(id) => {
          st.expr(ExprData::Lit(Lit::Str(id.as_name().clone())), span.clone())
        }
        ast::FieldKey::Str(s) => st.expr(ExprData::Lit(Lit::Str(s.clone())), span.clone()),
        ast::FieldKey::Computed(e) => {
          let e = expr(st, e, true);
          in_locals(st, &locals, e, span)
        }
      };
      let val = expr(st, &field.val, true);
      let val = in_locals(st, &locals, val, span);
      Field { key, vis: field.vis, val }
    })
    .collect();
  ExprData::Object { asserts, fields }
}

/// Right fold over the comp specs. The outermost spec becomes the outermost
/// comprehension node, so the last spec varies fastest.
fn array_comp(
  st: &mut St,
  init: ExprId,
  comp: &[ast::CompSpec],
  in_obj: bool,
  span: &Span,
) -> ExprId {
  let mut acc = init;
  for spec in comp.iter().rev() {
    let source = expr(st, &spec.source, in_obj);
    let cond = spec.cond.as_ref().map(|c| expr(st, c, in_obj));
    let data = ExprData::ArrayComp { var: spec.var.clone(), body: acc, cond, source };
    acc = st.expr(data, span.clone());
  }
  acc
}

/// An object comprehension lowers to an array comprehension that collects one
/// tuple of the loop variables per iteration, wrapped in an object
/// comprehension node whose key and value re-bind each loop variable from the
/// tuple.
fn object_comp(
  st: &mut St,
  field: &ast::CompField,
  locals: &[ast::Bind],
  comp: &[ast::CompSpec],
  span: &Span,
) -> ExprData {
  let vars: Vec<Id> = comp.iter().map(|spec| spec.var.clone()).collect();
  let tuple_elems: Vec<ExprId> =
    vars.iter().map(|v| st.expr(ExprData::Var(v.clone()), span.clone())).collect();
  let tuple = st.expr(ExprData::Array(tuple_elems), span.clone());
  let init = st.expr(ExprData::Array(vec![tuple]), span.clone());
  let source = array_comp(st, init, comp, true, span);

  let tuple_id = st.fresh();
  let obj_locals = bindings(st, locals, true);

  let key = expr(st, &field.key, true);
  let key = in_locals(st, &obj_locals, key, span);
  let key = in_tuple_locals(st, &vars, &tuple_id, key, span);

  let val = expr(st, &field.val, true);
  let val = in_locals(st, &obj_locals, val, span);
  let val = in_tuple_locals(st, &vars, &tuple_id, val, span);

  ExprData::ObjectComp { tuple: tuple_id, key, vis: field.vis, val, source }
}

/// `local v0 = t[0], v1 = t[1], ...; body`, recovering the loop variables
/// from the tuple. Capture-free by construction: `t` is unutterable.
fn in_tuple_locals(st: &mut St, vars: &[Id], tuple: &Id, body: ExprId, span: &Span) -> ExprId {
  let binds: Vec<(Id, ExprId)> = vars
    .iter()
    .enumerate()
    .map(|(i, v)| {
      let on = st.expr(ExprData::Var(tuple.clone()), span.clone());
      let idx = st.expr(ExprData::Lit(Lit::Num(Num::from(i))), span.clone());
      let lookup = st.expr(ExprData::Lookup { on, idx }, span.clone());
      (v.clone(), lookup)
    })
    .collect();
  st.expr(ExprData::Local { binds, body }, span.clone())
}
