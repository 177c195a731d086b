//! Builders for surface trees.
//!
//! Every node gets the same dummy span; span fidelity is the parser's
//! business, not ours.

use sonnet_ast::{
  Arg, Assert, Bind, CompField, CompSpec, Expr, ExprKind, FieldKey, ObjField, Object, Param,
};
use sonnet_core::{BinOp, Id, Lit, Num, Span, Str, UnOp, Vis};

pub(crate) fn span() -> Span {
  Span::new(Str::new("test.jsonnet"), 1, 1, 1, 1)
}

fn mk(kind: ExprKind) -> Expr {
  Expr::new(kind, span())
}

pub(crate) fn null() -> Expr {
  mk(ExprKind::Lit(Lit::Null))
}

pub(crate) fn bool_(b: bool) -> Expr {
  mk(ExprKind::Lit(Lit::Bool(b)))
}

pub(crate) fn num(n: f64) -> Expr {
  mk(ExprKind::Lit(Lit::Num(Num::always_from_f64(n))))
}

pub(crate) fn str_(s: &str) -> Expr {
  mk(ExprKind::Lit(Lit::Str(Str::new(s))))
}

pub(crate) fn var(name: &str) -> Expr {
  mk(ExprKind::Ident(Id::new(name)))
}

pub(crate) fn self_() -> Expr {
  var("self")
}

pub(crate) fn super_() -> Expr {
  var("super")
}

pub(crate) fn dollar() -> Expr {
  var("$")
}

pub(crate) fn array(elems: Vec<Expr>) -> Expr {
  mk(ExprKind::Array(elems))
}

pub(crate) fn bin(lhs: Expr, op: BinOp, rhs: Expr) -> Expr {
  mk(ExprKind::BinOp { lhs: Box::new(lhs), op, rhs: Box::new(rhs) })
}

pub(crate) fn add(lhs: Expr, rhs: Expr) -> Expr {
  bin(lhs, BinOp::Add, rhs)
}

pub(crate) fn un(op: UnOp, inner: Expr) -> Expr {
  mk(ExprKind::UnOp { op, inner: Box::new(inner) })
}

pub(crate) fn if_else(cond: Expr, yes: Expr, no: Expr) -> Expr {
  mk(ExprKind::IfElse { cond: Box::new(cond), yes: Box::new(yes), no: Box::new(no) })
}

pub(crate) fn if_(cond: Expr, yes: Expr) -> Expr {
  mk(ExprKind::If { cond: Box::new(cond), yes: Box::new(yes) })
}

pub(crate) fn local(binds: Vec<(&str, Expr)>, body: Expr) -> Expr {
  let binds = binds.into_iter().map(|(name, expr)| Bind { name: Id::new(name), expr }).collect();
  mk(ExprKind::Local { binds, body: Box::new(body) })
}

pub(crate) fn func(params: Vec<(&str, Option<Expr>)>, body: Expr) -> Expr {
  let params = params
    .into_iter()
    .map(|(name, default)| Param { name: Id::new(name), default })
    .collect();
  mk(ExprKind::Fn { params, body: Box::new(body) })
}

pub(crate) fn pos(e: Expr) -> Arg {
  Arg::Pos(e)
}

pub(crate) fn named(name: &str, e: Expr) -> Arg {
  Arg::Named(Id::new(name), e)
}

pub(crate) fn call_args(func: Expr, args: Vec<Arg>) -> Expr {
  mk(ExprKind::Apply { func: Box::new(func), args })
}

pub(crate) fn call(func: Expr, positional: Vec<Expr>) -> Expr {
  call_named(func, positional, Vec::new())
}

pub(crate) fn call_named(
  func: Expr,
  positional: Vec<Expr>,
  named_args: Vec<(&str, Expr)>,
) -> Expr {
  let mut args: Vec<Arg> = positional.into_iter().map(Arg::Pos).collect();
  args.extend(named_args.into_iter().map(|(n, e)| named(n, e)));
  call_args(func, args)
}

pub(crate) fn get(on: Expr, field: &str) -> Expr {
  mk(ExprKind::Lookup { on: Box::new(on), field: Id::new(field) })
}

pub(crate) fn index(on: Expr, idx: Expr) -> Expr {
  mk(ExprKind::Index { on: Box::new(on), idx: Box::new(idx) })
}

pub(crate) fn slice(
  on: Expr,
  start: Option<Expr>,
  end: Option<Expr>,
  step: Option<Expr>,
) -> Expr {
  mk(ExprKind::Slice {
    on: Box::new(on),
    start: start.map(Box::new),
    end: end.map(Box::new),
    step: step.map(Box::new),
  })
}

pub(crate) fn error(msg: Expr) -> Expr {
  mk(ExprKind::Error(Box::new(msg)))
}

pub(crate) fn assert_(cond: Expr, msg: Option<Expr>, body: Expr) -> Expr {
  mk(ExprKind::Assert { assert: Box::new(Assert { cond, msg }), body: Box::new(body) })
}

pub(crate) fn field(name: &str, val: Expr) -> ObjField {
  vis_field(name, Vis::Visible, val)
}

pub(crate) fn vis_field(name: &str, vis: Vis, val: Expr) -> ObjField {
  ObjField { key: FieldKey::Ident(Id::new(name)), vis, val }
}

pub(crate) fn obj(fields: Vec<ObjField>) -> Expr {
  obj_full(Object { fields, locals: Vec::new(), asserts: Vec::new() })
}

pub(crate) fn obj_full(o: Object) -> Expr {
  mk(ExprKind::Object(o))
}

pub(crate) fn obj_bind(name: &str, expr: Expr) -> Bind {
  Bind { name: Id::new(name), expr }
}

pub(crate) fn obj_assert(cond: Expr, msg: Option<Expr>) -> Assert {
  Assert { cond, msg }
}

pub(crate) fn for_in(var: &str, source: Expr) -> CompSpec {
  CompSpec { var: Id::new(var), source, cond: None }
}

pub(crate) fn for_in_if(var: &str, source: Expr, cond: Expr) -> CompSpec {
  CompSpec { var: Id::new(var), source, cond: Some(cond) }
}

pub(crate) fn arr_comp(body: Expr, comp: Vec<CompSpec>) -> Expr {
  mk(ExprKind::ArrayComp { body: Box::new(body), comp })
}

pub(crate) fn obj_comp(key: Expr, val: Expr, comp: Vec<CompSpec>) -> Expr {
  let field = CompField { key: Box::new(key), vis: Vis::Visible, val: Box::new(val) };
  mk(ExprKind::ObjectComp { field, locals: Vec::new(), comp })
}

/// `std.<name>`
pub(crate) fn std_fn(name: &str) -> Expr {
  get(var("std"), name)
}
