//! Executing core expressions to produce values.

use crate::error::{Kind, Result};
use crate::val::{Array, Env, FieldSrc, Fn, ForceState, ObjField, Object, RegularFn, Thunk, Val};
use crate::{manifest, std_lib, Interp};
use sonnet_core::{Arg, BinOp, ExprArena, ExprData, ExprId, Id, Lit, Num, Str, Strictness, UnOp};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Executes the expression to produce a value.
pub(crate) fn get(ip: &mut Interp<'_>, env: &Env, expr: ExprId) -> Result<Val> {
  let ars = ip.ars;
  match &ars[expr] {
    ExprData::Lit(lit) => Ok(Val::Lit(lit.clone())),
    ExprData::Var(id) => var(ip, env, id, expr),
    ExprData::Fn { params, body } => {
      let f = RegularFn { env: env.clone(), params: params.clone(), body: *body };
      Ok(Val::Fn(Fn::Regular(f)))
    }
    ExprData::Call { func, args } => {
      let func_val = get(ip, env, *func)?;
      let mut positional = Vec::<Thunk>::new();
      let mut named = Vec::<(Id, Thunk)>::new();
      for arg in &args.args {
        match arg {
          Arg::Pos(e) => positional.push(Thunk::new(env.clone(), *e)),
          Arg::Named(id, e) => named.push((id.clone(), Thunk::new(env.clone(), *e))),
        }
      }
      if args.strictness == Strictness::Strict {
        for thunk in positional.iter().chain(named.iter().map(|(_, t)| t)) {
          force(ip, thunk, expr)?;
        }
      }
      let name = callee_name(ars, *func);
      call_val(ip, &func_val, positional, named, name, expr)
    }
    ExprData::Local { binds, body } => {
      let env = local_env(env, binds);
      get(ip, &env, *body)
    }
    ExprData::BinOp { lhs, op, rhs } => bin_op(ip, env, *lhs, *op, *rhs, expr),
    ExprData::UnOp { op, inner } => {
      let inner_val = get(ip, env, *inner)?;
      un_op(ip, *op, inner_val, expr)
    }
    ExprData::If { cond, yes, no } => {
      let cond_val = get(ip, env, *cond)?;
      let ty = cond_val.type_name();
      let Val::Lit(Lit::Bool(b)) = cond_val else {
        return Err(ip.err(*cond, Kind::TypeMismatch { expected: "boolean", actual: ty }));
      };
      let e = if b { yes } else { no };
      get(ip, env, *e)
    }
    ExprData::Array(elems) => {
      let elems = elems.iter().map(|&e| Thunk::new(env.clone(), e)).collect();
      Ok(Val::Array(Array::new(elems)))
    }
    ExprData::Object { asserts, fields } => {
      let mut map = BTreeMap::<Str, ObjField>::new();
      for field in fields {
        match get(ip, env, field.key)? {
          Val::Lit(Lit::Str(name)) => {
            let f = ObjField { vis: field.vis, env: env.clone(), expr: field.val };
            if map.insert(name.clone(), f).is_some() {
              let msg = Str::from(format!("duplicate field '{name}'"));
              return Err(ip.err(field.key, Kind::RuntimeError(msg)));
            }
          }
          Val::Lit(Lit::Null) => {}
          v => {
            return Err(
              ip.err(field.key, Kind::TypeMismatch { expected: "string", actual: v.type_name() }),
            )
          }
        }
      }
      Ok(Val::Object(Object::new_lit(env.clone(), asserts.clone(), map)))
    }
    ExprData::Lookup { on, idx } => {
      let on_val = get(ip, env, *on)?;
      let idx_val = get(ip, env, *idx)?;
      index(ip, &on_val, &idx_val, expr)
    }
    ExprData::Error(inner) => {
      let val = get(ip, env, *inner)?;
      let msg = str_conv(ip, val, expr)?;
      Err(ip.err(expr, Kind::RuntimeError(msg)))
    }
    ExprData::ArrayComp { var, body, cond, source } => {
      let source_val = get(ip, env, *source)?;
      let ty = source_val.type_name();
      let Val::Array(elems) = source_val else {
        return Err(ip.err(*source, Kind::TypeMismatch { expected: "array", actual: ty }));
      };
      let mut out = Array::default();
      for thunk in elems.iter() {
        let env = env.bind(var.clone(), thunk.clone());
        if let Some(cond) = cond {
          let cond_val = get(ip, &env, *cond)?;
          let ty = cond_val.type_name();
          let Val::Lit(Lit::Bool(keep)) = cond_val else {
            return Err(ip.err(*cond, Kind::TypeMismatch { expected: "boolean", actual: ty }));
          };
          if !keep {
            continue;
          }
        }
        let body_val = get(ip, &env, *body)?;
        let ty = body_val.type_name();
        let Val::Array(mut part) = body_val else {
          return Err(ip.err(*body, Kind::TypeMismatch { expected: "array", actual: ty }));
        };
        out.append(&mut part);
      }
      Ok(Val::Array(out))
    }
    ExprData::ObjectComp { tuple, key, vis, val, source } => {
      let source_val = get(ip, env, *source)?;
      let ty = source_val.type_name();
      let Val::Array(tuples) = source_val else {
        return Err(ip.err(*source, Kind::TypeMismatch { expected: "array", actual: ty }));
      };
      let mut map = BTreeMap::<Str, ObjField>::new();
      for thunk in tuples.iter() {
        let env = env.bind(tuple.clone(), thunk.clone());
        match get(ip, &env, *key)? {
          Val::Lit(Lit::Str(name)) => {
            let f = ObjField { vis: *vis, env: env.clone(), expr: *val };
            if map.insert(name.clone(), f).is_some() {
              let msg = Str::from(format!("duplicate field '{name}'"));
              return Err(ip.err(*key, Kind::RuntimeError(msg)));
            }
          }
          Val::Lit(Lit::Null) => {}
          v => {
            return Err(
              ip.err(*key, Kind::TypeMismatch { expected: "string", actual: v.type_name() }),
            )
          }
        }
      }
      Ok(Val::Object(Object::new_lit(env.clone(), Vec::new(), map)))
    }
  }
}

/// Forces a thunk. `at` is the expression to blame if the cell is already
/// being forced further up the stack.
pub(crate) fn force(ip: &mut Interp<'_>, thunk: &Thunk, at: ExprId) -> Result<Val> {
  match thunk.take() {
    ForceState::Done(result) => result,
    ForceState::Cycle => Err(ip.err(at, Kind::RuntimeError(Str::new("infinite recursion")))),
    ForceState::Eval(env, expr) => {
      let result = get(ip, &env, expr);
      thunk.fulfill(result)
    }
  }
}

fn var(ip: &mut Interp<'_>, env: &Env, id: &Id, expr: ExprId) -> Result<Val> {
  if id.is_self() {
    return match env.this() {
      Some(obj) => Ok(Val::Object(obj.as_self())),
      None => Err(ip.err(expr, Kind::RuntimeError(Str::new("`self` outside of an object")))),
    };
  }
  if id.is_super() {
    return match env.this() {
      Some(obj) => Ok(Val::Object(obj.parent_view())),
      None => Err(ip.err(expr, Kind::RuntimeError(Str::new("`super` outside of an object")))),
    };
  }
  if id.is_dollar() {
    return match env.outermost() {
      Some(obj) => Ok(Val::Object(obj.as_self())),
      None => Err(ip.err(expr, Kind::RuntimeError(Str::new("`$` outside of an object")))),
    };
  }
  match env.lookup(id) {
    Some(thunk) => force(ip, &thunk, expr),
    None => Err(ip.err(expr, Kind::VarNotFound(id.clone()))),
  }
}

/// One shared frame for all the binds: each right-hand side closes over the
/// frame itself, which is what makes the bindings mutually recursive.
fn local_env(env: &Env, binds: &[(Id, ExprId)]) -> Env {
  let env = env.push_binds();
  for (id, rhs) in binds {
    env.insert(id.clone(), Thunk::new(env.clone(), *rhs));
  }
  env
}

fn callee_name(ars: &ExprArena, func: ExprId) -> Option<Str> {
  match &ars[func] {
    ExprData::Var(id) => Some(id.as_name().clone()),
    ExprData::Lookup { idx, .. } => match &ars[*idx] {
      ExprData::Lit(Lit::Str(s)) => Some(s.clone()),
      _ => None,
    },
    _ => None,
  }
}

/// Applies a function value to already-thunked arguments.
pub(crate) fn call_val(
  ip: &mut Interp<'_>,
  func: &Val,
  positional: Vec<Thunk>,
  named: Vec<(Id, Thunk)>,
  name: Option<Str>,
  expr: ExprId,
) -> Result<Val> {
  match func {
    Val::Fn(Fn::Regular(f)) => call_regular(ip, f, positional, named, name, expr),
    Val::Fn(Fn::Std(f)) => std_lib::call(ip, *f, positional, named, expr),
    v => Err(ip.err(expr, Kind::TypeMismatch { expected: "function", actual: v.type_name() })),
  }
}

fn call_regular(
  ip: &mut Interp<'_>,
  f: &RegularFn,
  positional: Vec<Thunk>,
  named: Vec<(Id, Thunk)>,
  name: Option<Str>,
  expr: ExprId,
) -> Result<Val> {
  let n_pos = positional.len();
  if n_pos > f.params.len() {
    return Err(ip.err(expr, Kind::TooManyArgs(n_pos)));
  }
  let mut bound: Vec<Option<Thunk>> = vec![None; f.params.len()];
  for (id, thunk) in named {
    let Some(i) = f.params.iter().position(|(p, _)| *p == id) else {
      return Err(ip.err(expr, Kind::BadParam(id)));
    };
    if bound[i].is_some() {
      let msg = Str::from(format!("duplicate argument '{id}'"));
      return Err(ip.err(expr, Kind::RuntimeError(msg)));
    }
    bound[i] = Some(thunk);
  }
  // positional arguments fill the unfilled parameters left to right
  for thunk in positional {
    match bound.iter_mut().find(|slot| slot.is_none()) {
      Some(slot) => *slot = Some(thunk),
      None => return Err(ip.err(expr, Kind::TooManyArgs(n_pos))),
    }
  }
  // one shared frame: parameter defaults may mention every parameter
  let frame = f.env.push_binds();
  for ((id, default), slot) in f.params.iter().zip(bound) {
    match slot {
      Some(thunk) => frame.insert(id.clone(), thunk),
      None => match default {
        Some(d) => frame.insert(id.clone(), Thunk::new(frame.clone(), *d)),
        None => return Err(ip.err(expr, Kind::ParamNotBound(id.clone()))),
      },
    }
  }
  ip.push_frame(name, expr)?;
  let ret = get(ip, &frame, f.body);
  ip.pop_frame();
  ret
}

/// Polymorphic indexing: object by string key, array by integer, string by
/// integer (yielding a one-character string).
pub(crate) fn index(ip: &mut Interp<'_>, on: &Val, idx: &Val, expr: ExprId) -> Result<Val> {
  match on {
    Val::Object(obj) => {
      let Val::Lit(Lit::Str(name)) = idx else {
        return Err(ip.err(expr, Kind::InvalidKey(idx.type_name())));
      };
      object_field(ip, obj, name, expr)
    }
    Val::Array(arr) => {
      let i = int_index(ip, idx, expr)?;
      let Ok(i_usize) = usize::try_from(i) else {
        return Err(ip.err(expr, Kind::IndexOutOfBounds(i)));
      };
      match arr.get(i_usize) {
        Some(thunk) => {
          let thunk = thunk.clone();
          force(ip, &thunk, expr)
        }
        None => Err(ip.err(expr, Kind::IndexOutOfBounds(i))),
      }
    }
    Val::Lit(Lit::Str(s)) => {
      let i = int_index(ip, idx, expr)?;
      let Ok(i_usize) = usize::try_from(i) else {
        return Err(ip.err(expr, Kind::IndexOutOfBounds(i)));
      };
      match s.as_str().chars().nth(i_usize) {
        Some(c) => Ok(Val::from(Str::from(c.to_string()))),
        None => Err(ip.err(expr, Kind::IndexOutOfBounds(i))),
      }
    }
    v => {
      Err(ip.err(expr, Kind::TypeMismatch { expected: "object, array, or string", actual: v.type_name() }))
    }
  }
}

fn int_index(ip: &Interp<'_>, idx: &Val, expr: ExprId) -> Result<i64> {
  let Val::Lit(Lit::Num(n)) = idx else {
    return Err(ip.err(expr, Kind::InvalidIndex(idx.type_name())));
  };
  match n.as_integer() {
    Some(i) => Ok(i),
    None => Err(ip.err(expr, Kind::InvalidIndex("non-integer number"))),
  }
}

/// Forces a field of an object, checking the object's asserts first. The
/// forced thunk is memoized on the object, so each field of each composite
/// evaluates at most once.
pub(crate) fn object_field(
  ip: &mut Interp<'_>,
  obj: &Object,
  name: &Str,
  expr: ExprId,
) -> Result<Val> {
  run_asserts(ip, obj, expr)?;
  match obj.get_field(name.as_str()) {
    None => Err(ip.err(expr, Kind::NoSuchKey(name.clone()))),
    Some(FieldSrc::Std(f)) => Ok(Val::Fn(Fn::Std(f))),
    Some(FieldSrc::Expr { depth, vis: _, env, expr: field_expr }) => {
      let thunk = obj.field_thunk(depth, name, || Thunk::new(env.with_this(obj), field_expr));
      ip.push_frame(None, expr)?;
      let ret = force(ip, &thunk, expr);
      ip.pop_frame();
      ret
    }
  }
}

/// Runs every assert of the (composed) object once, on the first force of
/// any of its fields. Re-entry through `self` is a no-op.
pub(crate) fn run_asserts(ip: &mut Interp<'_>, obj: &Object, expr: ExprId) -> Result<()> {
  if obj.asserts_checked() {
    return Ok(());
  }
  let id = obj.identity();
  if !ip.start_checking_asserts(id) {
    return Ok(());
  }
  let mut result = Ok(());
  for (env, assert) in obj.asserts() {
    let cond_val = match get(ip, &env, assert.cond) {
      Ok(v) => v,
      Err(e) => {
        result = Err(e);
        break;
      }
    };
    match cond_val {
      Val::Lit(Lit::Bool(true)) => {}
      Val::Lit(Lit::Bool(false)) => {
        result = assert_failure(ip, &env, assert.msg, assert.cond);
        break;
      }
      v => {
        result = Err(
          ip.err(assert.cond, Kind::TypeMismatch { expected: "boolean", actual: v.type_name() }),
        );
        break;
      }
    }
  }
  ip.finish_checking_asserts(id);
  if result.is_ok() {
    obj.set_asserts_checked();
  }
  result
}

fn assert_failure(
  ip: &mut Interp<'_>,
  env: &Env,
  msg: Option<ExprId>,
  cond: ExprId,
) -> Result<()> {
  let msg = match msg {
    Some(m) => {
      let val = get(ip, env, m)?;
      str_conv(ip, val, m)?
    }
    None => Str::new("Assertion failed"),
  };
  Err(ip.err(cond, Kind::AssertionFailed(msg)))
}

fn bin_op(
  ip: &mut Interp<'_>,
  env: &Env,
  lhs: ExprId,
  op: BinOp,
  rhs: ExprId,
  expr: ExprId,
) -> Result<Val> {
  match op {
    BinOp::Add => match (get(ip, env, lhs)?, get(ip, env, rhs)?) {
      (Val::Lit(Lit::Str(a)), b) => {
        let b = str_conv(ip, b, expr)?;
        Ok(Val::from(Str::from(format!("{a}{b}"))))
      }
      (a, Val::Lit(Lit::Str(b))) => {
        let a = str_conv(ip, a, expr)?;
        Ok(Val::from(Str::from(format!("{a}{b}"))))
      }
      (Val::Lit(Lit::Num(a)), Val::Lit(Lit::Num(b))) => mk_num(ip, a.value() + b.value(), expr),
      (Val::Array(mut a), Val::Array(mut b)) => {
        a.append(&mut b);
        Ok(Val::Array(a))
      }
      (Val::Object(a), Val::Object(b)) => Ok(Val::Object(Object::compose(&a, &b))),
      (a, _) => Err(ip.err(
        expr,
        Kind::TypeMismatch { expected: "number, string, array, or object", actual: a.type_name() },
      )),
    },
    BinOp::Sub => float_op(ip, env, lhs, rhs, expr, std::ops::Sub::sub),
    BinOp::Mul => float_op(ip, env, lhs, rhs, expr, std::ops::Mul::mul),
    BinOp::Div => {
      let [a, b] = num_pair(ip, env, lhs, rhs, expr)?;
      if b.value() == 0.0 {
        return Err(ip.err(expr, Kind::DivByZero));
      }
      mk_num(ip, a.value() / b.value(), expr)
    }
    BinOp::Mod => {
      let [a, b] = num_pair(ip, env, lhs, rhs, expr)?;
      if b.value() == 0.0 {
        return Err(ip.err(expr, Kind::DivByZero));
      }
      mk_num(ip, a.value() % b.value(), expr)
    }
    BinOp::Lt => cmp_bool_op(ip, env, lhs, rhs, expr, Ordering::is_lt),
    BinOp::Le => cmp_bool_op(ip, env, lhs, rhs, expr, Ordering::is_le),
    BinOp::Gt => cmp_bool_op(ip, env, lhs, rhs, expr, Ordering::is_gt),
    BinOp::Ge => cmp_bool_op(ip, env, lhs, rhs, expr, Ordering::is_ge),
    BinOp::Eq => {
      let a = get(ip, env, lhs)?;
      let b = get(ip, env, rhs)?;
      Ok(Val::from(eq_val(ip, &a, &b, expr)?))
    }
    BinOp::Ne => {
      let a = get(ip, env, lhs)?;
      let b = get(ip, env, rhs)?;
      Ok(Val::from(!eq_val(ip, &a, &b, expr)?))
    }
    BinOp::And => int_op(ip, env, lhs, rhs, expr, std::ops::BitAnd::bitand),
    BinOp::Or => int_op(ip, env, lhs, rhs, expr, std::ops::BitOr::bitor),
    BinOp::Xor => int_op(ip, env, lhs, rhs, expr, std::ops::BitXor::bitxor),
    BinOp::Shl => int_op(ip, env, lhs, rhs, expr, |a, b| a.wrapping_shl((b & 63) as u32)),
    BinOp::Shr => int_op(ip, env, lhs, rhs, expr, |a, b| a.wrapping_shr((b & 63) as u32)),
    BinOp::LAnd => {
      let a = bool_operand(ip, env, lhs)?;
      if !a {
        return Ok(Val::from(false));
      }
      Ok(Val::from(bool_operand(ip, env, rhs)?))
    }
    BinOp::LOr => {
      let a = bool_operand(ip, env, lhs)?;
      if a {
        return Ok(Val::from(true));
      }
      Ok(Val::from(bool_operand(ip, env, rhs)?))
    }
    BinOp::In => {
      let key = get(ip, env, lhs)?;
      let ty = key.type_name();
      let Val::Lit(Lit::Str(key)) = key else {
        return Err(ip.err(lhs, Kind::TypeMismatch { expected: "string", actual: ty }));
      };
      let container = get(ip, env, rhs)?;
      let ty = container.type_name();
      let Val::Object(obj) = container else {
        return Err(ip.err(rhs, Kind::TypeMismatch { expected: "object", actual: ty }));
      };
      Ok(Val::from(obj.has_field(key.as_str(), true)))
    }
    BinOp::Lookup => {
      let on = get(ip, env, lhs)?;
      let idx = get(ip, env, rhs)?;
      index(ip, &on, &idx, expr)
    }
  }
}

fn un_op(ip: &mut Interp<'_>, op: UnOp, inner: Val, expr: ExprId) -> Result<Val> {
  let ty = inner.type_name();
  match op {
    UnOp::Minus => match inner {
      Val::Lit(Lit::Num(n)) => Ok(Val::from(-n)),
      _ => Err(ip.err(expr, Kind::TypeMismatch { expected: "number", actual: ty })),
    },
    UnOp::Plus => match inner {
      Val::Lit(Lit::Num(n)) => Ok(Val::from(n)),
      _ => Err(ip.err(expr, Kind::TypeMismatch { expected: "number", actual: ty })),
    },
    UnOp::LNot => match inner {
      Val::Lit(Lit::Bool(b)) => Ok(Val::from(!b)),
      _ => Err(ip.err(expr, Kind::TypeMismatch { expected: "boolean", actual: ty })),
    },
    UnOp::Compl => {
      let Val::Lit(Lit::Num(n)) = inner else {
        return Err(ip.err(expr, Kind::TypeMismatch { expected: "number", actual: ty }));
      };
      let Some(i) = n.as_integer() else {
        return Err(ip.err(expr, Kind::TypeMismatch { expected: "integer", actual: "number" }));
      };
      #[allow(clippy::cast_precision_loss)]
      mk_num(ip, !i as f64, expr)
    }
    UnOp::Err => {
      let msg = str_conv(ip, inner, expr)?;
      Err(ip.err(expr, Kind::RuntimeError(msg)))
    }
  }
}

fn mk_num(ip: &Interp<'_>, n: f64, expr: ExprId) -> Result<Val> {
  match Num::try_from(n) {
    Ok(n) => Ok(Val::from(n)),
    Err(e) => {
      Err(ip.err(expr, Kind::RuntimeError(Str::from(format!("not a finite number: {e}")))))
    }
  }
}

fn bool_operand(ip: &mut Interp<'_>, env: &Env, e: ExprId) -> Result<bool> {
  let v = get(ip, env, e)?;
  if let Val::Lit(Lit::Bool(b)) = v {
    Ok(b)
  } else {
    Err(ip.err(e, Kind::TypeMismatch { expected: "boolean", actual: v.type_name() }))
  }
}

fn num_pair(
  ip: &mut Interp<'_>,
  env: &Env,
  lhs: ExprId,
  rhs: ExprId,
  expr: ExprId,
) -> Result<[Num; 2]> {
  match (get(ip, env, lhs)?, get(ip, env, rhs)?) {
    (Val::Lit(Lit::Num(a)), Val::Lit(Lit::Num(b))) => Ok([a, b]),
    (Val::Lit(Lit::Num(_)), b) => {
      Err(ip.err(expr, Kind::TypeMismatch { expected: "number", actual: b.type_name() }))
    }
    (a, _) => Err(ip.err(expr, Kind::TypeMismatch { expected: "number", actual: a.type_name() })),
  }
}

fn float_op<F>(
  ip: &mut Interp<'_>,
  env: &Env,
  lhs: ExprId,
  rhs: ExprId,
  expr: ExprId,
  f: F,
) -> Result<Val>
where
  F: FnOnce(f64, f64) -> f64,
{
  let [a, b] = num_pair(ip, env, lhs, rhs, expr)?;
  mk_num(ip, f(a.value(), b.value()), expr)
}

fn int_op<F>(
  ip: &mut Interp<'_>,
  env: &Env,
  lhs: ExprId,
  rhs: ExprId,
  expr: ExprId,
  f: F,
) -> Result<Val>
where
  F: FnOnce(i64, i64) -> i64,
{
  let [a, b] = num_pair(ip, env, lhs, rhs, expr)?;
  let (Some(a), Some(b)) = (a.as_integer(), b.as_integer()) else {
    return Err(ip.err(expr, Kind::TypeMismatch { expected: "integer", actual: "number" }));
  };
  #[allow(clippy::cast_precision_loss)]
  mk_num(ip, f(a, b) as f64, expr)
}

fn cmp_bool_op<F>(
  ip: &mut Interp<'_>,
  env: &Env,
  lhs: ExprId,
  rhs: ExprId,
  expr: ExprId,
  f: F,
) -> Result<Val>
where
  F: FnOnce(Ordering) -> bool,
{
  let a = get(ip, env, lhs)?;
  let b = get(ip, env, rhs)?;
  let ord = cmp_val(ip, &a, &b, expr)?;
  Ok(Val::from(f(ord)))
}

/// Compares numbers, strings, and arrays (elementwise, lazily forced).
pub(crate) fn cmp_val(ip: &mut Interp<'_>, lhs: &Val, rhs: &Val, expr: ExprId) -> Result<Ordering> {
  match (lhs, rhs) {
    (Val::Lit(Lit::Str(a)), Val::Lit(Lit::Str(b))) => Ok(a.as_str().cmp(b.as_str())),
    (Val::Lit(Lit::Num(a)), Val::Lit(Lit::Num(b))) => Ok(a.cmp(b)),
    (Val::Array(a), Val::Array(b)) => {
      let mut ia = a.iter();
      let mut ib = b.iter();
      loop {
        match (ia.next(), ib.next()) {
          (None, None) => return Ok(Ordering::Equal),
          (None, Some(_)) => return Ok(Ordering::Less),
          (Some(_), None) => return Ok(Ordering::Greater),
          (Some(ta), Some(tb)) => {
            let ta = ta.clone();
            let tb = tb.clone();
            let va = force(ip, &ta, expr)?;
            let vb = force(ip, &tb, expr)?;
            match cmp_val(ip, &va, &vb, expr)? {
              Ordering::Equal => {}
              ord => return Ok(ord),
            }
          }
        }
      }
    }
    _ => {
      Err(ip.err(expr, Kind::TypeMismatch { expected: lhs.type_name(), actual: rhs.type_name() }))
    }
  }
}

/// Deep structural equality, implemented by manifesting both sides and
/// comparing the JSON. Hidden fields therefore do not participate, and
/// cross-type comparisons are simply unequal.
pub(crate) fn eq_val(ip: &mut Interp<'_>, lhs: &Val, rhs: &Val, expr: ExprId) -> Result<bool> {
  let a = manifest::get(ip, lhs, expr)?;
  let b = manifest::get(ip, rhs, expr)?;
  Ok(a == b)
}

/// `toString`: strings pass through, everything else manifests and renders
/// on one line.
pub(crate) fn str_conv(ip: &mut Interp<'_>, val: Val, expr: ExprId) -> Result<Str> {
  match val {
    Val::Lit(Lit::Str(s)) => Ok(s),
    val => {
      let json = manifest::get(ip, &val, expr)?;
      let rendered = json.display_compact().to_string();
      Ok(Str::from(rendered))
    }
  }
}
