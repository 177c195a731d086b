//! The standard library, implemented in Rust.
//!
//! Argument binding and per-argument kind checks happen in [`call`], driven
//! by the signatures in `sonnet-std-sig`; the `as_*` extractors below are
//! therefore infallible once a call is dispatched.

#![allow(non_snake_case)]

use crate::error::{Kind, Result};
use crate::val::{Array, Fn, Object, Thunk, Val};
use crate::{exec, manifest, Interp};
use always::always;
use sonnet_core::{ExprId, Id, Lit, Num, Str, Vis};
use sonnet_std_sig::{Kind as ArgKind, StdFn};

pub(crate) fn call(
  ip: &mut Interp<'_>,
  f: StdFn,
  positional: Vec<Thunk>,
  named: Vec<(Id, Thunk)>,
  expr: ExprId,
) -> Result<Val> {
  let params = f.params();
  let n_pos = positional.len();
  if n_pos > params.len() {
    return Err(ip.err(expr, Kind::TooManyArgs(n_pos)));
  }
  let mut slots: Vec<Option<Thunk>> = vec![None; params.len()];
  for (id, thunk) in named {
    let Some(i) = params.iter().position(|p| p.name == id.as_str()) else {
      return Err(ip.err(expr, Kind::BadParam(id)));
    };
    if slots[i].is_some() {
      let msg = Str::from(format!("duplicate argument '{id}'"));
      return Err(ip.err(expr, Kind::RuntimeError(msg)));
    }
    slots[i] = Some(thunk);
  }
  for thunk in positional {
    match slots.iter_mut().find(|slot| slot.is_none()) {
      Some(slot) => *slot = Some(thunk),
      None => return Err(ip.err(expr, Kind::TooManyArgs(n_pos))),
    }
  }
  // std functions are strict: every argument is forced and kind-checked
  // before dispatch
  let mut args = Vec::<Val>::with_capacity(params.len());
  for (param, slot) in params.iter().zip(&slots) {
    let Some(thunk) = slot else {
      return Err(ip.err(expr, Kind::ParamNotBound(Id::new(param.name))));
    };
    let v = exec::force(ip, thunk, expr)?;
    check_kind(ip, param.kind, &v, expr)?;
    args.push(v);
  }
  dispatch(ip, f, args, expr)
}

fn check_kind(ip: &Interp<'_>, kind: ArgKind, v: &Val, expr: ExprId) -> Result<()> {
  let ok = match kind {
    ArgKind::Any => true,
    ArgKind::Bool => matches!(v, Val::Lit(Lit::Bool(_))),
    ArgKind::Num => matches!(v, Val::Lit(Lit::Num(_))),
    ArgKind::Str => matches!(v, Val::Lit(Lit::Str(_))),
    ArgKind::Arr => matches!(v, Val::Array(_)),
    ArgKind::Obj => matches!(v, Val::Object(_)),
    ArgKind::Fn => matches!(v, Val::Fn(_)),
    ArgKind::StrOrArr => matches!(v, Val::Lit(Lit::Str(_)) | Val::Array(_)),
    ArgKind::NumOrNull => matches!(v, Val::Lit(Lit::Num(_) | Lit::Null)),
  };
  if ok {
    Ok(())
  } else {
    Err(ip.err(expr, Kind::TypeMismatch { expected: kind.description(), actual: v.type_name() }))
  }
}

#[allow(clippy::too_many_lines)]
fn dispatch(ip: &mut Interp<'_>, f: StdFn, args: Vec<Val>, expr: ExprId) -> Result<Val> {
  match f {
    StdFn::Type => Ok(Val::from(Str::new(type_(&args[0])))),
    StdFn::IsString => Ok(Val::from(isString(&args[0]))),
    StdFn::IsBoolean => Ok(Val::from(isBoolean(&args[0]))),
    StdFn::IsNumber => Ok(Val::from(isNumber(&args[0]))),
    StdFn::IsObject => Ok(Val::from(isObject(&args[0]))),
    StdFn::IsArray => Ok(Val::from(isArray(&args[0]))),
    StdFn::IsFunction => Ok(Val::from(isFunction(&args[0]))),
    StdFn::Equals => Ok(Val::from(exec::eq_val(ip, &args[0], &args[1], expr)?)),
    StdFn::AssertEqual => assertEqual(ip, &args[0], &args[1], expr),
    StdFn::ObjectFields => Ok(Val::Array(objectFields(&as_obj(&args[0])))),
    StdFn::ObjectHas => Ok(Val::from(as_obj(&args[0]).has_field(as_str(&args[1]).as_str(), false))),
    StdFn::ObjectHasEx => {
      Ok(Val::from(as_obj(&args[0]).has_field(as_str(&args[1]).as_str(), as_bool(&args[2]))))
    }
    StdFn::ObjectHasAll => {
      Ok(Val::from(as_obj(&args[0]).has_field(as_str(&args[1]).as_str(), true)))
    }
    StdFn::Length => length(ip, &args[0], expr),
    StdFn::Abs => mk_num(ip, as_num(&args[0]).value().abs(), expr),
    StdFn::Sign => mk_num(ip, sign(as_num(&args[0]).value()), expr),
    StdFn::Max => mk_num(ip, as_num(&args[0]).value().max(as_num(&args[1]).value()), expr),
    StdFn::Min => mk_num(ip, as_num(&args[0]).value().min(as_num(&args[1]).value()), expr),
    StdFn::Pow => mk_num(ip, as_num(&args[0]).value().powf(as_num(&args[1]).value()), expr),
    StdFn::Exp => mk_num(ip, as_num(&args[0]).value().exp(), expr),
    StdFn::Log => mk_num(ip, as_num(&args[0]).value().ln(), expr),
    StdFn::Exponent => {
      let (_, e) = frexp(as_num(&args[0]).value());
      mk_num(ip, f64::from(e), expr)
    }
    StdFn::Mantissa => {
      let (m, _) = frexp(as_num(&args[0]).value());
      mk_num(ip, m, expr)
    }
    StdFn::Floor => mk_num(ip, as_num(&args[0]).value().floor(), expr),
    StdFn::Ceil => mk_num(ip, as_num(&args[0]).value().ceil(), expr),
    StdFn::Sqrt => mk_num(ip, as_num(&args[0]).value().sqrt(), expr),
    StdFn::Sin => mk_num(ip, as_num(&args[0]).value().sin(), expr),
    StdFn::Cos => mk_num(ip, as_num(&args[0]).value().cos(), expr),
    StdFn::Tan => mk_num(ip, as_num(&args[0]).value().tan(), expr),
    StdFn::Asin => mk_num(ip, as_num(&args[0]).value().asin(), expr),
    StdFn::Acos => mk_num(ip, as_num(&args[0]).value().acos(), expr),
    StdFn::Atan => mk_num(ip, as_num(&args[0]).value().atan(), expr),
    StdFn::Mod => {
      let b = as_num(&args[1]).value();
      if b == 0.0 {
        return Err(ip.err(expr, Kind::DivByZero));
      }
      mk_num(ip, as_num(&args[0]).value() % b, expr)
    }
    StdFn::ToString => Ok(Val::from(exec::str_conv(ip, args[0].clone(), expr)?)),
    StdFn::Codepoint => codepoint(ip, &as_str(&args[0]), expr),
    StdFn::Char => char_(ip, as_num(&args[0]), expr),
    StdFn::Substr => substr(ip, &as_str(&args[0]), as_num(&args[1]), as_num(&args[2]), expr),
    StdFn::StartsWith => {
      Ok(Val::from(as_str(&args[0]).as_str().starts_with(as_str(&args[1]).as_str())))
    }
    StdFn::EndsWith => {
      Ok(Val::from(as_str(&args[0]).as_str().ends_with(as_str(&args[1]).as_str())))
    }
    StdFn::StripChars => {
      let chars = as_str(&args[1]);
      let s = as_str(&args[0]);
      let s = s.as_str().trim_matches(|c: char| chars.as_str().contains(c));
      Ok(Val::from(Str::new(s)))
    }
    StdFn::LstripChars => {
      let chars = as_str(&args[1]);
      let s = as_str(&args[0]);
      let s = s.as_str().trim_start_matches(|c: char| chars.as_str().contains(c));
      Ok(Val::from(Str::new(s)))
    }
    StdFn::RstripChars => {
      let chars = as_str(&args[1]);
      let s = as_str(&args[0]);
      let s = s.as_str().trim_end_matches(|c: char| chars.as_str().contains(c));
      Ok(Val::from(Str::new(s)))
    }
    StdFn::Split => split(ip, &as_str(&args[0]), &as_str(&args[1]), expr),
    StdFn::StrReplace => strReplace(ip, &as_str(&args[0]), &as_str(&args[1]), &as_str(&args[2]), expr),
    StdFn::AsciiLower => Ok(Val::from(Str::from(as_str(&args[0]).as_str().to_ascii_lowercase()))),
    StdFn::AsciiUpper => Ok(Val::from(Str::from(as_str(&args[0]).as_str().to_ascii_uppercase()))),
    StdFn::StringChars => {
      let elems = as_str(&args[0])
        .as_str()
        .chars()
        .map(|c| Thunk::forced(Val::from(Str::from(c.to_string()))))
        .collect();
      Ok(Val::Array(Array::new(elems)))
    }
    StdFn::ParseInt => parseInt(ip, &as_str(&args[0]), expr),
    StdFn::ParseOctal => parse_radix(ip, &as_str(&args[0]), 8, "parseOctal", expr),
    StdFn::ParseHex => parse_radix(ip, &as_str(&args[0]), 16, "parseHex", expr),
    StdFn::EncodeUtf8 => {
      let elems = as_str(&args[0])
        .as_str()
        .bytes()
        .map(|b| Thunk::forced(Val::from(Num::from(usize::from(b)))))
        .collect();
      Ok(Val::Array(Array::new(elems)))
    }
    StdFn::DecodeUtf8 => decodeUTF8(ip, &as_arr(&args[0]), expr),
    StdFn::Lines => lines(ip, &as_arr(&args[0]), expr),
    StdFn::Join => join(ip, &args[0], &as_arr(&args[1]), expr),
    StdFn::MakeArray => makeArray(ip, as_num(&args[0]), &args[1], expr),
    StdFn::Member => member(ip, &args[0], &args[1], expr),
    StdFn::Count => count(ip, &as_arr(&args[0]), &args[1], expr),
    StdFn::Find => find(ip, &args[0], &as_arr(&args[1]), expr),
    StdFn::Map => map(ip, &args[0], &as_arr(&args[1]), expr),
    StdFn::MapWithIndex => mapWithIndex(ip, &args[0], &as_arr(&args[1]), expr),
    StdFn::FilterMap => filterMap(ip, &args[0], &args[1], &as_arr(&args[2]), expr),
    StdFn::FlatMap => flatMap(ip, &args[0], &as_arr(&args[1]), expr),
    StdFn::Filter => filter(ip, &args[0], &as_arr(&args[1]), expr),
    StdFn::Foldl => foldl(ip, &args[0], &as_arr(&args[1]), args[2].clone(), expr),
    StdFn::Foldr => foldr(ip, &args[0], &as_arr(&args[1]), args[2].clone(), expr),
    StdFn::Range => range(ip, as_num(&args[0]), as_num(&args[1]), expr),
    StdFn::Repeat => repeat(ip, &args[0], as_num(&args[1]), expr),
    StdFn::Reverse => {
      let elems = as_arr(&args[0]).iter().rev().cloned().collect();
      Ok(Val::Array(Array::new(elems)))
    }
    StdFn::Slice => slice(ip, &args[0], &args[1], &args[2], &args[3], expr),
    StdFn::FlattenArrays => flattenArrays(ip, &as_arr(&args[0]), expr),
    StdFn::ManifestYamlDoc => {
      let json = manifest::get(ip, &args[0], expr)?;
      Ok(Val::from(Str::from(json.to_yaml())))
    }
    StdFn::ManifestJsonEx => {
      let json = manifest::get(ip, &args[0], expr)?;
      let indent = as_str(&args[1]);
      let rendered = json.display_with_indent(indent.as_str()).to_string();
      Ok(Val::from(Str::from(rendered)))
    }
  }
}

pub(crate) fn type_(x: &Val) -> &'static str {
  x.type_name()
}

pub(crate) fn isString(v: &Val) -> bool {
  matches!(v, Val::Lit(Lit::Str(_)))
}

pub(crate) fn isBoolean(v: &Val) -> bool {
  matches!(v, Val::Lit(Lit::Bool(_)))
}

pub(crate) fn isNumber(v: &Val) -> bool {
  matches!(v, Val::Lit(Lit::Num(_)))
}

pub(crate) fn isObject(v: &Val) -> bool {
  matches!(v, Val::Object(_))
}

pub(crate) fn isArray(v: &Val) -> bool {
  matches!(v, Val::Array(_))
}

pub(crate) fn isFunction(v: &Val) -> bool {
  matches!(v, Val::Fn(_))
}

// extractors for already kind-checked arguments

fn as_num(v: &Val) -> Num {
  if let Val::Lit(Lit::Num(n)) = v {
    *n
  } else {
    always!(false, "checked arg was not a number");
    Num::zero()
  }
}

fn as_str(v: &Val) -> Str {
  if let Val::Lit(Lit::Str(s)) = v {
    s.clone()
  } else {
    always!(false, "checked arg was not a string");
    Str::new("")
  }
}

fn as_bool(v: &Val) -> bool {
  if let Val::Lit(Lit::Bool(b)) = v {
    *b
  } else {
    always!(false, "checked arg was not a boolean");
    false
  }
}

fn as_arr(v: &Val) -> Array {
  if let Val::Array(arr) = v {
    arr.clone()
  } else {
    always!(false, "checked arg was not an array");
    Array::default()
  }
}

fn as_obj(v: &Val) -> Object {
  if let Val::Object(obj) = v {
    obj.clone()
  } else {
    always!(false, "checked arg was not an object");
    Object::std_lib()
  }
}

fn mk_num(ip: &Interp<'_>, n: f64, expr: ExprId) -> Result<Val> {
  match Num::try_from(n) {
    Ok(n) => Ok(Val::from(n)),
    Err(e) => Err(ip.err(expr, Kind::StdError(Str::from(format!("not a finite number: {e}"))))),
  }
}

fn std_err(ip: &Interp<'_>, expr: ExprId, msg: String) -> crate::error::Error {
  ip.err(expr, Kind::StdError(Str::from(msg)))
}

/// Applies a function value to positional thunks.
fn call_fn(ip: &mut Interp<'_>, func: &Val, args: Vec<Thunk>, expr: ExprId) -> Result<Val> {
  exec::call_val(ip, func, args, Vec::new(), None, expr)
}

fn int_arg(ip: &Interp<'_>, n: Num, what: &str, expr: ExprId) -> Result<i64> {
  match n.as_integer() {
    Some(i) => Ok(i),
    None => Err(std_err(ip, expr, format!("{what}: expected an integer, got {n}"))),
  }
}

pub(crate) fn sign(n: f64) -> f64 {
  if n == 0.0 {
    0.0
  } else if n.is_sign_positive() {
    1.0
  } else {
    -1.0
  }
}

/// Splits into (mantissa, exponent) with `0.5 <= |mantissa| < 1` and
/// `x == mantissa * 2^exponent`, or `(0, 0)` for zero.
fn frexp(x: f64) -> (f64, i32) {
  if x == 0.0 {
    return (0.0, 0);
  }
  #[allow(clippy::cast_possible_truncation)]
  let mut e = x.abs().log2().floor() as i32 + 1;
  let mut m = x / (2f64).powi(e);
  while m.abs() >= 1.0 {
    m /= 2.0;
    e += 1;
  }
  while m.abs() < 0.5 {
    m *= 2.0;
    e -= 1;
  }
  (m, e)
}

fn assertEqual(ip: &mut Interp<'_>, a: &Val, b: &Val, expr: ExprId) -> Result<Val> {
  if exec::eq_val(ip, a, b, expr)? {
    return Ok(Val::from(true));
  }
  let a = manifest::get(ip, a, expr)?;
  let b = manifest::get(ip, b, expr)?;
  let msg = format!("{} != {}", a.display_compact(), b.display_compact());
  Err(ip.err(expr, Kind::AssertionFailed(Str::from(msg))))
}

fn objectFields(obj: &Object) -> Array {
  obj
    .fields()
    .into_iter()
    .filter(|&(_, vis)| vis != Vis::Hidden)
    .map(|(name, _)| Thunk::forced(Val::from(name)))
    .collect()
}

pub(crate) fn length(ip: &Interp<'_>, x: &Val, expr: ExprId) -> Result<Val> {
  let n = match x {
    // number of codepoints, not bytes
    Val::Lit(Lit::Str(s)) => s.as_str().chars().count(),
    Val::Array(arr) => arr.len(),
    Val::Object(obj) => obj.fields().iter().filter(|&&(_, vis)| vis != Vis::Hidden).count(),
    Val::Fn(Fn::Regular(f)) => f.params.iter().filter(|(_, d)| d.is_none()).count(),
    Val::Fn(Fn::Std(f)) => f.params().len(),
    Val::Lit(_) => {
      return Err(ip.err(
        expr,
        Kind::TypeMismatch { expected: "string, array, object, or function", actual: x.type_name() },
      ))
    }
  };
  Ok(Val::from(Num::from(n)))
}

fn codepoint(ip: &Interp<'_>, s: &Str, expr: ExprId) -> Result<Val> {
  match s.as_str().chars().next() {
    Some(c) => Ok(Val::from(Num::from(c as u32 as usize))),
    None => Err(std_err(ip, expr, "codepoint: empty string".to_owned())),
  }
}

fn char_(ip: &Interp<'_>, n: Num, expr: ExprId) -> Result<Val> {
  let i = int_arg(ip, n, "char", expr)?;
  let c = u32::try_from(i).ok().and_then(char::from_u32);
  match c {
    Some(c) => Ok(Val::from(Str::from(c.to_string()))),
    None => Err(std_err(ip, expr, format!("char: invalid unicode codepoint {i}"))),
  }
}

fn substr(ip: &Interp<'_>, s: &Str, from: Num, len: Num, expr: ExprId) -> Result<Val> {
  let from = int_arg(ip, from, "substr", expr)?;
  let len = int_arg(ip, len, "substr", expr)?;
  if from < 0 || len < 0 {
    return Err(std_err(ip, expr, "substr: negative argument".to_owned()));
  }
  #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
  let ret: String = s.as_str().chars().skip(from as usize).take(len as usize).collect();
  Ok(Val::from(Str::from(ret)))
}

fn split(ip: &Interp<'_>, s: &Str, c: &Str, expr: ExprId) -> Result<Val> {
  if c.is_empty() {
    return Err(std_err(ip, expr, "split: empty delimiter".to_owned()));
  }
  let elems = s
    .as_str()
    .split(c.as_str())
    .map(|part| Thunk::forced(Val::from(Str::new(part))))
    .collect();
  Ok(Val::Array(Array::new(elems)))
}

fn strReplace(ip: &Interp<'_>, s: &Str, from: &Str, to: &Str, expr: ExprId) -> Result<Val> {
  if from.is_empty() {
    return Err(std_err(ip, expr, "strReplace: empty `from` string".to_owned()));
  }
  Ok(Val::from(Str::from(s.as_str().replace(from.as_str(), to.as_str()))))
}

fn parseInt(ip: &Interp<'_>, s: &Str, expr: ExprId) -> Result<Val> {
  match s.as_str().parse::<i64>() {
    Ok(i) => Ok(Val::from(Num::from(i))),
    Err(_) => Err(std_err(ip, expr, format!("parseInt: invalid integer \"{s}\""))),
  }
}

fn parse_radix(ip: &Interp<'_>, s: &Str, radix: u32, what: &str, expr: ExprId) -> Result<Val> {
  match i64::from_str_radix(s.as_str(), radix) {
    Ok(i) => Ok(Val::from(Num::from(i))),
    Err(_) => Err(std_err(ip, expr, format!("{what}: invalid number \"{s}\""))),
  }
}

fn decodeUTF8(ip: &mut Interp<'_>, arr: &Array, expr: ExprId) -> Result<Val> {
  let mut bytes = Vec::<u8>::with_capacity(arr.len());
  for thunk in arr.iter() {
    let thunk = thunk.clone();
    let v = exec::force(ip, &thunk, expr)?;
    let ty = v.type_name();
    let Val::Lit(Lit::Num(n)) = v else {
      return Err(ip.err(expr, Kind::TypeMismatch { expected: "number", actual: ty }));
    };
    let b = int_arg(ip, n, "decodeUTF8", expr)?;
    let Ok(b) = u8::try_from(b) else {
      return Err(std_err(ip, expr, format!("decodeUTF8: {b} is not a byte")));
    };
    bytes.push(b);
  }
  match String::from_utf8(bytes) {
    Ok(s) => Ok(Val::from(Str::from(s))),
    Err(_) => Err(std_err(ip, expr, "decodeUTF8: invalid UTF-8".to_owned())),
  }
}

fn lines(ip: &mut Interp<'_>, arr: &Array, expr: ExprId) -> Result<Val> {
  let mut ret = String::new();
  for thunk in arr.iter() {
    let thunk = thunk.clone();
    let v = exec::force(ip, &thunk, expr)?;
    let ty = v.type_name();
    let Val::Lit(Lit::Str(s)) = v else {
      return Err(ip.err(expr, Kind::TypeMismatch { expected: "string", actual: ty }));
    };
    ret.push_str(s.as_str());
    ret.push('\n');
  }
  Ok(Val::from(Str::from(ret)))
}

pub(crate) fn join(ip: &mut Interp<'_>, sep: &Val, arr: &Array, expr: ExprId) -> Result<Val> {
  match sep {
    Val::Lit(Lit::Str(sep)) => {
      let mut ret = String::new();
      let mut first = true;
      for thunk in arr.iter() {
        let thunk = thunk.clone();
        let elem = exec::force(ip, &thunk, expr)?;
        // null elements are skipped entirely, separator included
        if matches!(elem, Val::Lit(Lit::Null)) {
          continue;
        }
        let ty = elem.type_name();
        let Val::Lit(Lit::Str(elem)) = elem else {
          return Err(ip.err(expr, Kind::TypeMismatch { expected: "string", actual: ty }));
        };
        if !first {
          ret.push_str(sep.as_str());
        }
        first = false;
        ret.push_str(elem.as_str());
      }
      Ok(Val::from(Str::from(ret)))
    }
    Val::Array(sep) => {
      let mut ret = Array::default();
      let mut first = true;
      for thunk in arr.iter() {
        let thunk = thunk.clone();
        let elem = exec::force(ip, &thunk, expr)?;
        if matches!(elem, Val::Lit(Lit::Null)) {
          continue;
        }
        let ty = elem.type_name();
        let Val::Array(mut elem) = elem else {
          return Err(ip.err(expr, Kind::TypeMismatch { expected: "array", actual: ty }));
        };
        if !first {
          ret.append(&mut sep.clone());
        }
        first = false;
        ret.append(&mut elem);
      }
      Ok(Val::Array(ret))
    }
    v => Err(ip.err(expr, Kind::TypeMismatch { expected: "string or array", actual: v.type_name() })),
  }
}

fn makeArray(ip: &mut Interp<'_>, sz: Num, func: &Val, expr: ExprId) -> Result<Val> {
  let sz = int_arg(ip, sz, "makeArray", expr)?;
  if sz < 0 {
    return Err(std_err(ip, expr, format!("makeArray: negative size {sz}")));
  }
  let mut elems = Vec::<Thunk>::new();
  for i in 0..sz {
    let arg = Thunk::forced(Val::from(Num::from(i)));
    let v = call_fn(ip, func, vec![arg], expr)?;
    elems.push(Thunk::forced(v));
  }
  Ok(Val::Array(Array::new(elems)))
}

fn member(ip: &mut Interp<'_>, container: &Val, x: &Val, expr: ExprId) -> Result<Val> {
  match container {
    Val::Lit(Lit::Str(s)) => {
      let Val::Lit(Lit::Str(x)) = x else {
        return Err(ip.err(expr, Kind::TypeMismatch { expected: "string", actual: x.type_name() }));
      };
      Ok(Val::from(s.as_str().contains(x.as_str())))
    }
    Val::Array(arr) => {
      for thunk in arr.iter() {
        let thunk = thunk.clone();
        let elem = exec::force(ip, &thunk, expr)?;
        if exec::eq_val(ip, &elem, x, expr)? {
          return Ok(Val::from(true));
        }
      }
      Ok(Val::from(false))
    }
    v => Err(ip.err(expr, Kind::TypeMismatch { expected: "string or array", actual: v.type_name() })),
  }
}

fn count(ip: &mut Interp<'_>, arr: &Array, x: &Val, expr: ExprId) -> Result<Val> {
  let mut n = 0usize;
  for thunk in arr.iter() {
    let thunk = thunk.clone();
    let elem = exec::force(ip, &thunk, expr)?;
    if exec::eq_val(ip, &elem, x, expr)? {
      n += 1;
    }
  }
  Ok(Val::from(Num::from(n)))
}

fn find(ip: &mut Interp<'_>, value: &Val, arr: &Array, expr: ExprId) -> Result<Val> {
  let mut out = Vec::<Thunk>::new();
  for (i, thunk) in arr.iter().enumerate() {
    let thunk = thunk.clone();
    let elem = exec::force(ip, &thunk, expr)?;
    if exec::eq_val(ip, &elem, value, expr)? {
      out.push(Thunk::forced(Val::from(Num::from(i))));
    }
  }
  Ok(Val::Array(Array::new(out)))
}

fn map(ip: &mut Interp<'_>, func: &Val, arr: &Array, expr: ExprId) -> Result<Val> {
  let mut out = Vec::<Thunk>::with_capacity(arr.len());
  for thunk in arr.iter() {
    let v = call_fn(ip, func, vec![thunk.clone()], expr)?;
    out.push(Thunk::forced(v));
  }
  Ok(Val::Array(Array::new(out)))
}

fn mapWithIndex(ip: &mut Interp<'_>, func: &Val, arr: &Array, expr: ExprId) -> Result<Val> {
  let mut out = Vec::<Thunk>::with_capacity(arr.len());
  for (i, thunk) in arr.iter().enumerate() {
    let idx = Thunk::forced(Val::from(Num::from(i)));
    let v = call_fn(ip, func, vec![idx, thunk.clone()], expr)?;
    out.push(Thunk::forced(v));
  }
  Ok(Val::Array(Array::new(out)))
}

fn filterMap(
  ip: &mut Interp<'_>,
  filter_func: &Val,
  map_func: &Val,
  arr: &Array,
  expr: ExprId,
) -> Result<Val> {
  let mut out = Vec::<Thunk>::new();
  for thunk in arr.iter() {
    if hof_bool(ip, filter_func, thunk, expr)? {
      let v = call_fn(ip, map_func, vec![thunk.clone()], expr)?;
      out.push(Thunk::forced(v));
    }
  }
  Ok(Val::Array(Array::new(out)))
}

fn flatMap(ip: &mut Interp<'_>, func: &Val, arr: &Array, expr: ExprId) -> Result<Val> {
  let mut out = Array::default();
  for thunk in arr.iter() {
    let v = call_fn(ip, func, vec![thunk.clone()], expr)?;
    let ty = v.type_name();
    let Val::Array(mut part) = v else {
      return Err(ip.err(expr, Kind::TypeMismatch { expected: "array", actual: ty }));
    };
    out.append(&mut part);
  }
  Ok(Val::Array(out))
}

fn filter(ip: &mut Interp<'_>, func: &Val, arr: &Array, expr: ExprId) -> Result<Val> {
  let mut out = Vec::<Thunk>::new();
  for thunk in arr.iter() {
    if hof_bool(ip, func, thunk, expr)? {
      out.push(thunk.clone());
    }
  }
  Ok(Val::Array(Array::new(out)))
}

fn hof_bool(ip: &mut Interp<'_>, func: &Val, arg: &Thunk, expr: ExprId) -> Result<bool> {
  let v = call_fn(ip, func, vec![arg.clone()], expr)?;
  let ty = v.type_name();
  let Val::Lit(Lit::Bool(b)) = v else {
    return Err(ip.err(expr, Kind::TypeMismatch { expected: "boolean", actual: ty }));
  };
  Ok(b)
}

fn foldl(ip: &mut Interp<'_>, func: &Val, arr: &Array, init: Val, expr: ExprId) -> Result<Val> {
  let mut acc = init;
  for thunk in arr.iter() {
    acc = call_fn(ip, func, vec![Thunk::forced(acc), thunk.clone()], expr)?;
  }
  Ok(acc)
}

fn foldr(ip: &mut Interp<'_>, func: &Val, arr: &Array, init: Val, expr: ExprId) -> Result<Val> {
  let mut acc = init;
  let elems: Vec<Thunk> = arr.iter().cloned().collect();
  for thunk in elems.into_iter().rev() {
    acc = call_fn(ip, func, vec![thunk, Thunk::forced(acc)], expr)?;
  }
  Ok(acc)
}

fn range(ip: &Interp<'_>, from: Num, to: Num, expr: ExprId) -> Result<Val> {
  let from = int_arg(ip, from, "range", expr)?;
  let to = int_arg(ip, to, "range", expr)?;
  let mut elems = Vec::<Thunk>::new();
  let mut i = from;
  while i <= to {
    elems.push(Thunk::forced(Val::from(Num::from(i))));
    i += 1;
  }
  Ok(Val::Array(Array::new(elems)))
}

fn repeat(ip: &mut Interp<'_>, what: &Val, count: Num, expr: ExprId) -> Result<Val> {
  let count = int_arg(ip, count, "repeat", expr)?;
  if count < 0 {
    return Err(std_err(ip, expr, format!("repeat: negative count {count}")));
  }
  #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
  let count = count as usize;
  match what {
    Val::Lit(Lit::Str(s)) => Ok(Val::from(Str::from(s.as_str().repeat(count)))),
    Val::Array(arr) => {
      let mut out = Array::default();
      for _ in 0..count {
        out.append(&mut arr.clone());
      }
      Ok(Val::Array(out))
    }
    v => Err(ip.err(expr, Kind::TypeMismatch { expected: "string or array", actual: v.type_name() })),
  }
}

/// `slice(indexable, index, end, step)`, also the target of the surface
/// slicing syntax `x[a:b:c]`. Null parts take their defaults; out-of-range
/// bounds clamp.
fn slice(
  ip: &mut Interp<'_>,
  indexable: &Val,
  index: &Val,
  end: &Val,
  step: &Val,
  expr: ExprId,
) -> Result<Val> {
  let step = match opt_int(ip, step, "slice", expr)? {
    None => 1,
    Some(step) => {
      if step < 1 {
        return Err(std_err(ip, expr, format!("slice: step must be at least 1, got {step}")));
      }
      step
    }
  };
  #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
  let start = opt_int(ip, index, "slice", expr)?.map_or(0, |i| i.max(0) as usize);
  let end = opt_int(ip, end, "slice", expr)?;
  #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
  let step = step as usize;
  match indexable {
    Val::Lit(Lit::Str(s)) => {
      let chars: Vec<char> = s.as_str().chars().collect();
      let end = clamp_end(end, chars.len());
      let ret: String = stepped(start, end, step).filter_map(|i| chars.get(i)).collect();
      Ok(Val::from(Str::from(ret)))
    }
    Val::Array(arr) => {
      let end = clamp_end(end, arr.len());
      let elems: Vec<Thunk> =
        stepped(start, end, step).filter_map(|i| arr.get(i).cloned()).collect();
      Ok(Val::Array(Array::new(elems)))
    }
    v => Err(ip.err(expr, Kind::TypeMismatch { expected: "string or array", actual: v.type_name() })),
  }
}

fn clamp_end(end: Option<i64>, len: usize) -> usize {
  #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
  end.map_or(len, |e| (e.max(0) as usize).min(len))
}

fn stepped(start: usize, end: usize, step: usize) -> impl Iterator<Item = usize> {
  (start..end).step_by(step.max(1))
}

fn opt_int(ip: &Interp<'_>, v: &Val, what: &str, expr: ExprId) -> Result<Option<i64>> {
  match v {
    Val::Lit(Lit::Null) => Ok(None),
    Val::Lit(Lit::Num(n)) => Ok(Some(int_arg(ip, *n, what, expr)?)),
    v => {
      Err(ip.err(expr, Kind::TypeMismatch { expected: "number or null", actual: v.type_name() }))
    }
  }
}

fn flattenArrays(ip: &mut Interp<'_>, arrs: &Array, expr: ExprId) -> Result<Val> {
  let mut out = Array::default();
  for thunk in arrs.iter() {
    let thunk = thunk.clone();
    let v = exec::force(ip, &thunk, expr)?;
    let ty = v.type_name();
    let Val::Array(mut part) = v else {
      return Err(ip.err(expr, Kind::TypeMismatch { expected: "array", actual: ty }));
    };
    out.append(&mut part);
  }
  Ok(Val::Array(out))
}
