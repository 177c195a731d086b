use crate::check::{exec_err, manifests_to};
use crate::dsl::{add, assert_, bin, bool_, error, func, if_, if_else, local, null, num, str_, var};
use crate::dsl::call;
use serde_json::json;
use sonnet_core::BinOp;

#[test]
fn literals() {
  manifests_to(null(), json!(null));
  manifests_to(bool_(true), json!(true));
  manifests_to(num(3.0), json!(3));
  manifests_to(str_("hi"), json!("hi"));
}

#[test]
fn if_else_yes() {
  manifests_to(if_else(bin(num(1.0), BinOp::Lt, num(2.0)), num(3.0), num(4.0)), json!(3));
}

#[test]
fn if_without_else_yes() {
  manifests_to(if_(bin(num(1.0), BinOp::Lt, num(2.0)), num(3.0)), json!(3));
}

#[test]
fn if_without_else_no() {
  manifests_to(if_(bin(num(1.0), BinOp::Gt, num(2.0)), num(3.0)), json!(null));
}

#[test]
fn if_non_bool_cond() {
  exec_err(if_(num(1.0), num(3.0)), "type mismatch: expected boolean, found number");
}

#[test]
fn local_bind() {
  manifests_to(local(vec![("x", num(3.0))], add(var("x"), num(1.0))), json!(4));
}

#[test]
fn function() {
  let program = local(
    vec![("inc", func(vec![("x", None)], add(var("x"), num(1.0))))],
    call(var("inc"), vec![num(3.0)]),
  );
  manifests_to(program, json!(4));
}

#[test]
fn explicit_error() {
  exec_err(error(str_("oh no!")), "oh no!");
}

#[test]
fn error_message_from_non_string() {
  exec_err(error(num(4.0)), "4");
}

#[test]
fn assert_passes() {
  let program = assert_(
    bin(add(num(2.0), num(2.0)), BinOp::Lt, num(5.0)),
    Some(str_("math makes sense")),
    num(0.0),
  );
  manifests_to(program, json!(0));
}

#[test]
fn assert_fails_with_message() {
  exec_err(assert_(bool_(false), Some(str_("math broke")), num(0.0)), "math broke");
}

#[test]
fn assert_fails_default_message() {
  exec_err(assert_(bool_(false), None, num(0.0)), "Assertion failed");
}

#[test]
fn var_not_found() {
  exec_err(var("nope"), "variable not found: nope");
}

#[test]
fn determinism() {
  let mk = || local(vec![("x", num(3.0))], add(var("x"), num(1.0)));
  let a = crate::check::manifest(mk());
  let b = crate::check::manifest(mk());
  assert_eq!(a, b);
}
