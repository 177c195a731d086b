//! Non-strictness: errors hide until forced, thunks force at most once, and
//! re-entrant forcing is the infinite-recursion error.

use crate::check::{exec_err, manifests_to};
use crate::dsl::{
  array, call, error, field, func, get, index, local, num, obj, self_, str_, var,
};
use serde_json::json;

#[test]
fn unforced_field_error_is_fine() {
  let program = get(obj(vec![field("a", num(1.0)), field("b", error(str_("x")))]), "a");
  manifests_to(program, json!(1));
}

#[test]
fn forcing_the_bad_field_errors() {
  let program = get(obj(vec![field("a", num(1.0)), field("b", error(str_("x")))]), "b");
  exec_err(program, "x");
}

#[test]
fn unused_local_error_is_fine() {
  manifests_to(local(vec![("x", error(str_("boom")))], num(1.0)), json!(1));
}

#[test]
fn unforced_array_element_error_is_fine() {
  manifests_to(index(array(vec![error(str_("x")), num(2.0)]), num(1.0)), json!(2));
}

#[test]
fn unused_argument_error_is_fine() {
  let program = call(func(vec![("x", None)], num(1.0)), vec![error(str_("boom"))]);
  manifests_to(program, json!(1));
}

#[test]
fn mutually_recursive_locals_cycle() {
  let program = local(vec![("a", var("b")), ("b", var("a"))], var("a"));
  exec_err(program, "infinite recursion");
}

#[test]
fn self_referential_fields_cycle() {
  let program = get(
    obj(vec![field("a", get(self_(), "b")), field("b", get(self_(), "a"))]),
    "a",
  );
  exec_err(program, "infinite recursion");
}

#[test]
fn directly_recursive_local() {
  exec_err(local(vec![("a", var("a"))], var("a")), "infinite recursion");
}

#[test]
fn unbounded_call_recursion_is_caught() {
  // local f(x) = f(x); f(1) grows the call stack, not a thunk cycle
  let program = local(
    vec![("f", func(vec![("x", None)], call(var("f"), vec![var("x")])))],
    call(var("f"), vec![num(1.0)]),
  );
  exec_err(program, "max stack frames exceeded");
}

#[test]
fn recursion_with_base_case_terminates() {
  // local f(n) = if n == 0 then 0 else f(n - 1); f(20)
  use sonnet_core::BinOp;
  let body = crate::dsl::if_else(
    crate::dsl::bin(var("n"), BinOp::Eq, num(0.0)),
    num(0.0),
    call(var("f"), vec![crate::dsl::bin(var("n"), BinOp::Sub, num(1.0))]),
  );
  let program =
    local(vec![("f", func(vec![("n", None)], body))], call(var("f"), vec![num(20.0)]));
  manifests_to(program, json!(0));
}
