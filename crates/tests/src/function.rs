//! Functions: closures, defaults, named and positional argument binding.

use crate::check::{exec_err, manifests_to};
use crate::dsl::{
  add, bin, bool_, call, call_named, error, func, if_else, local, num, var,
};
use serde_json::json;
use sonnet_core::BinOp;

fn with_f(f: sonnet_ast::Expr, body: sonnet_ast::Expr) -> sonnet_ast::Expr {
  local(vec![("f", f)], body)
}

#[test]
fn default_uses_other_param() {
  // local f(x, y=x+1) = y; f(10)
  let f = func(vec![("x", None), ("y", Some(add(var("x"), num(1.0))))], var("y"));
  manifests_to(with_f(f, call(var("f"), vec![num(10.0)])), json!(11));
}

#[test]
fn defaults_mutually_recursive() {
  // local f(a=b+1, b=2) = a + b; f()
  let f = func(
    vec![("a", Some(add(var("b"), num(1.0)))), ("b", Some(num(2.0)))],
    add(var("a"), var("b")),
  );
  manifests_to(with_f(f, call(var("f"), Vec::new())), json!(5));
}

#[test]
fn named_args_any_order() {
  // local f(x, y) = x - y; f(y=1, x=10)
  let f = func(vec![("x", None), ("y", None)], bin(var("x"), BinOp::Sub, var("y")));
  let program = with_f(f, call_named(var("f"), Vec::new(), vec![("y", num(1.0)), ("x", num(10.0))]));
  manifests_to(program, json!(9));
}

#[test]
fn positional_fills_unfilled_left_to_right() {
  // local f(a, b, c) = a*100 + b*10 + c; f(1, 2, c=3)
  let f = func(
    vec![("a", None), ("b", None), ("c", None)],
    add(
      add(bin(var("a"), BinOp::Mul, num(100.0)), bin(var("b"), BinOp::Mul, num(10.0))),
      var("c"),
    ),
  );
  let program = with_f(f, call_named(var("f"), vec![num(1.0), num(2.0)], vec![("c", num(3.0))]));
  manifests_to(program, json!(123));
}

#[test]
fn positional_skips_named_position() {
  // local f(a, b) = a*10 + b; f(1, a=5): the positional arg lands on b
  let f = func(vec![("a", None), ("b", None)], add(bin(var("a"), BinOp::Mul, num(10.0)), var("b")));
  let program = with_f(f, call_named(var("f"), vec![num(1.0)], vec![("a", num(5.0))]));
  manifests_to(program, json!(51));
}

#[test]
fn too_many_positional() {
  let f = func(vec![("x", None)], var("x"));
  exec_err(with_f(f, call(var("f"), vec![num(1.0), num(2.0)])), "too many arguments: 2");
}

#[test]
fn named_arg_not_a_param() {
  let f = func(vec![("x", None)], var("x"));
  exec_err(
    with_f(f, call_named(var("f"), Vec::new(), vec![("q", num(1.0))])),
    "argument `q` was not requested at the function definition site",
  );
}

#[test]
fn required_param_not_bound() {
  // local f(b, x) = if b then x else 1; f(false)
  let f = func(vec![("b", None), ("x", None)], if_else(var("b"), var("x"), num(1.0)));
  exec_err(
    with_f(f, call(var("f"), vec![bool_(false)])),
    "parameter `x` was not defined at the function call site",
  );
}

#[test]
fn duplicate_named_arg() {
  let f = func(vec![("x", None)], var("x"));
  exec_err(
    with_f(f, call_named(var("f"), Vec::new(), vec![("x", num(1.0)), ("x", num(2.0))])),
    "duplicate argument 'x'",
  );
}

#[test]
fn closure_captures_env() {
  let program = local(
    vec![("a", num(1.0))],
    local(vec![("f", func(vec![("x", None)], add(var("x"), var("a"))))], call(var("f"), vec![num(2.0)])),
  );
  manifests_to(program, json!(3));
}

#[test]
fn calling_a_non_function() {
  exec_err(call(num(3.0), Vec::new()), "type mismatch: expected function, found number");
}

#[test]
fn higher_order() {
  // local apply(f, x) = f(x); apply(function(n) n + 1, 2)
  let apply = func(vec![("f", None), ("x", None)], call(var("f"), vec![var("x")]));
  let program = local(
    vec![("apply", apply)],
    call(var("apply"), vec![func(vec![("n", None)], add(var("n"), num(1.0))), num(2.0)]),
  );
  manifests_to(program, json!(3));
}

#[test]
fn unused_arg_not_evaluated() {
  let f = func(vec![("x", None)], num(1.0));
  manifests_to(with_f(f, call(var("f"), vec![error(num(0.0))])), json!(1));
}
