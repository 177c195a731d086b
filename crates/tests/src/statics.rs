//! The static checks: each rejected program, and that checking happens
//! before any evaluation.

use crate::check::static_err;
use crate::dsl::{call_args, func, local, named, num, pos, var};

#[test]
fn duplicate_param() {
  static_err(func(vec![("x", None), ("x", None)], var("x")), "duplicate parameter 'x'");
}

#[test]
fn duplicate_local() {
  static_err(
    local(vec![("a", num(1.0)), ("a", num(2.0))], var("a")),
    "duplicate local var 'a'",
  );
}

#[test]
fn positional_after_named() {
  // f(1, a=2, 3): rejected even though f is not even bound
  let program = call_args(var("f"), vec![pos(num(1.0)), named("a", num(2.0)), pos(num(3.0))]);
  static_err(program, "positional after named argument");
}

#[test]
fn check_runs_before_eval() {
  // the duplicate binding is under an expression that would error at runtime
  let program = local(
    vec![("x", crate::dsl::error(num(0.0)))],
    local(vec![("a", num(1.0)), ("a", num(2.0))], var("a")),
  );
  static_err(program, "duplicate local var 'a'");
}

#[test]
fn nested_function_checked() {
  let inner = func(vec![("y", None), ("y", None)], var("y"));
  static_err(local(vec![("f", inner)], num(1.0)), "duplicate parameter 'y'");
}
