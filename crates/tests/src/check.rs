//! The test harness: run the pipeline, assert on the outcome.

use sonnet_json::Json;

pub(crate) fn manifest(program: sonnet_ast::Expr) -> Json {
  match sonnet::evaluate(&program, sonnet::std_obj()) {
    Ok(json) => json,
    Err(e) => panic!("evaluate error: {e}"),
  }
}

/// The program manifests to exactly this JSON.
pub(crate) fn manifests_to(program: sonnet_ast::Expr, want: serde_json::Value) {
  assert_eq!(manifest(program).into_serde(), want);
}

pub(crate) fn eval_err(program: sonnet_ast::Expr) -> sonnet::Error {
  match sonnet::evaluate(&program, sonnet::std_obj()) {
    Ok(json) => panic!("expected an error, got {}", json.display()),
    Err(e) => e,
  }
}

/// The program fails at runtime with exactly this message.
pub(crate) fn exec_err(program: sonnet_ast::Expr, want: &str) {
  match eval_err(program) {
    sonnet::Error::Eval(e) => assert_eq!(e.to_string(), want),
    e => panic!("expected a runtime error, got: {e}"),
  }
}

/// The program is rejected by the static checks with exactly this message.
pub(crate) fn static_err(program: sonnet_ast::Expr, want: &str) {
  match eval_err(program) {
    sonnet::Error::Check(e) => assert_eq!(e.to_string(), want),
    e => panic!("expected a static error, got: {e}"),
  }
}
