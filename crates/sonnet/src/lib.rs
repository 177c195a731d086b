//! The whole pipeline: desugar → check → eval → manifest.
//!
//! This is the one operation the core exposes to its driver. The driver owns
//! parsing (producing the [`sonnet_ast`] tree) and decides what `std` value
//! to bind; [`std_obj`] is the stock one.

use sonnet_core::Span;
use sonnet_eval::val::Val;
use sonnet_eval::Interp;
use sonnet_json::Json;
use std::fmt;

pub use sonnet_eval::std_obj;

/// Evaluates the program to JSON, with `std` bound in the initial
/// environment and nothing else.
///
/// # Errors
///
/// If the static checks or evaluation failed.
pub fn evaluate(program: &sonnet_ast::Expr, std: Val) -> Result<Json, Error> {
  let desugar = sonnet_desugar::get(program);
  sonnet_statics::check(&desugar.arena, desugar.top).map_err(Error::Check)?;
  let mut ip = Interp::new(&desugar.arena);
  let env = sonnet_eval::initial_env(std);
  let val = sonnet_eval::get_exec(&mut ip, &env, desugar.top).map_err(Error::Eval)?;
  sonnet_eval::get_manifest(&mut ip, &val, desugar.top).map_err(Error::Eval)
}

/// An error from any stage of the pipeline.
#[derive(Debug)]
pub enum Error {
  /// From the upstream parser, carried through for uniform rendering.
  Parse { desc: String, span: Span },
  Check(sonnet_statics::Error),
  Eval(sonnet_eval::error::Error),
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Error::Parse { desc, span } => {
        writeln!(f, "Parse error: {} ({desc})", span.file)?;
        write!(f, "  {span}")
      }
      Error::Check(e) => {
        writeln!(f, "Static error: {e}")?;
        write!(f, "  {}", e.span)
      }
      Error::Eval(e) => {
        writeln!(f, "Runtime error: {e}")?;
        write!(f, "  {}", e.span)?;
        // innermost frame first
        for frame in e.trace.iter().rev() {
          f.write_str("\n")?;
          match &frame.name {
            Some(name) => write!(f, "  {} function <{name}>", frame.span)?,
            None => write!(f, "  {}", frame.span)?,
          }
        }
        Ok(())
      }
    }
  }
}
