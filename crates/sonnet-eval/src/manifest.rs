//! Manifesting values into JSON values.
//!
//! Since values are lazy, they can contain unexecuted expressions, so
//! manifestation is mutually recursive with execution. Manifesting an object
//! runs its asserts, drops its hidden fields, and emits the rest in
//! lexicographic key order.

use crate::error::{Kind, Result};
use crate::val::Val;
use crate::{exec, Interp};
use sonnet_core::{ExprId, Lit, Str, Vis};
use sonnet_json::Json;
use std::collections::BTreeMap;

/// Manifests the value into a JSON value. `at` is the expression to blame
/// for errors that have no better span, e.g. a function in the output.
pub(crate) fn get(ip: &mut Interp<'_>, val: &Val, at: ExprId) -> Result<Json> {
  match val {
    Val::Lit(lit) => Ok(match lit {
      Lit::Null => Json::Null,
      Lit::Bool(b) => Json::Bool(*b),
      Lit::Num(n) => Json::Num(*n),
      Lit::Str(s) => Json::Str(s.clone()),
    }),
    Val::Array(arr) => {
      let mut out = Vec::with_capacity(arr.len());
      for thunk in arr.iter() {
        let thunk = thunk.clone();
        let v = exec::force(ip, &thunk, at)?;
        out.push(get(ip, &v, at)?);
      }
      Ok(Json::Array(out))
    }
    Val::Object(obj) => {
      exec::run_asserts(ip, obj, at)?;
      let mut map = BTreeMap::<Str, Json>::new();
      for (name, vis) in obj.fields() {
        if vis == Vis::Hidden {
          continue;
        }
        let v = exec::object_field(ip, obj, &name, at)?;
        let json = get(ip, &v, at)?;
        map.insert(name, json);
      }
      Ok(Json::Object(map))
    }
    Val::Fn(_) => Err(ip.err(at, Kind::ManifestError(Str::new("cannot manifest function")))),
  }
}
