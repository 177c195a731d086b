//! JSON values, the output of manifestation.
//!
//! Object keys live in a `BTreeMap`, which gives the lexicographic output
//! ordering manifestation requires.

use sonnet_core::{Num, Str};
use std::collections::BTreeMap;
use std::fmt;

/// A JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Json {
  Null,
  Bool(bool),
  Num(Num),
  Str(Str),
  Array(Vec<Json>),
  Object(BTreeMap<Str, Json>),
}

impl Json {
  /// Pretty display with 2-space indentation.
  #[must_use]
  pub fn display(&self) -> impl fmt::Display + '_ {
    DisplayJson { json: self, depth: Some(0), unit: "  " }
  }

  /// Pretty display with a caller-chosen indentation unit, the form
  /// `manifestJsonEx` uses.
  #[must_use]
  pub fn display_with_indent<'a>(&'a self, unit: &'a str) -> impl fmt::Display + 'a {
    DisplayJson { json: self, depth: Some(0), unit }
  }

  /// Single-line display, the form `toString` uses.
  #[must_use]
  pub fn display_compact(&self) -> impl fmt::Display + '_ {
    DisplayJson { json: self, depth: None, unit: "" }
  }

  /// Renders as a YAML document: scalars as JSON (which is valid YAML),
  /// containers in block style with 2-space indentation.
  #[must_use]
  pub fn to_yaml(&self) -> String {
    let mut lines = Vec::<String>::new();
    yaml_lines(self, 0, &mut lines);
    lines.join("\n")
  }

  /// Convert from serde.
  #[must_use]
  pub fn from_serde(serde: &serde_json::Value) -> Self {
    match serde {
      serde_json::Value::Null => Self::Null,
      serde_json::Value::Bool(b) => Self::Bool(*b),
      serde_json::Value::Number(num) => {
        let num = num.as_f64().unwrap_or(0.0);
        Self::Num(Num::always_from_f64(num))
      }
      serde_json::Value::String(str) => Self::Str(Str::new(str)),
      serde_json::Value::Array(vs) => Self::Array(vs.iter().map(Self::from_serde).collect()),
      serde_json::Value::Object(map) => {
        let iter = map.iter().map(|(k, v)| (Str::new(k), Self::from_serde(v)));
        Self::Object(iter.collect())
      }
    }
  }

  /// Convert to serde. Whole numbers become JSON integers.
  #[must_use]
  pub fn into_serde(&self) -> serde_json::Value {
    match self {
      Json::Null => serde_json::Value::Null,
      Json::Bool(b) => serde_json::Value::Bool(*b),
      Json::Num(n) => {
        let num = match n.as_integer() {
          Some(i) => serde_json::Number::from(i),
          None => serde_json::Number::from_f64(n.value()).unwrap_or_else(|| 0.into()),
        };
        serde_json::Value::Number(num)
      }
      Json::Str(s) => serde_json::Value::String(s.as_str().to_owned()),
      Json::Array(vs) => serde_json::Value::Array(vs.iter().map(Json::into_serde).collect()),
      Json::Object(map) => {
        let iter = map.iter().map(|(k, v)| (k.as_str().to_owned(), v.into_serde()));
        serde_json::Value::Object(iter.collect())
      }
    }
  }
}

/// Writes `s` as a JSON string literal, with escapes.
pub fn escape<W: fmt::Write>(s: &str, f: &mut W) -> fmt::Result {
  f.write_str("\"")?;
  for c in s.chars() {
    match c {
      '"' => f.write_str("\\\"")?,
      '\\' => f.write_str("\\\\")?,
      '\n' => f.write_str("\\n")?,
      '\r' => f.write_str("\\r")?,
      '\t' => f.write_str("\\t")?,
      '\u{8}' => f.write_str("\\b")?,
      '\u{c}' => f.write_str("\\f")?,
      c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
      c => f.write_char(c)?,
    }
  }
  f.write_str("\"")
}

struct DisplayJson<'a> {
  json: &'a Json,
  /// `None` for single-line output.
  depth: Option<usize>,
  unit: &'a str,
}

impl fmt::Display for DisplayJson<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.json {
      Json::Null => f.write_str("null"),
      Json::Bool(b) => b.fmt(f),
      Json::Num(n) => n.fmt(f),
      Json::Str(s) => escape(s.as_str(), f),
      Json::Array(vs) => {
        if vs.is_empty() {
          return f.write_str("[ ]");
        }
        f.write_str("[")?;
        let mut first = true;
        for v in vs {
          self.sep(first, f)?;
          first = false;
          DisplayJson { json: v, depth: self.depth.map(|n| n + 1), unit: self.unit }.fmt(f)?;
        }
        self.close(f)?;
        f.write_str("]")
      }
      Json::Object(map) => {
        if map.is_empty() {
          return f.write_str("{ }");
        }
        f.write_str("{")?;
        let mut first = true;
        for (k, v) in map {
          self.sep(first, f)?;
          first = false;
          escape(k.as_str(), f)?;
          f.write_str(": ")?;
          DisplayJson { json: v, depth: self.depth.map(|n| n + 1), unit: self.unit }.fmt(f)?;
        }
        self.close(f)?;
        f.write_str("}")
      }
    }
  }
}

impl DisplayJson<'_> {
  fn sep(&self, first: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if !first {
      f.write_str(",")?;
    }
    match self.depth {
      None => {
        if !first {
          f.write_str(" ")?;
        }
        Ok(())
      }
      Some(n) => {
        f.write_str("\n")?;
        write_indent(self.unit, n + 1, f)
      }
    }
  }

  fn close(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.depth {
      None => Ok(()),
      Some(n) => {
        f.write_str("\n")?;
        write_indent(self.unit, n, f)
      }
    }
  }
}

fn write_indent(unit: &str, n: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
  for _ in 0..n {
    f.write_str(unit)?;
  }
  Ok(())
}

/// `s` as a JSON string literal, which is also a valid YAML scalar.
fn quote(s: &str) -> String {
  let mut out = String::new();
  let _ = escape(s, &mut out);
  out
}

/// A scalar (or empty container) rendered inline, or `None` for a container
/// that needs block layout.
fn yaml_scalar(json: &Json) -> Option<String> {
  match json {
    Json::Null => Some("null".to_owned()),
    Json::Bool(b) => Some(b.to_string()),
    Json::Num(n) => Some(n.to_string()),
    Json::Str(s) => Some(quote(s.as_str())),
    Json::Array(vs) => vs.is_empty().then(|| "[]".to_owned()),
    Json::Object(map) => map.is_empty().then(|| "{}".to_owned()),
  }
}

fn yaml_lines(json: &Json, indent: usize, out: &mut Vec<String>) {
  let pad = "  ".repeat(indent);
  if let Some(s) = yaml_scalar(json) {
    out.push(format!("{pad}{s}"));
    return;
  }
  match json {
    Json::Array(vs) => {
      for v in vs {
        match yaml_scalar(v) {
          Some(s) => out.push(format!("{pad}- {s}")),
          None => {
            out.push(format!("{pad}-"));
            yaml_lines(v, indent + 1, out);
          }
        }
      }
    }
    Json::Object(map) => {
      for (k, v) in map {
        let key = quote(k.as_str());
        match yaml_scalar(v) {
          Some(s) => out.push(format!("{pad}{key}: {s}")),
          None => {
            out.push(format!("{pad}{key}:"));
            yaml_lines(v, indent + 1, out);
          }
        }
      }
    }
    Json::Null | Json::Bool(_) | Json::Num(_) | Json::Str(_) => {}
  }
}
