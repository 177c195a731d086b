//! Strings and identifiers.

use std::borrow::Borrow;
use std::fmt;
use std::rc::Rc;

/// An immutable shared string. Cloning is cheap; comparison, ordering and
/// hashing go by content, so these work as map keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Str(Rc<str>);

impl Str {
  #[must_use]
  pub fn new(contents: &str) -> Self {
    Self(Rc::from(contents))
  }

  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.0
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl From<&str> for Str {
  fn from(s: &str) -> Self {
    Self::new(s)
  }
}

impl From<String> for Str {
  fn from(s: String) -> Self {
    Self(Rc::from(s.into_boxed_str()))
  }
}

impl Borrow<str> for Str {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Str {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// An identifier.
///
/// The keywords `self`, `super` and `$` travel through the pipeline as
/// ordinary identifiers and are given meaning by the evaluator. Identifiers
/// minted by the desugarer start with `$` followed by digits, which no
/// surface identifier can collide with.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(Str);

impl Id {
  #[must_use]
  pub fn new(contents: &str) -> Self {
    Self(Str::new(contents))
  }

  #[must_use]
  pub fn as_str(&self) -> &str {
    self.0.as_str()
  }

  #[must_use]
  pub fn as_name(&self) -> &Str {
    &self.0
  }

  #[must_use]
  pub fn is_self(&self) -> bool {
    self.as_str() == "self"
  }

  #[must_use]
  pub fn is_super(&self) -> bool {
    self.as_str() == "super"
  }

  #[must_use]
  pub fn is_dollar(&self) -> bool {
    self.as_str() == "$"
  }

  /// Returns the `n`th unutterable identifier.
  #[must_use]
  pub fn unutterable(n: usize) -> Self {
    Self(Str::from(format!("${n}")))
  }
}

impl From<Str> for Id {
  fn from(s: Str) -> Self {
    Self(s)
  }
}

impl fmt::Display for Id {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}
