//! See [`Num`].

use always::always;
use std::fmt;

/// A finite floating-point number, that is, one that is not NaN or infinity.
///
/// Jsonnet has no NaN or infinity: any operation that would produce one is an
/// evaluation error instead. Constructing a `Num` goes through `try_from`, so
/// holding a `Num` is proof of finiteness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Num(f64);

impl Num {
  /// Returns positive zero.
  #[must_use]
  pub fn zero() -> Self {
    Self(0.0)
  }

  /// Returns positive one.
  #[must_use]
  pub fn one() -> Self {
    Self(1.0)
  }

  /// Exposes the inner value of this number. It will be finite.
  #[must_use]
  pub fn value(self) -> f64 {
    self.0
  }

  /// Returns this as an `i64` if it is a whole number that fits.
  #[must_use]
  pub fn as_integer(self) -> Option<i64> {
    if self.0.fract() != 0.0 {
      return None;
    }
    #[allow(clippy::cast_precision_loss)]
    if self.0 < i64::MIN as f64 || self.0 > i64::MAX as f64 {
      return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(self.0 as i64)
  }

  /// Delegates to `try_from`, and uses always! to assert the Err case is not hit. But if it is, use
  /// `0.0` instead.
  #[must_use]
  pub fn always_from_f64(n: f64) -> Self {
    match Self::try_from(n) {
      Ok(n) => n,
      Err(e) => {
        always!(false, "not finite: {e}");
        Self(0.0)
      }
    }
  }
}

/// OK because NaN is not allowed
impl Eq for Num {}

impl PartialOrd for Num {
  fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Num {
  fn cmp(&self, other: &Self) -> std::cmp::Ordering {
    if let Some(x) = self.value().partial_cmp(&other.value()) {
      x
    } else {
      always!(false, "should not be NaN");
      std::cmp::Ordering::Equal
    }
  }
}

impl TryFrom<f64> for Num {
  type Error = NotFinite;

  fn try_from(value: f64) -> Result<Self, Self::Error> {
    if value.is_nan() {
      return Err(NotFinite::Nan);
    }
    if value.is_infinite() {
      let inf = if value.is_sign_positive() { NotFinite::Pos } else { NotFinite::Neg };
      return Err(inf);
    }
    Ok(Self(value))
  }
}

impl From<usize> for Num {
  fn from(value: usize) -> Self {
    #[allow(clippy::cast_precision_loss)]
    Self(value as f64)
  }
}

impl From<i64> for Num {
  fn from(value: i64) -> Self {
    #[allow(clippy::cast_precision_loss)]
    Self(value as f64)
  }
}

impl std::ops::Neg for Num {
  type Output = Self;

  fn neg(self) -> Self::Output {
    Self(-self.0)
  }
}

/// The largest magnitude below which every whole `f64` is exactly one integer.
const EXACT_INT_BOUND: f64 = 9_007_199_254_740_992.0;

impl fmt::Display for Num {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let v = self.0;
    if v == 0.0 {
      return f.write_str("0");
    }
    if v.fract() == 0.0 && v.abs() < EXACT_INT_BOUND {
      #[allow(clippy::cast_possible_truncation)]
      return write!(f, "{}", v as i64);
    }
    if v.abs() >= EXACT_INT_BOUND || v.abs() < 1e-6 {
      write!(f, "{v:e}")
    } else {
      write!(f, "{v}")
    }
  }
}

/// A way to be not finite.
#[derive(Debug, Clone, Copy)]
pub enum NotFinite {
  /// Not a number.
  Nan,
  /// Positive infinity.
  Pos,
  /// Negative infinity.
  Neg,
}

impl fmt::Display for NotFinite {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NotFinite::Nan => f.write_str("not a number"),
      NotFinite::Pos => f.write_str("positive infinity"),
      NotFinite::Neg => f.write_str("negative infinity"),
    }
  }
}
