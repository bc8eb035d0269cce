//! Boxed numbers.

use std::fmt;

use fdn_ir::{hash_double, HashCode};

/// A number: a 32-bit integer when it fits, a double otherwise.
///
/// Equality is numeric, so `Integer(2)` equals `Real(2.0)` and both hash
/// alike.
#[derive(Copy, Clone, Debug)]
pub enum Number {
    Integer(i32),
    Real(f64),
}

impl Number {
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(i) => f64::from(i),
            Number::Real(r) => r,
        }
    }

    /// The integer value, if this number is integral and fits `i32`.
    pub fn as_integer(self) -> Option<i32> {
        match self {
            Number::Integer(i) => Some(i),
            Number::Real(r) => {
                if r.fract() == 0.0 && r >= f64::from(i32::MIN) && r <= f64::from(i32::MAX) {
                    #[allow(clippy::cast_possible_truncation, reason = "range checked above")]
                    let i = r as i32;
                    Some(i)
                } else {
                    None
                }
            }
        }
    }

    #[inline]
    pub fn is_integer(self) -> bool {
        matches!(self, Number::Integer(_))
    }

    pub fn hash_code(self) -> HashCode {
        hash_double(self.as_f64())
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl From<i32> for Number {
    fn from(i: i32) -> Self {
        Number::Integer(i)
    }
}

impl From<f64> for Number {
    fn from(r: f64) -> Self {
        Number::Real(r)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{i}"),
            Number::Real(r) => write!(f, "{r}"),
        }
    }
}
