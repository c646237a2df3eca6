//! Merge functions for combining child aggregates
//!
//! Only two associative operations exist: addition and multiplication,
//! both taken modulo the prime in [`modular::MODULUS`].

pub mod modular;

use std::fmt;
use std::str::FromStr;

pub use modular::MODULUS;

/// Associative binary operation combining two child aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MergeFn {
    /// `(a + b) mod P`, identity 0
    #[default]
    Sum,

    /// `(a * b) mod P`, identity 1
    Product,
}

impl MergeFn {
    /// Identity element: `merge(identity, x) == x mod P`
    #[inline]
    pub fn identity(self) -> i32 {
        match self {
            MergeFn::Sum => 0,
            MergeFn::Product => 1,
        }
    }

    /// Combine two values, result always in `[0, P-1]`
    #[inline]
    pub fn combine(self, left: i32, right: i32) -> i32 {
        match self {
            MergeFn::Sum => modular::add(left, right),
            MergeFn::Product => modular::mul(left, right),
        }
    }

    /// The other merge function
    pub fn flipped(self) -> Self {
        match self {
            MergeFn::Sum => MergeFn::Product,
            MergeFn::Product => MergeFn::Sum,
        }
    }

    /// Name used in saved trees and status lines
    pub fn name(self) -> &'static str {
        match self {
            MergeFn::Sum => "Addition",
            MergeFn::Product => "Product",
        }
    }
}

impl fmt::Display for MergeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a merge function name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown merge function '{0}' (expected 'Addition' or 'Product')")]
pub struct UnknownMergeFn(pub String);

impl FromStr for MergeFn {
    type Err = UnknownMergeFn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Addition" => Ok(MergeFn::Sum),
            "Product" => Ok(MergeFn::Product),
            other => Err(UnknownMergeFn(other.to_string())),
        }
    }
}
