#![allow(missing_docs)]

//! This module defines various unit types and their conversions, along with [`Limit`], an extended
//! value type for quantities which may be unbounded.
use std::cmp::Ordering;
use std::fmt;

/// Represents a dimensionless quantity.
#[derive(
    Debug, Clone, Copy, PartialEq, PartialOrd, Default, derive_more::Add, derive_more::Sub,
)]
pub struct Dimensionless(pub f64);

impl std::ops::Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless::from(self.0 * rhs.0)
    }
}

impl std::ops::Div for Dimensionless {
    type Output = Dimensionless;

    fn div(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless::from(self.0 / rhs.0)
    }
}

impl From<f64> for Dimensionless {
    fn from(val: f64) -> Self {
        Self(val)
    }
}

impl From<Dimensionless> for f64 {
    fn from(val: Dimensionless) -> Self {
        val.0
    }
}

impl fmt::Display for Dimensionless {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            derive_more::Add,
            derive_more::Sub,
            derive_more::Display,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub fn from(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }

            /// Whether the value is finite (not infinite or NaN)
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name::from(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name::from(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name::from(self.0 / rhs.0)
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold($name(0.0), |acc, x| acc + x)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::from(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::from(self.0 * lhs.0)
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Div<$Rhs> for $Lhs {
            type Output = $Out;
            fn div(self, rhs: $Rhs) -> $Out {
                <$Out>::from(self.0 / rhs.0)
            }
        }
    };
}

// Base quantities
unit_struct!(Money);
unit_struct!(Flow);

// Derived quantities
unit_struct!(MoneyPerFlow);

// Division rules
impl_div!(Money, Flow, MoneyPerFlow);

// Multiplication rules
impl_mul!(MoneyPerFlow, Flow, Money);

/// A quantity which may be unbounded in either direction.
///
/// Used in place of floating-point infinities for capacities and costs, so that an unbounded value
/// cannot silently propagate through downstream arithmetic. Variants are declared in ascending
/// order, so the derived ordering places [`Limit::NegInfinity`] below every finite value and
/// [`Limit::Infinity`] above.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Limit<T> {
    /// Unbounded below
    NegInfinity,
    /// A finite value
    Finite(T),
    /// Unbounded above
    Infinity,
}

impl<T: Copy> Limit<T> {
    /// Whether this is a finite value
    pub fn is_finite(&self) -> bool {
        matches!(self, Limit::Finite(_))
    }

    /// The finite value, if there is one
    pub fn finite(&self) -> Option<T> {
        match self {
            Limit::Finite(value) => Some(*value),
            _ => None,
        }
    }

    /// The finite value, or `default` if unbounded
    pub fn finite_or(&self, default: T) -> T {
        self.finite().unwrap_or(default)
    }
}

impl<T: Copy + std::ops::Add<Output = T>> Limit<T> {
    /// Add two limits, saturating at the unbounded variants.
    ///
    /// Returns `None` when adding opposite infinities, as the result is undefined.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        match (self, rhs) {
            (Limit::Finite(lhs), Limit::Finite(rhs)) => Some(Limit::Finite(lhs + rhs)),
            (Limit::Infinity, Limit::NegInfinity) | (Limit::NegInfinity, Limit::Infinity) => None,
            (Limit::Infinity, _) | (_, Limit::Infinity) => Some(Limit::Infinity),
            (Limit::NegInfinity, _) | (_, Limit::NegInfinity) => Some(Limit::NegInfinity),
        }
    }
}

impl<T: PartialOrd> Limit<T> {
    /// Compare a finite value against this limit
    pub fn cmp_value(&self, value: &T) -> Option<Ordering> {
        match self {
            Limit::NegInfinity => Some(Ordering::Less),
            Limit::Finite(limit) => limit.partial_cmp(value),
            Limit::Infinity => Some(Ordering::Greater),
        }
    }
}

impl<T> From<T> for Limit<T> {
    fn from(value: T) -> Self {
        Limit::Finite(value)
    }
}

impl<T: fmt::Display> fmt::Display for Limit<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::NegInfinity => write!(f, "-inf"),
            Limit::Finite(value) => write!(f, "{value}"),
            Limit::Infinity => write!(f, "inf"),
        }
    }
}
