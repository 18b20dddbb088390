use std::str::FromStr;

use derive_more::Add;
use derive_more::AddAssign;
use derive_more::Display;
use derive_more::Sub;
use num_traits::One;
use num_traits::SaturatingAdd;
use num_traits::Zero;
use num_traits::bounds::UpperBounded;
use ordered_float::OrderedFloat;

use crate::cost::Cost;

/// A floating point cost.
///
/// Backed by `OrderedFloat` so it's totally ordered. NaN sorts above every
/// other value, which lets the search treat it as "worse than infinity" while
/// still rejecting it as malformed.
#[derive(Copy, Clone, Default, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Add, Sub, AddAssign)]
#[repr(transparent)]
#[display("{_0}")]
pub struct FloatCost(pub OrderedFloat<f64>);

impl Cost for FloatCost {
    #[inline(always)]
    fn is_nan(&self) -> bool {
        self.0.into_inner().is_nan()
    }

    #[inline(always)]
    fn is_negative(&self) -> bool {
        // -0.0 is fine.
        self.0.into_inner() < 0.0
    }
}

impl FloatCost {
    pub const fn new(f: f64) -> Self {
        Self(OrderedFloat(f))
    }

    #[inline(always)]
    pub fn infinity() -> Self {
        Self(OrderedFloat(f64::INFINITY))
    }

    #[inline(always)]
    pub fn get(&self) -> f64 {
        self.0.into_inner()
    }
}

impl From<f64> for FloatCost {
    fn from(f: f64) -> Self {
        Self::new(f)
    }
}

impl FromStr for FloatCost {
    type Err = std::num::ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<f64>().map(Self::new)
    }
}

impl SaturatingAdd for FloatCost {
    /// Floats saturate at infinity on their own.
    fn saturating_add(&self, rhs: &Self) -> Self {
        *self + *rhs
    }
}

impl std::ops::Mul for FloatCost {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Zero for FloatCost {
    #[inline(always)]
    fn zero() -> Self {
        Self::new(0.0)
    }
    #[inline(always)]
    fn is_zero(&self) -> bool {
        self.get() == 0.0
    }
}
impl One for FloatCost {
    #[inline(always)]
    fn one() -> Self {
        Self::new(1.0)
    }
}
impl UpperBounded for FloatCost {
    fn max_value() -> Self {
        Self::infinity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero() {
        assert!(FloatCost::new(0.0).is_zero());
        assert!(FloatCost::new(-0.0).is_zero());
        assert!(FloatCost::new(-0.0).well_formed());
    }

    #[test]
    fn sum() {
        let mut f = FloatCost::zero();
        f += FloatCost::new(3.5);
        f += FloatCost::one();
        assert_eq!(f, FloatCost::new(4.5));
        assert!(f.valid());

        f += FloatCost::infinity();
        assert_eq!(f, FloatCost::max_value());
        assert!(!f.valid());
    }

    #[test]
    fn malformed() {
        assert!(FloatCost::new(f64::NAN).is_nan());
        assert!(!FloatCost::new(f64::NAN).well_formed());
        assert!(FloatCost::new(-1.0).is_negative());
        assert!(!FloatCost::new(-1.0).well_formed());
        // NaN is ordered after everything else.
        assert!(FloatCost::new(f64::NAN) > FloatCost::infinity());
    }

    #[test]
    fn parse() {
        assert_eq!("3.5".parse::<FloatCost>().unwrap(), FloatCost::new(3.5));
        assert!("three".parse::<FloatCost>().is_err());
        assert_eq!(format!("{}", FloatCost::new(2.0)), "2");
    }
}
