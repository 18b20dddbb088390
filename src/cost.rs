use std::fmt::Debug;

use num_traits::SaturatingAdd;
use num_traits::Zero;
use num_traits::bounds::UpperBounded;

/// The cost of actions, paths, and heuristic estimates.
///
/// `max_value()` doubles as "+infinity", the cost of unreachable states.
pub trait Cost:
    Copy
    + Debug
    + std::fmt::Display
    + PartialEq
    + core::cmp::Eq
    + PartialOrd
    + Ord
    + SaturatingAdd
    + UpperBounded
    + Zero
    + num_traits::One
    + std::ops::Add<Self, Output = Self>
    + std::ops::Sub<Self, Output = Self>
    + std::ops::AddAssign
{
    #[inline(always)]
    fn valid(&self) -> bool {
        *self != Self::max_value()
    }

    /// Whether this is Not-a-Number. Only meaningful for floating costs.
    #[inline(always)]
    fn is_nan(&self) -> bool {
        false
    }

    #[inline(always)]
    fn is_negative(&self) -> bool {
        *self < Self::zero()
    }

    /// Whether this cost can be used to move between two states.
    #[inline(always)]
    fn well_formed(&self) -> bool {
        !self.is_nan() && !self.is_negative()
    }
}

impl Cost for u32 {}
impl Cost for u64 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_costs() {
        assert!(0u32.well_formed());
        assert!(7u64.valid());
        assert!(!u32::MAX.valid());
        assert!(!5u32.is_negative());
        assert_eq!(SaturatingAdd::saturating_add(&u32::MAX, &1u32), u32::MAX);
    }
}
