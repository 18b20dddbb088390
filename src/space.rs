use std::fmt::Debug;
use std::hash::Hash;

use crate::cost::Cost;

const MAX_STATES_DISPLAYED: usize = 20;

/// A position in a search space.
///
/// States are small handles. Whatever is expensive to copy (labels, edges)
/// belongs to the `Space`.
pub trait State: Copy + Debug + Eq + Hash {
    /// The identity used to track visited states.
    ///
    /// Must agree with `Eq`, `a == b` iff `a.key() == b.key()`.
    type Key: Copy + Debug + Eq + Hash;

    fn key(&self) -> Self::Key;
}

/// A sequence of states from a start to a goal, both included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<St, C>
where
    St: State,
    C: Cost,
{
    pub states: Vec<St>,
    pub cost: C,
}

impl<St, C> Path<St, C>
where
    St: State,
    C: Cost,
{
    #[inline(always)]
    pub fn new_from_start(start: St) -> Self {
        Self {
            states: vec![start],
            cost: C::zero(),
        }
    }

    #[inline(always)]
    pub fn empty() -> Self {
        Self {
            states: vec![],
            cost: C::zero(),
        }
    }

    #[inline(always)]
    pub fn start(&self) -> Option<&St> {
        self.states.first()
    }
    #[inline(always)]
    pub fn end(&self) -> Option<&St> {
        self.states.last()
    }

    /// Number of transitions in the path.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.states.len().saturating_sub(1)
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Runs sanity checks
    #[inline(always)]
    pub fn seems_valid(&self) -> bool {
        self.cost.valid() && (!self.is_empty() || self.cost == C::zero())
    }

    #[inline(always)]
    pub fn append(&mut self, s: St, c: C) {
        self.states.push(s);
        self.cost = self.cost.saturating_add(&c);
    }

    /// Reverses the Path.
    ///
    /// Useful when naturally reconstructing paths from the end.
    pub fn reverse(&mut self) {
        self.states.reverse();
    }
}

impl<St, C> std::fmt::Display for Path<St, C>
where
    St: State,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match (self.start(), self.end()) {
            (Some(_), Some(_)) => {
                write!(
                    f,
                    "Path({}, {:?})",
                    self.cost,
                    self.states
                        .iter()
                        .take(MAX_STATES_DISPLAYED)
                        .collect::<Vec<_>>(),
                )
            }
            _ => write!(f, "Path()"),
        }
    }
}

/// A search space, a graph that may be implicit.
///
/// Spaces are only read during a search, so one space can be shared by many
/// concurrent searches.
pub trait Space<St, C>: std::fmt::Debug
where
    St: State,
    C: Cost,
{
    /// Expands a State into its successors and the cost of reaching them.
    ///
    /// Costs must be non-negative (and not NaN).
    fn neighbours(&self, s: &St) -> Vec<(St, C)>;

    /// Verify is a State is valid.
    fn valid(&self, s: &St) -> bool;

    /// Checks that every step is a transition of this space, and that the
    /// Path's cost is what these transitions add up to.
    fn valid_path(&self, p: &Path<St, C>) -> bool {
        let Some(start) = p.start() else {
            // Empty paths are fine
            return *p == Path::<St, C>::empty();
        };
        if !self.valid(start) {
            return false;
        }

        let mut cost = C::zero();
        for step in p.states.windows(2) {
            let (from, to) = (&step[0], &step[1]);
            // Take the cheapest edge when there's parallel ones.
            let edge = self
                .neighbours(from)
                .into_iter()
                .filter(|(s, _c)| s.key() == to.key())
                .map(|(_s, c)| c)
                .min();
            match edge {
                Some(c) => cost = cost.saturating_add(&c),
                None => return false,
            }
        }

        cost == p.cost
    }

    fn size(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    struct Counter(u8);
    impl State for Counter {
        type Key = u8;
        fn key(&self) -> u8 {
            self.0
        }
    }

    /// Counts up to 3, with a cheap and an expensive way to step.
    #[derive(Debug)]
    struct CounterSpace;
    impl Space<Counter, u32> for CounterSpace {
        fn neighbours(&self, s: &Counter) -> Vec<(Counter, u32)> {
            if s.0 < 3 {
                vec![(Counter(s.0 + 1), 5), (Counter(s.0 + 1), 2)]
            } else {
                vec![]
            }
        }
        fn valid(&self, s: &Counter) -> bool {
            s.0 <= 3
        }
    }

    #[test]
    fn path_building() {
        let mut p = Path::<Counter, u32>::new_from_start(Counter(2));
        p.append(Counter(1), 2);
        p.append(Counter(0), 2);
        p.reverse();

        assert_eq!(p.start(), Some(&Counter(0)));
        assert_eq!(p.end(), Some(&Counter(2)));
        assert_eq!(p.len(), 2);
        assert_eq!(p.cost, 4);
        assert!(p.seems_valid());
        assert!(CounterSpace.valid_path(&p));
    }

    #[test]
    fn invalid_paths() {
        let space = CounterSpace;

        // Skips a state
        let p = Path {
            states: vec![Counter(0), Counter(2)],
            cost: 2u32,
        };
        assert!(!space.valid_path(&p));

        // Uses the expensive edge's cost
        let p = Path {
            states: vec![Counter(0), Counter(1)],
            cost: 5u32,
        };
        assert!(!space.valid_path(&p));

        // Starts outside the space
        let p = Path {
            states: vec![Counter(4)],
            cost: 0u32,
        };
        assert!(!space.valid_path(&p));

        assert!(space.valid_path(&Path::empty()));
        assert_eq!(format!("{}", Path::<Counter, u32>::empty()), "Path()");
    }
}
