use crate::cost::Cost;
use crate::space::Space;
use crate::space::State;

/// A search problem, a space with a start and a goal.
pub trait Problem<Sp, St, C>: std::fmt::Debug
where
    Sp: Space<St, C>,
    St: State,
    C: Cost,
{
    fn space(&self) -> &Sp;
    fn start(&self) -> &St;
    fn goal(&self) -> &St;

    fn is_goal(&self, s: &St) -> bool {
        s.key() == self.goal().key()
    }
}

/// An estimate of the cost from a state to a goal.
///
/// A* only finds optimal paths when the heuristic is admissible (never
/// over-estimates) and, since closed states are never re-opened, consistent
/// (`h(s) <= c(s, s') + h(s')` for every transition).
pub trait Heuristic<Sp, St, C>: std::fmt::Debug
where
    Sp: Space<St, C>,
    St: State,
    C: Cost,
{
    fn h(space: &Sp, s: &St, goal: &St) -> C;
}

/// The blind heuristic. Turns A* into Dijkstra's algorithm.
#[derive(Debug)]
pub struct ZeroHeuristic;

impl<Sp, St, C> Heuristic<Sp, St, C> for ZeroHeuristic
where
    Sp: Space<St, C>,
    St: State,
    C: Cost,
{
    #[inline(always)]
    fn h(_space: &Sp, _s: &St, _goal: &St) -> C {
        C::zero()
    }
}

/// A problem on a borrowed space.
///
/// Lets many searches share the same space.
#[derive(Debug)]
pub struct Instance<'s, Sp, St> {
    space: &'s Sp,
    start: St,
    goal: St,
}

impl<'s, Sp, St> Instance<'s, Sp, St>
where
    St: State,
{
    pub fn new(space: &'s Sp, start: St, goal: St) -> Self {
        Self { space, start, goal }
    }
}

impl<Sp, St, C> Problem<Sp, St, C> for Instance<'_, Sp, St>
where
    Sp: Space<St, C>,
    St: State,
    C: Cost,
{
    #[inline(always)]
    fn space(&self) -> &Sp {
        self.space
    }
    #[inline(always)]
    fn start(&self) -> &St {
        &self.start
    }
    #[inline(always)]
    fn goal(&self) -> &St {
        &self.goal
    }
}
