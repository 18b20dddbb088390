use std::marker::PhantomData;

use rustc_hash::FxHashMap;

use crate::cost::Cost;
use crate::error::SearchError;
use crate::heap_primitives::min_index;
use crate::problem::Heuristic;
use crate::problem::Instance;
use crate::problem::Problem;
use crate::search::SearchTree;
use crate::search::SearchTreeIndex;
use crate::search::SearchTreeNode;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// The ranking tuple for A*
///
/// We prefer better f-values, and tie break for lower h.
///
/// ```
/// use astar::algorithms::astar::AStarRank;
///
/// // Same f-value, the one closer to the goal goes first.
/// assert!(AStarRank::new(2u32, 0u32) < AStarRank::new(0u32, 2u32));
/// assert!(AStarRank::new(1u32, 1u32) < AStarRank::new(1u32, 2u32));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AStarRank<C: Cost> {
    f: C,
    h: C,
}
impl<C> AStarRank<C>
where
    C: Cost,
{
    pub fn new(g: C, h: C) -> Self {
        Self {
            f: g.saturating_add(&h),
            h,
        }
    }
    /// Improves `g` in `Rank{f, h}` without recomputing `h`.
    pub fn improve_g(&mut self, new_g: C) {
        let f = new_g.saturating_add(&self.h);
        debug_assert!(f <= self.f);
        self.f = f;
    }

    pub fn f(&self) -> C {
        self.f
    }
    pub fn h(&self) -> C {
        self.h
    }
}

const HEAP_ARITY: usize = 4usize;
#[inline(always)]
#[must_use]
fn up(i: usize) -> usize {
    crate::heap_primitives::index_parent::<HEAP_ARITY>(i)
}
#[inline(always)]
#[must_use]
fn down_left(i: usize) -> usize {
    crate::heap_primitives::index_first_children::<HEAP_ARITY>(i)
}
#[inline(always)]
#[must_use]
fn down_right(i: usize) -> usize {
    crate::heap_primitives::index_last_children::<HEAP_ARITY>(i)
}

/// An entry of the open list.
///
/// Ties on rank go to the node that was reached first, so runs are
/// reproducible.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AStarHeapNode<C>
where
    C: Cost,
{
    /// The rank of this node that defines how good it is.
    pub rank: AStarRank<C>,
    /// The index of this node in the Node Arena
    pub node_index: SearchTreeIndex,
}

/// Counters of a search run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States taken out of the open list and closed.
    pub expanded: usize,
    /// States reached for the first time, the start included.
    pub generated: usize,
    /// Cheaper paths found to states that were still open.
    pub improved: usize,
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use thousands::Separable;

        write!(
            f,
            "expanded: {}, generated: {}, improved: {}",
            self.expanded.separate_with_commas(),
            self.generated.separate_with_commas(),
            self.improved.separate_with_commas(),
        )
    }
}

/// A* over a `Problem`, guided by the Heuristic `H`.
///
/// All the per-state bookkeeping lives here, so the problem's space is only
/// read.
#[derive(Debug)]
pub struct AStarSearch<H, P, Sp, St, C>
where
    H: Heuristic<Sp, St, C>,
    P: Problem<Sp, St, C>,
    Sp: Space<St, C>,
    St: State,
    C: Cost,
{
    /// All the Search Nodes. Naturally forms a Search Tree as each node may
    /// have a parent Node.
    search_tree: SearchTree<St, C>,

    /// An intrusive heap of `(AStarRank, SearchTreeIndex)` that keeps the
    /// referenced node updated (`SearchTreeNode::heap_index`).
    /// This allows re-ranking a `SearchTreeNode` in the heap without a linear
    /// search for its `(AStarRank, SearchTreeIndex)` entry.
    ///
    /// ```pseudocode
    /// for (i, hn) in self.open.enumerate():
    ///   assert_eq(self.search_tree[hn.node_index].heap_index, i)
    /// ```
    open: Vec<AStarHeapNode<C>>,

    /// Amalgamation of,
    /// - The `HashMap<St::Key, &mut SearchTreeNode>`, but using `SearchTreeIndex`
    ///   - To find existing Search Nodes from their `State`.
    /// - The "Closed Set" `HashSet<St::Key>`
    ///   - To recall whether we had already explored a state.
    ///
    /// It's the same size as the Search Tree.
    node_map: FxHashMap<St::Key, SearchTreeIndex>,

    problem: P,
    stats: SearchStats,

    _phantom_heuristic: PhantomData<H>,
    _phantom_space: PhantomData<Sp>,
}

impl<H, P, Sp, St, C> AStarSearch<H, P, Sp, St, C>
where
    H: Heuristic<Sp, St, C>,
    P: Problem<Sp, St, C>,
    Sp: Space<St, C>,
    St: State,
    C: Cost,
{
    /// Prepares a search, with only the start in the open list.
    pub fn new(problem: P) -> Result<Self, SearchError<St, C>> {
        let start = *problem.start();
        let goal = *problem.goal();
        if !problem.space().valid(&start) {
            return Err(SearchError::InvalidStart { state: start });
        }
        if !problem.space().valid(&goal) {
            return Err(SearchError::InvalidGoal { state: goal });
        }

        let mut search = Self {
            search_tree: SearchTree::<St, C>::new(),
            open: Vec::with_capacity(256),
            node_map: FxHashMap::default(),

            problem,
            stats: SearchStats::default(),

            _phantom_heuristic: PhantomData,
            _phantom_space: PhantomData,
        };

        let h = search.h(&start)?;
        search.push_new(&start, None, C::zero(), h);

        Ok(search)
    }

    /// Finds a cheapest path from the start to the goal.
    ///
    /// Returns `Ok(None)` when the goal can't be reached.
    pub fn find_path(&mut self) -> Result<Option<Path<St, C>>, SearchError<St, C>> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("FindPath");

        log::debug!(
            "Searching from {:?} to {:?}",
            self.problem.start(),
            self.problem.goal()
        );

        while let Some(node_index) = self.pop() {
            #[cfg(feature = "coz_profile")]
            coz::scope!("NodeExpansion");

            let state = *self.search_tree[node_index].state();
            let g: C = self.search_tree[node_index].g;
            debug_assert!(!self.is_closed(&state));

            if self.problem.is_goal(&state) {
                #[cfg(feature = "coz_profile")]
                coz::progress!("GoalFound");

                let path = self.search_tree.path(node_index);
                log::debug!("Found {path} ({})", self.stats);
                return Ok(Some(path));
            }

            self.mark_closed(&state);
            self.stats.expanded += 1;
            log::trace!("Expanding {state:?} (g={g})");

            // Expand state
            for (s, c) in self.problem.space().neighbours(&state) {
                #[cfg(feature = "coz_profile")]
                coz::scope!("ReachNode");

                Self::check_edge(&state, &s, c)?;

                // Have we seen this State?
                match self.node_map.get(&s.key()) {
                    Some(neigh_index) => {
                        if neigh_index.is_closed() {
                            // Yes, and we expanded the State already.
                            continue;
                        }

                        // Yes, but it's still unexplored. Update the existing
                        // Node if needed.
                        let neigh_index = *neigh_index;
                        let new_g = Self::reach_cost(&s, g, c)?;
                        let neigh = &mut self.search_tree[neigh_index];
                        if new_g < neigh.g {
                            // Found better path to existing node
                            neigh.reach(node_index, new_g);
                            let neigh_heap_index = neigh.heap_index;
                            self.open[neigh_heap_index].rank.improve_g(new_g);
                            self.sift_up(neigh_heap_index);
                            self.stats.improved += 1;
                        }
                    }
                    None => {
                        // No, let's create a new Node for it.
                        let neigh_g = Self::reach_cost(&s, g, c)?;
                        let neigh_h = self.h(&s)?;
                        self.push_new(&s, Some(node_index), neigh_g, neigh_h);
                    }
                }
            }
        }

        log::debug!("No path found ({})", self.stats);
        Ok(None)
    }

    #[inline(always)]
    fn check_edge(from: &St, to: &St, c: C) -> Result<(), SearchError<St, C>> {
        if c.is_nan() {
            return Err(SearchError::NaNEdgeCost {
                from: *from,
                to: *to,
            });
        }
        if c.is_negative() {
            return Err(SearchError::NegativeEdgeCost {
                from: *from,
                to: *to,
                cost: c,
            });
        }
        if !c.valid() {
            return Err(SearchError::UnboundedEdgeCost {
                from: *from,
                to: *to,
                cost: c,
            });
        }
        if c == C::zero() && from.key() == to.key() {
            return Err(SearchError::ZeroCostSelfLoop { state: *from });
        }
        Ok(())
    }

    /// The cost of reaching `s` through an edge costing `c`.
    ///
    /// Saturating at `C::max_value()` means the true cost can't be held.
    #[inline(always)]
    fn reach_cost(s: &St, g: C, c: C) -> Result<C, SearchError<St, C>> {
        let new_g = g.saturating_add(&c);
        if new_g.valid() {
            Ok(new_g)
        } else {
            Err(SearchError::CostOverflow { state: *s })
        }
    }

    #[inline(always)]
    fn h(&self, s: &St) -> Result<C, SearchError<St, C>> {
        let h = H::h(self.problem.space(), s, self.problem.goal());
        if h.well_formed() {
            Ok(h)
        } else {
            Err(SearchError::InvalidHeuristic { state: *s, h })
        }
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// The best known cost to reach a State, if it was reached at all.
    pub fn g(&self, s: &St) -> Option<C> {
        self.node_map
            .get(&s.key())
            .map(|node_index| self.search_tree[*node_index].g)
    }

    #[inline(always)]
    #[must_use]
    pub fn is_closed(&self, s: &St) -> bool {
        match self.node_map.get(&s.key()) {
            Some(node_index) => node_index.is_closed(),
            None => false,
        }
    }
    #[inline(always)]
    fn mark_closed(&mut self, s: &St) {
        match self.node_map.get_mut(&s.key()) {
            Some(node_index) => {
                if !node_index.is_closed() {
                    node_index.set_closed();
                }
            }
            None => {
                unreachable!("Tried closing a state without a node");
            }
        }
    }

    #[inline(always)]
    fn push_new(&mut self, s: &St, parent: Option<SearchTreeIndex>, g: C, h: C) {
        self.verify_heap();
        debug_assert!(!self.node_map.contains_key(&s.key()));

        // NOTE: search_tree and open have indices to each other.
        // Compute next heap index to allow creating SearchTreeNode
        let heap_index = self.open.len(); // Future heap_index

        // 1. Add SearchTreeNode to search_tree
        let node_index: SearchTreeIndex = self
            .search_tree
            .push(SearchTreeNode::<St, C>::new(heap_index, *s, parent, g, h));

        // 2. Add entry to node_map
        debug_assert!(!node_index.is_closed());
        self.node_map.insert(s.key(), node_index);

        // 3. Add AStarHeapNode to open using it's SearchTreeIndex
        self.open.push(AStarHeapNode {
            rank: AStarRank::new(g, h),
            node_index,
        });
        self.sift_up(heap_index);
        self.stats.generated += 1;

        self.verify_heap();
    }

    #[inline(always)]
    #[must_use]
    fn pop(&mut self) -> Option<SearchTreeIndex> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("Pop");

        self.verify_heap();
        let last = self.open.len().checked_sub(1)?;
        if last != 0 {
            self.swap(0, last);
        }
        let heap_node = self.open.pop()?;
        if !self.open.is_empty() {
            self.sift_down(0);
        }
        self.verify_heap();

        Some(heap_node.node_index)
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify_heap(&self) {
        // All good... (hopefully)
    }
    #[inline(always)]
    #[cfg(feature = "verify")]
    pub(crate) fn verify_heap(&self) {
        // Every node,
        for (i, e) in self.open.iter().enumerate() {
            // - Has the right intrusive index set.
            assert_eq!(self.search_tree[e.node_index].heap_index, i);
            // - Is still open.
            assert!(!self.node_map[&self.search_tree[e.node_index].state.key()].is_closed());

            // - Goes after its parent node, if any.
            if i == 0 {
                continue;
            }
            let p = up(i);
            assert!(
                self.open[p] <= self.open[i],
                "Node[{p}]={:?} !<= child [{i}]={:?}. Out of heap of len={}",
                self.open[p],
                self.open[i],
                self.open.len(),
            );
        }
    }

    /// Raises a node
    /// Returns it's new index
    #[inline(always)]
    fn sift_up(&mut self, index: usize) -> usize {
        debug_assert!(
            index < self.open.len(),
            "Node is way out of sync. Index out of bounds..."
        );
        debug_assert_eq!(
            self.search_tree[self.open[index].node_index].heap_index, index,
            "Node is out of sync."
        );

        let mut pos = index;
        while pos != 0 {
            let parent = up(pos);
            if self.open[parent] <= self.open[pos] {
                break;
            }
            // Nodes are swapped. Swap the nodes to fix the order.
            self.swap(parent, pos);
            pos = parent;
        }
        pos
    }

    /// Lowers a node
    /// Returns it's new index
    #[inline(always)]
    fn sift_down(&mut self, mut index: usize) -> usize {
        let len = self.open.len();
        debug_assert!(
            index < len,
            "Node is way out of sync. Index out of bounds..."
        );

        loop {
            // Find the best child
            let first = down_left(index);
            if first >= len {
                break;
            }
            let last = std::cmp::min(down_right(index), len - 1);
            let child = first + min_index(&self.open[first..=last]);

            if self.open[index] <= self.open[child] {
                break;
            }

            self.swap(index, child);
            index = child;
        }
        index
    }

    /// Swaps two elements in the heap.
    ///
    /// For consistency in calling code `l < r` is checked.
    ///
    /// Keeps the intrusive indices in sync.
    #[inline(always)]
    fn swap(&mut self, l: usize, r: usize) {
        debug_assert!(l < r, "Swap({l}, {r}) uses wrong argument order");

        let len = self.open.len();
        debug_assert!(l < len, "Left  swap index {l} is OUT OF BOUNDS({len})");
        debug_assert!(r < len, "Right swap index {r} is OUT OF BOUNDS({len})");
        self.open.swap(l, r);
        self.search_tree[self.open[l].node_index].heap_index = l;
        self.search_tree[self.open[r].node_index].heap_index = r;
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use std::mem::size_of;
        use thousands::Separable;

        writeln!(out, "AStarSearch Stats:")?;
        let s = size_of::<SearchTreeNode<St, C>>();
        let l = self.search_tree.len();
        let c = self.search_tree.capacity();
        writeln!(
            out,
            "  - |Nodes|:  {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Nodes|*: {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        let s = size_of::<AStarHeapNode<C>>();
        let l = self.open.len();
        let c = self.open.capacity();
        writeln!(
            out,
            "  - |Open|:   {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Open|*:  {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        let s = size_of::<(St::Key, SearchTreeIndex)>();
        let l = self.node_map.len();
        let c = self.node_map.capacity();
        writeln!(
            out,
            "  - |Index|:  {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Index|*: {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;

        writeln!(out, "  - {}", self.stats)?;

        Ok(())
    }
}

/// Finds a cheapest path between two states of a space.
///
/// ```
/// use astar::algorithms::astar::search;
/// use astar::problem::ZeroHeuristic;
/// use astar::problems::graph::Graph;
///
/// let mut graph = Graph::<u32>::new();
/// let a = graph.add_node("A", 0).unwrap();
/// let b = graph.add_node("B", 0).unwrap();
/// graph.add_edge(a, b, 7).unwrap();
///
/// let path = search::<ZeroHeuristic, _, _, _>(&graph, a, b).unwrap().unwrap();
/// assert_eq!(graph.labels(&path), vec!["A", "B"]);
/// assert_eq!(path.cost, 7);
///
/// assert_eq!(search::<ZeroHeuristic, _, _, _>(&graph, b, a), Ok(None));
/// ```
pub fn search<H, Sp, St, C>(
    space: &Sp,
    start: St,
    goal: St,
) -> Result<Option<Path<St, C>>, SearchError<St, C>>
where
    H: Heuristic<Sp, St, C>,
    Sp: Space<St, C>,
    St: State,
    C: Cost,
{
    AStarSearch::<H, _, Sp, St, C>::new(Instance::new(space, start, goal))?.find_path()
}

#[cfg(test)]
mod tests {
    use super::*;

    use num_traits::One;
    use num_traits::Zero;

    use crate::float_cost::FloatCost;
    use crate::problem::ZeroHeuristic;

    #[test]
    fn ranking() {
        let c0 = 0u32;
        let c1 = 1u32;
        let c2 = 2u32;

        let g = c2;
        let h_low = c0;
        let h_high = c1;
        assert!(AStarRank::new(g, h_low) < AStarRank::new(g, h_high));
        assert!(AStarRank::new(g, h_high) == AStarRank::new(g, h_high));
        assert!(AStarRank::new(g, h_high) > AStarRank::new(g, h_low));

        // Same f-value, needs tie-breaking on h
        let low = AStarRank::new(c2, c0);
        let high = AStarRank::new(c0, c2);
        assert!(low < high);
        assert!(low.f == high.f);
        assert!(low.h < high.h);

        let mut r = AStarRank::new(c2, c1);
        r.improve_g(c1);
        assert_eq!(r, AStarRank::new(c1, c1));
    }

    /// A line of states where stepping forward costs `cost`, and the last state
    /// loops onto itself.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    struct Step(u8);
    impl State for Step {
        type Key = u8;
        fn key(&self) -> u8 {
            self.0
        }
    }

    #[derive(Debug)]
    struct Line {
        len: u8,
        cost: FloatCost,
        self_loop: FloatCost,
    }
    impl Space<Step, FloatCost> for Line {
        fn neighbours(&self, s: &Step) -> Vec<(Step, FloatCost)> {
            if s.0 + 1 < self.len {
                vec![(Step(s.0 + 1), self.cost)]
            } else {
                vec![(*s, self.self_loop)]
            }
        }
        fn valid(&self, s: &Step) -> bool {
            s.0 < self.len
        }
    }

    fn line(cost: f64, self_loop: f64) -> Line {
        Line {
            len: 3,
            cost: FloatCost::new(cost),
            self_loop: FloatCost::new(self_loop),
        }
    }

    /// NaN for everything but the first state.
    #[derive(Debug)]
    struct NaNHeuristic;
    impl Heuristic<Line, Step, FloatCost> for NaNHeuristic {
        fn h(_space: &Line, s: &Step, _goal: &Step) -> FloatCost {
            if s.0 == 0 {
                FloatCost::zero()
            } else {
                FloatCost::new(f64::NAN)
            }
        }
    }

    #[test]
    fn walks_the_line() {
        let space = line(1.5, 1.0);
        let path = search::<ZeroHeuristic, _, _, _>(&space, Step(0), Step(2))
            .unwrap()
            .unwrap();
        assert_eq!(path.states, vec![Step(0), Step(1), Step(2)]);
        assert_eq!(path.cost, FloatCost::new(3.0));
        assert!(space.valid_path(&path));
    }

    #[test]
    fn start_is_goal() {
        let space = line(1.0, 1.0);
        let mut search =
            AStarSearch::<ZeroHeuristic, _, _, _, _>::new(Instance::new(&space, Step(1), Step(1)))
                .unwrap();
        let path = search.find_path().unwrap().unwrap();
        assert_eq!(path.states, vec![Step(1)]);
        assert_eq!(path.cost, FloatCost::zero());
        assert_eq!(search.stats().expanded, 0);
    }

    #[test]
    fn unreachable_goal() {
        let space = line(1.0, 1.0);
        let mut search =
            AStarSearch::<ZeroHeuristic, _, _, _, _>::new(Instance::new(&space, Step(2), Step(0)))
                .unwrap();
        assert_eq!(search.find_path(), Ok(None));
        assert!(search.is_closed(&Step(2)));
        assert_eq!(search.g(&Step(2)), Some(FloatCost::zero()));
        assert_eq!(search.g(&Step(0)), None);
    }

    #[test]
    fn invalid_endpoints() {
        let space = line(1.0, 1.0);
        assert_eq!(
            search::<ZeroHeuristic, _, _, _>(&space, Step(7), Step(0)),
            Err(SearchError::InvalidStart { state: Step(7) })
        );
        assert_eq!(
            search::<ZeroHeuristic, _, _, _>(&space, Step(0), Step(7)),
            Err(SearchError::InvalidGoal { state: Step(7) })
        );
    }

    #[test]
    fn negative_cost() {
        let space = line(-1.0, 1.0);
        let err = search::<ZeroHeuristic, _, _, _>(&space, Step(0), Step(2)).unwrap_err();
        assert!(err.is_invalid_state_model());
        assert_eq!(
            err,
            SearchError::NegativeEdgeCost {
                from: Step(0),
                to: Step(1),
                cost: FloatCost::new(-1.0)
            }
        );
    }

    #[test]
    fn nan_cost() {
        let space = line(f64::NAN, 1.0);
        let err = search::<ZeroHeuristic, _, _, _>(&space, Step(0), Step(2)).unwrap_err();
        assert!(err.is_invalid_state_model());
        assert!(matches!(err, SearchError::NaNEdgeCost { .. }));
    }

    #[test]
    fn infinite_cost() {
        let space = line(f64::INFINITY, 1.0);
        let err = search::<ZeroHeuristic, _, _, _>(&space, Step(0), Step(2)).unwrap_err();
        assert!(err.is_invalid_state_model());
        assert_eq!(
            err,
            SearchError::UnboundedEdgeCost {
                from: Step(0),
                to: Step(1),
                cost: FloatCost::infinity()
            }
        );
    }

    #[test]
    fn cost_overflow() {
        // 0 -> 1 (MAX-1), 1 -> 2 (5)
        #[derive(Debug)]
        struct Expensive;
        impl Space<Step, u32> for Expensive {
            fn neighbours(&self, s: &Step) -> Vec<(Step, u32)> {
                match s.0 {
                    0 => vec![(Step(1), u32::MAX - 1)],
                    1 => vec![(Step(2), 5)],
                    _ => vec![],
                }
            }
            fn valid(&self, s: &Step) -> bool {
                s.0 < 3
            }
        }

        let err = search::<ZeroHeuristic, _, _, _>(&Expensive, Step(0), Step(2)).unwrap_err();
        assert!(err.is_invalid_state_model());
        assert_eq!(err, SearchError::CostOverflow { state: Step(2) });

        // Right below the limit is still a path.
        let path = search::<ZeroHeuristic, _, _, _>(&Expensive, Step(0), Step(1))
            .unwrap()
            .unwrap();
        assert_eq!(path.cost, u32::MAX - 1);
        assert!(path.cost.valid());
    }

    #[test]
    fn nan_heuristic() {
        let space = line(1.0, 1.0);
        let err = search::<NaNHeuristic, _, _, _>(&space, Step(0), Step(2)).unwrap_err();
        assert!(err.is_invalid_state_model());
        assert!(matches!(
            err,
            SearchError::InvalidHeuristic { state: Step(1), .. }
        ));
    }

    #[test]
    fn zero_cost_self_loop() {
        let space = Line {
            len: 2,
            cost: FloatCost::one(),
            self_loop: FloatCost::zero(),
        };
        let err = search::<ZeroHeuristic, _, _, _>(&space, Step(1), Step(0)).unwrap_err();
        assert_eq!(err, SearchError::ZeroCostSelfLoop { state: Step(1) });

        // Paid loops are just useless.
        let space = line(1.0, 2.0);
        assert_eq!(
            search::<ZeroHeuristic, _, _, _>(&space, Step(2), Step(0)),
            Ok(None)
        );
    }

    #[test]
    fn decrease_key() {
        // 0 -> 1 (10), 0 -> 2 (1), 2 -> 1 (1), 1 -> 3 (1)
        #[derive(Debug)]
        struct Shortcut;
        impl Space<Step, u32> for Shortcut {
            fn neighbours(&self, s: &Step) -> Vec<(Step, u32)> {
                match s.0 {
                    0 => vec![(Step(1), 10), (Step(2), 1)],
                    1 => vec![(Step(3), 1)],
                    2 => vec![(Step(1), 1)],
                    _ => vec![],
                }
            }
            fn valid(&self, s: &Step) -> bool {
                s.0 < 4
            }
        }

        let mut search =
            AStarSearch::<ZeroHeuristic, _, _, _, _>::new(Instance::new(&Shortcut, Step(0), Step(3)))
                .unwrap();
        let path = search.find_path().unwrap().unwrap();
        assert_eq!(path.states, vec![Step(0), Step(2), Step(1), Step(3)]);
        assert_eq!(path.cost, 3);
        let stats = search.stats();
        assert_eq!(stats.improved, 1);
        assert_eq!(stats.generated, 4);
        // No duplicate entries were left behind.
        assert!(search.open.is_empty());

        let mut out = Vec::new();
        search.write_memory_stats(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("AStarSearch Stats:"));
        assert!(out.contains("improved: 1"));
    }

    #[test]
    fn heap_order() {
        // A star of many leaves, popped in (f, h, discovery) order.
        #[derive(Debug)]
        struct Fan;
        impl Space<Step, u32> for Fan {
            fn neighbours(&self, s: &Step) -> Vec<(Step, u32)> {
                if s.0 == 0 {
                    (1..40u8).map(|i| (Step(i), u32::from(i % 7))).collect()
                } else {
                    vec![]
                }
            }
            fn valid(&self, s: &Step) -> bool {
                s.0 <= 40
            }
        }

        let mut search =
            AStarSearch::<ZeroHeuristic, _, _, _, _>::new(Instance::new(&Fan, Step(0), Step(40)))
                .unwrap();
        // Pop manually to check the ordering.
        let root = search.pop().unwrap();
        assert_eq!(*search.search_tree[root].state(), Step(0));
        search.mark_closed(&Step(0));
        for (s, c) in Fan.neighbours(&Step(0)) {
            let h = search.h(&s).unwrap();
            search.push_new(&s, None, c, h);
        }

        let mut previous: Option<(u32, usize)> = None;
        while let Some(i) = search.pop() {
            let key = (search.search_tree[i].g, i.as_usize());
            if let Some(p) = previous {
                assert!(p < key, "{p:?} popped before {key:?}");
            }
            previous = Some(key);
        }
    }
}
