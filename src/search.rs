use crate::cost::Cost;
use crate::space::Path;
use crate::space::State;

/// The most-significant bit.
const MOST_SIGNIFICANT_BIT: usize = 1usize << (usize::BITS - 1);
/// The bit used to track `is_closed: bool` within indices.
///
/// Arena indices never get anywhere near it, so we sneak a `bool` into the
/// `SearchTreeIndex` stored in the node map instead of keeping a separate
/// closed set.
const IS_CLOSED_BIT: usize = MOST_SIGNIFICANT_BIT;

/// A reference to a `SearchTreeNode<St, C>`.
///
/// It's more like a `(usize, bool)` underneath to help track whether the node
/// is closed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTreeIndex {
    index: usize,
}

impl SearchTreeIndex {
    #[inline(always)]
    fn new(index: usize) -> Self {
        debug_assert!(index & IS_CLOSED_BIT == 0, "Search tree is too large");
        Self { index }
    }

    #[inline(always)]
    pub fn is_closed(&self) -> bool {
        self.index & IS_CLOSED_BIT == IS_CLOSED_BIT
    }
    #[inline(always)]
    pub fn set_closed(&mut self) {
        debug_assert!(!self.is_closed());
        self.index |= IS_CLOSED_BIT;
    }

    /// The position of the node in the arena.
    #[inline(always)]
    pub fn as_usize(&self) -> usize {
        self.index & !IS_CLOSED_BIT
    }
}

/// The search-local record of a reached State.
///
/// Nothing is ever written on the State itself, so spaces stay immutable.
#[derive(Debug, Clone)]
pub struct SearchTreeNode<St, C>
where
    St: State,
    C: Cost,
{
    pub(crate) parent: Option<SearchTreeIndex>,
    pub(crate) state: St,
    pub(crate) g: C,
    pub(crate) h: C,
    pub(crate) heap_index: usize,
}

impl<St, C> SearchTreeNode<St, C>
where
    St: State,
    C: Cost,
{
    pub fn new(heap_index: usize, s: St, parent: Option<SearchTreeIndex>, g: C, h: C) -> Self {
        Self {
            parent,
            state: s,
            g,
            h,
            heap_index,
        }
    }

    /// Gives this Node a better path through a new parent.
    pub fn reach(&mut self, new_parent: SearchTreeIndex, g: C) {
        debug_assert!(g < self.g);
        self.parent = Some(new_parent);
        self.g = g;
    }

    #[inline(always)]
    pub fn state(&self) -> &St {
        &self.state
    }
    #[inline(always)]
    pub fn g(&self) -> C {
        self.g
    }
    #[inline(always)]
    pub fn h(&self) -> C {
        self.h
    }
    #[inline(always)]
    pub fn f(&self) -> C {
        self.g.saturating_add(&self.h)
    }
}

/// All the Search Nodes of a run.
///
/// An arena that only grows. Nodes point to their parents, naturally forming a
/// tree rooted at the start.
pub(crate) struct SearchTree<St, C>
where
    St: State,
    C: Cost,
{
    nodes: Vec<SearchTreeNode<St, C>>,
}

impl<St, C> SearchTree<St, C>
where
    St: State,
    C: Cost,
{
    #[inline(always)]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    #[inline(always)]
    pub(crate) fn push(&mut self, node: SearchTreeNode<St, C>) -> SearchTreeIndex {
        let index = SearchTreeIndex::new(self.nodes.len());
        self.nodes.push(node);
        index
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Follows parents from a node back to the root.
    #[must_use]
    pub fn path(&self, mut node_index: SearchTreeIndex) -> Path<St, C> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("PathReconstruction");

        let end = &self[node_index];
        let mut path = Path::<St, C>::new_from_start(*end.state());

        while let Some(parent_index) = self[node_index].parent {
            debug_assert!(node_index.as_usize() != parent_index.as_usize());
            let node = &self[node_index];
            let parent = &self[parent_index];
            debug_assert!(parent.g <= node.g);

            path.append(*parent.state(), node.g - parent.g);
            node_index = parent_index;
        }
        path.reverse();

        // Use the exact cost instead of the sum of the differences.
        path.cost = end.g;
        path
    }
}

impl<St, C> Default for SearchTree<St, C>
where
    St: State,
    C: Cost,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<St, C> std::ops::Index<SearchTreeIndex> for SearchTree<St, C>
where
    St: State,
    C: Cost,
{
    type Output = SearchTreeNode<St, C>;

    #[inline(always)]
    fn index(&self, index: SearchTreeIndex) -> &Self::Output {
        &self.nodes[index.as_usize()]
    }
}

impl<St, C> std::ops::IndexMut<SearchTreeIndex> for SearchTree<St, C>
where
    St: State,
    C: Cost,
{
    #[inline(always)]
    fn index_mut(&mut self, index: SearchTreeIndex) -> &mut SearchTreeNode<St, C> {
        &mut self.nodes[index.as_usize()]
    }
}

impl<St, C> std::fmt::Debug for SearchTree<St, C>
where
    St: State,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} nodes)}}", self.len())
    }
}
