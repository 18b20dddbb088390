// Heap intrinsic operations implemented externally.
//
// A heap is a tree-like structure where every subtree's root has a better score
// than all the other nodes in the subtree.
//
// This is often implemented with an array that's traversed in a non-linear way.
// With an arity of 4, these are the indices we assign to each node.
//
// ```text
//                                0
//         1              2               3               4
//    5  6  7  8    9 10 11 12    13 14 15 16     17 18 19 20
// ```
//
// The last level will often be incomplete
//
// You can go up, to the first and to the last children from any index with,
//   - Up:          `(i-1)//A`
//   - First child: `(A*i) + 1`
//   - Last child:  `A(i+1)`

/// The parent node
///
/// ```
/// use astar::heap_primitives::index_parent;
/// assert_eq!(index_parent::<2>(1), 0);
/// assert_eq!(index_parent::<2>(6), 2);
/// assert_eq!(index_parent::<4>(4), 0);
/// assert_eq!(index_parent::<4>(5), 1);
/// assert_eq!(index_parent::<4>(20), 4);
/// ```
#[inline(always)]
#[must_use]
pub fn index_parent<const A: usize>(i: usize) -> usize {
    debug_assert!(i != 0, "The root has no parent");
    (i - 1) / A
}

/// The first children
///
/// ```
/// use astar::heap_primitives::index_first_children;
/// assert_eq!(index_first_children::<2>(0), 1);
/// assert_eq!(index_first_children::<2>(3), 7);
/// assert_eq!(index_first_children::<4>(0), 1);
/// assert_eq!(index_first_children::<4>(2), 9);
/// ```
#[inline(always)]
#[must_use]
pub fn index_first_children<const A: usize>(i: usize) -> usize {
    (A * i) + 1
}

/// The last children
///
/// ```
/// use astar::heap_primitives::index_last_children;
/// assert_eq!(index_last_children::<2>(0), 2);
/// assert_eq!(index_last_children::<2>(6), 14);
/// assert_eq!(index_last_children::<4>(0), 4);
/// assert_eq!(index_last_children::<4>(4), 20);
/// ```
#[inline(always)]
#[must_use]
pub fn index_last_children<const A: usize>(i: usize) -> usize {
    A * (i + 1)
}

/// Offset of the smallest element, preferring the first one on ties.
///
/// ```
/// use astar::heap_primitives::min_index;
/// assert_eq!(min_index(&[3, 1, 2, 1]), 1);
/// assert_eq!(min_index(&[0]), 0);
/// ```
#[inline(always)]
#[must_use]
pub fn min_index<T: PartialOrd>(xs: &[T]) -> usize {
    debug_assert!(!xs.is_empty());

    let mut best = 0;
    for (i, x) in xs.iter().enumerate().skip(1) {
        if *x < xs[best] {
            best = i;
        }
    }
    best
}
