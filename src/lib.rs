use shadow_rs::shadow;

shadow!(build);

// Internals
// ---------
pub mod heap_primitives;
pub mod search;

// Costs
// -----
pub mod cost;
pub mod float_cost;

// Search space and problems
// -------------------------
pub mod error;
pub mod problem;
pub mod space;

// Problems
// --------
pub mod problems;

// Algorithms
// ----------
pub mod algorithms;
