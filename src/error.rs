use thiserror::Error;

use crate::cost::Cost;
use crate::space::State;

/// Why a search couldn't run to completion.
///
/// Not finding a path is not an error, searches return `Ok(None)` then.
#[derive(Debug, Error, PartialEq)]
pub enum SearchError<St, C>
where
    St: State,
    C: Cost,
{
    #[error("Start state {state:?} is not part of the space")]
    InvalidStart { state: St },
    #[error("Goal state {state:?} is not part of the space")]
    InvalidGoal { state: St },

    // The space or heuristic is broken
    #[error("Negative cost {cost} going from {from:?} to {to:?}")]
    NegativeEdgeCost { from: St, to: St, cost: C },
    #[error("NaN cost going from {from:?} to {to:?}")]
    NaNEdgeCost { from: St, to: St },
    #[error("Unbounded cost {cost} going from {from:?} to {to:?}")]
    UnboundedEdgeCost { from: St, to: St, cost: C },
    #[error("The cost of reaching {state:?} overflowed")]
    CostOverflow { state: St },
    #[error("Heuristic estimated {h} for {state:?}")]
    InvalidHeuristic { state: St, h: C },
    #[error("{state:?} reaches itself for free")]
    ZeroCostSelfLoop { state: St },
}

impl<St, C> SearchError<St, C>
where
    St: State,
    C: Cost,
{
    /// Whether the space or heuristic returned malformed data.
    pub fn is_invalid_state_model(&self) -> bool {
        match self {
            SearchError::InvalidStart { .. } | SearchError::InvalidGoal { .. } => false,
            SearchError::NegativeEdgeCost { .. }
            | SearchError::NaNEdgeCost { .. }
            | SearchError::UnboundedEdgeCost { .. }
            | SearchError::CostOverflow { .. }
            | SearchError::InvalidHeuristic { .. }
            | SearchError::ZeroCostSelfLoop { .. } => true,
        }
    }
}
