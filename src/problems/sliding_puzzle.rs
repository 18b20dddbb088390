use thiserror::Error;

use crate::problem::Heuristic;
use crate::space::Space;
use crate::space::State;

pub type Tile = u8;
pub type PuzzleCost = u32;

/// The empty cell.
pub const BLANK: Tile = 0;

/// Tiles are packed as nibbles in the `u64` State key.
const MAX_CELLS: usize = 16;
const KEY_BITS_PER_TILE: usize = 4;

/// Where the blank can go, as `(row, column)` deltas.
#[rustfmt::skip]
const MOVES: [(isize, isize); 4] = [
    ( 1,  0), // Down
    (-1,  0), // Up
    ( 0,  1), // Right
    ( 0, -1), // Left
];

/// A configuration of a `N`x`N` sliding puzzle.
///
/// Always a permutation of `0..N*N`, `BLANK` being the empty cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PuzzleState<const N: usize> {
    tiles: [[Tile; N]; N],
}

#[derive(Debug, Error, PartialEq)]
pub enum PuzzleParseError {
    #[error("Expected {expected} tiles, found {found}")]
    WrongTileCount { expected: usize, found: usize },
    #[error("Invalid tile '{0}'")]
    InvalidTile(String),
    #[error("Tile {tile} is out of range, the largest is {max}")]
    OutOfRange { tile: Tile, max: Tile },
    #[error("Tile {0} appears more than once")]
    DuplicateTile(Tile),
}

impl<const N: usize> PuzzleState<N> {
    const CELLS: usize = N * N;
    const FITS_IN_KEY: () = assert!(N >= 2 && N * N <= MAX_CELLS, "Puzzle is too large");

    pub fn new(tiles: [[Tile; N]; N]) -> Result<Self, PuzzleParseError> {
        let () = Self::FITS_IN_KEY;

        let max = (Self::CELLS - 1) as Tile;
        let mut seen = [false; MAX_CELLS];
        for &tile in tiles.iter().flatten() {
            if tile > max {
                return Err(PuzzleParseError::OutOfRange { tile, max });
            }
            if seen[tile as usize] {
                return Err(PuzzleParseError::DuplicateTile(tile));
            }
            seen[tile as usize] = true;
        }

        Ok(Self { tiles })
    }

    /// Tiles in order, with the blank at the bottom-right corner.
    pub fn solved() -> Self {
        let () = Self::FITS_IN_KEY;

        let mut tiles = [[BLANK; N]; N];
        for (i, tile) in tiles.iter_mut().flatten().enumerate() {
            *tile = ((i + 1) % Self::CELLS) as Tile;
        }
        Self { tiles }
    }

    /// A random walk of the blank starting from `solved()`.
    ///
    /// Never undoes the previous move, and is always solvable.
    pub fn scrambled<R: rand::Rng>(r: &mut R, moves: usize) -> Self {
        let space = SlidingPuzzle::<N>;
        let mut previous: Option<Self> = None;
        let mut state = Self::solved();

        for _ in 0..moves {
            let candidates: Vec<Self> = space
                .neighbours(&state)
                .into_iter()
                .map(|(s, _c)| s)
                .filter(|s| Some(*s) != previous)
                .collect();
            let next = candidates[r.random_range(0..candidates.len())];
            previous = Some(state);
            state = next;
        }

        state
    }

    pub fn tiles(&self) -> &[[Tile; N]; N] {
        &self.tiles
    }

    #[inline(always)]
    pub fn tile(&self, row: usize, col: usize) -> Tile {
        self.tiles[row][col]
    }

    /// Position of the blank, as `(row, column)`.
    #[inline(always)]
    pub fn blank(&self) -> (usize, usize) {
        self.position(BLANK)
    }

    #[inline(always)]
    fn position(&self, tile: Tile) -> (usize, usize) {
        let i = self
            .tiles
            .iter()
            .flatten()
            .position(|&t| t == tile)
            .unwrap_or_else(|| unreachable!("PuzzleState is always a permutation"));
        (i / N, i % N)
    }

    /// The `(row, column)` of every tile.
    fn positions(&self) -> [(usize, usize); MAX_CELLS] {
        let mut positions = [(0, 0); MAX_CELLS];
        for (i, &tile) in self.tiles.iter().flatten().enumerate() {
            positions[tile as usize] = (i / N, i % N);
        }
        positions
    }

    /// Moves the blank into a neighbouring cell.
    #[inline(always)]
    fn slide(&self, blank: (usize, usize), to: (usize, usize)) -> Self {
        debug_assert_eq!(self.tile(blank.0, blank.1), BLANK);
        let mut next = *self;
        next.tiles[blank.0][blank.1] = self.tiles[to.0][to.1];
        next.tiles[to.0][to.1] = BLANK;
        next
    }

    /// Whether sliding tiles can turn this configuration into `goal`.
    ///
    /// Every move swaps the blank with a tile, flipping both the parity of the
    /// permutation between both configurations and the parity of the blank's
    /// distance to its goal cell. Both parities need to agree.
    pub fn is_solvable_towards(&self, goal: &Self) -> bool {
        let goal_positions = goal.positions();
        let cells: Vec<usize> = self
            .tiles
            .iter()
            .flatten()
            .map(|&t| {
                let (row, col) = goal_positions[t as usize];
                row * N + col
            })
            .collect();

        let mut inversions = 0usize;
        for (i, a) in cells.iter().enumerate() {
            inversions += cells[i + 1..].iter().filter(|b| a > b).count();
        }

        let (row, col) = self.blank();
        let (goal_row, goal_col) = goal.blank();
        let blank_distance = row.abs_diff(goal_row) + col.abs_diff(goal_col);

        inversions % 2 == blank_distance % 2
    }
}

impl<const N: usize> State for PuzzleState<N> {
    type Key = u64;

    #[inline(always)]
    fn key(&self) -> u64 {
        let () = Self::FITS_IN_KEY;

        let mut key = 0u64;
        for (i, &tile) in self.tiles.iter().flatten().enumerate() {
            key |= u64::from(tile) << (i * KEY_BITS_PER_TILE);
        }
        key
    }
}

impl<const N: usize> Default for PuzzleState<N> {
    fn default() -> Self {
        Self::solved()
    }
}

/// Reads `N*N` tiles separated by whitespace, row by row.
impl<const N: usize> std::convert::TryFrom<&str> for PuzzleState<N> {
    type Error = PuzzleParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != Self::CELLS {
            return Err(PuzzleParseError::WrongTileCount {
                expected: Self::CELLS,
                found: fields.len(),
            });
        }

        let mut tiles = [[BLANK; N]; N];
        for (tile, field) in tiles.iter_mut().flatten().zip(fields) {
            *tile = field
                .parse::<Tile>()
                .map_err(|_| PuzzleParseError::InvalidTile(field.to_string()))?;
        }

        Self::new(tiles)
    }
}

impl<const N: usize> std::fmt::Display for PuzzleState<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in &self.tiles {
            for (col, &tile) in row.iter().enumerate() {
                if col != 0 {
                    write!(f, " ")?;
                }
                if tile == BLANK {
                    write!(f, "{:>2}", "·")?;
                } else {
                    write!(f, "{tile:>2}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The space of `N`x`N` sliding puzzles.
///
/// States carry the whole board, so the space itself is empty.
#[derive(Copy, Clone, Debug, Default)]
pub struct SlidingPuzzle<const N: usize>;

impl<const N: usize> Space<PuzzleState<N>, PuzzleCost> for SlidingPuzzle<N> {
    /// Slides the blank down, up, right, and left, when possible.
    fn neighbours(&self, s: &PuzzleState<N>) -> Vec<(PuzzleState<N>, PuzzleCost)> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("StateExpansion");

        let (row, col) = s.blank();
        let mut v = Vec::with_capacity(MOVES.len());
        for (d_row, d_col) in MOVES {
            let (Some(new_row), Some(new_col)) =
                (row.checked_add_signed(d_row), col.checked_add_signed(d_col))
            else {
                continue;
            };
            if new_row < N && new_col < N {
                v.push((s.slide((row, col), (new_row, new_col)), 1));
            }
        }
        v
    }

    #[inline(always)]
    fn valid(&self, s: &PuzzleState<N>) -> bool {
        PuzzleState::<N>::new(s.tiles).is_ok()
    }

    /// All the permutations, only half of them are reachable from any state.
    fn size(&self) -> Option<usize> {
        (1..=N * N).try_fold(1usize, |acc, i| acc.checked_mul(i))
    }
}

/// Number of tiles out of place. The blank doesn't count.
#[derive(Debug)]
pub struct MisplacedTiles;

impl<const N: usize> Heuristic<SlidingPuzzle<N>, PuzzleState<N>, PuzzleCost> for MisplacedTiles {
    #[inline(always)]
    fn h(_space: &SlidingPuzzle<N>, s: &PuzzleState<N>, goal: &PuzzleState<N>) -> PuzzleCost {
        s.tiles
            .iter()
            .flatten()
            .zip(goal.tiles.iter().flatten())
            .filter(|&(&tile, &goal_tile)| tile != BLANK && tile != goal_tile)
            .count() as PuzzleCost
    }
}

/// Sum of the distances of every tile to its goal cell. The blank doesn't
/// count.
#[derive(Debug)]
pub struct ManhattanDistance;

impl<const N: usize> Heuristic<SlidingPuzzle<N>, PuzzleState<N>, PuzzleCost>
    for ManhattanDistance
{
    #[inline(always)]
    fn h(_space: &SlidingPuzzle<N>, s: &PuzzleState<N>, goal: &PuzzleState<N>) -> PuzzleCost {
        let goal_positions = goal.positions();
        let mut h = 0;
        for (i, &tile) in s.tiles.iter().flatten().enumerate() {
            if tile == BLANK {
                continue;
            }
            let (goal_row, goal_col) = goal_positions[tile as usize];
            h += (i / N).abs_diff(goal_row) + (i % N).abs_diff(goal_col);
        }
        h as PuzzleCost
    }
}
