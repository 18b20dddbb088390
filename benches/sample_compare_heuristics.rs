use std::time::Duration;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use hrsw::Stopwatch;
use human_duration::human_duration;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use astar::algorithms::astar::AStarSearch;
use astar::problem::Heuristic;
use astar::problem::Instance;
use astar::problem::ZeroHeuristic;
use astar::problems::sliding_puzzle::ManhattanDistance;
use astar::problems::sliding_puzzle::MisplacedTiles;
use astar::problems::sliding_puzzle::PuzzleCost;
use astar::problems::sliding_puzzle::PuzzleState;
use astar::problems::sliding_puzzle::SlidingPuzzle;

/// Maximum time willing to wait for a single benchmark instance.
const MAX_INSTANCE_TIME: Duration = Duration::from_secs(1);
const NUM_INSTANCES: u64 = 5;
const SCRAMBLE_MOVES: usize = 40;

type Puzzle8 = PuzzleState<3>;

fn solve<H>(space: &SlidingPuzzle<3>, start: Puzzle8) -> Option<PuzzleCost>
where
    H: Heuristic<SlidingPuzzle<3>, Puzzle8, PuzzleCost>,
{
    let goal = Puzzle8::solved();
    let mut search = AStarSearch::<H, _, _, _, _>::new(Instance::new(space, start, goal)).ok()?;
    search.find_path().ok()?.map(|path| path.cost)
}

/// Runs an instance once, telling whether it's quick enough to sample.
fn quick_enough<H>(name: &str, instance_name: &str, space: &SlidingPuzzle<3>, start: Puzzle8) -> bool
where
    H: Heuristic<SlidingPuzzle<3>, Puzzle8, PuzzleCost>,
{
    let mut stopwatch = Stopwatch::new_started();
    let cost = solve::<H>(space, start);
    stopwatch.stop();
    let elapsed = stopwatch.elapsed();
    println!(
        "{name} {instance_name}: {cost:?} in {}",
        human_duration(&elapsed)
    );

    if elapsed > MAX_INSTANCE_TIME {
        log::warn!(
            "Skipping {instance_name} as it takes too long with {name} ({})",
            human_duration(&elapsed)
        );
        return false;
    }
    true
}

fn compare_heuristics(c: &mut Criterion) {
    let mut group = c.benchmark_group("SlidingPuzzle Heuristics");
    let space = SlidingPuzzle::<3>;

    for i in 0..NUM_INSTANCES {
        let mut rng = ChaCha8Rng::seed_from_u64(i);
        let start = Puzzle8::scrambled(&mut rng, SCRAMBLE_MOVES);
        let instance_name = format!("scrambled[{SCRAMBLE_MOVES}]:{i}");

        if quick_enough::<ZeroHeuristic>("Blind", &instance_name, &space, start) {
            group.bench_with_input(BenchmarkId::new("Blind", &instance_name), &start, |b, s| {
                b.iter(|| solve::<ZeroHeuristic>(&space, *s))
            });
        }
        if quick_enough::<MisplacedTiles>("Misplaced", &instance_name, &space, start) {
            group.bench_with_input(
                BenchmarkId::new("Misplaced", &instance_name),
                &start,
                |b, s| b.iter(|| solve::<MisplacedTiles>(&space, *s)),
            );
        }
        if quick_enough::<ManhattanDistance>("Manhattan", &instance_name, &space, start) {
            group.bench_with_input(
                BenchmarkId::new("Manhattan", &instance_name),
                &start,
                |b, s| b.iter(|| solve::<ManhattanDistance>(&space, *s)),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, compare_heuristics);
criterion_main!(benches);
