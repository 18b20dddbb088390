use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use anstream::println;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use indoc::indoc;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use astar::algorithms::astar::AStarSearch;
use astar::cost::Cost;
use astar::float_cost::FloatCost;
use astar::problem::Heuristic;
use astar::problem::Instance;
use astar::problem::ZeroHeuristic;
use astar::problems::graph::Graph;
use astar::problems::graph::GraphHeuristic;
use astar::problems::sliding_puzzle::ManhattanDistance;
use astar::problems::sliding_puzzle::MisplacedTiles;
use astar::problems::sliding_puzzle::PuzzleState;
use astar::problems::sliding_puzzle::SlidingPuzzle;
use astar::space::Path;
use astar::space::Space;
use astar::space::State;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const DEMO_GRAPH: &str = indoc! {"
    node S 6
    node A 4
    node B 4
    node C 4
    node D 3.5
    node E 1
    node F 1
    node G 0
    edge S A 2
    edge S B 3
    edge B C 1
    edge B D 3
    edge A C 3
    edge C E 3
    edge C D 1
    edge D F 2
    edge E G 2
    edge F G 1
"};

const DEMO_PUZZLE: &str = indoc! {"
    1 2 3
    0 4 6
    7 5 8
"};

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = astar::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Print search counters and memory usage after every search.
    #[arg(long, global = true)]
    pub stats: bool,

    /// Log filter, like `debug` or `astar=trace`.
    #[arg(long, global = true, env = "ASTAR_LOG", default_value = "info")]
    pub log: String,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Searches a graph file.
    Graph {
        #[arg()]
        file: PathBuf,
        #[arg(long)]
        start: String,
        #[arg(long)]
        goal: String,
        /// Ignore the node estimates, searching like Dijkstra.
        #[arg(long)]
        blind: bool,
    },
    /// Solves a sliding puzzle given as 4, 9 or 16 tiles, 0 being the blank.
    Puzzle {
        #[arg()]
        tiles: String,
        /// Defaults to the tiles in order with the blank last.
        #[arg(long)]
        goal: Option<String>,
        #[arg(long, value_enum, default_value_t = PuzzleHeuristic::Manhattan)]
        heuristic: PuzzleHeuristic,
    },
    /// Solves a small graph and an 8-puzzle.
    Demo,
}

#[derive(ValueEnum, Copy, Clone, Debug)]
pub enum PuzzleHeuristic {
    Misplaced,
    Manhattan,
    #[value(name = "none")]
    Zero,
}

fn solve<H, Sp, St, C>(
    space: &Sp,
    start: St,
    goal: St,
    stats: bool,
) -> Result<Option<Path<St, C>>, Box<dyn Error>>
where
    H: Heuristic<Sp, St, C>,
    Sp: Space<St, C>,
    St: State + 'static,
    C: Cost + 'static,
{
    let mut search = AStarSearch::<H, _, Sp, St, C>::new(Instance::new(space, start, goal))?;

    let started = Instant::now();
    let path = search.find_path()?;
    let elapsed = started.elapsed();
    log::info!("Searched for {elapsed:?} ({})", search.stats());

    if stats {
        search.write_memory_stats(anstream::stdout())?;
    }
    Ok(path)
}

fn run_graph(
    text: &str,
    start: &str,
    goal: &str,
    blind: bool,
    stats: bool,
) -> Result<(), Box<dyn Error>> {
    let graph = Graph::<FloatCost>::try_from(text)?;
    log::debug!("Loaded {graph:?}");

    let start_node = graph
        .node(start)
        .ok_or_else(|| format!("Unknown start node '{start}'"))?;
    let goal_node = graph
        .node(goal)
        .ok_or_else(|| format!("Unknown goal node '{goal}'"))?;

    println!("{} {} -> {}", "Graph".bold(), start.cyan(), goal.cyan());
    let path = if blind {
        solve::<ZeroHeuristic, _, _, _>(&graph, start_node, goal_node, stats)?
    } else {
        solve::<GraphHeuristic, _, _, _>(&graph, start_node, goal_node, stats)?
    };

    match path {
        Some(path) => println!(
            "  {} {} (cost {})",
            "Path:".green(),
            graph.labels(&path).join(" -> "),
            path.cost.yellow()
        ),
        None => println!("  {}", "No path".red()),
    }
    Ok(())
}

fn run_puzzle_sized<const N: usize>(
    tiles: &str,
    goal: Option<&str>,
    heuristic: PuzzleHeuristic,
    stats: bool,
) -> Result<(), Box<dyn Error>> {
    let start = PuzzleState::<N>::try_from(tiles)?;
    let goal = match goal {
        Some(goal) => PuzzleState::<N>::try_from(goal)?,
        None => PuzzleState::<N>::solved(),
    };
    if !start.is_solvable_towards(&goal) {
        log::warn!("The goal can't be reached, the search will exhaust the space");
    }

    println!("{} ({heuristic:?})\n{start}", "Puzzle".bold());
    let space = SlidingPuzzle::<N>;
    let path = match heuristic {
        PuzzleHeuristic::Misplaced => {
            solve::<MisplacedTiles, _, _, _>(&space, start, goal, stats)?
        }
        PuzzleHeuristic::Manhattan => {
            solve::<ManhattanDistance, _, _, _>(&space, start, goal, stats)?
        }
        PuzzleHeuristic::Zero => solve::<ZeroHeuristic, _, _, _>(&space, start, goal, stats)?,
    };

    match path {
        Some(path) => {
            println!("  {} {} moves", "Solved in".green(), path.cost.yellow());
            for s in path.states.iter().skip(1) {
                println!("{s}");
            }
        }
        None => println!("  {}", "Unsolvable".red()),
    }
    Ok(())
}

fn run_puzzle(
    tiles: &str,
    goal: Option<&str>,
    heuristic: PuzzleHeuristic,
    stats: bool,
) -> Result<(), Box<dyn Error>> {
    match tiles.split_whitespace().count() {
        4 => run_puzzle_sized::<2>(tiles, goal, heuristic, stats),
        9 => run_puzzle_sized::<3>(tiles, goal, heuristic, stats),
        16 => run_puzzle_sized::<4>(tiles, goal, heuristic, stats),
        n => Err(format!("Puzzles need 4, 9 or 16 tiles, got {n}").into()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    args.color.write_global();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log)?)
        .with_writer(std::io::stderr)
        .init();

    match args.command.unwrap_or(Command::Demo) {
        Command::Graph {
            file,
            start,
            goal,
            blind,
        } => {
            let text = std::fs::read_to_string(&file)?;
            run_graph(&text, &start, &goal, blind, args.stats)?;
        }
        Command::Puzzle {
            tiles,
            goal,
            heuristic,
        } => run_puzzle(&tiles, goal.as_deref(), heuristic, args.stats)?,
        Command::Demo => {
            run_graph(DEMO_GRAPH, "S", "G", false, args.stats)?;
            run_puzzle(DEMO_PUZZLE, None, PuzzleHeuristic::Misplaced, args.stats)?;
        }
    }

    Ok(())
}
