use clap::Parser;
use env_logger::Env;
use grid_astar::{AStar, Cell, Grid, GridConfig, Path, SearchObserver};
use grid_astar::{DEFAULT_OBSTACLE_DENSITY, DEFAULT_SIDE};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

const CLEAR: &str = "\x1b[2J\x1b[H";
const RESET: &str = "\x1b[0m";
const SOURCE: &str = "\x1b[1;44m";
const GOAL: &str = "\x1b[1;41m";
const OBSTACLE: &str = "\x1b[33;40m";
const CLOSED: &str = "\x1b[30;46m";
const ON_PATH: &str = "\x1b[30;43m";

/// Animates A* on a fresh random grid, over and over.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of rows and columns
    #[arg(short, long, default_value_t = DEFAULT_SIDE)]
    side: usize,

    /// Fraction of cells drawn as obstacle candidates, in [0, 1)
    #[arg(short, long, default_value_t = DEFAULT_OBSTACLE_DENSITY)]
    density: f64,

    /// Pause between search steps
    #[arg(long, default_value = "50")]
    step_delay_ms: u64,

    /// Pause between finishing a search and generating the next grid
    #[arg(long, default_value = "1000")]
    cycle_pause_ms: u64,

    /// Number of grids to search (0 = forever)
    #[arg(short, long, default_value = "0")]
    cycles: usize,

    /// Seed for a reproducible sequence of grids
    #[arg(long)]
    seed: Option<u64>,

    /// Only log results, do not draw the grid
    #[arg(long)]
    headless: bool,
}

/// Draws the grid after every step and paces the search.
struct Animation<'a> {
    grid: &'a Grid,
    closed: Vec<bool>,
    step_delay: Duration,
    draw: bool,
}

impl<'a> Animation<'a> {
    fn new(grid: &'a Grid, step_delay: Duration, draw: bool) -> Animation<'a> {
        Animation {
            grid,
            closed: vec![false; grid.len()],
            step_delay,
            draw,
        }
    }

    fn style(&self, cell: &Cell, path: Option<&Path>) -> (&'static str, char) {
        if cell == self.grid.source() {
            (SOURCE, 'S')
        } else if cell == self.grid.goal() {
            (GOAL, 'G')
        } else if cell.obstacle {
            (OBSTACLE, '#')
        } else if path.map_or(false, |p| p.contains(cell.index)) {
            (ON_PATH, '*')
        } else if self.closed[cell.index] {
            (CLOSED, 'o')
        } else {
            (RESET, '.')
        }
    }

    fn render(&self, path: Option<&Path>) -> io::Result<()> {
        let mut out = io::stdout().lock();
        write!(out, "{CLEAR}")?;
        let side = self.grid.side();
        for row in 0..side {
            for cell in (0..side).filter_map(|col| self.grid.cell_at(row, col)) {
                let (color, glyph) = self.style(cell, path);
                write!(out, "{color} {glyph}{RESET}")?;
            }
            writeln!(out)?;
        }
        out.flush()
    }

    fn redraw(&self, path: Option<&Path>) {
        if self.draw {
            if let Err(e) = self.render(path) {
                error!("Could not draw grid: {}", e);
            }
        }
    }
}

impl SearchObserver for Animation<'_> {
    fn on_step(&mut self) {
        self.redraw(None);
        thread::sleep(self.step_delay);
    }
    fn on_closed(&mut self, cell: &Cell) {
        self.closed[cell.index] = true;
    }
}

fn main() -> ExitCode {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let args = Args::parse();
    let config = GridConfig::new(args.side, args.density);
    if let Err(e) = config.validate() {
        error!("{}", e);
        return ExitCode::FAILURE;
    }
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let step_delay = if args.headless {
        Duration::ZERO
    } else {
        Duration::from_millis(args.step_delay_ms)
    };
    let cycle_pause = Duration::from_millis(args.cycle_pause_ms);

    let mut cycle = 0;
    while args.cycles == 0 || cycle < args.cycles {
        cycle += 1;
        let grid = match config.generate(&mut rng) {
            Ok(grid) => grid,
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        };
        let mut animation = Animation::new(&grid, step_delay, !args.headless);
        let mut astar = AStar::new(&grid);
        let path = astar.run_with(&mut animation);
        animation.redraw(path.as_ref());
        match path {
            Some(path) => info!(
                "Cycle {}: path from {} to {} with {} cells, cost {:.3}, {} expansions",
                cycle,
                grid.source(),
                grid.goal(),
                path.len(),
                path.cost(),
                astar.expanded()
            ),
            None => info!(
                "Cycle {}: no path from {} to {} after {} expansions",
                cycle,
                grid.source(),
                grid.goal(),
                astar.expanded()
            ),
        }
        thread::sleep(cycle_pause);
    }
    ExitCode::SUCCESS
}
