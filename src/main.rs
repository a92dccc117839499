use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rectoku::{saver, Difficulty, Generator, Grid, Solver, TieBreak};
use std::{fs, path::PathBuf};

#[derive(Parser, Debug)]
#[command(name = "rectoku", version, about = "Sudoku solver and generator for rectangular box sizes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a puzzle with a unique solution at the given difficulty
    Generate {
        #[arg(short, long, value_enum, default_value_t = Level::Easy)]
        difficulty: Level,

        /// Rows of boxes in the grid (each box is box-columns cells tall)
        #[arg(long, default_value_t = 3)]
        box_rows: usize,

        /// Columns of boxes in the grid (each box is box-rows cells wide)
        #[arg(long, default_value_t = 3)]
        box_columns: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Also write the puzzle to a file in the save format
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Solve a puzzle stored in the save format
    Solve {
        /// Path to the saved puzzle
        input: PathBuf,

        /// Candidate order used during search
        #[arg(short, long, value_enum, default_value_t = Order::Ascending)]
        order: Order,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Level { Easy, Medium, Hard, Unbounded }

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Order { Ascending, Descending, Random }

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty::Easy,
            Level::Medium => Difficulty::Medium,
            Level::Hard => Difficulty::Hard,
            Level::Unbounded => Difficulty::Unbounded,
        }
    }
}

impl From<Order> for TieBreak {
    fn from(order: Order) -> Self {
        match order {
            Order::Ascending => TieBreak::Ascending,
            Order::Descending => TieBreak::Descending,
            Order::Random => TieBreak::Random,
        }
    }
}

fn render(grid: &Grid) -> String {
    let width = grid.size().to_string().len();
    let mut out = String::new();
    for r in 0..grid.size() {
        if r > 0 && r % grid.box_cols() == 0 {
            out.push('\n');
        }
        for c in 0..grid.size() {
            if c > 0 && c % grid.box_rows() == 0 {
                out.push_str("  ");
            }
            let cell = grid.get(r, c);
            let text = match cell.value() {
                Some(d) => format!("{d:>width$} "),
                None => format!("{:>width$} ", "·"),
            };
            if cell.is_given() {
                out.push_str(&text.cyan().bold().to_string());
            } else {
                out.push_str(&text);
            }
        }
        out.push('\n');
    }
    out
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate { difficulty, box_rows, box_columns, seed, out } => {
            let mut generator = Generator::new(seed);
            let puzzle = generator.generate(difficulty.into(), box_rows, box_columns)?;
            println!("{}", render(&puzzle));
            println!("{} {:?}", "Difficulty:".bold(), Difficulty::from(difficulty));
            if let Some(path) = out {
                fs::write(&path, saver::encode(&puzzle))
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Saved to {}", path.display());
            }
        }
        Command::Solve { input, order } => {
            let text = fs::read_to_string(&input).with_context(|| format!("reading {}", input.display()))?;
            let mut grid = saver::decode(&text).context("parse puzzle")?;
            let mut solver = Solver::new();
            match solver.solve(&mut grid, order.into()) {
                Some(rank) => {
                    println!("{}", render(&grid));
                    println!("{} {rank:?}", "Difficulty:".bold());
                }
                None => bail!("no solution exists for this puzzle"),
            }
        }
    }
    Ok(())
}
