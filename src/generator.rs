use anyhow::Result;
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::grid::Grid;
use crate::solver::{Difficulty, Solver, TieBreak};

/// How far into an attempt the carving loop runs before each iteration starts
/// evaluating the puzzle, as a fraction of the cell count.
const CARVE_FRACTION: f64 = 0.65;

/// Iterations after which an attempt is considered stuck and restarted from a
/// fresh solution.
const STALL_LIMIT: usize = 1000;

/// Builds puzzles with a unique solution at a requested difficulty by carving
/// cells out of a fully solved grid and restoring them when the puzzle drifts
/// too hard or becomes ambiguous.
pub struct Generator {
    rng: StdRng,
    solver: Solver,
}

impl Generator {
    pub fn new(seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let solver = Solver::with_seed(rng.gen());
        Self { rng, solver }
    }

    /// Returns a puzzle whose unique solution has the requested difficulty.
    /// Fails only on invalid box dimensions; otherwise it loops, restarting
    /// stalled attempts, until a puzzle is accepted.
    ///
    /// Uniqueness is checked by solving once Ascending and once Descending
    /// and comparing the results. This misses puzzles with three or more
    /// solutions that happen to coincide under both orders; that is a known
    /// limitation of the scheme, not a bug.
    pub fn generate(&mut self, required: Difficulty, box_rows: usize, box_cols: usize) -> Result<Grid> {
        loop {
            if let Some(puzzle) = self.attempt(required, box_rows, box_cols)? {
                return Ok(puzzle);
            }
            debug!("generation stalled after {STALL_LIMIT} iterations, restarting");
        }
    }

    fn attempt(&mut self, required: Difficulty, box_rows: usize, box_cols: usize) -> Result<Option<Grid>> {
        let mut grid = Grid::new(box_rows, box_cols)?;
        let total = grid.cell_count();

        // A solved empty grid with random tie-break is the solution snapshot;
        // every cell starts out given so the solver's search leaves it alone
        // once carving begins.
        if self.solver.solve(&mut grid, TieBreak::Random).is_none() {
            return Ok(None);
        }
        for index in 0..total {
            grid.cell_mut(index).set_given(true);
        }
        let solution = grid.clone();

        let mut with_value: Vec<usize> = (0..total).collect();
        let mut without_value: Vec<usize> = Vec::new();
        let mut removing = true;
        let carve_threshold = (total as f64 * CARVE_FRACTION) as usize;
        let mut iterations = 0usize;

        loop {
            iterations += 1;
            if iterations > STALL_LIMIT {
                return Ok(None);
            }
            if removing {
                let pick = self.rng.gen_range(0..with_value.len());
                let index = with_value.swap_remove(pick);
                without_value.push(index);
                let cell = grid.cell_mut(index);
                cell.set_value(None);
                cell.set_given(false);
            } else {
                let pick = self.rng.gen_range(0..without_value.len());
                let index = without_value.swap_remove(pick);
                with_value.push(index);
                let cell = grid.cell_mut(index);
                cell.set_value(solution.cell(index).value());
                cell.set_given(true);
            }

            if iterations <= carve_threshold {
                continue;
            }

            let difficulty = self.solver.solve(&mut grid, TieBreak::Ascending);
            let forward = grid.clone();
            Solver::unsolve(&mut grid);
            self.solver.solve(&mut grid, TieBreak::Descending);

            if with_value.len() > total / 2 || difficulty.is_none() {
                // Too many givens makes near-trivial puzzles (the cap matters
                // most at Easy); no solution means a contradiction crept in.
                removing = true;
            } else if !forward.same_values(&grid) {
                removing = false;
            } else if difficulty == Some(required) {
                Solver::unsolve(&mut grid);
                debug!(
                    "accepted {}x{} puzzle with {} givens after {} iterations",
                    grid.size(),
                    grid.size(),
                    with_value.len(),
                    iterations
                );
                return Ok(Some(grid));
            } else if let Some(rank) = difficulty {
                // Fewer clues usually means harder.
                removing = rank < required;
            }
            Solver::unsolve(&mut grid);
        }
    }
}
