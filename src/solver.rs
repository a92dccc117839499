use log::{debug, trace};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::grid::{Digit, Grid};

/// Order in which a cell's candidate digits are tried during search. Running
/// the same puzzle once Ascending and once Descending is how the generator
/// detects multiple solutions: an ambiguous puzzle lands on different grids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TieBreak {
    Ascending,
    Descending,
    Random,
}

/// Coarse puzzle rating derived from the histogram of guess sizes needed
/// during search. Ordered: a larger rank means a harder puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Unbounded,
}

/// Constraint-propagation-plus-backtracking solver. Holds only the RNG used
/// by [`TieBreak::Random`]; every solve call is otherwise self-contained.
pub struct Solver {
    rng: StdRng,
}

/// A placement forced by the single-position scan, with the peers whose mark
/// for `digit` was cleared, so a dead branch can be rolled back exactly.
struct Forced {
    index: usize,
    digit: Digit,
    cleared_peers: Vec<usize>,
}

impl Solver {
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Fills every empty cell with a value consistent with all groups and
    /// returns the difficulty rank, or `None` if no solution exists. Given
    /// cells are never altered. On failure every tentative placement has been
    /// rolled back, so the grid is left as it was after mark computation.
    pub fn solve(&mut self, grid: &mut Grid, tie_break: TieBreak) -> Option<Difficulty> {
        if grid.first_error().is_some() {
            debug!("grid already contains a duplicate, unsolvable");
            return None;
        }
        compute_marks(grid);
        let mut histogram = [0usize; 4];
        if self.search(grid, tie_break, &mut histogram, 0) {
            let rank = classify(grid.size(), &histogram);
            debug!("solved: guess histogram {histogram:?}, rank {rank:?}");
            Some(rank)
        } else {
            debug!("exhausted search space, no solution");
            None
        }
    }

    /// Clears value and marks on every non-given cell, leaving given cells
    /// untouched. Idempotent.
    pub fn unsolve(grid: &mut Grid) {
        for index in 0..grid.cell_count() {
            let cell = grid.cell_mut(index);
            if !cell.is_given() {
                cell.set_value(None);
                cell.clear_marks();
            }
        }
    }

    fn search(&mut self, grid: &mut Grid, tie_break: TieBreak, histogram: &mut [usize; 4], depth: usize) -> bool {
        let forced = match single_position_pass(grid) {
            Some(forced) => forced,
            None => return false,
        };
        let (index, mut digits) = match pick_cell(grid) {
            Some(choice) => choice,
            None => return true, // no empty cells left
        };
        if digits.is_empty() {
            rollback(grid, &forced);
            return false;
        }
        histogram[digits.len().min(4) - 1] += 1;
        match tie_break {
            TieBreak::Ascending => {}
            TieBreak::Descending => digits.reverse(),
            TieBreak::Random => digits.shuffle(&mut self.rng),
        }
        for digit in digits {
            let cleared = place(grid, index, digit);
            trace!("depth {depth}: trying {digit} at cell {index}");
            if self.search(grid, tie_break, histogram, depth + 1) {
                return true;
            }
            unplace(grid, index, digit, &cleared);
        }
        trace!("depth {depth}: cell {index} exhausted, backtracking");
        rollback(grid, &forced);
        false
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

/// Recomputes the candidate marks of every empty cell from its peers' values.
/// Run once per top-level solve; afterwards marks are maintained
/// incrementally by `place`/`unplace`.
fn compute_marks(grid: &mut Grid) {
    let n = grid.size();
    for index in 0..grid.cell_count() {
        if grid.cell(index).value().is_some() {
            continue;
        }
        let taken: Vec<Digit> = grid
            .peer_indices(index)
            .into_iter()
            .filter_map(|peer| grid.cell(peer).value())
            .collect();
        for digit in 1..=n as Digit {
            let allowed = !taken.contains(&digit);
            grid.cell_mut(index).set_mark(digit, allowed);
        }
    }
}

/// One scan over all groups: every digit that fits exactly one empty cell of a
/// group is placed there; a digit that fits nowhere in a group (and is not
/// already placed) makes the branch unsolvable, in which case all placements
/// made by this pass are rolled back and `None` is returned.
fn single_position_pass(grid: &mut Grid) -> Option<Vec<Forced>> {
    let mut forced: Vec<Forced> = Vec::new();
    let groups: Vec<Vec<usize>> = grid
        .all_groups()
        .into_iter()
        .map(|group| group.into_iter().map(|p| grid.index_of(p)).collect())
        .collect();
    for group in &groups {
        for digit in 1..=grid.size() as Digit {
            if group.iter().any(|&i| grid.cell(i).value() == Some(digit)) {
                continue;
            }
            let spots: Vec<usize> = group
                .iter()
                .copied()
                .filter(|&i| grid.cell(i).value().is_none() && grid.cell(i).mark(digit))
                .collect();
            match spots.as_slice() {
                [] => {
                    rollback(grid, &forced);
                    return None;
                }
                [index] => {
                    let cleared_peers = place(grid, *index, digit);
                    forced.push(Forced { index: *index, digit, cleared_peers });
                }
                _ => {}
            }
        }
    }
    Some(forced)
}

/// Empty cell with the fewest surviving candidates, ties broken by scan order
/// (lowest row, then lowest column). `None` means the grid is full.
fn pick_cell(grid: &Grid) -> Option<(usize, Vec<Digit>)> {
    let mut best: Option<(usize, Vec<Digit>)> = None;
    for index in 0..grid.cell_count() {
        if grid.cell(index).value().is_some() {
            continue;
        }
        let digits: Vec<Digit> = (1..=grid.size() as Digit)
            .filter(|&d| grid.cell(index).mark(d))
            .collect();
        let dead = digits.is_empty();
        match &best {
            Some((_, current)) if digits.len() >= current.len() => {}
            _ => best = Some((index, digits)),
        }
        if dead {
            break;
        }
    }
    best
}

/// Places `digit` and strips it from the marks of empty peers, returning the
/// peers that actually changed.
fn place(grid: &mut Grid, index: usize, digit: Digit) -> Vec<usize> {
    grid.cell_mut(index).set_value(Some(digit));
    let mut cleared = Vec::new();
    for peer in grid.peer_indices(index) {
        let cell = grid.cell_mut(peer);
        if cell.value().is_none() && cell.mark(digit) {
            cell.set_mark(digit, false);
            cleared.push(peer);
        }
    }
    cleared
}

fn unplace(grid: &mut Grid, index: usize, digit: Digit, cleared: &[usize]) {
    grid.cell_mut(index).set_value(None);
    for &peer in cleared {
        grid.cell_mut(peer).set_mark(digit, true);
    }
}

fn rollback(grid: &mut Grid, forced: &[Forced]) {
    for f in forced.iter().rev() {
        unplace(grid, f.index, f.digit, &f.cleared_peers);
    }
}

/// Buckets: guesses with 1, 2, 3, and 4-or-more candidates. The rank is
/// monotone in guess size; the Easy/Medium split on single-candidate guesses
/// is a tunable pacing threshold, not a hard contract.
fn classify(size: usize, histogram: &[usize; 4]) -> Difficulty {
    if histogram[2] > 0 || histogram[3] > 0 {
        Difficulty::Unbounded
    } else if histogram[1] > 0 {
        Difficulty::Hard
    } else if histogram[0] > 2 * size {
        Difficulty::Medium
    } else {
        Difficulty::Easy
    }
}
