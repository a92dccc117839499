use pretty_assertions::assert_eq;
use rectoku::{saver, Difficulty, Generator, Grid, Pos, Solver, TieBreak};

/// Builds a grid from row strings, `.` for empty, digits placed as givens.
fn grid_from_rows(box_rows: usize, box_cols: usize, rows: &[&str]) -> Grid {
    let mut grid = Grid::new(box_rows, box_cols).unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, ch) in row.chars().enumerate() {
            if let Some(d) = ch.to_digit(10) {
                let cell = grid.get_mut(r, c);
                cell.set_value(Some(d as u8));
                cell.set_given(true);
            }
        }
    }
    grid
}

/// Arto Inkala's 2012 puzzle, widely reported as the hardest known 9x9.
fn hardest_sudoku() -> Grid {
    grid_from_rows(
        3,
        3,
        &[
            "8........",
            "..36.....",
            ".7..9.2..",
            ".5...7...",
            "....457..",
            "...1...3.",
            "..1....68",
            "..85...1.",
            ".9....4..",
        ],
    )
}

#[test]
fn rejects_zero_box_dimensions() {
    assert!(Grid::new(0, 3).is_err());
    assert!(Grid::new(3, 0).is_err());
    assert!(Grid::new(0, 0).is_err());
    assert!(Grid::new(3, 3).is_ok());
    assert!(Grid::new(3, 4).is_ok());
}

#[test]
fn out_of_range_set_value_is_ignored() {
    let mut grid = Grid::new(3, 3).unwrap();
    grid.get_mut(0, 0).set_value(Some(5));
    grid.get_mut(0, 0).set_value(Some(37));
    assert_eq!(grid.get(0, 0).value(), Some(5));
    grid.get_mut(0, 0).set_value(Some(0));
    assert_eq!(grid.get(0, 0).value(), Some(5));
    grid.get_mut(0, 0).set_value(None);
    assert_eq!(grid.get(0, 0).value(), None);
}

#[test]
fn duplicate_in_row_is_reported_first() {
    let mut grid = Grid::new(3, 3).unwrap();
    grid.get_mut(0, 0).set_value(Some(1));
    grid.get_mut(0, 1).set_value(Some(1));
    assert_eq!(grid.first_error(), Some((Pos { r: 0, c: 0 }, Pos { r: 0, c: 1 })));
}

#[test]
fn clean_grid_has_no_errors() {
    let grid = hardest_sudoku();
    assert_eq!(grid.first_error(), None);
    assert!(grid.all_errors().is_empty());
}

#[test]
fn all_errors_reports_every_offending_group() {
    let mut grid = Grid::new(3, 3).unwrap();
    // One duplicate pair in a row, one in a column, one inside a box.
    grid.get_mut(0, 0).set_value(Some(5));
    grid.get_mut(0, 8).set_value(Some(5));
    grid.get_mut(2, 4).set_value(Some(7));
    grid.get_mut(8, 4).set_value(Some(7));
    grid.get_mut(4, 3).set_value(Some(3));
    grid.get_mut(5, 5).set_value(Some(3));
    let errors = grid.all_errors();
    assert_eq!(errors.len(), 3);
    assert_eq!(grid.first_error(), Some((Pos { r: 0, c: 0 }, Pos { r: 0, c: 8 })));
}

#[test]
fn copy_is_a_deep_clone() {
    let mut original = Grid::new(3, 3).unwrap();
    original.get_mut(1, 1).set_value(Some(4));
    original.get_mut(2, 2).set_mark(7, true);
    let mut copy = original.clone();
    copy.get_mut(1, 1).set_value(Some(9));
    copy.get_mut(2, 2).set_mark(7, false);
    copy.get_mut(0, 0).set_mark(1, true);
    assert_eq!(original.get(1, 1).value(), Some(4));
    assert!(original.get(2, 2).mark(7));
    assert!(!original.get(0, 0).mark(1));
}

#[test]
fn peers_and_groups_have_expected_shape() {
    let grid = Grid::new(3, 3).unwrap();
    assert_eq!(grid.peers(Pos { r: 0, c: 0 }).len(), 20);
    let groups = grid.all_groups();
    assert_eq!(groups.len(), 27);
    assert!(groups.iter().all(|g| g.len() == 9));

    // 12x12 grid: boxes are 4 rows by 3 columns.
    let wide = Grid::new(3, 4).unwrap();
    assert_eq!(wide.peers(Pos { r: 0, c: 0 }).len(), 28);
    let groups = wide.all_groups();
    assert_eq!(groups.len(), 36);
    assert!(groups.iter().all(|g| g.len() == 12));
}

#[test]
fn solves_the_hardest_sudoku() {
    let mut grid = hardest_sudoku();
    let mut solver = Solver::with_seed(1);
    let rank = solver.solve(&mut grid, TieBreak::Ascending);
    assert!(rank.is_some());
    assert!(!grid.contains_empty_cells());
    assert!(grid.all_errors().is_empty());
    // Givens survive the search untouched.
    assert_eq!(grid.get(0, 0).value(), Some(8));
    assert!(grid.get(0, 0).is_given());
}

#[test]
fn ascending_and_descending_agree_on_a_unique_puzzle() {
    let mut forward = hardest_sudoku();
    let mut backward = hardest_sudoku();
    let mut solver = Solver::with_seed(1);
    assert!(solver.solve(&mut forward, TieBreak::Ascending).is_some());
    assert!(solver.solve(&mut backward, TieBreak::Descending).is_some());
    assert!(forward.same_values(&backward));
}

#[test]
fn contradictory_grid_is_unsolvable() {
    let mut grid = Grid::new(3, 3).unwrap();
    grid.get_mut(0, 0).set_value(Some(1));
    grid.get_mut(0, 1).set_value(Some(1));
    let mut solver = Solver::with_seed(1);
    assert_eq!(solver.solve(&mut grid, TieBreak::Ascending), None);
}

#[test]
fn unsolve_is_idempotent() {
    let mut grid = hardest_sudoku();
    let mut solver = Solver::with_seed(1);
    assert!(solver.solve(&mut grid, TieBreak::Ascending).is_some());
    Solver::unsolve(&mut grid);
    assert!(grid.contains_empty_cells());
    let snapshot = grid.clone();
    Solver::unsolve(&mut grid);
    assert_eq!(grid, snapshot);
}

#[test]
fn solves_empty_rectangular_grids() {
    for (box_rows, box_cols) in [(2, 3), (3, 4)] {
        let mut grid = Grid::new(box_rows, box_cols).unwrap();
        let mut solver = Solver::with_seed(7);
        assert!(solver.solve(&mut grid, TieBreak::Random).is_some());
        assert!(!grid.contains_empty_cells());
        assert!(grid.all_errors().is_empty());
    }
}

#[test]
fn generated_easy_puzzle_is_unique_and_sparse() {
    let mut generator = Generator::new(Some(42));
    let puzzle = generator.generate(Difficulty::Easy, 3, 3).unwrap();

    assert!(puzzle.contains_empty_cells());
    let givens = (0..puzzle.cell_count())
        .filter(|&i| puzzle.cell(i).value().is_some())
        .count();
    assert!(givens <= 81 / 2, "too many givens: {givens}");
    for i in 0..puzzle.cell_count() {
        assert_eq!(puzzle.cell(i).is_given(), puzzle.cell(i).value().is_some());
    }

    let mut forward = puzzle.clone();
    let mut backward = puzzle.clone();
    let mut solver = Solver::with_seed(1);
    assert_eq!(solver.solve(&mut forward, TieBreak::Ascending), Some(Difficulty::Easy));
    assert!(solver.solve(&mut backward, TieBreak::Descending).is_some());
    assert!(forward.same_values(&backward));
}

#[test]
fn generates_small_rectangular_puzzles() {
    let mut generator = Generator::new(Some(7));
    let puzzle = generator.generate(Difficulty::Easy, 2, 2).unwrap();
    assert_eq!(puzzle.size(), 4);
    assert!(puzzle.contains_empty_cells());
    assert!(puzzle.all_errors().is_empty());
}

#[test]
fn save_format_round_trips() {
    let mut grid = Grid::new(3, 3).unwrap();
    let given = grid.get_mut(0, 0);
    given.set_value(Some(8));
    given.set_given(true);
    grid.get_mut(4, 4).set_value(Some(3));
    grid.get_mut(1, 2).set_mark(1, true);
    grid.get_mut(1, 2).set_mark(9, true);
    let decoded = saver::decode(&saver::encode(&grid)).unwrap();
    assert_eq!(decoded, grid);
}

#[test]
fn save_format_spot_check() {
    let mut grid = Grid::new(2, 2).unwrap();
    let cell = grid.get_mut(0, 0);
    cell.set_value(Some(3));
    cell.set_given(true);
    grid.get_mut(0, 1).set_mark(1, true);
    let expected = format!("2\n2\n:3!+---{}", "!".repeat(14));
    assert_eq!(saver::encode(&grid), expected);
}

#[test]
fn marks_win_over_value_in_save_format() {
    let mut grid = Grid::new(3, 3).unwrap();
    grid.get_mut(0, 0).set_value(Some(5));
    grid.get_mut(0, 0).set_mark(2, true);
    let decoded = saver::decode(&saver::encode(&grid)).unwrap();
    assert_eq!(decoded.get(0, 0).value(), None);
    assert!(decoded.get(0, 0).mark(2));
}

#[test]
fn decode_rejects_ill_formed_input() {
    assert!(saver::decode("").is_err());
    assert!(saver::decode("x\n3\n").is_err());
    assert!(saver::decode("3\n3\n:1:2").is_err()); // too few cells
    assert!(saver::decode(&format!("3\n3\n{}", ":".repeat(82))).is_err()); // too many
    assert!(saver::decode(&format!("3\n3\n?{}", ":".repeat(80))).is_err()); // bad marker
}

#[test]
fn mark_policy_controls_displayed_value() {
    let mut overriding = Grid::with_mark_policy(3, 3, true).unwrap();
    overriding.get_mut(0, 0).set_value(Some(5));
    overriding.get_mut(0, 0).set_mark(2, true);
    assert_eq!(overriding.display_value(0, 0), None);
    assert_eq!(overriding.get(0, 0).value(), Some(5));

    let mut layered = Grid::new(3, 3).unwrap();
    layered.get_mut(0, 0).set_value(Some(5));
    layered.get_mut(0, 0).set_mark(2, true);
    assert_eq!(layered.display_value(0, 0), Some(5));
}

#[test]
fn difficulty_is_ordered() {
    assert!(Difficulty::Easy < Difficulty::Medium);
    assert!(Difficulty::Medium < Difficulty::Hard);
    assert!(Difficulty::Hard < Difficulty::Unbounded);
}
