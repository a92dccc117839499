//! Sudoku engine for boards with rectangular boxes of any size.
//!
//! The grid is N×N where N is the product of the box arrangement, so 3×3
//! gives the classic 9×9 board and 3×4 gives a 12×12 one. [`Solver`] fills a
//! grid by constraint propagation and fewest-candidates-first backtracking
//! and rates how hard the search was; [`Generator`] carves puzzles with a
//! unique solution at a requested [`Difficulty`]. The [`saver`] module
//! round-trips grids through a compact text format.

pub mod generator;
pub mod grid;
pub mod saver;
pub mod solver;

pub use generator::Generator;
pub use grid::{Cell, Digit, Grid, Pos};
pub use solver::{Difficulty, Solver, TieBreak};
