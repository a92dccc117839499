use anyhow::{ensure, Result};
use itertools::Itertools;

pub type Digit = u8; // 1..=N

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub r: usize,
    pub c: usize,
}

/// One board position: optional value, given flag, and a per-digit mark vector.
/// Marks are meaningful only while the cell is empty; setting a value does not
/// clear them (they are an independent overlay).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    value: Option<Digit>,
    given: bool,
    marks: Vec<bool>,
}

impl Cell {
    fn empty(size: usize) -> Self {
        Self { value: None, given: false, marks: vec![false; size] }
    }

    pub fn value(&self) -> Option<Digit> { self.value }
    pub fn is_given(&self) -> bool { self.given }
    pub fn set_given(&mut self, given: bool) { self.given = given; }

    /// Accepts `None` or a digit in `1..=N`; anything else leaves the cell
    /// unchanged. Callers pass unchecked user input and rely on the no-op.
    pub fn set_value(&mut self, value: Option<Digit>) {
        match value {
            None => self.value = None,
            Some(d) if (1..=self.marks.len()).contains(&usize::from(d)) => self.value = Some(d),
            Some(_) => {}
        }
    }

    pub fn mark(&self, digit: Digit) -> bool {
        self.marks[usize::from(digit) - 1]
    }

    pub fn set_mark(&mut self, digit: Digit, present: bool) {
        self.marks[usize::from(digit) - 1] = present;
    }

    pub fn has_marks(&self) -> bool { self.marks.iter().any(|&m| m) }
    pub fn clear_marks(&mut self) { self.marks.fill(false); }
}

/// The N×N board. `box_rows` × `box_cols` is the arrangement of boxes within
/// the grid, so each box spans `box_cols` rows and `box_rows` columns and
/// N = box_rows · box_cols.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    box_rows: usize,
    box_cols: usize,
    marks_override_value: bool,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(box_rows: usize, box_cols: usize) -> Result<Self> {
        Self::with_mark_policy(box_rows, box_cols, false)
    }

    /// `marks_override_value` decides whether a cell with any mark set reads
    /// as empty through [`Grid::display_value`]. The raw value is unaffected.
    pub fn with_mark_policy(box_rows: usize, box_cols: usize, marks_override_value: bool) -> Result<Self> {
        ensure!(box_rows > 0 && box_cols > 0, "box dimensions must be positive, got {box_rows}x{box_cols}");
        let size = box_rows * box_cols;
        ensure!(size <= usize::from(Digit::MAX), "grid size {size} exceeds the digit range");
        let cells = (0..size * size).map(|_| Cell::empty(size)).collect();
        Ok(Self { size, box_rows, box_cols, marks_override_value, cells })
    }

    pub fn size(&self) -> usize { self.size }
    pub fn box_rows(&self) -> usize { self.box_rows }
    pub fn box_cols(&self) -> usize { self.box_cols }
    pub fn cell_count(&self) -> usize { self.cells.len() }
    pub fn marks_override_value(&self) -> bool { self.marks_override_value }

    pub fn index_of(&self, p: Pos) -> usize { p.r * self.size + p.c }
    pub fn pos_of(&self, index: usize) -> Pos { Pos { r: index / self.size, c: index % self.size } }

    /// Out-of-range coordinates panic; this mirrors the tight internal usage.
    pub fn get(&self, r: usize, c: usize) -> &Cell { &self.cells[r * self.size + c] }
    pub fn get_mut(&mut self, r: usize, c: usize) -> &mut Cell { &mut self.cells[r * self.size + c] }
    pub fn cell(&self, index: usize) -> &Cell { &self.cells[index] }
    pub fn cell_mut(&mut self, index: usize) -> &mut Cell { &mut self.cells[index] }

    /// The value a display layer should show for this cell under the
    /// construction-time mark policy.
    pub fn display_value(&self, r: usize, c: usize) -> Option<Digit> {
        let cell = self.get(r, c);
        if self.marks_override_value && cell.has_marks() { None } else { cell.value() }
    }

    pub fn contains_empty_cells(&self) -> bool {
        self.cells.iter().any(|cell| cell.value.is_none())
    }

    pub fn clear_all_marks(&mut self) {
        for cell in &mut self.cells { cell.clear_marks(); }
    }

    /// True when both grids have the same geometry and the same value in every
    /// cell; given flags and marks are not compared.
    pub fn same_values(&self, other: &Grid) -> bool {
        self.size == other.size
            && self.box_rows == other.box_rows
            && self.cells.iter().zip(&other.cells).all(|(a, b)| a.value == b.value)
    }

    /// First duplicate pair scanning rows, then columns, then boxes; stops on
    /// the first hit. This short-circuit is the contract the solver's
    /// per-placement validity check consumes.
    pub fn first_error(&self) -> Option<(Pos, Pos)> {
        self.all_groups().into_iter().find_map(|group| self.duplicate_in(&group))
    }

    /// Every group's first duplicate pair, across the whole grid. The
    /// interactive variant of [`Grid::first_error`].
    pub fn all_errors(&self) -> Vec<(Pos, Pos)> {
        self.all_groups().iter().filter_map(|group| self.duplicate_in(group)).collect()
    }

    fn duplicate_in(&self, group: &[Pos]) -> Option<(Pos, Pos)> {
        group
            .iter()
            .tuple_combinations()
            .find(|(&a, &b)| {
                let v = self.get(a.r, a.c).value();
                v.is_some() && v == self.get(b.r, b.c).value()
            })
            .map(|(&a, &b)| (a, b))
    }

    /// All cells sharing a row, column, or box with `p`, excluding `p` itself.
    pub fn peers(&self, p: Pos) -> Vec<Pos> {
        let mut result = Vec::with_capacity(3 * self.size);
        for r in 0..self.size {
            for c in 0..self.size {
                if (r != p.r || c != p.c) && (r == p.r || c == p.c || self.same_box(Pos { r, c }, p)) {
                    result.push(Pos { r, c });
                }
            }
        }
        result
    }

    pub(crate) fn peer_indices(&self, index: usize) -> Vec<usize> {
        self.peers(self.pos_of(index)).into_iter().map(|p| self.index_of(p)).collect()
    }

    fn same_box(&self, a: Pos, b: Pos) -> bool {
        a.r / self.box_cols == b.r / self.box_cols && a.c / self.box_rows == b.c / self.box_rows
    }

    /// The 3N groups: N rows, N columns, N boxes, in that order.
    pub fn all_groups(&self) -> Vec<Vec<Pos>> {
        let n = self.size;
        let mut groups = Vec::with_capacity(3 * n);
        for r in 0..n {
            groups.push((0..n).map(|c| Pos { r, c }).collect());
        }
        for c in 0..n {
            groups.push((0..n).map(|r| Pos { r, c }).collect());
        }
        for band in 0..self.box_rows {
            for stack in 0..self.box_cols {
                let mut group = Vec::with_capacity(n);
                for r in 0..self.box_cols {
                    for c in 0..self.box_rows {
                        group.push(Pos { r: band * self.box_cols + r, c: stack * self.box_rows + c });
                    }
                }
                groups.push(group);
            }
        }
        groups
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.size.to_string().len();
        let segment = "-".repeat(self.box_rows * (width + 1) + 1);
        let rule = format!("+{}+", vec![segment; self.size / self.box_rows].join("+"));
        for r in 0..self.size {
            if r % self.box_cols == 0 {
                writeln!(f, "{rule}")?;
            }
            for c in 0..self.size {
                if c % self.box_rows == 0 {
                    write!(f, "| ")?;
                }
                match self.get(r, c).value() {
                    Some(d) => write!(f, "{d:>width$} ")?,
                    None => write!(f, "{:>width$} ", "·")?,
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{rule}")
    }
}
