//! Textual grid encoding used for on-disk persistence.
//!
//! Three lines: the box-row count, the box-column count, then every cell
//! left-to-right/top-to-bottom. Each cell is a marker (`:` given, `!` not
//! given) followed by either a full `+`/`-` mark vector, or the decimal
//! digits of its value, or nothing for an empty markless cell. When a cell
//! carries both marks and a value, the marks win; the value is not written.

use anyhow::{bail, ensure, Context, Result};

use crate::grid::{Digit, Grid};

const GIVEN_MARKER: char = ':';
const NOT_GIVEN_MARKER: char = '!';
const MARK_PRESENT: char = '+';
const MARK_ABSENT: char = '-';

pub fn encode(grid: &Grid) -> String {
    let mut out = format!("{}\n{}\n", grid.box_rows(), grid.box_cols());
    for index in 0..grid.cell_count() {
        let cell = grid.cell(index);
        out.push(if cell.is_given() { GIVEN_MARKER } else { NOT_GIVEN_MARKER });
        if cell.has_marks() {
            for digit in 1..=grid.size() as Digit {
                out.push(if cell.mark(digit) { MARK_PRESENT } else { MARK_ABSENT });
            }
        } else if let Some(value) = cell.value() {
            out.push_str(&value.to_string());
        }
    }
    out
}

pub fn decode(text: &str) -> Result<Grid> {
    let mut lines = text.lines();
    let box_rows: usize = lines
        .next()
        .context("missing box-rows line")?
        .trim()
        .parse()
        .context("parsing box rows")?;
    let box_cols: usize = lines
        .next()
        .context("missing box-columns line")?
        .trim()
        .parse()
        .context("parsing box columns")?;
    let body = lines.next().unwrap_or("");

    let mut grid = Grid::new(box_rows, box_cols)?;
    let n = grid.size();
    let total = grid.cell_count();

    let mut current: Option<usize> = None;
    let mut next_cell = 0usize;
    let mut mark_index = 0usize;
    for ch in body.chars() {
        match ch {
            GIVEN_MARKER | NOT_GIVEN_MARKER => {
                ensure!(next_cell < total, "more cells than a {n}x{n} grid holds");
                grid.cell_mut(next_cell).set_given(ch == GIVEN_MARKER);
                current = Some(next_cell);
                mark_index = 0;
                next_cell += 1;
            }
            MARK_PRESENT | MARK_ABSENT => {
                let index = current.context("mark data before the first cell marker")?;
                ensure!(mark_index < n, "more than {n} marks in one cell");
                mark_index += 1;
                grid.cell_mut(index).set_mark(mark_index as Digit, ch == MARK_PRESENT);
            }
            '0'..='9' => {
                let index = current.context("value data before the first cell marker")?;
                let digit = ch as u8 - b'0';
                let value = match grid.cell(index).value() {
                    // Multi-digit values appear on grids of size 10 and up.
                    Some(previous) => previous
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(digit))
                        .with_context(|| format!("cell value overflows at cell {index}"))?,
                    None => digit,
                };
                ensure!(
                    (1..=n).contains(&usize::from(value)),
                    "cell value {value} out of range for a {n}x{n} grid"
                );
                grid.cell_mut(index).set_value(Some(value));
            }
            _ => bail!("unexpected character {ch:?} in cell data"),
        }
    }
    ensure!(next_cell == total, "expected {total} cells, found {next_cell}");
    Ok(grid)
}
