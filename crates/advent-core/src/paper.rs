//! Paper-roll accessibility on a forklift floor plan.
//!
//! A roll (`@`) can be reached when fewer than four of its eight neighbours
//! hold rolls. Removing reachable rolls may expose more; removal runs in
//! rounds until nothing changes.

use crate::{PuzzleError, Result};
use std::fmt;
use tracing::debug;

/// Neighbour count below which a roll is reachable
pub const ACCESS_LIMIT: usize = 4;

const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Rectangular floor, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperGrid {
    width: usize,
    height: usize,
    rolls: Vec<bool>,
}

impl PaperGrid {
    /// Parse rows of `@` and `.`. Rows must all have the same length.
    pub fn parse(input: &str) -> Result<Self> {
        let mut width = None;
        let mut rolls = Vec::new();
        let mut height = 0;

        for (idx, line) in input.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            let row_width = line.chars().count();
            match width {
                None => width = Some(row_width),
                Some(w) if w != row_width => {
                    return Err(PuzzleError::malformed(
                        idx + 1,
                        format!("row has {} cells, expected {}", row_width, w),
                    ));
                }
                Some(_) => {}
            }

            for ch in line.chars() {
                match ch {
                    '@' => rolls.push(true),
                    '.' => rolls.push(false),
                    other => {
                        return Err(PuzzleError::malformed(
                            idx + 1,
                            format!("unexpected cell '{}'", other),
                        ))
                    }
                }
            }
            height += 1;
        }

        let width = width.ok_or(PuzzleError::EmptyInput)?;
        Ok(Self {
            width,
            height,
            rolls,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    pub fn has_roll(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.rolls[self.index(row, col)]
    }

    pub fn roll_count(&self) -> usize {
        self.rolls.iter().filter(|&&r| r).count()
    }

    /// Rolls among the eight neighbours. Cells off the grid count as empty.
    pub fn rolls_around(&self, row: usize, col: usize) -> usize {
        NEIGHBOURS
            .iter()
            .filter(|&&(dr, dc)| {
                match (row.checked_add_signed(dr), col.checked_add_signed(dc)) {
                    (Some(r), Some(c)) => self.has_roll(r, c),
                    _ => false,
                }
            })
            .count()
    }

    /// Linear indices of every roll reachable right now
    pub fn accessible(&self) -> Vec<usize> {
        (0..self.height)
            .flat_map(|row| (0..self.width).map(move |col| (row, col)))
            .filter(|&(row, col)| {
                self.has_roll(row, col) && self.rolls_around(row, col) < ACCESS_LIMIT
            })
            .map(|(row, col)| self.index(row, col))
            .collect()
    }

    /// Remove reachable rolls round by round until a round removes nothing.
    /// Returns the total removed.
    #[tracing::instrument(skip(self), fields(width = self.width, height = self.height))]
    pub fn remove_until_stable(&mut self) -> usize {
        let mut total = 0;
        let mut round = 0;

        loop {
            let reachable = self.accessible();
            if reachable.is_empty() {
                break;
            }

            round += 1;
            debug!(round, removed = reachable.len(), "removing rolls");
            for idx in &reachable {
                self.rolls[*idx] = false;
            }
            total += reachable.len();
        }

        total
    }
}

impl fmt::Display for PaperGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let ch = if self.has_roll(row, col) { '@' } else { '.' };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[tracing::instrument(skip(input))]
pub fn accessible_rolls(input: &str) -> Result<usize> {
    Ok(PaperGrid::parse(input)?.accessible().len())
}

#[tracing::instrument(skip(input))]
pub fn removable_rolls(input: &str) -> Result<usize> {
    Ok(PaperGrid::parse(input)?.remove_until_stable())
}
