//! Cephalopod math worksheets.
//!
//! Problems sit side by side, separated by columns that are blank in every
//! row. The last row holds each problem's operator. Numbers can be read the
//! usual way (one per row) or cephalopod style (one per column, right to left,
//! most significant digit on top).

use crate::{PuzzleError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Multiply,
}

impl Operator {
    pub fn from_char(ch: char) -> Result<Self> {
        match ch {
            '+' => Ok(Operator::Add),
            '*' => Ok(Operator::Multiply),
            other => Err(PuzzleError::UnknownOperator(other)),
        }
    }

    /// Combine `numbers`, or `None` on overflow
    pub fn apply(&self, numbers: &[u64]) -> Option<u64> {
        match self {
            Operator::Add => numbers.iter().try_fold(0u64, |acc, &n| acc.checked_add(n)),
            Operator::Multiply => numbers.iter().try_fold(1u64, |acc, &n| acc.checked_mul(n)),
        }
    }
}

/// How the digits of a problem are grouped into numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingOrder {
    /// One number per row
    Rows,
    /// One number per column, top digit most significant
    Columns,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub operator: Operator,
    pub numbers: Vec<u64>,
}

impl Problem {
    pub fn answer(&self) -> Result<u64> {
        self.operator
            .apply(&self.numbers)
            .ok_or(PuzzleError::Overflow {
                what: "problem answer",
            })
    }
}

/// The worksheet as a padded character grid
#[derive(Debug, Clone)]
pub struct Worksheet {
    /// Digit rows, right-padded with spaces to `width`
    rows: Vec<Vec<char>>,
    operators: Vec<char>,
    width: usize,
}

impl Worksheet {
    pub fn parse(input: &str) -> Result<Self> {
        let mut lines: Vec<&str> = input.lines().collect();
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }

        let operator_line = lines.pop().ok_or(PuzzleError::EmptyInput)?;
        if lines.is_empty() {
            return Err(PuzzleError::malformed(1, "worksheet has no number rows"));
        }

        let width = lines
            .iter()
            .chain(std::iter::once(&operator_line))
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);

        let pad = |line: &str| -> Vec<char> {
            let mut chars: Vec<char> = line.chars().collect();
            chars.resize(width, ' ');
            chars
        };

        for (idx, line) in lines.iter().enumerate() {
            if let Some(bad) = line.chars().find(|c| !c.is_ascii_digit() && *c != ' ') {
                return Err(PuzzleError::malformed(
                    idx + 1,
                    format!("unexpected character '{}'", bad),
                ));
            }
        }

        Ok(Self {
            rows: lines.iter().map(|&l| pad(l)).collect(),
            operators: pad(operator_line),
            width,
        })
    }

    fn column_is_blank(&self, col: usize) -> bool {
        self.operators[col] == ' ' && self.rows.iter().all(|row| row[col] == ' ')
    }

    /// Column ranges of each problem, left to right
    pub fn blocks(&self) -> Vec<Range<usize>> {
        let mut blocks = Vec::new();
        let mut start = None;

        for col in 0..self.width {
            match (self.column_is_blank(col), start) {
                (false, None) => start = Some(col),
                (true, Some(s)) => {
                    blocks.push(s..col);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            blocks.push(s..self.width);
        }

        blocks
    }

    fn operator_for(&self, block: &Range<usize>) -> Result<Operator> {
        let ch = self.operators[block.clone()]
            .iter()
            .copied()
            .find(|c| *c != ' ')
            .ok_or_else(|| {
                PuzzleError::malformed(
                    self.rows.len() + 1,
                    format!("no operator under columns {}..{}", block.start, block.end),
                )
            })?;
        Operator::from_char(ch)
    }

    /// Read one number; `Ok(None)` when there are no digits. `line` locates
    /// the number in errors.
    fn number_from(line: usize, digits: impl Iterator<Item = char>) -> Result<Option<u64>> {
        let digits: String = digits.filter(|c| *c != ' ').collect();
        if digits.is_empty() {
            return Ok(None);
        }
        digits
            .parse::<u64>()
            .map(Some)
            .map_err(|_| PuzzleError::malformed(line, format!("number {} is too large", digits)))
    }

    /// Line of the top digit in `col`
    fn top_line(&self, col: usize) -> usize {
        self.rows
            .iter()
            .position(|row| row[col] != ' ')
            .map_or(1, |idx| idx + 1)
    }

    pub fn problems(&self, order: ReadingOrder) -> Result<Vec<Problem>> {
        self.blocks()
            .into_iter()
            .map(|block| -> Result<Problem> {
                let operator = self.operator_for(&block)?;
                let numbers = match order {
                    ReadingOrder::Rows => self
                        .rows
                        .iter()
                        .enumerate()
                        .map(|(idx, row)| {
                            Self::number_from(idx + 1, row[block.clone()].iter().copied())
                        })
                        .filter_map(Result::transpose)
                        .collect::<Result<Vec<_>>>()?,
                    ReadingOrder::Columns => block
                        .clone()
                        .rev()
                        .map(|col| {
                            let line = self.top_line(col);
                            Self::number_from(line, self.rows.iter().map(|row| row[col]))
                        })
                        .filter_map(Result::transpose)
                        .collect::<Result<Vec<_>>>()?,
                };
                Ok(Problem { operator, numbers })
            })
            .collect()
    }

    /// Sum of every problem's answer
    pub fn grand_total(&self, order: ReadingOrder) -> Result<u64> {
        self.problems(order)?.iter().try_fold(0u64, |total, problem| -> Result<u64> {
            total
                .checked_add(problem.answer()?)
                .ok_or(PuzzleError::Overflow {
                    what: "grand total",
                })
        })
    }
}

#[tracing::instrument(skip(input))]
pub fn grand_total(input: &str, order: ReadingOrder) -> Result<u64> {
    Worksheet::parse(input)?.grand_total(order)
}
