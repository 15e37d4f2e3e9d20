//! Largest rectangles between red floor tiles.
//!
//! Red tiles listed in order form a closed rectilinear loop; the loop and its
//! interior are green. Rectangles take two red tiles as opposite corners and
//! their area counts tiles inclusively.

use crate::{PuzzleError, Result};
use itertools::Itertools;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub x: i64,
    pub y: i64,
}

impl Tile {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Inclusive area of the rectangle with `self` and `other` as corners,
    /// or `None` if it does not fit in a `u64`
    pub fn area_with(&self, other: &Tile) -> Option<u64> {
        let width = self.x.abs_diff(other.x).checked_add(1)?;
        let height = self.y.abs_diff(other.y).checked_add(1)?;
        width.checked_mul(height)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Tile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y, found '{}'", s))?;
        let x = x.parse().map_err(|_| format!("invalid coordinate '{}'", x))?;
        let y = y.parse().map_err(|_| format!("invalid coordinate '{}'", y))?;
        Ok(Tile::new(x, y))
    }
}

/// Parse one tile per line, keeping input order
pub fn parse_tiles(input: &str) -> Result<Vec<Tile>> {
    let tiles: Vec<Tile> = input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            line.trim()
                .parse::<Tile>()
                .map_err(|reason| PuzzleError::malformed(idx + 1, reason))
        })
        .collect::<Result<_>>()?;

    match tiles.len() {
        0 => Err(PuzzleError::EmptyInput),
        1 => Err(PuzzleError::InsufficientData {
            what: "red tiles",
            requested: 2,
            available: 1,
        }),
        _ => Ok(tiles),
    }
}

fn area(a: &Tile, b: &Tile) -> Result<u64> {
    a.area_with(b).ok_or(PuzzleError::Overflow {
        what: "rectangle area",
    })
}

/// Largest rectangle with red corners, ignoring colours in between
pub fn largest_rectangle(tiles: &[Tile]) -> Result<u64> {
    tiles
        .iter()
        .tuple_combinations()
        .try_fold(0, |best, (a, b)| -> Result<u64> { Ok(best.max(area(a, b)?)) })
}

/// One compressed axis.
///
/// Each distinct coordinate gets its own cell. A run of coordinates between
/// two neighbouring values becomes a single gap cell, and there is a padding
/// cell at either end so the outside is always connected.
#[derive(Debug)]
struct Axis {
    values: Vec<i64>,
    cells: Vec<usize>,
    len: usize,
}

impl Axis {
    fn new(values: impl Iterator<Item = i64>) -> Self {
        let mut values: Vec<i64> = values.collect();
        values.sort_unstable();
        values.dedup();

        let mut cells = Vec::with_capacity(values.len());
        let mut next = 1;
        for (i, value) in values.iter().enumerate() {
            if i > 0 && value.abs_diff(values[i - 1]) > 1 {
                next += 1;
            }
            cells.push(next);
            next += 1;
        }

        Self {
            values,
            cells,
            len: next + 1,
        }
    }

    fn cell(&self, value: i64) -> usize {
        // Every looked-up value came from this axis
        let idx = self.values.binary_search(&value).unwrap_or_else(|i| i);
        self.cells[idx]
    }

    fn cells(&self) -> usize {
        self.len
    }
}

/// The loop rasterised onto the compressed grid
pub struct TileFloor {
    tiles: Vec<Tile>,
    xs: Axis,
    ys: Axis,
    width: usize,
    height: usize,
    /// Prefix sums of cells outside the loop, `(width + 1) x (height + 1)`
    outside_sums: Vec<usize>,
}

impl TileFloor {
    #[tracing::instrument(skip_all, fields(tiles = tiles.len()))]
    pub fn new(tiles: Vec<Tile>) -> Result<Self> {
        let xs = Axis::new(tiles.iter().map(|t| t.x));
        let ys = Axis::new(tiles.iter().map(|t| t.y));
        let width = xs.cells();
        let height = ys.cells();
        debug!(width, height, "compressed floor");

        let mut boundary = vec![false; width * height];
        for (i, a) in tiles.iter().enumerate() {
            let j = (i + 1) % tiles.len();
            let b = &tiles[j];
            if a.x != b.x && a.y != b.y {
                return Err(PuzzleError::NotAxisAligned { from: i + 1, to: j + 1 });
            }

            let (ax, bx) = (xs.cell(a.x), xs.cell(b.x));
            let (ay, by) = (ys.cell(a.y), ys.cell(b.y));
            for x in ax.min(bx)..=ax.max(bx) {
                for y in ay.min(by)..=ay.max(by) {
                    boundary[y * width + x] = true;
                }
            }
        }

        // Flood from the padding corner, which is never on the loop
        let mut outside = vec![false; width * height];
        let mut queue = VecDeque::from([(0usize, 0usize)]);
        outside[0] = true;
        while let Some((x, y)) = queue.pop_front() {
            let neighbours = [
                (x.wrapping_sub(1), y),
                (x + 1, y),
                (x, y.wrapping_sub(1)),
                (x, y + 1),
            ];
            for (nx, ny) in neighbours {
                if nx >= width || ny >= height {
                    continue;
                }
                let idx = ny * width + nx;
                if !boundary[idx] && !outside[idx] {
                    outside[idx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }

        let stride = width + 1;
        let mut outside_sums = vec![0usize; stride * (height + 1)];
        for y in 0..height {
            for x in 0..width {
                outside_sums[(y + 1) * stride + x + 1] = usize::from(outside[y * width + x])
                    + outside_sums[y * stride + x + 1]
                    + outside_sums[(y + 1) * stride + x]
                    - outside_sums[y * stride + x];
            }
        }

        Ok(Self {
            tiles,
            xs,
            ys,
            width,
            height,
            outside_sums,
        })
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Number of outside cells in the inclusive cell range
    fn outside_in(&self, x0: usize, x1: usize, y0: usize, y1: usize) -> usize {
        let stride = self.width + 1;
        let at = |x: usize, y: usize| self.outside_sums[y * stride + x];
        at(x1 + 1, y1 + 1) + at(x0, y0) - at(x0, y1 + 1) - at(x1 + 1, y0)
    }

    /// Whether every tile of the rectangle is red or green
    pub fn is_enclosed(&self, a: &Tile, b: &Tile) -> bool {
        let (ax, bx) = (self.xs.cell(a.x), self.xs.cell(b.x));
        let (ay, by) = (self.ys.cell(a.y), self.ys.cell(b.y));
        debug_assert!(ax.max(bx) < self.width && ay.max(by) < self.height);
        self.outside_in(ax.min(bx), ax.max(bx), ay.min(by), ay.max(by)) == 0
    }

    /// Largest rectangle with red corners made only of red and green tiles
    pub fn largest_enclosed_rectangle(&self) -> Result<u64> {
        self.tiles
            .iter()
            .tuple_combinations()
            .filter(|(a, b)| self.is_enclosed(a, b))
            .try_fold(0, |best, (a, b)| -> Result<u64> { Ok(best.max(area(a, b)?)) })
    }
}

#[tracing::instrument(skip(input))]
pub fn largest_red_rectangle(input: &str) -> Result<u64> {
    largest_rectangle(&parse_tiles(input)?)
}

#[tracing::instrument(skip(input))]
pub fn largest_green_rectangle(input: &str) -> Result<u64> {
    TileFloor::new(parse_tiles(input)?)?.largest_enclosed_rectangle()
}
