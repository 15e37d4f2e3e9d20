use crate::{PuzzleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest accepted coordinate magnitude. Squared distances between points
/// in range always fit in an `i128`.
pub const MAX_COORDINATE: i64 = 1 << 60;

/// A junction box position in 3-D space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point3 {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Point3 {
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Whether every coordinate is within `MAX_COORDINATE`
    pub fn in_range(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|v| (-MAX_COORDINATE..=MAX_COORDINATE).contains(v))
    }

    /// Squared Euclidean distance. Exact for points in range, and ordered the
    /// same way as the real distance.
    #[inline]
    pub fn distance_squared(&self, other: &Point3) -> i128 {
        let dx = i128::from(self.x) - i128::from(other.x);
        let dy = i128::from(self.y) - i128::from(other.y);
        let dz = i128::from(self.z) - i128::from(other.z);
        dx * dx + dy * dy + dz * dz
    }

    #[inline]
    pub fn distance(&self, other: &Point3) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

impl FromStr for Point3 {
    type Err = String;

    /// Parse `X,Y,Z`. Every coordinate must be present; nothing defaults to zero.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(format!("expected 3 coordinates, found {}", parts.len()));
        }

        let mut coords = [0i64; 3];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| format!("invalid coordinate '{}'", part))?;
            if !(-MAX_COORDINATE..=MAX_COORDINATE).contains(&*slot) {
                return Err(format!(
                    "coordinate {} exceeds the limit of {}",
                    slot, MAX_COORDINATE
                ));
            }
        }

        Ok(Point3::new(coords[0], coords[1], coords[2]))
    }
}

/// The loaded, immutable set of points. Points are identified by their index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointSet {
    points: Vec<Point3>,
}

impl PointSet {
    /// Build a point set from coordinates. Fails on an empty list or a point
    /// outside `MAX_COORDINATE`.
    pub fn new(points: Vec<Point3>) -> Result<Self> {
        if points.is_empty() {
            return Err(PuzzleError::EmptyInput);
        }
        if let Some(idx) = points.iter().position(|p| !p.in_range()) {
            return Err(PuzzleError::malformed(
                idx + 1,
                format!("point {} exceeds the coordinate limit", points[idx]),
            ));
        }
        Ok(Self { points })
    }

    /// Parse one `X,Y,Z` point per line. Blank lines are skipped.
    pub fn parse(input: &str) -> Result<Self> {
        let points = input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                line.trim()
                    .parse::<Point3>()
                    .map_err(|reason| PuzzleError::malformed(idx + 1, reason))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, idx: usize) -> Point3 {
        self.points[idx]
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Number of unordered pairs, N(N-1)/2
    pub fn pair_count(&self) -> usize {
        let n = self.points.len();
        n * n.saturating_sub(1) / 2
    }
}
