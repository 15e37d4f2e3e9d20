//! Present packing under the trees.
//!
//! Only area feasibility is checked: a region qualifies when the presents'
//! occupied cells add up to no more than the region's area.

use crate::{PuzzleError, Result};
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub index: usize,
    pub rows: Vec<String>,
}

impl Shape {
    /// Occupied (`#`) cells
    pub fn cells(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.chars().filter(|&c| c == '#').count())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub width: usize,
    pub height: usize,
    /// Required count per shape index
    pub counts: Vec<usize>,
    /// Source line, 1-based
    pub line: usize,
}

impl Region {
    /// Cell count, or `None` if it overflows
    pub fn area(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackingPlan {
    pub shapes: Vec<Shape>,
    pub regions: Vec<Region>,
}

fn parse_number(line: usize, text: &str) -> Result<usize> {
    text.trim()
        .parse()
        .map_err(|_| PuzzleError::malformed(line, format!("invalid number '{}'", text.trim())))
}

fn parse_region(line: usize, text: &str) -> Result<Region> {
    let (size, counts) = text
        .split_once(':')
        .ok_or_else(|| PuzzleError::malformed(line, "expected WxH: counts"))?;
    let (width, height) = size
        .split_once('x')
        .ok_or_else(|| PuzzleError::malformed(line, format!("invalid region size '{}'", size)))?;

    Ok(Region {
        width: parse_number(line, width)?,
        height: parse_number(line, height)?,
        counts: counts
            .split_whitespace()
            .map(|c| parse_number(line, c))
            .collect::<Result<_>>()?,
        line,
    })
}

impl PackingPlan {
    pub fn parse(input: &str) -> Result<Self> {
        let mut shapes: Vec<Shape> = Vec::new();
        let mut regions = Vec::new();
        let mut current: Option<Shape> = None;

        for (idx, raw) in input.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.is_empty() {
                shapes.extend(current.take());
                continue;
            }

            if line.contains('x') && line.contains(':') {
                shapes.extend(current.take());
                regions.push(parse_region(line_no, line)?);
            } else if let Some(index) = line.strip_suffix(':') {
                shapes.extend(current.take());
                current = Some(Shape {
                    index: parse_number(line_no, index)?,
                    rows: Vec::new(),
                });
            } else if line.chars().all(|c| c == '#' || c == '.') {
                let shape = current
                    .as_mut()
                    .ok_or_else(|| PuzzleError::malformed(line_no, "shape row without a header"))?;
                shape.rows.push(line.to_string());
            } else {
                return Err(PuzzleError::malformed(
                    line_no,
                    format!("unrecognised line '{}'", line),
                ));
            }
        }
        shapes.extend(current.take());

        if shapes.is_empty() && regions.is_empty() {
            return Err(PuzzleError::EmptyInput);
        }

        Ok(Self { shapes, regions })
    }

    fn shape(&self, index: usize) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.index == index)
    }

    /// Cells the region's presents occupy in total
    pub fn cells_needed(&self, region: &Region) -> Result<usize> {
        region
            .counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .try_fold(0usize, |total, (index, &count)| {
                let shape = self.shape(index).ok_or(PuzzleError::UnknownShape {
                    line: region.line,
                    index,
                })?;
                shape
                    .cells()
                    .checked_mul(count)
                    .and_then(|cells| total.checked_add(cells))
                    .ok_or(PuzzleError::Overflow {
                        what: "present cell count",
                    })
            })
    }

    pub fn fits(&self, region: &Region) -> Result<bool> {
        let needed = self.cells_needed(region)?;
        let area = region.area().ok_or(PuzzleError::Overflow {
            what: "region area",
        })?;
        trace!(
            width = region.width,
            height = region.height,
            needed,
            "checking region"
        );
        Ok(needed <= area)
    }

    /// Number of regions whose presents fit by area
    #[tracing::instrument(skip(self), fields(regions = self.regions.len()))]
    pub fn count_fitting(&self) -> Result<usize> {
        let mut fitting = 0;
        for region in &self.regions {
            if self.fits(region)? {
                fitting += 1;
            }
        }
        debug!(fitting, "regions checked");
        Ok(fitting)
    }
}

#[tracing::instrument(skip(input))]
pub fn fitting_regions(input: &str) -> Result<usize> {
    PackingPlan::parse(input)?.count_fitting()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "0:
###
##.
##.

1:
###
##.
.##

2:
.##
###
##.

3:
##.
###
##.

4:
###
#..
###

5:
###
.#.
###

4x4: 0 0 0 0 2 0
12x5: 1 0 1 0 2 2
12x5: 1 0 1 0 3 2
";

    #[test]
    fn test_parse_sample() {
        let plan = PackingPlan::parse(SAMPLE).unwrap();
        assert_eq!(plan.shapes.len(), 6);
        assert_eq!(plan.regions.len(), 3);
        assert_eq!(plan.shapes[4].rows, vec!["###", "#..", "###"]);
        assert_eq!(plan.regions[1].width, 12);
        assert_eq!(plan.regions[1].height, 5);
        assert_eq!(plan.regions[1].counts, vec![1, 0, 1, 0, 2, 2]);
        assert_eq!(plan.regions[2].line, 33);
    }

    #[test]
    fn test_cells() {
        let plan = PackingPlan::parse(SAMPLE).unwrap();
        assert!(plan.shapes.iter().all(|s| s.cells() == 7));
        assert_eq!(plan.cells_needed(&plan.regions[0]), Ok(14));
        assert_eq!(plan.cells_needed(&plan.regions[2]), Ok(49));
    }

    #[test]
    fn test_area_rule_on_sample() {
        // The area rule cannot see that the third region is too tight
        assert_eq!(fitting_regions(SAMPLE), Ok(3));
    }

    #[test]
    fn test_region_too_small() {
        let input = "0:\n##\n##\n\n3x3: 3\n4x4: 4\n";
        assert_eq!(fitting_regions(input), Ok(1));
    }

    #[test]
    fn test_unknown_shape() {
        let input = "0:\n#\n\n2x2: 1 1\n";
        assert_eq!(
            fitting_regions(input),
            Err(PuzzleError::UnknownShape { line: 4, index: 1 })
        );
    }

    #[test]
    fn test_huge_counts() {
        let input = format!("0:\n##\n\n{}x2: 1\n", usize::MAX);
        assert_eq!(
            fitting_regions(&input),
            Err(PuzzleError::Overflow {
                what: "region area"
            })
        );

        let input = format!("0:\n##\n\n2x2: {}\n", usize::MAX);
        assert_eq!(
            fitting_regions(&input),
            Err(PuzzleError::Overflow {
                what: "present cell count"
            })
        );
    }

    #[test]
    fn test_malformed_region() {
        let err = PackingPlan::parse("0:\n#\n\n2x: 1\n").unwrap_err();
        assert!(matches!(err, PuzzleError::Malformed { line: 4, .. }));
    }

    #[test]
    fn test_shape_row_without_header() {
        let err = PackingPlan::parse("###\n").unwrap_err();
        assert!(matches!(err, PuzzleError::Malformed { line: 1, .. }));
    }
}
