use crate::worksheet::ReadingOrder;
use crate::{clustering, paper, presents, tiles, worksheet, PuzzleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Puzzle days with a solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Four,
    Six,
    Eight,
    Nine,
    Twelve,
}

impl Day {
    pub fn number(&self) -> u8 {
        match self {
            Day::Four => 4,
            Day::Six => 6,
            Day::Eight => 8,
            Day::Nine => 9,
            Day::Twelve => 12,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Day::Four => "Printing Department",
            Day::Six => "Trash Compactor",
            Day::Eight => "Playground",
            Day::Nine => "Movie Theater",
            Day::Twelve => "Christmas Tree Farm",
        }
    }

    pub fn all() -> &'static [Day] {
        &[Day::Four, Day::Six, Day::Eight, Day::Nine, Day::Twelve]
    }

    /// File stem used for this day's input, e.g. `day08`
    pub fn file_stem(&self) -> String {
        format!("day{:02}", self.number())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Day {}: {}", self.number(), self.title())
    }
}

impl TryFrom<u8> for Day {
    type Error = String;

    fn try_from(number: u8) -> std::result::Result<Self, Self::Error> {
        Day::all()
            .iter()
            .copied()
            .find(|d| d.number() == number)
            .ok_or_else(|| format!("no solver for day {}", number))
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches("day");
        let number: u8 = digits
            .parse()
            .map_err(|_| format!("invalid day '{}'", s))?;
        Day::try_from(number)
    }
}

/// Which input a run uses. Some puzzles scale a parameter with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dataset {
    #[default]
    Sample,
    Real,
}

impl Dataset {
    /// Closest pairs to connect before measuring circuits
    pub fn circuit_links(&self) -> usize {
        match self {
            Dataset::Sample => 10,
            Dataset::Real => 1000,
        }
    }
}

/// Both answers for one day. Part two is absent when the puzzle has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answers {
    pub day: Day,
    pub part_one: i64,
    pub part_two: Option<i64>,
}

fn answer<T: TryInto<i64>>(value: T, what: &'static str) -> Result<i64> {
    value.try_into().map_err(|_| PuzzleError::Overflow { what })
}

/// Run both parts of `day` on `input`
#[tracing::instrument(skip(input), fields(bytes = input.len()))]
pub fn solve(day: Day, dataset: Dataset, input: &str) -> Result<Answers> {
    let (part_one, part_two) = match day {
        Day::Four => (
            answer(paper::accessible_rolls(input)?, "accessible rolls")?,
            Some(answer(paper::removable_rolls(input)?, "removable rolls")?),
        ),
        Day::Six => (
            answer(worksheet::grand_total(input, ReadingOrder::Rows)?, "grand total")?,
            Some(answer(
                worksheet::grand_total(input, ReadingOrder::Columns)?,
                "grand total",
            )?),
        ),
        Day::Eight => (
            answer(
                clustering::largest_circuits_product(input, dataset.circuit_links())?,
                "circuit size product",
            )?,
            clustering::final_link_x_product(input)?,
        ),
        Day::Nine => (
            answer(tiles::largest_red_rectangle(input)?, "rectangle area")?,
            Some(answer(tiles::largest_green_rectangle(input)?, "rectangle area")?),
        ),
        Day::Twelve => (answer(presents::fitting_regions(input)?, "fitting regions")?, None),
    };

    Ok(Answers {
        day,
        part_one,
        part_two,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_parsing() {
        assert_eq!("8".parse::<Day>(), Ok(Day::Eight));
        assert_eq!("day08".parse::<Day>(), Ok(Day::Eight));
        assert_eq!("12".parse::<Day>(), Ok(Day::Twelve));
        assert!("5".parse::<Day>().is_err());
        assert!("eight".parse::<Day>().is_err());
    }

    #[test]
    fn test_day_catalogue() {
        for day in Day::all() {
            assert_eq!(Day::try_from(day.number()), Ok(*day));
        }
        assert_eq!(Day::Four.file_stem(), "day04");
        assert_eq!(Day::Eight.to_string(), "Day 8: Playground");
    }

    #[test]
    fn test_solve_clustering_sample() {
        let input = "162,817,812\n57,618,57\n906,360,560\n592,479,940\n352,342,300\n\
                     466,668,158\n542,29,236\n431,825,988\n739,650,466\n52,470,668\n\
                     216,146,977\n819,987,18\n117,168,530\n805,96,715\n346,949,466\n\
                     970,615,88\n941,993,340\n862,61,35\n984,92,344\n425,690,689\n";
        let answers = solve(Day::Eight, Dataset::Sample, input).unwrap();
        assert_eq!(answers.part_one, 40);
        assert_eq!(answers.part_two, Some(25272));

        // Not enough pairs for the real link count
        let err = solve(Day::Eight, Dataset::Real, input).unwrap_err();
        assert!(matches!(err, PuzzleError::InsufficientData { .. }));
    }

    #[test]
    fn test_solve_packing_has_no_part_two() {
        let answers = solve(Day::Twelve, Dataset::Sample, "0:\n#\n\n1x1: 1\n").unwrap();
        assert_eq!(answers.part_one, 1);
        assert_eq!(answers.part_two, None);
    }

    #[test]
    fn test_answer_beyond_i64() {
        // Fits a u64 area but not a signed answer
        let input = format!("0,0\n{},0\n", i64::MAX);
        assert_eq!(
            solve(Day::Nine, Dataset::Sample, &input),
            Err(PuzzleError::Overflow {
                what: "rectangle area"
            })
        );
    }

    #[test]
    fn test_answers_json() {
        let answers = Answers {
            day: Day::Nine,
            part_one: 50,
            part_two: Some(24),
        };
        let json = serde_json::to_string(&answers).unwrap();
        assert_eq!(json, r#"{"day":"Nine","part_one":50,"part_two":24}"#);
        let back: Answers = serde_json::from_str(&json).unwrap();
        assert_eq!(back, answers);
    }
}
