use advent_core::{Dataset, Day};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Worked examples, compiled into the binary
pub fn sample(day: Day) -> &'static str {
    match day {
        Day::Four => include_str!("../inputs/day04_sample.txt"),
        Day::Six => include_str!("../inputs/day06_sample.txt"),
        Day::Eight => include_str!("../inputs/day08_sample.txt"),
        Day::Nine => include_str!("../inputs/day09_sample.txt"),
        Day::Twelve => include_str!("../inputs/day12_sample.txt"),
    }
}

/// Directory holding personal puzzle inputs
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("advent"))
}

/// Default location of the real input for `day`
pub fn real_input_path(day: Day) -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(format!("{}.txt", day.file_stem())))
}

fn read(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "reading input");
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Resolve the input text for a run. An explicit path always wins.
pub fn load(day: Day, dataset: Dataset, explicit: Option<&Path>) -> Result<String> {
    if let Some(path) = explicit {
        return read(path);
    }

    match dataset {
        Dataset::Sample => Ok(sample(day).to_string()),
        Dataset::Real => {
            let path = real_input_path(day)
                .context("no local data directory; pass --input to choose a file")?;
            read(&path)
        }
    }
}
