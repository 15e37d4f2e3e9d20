//! Daily puzzle solvers.
//!
//! Each module solves one puzzle from its plain-text input:
//!
//! - [`paper`]: paper rolls a forklift can reach, and how many can be removed
//! - [`worksheet`]: cephalopod math worksheets read by rows or by columns
//! - [`clustering`]: junction boxes wired closest pair first into circuits
//! - [`tiles`]: largest rectangles between red tiles
//! - [`presents`]: regions that can hold their presents by area
//!
//! [`solve`] runs both parts of a [`Day`] and returns its [`Answers`].

pub mod clustering;
mod day;
mod error;
pub mod paper;
pub mod presents;
pub mod tiles;
pub mod worksheet;

pub use clustering::{Clustering, LinkEvent, Point3, PointSet};
pub use day::{solve, Answers, Dataset, Day};
pub use error::{PuzzleError, Result};
