//! Text rendering of the matrix board. Display only: nothing here feeds
//! back into the numbers.

pub mod board;
pub mod keywords;

pub use board::{render_report, render_world};
