//! Chess board model and queen attack geometry

pub mod grid;
pub mod io;
pub mod rules;

pub use grid::{Board, Cell, Color};
pub use io::{parse_board_from_string, save_board_to_file};
pub use rules::{attacks, lines, LineKind};
