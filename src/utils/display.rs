//! Display and output formatting utilities

use crate::board::{save_board_to_file, Board, Cell, Color};
use crate::config::OutputFormat;
use crate::peaceable::{Solution, SweepReport};
use anyhow::Result;
use std::path::Path;

/// Format solutions for display
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Format a single solution for console output
    pub fn format_solution(solution: &Solution, with_coords: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "=== {}x{} board, {} queens per army ===\n",
            solution.n, solution.n, solution.k
        ));
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.solve_time.as_secs_f64()));
        output.push_str(&format!("Backend: {:?}\n\n", solution.backend));

        if with_coords {
            output.push_str(&Self::format_board_with_coords(&solution.board));
        } else {
            output.push_str(&solution.render());
        }

        output
    }

    /// Format a board with row and column numbers, queens highlighted
    pub fn format_board_with_coords(board: &Board) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for col in 0..board.size {
            output.push_str(&format!("{:2}", col % 10));
        }
        output.push('\n');

        for row in 0..board.size {
            output.push_str(&format!("{:2} ", row));
            for col in 0..board.size {
                let cell = board.get(row, col);
                let symbol = cell.symbol().to_string();
                let rendered = match cell {
                    Cell::Empty => symbol,
                    Cell::Queen(Color::White) => ColorOutput::colored(&symbol, TermColor::Yellow),
                    Cell::Queen(Color::Black) => ColorOutput::colored(&symbol, TermColor::Cyan),
                };
                output.push(' ');
                output.push_str(&rendered);
            }
            output.push('\n');
        }

        output
    }

    /// Summarize a sweep over army sizes
    pub fn format_sweep(report: &SweepReport) -> String {
        let mut output = String::new();
        let best_k = report.best.as_ref().map(|s| s.k).unwrap_or(0);

        output.push_str(&format!("Sweep for n = {}:\n", report.n));
        match (report.first_unsat, report.undecided) {
            (Some(k), _) => output.push_str(&format!(
                "  Largest peaceful army: {} (k = {} is UNSAT)\n",
                best_k, k
            )),
            (None, Some(k)) => output.push_str(&format!(
                "  Largest army found: {} (k = {} undecided, bound not proven)\n",
                best_k, k
            )),
            (None, None) => output.push_str(&format!("  Largest peaceful army: {}\n", best_k)),
        }

        if let Some(best) = &report.best {
            output.push('\n');
            output.push_str(&best.render());
        }

        output
    }

    /// Save a solution in the configured format
    pub fn save_solution<P: AsRef<Path>>(solution: &Solution, path: P, format: OutputFormat) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        match format {
            OutputFormat::Text => {
                save_board_to_file(&solution.board, path)?;
            }
            OutputFormat::Json => {
                solution.save_to_file(path)?;
            }
        }

        Ok(())
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: TermColor) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, TermColor::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, TermColor::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, TermColor::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, TermColor::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum TermColor {
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
}

impl TermColor {
    fn code(self) -> u8 {
        match self {
            TermColor::Red => 31,
            TermColor::Green => 32,
            TermColor::Yellow => 33,
            TermColor::Blue => 34,
            TermColor::Cyan => 36,
        }
    }
}
