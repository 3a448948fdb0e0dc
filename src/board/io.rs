//! Text I/O for boards

use super::{Board, Cell, Color};
use anyhow::{Context, Result};
use std::path::Path;

/// Parse a board from its text rendering
/// Format: one row per line, cells `W`, `B` or `.`, optionally separated by spaces
pub fn parse_board_from_string(content: &str) -> Result<Board> {
    let lines: Vec<Vec<char>> = content
        .lines()
        .map(|line| line.chars().filter(|ch| !ch.is_whitespace()).collect::<Vec<_>>())
        .filter(|row| !row.is_empty())
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Board text is empty or contains no valid rows");
    }

    let mut rows = Vec::with_capacity(lines.len());
    for (row_idx, line) in lines.iter().enumerate() {
        let mut row = Vec::with_capacity(line.len());
        for (col_idx, &ch) in line.iter().enumerate() {
            match ch {
                '.' => row.push(Cell::Empty),
                'W' => row.push(Cell::Queen(Color::White)),
                'B' => row.push(Cell::Queen(Color::Black)),
                _ => anyhow::bail!(
                    "Invalid character '{}' at position ({}, {}). Only 'W', 'B' and '.' are allowed",
                    ch,
                    row_idx,
                    col_idx
                ),
            }
        }
        rows.push(row);
    }

    Ok(Board::from_rows(rows)?)
}

/// Save a board's text rendering to a file
pub fn save_board_to_file<P: AsRef<Path>>(board: &Board, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, board.to_string())
        .with_context(|| format!("Failed to write board to file: {}", path.as_ref().display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_board_from_string() {
        let board = parse_board_from_string("W . . .\n. . W .\n. . . B\n. B . .\n").unwrap();

        assert_eq!(board.size, 4);
        assert_eq!(board.positions(Color::White), vec![(0, 0), (1, 2)]);
        assert_eq!(board.positions(Color::Black), vec![(2, 3), (3, 1)]);
    }

    #[test]
    fn test_compact_rows_accepted() {
        let board = parse_board_from_string("W.\n.B\n").unwrap();
        assert_eq!(board.get(0, 0), Cell::Queen(Color::White));
        assert_eq!(board.get(1, 1), Cell::Queen(Color::Black));
    }

    #[test]
    fn test_file_operations() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("boards/witness.txt");

        let original = parse_board_from_string("W . .\n. . .\n. B .\n").unwrap();
        save_board_to_file(&original, &file_path).unwrap();

        let content = std::fs::read_to_string(&file_path).unwrap();
        assert_eq!(parse_board_from_string(&content).unwrap(), original);
    }

    #[test]
    fn test_invalid_input() {
        assert!(parse_board_from_string("W X\n. .\n").is_err());
        assert!(parse_board_from_string("W . .\n. .\n. . .\n").is_err());
        assert!(parse_board_from_string("").is_err());
    }
}
