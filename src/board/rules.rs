//! Queen attack geometry on an n×n board
//!
//! Attacks are unconditional line-of-sight: a queen attacks every square that
//! shares its row, column or either diagonal, regardless of pieces in between.

/// The four families of lines a queen moves along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Row,
    Column,
    /// Top-left to bottom-right, constant `row - col`
    Diagonal,
    /// Top-right to bottom-left, constant `row + col`
    AntiDiagonal,
}

impl LineKind {
    pub const ALL: [LineKind; 4] = [
        LineKind::Row,
        LineKind::Column,
        LineKind::Diagonal,
        LineKind::AntiDiagonal,
    ];

    /// Number of distinct lines of this kind on an n×n board
    pub fn line_count(self, n: usize) -> usize {
        match self {
            LineKind::Row | LineKind::Column => n,
            LineKind::Diagonal | LineKind::AntiDiagonal => (2 * n).saturating_sub(1),
        }
    }

    /// Cells on the `index`-th line of this kind
    pub fn cells(self, n: usize, index: usize) -> Vec<(usize, usize)> {
        match self {
            LineKind::Row => (0..n).map(|col| (index, col)).collect(),
            LineKind::Column => (0..n).map(|row| (row, index)).collect(),
            LineKind::Diagonal => {
                // index 0 is the bottom-left corner, row - col = (n - 1) - index
                let offset = n as isize - 1 - index as isize;
                (0..n)
                    .filter_map(|row| {
                        let col = row as isize - offset;
                        (0..n as isize).contains(&col).then_some((row, col as usize))
                    })
                    .collect()
            }
            LineKind::AntiDiagonal => (0..n)
                .filter_map(|row| index.checked_sub(row).filter(|&col| col < n).map(|col| (row, col)))
                .collect(),
        }
    }
}

/// Iterate over every line of every kind, one `Vec` of cells at a time
pub fn lines(n: usize) -> impl Iterator<Item = (LineKind, Vec<(usize, usize)>)> {
    LineKind::ALL.into_iter().flat_map(move |kind| {
        (0..kind.line_count(n)).map(move |index| (kind, kind.cells(n, index)))
    })
}

/// Whether a queen on `a` attacks a queen on `b`
pub fn attacks(a: (usize, usize), b: (usize, usize)) -> bool {
    if a == b {
        return false;
    }
    let (r1, c1) = (a.0 as isize, a.1 as isize);
    let (r2, c2) = (b.0 as isize, b.1 as isize);
    r1 == r2 || c1 == c2 || r1 - c1 == r2 - c2 || r1 + c1 == r2 + c2
}
