//! DIMACS CNF serialization and parsing

use super::constraints::Clause;
use super::store::{ClauseSink, Formula};
use crate::error::{PeaceError, PeaceResult};
use std::io::{BufRead, Write};

/// Write the `p cnf` header, preceded by optional comment lines
pub fn write_header<W: Write>(
    writer: &mut W,
    comments: &[String],
    variable_count: usize,
    clause_count: usize,
) -> PeaceResult<()> {
    for comment in comments {
        writeln!(writer, "c {}", comment)?;
    }
    writeln!(writer, "p cnf {} {}", variable_count, clause_count)?;
    Ok(())
}

fn write_clause<W: Write>(writer: &mut W, literals: &[i32]) -> std::io::Result<()> {
    for lit in literals {
        write!(writer, "{} ", lit)?;
    }
    writeln!(writer, "0")
}

/// Serialize a frozen formula
pub fn write_formula<W: Write>(formula: &Formula, writer: &mut W) -> PeaceResult<()> {
    write_header(writer, &[], formula.variable_count(), formula.clause_count())?;
    for clause in formula.clauses() {
        write_clause(writer, &clause.literals)?;
    }
    writer.flush()?;
    Ok(())
}

/// Render a frozen formula to a DIMACS string
pub fn formula_to_string(formula: &Formula) -> PeaceResult<String> {
    let mut buffer = Vec::new();
    write_formula(formula, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| PeaceError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Clause sink that writes each clause straight to an underlying writer
///
/// The header must already be written; use a counting pass to obtain it.
pub struct DimacsWriter<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> DimacsWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of clauses written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the underlying writer
    pub fn finish(mut self) -> PeaceResult<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> ClauseSink for DimacsWriter<W> {
    fn add_clause(&mut self, literals: &[i32]) -> PeaceResult<()> {
        write_clause(&mut self.writer, literals)?;
        self.written += 1;
        Ok(())
    }
}

/// Parse DIMACS CNF text
pub fn parse_dimacs(content: &str) -> PeaceResult<Formula> {
    read_dimacs(content.as_bytes())
}

/// Parse DIMACS CNF from a buffered reader
///
/// Clauses may span lines; each ends at a `0` literal. The declared counts are
/// checked against what was read.
pub fn read_dimacs<R: BufRead>(reader: R) -> PeaceResult<Formula> {
    let mut header: Option<(usize, usize)> = None;
    let mut clauses = Vec::new();
    let mut pending: Vec<i32> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('c') {
            continue;
        }

        if line.starts_with('p') {
            if header.is_some() {
                return Err(dimacs_error(line_no, "duplicate problem line"));
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 4 || parts[1] != "cnf" {
                return Err(dimacs_error(line_no, "expected 'p cnf <variables> <clauses>'"));
            }
            let variables = parse_count(parts[2], line_no)?;
            let clause_count = parse_count(parts[3], line_no)?;
            header = Some((variables, clause_count));
            continue;
        }

        let (variables, _) = header.ok_or_else(|| dimacs_error(line_no, "clause before problem line"))?;

        for token in line.split_whitespace() {
            let lit: i32 = token
                .parse()
                .map_err(|_| dimacs_error(line_no, &format!("invalid literal '{}'", token)))?;
            if lit == 0 {
                clauses.push(Clause::new(std::mem::take(&mut pending)));
            } else {
                if lit.unsigned_abs() as usize > variables {
                    return Err(dimacs_error(
                        line_no,
                        &format!("literal {} exceeds declared variable count {}", lit, variables),
                    ));
                }
                pending.push(lit);
            }
        }
    }

    let (variables, clause_count) = header.ok_or_else(|| dimacs_error(0, "missing problem line"))?;

    if !pending.is_empty() {
        return Err(dimacs_error(0, "last clause is not terminated by 0"));
    }
    if clauses.len() != clause_count {
        return Err(dimacs_error(
            0,
            &format!("header declares {} clauses, found {}", clause_count, clauses.len()),
        ));
    }

    Ok(Formula::new(variables, clauses))
}

fn parse_count(token: &str, line: usize) -> PeaceResult<usize> {
    token
        .parse()
        .map_err(|_| dimacs_error(line, &format!("invalid count '{}'", token)))
}

fn dimacs_error(line: usize, message: &str) -> PeaceError {
    PeaceError::Dimacs {
        line,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::store::ClauseStore;

    fn sample_formula() -> Formula {
        let mut store = ClauseStore::new();
        store.add_clause(&[1, -2]).unwrap();
        store.add_clause(&[-3]).unwrap();
        store.add_clause(&[2, 3, -4]).unwrap();
        store.freeze()
    }

    #[test]
    fn test_write_format() {
        let text = formula_to_string(&sample_formula()).unwrap();
        assert_eq!(text, "p cnf 4 3\n1 -2 0\n-3 0\n2 3 -4 0\n");
    }

    #[test]
    fn test_round_trip() {
        let formula = sample_formula();
        let parsed = parse_dimacs(&formula_to_string(&formula).unwrap()).unwrap();

        assert_eq!(parsed.variable_count(), formula.variable_count());
        assert_eq!(parsed.normalized_clauses(), formula.normalized_clauses());
    }

    #[test]
    fn test_comments_and_split_clauses() {
        let text = "c generated\nc by hand\np cnf 3 2\n1 2\n-3 0 3\n0\n";
        let formula = parse_dimacs(text).unwrap();

        assert_eq!(formula.variable_count(), 3);
        assert_eq!(formula.clauses()[0].literals, vec![1, 2, -3]);
        assert_eq!(formula.clauses()[1].literals, vec![3]);
    }

    #[test]
    fn test_streaming_writer() {
        let mut buffer = Vec::new();
        write_header(&mut buffer, &["two clauses".to_string()], 2, 2).unwrap();

        let mut writer = DimacsWriter::new(&mut buffer);
        writer.add_clause(&[1, 2]).unwrap();
        writer.add_clause(&[-1]).unwrap();
        assert_eq!(writer.written(), 2);
        writer.finish().unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "c two clauses\np cnf 2 2\n1 2 0\n-1 0\n");
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(parse_dimacs("1 2 0\n"), Err(PeaceError::Dimacs { line: 1, .. })));
        assert!(parse_dimacs("p cnf 2 1\n1 x 0\n").is_err());
        assert!(parse_dimacs("p cnf 2 1\n1 3 0\n").is_err());
        assert!(parse_dimacs("p cnf 2 2\n1 2 0\n").is_err());
        assert!(parse_dimacs("p cnf 2 1\n1 2\n").is_err());
        assert!(parse_dimacs("p dnf 2 1\n1 2 0\n").is_err());
        assert!(parse_dimacs("").is_err());
    }
}
