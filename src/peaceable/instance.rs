//! Problem instances: board size and army size

use crate::error::{PeaceError, PeaceResult};
use crate::sat::PeaceableEncoder;
use std::fmt;
use std::path::Path;

/// One peaceable queens question: can two `k`-armies share an `n`×`n` board?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instance {
    pub n: usize,
    pub k: usize,
}

impl Instance {
    /// Validate raw parameters; `n` must be positive and `k` non-negative
    pub fn new(n: i64, k: i64) -> PeaceResult<Self> {
        if n <= 0 {
            return Err(PeaceError::InvalidParameters(format!(
                "board size must be positive, got {}",
                n
            )));
        }
        if k < 0 {
            return Err(PeaceError::InvalidParameters(format!(
                "army size must be non-negative, got {}",
                k
            )));
        }

        let n = usize::try_from(n)
            .map_err(|_| PeaceError::InvalidParameters(format!("board size {} is too large", n)))?;
        let k = usize::try_from(k)
            .map_err(|_| PeaceError::InvalidParameters(format!("army size {} is too large", k)))?;
        Ok(Self { n, k })
    }

    /// Parse the two-line instance format: `n` on the first line, `k` on the second
    pub fn parse(content: &str) -> PeaceResult<Self> {
        let mut lines = content.lines().map(str::trim).filter(|line| !line.is_empty());

        let mut next_value = |name: &str| -> PeaceResult<i64> {
            let line = lines.next().ok_or_else(|| {
                PeaceError::InvalidParameters(format!("instance file is missing {}", name))
            })?;
            line.parse().map_err(|_| {
                PeaceError::InvalidParameters(format!("{} must be an integer, got '{}'", name, line))
            })
        };

        let n = next_value("n")?;
        let k = next_value("k")?;
        Self::new(n, k)
    }

    /// Load an instance file
    pub fn load<P: AsRef<Path>>(path: P) -> PeaceResult<Self> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Write an instance file, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> PeaceResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, format!("{}\n{}\n", self.n, self.k))?;
        Ok(())
    }

    /// Number of cells on the board
    pub fn cells(&self) -> usize {
        self.n * self.n
    }

    /// Whether each army fits on the board at all
    pub fn is_feasible(&self) -> bool {
        self.k <= self.cells()
    }

    /// Encoder for this instance
    pub fn encoder(&self) -> PeaceResult<PeaceableEncoder> {
        PeaceableEncoder::new(self.n, self.k)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n = {}, k = {}", self.n, self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parameter_validation() {
        assert_eq!(Instance::new(4, 2).unwrap(), Instance { n: 4, k: 2 });
        assert_eq!(Instance::new(1, 0).unwrap(), Instance { n: 1, k: 0 });
        assert!(matches!(Instance::new(0, 1), Err(PeaceError::InvalidParameters(_))));
        assert!(matches!(Instance::new(-3, 1), Err(PeaceError::InvalidParameters(_))));
        assert!(matches!(Instance::new(3, -1), Err(PeaceError::InvalidParameters(_))));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Instance::parse("5\n4\n").unwrap(), Instance { n: 5, k: 4 });
        assert_eq!(Instance::parse("  8 \n\n 9\n").unwrap(), Instance { n: 8, k: 9 });
        assert!(Instance::parse("5\n").is_err());
        assert!(Instance::parse("five\n4\n").is_err());
        assert!(Instance::parse("").is_err());
    }

    #[test]
    fn test_feasibility() {
        assert!(Instance::new(2, 4).unwrap().is_feasible());
        assert!(!Instance::new(2, 5).unwrap().is_feasible());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("instances").join("q6.txt");

        let instance = Instance::new(6, 5).unwrap();
        instance.save(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "6\n5\n");
        assert_eq!(Instance::load(&path).unwrap(), instance);
        assert!(matches!(
            Instance::load(dir.path().join("missing.txt")),
            Err(PeaceError::Io(_))
        ));
    }
}
