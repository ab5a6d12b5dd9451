use std::fmt;

use super::{BitMatrix, Version};

/// Square grid of sampled modules (true = dark).
///
/// The side is always a legal QR dimension (21, 25, ..., 177).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    bits: BitMatrix,
    version: Version,
}

impl ModuleGrid {
    /// Wrap a square matrix; `None` unless its side is a legal QR dimension
    pub fn from_matrix(bits: BitMatrix) -> Option<Self> {
        if bits.width() != bits.height() {
            return None;
        }
        let version = Version::from_dimension(bits.width())?;
        Some(Self { bits, version })
    }

    /// Build from row-major booleans
    pub fn from_bools(dimension: usize, modules: &[bool]) -> Option<Self> {
        if modules.len() != dimension * dimension {
            return None;
        }
        Self::from_matrix(BitMatrix::from_bools(dimension, dimension, modules))
    }

    /// Modules per side
    pub fn dimension(&self) -> usize {
        self.bits.width()
    }

    /// Version implied by the dimension
    pub fn version(&self) -> Version {
        self.version
    }

    /// Module at column `x`, row `y`
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bits.get(x, y)
    }

    /// Underlying bit storage
    pub fn as_matrix(&self) -> &BitMatrix {
        &self.bits
    }

    /// Copy of this grid with module (x, y) flipped
    pub fn with_toggled(&self, x: usize, y: usize) -> Self {
        let mut bits = self.bits.clone();
        bits.toggle(x, y);
        Self {
            bits,
            version: self.version,
        }
    }
}

impl fmt::Display for ModuleGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.dimension() {
            for x in 0..self.dimension() {
                f.write_str(if self.get(x, y) { "##" } else { ".." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_illegal_dimensions() {
        assert!(ModuleGrid::from_matrix(BitMatrix::new(22, 22)).is_none());
        assert!(ModuleGrid::from_matrix(BitMatrix::new(21, 25)).is_none());
        assert!(ModuleGrid::from_bools(21, &[false; 20]).is_none());

        let grid = ModuleGrid::from_matrix(BitMatrix::new(25, 25)).unwrap();
        assert_eq!(grid.version().number(), 2);
    }

    #[test]
    fn test_toggle_copies() {
        let grid = ModuleGrid::from_matrix(BitMatrix::new(21, 21)).unwrap();
        let flipped = grid.with_toggled(3, 4);
        assert!(!grid.get(3, 4));
        assert!(flipped.get(3, 4));
        assert_eq!(flipped.to_string().lines().count(), 21);
    }
}
