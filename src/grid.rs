//! Row-major grid of RGB samples.

use crate::{AsciiError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleGrid {
    width: u32,
    height: u32,
    samples: Vec<[u8; 3]>,
}

impl SampleGrid {
    /// Build a grid from row-major samples. `samples.len()` must equal
    /// `width * height` and both dimensions must be non-zero.
    pub fn from_samples(width: u32, height: u32, samples: Vec<[u8; 3]>) -> Result<Self> {
        if width == 0 {
            return Err(AsciiError::InvalidDimension { value: width.to_string() });
        }
        if height == 0 {
            return Err(AsciiError::InvalidDimension { value: height.to_string() });
        }
        if samples.len() != width as usize * height as usize {
            return Err(AsciiError::InvalidDimension {
                value: format!("{} samples for {}x{}", samples.len(), width, height),
            });
        }
        Ok(Self { width, height, samples })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Sample at (x, y), `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.samples[(y * self.width + x) as usize])
    }

    pub fn samples(&self) -> &[[u8; 3]] {
        &self.samples
    }

    pub fn rows(&self) -> impl Iterator<Item = &[[u8; 3]]> {
        self.samples.chunks_exact(self.width as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_sample_count() {
        let err = SampleGrid::from_samples(2, 2, vec![[0; 3]; 3]).unwrap_err();
        assert!(matches!(err, AsciiError::InvalidDimension { .. }));
    }

    #[test]
    fn indexes_row_major() {
        let grid = SampleGrid::from_samples(2, 2, vec![[1; 3], [2; 3], [3; 3], [4; 3]]).unwrap();
        assert_eq!(grid.get(1, 0), Some([2; 3]));
        assert_eq!(grid.get(0, 1), Some([3; 3]));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.rows().count(), 2);
    }
}
