//! Size statistics for an optimization run.

use std::fmt;

use crate::error::ShrinkError;

/// Byte-size comparison between the input and output of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metadata {
    pub original_size: usize,
    pub optimized_size: usize,
    /// Negative when optimization grew the document.
    pub saved_bytes: i64,
    pub saved_percentage: f64,
}

impl Metadata {
    /// Build statistics from byte lengths.
    ///
    /// An empty original is only accepted together with an empty result.
    pub fn new(original_size: usize, optimized_size: usize) -> Result<Self, ShrinkError> {
        if original_size == 0 && optimized_size != 0 {
            return Err(ShrinkError::Configuration(format!(
                "original size must be positive, got 0 with {} optimized bytes",
                optimized_size
            )));
        }

        let saved_bytes = original_size as i64 - optimized_size as i64;
        let saved_percentage = if original_size == 0 {
            0.0
        } else {
            saved_bytes as f64 * 100.0 / original_size as f64
        };

        Ok(Self {
            original_size,
            optimized_size,
            saved_bytes,
            saved_percentage,
        })
    }

    /// Statistics for a pair of strings, measured in bytes.
    pub fn from_markup(original: &str, optimized: &str) -> Result<Self, ShrinkError> {
        Self::new(original.len(), optimized.len())
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} bytes ({:.1}% smaller)",
            self.original_size, self.optimized_size, self.saved_percentage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_saved() {
        let meta = Metadata::new(1000, 500).unwrap();
        assert_eq!(meta.saved_bytes, 500);
        assert_eq!(meta.saved_percentage, 50.0);
    }

    #[test]
    fn test_empty_is_zero_percent() {
        let meta = Metadata::new(0, 0).unwrap();
        assert_eq!(meta.saved_bytes, 0);
        assert_eq!(meta.saved_percentage, 0.0);
    }

    #[test]
    fn test_zero_original_rejected() {
        assert!(matches!(
            Metadata::new(0, 500),
            Err(ShrinkError::Configuration(_))
        ));
    }

    #[test]
    fn test_growth_is_negative() {
        let meta = Metadata::new(100, 120).unwrap();
        assert_eq!(meta.saved_bytes, -20);
        assert_eq!(meta.saved_percentage, -20.0);
    }

    #[test]
    fn test_counts_bytes_not_chars() {
        // "é" is two bytes in UTF-8
        let meta = Metadata::from_markup("éé", "é").unwrap();
        assert_eq!(meta.original_size, 4);
        assert_eq!(meta.optimized_size, 2);
    }

    #[test]
    fn test_display() {
        let meta = Metadata::new(200, 150).unwrap();
        assert_eq!(meta.to_string(), "200 -> 150 bytes (25.0% smaller)");
    }
}
