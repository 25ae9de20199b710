use crate::common::constants::PI;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PartitionError {
    #[error("radius partition requires at least 2 boundaries, got {actual}")]
    InsufficientBoundaries { actual: usize },
    #[error("radius boundary at index {index} must be finite, got {value}")]
    NonFiniteBoundary { index: usize, value: f64 },
    #[error("radius boundary at index {index} must be non-negative, got {value}")]
    NegativeBoundary { index: usize, value: f64 },
    #[error(
        "radius partition must be strictly increasing, index {index} has {current} after {previous}"
    )]
    NonIncreasingBoundary {
        index: usize,
        previous: f64,
        current: f64,
    },
}

/// Ordered shell/annulus boundaries: `N + 1` radii delimit `N` shells.
///
/// Shell `i` spans `[r[i], r[i + 1]]` in three dimensions; annulus `i` is its
/// projection onto the sky and shares the same boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusPartition {
    boundaries: Vec<f64>,
}

impl RadiusPartition {
    pub fn new(boundaries: Vec<f64>) -> Result<Self, PartitionError> {
        if boundaries.len() < 2 {
            return Err(PartitionError::InsufficientBoundaries {
                actual: boundaries.len(),
            });
        }

        for (index, value) in boundaries.iter().copied().enumerate() {
            if !value.is_finite() {
                return Err(PartitionError::NonFiniteBoundary { index, value });
            }
            if value < 0.0 {
                return Err(PartitionError::NegativeBoundary { index, value });
            }
            if index > 0 {
                let previous = boundaries[index - 1];
                if value <= previous {
                    return Err(PartitionError::NonIncreasingBoundary {
                        index,
                        previous,
                        current: value,
                    });
                }
            }
        }

        Ok(Self { boundaries })
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn shell_count(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn inner(&self, shell: usize) -> f64 {
        self.boundaries[shell]
    }

    pub fn outer(&self, shell: usize) -> f64 {
        self.boundaries[shell + 1]
    }

    pub fn outermost(&self) -> f64 {
        self.boundaries[self.boundaries.len() - 1]
    }

    /// Shells are represented by their midpoint radius, not the
    /// volume-weighted mean radius.
    pub fn midpoint(&self, shell: usize) -> f64 {
        (self.boundaries[shell] + self.boundaries[shell + 1]) / 2.0
    }

    pub fn midpoints(&self) -> Vec<f64> {
        self.boundaries
            .windows(2)
            .map(|pair| (pair[0] + pair[1]) / 2.0)
            .collect()
    }

    pub fn annulus_area(&self, annulus: usize) -> f64 {
        let inner = self.boundaries[annulus];
        let outer = self.boundaries[annulus + 1];
        PI * (outer * outer - inner * inner)
    }
}
