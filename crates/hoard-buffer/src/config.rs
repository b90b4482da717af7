//! Buffer configuration parameters.

use crate::error::BufferError;

/// Configuration for an [`OwnedBuffer`](crate::OwnedBuffer).
///
/// Controls the initial allocation and the growth policy. Validated when a
/// buffer is built from it; immutable for the buffer's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferConfig {
    /// Element slots to allocate at construction.
    ///
    /// Default: 0, so construction never touches the allocator.
    pub initial_capacity: usize,

    /// Smallest capacity produced by growing an empty buffer.
    ///
    /// Default: 4. Avoids a reallocation for each of the first few appends.
    pub min_non_zero_capacity: usize,

    /// Multiplier applied to the current capacity on each growth step.
    ///
    /// Default: 2. Must be at least 2 so total copy work across N appends
    /// stays O(N).
    pub growth_factor: usize,
}

impl BufferConfig {
    /// Default minimum non-zero capacity.
    pub const DEFAULT_MIN_NON_ZERO_CAPACITY: usize = 4;

    /// Default growth factor.
    pub const DEFAULT_GROWTH_FACTOR: usize = 2;

    /// Create a config with default values.
    pub const fn new() -> Self {
        Self {
            initial_capacity: 0,
            min_non_zero_capacity: Self::DEFAULT_MIN_NON_ZERO_CAPACITY,
            growth_factor: Self::DEFAULT_GROWTH_FACTOR,
        }
    }

    /// Set the initial capacity.
    pub const fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Set the minimum non-zero capacity.
    pub const fn with_min_non_zero_capacity(mut self, min: usize) -> Self {
        self.min_non_zero_capacity = min;
        self
    }

    /// Set the growth factor.
    pub const fn with_growth_factor(mut self, growth_factor: usize) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    /// Check that the growth policy keeps appends amortised O(1).
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidArgument`] if `growth_factor < 2` or
    /// `min_non_zero_capacity == 0`.
    pub fn validate(&self) -> Result<(), BufferError> {
        if self.growth_factor < 2 {
            return Err(BufferError::InvalidArgument {
                reason: format!("growth_factor must be at least 2, got {}", self.growth_factor),
            });
        }
        if self.min_non_zero_capacity == 0 {
            return Err(BufferError::InvalidArgument {
                reason: "min_non_zero_capacity must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Capacity to grow to from `current` so that at least `required`
    /// slots are available.
    ///
    /// Never less than `required`, never less than `current * growth_factor`
    /// unless that product overflows, in which case the exact requirement
    /// is used.
    pub fn next_capacity(&self, current: usize, required: usize) -> usize {
        let grown = current.checked_mul(self.growth_factor).unwrap_or(required);
        grown.max(required).max(self.min_non_zero_capacity)
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::new()
    }
}
