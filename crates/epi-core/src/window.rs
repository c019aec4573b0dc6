//! The fixed historical window of observation years.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// First year of the default observation window.
pub const DEFAULT_START_YEAR: i32 = 2007;

/// Last year (inclusive) of the default observation window.
pub const DEFAULT_END_YEAR: i32 = 2022;

/// A contiguous, inclusive, non-empty range of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct YearWindow {
    start: i32,
    end: i32,
}

impl YearWindow {
    /// Build a window covering `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidWindow` if `start > end`.
    pub const fn new(start: i32, end: i32) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(self) -> i32 {
        self.start
    }

    #[must_use]
    pub const fn end(self) -> i32 {
        self.end
    }

    /// Number of years in the window (always at least 1).
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn len(self) -> usize {
        (self.end - self.start + 1) as usize
    }

    /// A window is never empty; provided for clippy's `len_without_is_empty`.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        false
    }

    /// Years in ascending order.
    pub fn years(self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}

impl Default for YearWindow {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_YEAR,
            end: DEFAULT_END_YEAR,
        }
    }
}
