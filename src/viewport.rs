//! Viewport classification
//!
//! Maps the observed display width onto a discrete size class that drives
//! pagination density.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BrowserError, Result};

/// Discrete viewport bucket, ordered from narrowest to widest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Xs,
    Sm,
    Md,
    Lg,
}

impl SizeClass {
    pub const ALL: [SizeClass; 4] = [SizeClass::Xs, SizeClass::Sm, SizeClass::Md, SizeClass::Lg];
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeClass::Xs => write!(f, "xs"),
            SizeClass::Sm => write!(f, "sm"),
            SizeClass::Md => write!(f, "md"),
            SizeClass::Lg => write!(f, "lg"),
        }
    }
}

/// Minimum widths (in px) at which each size class starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    pub sm: f32,
    pub md: f32,
    pub lg: f32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            sm: 600.0,
            md: 900.0,
            lg: 1200.0,
        }
    }
}

impl Breakpoints {
    /// Classify a width, checking thresholds from largest to smallest.
    ///
    /// Total: non-finite or negative widths fall through to `Xs`.
    pub fn classify(&self, width: f32) -> SizeClass {
        if width >= self.lg {
            SizeClass::Lg
        } else if width >= self.md {
            SizeClass::Md
        } else if width >= self.sm {
            SizeClass::Sm
        } else {
            SizeClass::Xs
        }
    }

    /// Thresholds must be finite, positive and strictly ascending.
    pub fn validate(&self) -> Result<()> {
        let all = [self.sm, self.md, self.lg];
        if all.iter().any(|b| !b.is_finite() || *b <= 0.0) {
            return Err(BrowserError::Config(
                "breakpoints must be finite positive widths".to_string(),
            ));
        }
        if !(self.sm < self.md && self.md < self.lg) {
            return Err(BrowserError::Config(format!(
                "breakpoints must be strictly ascending (sm {} < md {} < lg {})",
                self.sm, self.md, self.lg
            )));
        }
        Ok(())
    }
}

/// Classify `width` with the default breakpoints.
pub fn classify(width: f32) -> SizeClass {
    Breakpoints::default().classify(width)
}
