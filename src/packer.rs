//! Greedy packing of square recommendation cards into a measured container.
//!
//! Geometry is an input value, so packing runs the same in tests as it does
//! against a live layout. The result is always a prefix of the candidates:
//! a later card is never chosen over an earlier one.

use serde::{Deserialize, Serialize};

use crate::error::{BrowserError, Result};

/// Measured container box in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxSize {
    pub width: f32,
    pub height: f32,
}

impl BoxSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Card sizing constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConstraints {
    pub min_size: f32,
    pub max_size: f32,
    pub gap: f32,
    pub padding: f32,
}

impl Default for PackConstraints {
    fn default() -> Self {
        Self {
            min_size: 120.0,
            max_size: 350.0,
            gap: 16.0,
            padding: 32.0,
        }
    }
}

impl PackConstraints {
    pub fn validate(&self) -> Result<()> {
        let all = [self.min_size, self.max_size, self.gap, self.padding];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(BrowserError::Config(
                "card constraints must be finite".to_string(),
            ));
        }
        if self.min_size <= 0.0 || self.min_size > self.max_size {
            return Err(BrowserError::Config(format!(
                "card sizes must satisfy 0 < min_size ({}) <= max_size ({})",
                self.min_size, self.max_size
            )));
        }
        if self.gap < 0.0 || self.padding < 0.0 {
            return Err(BrowserError::Config(
                "card gap and padding must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

// Measurements can be NaN or negative before the first layout pass.
fn sanitize(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Square card edge for a container width.
pub fn card_size(width: f32, constraints: &PackConstraints) -> f32 {
    sanitize(width)
        .max(constraints.min_size)
        .min(constraints.max_size)
}

/// Number of leading cards that fit in `container`.
pub fn fit_count(container: BoxSize, item_count: usize, constraints: &PackConstraints) -> usize {
    let card = card_size(container.width, constraints);
    let usable = sanitize(container.height) - constraints.padding;
    if card <= 0.0 || usable < card {
        return 0;
    }

    let mut used = 0.0_f32;
    let mut count = 0;
    for i in 0..item_count {
        let gap = if i == 0 { 0.0 } else { constraints.gap };
        let next = used + gap + card;
        if next > usable {
            break;
        }
        used = next;
        count += 1;
    }
    count
}

/// Longest prefix of `items` that fits in `container`.
pub fn fit<'a, T>(container: BoxSize, items: &'a [T], constraints: &PackConstraints) -> &'a [T] {
    &items[..fit_count(container, items.len(), constraints)]
}
