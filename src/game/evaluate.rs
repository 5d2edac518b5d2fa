//! Placement evaluation: did a dropped label land in its feature's region?

use bevy::prelude::*;

use crate::atlas::Feature;

/// Outcome of testing a dropped point against a feature's region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitResult {
    pub is_hit: bool,
}

/// Evaluate a drop. Pure: same inputs, same answer, regardless of whether
/// the canonical point came from a mouse drop or a touch release.
///
/// `dropped` is None when normalization failed (degenerate surface, NaN
/// input); that is always a miss.
pub fn evaluate(feature: &Feature, dropped: Option<Vec2>) -> HitResult {
    let is_hit = match dropped {
        Some(point) => feature.region.contains(feature.anchor, point),
        None => false,
    };
    HitResult { is_hit }
}
