//! Geographic features and the target-region geometry used to score drops.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// The correct area for a feature, tested against dropped points.
///
/// A feature is in exactly one of two shape modes. The enum makes the
/// "partial zone" states of the flat wire format unrepresentable: a
/// rectangle always has width, height, and rotation together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Region {
    /// Any drop within `tolerance` canonical units of the anchor is a hit.
    Circle { tolerance: f32 },
    /// A rectangle centered on the anchor, rotated clockwise (in display
    /// space, y-down) by `rotation_degrees`.
    Rect {
        width: f32,
        height: f32,
        rotation_degrees: f32,
        /// Dormant circle tolerance. The atlas file keeps a tolerance on
        /// every row, so a rectangular feature remembers its value: it is
        /// written back on save and restored when the zone is cleared.
        tolerance: f32,
    },
}

impl Region {
    /// Whether `point` falls inside this region centered at `anchor`.
    ///
    /// Both coordinates are canonical map-space (top-left origin, y-down).
    /// Boundaries count as hits; the regions are closed sets.
    pub fn contains(&self, anchor: Vec2, point: Vec2) -> bool {
        match *self {
            Region::Circle { tolerance } => point.distance(anchor) <= tolerance,
            Region::Rect {
                width,
                height,
                rotation_degrees,
                ..
            } => {
                // Transform the point into the rectangle's local frame by
                // applying the inverse rotation around the anchor.
                let diff = point - anchor;
                let theta = (-rotation_degrees).to_radians();
                let cos_t = theta.cos();
                let sin_t = theta.sin();
                let local_x = diff.x * cos_t - diff.y * sin_t;
                let local_y = diff.x * sin_t + diff.y * cos_t;
                local_x.abs() <= width / 2.0 && local_y.abs() <= height / 2.0
            }
        }
    }

    /// Rotation in degrees, 0 for circles.
    pub fn rotation_degrees(&self) -> f32 {
        match *self {
            Region::Circle { .. } => 0.0,
            Region::Rect { rotation_degrees, .. } => rotation_degrees,
        }
    }

    /// The circle tolerance, active (circle) or dormant (rect).
    pub fn tolerance(&self) -> f32 {
        match *self {
            Region::Circle { tolerance } => tolerance,
            Region::Rect { tolerance, .. } => tolerance,
        }
    }
}

/// A named geographic entity with a target region on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub name: String,
    /// Weak reference to a [`Category`]; None = uncategorized.
    pub category_id: Option<String>,
    /// Canonical map-space position of the feature.
    pub anchor: Vec2,
    pub region: Region,
}

/// A grouping of features (e.g. "Cordilleras", "Picos"), used to filter
/// play sessions. Deleting a category never deletes its features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(tolerance: f32) -> Region {
        Region::Circle { tolerance }
    }

    fn rect(width: f32, height: f32, rotation_degrees: f32) -> Region {
        Region::Rect {
            width,
            height,
            rotation_degrees,
            tolerance: 30.0,
        }
    }

    #[test]
    fn test_circle_hit_inside() {
        let region = circle(30.0);
        assert!(region.contains(Vec2::new(100.0, 100.0), Vec2::new(110.0, 95.0)));
    }

    #[test]
    fn test_circle_boundary_is_hit() {
        // Distance exactly equal to the tolerance counts as a hit
        let region = circle(30.0);
        let anchor = Vec2::new(100.0, 100.0);
        assert!(region.contains(anchor, Vec2::new(130.0, 100.0)));
    }

    #[test]
    fn test_circle_just_outside_is_miss() {
        let region = circle(30.0);
        let anchor = Vec2::new(100.0, 100.0);
        assert!(!region.contains(anchor, Vec2::new(130.01, 100.0)));
    }

    #[test]
    fn test_rect_axis_aligned() {
        let region = rect(100.0, 40.0, 0.0);
        let anchor = Vec2::new(300.0, 200.0);
        assert!(region.contains(anchor, Vec2::new(349.0, 219.0)));
        assert!(!region.contains(anchor, Vec2::new(351.0, 200.0)));
        assert!(!region.contains(anchor, Vec2::new(300.0, 221.0)));
    }

    #[test]
    fn test_rect_boundary_is_hit() {
        let region = rect(100.0, 40.0, 0.0);
        let anchor = Vec2::new(300.0, 200.0);
        assert!(region.contains(anchor, Vec2::new(350.0, 220.0)));
    }

    #[test]
    fn test_rect_rotated_90_swaps_extents() {
        // A 100x40 rect rotated 90 degrees: a point 40 units below the
        // center lands inside the (now vertical) long extent.
        let region = rect(100.0, 40.0, 90.0);
        let anchor = Vec2::new(300.0, 200.0);
        assert!(region.contains(anchor, Vec2::new(300.0, 240.0)));
        // But 40 units to the side now falls outside the short extent
        assert!(!region.contains(anchor, Vec2::new(340.0, 200.0)));
    }

    #[test]
    fn test_rect_negative_rotation() {
        // The seed data rotates one zone by -25 degrees; make sure negative
        // angles invert cleanly. A point along the rotated long axis stays in.
        let region = rect(128.0, 37.0, -25.0);
        let anchor = Vec2::new(312.0, 151.0);
        // Display-space direction of the rotated +x axis for -25 degrees
        let theta = (-25.0_f32).to_radians();
        let along = Vec2::new(theta.cos(), theta.sin()) * 60.0;
        assert!(region.contains(anchor, anchor + along));
        assert!(!region.contains(anchor, anchor + along * 1.2));
    }

    #[test]
    fn test_region_rotation_degrees_accessor() {
        assert_eq!(circle(10.0).rotation_degrees(), 0.0);
        assert_eq!(rect(10.0, 5.0, 45.0).rotation_degrees(), 45.0);
    }
}
