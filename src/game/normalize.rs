//! Coordinate normalization between screen space and canonical map space.
//!
//! Canonical map space is the fixed 736x523 coordinate system of the
//! reference map image: top-left origin, y-down, independent of window
//! size, camera zoom, or display scale. Every scoring decision happens in
//! canonical coordinates so a drop at 50% zoom means the same thing as a
//! drop at 200%.

use bevy::prelude::*;

use crate::constants::{MAP_HEIGHT, MAP_WIDTH};

/// On-screen bounding rectangle of the rendered map, in viewport
/// coordinates (y-down, like cursor and touch positions).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Where the map currently sits on screen. Recomputed every frame from the
/// camera and map transform; None until both exist.
#[derive(Resource, Default)]
pub struct MapSurface {
    pub rect: Option<SurfaceRect>,
}

/// Map a viewport-space point onto canonical map coordinates.
///
/// Returns None for a degenerate surface (zero/negative extent) or
/// non-finite input; callers treat that as an automatic miss rather than
/// an error.
pub fn normalize(client: Vec2, rect: &SurfaceRect) -> Option<Vec2> {
    if !rect.left.is_finite()
        || !rect.top.is_finite()
        || !rect.width.is_finite()
        || !rect.height.is_finite()
        || rect.width <= 0.0
        || rect.height <= 0.0
    {
        return None;
    }
    if !client.x.is_finite() || !client.y.is_finite() {
        return None;
    }

    Some(Vec2::new(
        (client.x - rect.left) / rect.width * MAP_WIDTH,
        (client.y - rect.top) / rect.height * MAP_HEIGHT,
    ))
}

/// Canonical map point -> Bevy world position. The map sprite is centered
/// on the world origin at native resolution, so this is a translation plus
/// a y-flip.
pub fn canonical_to_world(p: Vec2) -> Vec2 {
    Vec2::new(p.x - MAP_WIDTH / 2.0, MAP_HEIGHT / 2.0 - p.y)
}

/// Bevy world position -> canonical map point. Inverse of
/// [`canonical_to_world`].
pub fn world_to_canonical(p: Vec2) -> Vec2 {
    Vec2::new(p.x + MAP_WIDTH / 2.0, MAP_HEIGHT / 2.0 - p.y)
}

/// Display-space clockwise rotation (degrees) -> world-space rotation.
/// The y-flip between canonical and world space inverts the sense.
pub fn canonical_rotation_to_world(degrees: f32) -> Rot2 {
    Rot2::radians(-degrees.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_rect() -> SurfaceRect {
        SurfaceRect {
            left: 0.0,
            top: 0.0,
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
        }
    }

    #[test]
    fn test_center_of_unscaled_surface() {
        let p = normalize(Vec2::new(368.0, 261.5), &full_rect()).unwrap();
        assert_eq!(p, Vec2::new(368.0, 261.5));
    }

    #[test]
    fn test_scaled_and_offset_surface() {
        // Map rendered at half size, offset into the window
        let rect = SurfaceRect {
            left: 100.0,
            top: 50.0,
            width: MAP_WIDTH / 2.0,
            height: MAP_HEIGHT / 2.0,
        };
        let center = Vec2::new(100.0 + MAP_WIDTH / 4.0, 50.0 + MAP_HEIGHT / 4.0);
        let p = normalize(center, &rect).unwrap();
        assert!((p.x - MAP_WIDTH / 2.0).abs() < 1e-3);
        assert!((p.y - MAP_HEIGHT / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_corners() {
        let rect = full_rect();
        assert_eq!(normalize(Vec2::ZERO, &rect).unwrap(), Vec2::ZERO);
        assert_eq!(
            normalize(Vec2::new(MAP_WIDTH, MAP_HEIGHT), &rect).unwrap(),
            Vec2::new(MAP_WIDTH, MAP_HEIGHT)
        );
    }

    #[test]
    fn test_degenerate_surface_is_none() {
        let rect = SurfaceRect {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: MAP_HEIGHT,
        };
        assert!(normalize(Vec2::new(10.0, 10.0), &rect).is_none());

        let rect = SurfaceRect {
            left: 0.0,
            top: 0.0,
            width: MAP_WIDTH,
            height: -5.0,
        };
        assert!(normalize(Vec2::new(10.0, 10.0), &rect).is_none());
    }

    #[test]
    fn test_nan_input_is_none() {
        assert!(normalize(Vec2::new(f32::NAN, 10.0), &full_rect()).is_none());
        let rect = SurfaceRect {
            left: f32::NAN,
            ..full_rect()
        };
        assert!(normalize(Vec2::new(10.0, 10.0), &rect).is_none());
    }

    #[test]
    fn test_world_roundtrip() {
        let canonical = Vec2::new(490.0, 80.0);
        let world = canonical_to_world(canonical);
        assert_eq!(world_to_canonical(world), canonical);
    }

    #[test]
    fn test_canonical_origin_is_top_left_in_world() {
        // Canonical (0,0) is the map's top-left; in y-up world space that
        // is the corner with negative x and positive y.
        let world = canonical_to_world(Vec2::ZERO);
        assert_eq!(world, Vec2::new(-MAP_WIDTH / 2.0, MAP_HEIGHT / 2.0));
    }

    #[test]
    fn test_clockwise_display_rotation_is_negative_world_radians() {
        let rot = canonical_rotation_to_world(90.0);
        assert!((rot.as_radians() + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }
}
