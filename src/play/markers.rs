//! Gizmo rendering for the play mode: placed markers, the floating drag
//! indicator, and the optional all-regions overlay.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::atlas::{AtlasData, Feature, Region};
use crate::config::AppConfig;
use crate::game::{canonical_rotation_to_world, canonical_to_world, GameSession};
use crate::map_view::MapCamera;
use crate::theme;

use super::drag::ActiveDrag;

/// Radius of the marker drawn at a correctly placed feature's anchor.
const PLACED_MARKER_RADIUS: f32 = 7.0;

/// Radius of the floating indicator that follows an armed drag.
const DRAG_INDICATOR_RADIUS: f32 = 10.0;

/// Draw one feature's correct region (and its anchor dot) in world space.
/// Shared by the study mode and the play-mode overlay.
pub fn draw_feature_region(gizmos: &mut Gizmos, feature: &Feature, color: Color) {
    let world = canonical_to_world(feature.anchor);
    match feature.region {
        Region::Circle { tolerance } => {
            gizmos.circle_2d(Isometry2d::from_translation(world), tolerance, color);
        }
        Region::Rect {
            width,
            height,
            rotation_degrees,
            ..
        } => {
            gizmos.rect_2d(
                Isometry2d::new(world, canonical_rotation_to_world(rotation_degrees)),
                Vec2::new(width, height),
                color,
            );
        }
    }
    gizmos.circle_2d(Isometry2d::from_translation(world), 2.0, theme::REGION_ANCHOR);
}

/// Markers at the true anchors of correctly placed features.
pub fn draw_placed_markers(mut gizmos: Gizmos, session: Res<GameSession>) {
    for record in session.placed() {
        let world = canonical_to_world(Vec2::new(record.x, record.y));
        gizmos.circle_2d(
            Isometry2d::from_translation(world),
            PLACED_MARKER_RADIUS,
            theme::PLACED_MARKER,
        );
    }
}

/// Floating circle under the cursor while a label is armed. Purely
/// cosmetic; a dropped frame here never affects scoring.
pub fn draw_drag_indicator(
    mut gizmos: Gizmos,
    active_drag: Res<ActiveDrag>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MapCamera>>,
) {
    if active_drag.feature_id.is_none() {
        return;
    }
    let Ok(window) = window_query.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, cursor_pos) else {
        return;
    };

    gizmos.circle_2d(
        Isometry2d::from_translation(world_pos),
        DRAG_INDICATOR_RADIUS,
        theme::DRAG_INDICATOR,
    );
}

/// Optional study aid during play: overlay every correct region.
pub fn draw_play_region_overlays(
    mut gizmos: Gizmos,
    config: Res<AppConfig>,
    atlas: Res<AtlasData>,
) {
    if !config.data.show_regions_in_play {
        return;
    }
    for feature in &atlas.features {
        draw_feature_region(&mut gizmos, feature, theme::REGION_OUTLINE);
    }
}
