//! Drop handling for the play mode.
//!
//! A label is "armed" by clicking it in the side panel; dropping it on the
//! map resolves the placement. Mouse and touch go through the same
//! resolver; the only difference between the two paths is where the
//! viewport point came from.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::game::{normalize, GameSession, MapSurface, PlacementOutcome};
use crate::ui::DialogState;

/// The label currently being dragged, if any.
#[derive(Resource, Default)]
pub struct ActiveDrag {
    pub feature_id: Option<String>,
}

/// Whether a viewport point is over the rendered map at all. Drops outside
/// the map are ignored (the label stays armed) rather than scored.
fn over_surface(point: Vec2, surface: &MapSurface) -> bool {
    surface.rect.is_some_and(|r| {
        point.x >= r.left
            && point.x <= r.left + r.width
            && point.y >= r.top
            && point.y <= r.top + r.height
    })
}

/// Shared drop resolution for both input modalities: viewport point ->
/// canonical point -> session transition. A failed normalization still
/// reaches the session as `None` and scores as a miss.
pub fn resolve_drop(
    viewport_point: Vec2,
    feature_id: &str,
    surface: &MapSurface,
    session: &mut GameSession,
) -> Option<PlacementOutcome> {
    let canonical = surface
        .rect
        .as_ref()
        .and_then(|rect| normalize(viewport_point, rect));
    session.attempt_placement(feature_id, canonical)
}

/// Mouse path: drop the armed label where the left button was pressed.
pub fn handle_mouse_drop(
    mouse_button: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    surface: Res<MapSurface>,
    dialog_state: Res<DialogState>,
    mut active_drag: ResMut<ActiveDrag>,
    mut session: ResMut<GameSession>,
    mut contexts: EguiContexts,
) {
    if dialog_state.any_modal_open || active_drag.feature_id.is_none() {
        return;
    }
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }

    // Clicking panel buttons must not double as a map drop
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        return;
    }

    let Ok(window) = window_query.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    if !over_surface(cursor_pos, &surface) {
        return;
    }

    if let Some(feature_id) = active_drag.feature_id.take() {
        let outcome = resolve_drop(cursor_pos, &feature_id, &surface, &mut session);
        debug!("Mouse drop of {}: {:?}", feature_id, outcome);
    }
}

/// Touch path: drop the armed label where a touch lifted.
pub fn handle_touch_drop(
    touches: Res<Touches>,
    surface: Res<MapSurface>,
    dialog_state: Res<DialogState>,
    mut active_drag: ResMut<ActiveDrag>,
    mut session: ResMut<GameSession>,
) {
    if dialog_state.any_modal_open || active_drag.feature_id.is_none() {
        return;
    }

    for touch in touches.iter_just_released() {
        let position = touch.position();
        if !over_surface(position, &surface) {
            continue;
        }
        if let Some(feature_id) = active_drag.feature_id.take() {
            let outcome = resolve_drop(position, &feature_id, &surface, &mut session);
            debug!("Touch drop of {}: {:?}", feature_id, outcome);
        }
    }
}

/// Escape or right-click puts the armed label back without an attempt.
pub fn handle_drag_cancel(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut active_drag: ResMut<ActiveDrag>,
) {
    if keyboard.just_pressed(KeyCode::Escape) || mouse_button.just_pressed(MouseButton::Right) {
        active_drag.feature_id = None;
    }
}
