//! Feature selection and drag-to-reposition for the authoring mode.
//!
//! While a drag is in flight the anchor is moved directly for live
//! feedback; the authoritative `Move` edit (which marks the atlas dirty)
//! is sent once, on release.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::atlas::{AtlasData, DeleteFeatureRequest, FeatureEdit, FeatureEditRequest};
use crate::constants::AUTHOR_PICK_RADIUS;
use crate::game::MapSurface;
use crate::play::draw_feature_region;
use crate::theme;
use crate::ui::DialogState;

use super::tools::{AuthorTool, CurrentAuthorTool};
use super::cursor_canonical;

/// The feature currently selected in the authoring mode.
#[derive(Resource, Default)]
pub struct SelectedFeature {
    pub id: Option<String>,
}

#[derive(Resource, Default)]
pub struct AuthorDragState {
    pub is_dragging: bool,
    pub feature_id: Option<String>,
}

/// Pick the feature at a canonical point: region containment first, then
/// nearest anchor within the fallback pick radius.
fn pick_feature(atlas: &AtlasData, point: Vec2) -> Option<String> {
    if let Some(feature) = atlas
        .features
        .iter()
        .find(|f| f.region.contains(f.anchor, point))
    {
        return Some(feature.id.clone());
    }

    atlas
        .features
        .iter()
        .map(|f| (f, f.anchor.distance(point)))
        .filter(|(_, d)| *d <= AUTHOR_PICK_RADIUS)
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(f, _)| f.id.clone())
}

pub fn handle_select_click(
    mouse_button: Res<ButtonInput<MouseButton>>,
    current_tool: Res<CurrentAuthorTool>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    surface: Res<MapSurface>,
    dialog_state: Res<DialogState>,
    atlas: Res<AtlasData>,
    mut selected: ResMut<SelectedFeature>,
    mut drag_state: ResMut<AuthorDragState>,
    mut contexts: EguiContexts,
) {
    if dialog_state.any_modal_open || current_tool.tool != AuthorTool::Select {
        return;
    }
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }
    let Some(canonical) = cursor_canonical(&window_query, &surface, &mut contexts) else {
        return;
    };

    match pick_feature(&atlas, canonical) {
        Some(id) => {
            drag_state.is_dragging = true;
            drag_state.feature_id = Some(id.clone());
            selected.id = Some(id);
        }
        None => {
            selected.id = None;
            drag_state.is_dragging = false;
            drag_state.feature_id = None;
        }
    }
}

pub fn handle_drag_move(
    mouse_button: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    surface: Res<MapSurface>,
    mut atlas: ResMut<AtlasData>,
    mut drag_state: ResMut<AuthorDragState>,
    mut edit_events: MessageWriter<FeatureEditRequest>,
    mut contexts: EguiContexts,
) {
    if !drag_state.is_dragging {
        return;
    }
    let Some(feature_id) = drag_state.feature_id.clone() else {
        drag_state.is_dragging = false;
        return;
    };

    // Release commits the move through the edit pipeline
    if mouse_button.just_released(MouseButton::Left) {
        drag_state.is_dragging = false;
        drag_state.feature_id = None;
        if let Some(feature) = atlas.feature(&feature_id) {
            edit_events.write(FeatureEditRequest {
                id: feature_id,
                edit: FeatureEdit::Move(feature.anchor.round()),
            });
        }
        return;
    }

    // Live feedback while the button is held
    let Some(canonical) = cursor_canonical(&window_query, &surface, &mut contexts) else {
        return;
    };
    if let Some(feature) = atlas.feature_mut(&feature_id) {
        feature.anchor = canonical;
    }
}

pub fn handle_delete_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut selected: ResMut<SelectedFeature>,
    mut delete_events: MessageWriter<DeleteFeatureRequest>,
    mut contexts: EguiContexts,
) {
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }
    if !keyboard.just_pressed(KeyCode::Delete) {
        return;
    }
    if let Some(id) = selected.id.take() {
        delete_events.write(DeleteFeatureRequest { id });
    }
}

/// Region outlines for every feature, the selected one highlighted.
pub fn draw_author_overlays(
    mut gizmos: Gizmos,
    atlas: Res<AtlasData>,
    selected: Res<SelectedFeature>,
) {
    for feature in &atlas.features {
        let color = if selected.id.as_deref() == Some(feature.id.as_str()) {
            theme::AUTHOR_SELECTION
        } else {
            theme::AUTHOR_REGION
        };
        draw_feature_region(&mut gizmos, feature, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{Feature, Region};

    fn atlas() -> AtlasData {
        AtlasData {
            features: vec![
                Feature {
                    id: "circle".to_string(),
                    name: "Círculo".to_string(),
                    category_id: None,
                    anchor: Vec2::new(100.0, 100.0),
                    region: Region::Circle { tolerance: 30.0 },
                },
                Feature {
                    id: "tiny".to_string(),
                    name: "Pequeño".to_string(),
                    category_id: None,
                    anchor: Vec2::new(400.0, 300.0),
                    region: Region::Circle { tolerance: 1.0 },
                },
            ],
            categories: Vec::new(),
        }
    }

    #[test]
    fn test_pick_inside_region() {
        assert_eq!(
            pick_feature(&atlas(), Vec2::new(110.0, 95.0)),
            Some("circle".to_string())
        );
    }

    #[test]
    fn test_pick_fallback_radius_near_anchor() {
        // Outside the 1px region but within the pick radius of the anchor
        assert_eq!(
            pick_feature(&atlas(), Vec2::new(405.0, 300.0)),
            Some("tiny".to_string())
        );
    }

    #[test]
    fn test_pick_nothing_far_away() {
        assert_eq!(pick_feature(&atlas(), Vec2::new(700.0, 50.0)), None);
    }
}
