//! Click-to-place: create a feature at the clicked canonical point using
//! the name and tolerance staged in the panel.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::atlas::CreateFeatureRequest;
use crate::game::MapSurface;
use crate::ui::DialogState;

use super::tools::{AuthorTool, CurrentAuthorTool};
use super::{cursor_canonical, AuthorStaging};

pub fn handle_place_click(
    mouse_button: Res<ButtonInput<MouseButton>>,
    current_tool: Res<CurrentAuthorTool>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    surface: Res<MapSurface>,
    dialog_state: Res<DialogState>,
    mut staging: ResMut<AuthorStaging>,
    mut create_events: MessageWriter<CreateFeatureRequest>,
    mut contexts: EguiContexts,
) {
    if dialog_state.any_modal_open || current_tool.tool != AuthorTool::Place {
        return;
    }
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }
    if staging.name.trim().is_empty() {
        return;
    }

    let Some(canonical) = cursor_canonical(&window_query, &surface, &mut contexts) else {
        return;
    };

    // Authored coordinates are stored as whole pixels
    create_events.write(CreateFeatureRequest {
        name: staging.name.clone(),
        anchor: canonical.round(),
        tolerance: staging.tolerance,
        category_id: staging.category_id.clone(),
    });
    staging.name.clear();
}
