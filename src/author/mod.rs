//! Authoring mode: place, move, reshape, and categorize features directly
//! on the map. All persistent mutations go through the atlas edit messages.

mod placement;
mod selection;
pub mod tools;

pub use selection::SelectedFeature;
pub use tools::{AuthorTool, CurrentAuthorTool};

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::constants::DEFAULT_TOLERANCE;
use crate::game::{normalize, MapSurface};
use crate::modes::{mode_is, Mode};

/// Values staged in the panel for the next feature to be placed.
#[derive(Resource)]
pub struct AuthorStaging {
    pub name: String,
    pub tolerance: f32,
    pub category_id: Option<String>,
}

impl Default for AuthorStaging {
    fn default() -> Self {
        Self {
            name: String::new(),
            tolerance: DEFAULT_TOLERANCE,
            category_id: None,
        }
    }
}

/// Cursor position as a canonical map point, if the cursor is over the
/// rendered map and not over the UI.
pub(crate) fn cursor_canonical(
    window_query: &Query<&Window, With<PrimaryWindow>>,
    surface: &MapSurface,
    contexts: &mut EguiContexts,
) -> Option<Vec2> {
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        return None;
    }

    let cursor_pos = window_query.single().ok()?.cursor_position()?;
    let rect = surface.rect?;
    let inside = cursor_pos.x >= rect.left
        && cursor_pos.x <= rect.left + rect.width
        && cursor_pos.y >= rect.top
        && cursor_pos.y <= rect.top + rect.height;
    if !inside {
        return None;
    }
    normalize(cursor_pos, &rect)
}

pub struct AuthorPlugin;

impl Plugin for AuthorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentAuthorTool>()
            .init_resource::<AuthorStaging>()
            .init_resource::<SelectedFeature>()
            .init_resource::<selection::AuthorDragState>()
            .add_systems(
                Update,
                (
                    tools::handle_tool_shortcuts,
                    placement::handle_place_click,
                    selection::handle_select_click,
                    selection::handle_drag_move,
                    selection::handle_delete_shortcut,
                    selection::draw_author_overlays,
                )
                    .run_if(mode_is(Mode::Author)),
            );
    }
}
