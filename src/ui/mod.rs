mod dialogs;
mod labels;
mod properties;
mod side_panel;
mod toolbar;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::atlas::{AsyncAtlasOperation, AtlasLoadError, AtlasSaveError};
use crate::config::ConfigResetNotification;

/// Resource that tracks whether any modal dialog is currently open.
/// Input handlers on the map should check this to avoid processing input
/// when the user is interacting with a dialog.
#[derive(Resource, Default)]
pub struct DialogState {
    /// True when any modal dialog is open that should block map input
    pub any_modal_open: bool,
}

/// System to aggregate all dialog open states into a single resource.
/// Runs in First schedule before input handlers.
fn update_dialog_state(
    import_export: Res<dialogs::ImportExportState>,
    config_reset: Res<ConfigResetNotification>,
    save_error: Res<AtlasSaveError>,
    load_error: Res<AtlasLoadError>,
    async_op: Res<AsyncAtlasOperation>,
    mut dialog_state: ResMut<DialogState>,
) {
    dialog_state.any_modal_open = config_reset.show
        || save_error.message.is_some()
        || load_error.message.is_some()
        || async_op.is_busy()
        || import_export.any_pending();
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogState>()
            .init_resource::<dialogs::ImportExportState>()
            .init_resource::<labels::CompletionBanner>()
            .init_resource::<side_panel::CategoryPanelState>()
            // Side panel must render before the top panel so the toolbar
            // fits next to it. Use chain() to enforce ordering.
            .add_systems(
                EguiPrimaryContextPass,
                (side_panel::side_panel_ui, toolbar::toolbar_ui).chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    // Last: floating windows and overlays
                    labels::map_labels_ui,
                    labels::completion_banner_ui,
                    properties::properties_panel_ui,
                    dialogs::atlas_error_dialogs_ui,
                    dialogs::async_operation_modal_ui,
                    dialogs::config_reset_notification_ui,
                )
                    .after(toolbar::toolbar_ui),
            )
            .add_systems(Update, (dialogs::import_export_system, labels::track_completion))
            .add_systems(First, update_dialog_state);
    }
}
