mod atlas_data;
mod edits;
mod feature;
pub mod persistence;

pub use atlas_data::{AtlasData, SavedAtlas, SavedCategory, SavedFeature};
pub use edits::{
    CreateCategoryRequest, CreateFeatureRequest, DeleteCategoryRequest, DeleteFeatureRequest,
    FeatureEdit, FeatureEditRequest,
};
pub use feature::{Category, Feature, Region};
pub use persistence::{
    AsyncAtlasOperation, AtlasDirtyState, AtlasLoadError, AtlasSaveError, ExportAtlasRequest,
    LoadAtlasRequest, SaveAtlasRequest,
};

use bevy::prelude::*;

pub struct AtlasPlugin;

impl Plugin for AtlasPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AtlasData>()
            .init_resource::<AtlasDirtyState>()
            .init_resource::<AtlasSaveError>()
            .init_resource::<AtlasLoadError>()
            .init_resource::<AsyncAtlasOperation>()
            .add_message::<SaveAtlasRequest>()
            .add_message::<LoadAtlasRequest>()
            .add_message::<ExportAtlasRequest>()
            .add_message::<CreateFeatureRequest>()
            .add_message::<FeatureEditRequest>()
            .add_message::<DeleteFeatureRequest>()
            .add_message::<CreateCategoryRequest>()
            .add_message::<DeleteCategoryRequest>()
            .add_systems(
                Startup,
                persistence::request_initial_load.after(crate::config::ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    persistence::save_atlas_system.run_if(on_message::<SaveAtlasRequest>),
                    persistence::export_atlas_system.run_if(on_message::<ExportAtlasRequest>),
                    persistence::load_atlas_system.run_if(on_message::<LoadAtlasRequest>),
                    persistence::poll_save_tasks,
                    persistence::poll_load_tasks,
                    persistence::autosave_system,
                ),
            )
            .add_systems(
                Update,
                (
                    edits::handle_create_feature,
                    edits::handle_feature_edits,
                    edits::handle_delete_feature,
                    edits::handle_create_category,
                    edits::handle_delete_category,
                ),
            );
    }
}
