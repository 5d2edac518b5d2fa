//! Play mode: drag labels from the side panel onto the map and score hits.

mod drag;
pub mod markers;

pub use drag::ActiveDrag;
pub use markers::draw_feature_region;

use bevy::prelude::*;

use crate::modes::{mode_is, Mode};

pub struct PlayPlugin;

impl Plugin for PlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveDrag>().add_systems(
            Update,
            (
                drag::handle_mouse_drop,
                drag::handle_touch_drop,
                drag::handle_drag_cancel,
                markers::draw_placed_markers,
                markers::draw_drag_indicator,
                markers::draw_play_region_overlays,
            )
                .run_if(mode_is(Mode::Play)),
        );
    }
}
