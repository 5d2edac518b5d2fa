//! Study mode: every feature's correct region drawn on the map, no scoring.

use bevy::prelude::*;

use crate::atlas::AtlasData;
use crate::modes::{mode_is, Mode};
use crate::play::draw_feature_region;
use crate::theme;

fn draw_all_regions(mut gizmos: Gizmos, atlas: Res<AtlasData>) {
    for feature in &atlas.features {
        draw_feature_region(&mut gizmos, feature, theme::REGION_OUTLINE);
    }
}

pub struct StudyPlugin;

impl Plugin for StudyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, draw_all_regions.run_if(mode_is(Mode::Study)));
    }
}
